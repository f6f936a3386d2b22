use url::form_urlencoded;

use crate::config::ProxySettings;

/// Delivery format of a remote stream, which picks the proxy route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Segmented, manifest-described stream (HLS)
    Adaptive,
    /// Single-file progressive download
    Progressive,
}

impl StreamKind {
    /// Classify a stream URL. Any occurrence of `.m3u8` marks it adaptive.
    pub fn detect(url: &str) -> Self {
        if url.contains(".m3u8") {
            StreamKind::Adaptive
        } else {
            StreamKind::Progressive
        }
    }

    /// Proxy route serving this kind of stream
    pub fn route<'a>(&self, settings: &'a ProxySettings) -> &'a str {
        match self {
            StreamKind::Adaptive => settings.hls_route.as_str(),
            StreamKind::Progressive => settings.generic_route.as_str(),
        }
    }
}

/// Percent-encode a query parameter value (form encoding, spaces become `+`)
pub fn encode_query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Build the proxy request URL for a remote stream.
///
/// `url` is always sent; `referer` only when the trimmed referrer is non-empty.
/// The target URL is not validated, the relay reports unreachable media.
pub fn proxied_url(url: &str, referrer: &str, settings: &ProxySettings) -> String {
    let route = StreamKind::detect(url).route(settings);
    let mut proxied = format!(
        "{}{}?url={}",
        settings.base_url,
        route,
        encode_query_value(url)
    );

    let referrer = referrer.trim();
    if !referrer.is_empty() {
        proxied.push_str("&referer=");
        proxied.push_str(&encode_query_value(referrer));
    }

    proxied
}
