use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

/// A single recognized reference shape
struct IdMatcher {
    name: &'static str,
    pattern: Regex,
}

impl IdMatcher {
    fn new(name: &'static str, pattern: &str) -> Option<Self> {
        match Regex::new(pattern) {
            Ok(pattern) => Some(Self { name, pattern }),
            Err(e) => {
                log::error!("Invalid YouTube matcher {}: {}", name, e);
                None
            }
        }
    }

    fn capture<'a>(&self, input: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

// Evaluated in order, most specific first
static MATCHERS: Lazy<Vec<IdMatcher>> = Lazy::new(|| {
    [
        (
            "host-path",
            r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)([A-Za-z0-9_-]{11})",
        ),
        ("bare-id", r"^([A-Za-z0-9_-]{11})$"),
    ]
    .into_iter()
    .filter_map(|(name, pattern)| IdMatcher::new(name, pattern))
    .collect()
});

/// Extract a YouTube video ID from a URL or a bare ID.
///
/// The input is expected to be trimmed already; surrounding whitespace makes a
/// bare ID fail to match. Returns the first match in priority order.
pub fn extract_youtube_id(input: &str) -> Option<String> {
    MATCHERS.iter().find_map(|matcher| {
        let id = matcher.capture(input)?;
        trace!("YouTube id {} matched by {}", id, matcher.name);
        Some(id.to_string())
    })
}

/// Check if the input refers to a YouTube video
pub fn is_youtube_url(input: &str) -> bool {
    extract_youtube_id(input).is_some()
}

/// Embed page URL for a video id
pub fn embed_url(id: &str) -> String {
    format!("https://www.youtube.com/embed/{}?autoplay=1&rel=0&modestbranding=1", id)
}
