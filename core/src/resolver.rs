#[cfg(test)]
mod tests;

use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::ProxySettings;
use crate::directive::PlaybackDirective;
use crate::error::ResolveError;
use crate::media::{
    FileSource, ResourceRef, ResourceRegistry, SelectedFile, extract_youtube_id, is_supported_file,
    proxied_url,
};

/// Resolve user input into a directive without touching any state.
///
/// Returns `None` for blank input. YouTube references win over everything
/// else; any other input is a remote stream, rewritten through the proxy when
/// `settings.enabled` is set. Malformed URLs are passed through verbatim.
pub fn resolve_url(input: &str, referrer: &str, settings: &ProxySettings) -> Option<PlaybackDirective> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(id) = extract_youtube_id(input) {
        return Some(PlaybackDirective::youtube(id));
    }

    let directive = if settings.enabled {
        PlaybackDirective::RemoteStream {
            url: proxied_url(input, referrer, settings),
            proxied: true,
        }
    } else {
        PlaybackDirective::RemoteStream {
            url: input.to_string(),
            proxied: false,
        }
    };

    Some(directive)
}

/// Owns the user-editable source inputs, the current directive and the
/// lifetime of the local resource handle created for a selected file.
///
/// At most one local handle is outstanding per resolver. Dropping the resolver
/// releases it, so every construction is paired with exactly one teardown.
pub struct SourceResolver {
    registry: Arc<dyn ResourceRegistry>,
    defaults: ProxySettings,
    url_input: String,
    referrer_input: String,
    proxy_base: String,
    use_proxy: bool,
    directive: PlaybackDirective,
    active_handle: Option<ResourceRef>,
}

impl SourceResolver {
    /// Create a resolver with empty inputs and proxy settings from `defaults`
    pub fn new(registry: Arc<dyn ResourceRegistry>, defaults: ProxySettings) -> Self {
        Self {
            registry,
            url_input: String::new(),
            referrer_input: String::new(),
            proxy_base: defaults.base_url.clone(),
            use_proxy: defaults.enabled,
            defaults,
            directive: PlaybackDirective::Empty,
            active_handle: None,
        }
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn referrer_input(&self) -> &str {
        &self.referrer_input
    }

    pub fn proxy_base(&self) -> &str {
        &self.proxy_base
    }

    pub fn use_proxy(&self) -> bool {
        self.use_proxy
    }

    /// Current directive
    pub fn directive(&self) -> &PlaybackDirective {
        &self.directive
    }

    /// Local handle still owned by this resolver, if any.
    ///
    /// This can differ from the handle in [`Self::directive`]: loading a URL
    /// after a file keeps the file's handle alive until `clear` or teardown.
    pub fn active_handle(&self) -> Option<&ResourceRef> {
        self.active_handle.as_ref()
    }

    pub fn registry(&self) -> &dyn ResourceRegistry {
        self.registry.as_ref()
    }

    pub fn set_url_input(&mut self, value: impl Into<String>) {
        self.url_input = value.into();
    }

    pub fn set_referrer_input(&mut self, value: impl Into<String>) {
        self.referrer_input = value.into();
    }

    pub fn set_proxy_base(&mut self, value: impl Into<String>) {
        self.proxy_base = value.into();
    }

    pub fn set_use_proxy(&mut self, enabled: bool) {
        self.use_proxy = enabled;
    }

    /// Proxy settings built from the current inputs
    pub fn proxy_settings(&self) -> ProxySettings {
        ProxySettings {
            base_url: self.proxy_base.clone(),
            enabled: self.use_proxy,
            ..self.defaults.clone()
        }
    }

    /// Store the given inputs, then resolve them
    pub fn load_from_url(
        &mut self,
        raw_url: &str,
        referrer: &str,
        use_proxy: bool,
        proxy_base: &str,
    ) -> &PlaybackDirective {
        self.url_input = raw_url.to_string();
        self.referrer_input = referrer.to_string();
        self.use_proxy = use_proxy;
        self.proxy_base = proxy_base.to_string();
        self.load()
    }

    /// Resolve the current inputs. A blank URL leaves the directive unchanged.
    pub fn load(&mut self) -> &PlaybackDirective {
        match resolve_url(&self.url_input, &self.referrer_input, &self.proxy_settings()) {
            Some(directive) => {
                info!("Resolved {} directive", directive.label());
                if let Some(handle) = &self.active_handle {
                    debug!("Keeping local handle {} across URL load", handle);
                }
                self.directive = directive;
            }
            None => debug!("Ignoring load with blank URL"),
        }

        &self.directive
    }

    /// Switch to a locally selected file.
    ///
    /// The previous handle is released before the new one is created. On a
    /// rejected file nothing changes. If the registry fails after the release,
    /// the directive is kept unless it pointed at the released handle, in which
    /// case it becomes `Empty`.
    pub fn load_from_file(&mut self, file: SelectedFile) -> Result<&PlaybackDirective, ResolveError> {
        if !is_supported_file(&file.name) {
            warn!("Rejected unsupported file {}", file.name);
            return Err(ResolveError::UnsupportedFile { name: file.name });
        }
        if let FileSource::Bytes(bytes) = &file.source {
            if bytes.is_empty() {
                warn!("Rejected empty file {}", file.name);
                return Err(ResolveError::EmptyFile { name: file.name });
            }
        }

        let released = self.release_active();

        match self.registry.create(&file) {
            Ok(handle) => {
                info!("Loaded local file {} as {}", file.name, handle);
                self.active_handle = Some(handle.clone());
                self.directive = PlaybackDirective::LocalFile {
                    handle,
                    name: file.name,
                };
                Ok(&self.directive)
            }
            Err(e) => {
                warn!("Failed to create resource for {}: {}", file.name, e);
                if released.is_some() && self.directive.local_handle() == released.as_ref() {
                    self.directive = PlaybackDirective::Empty;
                }
                Err(e)
            }
        }
    }

    /// Release any local handle and reset every input and the directive
    pub fn clear(&mut self) {
        self.release_active();
        self.url_input.clear();
        self.referrer_input.clear();
        self.proxy_base = self.defaults.base_url.clone();
        self.use_proxy = self.defaults.enabled;
        self.directive = PlaybackDirective::Empty;
        debug!("Resolver cleared");
    }

    /// Release everything and discard the resolver
    pub fn teardown(mut self) {
        self.release_active();
    }

    fn release_active(&mut self) -> Option<ResourceRef> {
        let handle = self.active_handle.take()?;
        self.registry.release(&handle);
        debug!("Released local handle {}", handle);
        Some(handle)
    }
}

impl Drop for SourceResolver {
    fn drop(&mut self) {
        self.release_active();
    }
}
