use crate::media::ResourceRef;

/// Provider name carried by embed directives
pub const EMBED_PROVIDER: &str = "youtube";

/// The single resolved playback instruction handed to a surface
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackDirective {
    /// Nothing to play
    #[default]
    Empty,
    /// Third-party embed (always YouTube)
    EmbedRef { provider: &'static str, id: String },
    /// Remote stream, either the user URL or a rewritten proxy URL
    RemoteStream { url: String, proxied: bool },
    /// Locally selected file
    LocalFile { handle: ResourceRef, name: String },
}

impl PlaybackDirective {
    /// Embed directive for a YouTube video id
    pub fn youtube(id: impl Into<String>) -> Self {
        PlaybackDirective::EmbedRef {
            provider: EMBED_PROVIDER,
            id: id.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PlaybackDirective::Empty)
    }

    /// URL for the native player, if this directive targets it
    pub fn source_url(&self) -> Option<&str> {
        match self {
            PlaybackDirective::RemoteStream { url, .. } => Some(url),
            PlaybackDirective::LocalFile { handle, .. } => Some(handle.url()),
            _ => None,
        }
    }

    /// Video id, if this directive targets the embed surface
    pub fn embed_id(&self) -> Option<&str> {
        match self {
            PlaybackDirective::EmbedRef { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Local handle referenced by this directive
    pub fn local_handle(&self) -> Option<&ResourceRef> {
        match self {
            PlaybackDirective::LocalFile { handle, .. } => Some(handle),
            _ => None,
        }
    }

    /// Short label used by status lines and badges
    pub fn label(&self) -> &'static str {
        match self {
            PlaybackDirective::Empty => "idle",
            PlaybackDirective::EmbedRef { .. } => "youtube",
            PlaybackDirective::RemoteStream { .. } => "url",
            PlaybackDirective::LocalFile { .. } => "file",
        }
    }
}
