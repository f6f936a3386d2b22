pub mod config;
pub mod directive;
pub mod error;
pub mod media;
pub mod resolver;
pub mod surface;

// Re-exports
pub use config::{ProxySettings, ResolverConfig};
pub use directive::{PlaybackDirective, EMBED_PROVIDER};
pub use error::{ResolveError, SurfaceError};
pub use media::{
    FileSource, LocalResourceTable, ResourceRef, ResourceRegistry, SelectedFile, StreamKind,
    embed_url, extract_youtube_id, global_table, is_youtube_url, proxied_url,
};
pub use resolver::{SourceResolver, resolve_url};
pub use surface::{EmbedRequest, EmbedSurface, FeatureFlags, PlayerRequest, PlayerSurface, dispatch};

/// Type of media source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Nothing entered
    Empty,
    /// YouTube video, played through the embed surface
    YouTube,
    /// Remote URL handed to the native player (possibly through the proxy)
    Remote,
}

/// Detect source kind from user input
pub fn detect_source_kind(input: &str) -> SourceKind {
    let input = input.trim();
    if input.is_empty() {
        return SourceKind::Empty;
    }

    // Check if it's a YouTube URL or a bare video id
    if media::is_youtube_url(input) {
        return SourceKind::YouTube;
    }

    // Anything else is passed through as a remote stream
    SourceKind::Remote
}
