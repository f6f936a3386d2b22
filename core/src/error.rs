//! Error types for source resolution and playback surfaces.
//!
//! A YouTube classification miss and a blank URL are normal outcomes and never
//! show up here.

use thiserror::Error;

/// Failures while turning a user action into a directive
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The selected file is not a recognized video type
    #[error("unsupported file type: {name}")]
    UnsupportedFile { name: String },
    /// The selected file has no content
    #[error("file is empty: {name}")]
    EmptyFile { name: String },
    /// The resource registry could not create a handle
    #[error("could not create a resource for {name}: {reason}")]
    ResourceUnavailable { name: String, reason: String },
}

/// Failures reported asynchronously by a playback surface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The surface could not be started
    #[error("failed to launch {program}: {reason}")]
    Launch { program: String, reason: String },
    /// Playback ended abnormally
    #[error("player exited with status {code:?}")]
    Exited { code: Option<i32> },
    /// A local-file directive referenced a handle that is no longer live
    #[error("local resource is no longer available")]
    MissingResource,
}
