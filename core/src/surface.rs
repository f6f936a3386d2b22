//! Contracts for the surfaces that consume a [`PlaybackDirective`].
//!
//! The native player receives a source URL plus presentation options, the embed
//! surface receives a YouTube video id. Neither is implemented here.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::ResolverConfig;
use crate::directive::PlaybackDirective;
use crate::error::SurfaceError;
use crate::media::{FileSource, ResourceRegistry};

/// Sink for asynchronous playback failures. Reports are never retried.
pub type ErrorSink = Arc<dyn Fn(SurfaceError) + Send + Sync>;

/// Optional player features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub speed_control: bool,
    pub keyboard_shortcuts: bool,
    pub picture_in_picture: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            speed_control: true,
            keyboard_shortcuts: true,
            picture_in_picture: true,
        }
    }
}

/// Request handed to the native player surface
pub struct PlayerRequest {
    pub source_url: String,
    pub title: String,
    pub features: FeatureFlags,
    /// Bytes behind a local-file URL, for players that cannot dereference it
    pub local_source: Option<FileSource>,
    pub on_error: ErrorSink,
}

impl fmt::Debug for PlayerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerRequest")
            .field("source_url", &self.source_url)
            .field("title", &self.title)
            .field("features", &self.features)
            .field("local_source", &self.local_source)
            .finish_non_exhaustive()
    }
}

/// Request handed to the embed surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedRequest {
    pub video_id: String,
}

/// Native media player
pub trait PlayerSurface {
    fn play(&mut self, request: PlayerRequest);
}

/// Third-party embed
pub trait EmbedSurface {
    fn embed(&mut self, request: EmbedRequest);
}

/// Which surface a directive was handed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Nothing,
    Player,
    Embed,
}

/// Hand a directive to the matching surface
pub fn dispatch(
    directive: &PlaybackDirective,
    registry: &dyn ResourceRegistry,
    config: &ResolverConfig,
    player: &mut dyn PlayerSurface,
    embed: &mut dyn EmbedSurface,
    on_error: ErrorSink,
) -> Dispatched {
    let local_source = match directive {
        PlaybackDirective::Empty => return Dispatched::Nothing,
        PlaybackDirective::EmbedRef { id, .. } => {
            debug!("Dispatching embed for {}", id);
            embed.embed(EmbedRequest { video_id: id.clone() });
            return Dispatched::Embed;
        }
        PlaybackDirective::RemoteStream { .. } => None,
        PlaybackDirective::LocalFile { handle, name } => match registry.lookup(handle) {
            Some(source) => Some(source),
            None => {
                warn!("Local resource {} for {} is no longer live", handle, name);
                (*on_error)(SurfaceError::MissingResource);
                return Dispatched::Nothing;
            }
        },
    };

    let Some(source_url) = directive.source_url() else {
        return Dispatched::Nothing;
    };
    debug!("Dispatching player for {}", source_url);
    player.play(PlayerRequest {
        source_url: source_url.to_string(),
        title: config.title.clone(),
        features: config.features,
        local_source,
        on_error,
    });

    Dispatched::Player
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{LocalResourceTable, SelectedFile};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingPlayer {
        urls: Vec<String>,
        had_local: Vec<bool>,
    }

    impl PlayerSurface for RecordingPlayer {
        fn play(&mut self, request: PlayerRequest) {
            self.urls.push(request.source_url);
            self.had_local.push(request.local_source.is_some());
        }
    }

    #[derive(Default)]
    struct RecordingEmbed {
        ids: Vec<String>,
    }

    impl EmbedSurface for RecordingEmbed {
        fn embed(&mut self, request: EmbedRequest) {
            self.ids.push(request.video_id);
        }
    }

    fn collecting_sink() -> (ErrorSink, Arc<Mutex<Vec<SurfaceError>>>) {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink_errors = Arc::clone(&errors);
        let sink: ErrorSink = Arc::new(move |e: SurfaceError| sink_errors.lock().push(e));
        (sink, errors)
    }

    #[test]
    fn test_dispatch_routes_by_variant() {
        let table = LocalResourceTable::new();
        let config = ResolverConfig::default();
        let mut player = RecordingPlayer::default();
        let mut embed = RecordingEmbed::default();
        let (sink, errors) = collecting_sink();

        let remote = PlaybackDirective::RemoteStream {
            url: "https://cdn.example/clip.mp4".to_string(),
            proxied: false,
        };
        assert_eq!(
            dispatch(&remote, &table, &config, &mut player, &mut embed, sink.clone()),
            Dispatched::Player
        );
        assert_eq!(
            dispatch(&PlaybackDirective::youtube("dQw4w9WgXcQ"), &table, &config, &mut player, &mut embed, sink.clone()),
            Dispatched::Embed
        );
        assert_eq!(
            dispatch(&PlaybackDirective::Empty, &table, &config, &mut player, &mut embed, sink),
            Dispatched::Nothing
        );

        assert_eq!(player.urls, vec!["https://cdn.example/clip.mp4".to_string()]);
        assert_eq!(embed.ids, vec!["dQw4w9WgXcQ".to_string()]);
        assert!(errors.lock().is_empty());
    }

    #[test]
    fn test_dispatch_local_file() {
        let table = LocalResourceTable::new();
        let handle = table.create(&SelectedFile::from_bytes("clip.mp4", vec![0u8; 4])).unwrap();
        let directive = PlaybackDirective::LocalFile {
            handle: handle.clone(),
            name: "clip.mp4".to_string(),
        };
        let config = ResolverConfig::default();
        let mut player = RecordingPlayer::default();
        let mut embed = RecordingEmbed::default();
        let (sink, errors) = collecting_sink();

        assert_eq!(
            dispatch(&directive, &table, &config, &mut player, &mut embed, sink.clone()),
            Dispatched::Player
        );
        assert_eq!(player.urls, vec![handle.url().to_string()]);
        assert_eq!(player.had_local, vec![true]);

        table.release(&handle);
        assert_eq!(
            dispatch(&directive, &table, &config, &mut player, &mut embed, sink),
            Dispatched::Nothing
        );
        assert_eq!(errors.lock().as_slice(), &[SurfaceError::MissingResource]);
    }
}
