use std::ffi::OsString;
use std::io::Write;
use std::process::{Child, Command, Stdio};

use log::{debug, info, warn};
use stream_core::surface::ErrorSink;
use stream_core::{EmbedRequest, EmbedSurface, FileSource, PlayerRequest, PlayerSurface, SurfaceError, embed_url};
use tempfile::NamedTempFile;

/// Plays directives by spawning an external media player
pub struct ExternalPlayer {
    command: String,
    args: Vec<String>,
}

impl ExternalPlayer {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Turn the request into something the external program can open.
    /// In-memory files are written to a temp file that lives as long as the child.
    fn materialize(request: &PlayerRequest) -> std::io::Result<(OsString, Option<NamedTempFile>)> {
        match &request.local_source {
            Some(FileSource::Path(path)) => Ok((path.clone().into_os_string(), None)),
            Some(FileSource::Bytes(bytes)) => {
                let mut file = NamedTempFile::new()?;
                file.write_all(bytes)?;
                file.flush()?;
                Ok((file.path().as_os_str().to_os_string(), Some(file)))
            }
            None => Ok((OsString::from(&request.source_url), None)),
        }
    }
}

impl PlayerSurface for ExternalPlayer {
    fn play(&mut self, request: PlayerRequest) {
        let (source, temp_file) = match Self::materialize(&request) {
            Ok(materialized) => materialized,
            Err(e) => {
                (*request.on_error)(SurfaceError::Launch {
                    program: self.command.clone(),
                    reason: format!("could not stage local file: {}", e),
                });
                return;
            }
        };

        debug!(
            "Launching {} for '{}' with features {:?}",
            self.command, request.title, request.features
        );

        let child = Command::new(&self.command)
            .args(&self.args)
            .arg(&source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match child {
            Ok(child) => {
                info!("Started {} (pid {})", self.command, child.id());
                watch_child(child, temp_file, request.on_error);
            }
            Err(e) => {
                (*request.on_error)(SurfaceError::Launch {
                    program: self.command.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Opens YouTube embeds with the system browser
pub struct BrowserEmbed {
    command: String,
    on_error: ErrorSink,
}

impl BrowserEmbed {
    pub fn new(command: impl Into<String>, on_error: ErrorSink) -> Self {
        Self {
            command: command.into(),
            on_error,
        }
    }
}

impl EmbedSurface for BrowserEmbed {
    fn embed(&mut self, request: EmbedRequest) {
        let url = embed_url(&request.video_id);
        debug!("Opening embed {}", url);

        let child = Command::new(&self.command)
            .arg(&url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match child {
            Ok(child) => watch_child(child, None, self.on_error.clone()),
            Err(e) => (*self.on_error)(SurfaceError::Launch {
                program: self.command.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Wait for a child in the background and forward abnormal exits
fn watch_child(mut child: Child, temp_file: Option<NamedTempFile>, on_error: ErrorSink) {
    std::thread::spawn(move || {
        let status = child.wait();
        // Keep the staged file until the player is done with it
        drop(temp_file);

        match status {
            Ok(status) if status.success() => debug!("Player exited cleanly"),
            Ok(status) => (*on_error)(SurfaceError::Exited { code: status.code() }),
            Err(e) => {
                warn!("Failed to wait for player: {}", e);
                (*on_error)(SurfaceError::Exited { code: None });
            }
        }
    });
}
