use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use anyhow::{Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Color;
use stream_core::surface::{Dispatched, ErrorSink};
use stream_core::{
    PlaybackDirective, SelectedFile, SourceResolver, SurfaceError, detect_source_kind, dispatch, global_table,
};

use crate::config::Settings;
use crate::launcher::{BrowserEmbed, ExternalPlayer};

/// Form field that receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Url,
    Referrer,
    ProxyBase,
    /// No field focused; single keys act as shortcuts
    Nothing,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Url => Focus::Referrer,
            Focus::Referrer => Focus::ProxyBase,
            Focus::ProxyBase | Focus::Nothing => Focus::Url,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Focus::Url | Focus::Nothing => Focus::ProxyBase,
            Focus::Referrer => Focus::Url,
            Focus::ProxyBase => Focus::Referrer,
        }
    }
}

// App state
pub struct App {
    /// Source inputs and the current directive
    pub resolver: SourceResolver,
    /// Loaded settings
    pub settings: Settings,
    /// Focused form field
    pub focus: Focus,
    /// Status message to display
    pub status_message: Option<(String, Instant, Color)>,
    /// Whether the app should exit
    pub should_quit: bool,
    /// Help dialog visibility
    pub show_help: bool,
    /// Whether command mode is active
    pub command_mode: bool,
    /// Command buffer for command mode
    pub command_buffer: String,
    player: ExternalPlayer,
    embed: BrowserEmbed,
    error_sink: ErrorSink,
    errors: Receiver<SurfaceError>,
}

impl App {
    /// Create a new application
    pub fn new(settings: Settings) -> Self {
        let (tx, errors) = mpsc::channel();
        let error_sink: ErrorSink = Arc::new(move |e: SurfaceError| {
            log::error!("Player error: {}", e);
            let _ = tx.send(e);
        });

        let resolver = SourceResolver::new(global_table(), settings.resolver.proxy.clone());
        let player = ExternalPlayer::new(settings.player_command.clone(), settings.player_args.clone());
        let embed = BrowserEmbed::new(settings.browser_command.clone(), error_sink.clone());

        Self {
            resolver,
            settings,
            focus: Focus::Url,
            status_message: None,
            should_quit: false,
            show_help: false,
            command_mode: false,
            command_buffer: String::new(),
            player,
            embed,
            error_sink,
            errors,
        }
    }

    /// Set a status message with a color
    pub fn set_status(&mut self, message: impl Into<String>, color: Color) {
        let message_string = message.into();
        log::debug!("Status message: {} ({})", message_string, color);
        self.status_message = Some((message_string, Instant::now(), color));
    }

    /// Whether typed characters go into a form field
    pub fn is_editing(&self) -> bool {
        self.focus != Focus::Nothing
    }

    /// Open a URL or a local file, picking by whether the path exists
    pub fn open_source(&mut self, source: &str) -> Result<()> {
        let path = Path::new(source.trim());
        if path.is_file() {
            self.open_file(path)
        } else {
            log::debug!("Opening {:?} source {}", detect_source_kind(source), source);
            self.resolver.set_url_input(source);
            self.load_url();
            Ok(())
        }
    }

    /// Resolve the current form inputs
    pub fn load_url(&mut self) {
        if self.resolver.url_input().trim().is_empty() {
            self.set_status("Enter a video URL first", Color::Yellow);
            return;
        }

        let message = match self.resolver.load() {
            PlaybackDirective::EmbedRef { id, .. } => format!("YouTube video {}", id),
            PlaybackDirective::RemoteStream { proxied: true, .. } => "Stream ready (via proxy)".to_string(),
            PlaybackDirective::RemoteStream { proxied: false, .. } => "Stream ready".to_string(),
            other => format!("Loaded {}", other.label()),
        };
        self.set_status(message, Color::Green);
    }

    /// Select a local file for playback
    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(anyhow!("No such file: {}", path.display()));
        }

        let name = self.resolver.load_from_file(SelectedFile::from_path(path))?.label();
        self.set_status(format!("Loaded {}: {}", name, path.display()), Color::Green);
        Ok(())
    }

    /// Drop the current source and reset the form
    pub fn clear(&mut self) {
        self.resolver.clear();
        self.focus = Focus::Url;
        self.set_status("Cleared", Color::Blue);
    }

    /// Hand the current directive to the player or embed surface
    pub fn play(&mut self) {
        let dispatched = dispatch(
            self.resolver.directive(),
            self.resolver.registry(),
            &self.settings.resolver,
            &mut self.player,
            &mut self.embed,
            self.error_sink.clone(),
        );

        match dispatched {
            Dispatched::Player => self.set_status(format!("Playing with {}", self.settings.player_command), Color::Green),
            Dispatched::Embed => self.set_status("Opening YouTube embed", Color::Green),
            Dispatched::Nothing => self.set_status("Nothing to play", Color::Yellow),
        }
    }

    pub fn toggle_proxy(&mut self) {
        let enabled = !self.resolver.use_proxy();
        self.resolver.set_use_proxy(enabled);
        self.set_status(
            format!("Proxy {}", if enabled { "enabled" } else { "disabled" }),
            Color::Blue,
        );
    }

    /// Surface errors reported by players since the last update
    pub fn update(&mut self) -> Result<()> {
        while let Ok(error) = self.errors.try_recv() {
            self.set_status(format!("Player error: {}", error), Color::Red);
        }
        Ok(())
    }

    /// Handle key event
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Check if we're in command mode
        if self.is_command_mode() {
            match key.code {
                KeyCode::Char(c) => self.command_buffer.push(c),
                KeyCode::Backspace => {
                    self.command_buffer.pop();
                }
                KeyCode::Esc => self.exit_command_mode(),
                _ => {}
            }
            return Ok(());
        }

        if key.code == KeyCode::F(1) {
            self.show_help = !self.show_help;
            return Ok(());
        }
        if self.show_help && key.code == KeyCode::Esc {
            self.show_help = false;
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('l') => self.clear(),
                KeyCode::Char('p') => self.play(),
                KeyCode::Char('t') => self.toggle_proxy(),
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Enter => self.load_url(),
            KeyCode::Esc => self.focus = Focus::Nothing,
            _ if self.is_editing() => self.edit_focused(key.code),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('p') => self.play(),
            KeyCode::Char('c') => self.clear(),
            KeyCode::Char('t') => self.toggle_proxy(),
            KeyCode::Char('?') => self.show_help = !self.show_help,
            _ => {}
        }

        Ok(())
    }

    fn edit_focused(&mut self, code: KeyCode) {
        let mut value = match self.focus {
            Focus::Url => self.resolver.url_input().to_string(),
            Focus::Referrer => self.resolver.referrer_input().to_string(),
            Focus::ProxyBase => self.resolver.proxy_base().to_string(),
            Focus::Nothing => return,
        };

        match code {
            KeyCode::Char(c) => value.push(c),
            KeyCode::Backspace => {
                value.pop();
            }
            _ => return,
        }

        match self.focus {
            Focus::Url => self.resolver.set_url_input(value),
            Focus::Referrer => self.resolver.set_referrer_input(value),
            Focus::ProxyBase => self.resolver.set_proxy_base(value),
            Focus::Nothing => {}
        }
    }

    pub fn is_command_mode(&self) -> bool {
        self.command_mode
    }

    pub fn enter_command_mode(&mut self) {
        self.command_mode = true;
        self.command_buffer.clear();
    }

    pub fn exit_command_mode(&mut self) {
        self.command_mode = false;
    }

    pub fn get_command_buffer(&self) -> &str {
        &self.command_buffer
    }

    /// Release the resolver's local handle and discard the app
    pub fn shutdown(self) {
        let App { resolver, .. } = self;
        resolver.teardown();
    }
}
