use std::path::Path;

use anyhow::{Result, anyhow};
use ratatui::style::Color;

use crate::app::App;

/// A parsed command-mode command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the URL field, loading it when a value is given
    Url(Option<String>),
    Referrer(String),
    Proxy(Option<bool>),
    Base(String),
    Open(String),
    Load,
    Clear,
    Play,
    Help,
    Quit,
    Nothing,
}

impl Command {
    /// Parse a command string
    pub fn parse(command_str: &str) -> Result<Self> {
        let parts: Vec<&str> = command_str.trim().splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let args = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

        let command = match cmd.as_str() {
            "url" | "u" => Command::Url(args.map(str::to_string)),
            "referrer" | "referer" | "ref" | "r" => Command::Referrer(args.unwrap_or_default().to_string()),
            "proxy" | "px" => match args {
                None => Command::Proxy(None),
                Some("on" | "true" | "1" | "enable" | "enabled") => Command::Proxy(Some(true)),
                Some("off" | "false" | "0" | "disable" | "disabled") => Command::Proxy(Some(false)),
                Some(other) => return Err(anyhow!("Invalid proxy setting: {}", other)),
            },
            "base" | "b" => match args {
                Some(base) => Command::Base(base.to_string()),
                None => return Err(anyhow!("Base command requires a proxy URL")),
            },
            "open" | "o" => match args {
                Some(path) => Command::Open(path.to_string()),
                None => return Err(anyhow!("Open command requires a file path")),
            },
            "load" | "l" => Command::Load,
            "clear" | "c" => Command::Clear,
            "play" | "p" => Command::Play,
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "" => Command::Nothing,
            _ => return Err(anyhow!("Unknown command: {}", cmd)),
        };

        Ok(command)
    }

    /// Apply this command to the application
    pub fn execute(self, app: &mut App) -> Result<()> {
        match self {
            Command::Url(Some(url)) => app.open_source(&url)?,
            Command::Url(None) => app.focus = crate::app::Focus::Url,
            Command::Referrer(referrer) => {
                app.resolver.set_referrer_input(referrer);
                app.set_status("Referrer updated", Color::Blue);
            }
            Command::Proxy(None) => app.toggle_proxy(),
            Command::Proxy(Some(enabled)) => {
                if app.resolver.use_proxy() != enabled {
                    app.toggle_proxy();
                }
            }
            Command::Base(base) => {
                app.resolver.set_proxy_base(base);
                app.set_status("Proxy server updated", Color::Blue);
            }
            Command::Open(path) => app.open_file(Path::new(&path))?,
            Command::Load => app.load_url(),
            Command::Clear => app.clear(),
            Command::Play => app.play(),
            Command::Help => app.show_help = true,
            Command::Quit => app.should_quit = true,
            Command::Nothing => {}
        }

        Ok(())
    }
}

/// Handle a command string entered by the user
pub fn handle_command(app: &mut App, command: &str) -> Result<()> {
    Command::parse(command)?.execute(app)
}
