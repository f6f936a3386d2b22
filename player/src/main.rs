use std::{io, time::{Duration, Instant}, fs::OpenOptions, io::Write, path::PathBuf};
use anyhow::{Result, Context};
use clap::Parser;
use ratatui::{
    backend::CrosstermBackend,
    Terminal,
    style::Color,
};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

// Debug logger to file, stderr belongs to the alternate screen
fn debug_log(message: &str) {
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open("stream_player_debug.log")
    {
        let datetime = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(file, "[{}] {}", datetime, message);
    }
}

mod app;
mod commands;
mod config;
mod events;
mod launcher;
mod ui;

use app::App;
use config::Settings;
use events::event_utils;

/// Resolve video URLs, YouTube links and local files for playback
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Video URL, YouTube link or local file to load on start
    source: Option<String>,

    /// Referrer page URL sent through the proxy
    #[arg(long)]
    referrer: Option<String>,

    /// Proxy server base URL
    #[arg(long)]
    proxy_base: Option<String>,

    /// Play remote URLs directly instead of through the proxy
    #[arg(long)]
    no_proxy: bool,

    /// External player command
    #[arg(long)]
    player: Option<String>,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Load settings and apply command line overrides
    fn settings(&self) -> Settings {
        let path = self.config.clone().or_else(Settings::default_path);
        let mut settings = Settings::load_or_default(path.as_deref());

        if let Some(base) = &self.proxy_base {
            settings.resolver.proxy.base_url = base.clone();
        }
        if self.no_proxy {
            settings.resolver.proxy.enabled = false;
        }
        if let Some(player) = &self.player {
            settings.player_command = player.clone();
        }

        settings
    }
}

fn main() -> Result<()> {
    // Setup logger
    env_logger::init();

    let cli = Cli::parse();
    let mut app = App::new(cli.settings());

    if let Some(referrer) = &cli.referrer {
        app.resolver.set_referrer_input(referrer.clone());
    }
    if let Some(source) = &cli.source {
        debug_log(&format!("Opening source from command line: {}", source));
        if let Err(e) = app.open_source(source) {
            app.set_status(format!("Error: {}", e), Color::Red);
        }
    }

    // Restore the terminal on panic
    let orig_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        debug_log(&format!("PANIC: {}", panic_info));
        orig_hook(panic_info);
    }));

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(anyhow::anyhow!("Failed to setup terminal: {}", e));
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(term) => term,
        Err(e) => {
            let _ = disable_raw_mode();
            return Err(anyhow::anyhow!("Failed to create terminal: {}", e));
        }
    };
    debug_log("Terminal setup complete");

    let run_result = run(&mut terminal, &mut app);

    debug_log("Shutting down application");

    // Release any local file handle before leaving
    app.shutdown();

    let cleanup_result = (|| -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    })();

    if let Err(e) = cleanup_result {
        debug_log(&format!("Error during cleanup: {}", e));
        eprintln!("Error during cleanup: {}", e);
    }

    run_result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal.draw(|f| {
            if let Err(e) = ui::draw_ui(f, app) {
                debug_log(&format!("ERROR: UI draw function error: {}", e));
            }
        })?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let input = event::read()?;
            if event_utils::is_terminate_event(&input) {
                debug_log("ACTION: Quit key pressed, exiting application");
                app.should_quit = true;
                break;
            }

            if let Event::Key(key) = input {
                if event_utils::is_command_event(&input) && !app.is_command_mode() && !app.is_editing() {
                    app.enter_command_mode();
                } else if app.is_command_mode() && key.code == event::KeyCode::Enter {
                    let cmd = app.get_command_buffer().to_string();
                    debug_log(&format!("Executing command: {}", cmd));
                    app.exit_command_mode();

                    if let Err(e) = commands::handle_command(app, &cmd) {
                        debug_log(&format!("Command error: {}", e));
                        app.set_status(format!("Error: {}", e), Color::Red);
                    }
                } else if let Err(e) = app.handle_key_event(key) {
                    debug_log(&format!("Key handler error: {}", e));
                    app.set_status(format!("Error: {}", e), Color::Red);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if let Err(e) = app.update() {
                debug_log(&format!("App update error: {}", e));
                app.set_status(format!("Error: {}", e), Color::Red);
            }
            last_tick = Instant::now();
        }
    }

    Ok(())
}
