pub mod app;
pub mod components;

use anyhow::Result;
use crate::app::App;
use ratatui::Frame;

/// Draw the main UI
pub fn draw_ui(f: &mut Frame, app: &App) -> Result<()> {
    let size = f.area();

    app::draw_main_view(f, app, size);

    // Draw status message if needed
    if let Some((msg, time, color)) = &app.status_message {
        app::draw_status_message(f, msg, *color, time.elapsed());
    }

    // Draw command prompt if in command mode
    if app.is_command_mode() {
        app::draw_command_prompt(f, app.get_command_buffer());
    }

    // Draw help dialog if needed
    if app.show_help {
        app::draw_help_dialog(f);
    }

    Ok(())
}
