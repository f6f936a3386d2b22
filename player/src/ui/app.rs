use crate::app::{App, Focus};
use crate::ui::components::{DirectivePanel, HelpOverlay, InputField, StatusMessage};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Duration;

/// Draw the source form and the resolved directive
pub fn draw_main_view(f: &mut Frame, app: &App, area: Rect) {
    f.render_widget(Block::default().style(Style::default().bg(Color::Black)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // URL
            Constraint::Length(3), // Referrer
            Constraint::Length(3), // Proxy
            Constraint::Min(6),    // Directive
            Constraint::Length(3), // Status message
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    let title = Paragraph::new(Text::from("Test any video URL with custom referrer support"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" 🎬 Stream Player ")
                .title_alignment(Alignment::Center),
        )
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let resolver = &app.resolver;
    f.render_widget(
        InputField::new("Video URL (MP4, M3U8, YouTube)", resolver.url_input())
            .placeholder("https://example.com/video.m3u8?token=...")
            .focused(app.focus == Focus::Url),
        chunks[1],
    );
    f.render_widget(
        InputField::new("Referrer Page URL (Optional)", resolver.referrer_input())
            .placeholder("https://player.example.com")
            .focused(app.focus == Focus::Referrer),
        chunks[2],
    );

    let proxy_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(16), Constraint::Min(10)])
        .split(chunks[3]);
    let (toggle_text, toggle_color) = if resolver.use_proxy() {
        ("[x] Use proxy", Color::Green)
    } else {
        ("[ ] Use proxy", Color::DarkGray)
    };
    f.render_widget(
        Paragraph::new(Span::styled(toggle_text, Style::default().fg(toggle_color)))
            .block(Block::default().borders(Borders::ALL)),
        proxy_row[0],
    );
    f.render_widget(
        InputField::new("Proxy Server URL", resolver.proxy_base())
            .placeholder("http://localhost:4000")
            .focused(app.focus == Focus::ProxyBase),
        proxy_row[1],
    );

    let retained = match (resolver.active_handle(), resolver.directive().local_handle()) {
        (Some(active), Some(shown)) => active != shown,
        (Some(_), None) => true,
        _ => false,
    };
    f.render_widget(
        DirectivePanel::new(resolver.directive(), resolver.url_input()).retained_handle(retained),
        chunks[4],
    );

    let hints = if app.is_editing() {
        "Tab: Next field | Enter: Load | Ctrl+P: Play | Ctrl+L: Clear | Esc: Shortcuts | F1: Help"
    } else {
        ":: Command | p: Play | t: Proxy | c: Clear | Tab: Edit | q: Quit | F1: Help"
    };
    f.render_widget(
        Paragraph::new(Text::from(hints)).style(Style::default().fg(Color::White).bg(Color::DarkGray)),
        chunks[6],
    );
}

/// Draw status message with fade effect
pub fn draw_status_message(f: &mut Frame, message: &str, color: Color, age: Duration) {
    let area = f.area();
    let message_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(4),
        width: area.width,
        height: 3.min(area.height),
    };

    // Errors stay up longer
    let max_age = if color == Color::Red {
        Duration::from_secs(6)
    } else {
        Duration::from_secs(3)
    };
    f.render_widget(StatusMessage::new(message, color, age).max_age(max_age), message_area);
}

/// Draw command prompt
pub fn draw_command_prompt(f: &mut Frame, command: &str) {
    let area = Rect::new(0, f.area().height.saturating_sub(1), f.area().width, 1);

    f.render_widget(Clear, area);

    let command_para = Paragraph::new(Line::from(format!(":{}", command)))
        .style(Style::default().fg(Color::Yellow).bg(Color::Black).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Left);
    f.render_widget(command_para, area);

    f.set_cursor_position((area.x + 1 + command.len() as u16, area.y));
}

/// Draw help dialog
pub fn draw_help_dialog(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(HelpOverlay, area);
}

/// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
