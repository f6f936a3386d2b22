use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use std::time::Duration;
use stream_core::PlaybackDirective;
use unicode_width::UnicodeWidthStr;

/// Shorten text to `max_chars` characters, marking the cut with "..."
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars).collect();
    short.push_str("...");
    short
}

/// Single-line labelled text input
pub struct InputField<'a> {
    label: &'a str,
    value: &'a str,
    placeholder: &'a str,
    focused: bool,
}

impl<'a> InputField<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            placeholder: "",
            focused: false,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl<'a> Widget for InputField<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.focused { Color::Yellow } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(format!(" {} ", self.label));

        let text = if self.value.is_empty() {
            Span::styled(self.placeholder, Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(self.value, Style::default().fg(Color::White))
        };

        Paragraph::new(Line::from(text)).block(block).render(area, buf);
    }
}

/// Shows what the resolver will hand to the player
pub struct DirectivePanel<'a> {
    directive: &'a PlaybackDirective,
    url_input: &'a str,
    retained_handle: bool,
}

impl<'a> DirectivePanel<'a> {
    pub fn new(directive: &'a PlaybackDirective, url_input: &'a str) -> Self {
        Self {
            directive,
            url_input,
            retained_handle: false,
        }
    }

    /// Mark that a local file handle is still held behind a non-file directive
    pub fn retained_handle(mut self, retained: bool) -> Self {
        self.retained_handle = retained;
        self
    }

    fn badge(&self) -> Span<'static> {
        let (text, color) = match self.directive {
            PlaybackDirective::Empty => (" IDLE ", Color::DarkGray),
            PlaybackDirective::EmbedRef { .. } => (" ▶ YouTube ", Color::Red),
            PlaybackDirective::RemoteStream { .. } => (" Now Playing ", Color::Blue),
            PlaybackDirective::LocalFile { .. } => (" 📁 Local File ", Color::Green),
        };
        Span::styled(
            text,
            Style::default().fg(Color::White).bg(color).add_modifier(Modifier::BOLD),
        )
    }
}

impl<'a> Widget for DirectivePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key = Style::default().fg(Color::Green);
        let mut lines = vec![Line::from(vec![
            self.badge(),
            Span::raw(" "),
            Span::styled(
                match self.directive {
                    PlaybackDirective::Empty => String::new(),
                    PlaybackDirective::LocalFile { name, .. } => name.clone(),
                    _ => preview(self.url_input.trim(), 60),
                },
                Style::default().fg(Color::Gray),
            ),
        ])];
        lines.push(Line::from(""));

        match self.directive {
            PlaybackDirective::Empty => {
                lines.push(Line::from("Enter a URL and press Enter, or :open <file>"));
            }
            PlaybackDirective::EmbedRef { provider, id } => {
                lines.push(Line::from(vec![Span::styled("Provider: ", key), Span::raw(*provider)]));
                lines.push(Line::from(vec![Span::styled("Video id: ", key), Span::raw(id.as_str())]));
            }
            PlaybackDirective::RemoteStream { url, proxied } => {
                lines.push(Line::from(vec![
                    Span::styled("Proxied:  ", key),
                    Span::raw(if *proxied { "yes" } else { "no" }),
                ]));
                lines.push(Line::from(vec![Span::styled("Source:   ", key), Span::raw(url.as_str())]));
            }
            PlaybackDirective::LocalFile { handle, name } => {
                lines.push(Line::from(vec![Span::styled("File:     ", key), Span::raw(name.as_str())]));
                lines.push(Line::from(vec![Span::styled("Handle:   ", key), Span::raw(handle.url())]));
            }
        }

        if self.retained_handle {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "A local file is still held; clear to release it",
                Style::default().fg(Color::Yellow),
            )));
        }

        Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL).title(" Directive "))
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// Status line message that fades out
pub struct StatusMessage<'a> {
    message: &'a str,
    color: Color,
    age: Duration,
    max_age: Duration,
}

impl<'a> StatusMessage<'a> {
    pub fn new(message: &'a str, color: Color, age: Duration) -> Self {
        Self {
            message,
            color,
            age,
            max_age: Duration::from_secs(3),
        }
    }

    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }
}

impl<'a> Widget for StatusMessage<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let fade_factor = if self.age > self.max_age {
            0.0
        } else {
            1.0 - (self.age.as_secs_f32() / self.max_age.as_secs_f32())
        };

        if fade_factor <= 0.0 {
            return;
        }

        let color = match (self.color, fade_factor) {
            (Color::Red, _) => Color::Red, // Errors always stay red
            (_, f) if f > 0.7 => self.color,
            _ => Color::DarkGray,
        };

        let text = Paragraph::new(Text::from(self.message))
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .style(Style::default().bg(Color::Black)),
            );

        let message_width = self.message.width() as u16 + 4;
        let message_area = Rect {
            x: area.x + (area.width.saturating_sub(message_width)) / 2,
            y: area.y,
            width: message_width.min(area.width),
            height: area.height.min(3),
        };

        Clear.render(message_area, buf);
        text.render(message_area, buf);
    }
}

/// Simple help overlay widget
pub struct HelpOverlay;

impl Widget for HelpOverlay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let entry = |key: &'static str, text: &'static str| {
            Line::from(vec![Span::styled(key, bold), Span::raw(text)])
        };

        let help_text = vec![
            Line::from(vec![Span::styled(
                "Keyboard Controls",
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )]),
            Line::from(""),
            entry("Tab/Shift+Tab", " - Move between fields"),
            entry("Enter", " - Load the entered URL"),
            entry("Esc", " - Leave the form (enables shortcuts)"),
            entry("Ctrl+P / p", " - Play the loaded source"),
            entry("Ctrl+T / t", " - Toggle the proxy server"),
            entry("Ctrl+L / c", " - Clear everything"),
            entry("Ctrl+Q", " - Quit"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Commands (press : outside the form)",
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )]),
            entry(":url <url>", " - Load a URL or YouTube link"),
            entry(":ref <url>", " - Set the referrer page"),
            entry(":proxy on|off", " - Route streams through the proxy"),
            entry(":base <url>", " - Set the proxy server URL"),
            entry(":open <path>", " - Load a local video file"),
            entry(":play / :clear / :quit", ""),
            Line::from(""),
            Line::from("Protected streams need the proxy server running and the page URL"),
            Line::from("that embeds the video as referrer."),
        ];

        let help = Paragraph::new(Text::from(help_text))
            .block(Block::default().title("Help").borders(Borders::ALL))
            .style(Style::default().fg(Color::White).bg(Color::Black))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });

        Clear.render(area, buf);
        help.render(area, buf);
    }
}
