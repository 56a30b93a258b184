use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub border: Style,
    pub focused_border: Style,
    pub title: Style,
    pub muted: Style,
    pub done: Style,
    pub selected: Style,
    pub grabbed: Style,
    pub message: Style,
    pub input: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::DarkGray),
            focused_border: Style::default().fg(Color::Gray),
            title: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::DarkGray),
            done: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
            selected: Style::default().add_modifier(Modifier::REVERSED),
            grabbed: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            message: Style::default().fg(Color::Yellow),
            input: Style::default().fg(Color::White),
        }
    }
}
