use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use tasklist_core::session::Route;

use crate::theme::Theme;

use super::app::{App, EntryField, Focus};

pub fn draw(frame: &mut Frame, app: &App) {
    let theme = Theme::default();
    let area = frame.area();
    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

    match app.route {
        None => {
            let waiting = Paragraph::new(Span::styled("Checking session...", theme.muted));
            frame.render_widget(waiting, chunks[0]);
        }
        Some(Route::Entry) => render_entry(frame, chunks[0], app, &theme),
        Some(Route::Tasks) => render_tasks(frame, chunks[0], app, &theme),
    }
    render_footer(frame, chunks[1], app, &theme);
}

fn render_entry(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(1),
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled("Sign in to your task list", theme.title)),
        chunks[0],
    );

    let masked = "*".repeat(app.password.buffer.chars().count());
    let fields = [
        (EntryField::Email, "Email", app.email.buffer.clone(), chunks[1]),
        (EntryField::Password, "Password", masked, chunks[2]),
    ];
    for (field, label, text, rect) in fields {
        let focused = app.entry_field == field;
        frame.render_widget(
            Paragraph::new(Span::styled(text, theme.input)).block(bordered(label, focused, theme)),
            rect,
        );
    }

    let composer = match app.entry_field {
        EntryField::Email => &app.email,
        EntryField::Password => &app.password,
    };
    let before = match app.entry_field {
        EntryField::Email => composer.before_cursor().width(),
        EntryField::Password => composer.before_cursor().chars().count(),
    };
    let rect = match app.entry_field {
        EntryField::Email => chunks[1],
        EntryField::Password => chunks[2],
    };
    place_cursor(frame, rect, before);

    if let Some(message) = app.entry.message() {
        frame.render_widget(
            Paragraph::new(Span::styled(message.to_string(), theme.message))
                .wrap(Wrap { trim: true }),
            chunks[3],
        );
    }
}

fn render_tasks(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .split(area);

    let who = app
        .controller
        .identity()
        .map(|identity| identity.display_name().to_string())
        .unwrap_or_default();
    let header = vec![
        Line::from(Span::styled("Your Tasks", theme.title)),
        Line::from(Span::styled(format!("Logged in as: {}", who), theme.muted)),
    ];
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let new_focused = app.focus == Focus::NewTask;
    frame.render_widget(
        Paragraph::new(Span::styled(app.new_task.buffer.clone(), theme.input))
            .block(bordered("New task", new_focused, theme)),
        chunks[1],
    );
    if new_focused {
        place_cursor(frame, chunks[1], app.new_task.before_cursor().width());
    }

    let list_block = bordered("Tasks", app.focus != Focus::NewTask, theme);
    let inner = list_block.inner(chunks[2]);
    frame.render_widget(list_block, chunks[2]);

    let lines = task_lines(app, theme);
    let visible = inner.height as usize;
    let scroll = app.selected.saturating_sub(visible.saturating_sub(1)) as u16;
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);

    if app.focus == Focus::Edit {
        let row = app.selected as u16 - scroll;
        let prefix = 6u16;
        let x = inner.x + prefix + app.edit.before_cursor().width() as u16;
        if row < inner.height {
            frame.set_cursor_position(Position::new(x.min(inner.right()), inner.y + row));
        }
    }
}

fn task_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    if app.controller.tasks().is_empty() {
        return vec![Line::from(Span::styled("No tasks yet", theme.muted))];
    }
    let editing = app.controller.editing().map(|edit| edit.task_id);
    let grabbed = app.grab.map(|grab| grab.task_id);

    app.controller
        .tasks()
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let mark = if task.completed { "[x]" } else { "[ ]" };
            let handle = if grabbed == Some(task.id) { "≡ " } else { "  " };
            let (title, mut style) = if editing == Some(task.id) {
                (app.edit.buffer.clone(), theme.input)
            } else if task.completed {
                (task.title.clone(), theme.done)
            } else {
                (task.title.clone(), theme.input)
            };
            if grabbed == Some(task.id) {
                style = theme.grabbed;
            } else if idx == app.selected && app.focus == Focus::List {
                style = style.patch(theme.selected);
            }
            Line::from(vec![
                Span::styled(handle, theme.grabbed),
                Span::styled(format!("{} ", mark), theme.muted),
                Span::styled(title, style),
            ])
        })
        .collect()
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let hint = match (app.route, app.focus, app.grab.is_some()) {
        (None, _, _) => "q quit",
        (Some(Route::Entry), _, _) => {
            "Enter sign in | Ctrl+N sign up | Tab switch field | Esc quit"
        }
        (Some(Route::Tasks), _, true) => "↑/↓ move | m/Enter drop | Esc cancel",
        (Some(Route::Tasks), Focus::List, false) => {
            "space toggle | e edit | d delete | a add | m move | s sign out | q quit"
        }
        (Some(Route::Tasks), Focus::NewTask, false) => "Enter add | Esc back",
        (Some(Route::Tasks), Focus::Edit, false) => "Enter save | Esc cancel",
    };
    let mut spans = vec![Span::styled(hint, theme.muted)];
    if app.in_flight > 0 {
        spans.insert(0, Span::styled("Working... ", theme.message));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn bordered<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    let style = if focused {
        theme.focused_border
    } else {
        theme.border
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn place_cursor(frame: &mut Frame, rect: Rect, offset: usize) {
    let x = rect.x + 1 + offset as u16;
    frame.set_cursor_position(Position::new(x.min(rect.right().saturating_sub(2)), rect.y + 1));
}
