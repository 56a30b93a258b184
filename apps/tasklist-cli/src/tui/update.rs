use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use tasklist_core::session::{GateDecision, Route};

use super::app::{App, Effect, EntryField, Focus, Grab};
use super::composer::Composer;
use super::protocol::UiMsg;

pub fn update(app: &mut App, msg: UiMsg) {
    match msg {
        UiMsg::Resize(w, h) => {
            app.width = w;
            app.height = h;
        }
        UiMsg::Key(key) => {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                app.should_quit = true;
            } else {
                match app.route {
                    Some(Route::Entry) => handle_entry_key(app, key),
                    Some(Route::Tasks) => handle_tasks_key(app, key),
                    None => {
                        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                            app.should_quit = true;
                        }
                    }
                }
            }
        }
        UiMsg::Gate(decision) => {
            app.settle();
            match decision {
                GateDecision::Proceed(identity) => {
                    app.controller.set_identity(Some(identity));
                    app.reset_task_view();
                    app.route = Some(Route::Tasks);
                    let load = app.controller.request_load();
                    app.queue_request(load);
                }
                GateDecision::Redirect(route) => {
                    app.controller.set_identity(None);
                    app.route = Some(route);
                }
            }
        }
        UiMsg::SignedIn(result) => {
            app.settle();
            if app.entry.apply_sign_in(result) == Route::Tasks {
                app.password.clear();
                app.queue(Effect::Mount);
            }
        }
        UiMsg::SignedUp(result) => {
            app.settle();
            app.entry.apply_sign_up(result);
        }
        UiMsg::SignedOut(route) => {
            app.settle();
            app.controller.set_identity(None);
            app.reset_task_view();
            app.route = Some(route);
        }
        UiMsg::Completion(completion) => {
            app.settle();
            app.controller.apply(completion);
            if app.focus == Focus::Edit && app.controller.editing().is_none() {
                app.focus = Focus::List;
            }
            if let Some(grab) = app.grab {
                if app.controller.task(grab.task_id).is_none() {
                    app.grab = None;
                }
            }
            if app.new_task.buffer != app.controller.new_task() {
                app.new_task = Composer::with_text(app.controller.new_task());
            }
            app.clamp_selection();
        }
    }
    app.set_dirty();
}

fn handle_entry_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.entry_field = match app.entry_field {
                EntryField::Email => EntryField::Password,
                EntryField::Password => EntryField::Email,
            };
        }
        KeyCode::Enter => {
            sync_entry(app);
            app.queue(Effect::SignIn(app.entry.credentials()));
        }
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            sync_entry(app);
            app.queue(Effect::SignUp(app.entry.credentials()));
        }
        _ => {
            let field = match app.entry_field {
                EntryField::Email => &mut app.email,
                EntryField::Password => &mut app.password,
            };
            field.on_key(key);
        }
    }
}

fn sync_entry(app: &mut App) {
    app.entry.email = app.email.buffer.clone();
    app.entry.password = app.password.buffer.clone();
}

fn handle_tasks_key(app: &mut App, key: KeyEvent) {
    match app.focus {
        Focus::NewTask => handle_new_task_key(app, key),
        Focus::Edit => handle_edit_key(app, key),
        Focus::List if app.grab.is_some() => handle_grab_key(app, key),
        Focus::List => handle_list_key(app, key),
    }
}

fn handle_new_task_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Tab => app.focus = Focus::List,
        KeyCode::Enter => {
            let request = app.controller.request_add_pending();
            app.queue_request(request);
        }
        _ => {
            if app.new_task.on_key(key) {
                app.controller.set_new_task(app.new_task.buffer.clone());
            }
        }
    }
}

fn handle_edit_key(app: &mut App, key: KeyEvent) {
    let Some(task_id) = app.controller.editing().map(|edit| edit.task_id) else {
        app.focus = Focus::List;
        return;
    };
    match key.code {
        KeyCode::Esc => {
            app.controller.cancel_edit();
            app.edit.clear();
            app.focus = Focus::List;
        }
        KeyCode::Enter => {
            let request = app.controller.request_save_edit(task_id);
            if !app.queue_request(request) {
                debug!(task_id, "blank title; edit not saved");
            }
        }
        _ => {
            if app.edit.on_key(key) {
                app.controller.set_edit_buffer(app.edit.buffer.clone());
            }
        }
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.selected = app.selected.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => {
            app.selected = app.selected.saturating_add(1);
            app.clamp_selection();
        }
        KeyCode::Char('a') | KeyCode::Tab => app.focus = Focus::NewTask,
        KeyCode::Char('s') => app.queue(Effect::SignOut),
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some((id, completed)) = app.selected_task().map(|t| (t.id, t.completed)) {
                let request = app.controller.request_toggle(id, !completed);
                app.queue_request(request);
            }
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(id) = app.selected_task().map(|t| t.id) {
                if app.controller.begin_edit(id) {
                    let buffer = app
                        .controller
                        .editing()
                        .map(|edit| edit.buffer.clone())
                        .unwrap_or_default();
                    app.edit = Composer::with_text(&buffer);
                    app.focus = Focus::Edit;
                }
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app.selected_task().map(|t| t.id) {
                let request = app.controller.request_delete(id);
                app.queue_request(request);
            }
        }
        KeyCode::Char('m') => {
            if let Some(id) = app.selected_task().map(|t| t.id) {
                app.grab = Some(Grab {
                    task_id: id,
                    origin: app.selected,
                });
            }
        }
        _ => {}
    }
}

fn handle_grab_key(app: &mut App, key: KeyEvent) {
    let Some(grab) = app.grab else {
        return;
    };
    match key.code {
        KeyCode::Up | KeyCode::Char('k') if app.selected > 0 => {
            move_grabbed(app, grab, app.selected - 1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_grabbed(app, grab, app.selected + 1);
        }
        KeyCode::Char('m') | KeyCode::Enter => app.grab = None,
        KeyCode::Esc => {
            move_grabbed(app, grab, grab.origin);
            app.grab = None;
        }
        _ => {}
    }
}

fn move_grabbed(app: &mut App, grab: Grab, to: usize) {
    let Some(over) = app.controller.tasks().get(to).map(|t| t.id) else {
        return;
    };
    if app.controller.reorder(grab.task_id, over) {
        app.selected = to;
    }
}
