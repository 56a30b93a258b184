use std::io;

use anyhow::Context;
use crossterm::event::{Event, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use tasklist_core::auth::AuthProvider;

use crate::bootstrap::Bootstrap;

use super::app::{App, Effect};
use super::protocol::UiMsg;
use super::ui::draw;
use super::update::update;

struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("create terminal")?;
        terminal.clear().context("clear terminal")?;
        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

pub async fn run_tui(mut app: App, boot: Bootstrap) -> anyhow::Result<()> {
    let mut term = TerminalGuard::enter()?;

    let (ui_tx, mut ui_rx) = mpsc::channel::<UiMsg>(1024);

    // Terminal key/resize events.
    {
        let ui_tx = ui_tx.clone();
        tokio::spawn(async move {
            let mut events = EventStream::new();
            while let Some(Ok(ev)) = events.next().await {
                let msg = match ev {
                    Event::Key(key) => UiMsg::Key(key),
                    Event::Resize(w, h) => UiMsg::Resize(w, h),
                    _ => continue,
                };
                if ui_tx.send(msg).await.is_err() {
                    break;
                }
            }
        });
    }

    let size = term.terminal_mut().size().context("read terminal size")?;
    app.width = size.width;
    app.height = size.height;
    app.set_dirty();

    loop {
        for effect in app.take_effects() {
            spawn_effect(&boot, effect, ui_tx.clone());
        }

        if app.dirty {
            term.terminal_mut().draw(|frame| draw(frame, &app))?;
            app.dirty = false;
        }

        if app.should_quit {
            break;
        }

        let Some(msg) = ui_rx.recv().await else {
            break;
        };
        update(&mut app, msg);
    }

    Ok(())
}

/// Run one remote call off the UI loop; its answer comes back as a message.
fn spawn_effect(boot: &Bootstrap, effect: Effect, ui_tx: mpsc::Sender<UiMsg>) {
    let auth = boot.auth.clone();
    let store = boot.store.clone();
    let gate = boot.gate();
    tokio::spawn(async move {
        let msg = match effect {
            Effect::Mount => UiMsg::Gate(gate.resolve().await),
            Effect::SignIn(credentials) => {
                UiMsg::SignedIn(auth.sign_in_with_password(&credentials).await)
            }
            Effect::SignUp(credentials) => UiMsg::SignedUp(auth.sign_up(&credentials).await),
            Effect::SignOut => UiMsg::SignedOut(gate.sign_out().await),
            Effect::Task(request) => UiMsg::Completion(request.execute(store.as_ref()).await),
        };
        let _ = ui_tx.send(msg).await;
    });
}
