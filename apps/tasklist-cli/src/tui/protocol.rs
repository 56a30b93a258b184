use crossterm::event::KeyEvent;

use tasklist_core::auth::AuthError;
use tasklist_core::controller::Completion;
use tasklist_core::session::{GateDecision, Route};
use tasklist_core::types::Session;

#[derive(Debug, Clone)]
pub enum UiMsg {
    Key(KeyEvent),
    Resize(u16, u16),
    Gate(GateDecision),
    SignedIn(Result<Session, AuthError>),
    SignedUp(Result<Option<Session>, AuthError>),
    SignedOut(Route),
    Completion(Completion),
}
