pub mod app;
pub mod composer;
pub mod event_loop;
pub mod protocol;
pub mod ui;
pub mod update;

use std::io::IsTerminal;

use anyhow::bail;

use crate::bootstrap::Bootstrap;

use app::App;

pub async fn run_session(boot: Bootstrap) -> anyhow::Result<()> {
    if !std::io::stdout().is_terminal() {
        bail!(
            "interactive terminal unavailable; use the one-shot commands \
             (`tasklist list`, `tasklist add ...`)"
        );
    }
    event_loop::run_tui(App::new(0, 0), boot).await
}
