//! One-shot subcommands. Each runs through the session gate first.

use anyhow::bail;

use tasklist_core::controller::{Dispatch, TaskListController, TaskResponse};
use tasklist_core::session::{EntryForm, GateDecision, Route, SIGN_UP_CONFIRMATION};
use tasklist_core::types::{Task, TaskId};

use crate::bootstrap::Bootstrap;

pub async fn sign_up(boot: &Bootstrap, email: String, password: String) -> anyhow::Result<()> {
    let mut form = entry_form(email, password);
    form.sign_up(boot.auth.as_ref()).await;
    match form.message() {
        Some(message) if message == SIGN_UP_CONFIRMATION => {
            println!("{}", message);
            Ok(())
        }
        Some(message) => bail!("{}", message),
        None => Ok(()),
    }
}

pub async fn sign_in(boot: &Bootstrap, email: String, password: String) -> anyhow::Result<()> {
    let mut form = entry_form(email, password);
    match form.sign_in(boot.auth.as_ref()).await {
        Route::Tasks => {
            println!("Signed in as {}", form.email.trim());
            Ok(())
        }
        Route::Entry => bail!("{}", form.message().unwrap_or("sign-in failed")),
    }
}

pub async fn sign_out(boot: &Bootstrap) -> anyhow::Result<()> {
    boot.gate().sign_out().await;
    println!("Signed out");
    Ok(())
}

pub async fn whoami(boot: &Bootstrap) -> anyhow::Result<()> {
    match boot.gate().resolve().await {
        GateDecision::Proceed(identity) => {
            println!("Logged in as: {}", identity.display_name());
            Ok(())
        }
        GateDecision::Redirect(route) => bail!("{}", not_signed_in(route)),
    }
}

pub async fn list(boot: &Bootstrap) -> anyhow::Result<()> {
    let controller = mounted(boot).await?;
    if let Some(identity) = controller.identity() {
        println!("Logged in as: {}", identity.display_name());
    }
    if controller.tasks().is_empty() {
        println!("No tasks");
    }
    for task in controller.tasks() {
        println!("{}", format_task(task));
    }
    Ok(())
}

pub async fn add(boot: &Bootstrap, title: &str) -> anyhow::Result<()> {
    let mut controller = mounted(boot).await?;
    match controller.add(boot.store.as_ref(), title).await {
        Dispatch::Skipped => bail!("task title must not be empty"),
        Dispatch::Applied(TaskResponse::Inserted(rows)) => {
            for task in &rows {
                println!("{}", format_task(task));
            }
            Ok(())
        }
        Dispatch::Applied(_) => Ok(()),
        Dispatch::Failed(err) => bail!("add task failed: {}", err),
    }
}

pub async fn edit(boot: &Bootstrap, id: TaskId, title: &str) -> anyhow::Result<()> {
    let mut controller = mounted(boot).await?;
    if !controller.begin_edit(id) {
        bail!("task {} not found", id);
    }
    controller.set_edit_buffer(title);
    match controller.save_edit(boot.store.as_ref(), id).await {
        Dispatch::Skipped => bail!("task title must not be empty"),
        Dispatch::Applied(_) => {
            if let Some(task) = controller.task(id) {
                println!("{}", format_task(task));
            }
            Ok(())
        }
        Dispatch::Failed(err) => bail!("update task failed: {}", err),
    }
}

pub async fn toggle(boot: &Bootstrap, id: TaskId, checked: bool) -> anyhow::Result<()> {
    let mut controller = mounted(boot).await?;
    match controller.toggle(boot.store.as_ref(), id, checked).await {
        Dispatch::Applied(TaskResponse::Updated(0)) => bail!("task {} not found", id),
        Dispatch::Applied(_) => {
            if let Some(task) = controller.task(id) {
                println!("{}", format_task(task));
            }
            Ok(())
        }
        Dispatch::Skipped => Ok(()),
        Dispatch::Failed(err) => bail!("toggle task failed: {}", err),
    }
}

pub async fn delete(boot: &Bootstrap, id: TaskId) -> anyhow::Result<()> {
    let mut controller = mounted(boot).await?;
    match controller.delete(boot.store.as_ref(), id).await {
        Dispatch::Applied(TaskResponse::Deleted(0)) => bail!("task {} not found", id),
        Dispatch::Applied(_) => {
            println!("Deleted task {}", id);
            Ok(())
        }
        Dispatch::Skipped => Ok(()),
        Dispatch::Failed(err) => bail!("delete task failed: {}", err),
    }
}

fn entry_form(email: String, password: String) -> EntryForm {
    let mut form = EntryForm::new();
    form.email = email;
    form.password = password;
    form
}

/// Resolve the identity and load its tasks, or stop at the entry redirect.
async fn mounted(boot: &Bootstrap) -> anyhow::Result<TaskListController> {
    let mut controller = TaskListController::new();
    match controller.mount(&boot.gate(), boot.store.as_ref()).await {
        Route::Tasks => Ok(controller),
        route => bail!("{}", not_signed_in(route)),
    }
}

fn not_signed_in(route: Route) -> String {
    format!(
        "not signed in (redirected to {}); run `tasklist signin <email> <password>`",
        route.path()
    )
}

fn format_task(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!("[{}] {:>4}  {}", mark, task.id, task.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tasklist_config::TasklistConfig;
    use tasklist_core::auth::AuthProvider;
    use tasklist_core::store::TaskStore;
    use tasklist_stores::{InMemoryAuthProvider, InMemoryTaskStore};

    fn in_memory_boot() -> (Bootstrap, Arc<InMemoryTaskStore>) {
        let store = Arc::new(InMemoryTaskStore::new());
        let auth: Arc<dyn AuthProvider> = Arc::new(InMemoryAuthProvider::new());
        let shared: Arc<dyn TaskStore> = store.clone();
        let boot = Bootstrap {
            config: TasklistConfig::default(),
            auth,
            store: shared,
        };
        (boot, store)
    }

    #[test]
    fn test_commands_require_sign_in() {
        tokio_test::block_on(async {
            let (boot, store) = in_memory_boot();
            let err = add(&boot, "Buy milk").await.unwrap_err();
            assert!(err.to_string().contains("not signed in"));
            assert!(whoami(&boot).await.is_err());
            assert!(store.is_empty());
        });
    }

    #[test]
    fn test_task_lifecycle_through_commands() {
        tokio_test::block_on(async {
            let (boot, store) = in_memory_boot();
            sign_up(&boot, "a@example.com".to_string(), "secret1".to_string())
                .await
                .unwrap();
            whoami(&boot).await.unwrap();

            add(&boot, "  Buy milk ").await.unwrap();
            assert!(add(&boot, "   ").await.is_err());
            assert_eq!(store.len(), 1);

            edit(&boot, 1, "Buy oat milk").await.unwrap();
            toggle(&boot, 1, true).await.unwrap();
            assert!(toggle(&boot, 99, true).await.is_err());
            list(&boot).await.unwrap();

            delete(&boot, 1).await.unwrap();
            assert!(delete(&boot, 1).await.is_err());
            assert!(store.is_empty());

            sign_out(&boot).await.unwrap();
            assert!(list(&boot).await.is_err());
        });
    }

    #[test]
    fn test_sign_in_failure_reports_provider_message() {
        tokio_test::block_on(async {
            let (boot, _store) = in_memory_boot();
            let err = sign_in(&boot, "a@example.com".to_string(), "nope".to_string())
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "Error signing in: Invalid login credentials");
        });
    }

    #[test]
    fn test_format_task() {
        let task = Task {
            id: 12,
            title: "Walk dog".to_string(),
            completed: true,
            user_id: "u-1".to_string(),
        };
        assert_eq!(format_task(&task), "[x]   12  Walk dog");
    }
}
