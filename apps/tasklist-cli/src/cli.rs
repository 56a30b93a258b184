use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::bootstrap::{Bootstrap, LogTarget};
use crate::commands;

const DEFAULT_CONFIG: &str = "configs/tasklist.yaml";

#[derive(Debug, Parser)]
#[command(name = "tasklist", about = "To-do list manager")]
pub struct Cli {
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account
    Signup(CredentialArgs),
    /// Sign in with email and password
    Signin(CredentialArgs),
    /// Sign out and forget the stored session
    Signout,
    /// Show the signed-in identity
    Whoami,
    /// List your tasks
    List,
    /// Add a task
    Add(TitleArgs),
    /// Rename a task
    Edit(EditArgs),
    /// Mark a task completed (or not, with --undo)
    Toggle(ToggleArgs),
    /// Delete a task
    Delete(IdArgs),
    /// Interactive terminal UI (default)
    Tui,
}

#[derive(Debug, Args, Clone)]
struct CredentialArgs {
    email: String,
    password: String,
}

#[derive(Debug, Args, Clone)]
struct TitleArgs {
    #[arg(value_name = "TITLE", required = true)]
    title: Vec<String>,
}

#[derive(Debug, Args, Clone)]
struct EditArgs {
    id: i64,
    #[arg(value_name = "TITLE", required = true)]
    title: Vec<String>,
}

#[derive(Debug, Args, Clone)]
struct ToggleArgs {
    id: i64,
    #[arg(long)]
    undo: bool,
}

#[derive(Debug, Args, Clone)]
struct IdArgs {
    id: i64,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Tui);
        let log_target = match command {
            Command::Tui => LogTarget::FileOrSilent,
            _ => LogTarget::Stderr,
        };
        let boot = Bootstrap::from_config(&self.config, self.verbose, log_target)?;

        match command {
            Command::Signup(args) => commands::sign_up(&boot, args.email, args.password).await,
            Command::Signin(args) => commands::sign_in(&boot, args.email, args.password).await,
            Command::Signout => commands::sign_out(&boot).await,
            Command::Whoami => commands::whoami(&boot).await,
            Command::List => commands::list(&boot).await,
            Command::Add(args) => commands::add(&boot, &args.title.join(" ")).await,
            Command::Edit(args) => commands::edit(&boot, args.id, &args.title.join(" ")).await,
            Command::Toggle(args) => commands::toggle(&boot, args.id, !args.undo).await,
            Command::Delete(args) => commands::delete(&boot, args.id).await,
            Command::Tui => crate::tui::run_session(boot).await,
        }
    }
}
