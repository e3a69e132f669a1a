mod cli;
mod debounce;
mod model;
mod output;
mod storage;
mod store;
mod tui;
mod watch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Command};
use model::{Draft, Kind, Status, Task};
use storage::FileStorage;
use store::{StatusFilter, TaskStore};

fn default_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".ticklist"))
}

fn resolve_dir(cli_dir: Option<String>) -> Result<PathBuf> {
    match cli_dir {
        Some(d) => Ok(PathBuf::from(d)),
        None => default_dir(),
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

fn open_store(dir: &Path) -> Result<TaskStore<FileStorage>> {
    TaskStore::load(FileStorage::new(dir))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let dir = resolve_dir(cli.dir)?;
    ensure_dir(&dir)?;

    match cli.command {
        Command::Add {
            name,
            kind,
            minutes,
        } => {
            let mut store = open_store(&dir)?;
            let draft = Draft {
                name: Some(name.clone()),
                kind: kind.as_deref().map(Kind::parse).transpose()?,
                duration_minutes: minutes,
                status: None,
            };
            match store.create(draft)? {
                Some(id) => eprintln!("Added task {id} '{name}'"),
                None => eprintln!("Nothing added: name must not be empty"),
            }
        }

        Command::Edit {
            id,
            name,
            kind,
            minutes,
            status,
        } => {
            let mut store = open_store(&dir)?;
            let draft = Draft {
                name,
                kind: kind.as_deref().map(Kind::parse).transpose()?,
                duration_minutes: minutes,
                status: status.as_deref().map(Status::parse).transpose()?,
            };
            if store.update(id, draft)? {
                eprintln!("Updated task {id}");
            } else {
                eprintln!("Nothing changed for task {id}");
            }
        }

        Command::Rm { id } => {
            let mut store = open_store(&dir)?;
            if store.remove(id)? {
                eprintln!("Removed task {id}");
            } else {
                eprintln!("No task with id {id}");
            }
        }

        Command::Toggle { id } => {
            let mut store = open_store(&dir)?;
            if store.toggle_done(id)? {
                let done = store.get(id).map(|t| t.done).unwrap_or(false);
                eprintln!(
                    "Task {id} {}",
                    if done { "checked off" } else { "unchecked" }
                );
            } else {
                eprintln!("No task with id {id}");
            }
        }

        Command::Show { id } => {
            let store = open_store(&dir)?;
            match store.get(id) {
                Some(task) => print!("{}", output::format_task_detail(task)),
                None => eprintln!("No task with id {id}"),
            }
        }

        Command::List {
            status,
            search,
            json,
        } => {
            let store = open_store(&dir)?;
            let filter = StatusFilter::parse(&status)?;
            let term = search.unwrap_or_default();
            let tasks: Vec<&Task> = store.filtered_view(filter, &term).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print!("{}", output::format_task_list(&tasks));
            }
        }

        Command::Ui {
            debounce,
            poll_interval,
        } => {
            tui::run(&dir, debounce, poll_interval)?;
        }
    }

    Ok(())
}
