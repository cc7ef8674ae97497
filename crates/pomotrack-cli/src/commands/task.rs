//! Task management commands for CLI.

use clap::Subcommand;
use pomotrack_core::{NewTask, Priority, TaskFilter, TaskUpdate};

use super::{print_json, CliResult, Workspace};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Estimated pomodoros (default: 1)
        #[arg(long, default_value = "1")]
        pomodoros: u32,
        /// Priority: low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
    /// List tasks
    List {
        /// all, active or completed
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
        /// Only titles containing this text
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show, set or clear the task credited with finished work phases
    Current {
        /// Task ID to make current
        id: Option<String>,
        /// Clear the current task
        #[arg(long, conflicts_with = "id")]
        clear: bool,
    },
    /// Mark a task completed
    Done {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Remove all completed tasks
    Clear,
}

pub fn run(action: TaskAction) -> CliResult {
    let mut ws = Workspace::open()?;

    match action {
        TaskAction::Add {
            title,
            description,
            pomodoros,
            priority,
        } => {
            let task = ws.app.add_task(NewTask {
                title,
                description,
                pomodoros,
                priority,
            })?;
            print_json(&task)?;
        }
        TaskAction::List { filter, search } => {
            print_json(&ws.app.tasks().filtered(filter, &search))?;
            return Ok(());
        }
        TaskAction::Current { id, clear } => {
            if clear {
                ws.app.set_current_task(None)?;
            } else if let Some(id) = id.as_deref() {
                ws.app.set_current_task(Some(id))?;
            }
            print_json(&ws.app.tasks().current())?;
        }
        TaskAction::Done { id } => {
            let task = ws.app.update_task(
                &id,
                TaskUpdate {
                    completed: Some(true),
                    ..Default::default()
                },
            )?;
            print_json(&task)?;
        }
        TaskAction::Delete { id } => {
            let task = ws.app.delete_task(&id)?;
            eprintln!("Task deleted: {}", task.title);
        }
        TaskAction::Clear => {
            let removed = ws.app.clear_completed_tasks();
            eprintln!("Removed {removed} completed task(s)");
        }
    }

    ws.commit(&[])?;
    Ok(())
}
