use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use taskboard_client::{BulkAction, ClientError, DEFAULT_API_URL, TaskApi, TaskManager, view};
use taskboard_core::{Filter, Priority, SortMethod, TaskId};

pub use view::render;

#[derive(Parser, Debug)]
#[command(name = "taskboard", about = "Track tasks against a taskboard server")]
pub struct Cli {
    /// Base URL of the task API.
    #[arg(long, env = "TASKBOARD_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Which tasks to show: all, active or completed.
    #[arg(long, default_value = "all")]
    pub filter: Filter,

    /// default, priority_desc, text_asc, text_desc or completed_desc.
    #[arg(long, default_value = "default")]
    pub sort: SortMethod,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Show the task list (the default).
    List,
    /// Add a task.
    Add {
        text: String,
        #[arg(long, default_value = "Medium")]
        priority: Priority,
    },
    /// Flip a task between done and not done.
    Toggle { id: TaskId },
    /// Change the text, and optionally the priority, of a task.
    Edit {
        id: TaskId,
        text: String,
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Change only the priority of a task.
    Priority { id: TaskId, priority: Priority },
    /// Delete a task.
    Delete { id: TaskId },
    /// Apply an action to several tasks at once.
    Bulk {
        /// complete or delete
        action: BulkAction,
        #[arg(required = true)]
        ids: Vec<TaskId>,
        /// Skip the confirmation prompt for bulk delete.
        #[arg(long)]
        yes: bool,
    },
}

/// Runs one command against the manager, asking `confirm` before bulk deletes.
///
/// Returns `Ok(false)` when the user declined the confirmation.
pub async fn execute<A: TaskApi>(
    manager: &mut TaskManager<A>,
    command: Commands,
    confirm: impl FnOnce(&str) -> bool,
) -> Result<bool, ClientError> {
    match command {
        Commands::List => {}
        Commands::Add { text, priority } => {
            manager.set_task_text(text);
            if manager.add_task(priority).await?.is_none() {
                return Err(ClientError::Validation(
                    "Task text is required".to_string(),
                ));
            }
        }
        Commands::Toggle { id } => manager.toggle_complete(id).await?,
        Commands::Edit { id, text, priority } => {
            let current = manager
                .tasks()
                .iter()
                .find(|task| task.id == id)
                .map(|task| task.priority);
            let Some(current) = current else {
                return Err(ClientError::NotFound(format!("Task {id} not found")));
            };
            manager
                .save_edit(id, &text, priority.unwrap_or(current))
                .await?
        }
        Commands::Priority { id, priority } => manager.update_priority(id, priority).await?,
        Commands::Delete { id } => manager.delete_task(id).await?,
        Commands::Bulk { action, ids, yes } => {
            manager.clear_selections();
            for id in ids {
                if !manager.is_selected(id) {
                    manager.toggle_select(id);
                }
            }
            if action == BulkAction::Delete && !yes {
                let question = format!(
                    "Are you sure you want to delete {} selected tasks?",
                    manager.selected_ids().len()
                );
                if !confirm(&question) {
                    manager.clear_selections();
                    return Ok(false);
                }
            }
            manager.bulk_action(action).await?
        }
    }
    Ok(true)
}

/// Asks a yes/no question on the terminal.
pub fn confirm_on_terminal(question: &str) -> bool {
    print!("{question} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_parse_defaults() {
        let cli = Cli::try_parse_from(["taskboard"]).unwrap();

        assert_eq!(cli.filter, Filter::All);
        assert_eq!(cli.sort, SortMethod::Default);
        assert!(cli.command.is_none());
    }

    #[test]
    fn can_parse_add_with_priority() {
        let cli = Cli::try_parse_from([
            "taskboard",
            "--filter",
            "active",
            "--sort",
            "priority_desc",
            "add",
            "buy milk",
            "--priority",
            "High",
        ])
        .unwrap();

        assert_eq!(cli.filter, Filter::Active);
        assert_eq!(cli.sort, SortMethod::PriorityDesc);
        assert!(matches!(
            cli.command,
            Some(Commands::Add { ref text, priority: Priority::High }) if text == "buy milk"
        ));
    }

    #[test]
    fn can_parse_bulk_delete() {
        let cli =
            Cli::try_parse_from(["taskboard", "bulk", "delete", "1", "3", "--yes"]).unwrap();

        assert!(matches!(
            cli.command,
            Some(Commands::Bulk { action: BulkAction::Delete, ref ids, yes: true }) if ids == &vec![1, 3]
        ));
    }

    #[test]
    fn can_reject_unknown_priority() {
        let result = Cli::try_parse_from(["taskboard", "add", "x", "--priority", "Urgent"]);
        assert!(result.is_err());
    }

    #[test]
    fn can_require_ids_for_bulk() {
        let result = Cli::try_parse_from(["taskboard", "bulk", "complete"]);
        assert!(result.is_err());
    }
}
