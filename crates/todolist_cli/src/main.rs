//! Command-line front-end for the to-do list.
//!
//! # Responsibility
//! - Map subcommands onto `TodoList` use cases.
//! - Translate 1-based list numbers into stable task IDs.
//! - Print user-facing messages; business state lives in core.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use todolist_core::{
    init_logging, AppConfig, ConfigOverrides, JsonTaskStore, NewTask, Priority, TaskId, TodoList,
};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "todolist", version, about = "Single-user to-do list with points and levels")]
struct Cli {
    /// Directory holding tasks.json, score.json and logs/
    #[arg(long, global = true, env = "TODOLIST_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// trace | debug | info | warn | error
    #[arg(long, global = true, env = "TODOLIST_LOG_LEVEL")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum, default_value_t = PriorityArg::Low)]
        priority: PriorityArg,
    },
    /// List tasks with their numbers
    List,
    /// Mark a task completed (list number or task id)
    Complete { task: TaskSelector },
    /// Delete a task (list number or task id)
    Delete { task: TaskSelector },
    /// Find the first task whose title contains QUERY
    Search { query: String },
    /// Show the dashboard
    Summary,
    /// Print the core version
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

/// How the user picked a task on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TaskSelector {
    /// 1-based number as printed by `list`.
    Number(usize),
    Id(TaskId),
}

impl FromStr for TaskSelector {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if let Ok(number) = raw.parse::<usize>() {
            if number == 0 {
                return Err("task numbers start at 1".to_string());
            }
            return Ok(Self::Number(number));
        }
        Uuid::parse_str(raw)
            .map(Self::Id)
            .map_err(|_| format!("`{raw}` is neither a task number nor a task id"))
    }
}

impl TaskSelector {
    fn resolve(self, list: &TodoList<JsonTaskStore>) -> Result<TaskId> {
        match self {
            Self::Number(number) => list
                .id_at(number - 1)
                .with_context(|| format!("Selection Error: no task #{number}")),
            Self::Id(id) => Ok(id),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = match cli.data_dir {
        Some(dir) => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            Some(absolute_from(dir, &cwd))
        }
        None => None,
    };
    let config = AppConfig::resolve(&ConfigOverrides {
        data_dir,
        log_level: cli.log_level,
    })
    .context("invalid configuration")?;

    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok command={}",
        command_name(&cli.command)
    );

    let mut list = TodoList::open(config.store())
        .with_context(|| format!("failed to load tasks from `{}`", config.tasks_file.display()))?;

    match cli.command {
        Command::Add {
            title,
            category,
            description,
            priority,
        } => {
            let input = NewTask::new(title, category)
                .description(description)
                .priority(priority.into());
            let task = list.add(input).context("Input Error")?;
            println!("Added #{}: {task}", list.len());
        }
        Command::List => {
            if list.is_empty() {
                println!("No tasks.");
            }
            for (index, task) in list.tasks().iter().enumerate() {
                println!("{:>3}. {task}", index + 1);
            }
        }
        Command::Complete { task } => {
            let id = task.resolve(&list)?;
            let outcome = list.complete(id).context("Selection Error")?;
            for message in outcome.messages() {
                println!("{message}");
            }
        }
        Command::Delete { task } => {
            let id = task.resolve(&list)?;
            let removed = list.delete(id).context("Selection Error")?;
            println!("Task '{}' has been deleted.", removed.title);
        }
        Command::Search { query } => match list.search(&query) {
            Some(index) => println!("{:>3}. {}", index + 1, list.tasks()[index]),
            None => println!("No matching task found."),
        },
        Command::Summary => println!("{}", list.summary()),
        Command::Version => println!("todolist_core version={}", todolist_core::core_version()),
    }

    Ok(())
}

/// Relative `--data-dir` values are taken from where the user ran the command.
fn absolute_from(dir: PathBuf, cwd: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir
    } else {
        cwd.join(dir)
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add { .. } => "add",
        Command::List => "list",
        Command::Complete { .. } => "complete",
        Command::Delete { .. } => "delete",
        Command::Search { .. } => "search",
        Command::Summary => "summary",
        Command::Version => "version",
    }
}

#[cfg(test)]
mod tests {
    use super::{absolute_from, Cli, Command, TaskSelector};
    use clap::Parser;
    use std::path::PathBuf;
    use uuid::Uuid;

    #[test]
    fn selector_accepts_numbers_and_ids() {
        assert_eq!("3".parse::<TaskSelector>(), Ok(TaskSelector::Number(3)));
        let id = Uuid::new_v4();
        assert_eq!(
            id.to_string().parse::<TaskSelector>(),
            Ok(TaskSelector::Id(id))
        );
    }

    #[test]
    fn selector_rejects_zero_and_garbage() {
        assert!("0".parse::<TaskSelector>().is_err());
        assert!("first".parse::<TaskSelector>().is_err());
    }

    #[test]
    fn add_defaults_priority_to_low() {
        let cli = Cli::try_parse_from([
            "todolist",
            "add",
            "--title",
            "Buy milk",
            "--category",
            "errands",
        ])
        .unwrap();
        match cli.command {
            Command::Add {
                title, priority, ..
            } => {
                assert_eq!(title, "Buy milk");
                assert!(matches!(priority, super::PriorityArg::Low));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn relative_data_dir_resolves_against_working_dir() {
        let cwd = std::env::temp_dir().join("todolist-cwd");
        let cli = Cli::try_parse_from(["todolist", "--data-dir", "./data", "list"]).unwrap();
        let dir = absolute_from(cli.data_dir.unwrap(), &cwd);
        assert!(dir.is_absolute());
        assert_eq!(dir, cwd.join("./data"));

        let absolute = std::env::temp_dir().join("elsewhere");
        assert_eq!(absolute_from(absolute.clone(), &cwd), absolute);
        assert_eq!(
            absolute_from(PathBuf::from("nested/dir"), &cwd),
            cwd.join("nested").join("dir")
        );
    }
}
