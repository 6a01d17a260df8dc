use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use std::path::PathBuf;
use todostore::{Config, FilterMode, Task, TaskStore, format_timestamp};

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "TodoStore CLI - task list with a JSON slot persisted per mutation")]
#[command(version)]
struct Cli {
    /// Path to the slot file (overrides config and the platform default)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Filter mode for list output: all, active or completed
    #[arg(short, long)]
    filter: Option<FilterMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task text (joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// List tasks under the current filter
    List,

    /// Toggle a task's completed flag
    Done { id: i64 },

    /// Delete a task
    Rm { id: i64 },

    /// Replace a task's text (empty text deletes the task)
    Edit {
        id: i64,
        text: Vec<String>,
    },

    /// Toggle every task in the current view at once
    ToggleAll,

    /// Remove all completed tasks
    ClearCompleted,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let slot_path = cli.store_path.unwrap_or_else(|| config.slot_path());

    let mut store = TaskStore::open(&slot_path)?;
    store.set_filter_mode(cli.filter.unwrap_or(config.default_filter));

    match cli.command {
        Commands::Add { text } => {
            match store.add(&text.join(" ")) {
                Some(id) => println!("Added task {}", id),
                None => println!("Nothing to add"),
            }
        }
        Commands::List => {
            print_tasks(&store.filtered(), store.filter_mode());
        }
        Commands::Done { id } => {
            store.toggle_complete(id);
            println!("Toggled task {}", id);
        }
        Commands::Rm { id } => {
            store.delete(id);
            println!("Deleted task {}", id);
        }
        Commands::Edit { id, text } => {
            store.edit_text(id, &text.join(" "));
            println!("Edited task {}", id);
        }
        Commands::ToggleAll => {
            let visible: Vec<i64> = store.filtered().iter().map(|t| t.id).collect();
            store.select_all(&visible);
            println!("Toggled {} visible tasks", visible.len());
        }
        Commands::ClearCompleted => {
            store.clear_completed();
            println!("Cleared completed tasks");
        }
    }

    Ok(())
}

fn print_tasks(tasks: &[&Task], mode: FilterMode) {
    println!("Tasks ({}) [{}]", tasks.len(), mode);

    for task in tasks {
        let mark = if task.completed {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        let text = if task.completed {
            task.text.strikethrough().dimmed()
        } else {
            task.text.normal()
        };
        let when = match task.completed_at {
            Some(ts) => format!("done {}", format_timestamp(ts)),
            None => format_timestamp(task.created_at),
        };
        println!("{} {:>14}  {}  {}", mark, task.id, text, when.dimmed());
    }
}
