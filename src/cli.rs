use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ticklist", about = "Personal task list in your terminal")]
pub struct Cli {
    /// Directory holding the task data [default: ~/.ticklist]
    #[arg(long, env = "TICKLIST_DIR", global = true)]
    pub dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a task
    Add {
        /// Display name
        name: String,
        /// Category (homework, cleaning, work)
        #[arg(short, long)]
        kind: Option<String>,
        /// Estimated duration in minutes
        #[arg(short, long)]
        minutes: Option<u32>,
    },

    /// Edit a task
    Edit {
        /// Task id
        id: u64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New category (homework, cleaning, work)
        #[arg(short, long)]
        kind: Option<String>,
        /// New duration in minutes
        #[arg(short, long)]
        minutes: Option<u32>,
        /// New status (pending, completed)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Remove a task
    Rm {
        /// Task id
        id: u64,
    },

    /// Flip the done checkmark on a task
    Toggle {
        /// Task id
        id: u64,
    },

    /// Show task details
    Show {
        /// Task id
        id: u64,
    },

    /// List tasks
    List {
        /// Filter by status (all, pending, completed)
        #[arg(long, default_value = "all")]
        status: String,
        /// Only tasks whose name contains this text
        #[arg(long)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Launch the interactive UI
    Ui {
        /// Search debounce delay in milliseconds
        #[arg(long, default_value = "500")]
        debounce: u64,
        /// Poll interval in milliseconds
        #[arg(long, default_value = "1000")]
        poll_interval: u64,
    },
}
