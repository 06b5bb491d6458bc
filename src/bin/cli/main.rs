mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kata-cli", about = "Coding practice tracker CLI", version)]
struct Cli {
    /// Use a specific data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Log a practice attempt (creates the problem if new)
    Add {
        /// Catalog number
        lc_num: String,
        /// Problem title
        title: String,
        /// Attempt notes in markdown (use "-" to read from stdin)
        #[arg(long)]
        notes: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Importance tier (low|medium|high)
        #[arg(long)]
        importance: Option<String>,
    },

    /// List problems, pinned first, in the active sort order
    List {
        /// Text search over catalog number, title, and tags
        #[arg(long, default_value = "")]
        search: String,
        /// Comma-separated tag filter (any match)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Show a problem with its attempt history
    Show {
        /// Problem id
        id: i64,
    },

    /// Review queue operations
    #[command(subcommand)]
    Review(ReviewCommand),

    /// Tag management
    #[command(subcommand)]
    Tags(TagsCommand),

    /// Pin a problem to the top of the list
    Pin {
        /// Problem id
        id: i64,
    },

    /// Unpin a problem
    Unpin {
        /// Problem id
        id: i64,
    },

    /// Show or set the list sort preference
    Sort {
        /// Ordering after pins: last_attempt, importance, or review_due
        preference: Option<String>,
    },

    /// Show the dashboard summary
    Stats,

    /// Delete a problem and its entire history
    Delete {
        /// Problem id
        id: i64,
    },
}

#[derive(Subcommand)]
enum ReviewCommand {
    /// Show today's review prompts (respects the daily limit)
    List {
        /// Ask for one prompt past the daily limit
        #[arg(long)]
        another: bool,
        /// Maximum prompts to fetch (clamped to 1-5)
        #[arg(long, default_value = "1")]
        limit: usize,
    },

    /// Record a completed review
    Done {
        /// Problem id
        id: i64,
        /// Recall grade (again|good|easy)
        #[arg(long, default_value = "good")]
        grade: String,
    },

    /// Snooze a problem until a date
    Snooze {
        /// Problem id
        id: i64,
        /// Date to resurface on (YYYY-MM-DD)
        #[arg(long)]
        until: String,
    },
}

#[derive(Subcommand)]
enum TagsCommand {
    /// List all tags
    List,

    /// Create a tag
    Add {
        /// Tag name
        name: String,
    },

    /// Rename a tag across all problems
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },
}

/// Resolve "-" as an explicit stdin read.
fn resolve_notes(notes: String) -> String {
    if notes == "-" {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
        buf
    } else {
        notes
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut app = app::App::new(cli.data_dir.as_deref())?;

    match cli.command {
        Command::Add {
            lc_num,
            title,
            notes,
            tags,
            importance,
        } => {
            let notes = resolve_notes(notes);
            commands::add::run(
                &mut app,
                &lc_num,
                &title,
                &notes,
                tags.as_deref(),
                importance.as_deref(),
                &cli.format,
            )?;
        }
        Command::List { search, tags } => {
            commands::list::run(&app, &search, tags.as_deref(), &cli.format)?;
        }
        Command::Show { id } => {
            commands::show::run(&app, id, &cli.format)?;
        }
        Command::Review(subcmd) => match subcmd {
            ReviewCommand::List { another, limit } => {
                commands::review::run_list(&mut app, another, limit, &cli.format)?;
            }
            ReviewCommand::Done { id, grade } => {
                commands::review::run_done(&mut app, id, &grade, &cli.format)?;
            }
            ReviewCommand::Snooze { id, until } => {
                commands::review::run_snooze(&app, id, &until, &cli.format)?;
            }
        },
        Command::Tags(subcmd) => match subcmd {
            TagsCommand::List => commands::tags::run_list(&app, &cli.format)?,
            TagsCommand::Add { name } => commands::tags::run_add(&app, &name, &cli.format)?,
            TagsCommand::Rename { old, new } => {
                commands::tags::run_rename(&app, &old, &new, &cli.format)?;
            }
        },
        Command::Pin { id } => {
            commands::list::run_pin(&mut app, id, true, &cli.format)?;
        }
        Command::Unpin { id } => {
            commands::list::run_pin(&mut app, id, false, &cli.format)?;
        }
        Command::Sort { preference } => {
            commands::list::run_sort(&mut app, preference.as_deref(), &cli.format)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format)?;
        }
        Command::Delete { id } => {
            commands::show::run_delete(&app, id, &cli.format)?;
        }
    }

    Ok(())
}
