//! Lectern CLI
//!
//! Command-line reader for lesson guides: lessons, bookmarks, highlights,
//! the reflection journal and exports.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lectern_core::{BrowseCategory, Config, ExportFormat, Session};

mod commands;
mod editor;
mod output;
mod render;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Lectern - read lesson guides, bookmark, highlight and reflect")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all lessons
    #[command(alias = "ls")]
    Lessons,
    /// Read a lesson (0 is the introduction)
    Read {
        /// Lesson number
        lesson: usize,
    },
    /// Show the learning plan
    Plan {
        /// Current step (0 is the introduction)
        #[arg(short, long, default_value_t = 0)]
        step: usize,
    },
    /// List every item of a category across lessons
    Browse {
        /// knowledge, activity or resource
        category: BrowseCategory,
    },
    /// Manage bookmarks
    Bookmark {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
    /// Manage highlights
    Highlight {
        #[command(subcommand)]
        command: HighlightCommands,
    },
    /// Read or write the reflection journal
    Journal {
        #[command(subcommand)]
        command: Option<JournalCommands>,
    },
    /// Export highlights and journal
    Export {
        /// markdown or print
        format: ExportFormat,
        /// Output file (defaults to the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Open the exported file afterwards
        #[arg(long)]
        open: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (counts, storage location)
    Status,
}

#[derive(Subcommand)]
enum BookmarkCommands {
    /// Bookmark an ID, or remove an existing bookmark
    Toggle {
        /// Lesson, section, block or list item ID
        id: String,
    },
    /// List saved items
    #[command(alias = "ls")]
    List,
    /// Show what an ID refers to
    Show {
        /// Lesson, section, block or list item ID
        id: String,
    },
}

#[derive(Subcommand)]
enum HighlightCommands {
    /// Save a piece of text as a highlight
    #[command(alias = "create")]
    Add {
        /// The selected text
        text: String,
        /// Lesson the text was selected in
        #[arg(short, long)]
        lesson: Option<usize>,
    },
    /// List highlights
    #[command(alias = "ls")]
    List,
    /// Delete a highlight
    #[command(alias = "rm")]
    Delete {
        /// Highlight ID
        id: String,
    },
    /// Append a highlight to the journal as a quote
    Copy {
        /// Highlight ID
        id: String,
    },
}

#[derive(Subcommand, Clone)]
enum JournalCommands {
    /// Print the journal
    Show,
    /// Replace the journal text
    Set {
        /// New journal text
        text: String,
    },
    /// Edit the journal in $EDITOR
    Edit,
    /// Append text as a quote
    Append {
        /// Text to quote
        text: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, content_path, export_title, export_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work on the file directly
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let mut session = Session::open_with_config(config)?;

    match cli.command {
        Commands::Lessons => commands::lesson::list(&session, &output),
        Commands::Read { lesson } => commands::lesson::read(&session, lesson, &output),
        Commands::Plan { step } => commands::lesson::plan(&session, step, &output),
        Commands::Browse { category } => commands::browse::show(&session, category, &output),
        Commands::Bookmark { command } => handle_bookmark_command(command, &mut session, &output),
        Commands::Highlight { command } => {
            handle_highlight_command(command, &mut session, &output)
        }
        Commands::Journal { command } => handle_journal_command(command, &mut session, &output),
        Commands::Export {
            format,
            output: path,
            open,
        } => commands::export::export(&session, format, path, open, &output),
        Commands::Config { .. } => Ok(()),
        Commands::Status => commands::status::show(&session, &output),
    }
}

fn handle_bookmark_command(
    command: BookmarkCommands,
    session: &mut Session,
    output: &Output,
) -> Result<()> {
    match command {
        BookmarkCommands::Toggle { id } => commands::bookmark::toggle(session, id, output),
        BookmarkCommands::List => commands::bookmark::list(session, output),
        BookmarkCommands::Show { id } => commands::bookmark::show(session, id, output),
    }
}

fn handle_highlight_command(
    command: HighlightCommands,
    session: &mut Session,
    output: &Output,
) -> Result<()> {
    match command {
        HighlightCommands::Add { text, lesson } => {
            commands::highlight::add(session, text, lesson, output)
        }
        HighlightCommands::List => commands::highlight::list(session, output),
        HighlightCommands::Delete { id } => commands::highlight::delete(session, id, output),
        HighlightCommands::Copy { id } => commands::highlight::copy(session, id, output),
    }
}

fn handle_journal_command(
    command: Option<JournalCommands>,
    session: &mut Session,
    output: &Output,
) -> Result<()> {
    match command {
        Some(JournalCommands::Show) | None => commands::journal::show(session, output),
        Some(JournalCommands::Set { text }) => commands::journal::set(session, text, output),
        Some(JournalCommands::Edit) => commands::journal::edit(session, output),
        Some(JournalCommands::Append { text }) => {
            commands::journal::append(session, text, output)
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// Only initializes if LECTERN_LOG environment variable is set.
/// Logs to config.log_file when set, stderr otherwise.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("LECTERN_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "lectern_core={},lectern_cli={}",
        log_level, log_level
    ));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    match &config.log_file {
        Some(log_path) => {
            let log_file = match File::create(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
                    return;
                }
            };
            // Ignore error if already initialized
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .try_init();
            info!("Logging initialized to {:?}", log_path);
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
