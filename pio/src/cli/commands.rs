//! CLI command and subcommand definitions

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser, Subcommand};
use pio_core::api::ROOT_FOLDER_ID;
use pio_core::{PioError, Result};
use std::ffi::OsString;
use std::path::PathBuf;

/// put.io command-line client
#[derive(Parser, Debug)]
#[command(name = "pio")]
#[command(version, about = "Command-line client for put.io", long_about = None)]
pub struct Cli {
    /// Config file path (default: ~/.piorc)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL (overrides config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (overrides config file)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human readable output
    Table,
    /// Raw JSON output
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse files and folders in your storage
    Files {
        #[command(subcommand)]
        command: Option<FilesCommands>,
    },

    /// Show account information
    Account {
        #[command(subcommand)]
        command: Option<AccountCommands>,
    },

    /// Show transfers
    Transfers {
        #[command(subcommand)]
        command: Option<TransfersCommands>,
    },

    /// Show the account event feed
    Events {
        #[command(subcommand)]
        command: Option<EventsCommands>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum FilesCommands {
    /// List files recursively, starting from a folder (root if omitted)
    List {
        /// Folder ID, anything that is not a number lists the root folder
        folder_id: Option<String>,
    },
    /// Display the direct download link of a file
    Link {
        /// File ID
        file_id: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Show user, plan and disk usage (default)
    Info,
}

#[derive(Subcommand, Debug)]
pub enum TransfersCommands {
    /// List transfers (default)
    List,
}

#[derive(Subcommand, Debug)]
pub enum EventsCommands {
    /// List events (default)
    List,
}

/// What a parsed command asks for, after defaults are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print usage of the named command
    Help(&'static str),
    ListFiles { folder_id: i64 },
    FileLink { file_id: i64 },
    AccountInfo,
    ListTransfers,
    ListEvents,
    Completion(clap_complete::Shell),
}

impl Action {
    /// Whether the action talks to the API (and so needs a token)
    pub fn needs_client(&self) -> bool {
        !matches!(self, Action::Help(_) | Action::Completion(_))
    }
}

impl Cli {
    /// Resolve the subcommand into an [`Action`].
    ///
    /// Runs before any configuration is read, so argument errors never touch
    /// the config file or the network.
    pub fn action(&self) -> Result<Action> {
        let command = match &self.command {
            Some(command) => command,
            None => return Ok(Action::Help("")),
        };

        let action = match command {
            Commands::Files { command } => match command {
                None => Action::Help("files"),
                Some(FilesCommands::List { folder_id }) => Action::ListFiles {
                    folder_id: folder_id
                        .as_deref()
                        .and_then(|id| id.parse().ok())
                        .unwrap_or(ROOT_FOLDER_ID),
                },
                Some(FilesCommands::Link { file_id: Some(id) }) => match id.parse() {
                    Ok(file_id) => Action::FileLink { file_id },
                    Err(_) => {
                        return Err(PioError::InvalidInput(format!(
                            "invalid file ID '{}'",
                            id
                        )));
                    }
                },
                Some(FilesCommands::Link { file_id: None }) => {
                    return Err(PioError::InvalidInput(
                        "please specify a file ID".to_string(),
                    ));
                }
            },
            Commands::Account { .. } => Action::AccountInfo,
            Commands::Transfers { .. } => Action::ListTransfers,
            Commands::Events { .. } => Action::ListEvents,
            Commands::Completion { shell } => Action::Completion(*shell),
        };

        Ok(action)
    }
}

/// Exit code for a command line clap rejected
///
/// An unknown action under a known command (`pio files upload`) exits 1 like
/// any other invocation error; everything else keeps clap's own code, so an
/// unknown top-level command still exits 2.
pub fn usage_exit_code(err: &clap::Error, args: &[OsString]) -> i32 {
    if err.kind() != ErrorKind::InvalidSubcommand {
        return err.exit_code();
    }
    let invalid = match err.get(ContextKind::InvalidSubcommand) {
        Some(ContextValue::String(value)) => value.as_str(),
        _ => return err.exit_code(),
    };

    let cmd = Cli::command();
    let commands: Vec<&str> = cmd.get_subcommands().map(|c| c.get_name()).collect();
    let position = args
        .iter()
        .skip(1)
        .position(|arg| arg == invalid)
        .unwrap_or(args.len().saturating_sub(1));
    let after_command = args
        .iter()
        .skip(1)
        .take(position)
        .any(|arg| arg.to_str().is_some_and(|arg| commands.contains(&arg)));

    if after_command {
        1
    } else {
        err.exit_code()
    }
}
