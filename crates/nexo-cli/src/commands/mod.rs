//! CLI command definitions and dispatch.

pub mod auth;
pub mod browse;
pub mod items;
pub mod upload;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

use nexo_core::config::AppConfig;
use nexo_core::error::AppError;

use crate::context::CliContext;
use crate::output::{self, OutputFormat};

/// Nexo Drive: file storage on a hosted backend
#[derive(Debug, Parser)]
#[command(name = "nexo", version, about, long_about = None)]
pub struct Cli {
    /// Path to an extra configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an account
    Register(auth::RegisterArgs),
    /// Sign in
    Login(auth::LoginArgs),
    /// Sign out and forget the local session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List a folder (the current one by default)
    Ls {
        /// Folder name, id, `/` or `..`
        folder: Option<String>,
    },
    /// Change the current folder
    Cd {
        /// Folder name, id, `/` or `..`
        folder: String,
    },
    /// Print the current folder path
    Pwd,
    /// Create a folder in the current folder
    Mkdir {
        /// Folder name
        name: String,
    },
    /// Upload files or folders into the current folder
    Upload(upload::UploadArgs),
    /// Rename a folder or file (file extensions are kept)
    Rename {
        /// Item name or id
        item: String,
        /// New name
        name: String,
    },
    /// Delete folders (recursively) and files
    Rm {
        /// Item names or ids
        #[arg(required = true)]
        items: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Move an item into another folder
    Mv {
        /// Item name or id
        item: String,
        /// Target folder name, id, `/` or `..`
        target: String,
    },
    /// Mark an item private
    Lock {
        /// Item name or id
        item: String,
    },
    /// Clear an item's private flag (owner only)
    Unlock {
        /// Item name or id
        item: String,
    },
    /// Print a file's public URL or a folder's name
    Link {
        /// Item name or id
        item: String,
    },
    /// Download a file
    Download {
        /// File name or id
        file: String,
        /// Destination path (defaults to the file name)
        dest: Option<PathBuf>,
    },
}

impl Commands {
    /// Action name used in failure notifications.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Register(_) => "Registration failed",
            Self::Login(_) => "Login failed",
            Self::Logout => "Logout failed",
            Self::Whoami => "Could not load user",
            Self::Ls { .. } => "Could not load folder",
            Self::Cd { .. } => "Could not open folder",
            Self::Pwd => "Could not resolve path",
            Self::Mkdir { .. } => "Could not create folder",
            Self::Upload(_) => "Upload failed",
            Self::Rename { .. } => "Could not rename",
            Self::Rm { .. } => "Could not delete",
            Self::Mv { .. } => "Could not move",
            Self::Lock { .. } => "Could not lock",
            Self::Unlock { .. } => "Could not unlock",
            Self::Link { .. } => "Could not copy link",
            Self::Download { .. } => "Download failed",
        }
    }
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// Failures are logged and reported once as `✗ <action>: <message>`
    /// before being returned.
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let result = match CliContext::new(config, self.format) {
            Ok(cli) => self.dispatch(&cli).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            let action = self.command.action();
            error!(action, kind = %e.kind, error = ?e, "Command failed");
            output::print_failure(action, &e.message);
        }
        result
    }

    /// Run the command against a prepared context.
    pub async fn dispatch(&self, cli: &CliContext) -> Result<(), AppError> {
        match &self.command {
            Commands::Register(args) => auth::register(cli, args).await,
            Commands::Login(args) => auth::login(cli, args).await,
            Commands::Logout => auth::logout(cli).await,
            Commands::Whoami => auth::whoami(cli).await,
            Commands::Ls { folder } => browse::ls(cli, folder.as_deref()).await,
            Commands::Cd { folder } => browse::cd(cli, folder).await,
            Commands::Pwd => browse::pwd(cli).await,
            Commands::Mkdir { name } => browse::mkdir(cli, name).await,
            Commands::Upload(args) => upload::execute(cli, args).await,
            Commands::Rename { item, name } => items::rename(cli, item, name).await,
            Commands::Rm { items: targets, yes } => items::remove(cli, targets, *yes).await,
            Commands::Mv { item, target } => items::move_to(cli, item, target).await,
            Commands::Lock { item } => items::set_locked(cli, item, true).await,
            Commands::Unlock { item } => items::set_locked(cli, item, false).await,
            Commands::Link { item } => items::link(cli, item).await,
            Commands::Download { file, dest } => items::download(cli, file, dest.as_deref()).await,
        }
    }
}

/// Map a prompt failure into an application error.
pub(crate) fn prompt_error(err: dialoguer::Error) -> AppError {
    AppError::cancelled(format!("Input error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_upload_flags() {
        let cli = Cli::parse_from(["nexo", "upload", "a.txt", "b.txt", "--flatten"]);
        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(args.paths.len(), 2);
                assert!(args.flatten);
                assert!(!args.folder);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_format_flag() {
        let cli = Cli::parse_from(["nexo", "ls", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.command.action(), "Could not load folder");
    }
}
