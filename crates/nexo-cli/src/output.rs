//! Table and JSON output formatting for CLI commands.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::{Table, Tabled};

use nexo_entity::file::{FileRecord, format_file_size};
use nexo_entity::folder::Folder;
use nexo_service::file::{ProgressListener, ProgressSnapshot};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One line of a folder listing.
#[derive(Debug, Serialize, Tabled)]
pub struct ItemRow {
    /// Folder or file
    #[tabled(rename = "type")]
    pub kind: String,
    /// Name
    pub name: String,
    /// Human-readable size
    pub size: String,
    /// Lock marker
    #[tabled(rename = "locked")]
    pub private: String,
    /// Created at
    pub created: String,
    /// Row ID
    pub id: String,
}

impl ItemRow {
    /// Row for a folder.
    pub fn folder(folder: &Folder) -> Self {
        Self {
            kind: "folder".into(),
            name: format!("{}/", folder.name),
            size: "-".into(),
            private: lock_marker(folder.is_private),
            created: folder.created_at.format("%Y-%m-%d %H:%M").to_string(),
            id: folder.id.to_string(),
        }
    }

    /// Row for a file.
    pub fn file(file: &FileRecord) -> Self {
        Self {
            kind: "file".into(),
            name: file.name.clone(),
            size: format_file_size(file.size),
            private: lock_marker(file.is_private),
            created: file.created_at.format("%Y-%m-%d %H:%M").to_string(),
            id: file.id.to_string(),
        }
    }
}

fn lock_marker(is_private: bool) -> String {
    if is_private { "yes".into() } else { String::new() }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("(empty)");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => print_json(items),
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    println!("{json}");
}

/// Print a success notification
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning notification
pub fn print_warning(msg: &str) {
    eprintln!("⚠ {msg}");
}

/// Print a failure notification: `✗ <action>: <message>`
pub fn print_failure(action: &str, msg: &str) {
    eprintln!("✗ {action}: {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<12} {}", format!("{key}:"), value);
}

/// Status line for an upload in progress.
pub fn progress_line(snapshot: &ProgressSnapshot) -> String {
    format!(
        "{} {:>3}% {}/s {} left",
        snapshot.file_name, snapshot.percent, snapshot.speed, snapshot.remaining
    )
}

/// Byte progress bar for an upload batch, drawn on stderr.
///
/// JSON output gets a hidden bar so stdout stays machine-readable.
pub fn upload_bar(total: u64, format: OutputFormat) -> ProgressBar {
    let bar = match format {
        OutputFormat::Table => ProgressBar::new(total),
        OutputFormat::Json => ProgressBar::hidden(),
    };
    bar.set_length(total);
    bar.set_style(
        ProgressStyle::with_template("{bar:30.cyan/blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

/// Listener that moves `bar` along with the batch.
pub fn bar_listener(bar: ProgressBar) -> ProgressListener {
    Arc::new(move |snapshot: &ProgressSnapshot| {
        bar.set_position(snapshot.uploaded);
        bar.set_message(progress_line(snapshot));
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_line() {
        let snapshot = ProgressSnapshot {
            file_name: "movie.mp4".into(),
            uploaded: 50,
            total: 100,
            percent: 50,
            speed: "1.50 MB".into(),
            remaining: "2 min".into(),
        };
        assert_eq!(progress_line(&snapshot), "movie.mp4  50% 1.50 MB/s 2 min left");
    }

    #[test]
    fn test_json_mode_hides_bar() {
        let bar = upload_bar(100, OutputFormat::Json);
        assert!(bar.is_hidden());
        assert_eq!(bar.length(), Some(100));
    }

    #[test]
    fn test_listener_moves_bar() {
        let bar = upload_bar(10, OutputFormat::Json);
        let listener = bar_listener(bar.clone());
        listener(&ProgressSnapshot {
            file_name: "a.txt".into(),
            uploaded: 4,
            total: 10,
            percent: 40,
            speed: "4 B".into(),
            remaining: "1 sec".into(),
        });
        assert_eq!(bar.position(), 4);
        assert_eq!(bar.message(), "a.txt  40% 4 B/s 1 sec left");
    }
}
