//! Batch upload progress: percent, throughput and time left.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;

use nexo_core::traits::ProgressFn;

/// Shown when speed or time left cannot be computed yet.
pub const UNKNOWN: &str = "--";

/// Called with a fresh snapshot whenever bytes are reported.
pub type ProgressListener = Arc<dyn Fn(&ProgressSnapshot) + Send + Sync>;

/// Point-in-time view of a batch upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    /// File currently being sent.
    pub file_name: String,
    /// Bytes sent across the batch.
    pub uploaded: u64,
    /// Bytes in the whole batch.
    pub total: u64,
    /// Whole percent, 0 to 100.
    pub percent: u8,
    /// Throughput label (`1.50 MB`), per second.
    pub speed: String,
    /// Time-left label (`3 min`, `12 sec`).
    pub remaining: String,
}

/// Accumulates bytes across every file of a batch.
///
/// Storage clients report the bytes sent since their previous callback, so
/// the running total is a plain sum of those deltas.
pub struct UploadProgress {
    total: u64,
    uploaded: AtomicU64,
    started: Instant,
    file_name: Mutex<String>,
    listener: Option<ProgressListener>,
}

impl std::fmt::Debug for UploadProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadProgress")
            .field("total", &self.total)
            .field("uploaded", &self.uploaded.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl UploadProgress {
    /// Start tracking a batch of `total` bytes.
    pub fn new(total: u64) -> Self {
        Self {
            total,
            uploaded: AtomicU64::new(0),
            started: Instant::now(),
            file_name: Mutex::new(String::new()),
            listener: None,
        }
    }

    /// Notify `listener` on every report.
    pub fn with_listener(mut self, listener: ProgressListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Total bytes in the batch.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Bytes reported so far.
    pub fn uploaded(&self) -> u64 {
        self.uploaded.load(Ordering::SeqCst)
    }

    /// Mark the file now being sent.
    pub fn start_file(&self, name: &str) {
        if let Ok(mut current) = self.file_name.lock() {
            current.clear();
            current.push_str(name);
        }
    }

    /// Add `bytes` to the batch total.
    pub fn advance(&self, bytes: u64) {
        self.uploaded.fetch_add(bytes, Ordering::SeqCst);
        if let Some(listener) = &self.listener {
            listener(&self.snapshot());
        }
    }

    /// Adapter handed to the object store.
    pub fn callback(self: &Arc<Self>) -> ProgressFn {
        let tracker = Arc::clone(self);
        Arc::new(move |bytes| tracker.advance(bytes))
    }

    /// Snapshot using the time elapsed since tracking started.
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.snapshot_at(self.started.elapsed())
    }

    /// Snapshot for a given elapsed time.
    pub fn snapshot_at(&self, elapsed: Duration) -> ProgressSnapshot {
        let uploaded = self.uploaded();
        let file_name = self
            .file_name
            .lock()
            .map(|name| name.clone())
            .unwrap_or_default();
        ProgressSnapshot {
            file_name,
            uploaded,
            total: self.total,
            percent: percent(uploaded, self.total),
            speed: format_speed(uploaded, elapsed),
            remaining: format_remaining(uploaded, self.total, elapsed),
        }
    }
}

/// `round(uploaded / total * 100)`, capped at 100. An empty batch is done.
pub fn percent(uploaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let value = (uploaded as f64 / total as f64 * 100.0).round();
    value.clamp(0.0, 100.0) as u8
}

fn bytes_per_second(uploaded: u64, elapsed: Duration) -> Option<f64> {
    let seconds = elapsed.as_secs_f64();
    if seconds <= 0.0 {
        return None;
    }
    Some(uploaded as f64 / seconds)
}

/// Throughput label: `x.xx MB` above 1 MiB/s, `x.xx KB` above 1 KiB/s,
/// whole bytes otherwise.
pub fn format_speed(uploaded: u64, elapsed: Duration) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    match bytes_per_second(uploaded, elapsed) {
        None => UNKNOWN.to_string(),
        Some(speed) if speed > MB => format!("{:.2} MB", speed / MB),
        Some(speed) if speed > KB => format!("{:.2} KB", speed / KB),
        Some(speed) => format!("{} B", speed.round() as u64),
    }
}

/// Time-left label: whole minutes (rounded up) above 60 seconds, whole
/// seconds (rounded up) otherwise.
pub fn format_remaining(uploaded: u64, total: u64, elapsed: Duration) -> String {
    let speed = match bytes_per_second(uploaded, elapsed) {
        Some(speed) if speed > 0.0 => speed,
        _ => return UNKNOWN.to_string(),
    };
    let remaining = total.saturating_sub(uploaded) as f64 / speed;
    if remaining > 60.0 {
        format!("{} min", (remaining / 60.0).ceil() as u64)
    } else {
        format!("{} sec", remaining.ceil() as u64)
    }
}
