//! Run journal adapters.
//!
//! The markdown journal is the human-readable story of a run: one file per
//! run, one fenced header per entry. Diagnostics go through `tracing`, not
//! here.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::infrastructure::ports::{ClockPort, JournalLevel, JournalPort};

const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M";
const ENTRY_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Journal written to `<log_dir>/<YYYYMMDD_HHMM>.md`.
///
/// Entries below `min_level` are dropped. Write failures are logged and
/// swallowed so a full disk never aborts a run.
pub struct MarkdownJournal {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    clock: Arc<dyn ClockPort>,
    min_level: JournalLevel,
}

impl MarkdownJournal {
    /// Create the log directory if needed and open this run's journal file.
    ///
    /// Runs started in the same minute append to the same file.
    pub fn create(log_dir: impl AsRef<Path>, clock: Arc<dyn ClockPort>) -> io::Result<Self> {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let stamp = clock.now().format(FILE_STAMP_FORMAT);
        let path = log_dir.join(format!("{stamp}.md"));
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;

        tracing::info!(path = %path.display(), "Opened run journal");
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
            clock,
            min_level: JournalLevel::Info,
        })
    }

    pub fn with_min_level(mut self, level: JournalLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer(&self) -> MutexGuard<'_, BufWriter<File>> {
        self.writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl JournalPort for MarkdownJournal {
    fn record(&self, level: JournalLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        let stamp = self.clock.now().format(ENTRY_STAMP_FORMAT).to_string();
        let entry = format_entry(&stamp, level, message);
        if let Err(e) = self.writer().write_all(entry.as_bytes()) {
            tracing::warn!(error = %e, path = %self.path.display(), "Failed to write journal entry");
        }
    }

    fn flush(&self) {
        if let Err(e) = self.writer().flush() {
            tracing::warn!(error = %e, path = %self.path.display(), "Failed to flush journal");
        }
    }
}

impl Drop for MarkdownJournal {
    fn drop(&mut self) {
        self.flush();
    }
}

fn format_entry(stamp: &str, level: JournalLevel, message: &str) -> String {
    format!("\n---\n`--{stamp} {}--`\n{message}\n", level.as_str())
}

/// Journal kept in memory, for tests and dry runs.
#[derive(Default)]
pub struct MemoryJournal {
    entries: Mutex<Vec<(JournalLevel, String)>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(JournalLevel, String)> {
        self.lock().clone()
    }

    /// Whether any entry contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|(_, message)| message.contains(needle))
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(JournalLevel, String)>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl JournalPort for MemoryJournal {
    fn record(&self, level: JournalLevel, message: &str) {
        self.lock().push((level, message.to_string()));
    }

    fn flush(&self) {}
}
