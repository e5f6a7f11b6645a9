// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::VecDeque,
          fs,
          io::{self, BufWriter, Write as _},
          path::Path};

/// Default cap on the number of entries kept by [`History`].
pub const HISTORY_SIZE_MAX: usize = 1_000;

/// Read-only view of a list of previously accepted lines, owned by the host.
///
/// Index `0` is the oldest entry and `len() - 1` the most recent one. The editor only
/// ever reads through this trait; adding accepted lines is up to the host.
pub trait HistoryList {
    fn len(&self) -> usize;

    fn entry(&self, index: usize) -> Option<&str>;

    fn is_empty(&self) -> bool { self.len() == 0 }
}

/// No history at all.
impl HistoryList for () {
    fn len(&self) -> usize { 0 }

    fn entry(&self, _index: usize) -> Option<&str> { None }
}

impl HistoryList for [String] {
    fn len(&self) -> usize { <[String]>::len(self) }

    fn entry(&self, index: usize) -> Option<&str> { self.get(index).map(String::as_str) }
}

impl HistoryList for Vec<String> {
    fn len(&self) -> usize { Vec::len(self) }

    fn entry(&self, index: usize) -> Option<&str> { self.get(index).map(String::as_str) }
}

/// A bounded history list with a plain text file format (one entry per line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    pub entries: VecDeque<String>,
    pub max_size: usize,
}

impl Default for History {
    fn default() -> Self { Self::new(HISTORY_SIZE_MAX) }
}

impl History {
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::default(),
            max_size,
        }
    }

    /// Append an accepted line. Empty lines, and lines equal to the most recent
    /// entry, are not recorded. The oldest entry is evicted past `max_size`.
    pub fn add(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.is_empty() || self.entries.back() == Some(&line) {
            return;
        }
        self.entries.push_back(line);
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
    }

    /// Read entries from `path`. A missing file is an empty history.
    ///
    /// # Errors
    ///
    /// Returns any error other than [`io::ErrorKind::NotFound`] from reading the file.
    pub fn load(path: impl AsRef<Path>, max_size: usize) -> io::Result<Self> {
        let mut history = Self::new(max_size);
        let content = match fs::read(path.as_ref()) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(history),
            Err(e) => return Err(e),
        };
        for line in String::from_utf8_lossy(&content).lines() {
            history.add(line);
        }
        tracing::debug!(
            message = "history loaded",
            path = %path.as_ref().display(),
            entries = history.entries.len()
        );
        Ok(history)
    }

    /// Write all entries to `path`, oldest first, replacing the file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file can't be created or written.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut writer = BufWriter::new(fs::File::create(path.as_ref())?);
        for entry in &self.entries {
            writeln!(writer, "{entry}")?;
        }
        writer.flush()
    }
}

impl HistoryList for History {
    fn len(&self) -> usize { self.entries.len() }

    fn entry(&self, index: usize) -> Option<&str> { self.entries.get(index).map(String::as_str) }
}
