// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_core::LevelFilter;

/// Where log output goes and how much of it there is.
///
/// The editor owns the terminal while a line is being edited, so anything written to
/// stdout or stderr in that window lands in the middle of the user's line. Prefer
/// [`WriterConfig::File`] for interactive sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

impl TracingConfig {
    /// Log to the file at `path` (created if needed, appended to otherwise).
    #[must_use]
    pub fn new_file(path: impl Into<String>, level_filter: LevelFilter) -> Self {
        Self {
            writer_config: WriterConfig::File(path.into()),
            level_filter,
        }
    }

    #[must_use]
    pub fn new_display(preference: DisplayPreference, level_filter: LevelFilter) -> Self {
        Self {
            writer_config: WriterConfig::Display(preference),
            level_filter,
        }
    }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { self.level_filter }

    #[must_use]
    pub fn get_writer_config(&self) -> WriterConfig { self.writer_config.clone() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

/// Fields:
/// - `Display`: One of stdout or stderr.
/// - `File`: Path of the log file.
/// - `DisplayAndFile`: Both of the above.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WriterConfig {
    #[default]
    None,
    Display(DisplayPreference),
    File(String),
    DisplayAndFile(DisplayPreference, String),
}

impl WriterConfig {
    /// `log_file` goes to a file, `display` additionally echoes to the terminal.
    #[must_use]
    pub fn from_args(log_file: Option<String>, display: Option<DisplayPreference>) -> Self {
        match (display, log_file) {
            (Some(preference), Some(path)) => WriterConfig::DisplayAndFile(preference, path),
            (Some(preference), None) => WriterConfig::Display(preference),
            (None, Some(path)) => WriterConfig::File(path),
            (None, None) => WriterConfig::None,
        }
    }
}
