// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Encoding, LINE_BUFFER_INCREMENT};

/// Upper bound on the number of filename completion candidates kept per anchor.
pub const COMPLETION_CANDIDATES_MAX: usize = 50;

/// Knobs for one [`crate::LineEditor`].
///
/// Fields:
/// - `del_erases_current_char`: When `true`, DEL (0x7f) deletes the character under
///   the cursor and only Ctrl+H (and the terminal's erase character, if it isn't DEL)
///   erase backwards. Defaults to the `del_erases_current_char` cargo feature.
/// - `buffer_increment`: Initial capacity of the line buffer and the amount it grows
///   by.
/// - `completion_limit`: Max number of filename candidates cycled through.
/// - `encoding`: Force an [`Encoding`]. [`None`] means detect it from the locale
///   environment when the editor is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub del_erases_current_char: bool,
    pub buffer_increment: usize,
    pub completion_limit: usize,
    pub encoding: Option<Encoding>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            del_erases_current_char: cfg!(feature = "del_erases_current_char"),
            buffer_increment: LINE_BUFFER_INCREMENT,
            completion_limit: COMPLETION_CANDIDATES_MAX,
            encoding: None,
        }
    }
}

impl EditorConfig {
    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    #[must_use]
    pub fn with_del_erases_current_char(mut self, value: bool) -> Self {
        self.del_erases_current_char = value;
        self
    }

    /// The configured encoding, or the one detected from the locale.
    #[must_use]
    pub fn resolve_encoding(&self) -> Encoding {
        self.encoding.unwrap_or_else(Encoding::from_locale_env)
    }
}
