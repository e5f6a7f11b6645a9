// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::{Diagnostic, Report as ErrorReport};
use std::{collections::TryReserveError, io};
use thiserror::Error;

/// Error returned from [`crate::LineEditor::read_line`].
///
/// Only the variants that the host has to act on are surfaced here. Everything else
/// that can go wrong while editing (a failed directory scan during completion, a
/// malformed multi-byte sequence, `tcsetattr` failing when raw mode is entered) is
/// absorbed by the editor and looks like "nothing happened" to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum ReadlineError {
    /// Writing to the output sink or reading from the byte source failed.
    #[error(transparent)]
    #[diagnostic(code(nano_emacs::io))]
    IO(#[from] io::Error),

    /// The line buffer could not grow. The terminal has already been restored when
    /// this is returned, and the partial line is gone.
    #[error("line buffer could not grow to {requested} bytes")]
    #[diagnostic(
        code(nano_emacs::line_buffer::allocation),
        help("The host is out of memory. Aborting the editing session is the only option.")
    )]
    Allocation {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// The saved terminal attributes could not be re-applied.
    #[error("terminal mode error: {0}")]
    #[diagnostic(
        code(nano_emacs::terminal_mode),
        help("Run `stty sane` to recover the terminal.")
    )]
    TerminalMode(String),

    /// `SIGINT` arrived while a line was being edited. The line was discarded.
    #[error("interrupted")]
    #[diagnostic(code(nano_emacs::interrupted))]
    Interrupted,
}

/// For convenience, convert [`ErrorReport`] to [`ReadlineError`], so that the
/// [`miette::Result`]s returned by [`crate::TerminalDriver`] work with `?`.
impl From<ErrorReport> for ReadlineError {
    fn from(report: ErrorReport) -> Self { ReadlineError::TerminalMode(format!("{report}")) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_converts_to_terminal_mode() {
        let report = miette::miette!("tcsetattr failed");
        let error: ReadlineError = report.into();
        assert!(matches!(error, ReadlineError::TerminalMode(ref msg) if msg == "tcsetattr failed"));
    }

    #[test]
    fn test_allocation_error_message() {
        let source = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        let error = ReadlineError::Allocation { requested: usize::MAX, source };
        assert!(error.to_string().starts_with("line buffer could not grow"));
    }
}
