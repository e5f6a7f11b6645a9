// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::SpecialChars;

/// Everything the editing engine needs from the terminal, so that it can be written
/// once and run on top of termios, a mock, or a platform without raw mode support.
///
/// There is at most one active editor per process, and implementations are free to
/// keep the saved terminal attributes in process wide state.
pub trait TerminalDriver {
    /// Switch the terminal to non-canonical mode with echo off and signal generation
    /// left on. Captures the original attributes on the very first call only, and
    /// refreshes [`Self::special_chars`] from the live settings. Calling it while
    /// already in raw mode does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error when the attributes can't be read or applied. The editor then
    /// falls back to reading without any editing.
    fn enter_raw(&mut self) -> miette::Result<()>;

    /// Re-apply the attributes captured by [`Self::enter_raw`]. Does nothing if they
    /// were never captured or the terminal is already restored.
    ///
    /// # Errors
    ///
    /// Returns an error when the attributes can't be applied.
    fn restore(&mut self) -> miette::Result<()>;

    /// The control characters captured by the last [`Self::enter_raw`].
    fn special_chars(&self) -> SpecialChars;

    /// Stop the process the way `SIGTSTP` would, and return once it is continued.
    /// Called with the terminal already restored.
    ///
    /// # Errors
    ///
    /// Returns an error when the stop signal can't be raised.
    fn suspend_self(&mut self) -> miette::Result<()>;
}
