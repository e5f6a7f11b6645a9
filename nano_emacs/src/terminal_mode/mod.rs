// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Terminal mode control.
//!
//! The editor needs the terminal in a "half raw" mode: no line buffering and no echo,
//! so that it sees every key as it is typed and decides itself what to draw, but with
//! signal generation still on, so that Ctrl+C and Ctrl+Z keep working.
//!
//! The original settings are captured once per process and put back on every exit
//! path of [`crate::LineEditor::read_line`], and around a suspend.
//!
//! ## Platform Support
//!
//! - **Unix/Linux/macOS**: [`TermiosDriver`], using rustix's safe termios API.
//! - **Other**: [`UnsupportedDriver`]. Entering raw mode fails, and the editor
//!   degrades to reading plain lines.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod special_chars;
pub mod terminal_driver;

#[cfg(unix)]
pub mod raw_mode_unix;

#[cfg(not(unix))]
pub mod raw_mode_unsupported;

// Re-export.
pub use special_chars::*;
pub use terminal_driver::*;

#[cfg(unix)]
pub use raw_mode_unix::*;

#[cfg(not(unix))]
pub use raw_mode_unsupported::*;

/// The driver for the platform this was compiled for.
#[cfg(unix)]
pub type PlatformDriver = TermiosDriver;

/// The driver for the platform this was compiled for.
#[cfg(not(unix))]
pub type PlatformDriver = UnsupportedDriver;
