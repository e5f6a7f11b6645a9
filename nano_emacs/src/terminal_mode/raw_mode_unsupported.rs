// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Stand-in [`TerminalDriver`] for platforms without termios. Raw mode always fails,
//! which makes the editor fall back to plain line reading.

use super::{SpecialChars, TerminalDriver};
use std::io::IsTerminal as _;

/// `true` when stdin is a terminal.
#[must_use]
pub fn is_interactive() -> bool { std::io::stdin().is_terminal() }

#[derive(Debug, Default)]
pub struct UnsupportedDriver;

impl UnsupportedDriver {
    #[must_use]
    pub fn new() -> Self { Self }
}

impl TerminalDriver for UnsupportedDriver {
    fn enter_raw(&mut self) -> miette::Result<()> {
        Err(miette::miette!("raw mode is not implemented on this platform"))
    }

    fn restore(&mut self) -> miette::Result<()> { Ok(()) }

    fn special_chars(&self) -> SpecialChars { SpecialChars::default() }

    fn suspend_self(&mut self) -> miette::Result<()> { Ok(()) }
}
