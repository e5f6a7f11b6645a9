// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Unix implementation of [`TerminalDriver`] using rustix's safe termios API.

use super::{SpecialChars, TerminalDriver};
use miette::miette;
use rustix::{fd::{AsFd, BorrowedFd},
             termios::{self, LocalModes, OptionalActions, SpecialCodeIndex, Termios}};
use signal_hook::consts::SIGTSTP;
use std::{fs::File,
          io,
          sync::{LazyLock, Mutex}};

/// Original terminal settings. Captured once per process, on the first
/// [`TermiosDriver::enter_raw`], and never overwritten afterwards.
static ORIGINAL_TERMIOS: LazyLock<Mutex<Option<Termios>>> =
    LazyLock::new(|| Mutex::new(None));

/// Represents either stdin or `/dev/tty` for terminal operations.
enum TerminalFd {
    Stdin(io::Stdin),
    DevTty(File),
}

impl AsFd for TerminalFd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        match self {
            TerminalFd::Stdin(stdin) => stdin.as_fd(),
            TerminalFd::DevTty(file) => file.as_fd(),
        }
    }
}

/// Use stdin if it is a tty, otherwise the controlling terminal.
fn get_terminal_fd() -> io::Result<TerminalFd> {
    let stdin = io::stdin();
    if termios::isatty(&stdin) {
        Ok(TerminalFd::Stdin(stdin))
    } else {
        let file = File::options().read(true).write(true).open("/dev/tty")?;
        Ok(TerminalFd::DevTty(file))
    }
}

/// `true` when stdin is a terminal. Piped input should bypass the editor entirely.
#[must_use]
pub fn is_interactive() -> bool { termios::isatty(io::stdin()) }

fn special_chars_from(termios: &Termios) -> SpecialChars {
    let codes = &termios.special_codes;
    SpecialChars {
        erase: SpecialChars::slot(codes[SpecialCodeIndex::VERASE]),
        eof: SpecialChars::slot(codes[SpecialCodeIndex::VEOF]),
        kill: SpecialChars::slot(codes[SpecialCodeIndex::VKILL]),
        word_erase: SpecialChars::slot(codes[SpecialCodeIndex::VWERASE]),
        reprint: SpecialChars::slot(codes[SpecialCodeIndex::VREPRINT]),
        suspend: SpecialChars::slot(codes[SpecialCodeIndex::VSUSP]),
    }
}

/// [`TerminalDriver`] for POSIX terminals.
///
/// Raw mode here is deliberately milder than `cfmakeraw()`: only `ICANON` and `ECHO`
/// are cleared. `ISIG` stays on so Ctrl+C and Ctrl+Z still raise signals, and output
/// post-processing stays on so `\n` still moves to column 0.
#[derive(Debug)]
pub struct TermiosDriver {
    special_chars: SpecialChars,
    is_raw: bool,
}

impl Default for TermiosDriver {
    fn default() -> Self {
        Self {
            special_chars: SpecialChars::default(),
            is_raw: false,
        }
    }
}

impl TermiosDriver {
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl TerminalDriver for TermiosDriver {
    fn enter_raw(&mut self) -> miette::Result<()> {
        if self.is_raw {
            return Ok(());
        }

        let fd = get_terminal_fd()
            .map_err(|e| miette!("failed to get terminal file descriptor: {e}"))?;

        let mut termios = termios::tcgetattr(&fd)
            .map_err(|e| miette!("failed to retrieve terminal attributes: {e}"))?;

        // Save original settings.
        {
            let mut original = ORIGINAL_TERMIOS
                .lock()
                .map_err(|e| miette!("terminal settings lock poisoned: {e}"))?;
            if original.is_none() {
                *original = Some(termios.clone());
            }
        }

        self.special_chars = special_chars_from(&termios);

        termios.local_modes.remove(LocalModes::ICANON | LocalModes::ECHO);
        termios.local_modes.insert(LocalModes::ISIG);
        termios.special_codes[SpecialCodeIndex::VMIN] = 1;
        termios.special_codes[SpecialCodeIndex::VTIME] = 0;

        termios::tcsetattr(&fd, OptionalActions::Now, &termios)
            .map_err(|e| miette!("failed to set terminal attributes: {e}"))?;

        self.is_raw = true;
        tracing::debug!(message = "raw mode entered", special_chars = ?self.special_chars);
        Ok(())
    }

    fn restore(&mut self) -> miette::Result<()> {
        if !self.is_raw {
            return Ok(());
        }

        let original = ORIGINAL_TERMIOS
            .lock()
            .map_err(|e| miette!("terminal settings lock poisoned: {e}"))?;

        if let Some(ref termios) = *original {
            let fd = get_terminal_fd()
                .map_err(|e| miette!("failed to get terminal file descriptor: {e}"))?;
            termios::tcsetattr(&fd, OptionalActions::Now, termios)
                .map_err(|e| miette!("failed to set terminal attributes: {e}"))?;
        }

        self.is_raw = false;
        Ok(())
    }

    fn special_chars(&self) -> SpecialChars { self.special_chars }

    fn suspend_self(&mut self) -> miette::Result<()> {
        // The stdin byte source owns a SIGTSTP handler, so raising the signal would
        // only come back to us. This performs the default action (stop) instead, and
        // returns after SIGCONT.
        signal_hook::low_level::emulate_default_handler(SIGTSTP)
            .map_err(|e| miette!("failed to stop the process: {e}"))
    }
}
