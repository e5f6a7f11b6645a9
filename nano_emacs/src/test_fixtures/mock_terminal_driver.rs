// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{SpecialChars, TerminalDriver};
use miette::miette;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    EnterRaw,
    Restore,
    Suspend,
}

/// [`TerminalDriver`] that only keeps a log of what was asked of it.
///
/// Use [`Self::with_fail_enter_raw`] to exercise the degrade path and
/// [`Self::with_fail_restore`] to exercise restore errors.
#[derive(Debug, Clone, Default)]
pub struct MockTerminalDriver {
    pub events: Vec<DriverEvent>,
    pub special_chars: SpecialChars,
    pub fail_enter_raw: bool,
    pub fail_restore: bool,
    is_raw: bool,
}

impl MockTerminalDriver {
    #[must_use]
    pub fn with_fail_enter_raw(mut self) -> Self {
        self.fail_enter_raw = true;
        self
    }

    #[must_use]
    pub fn with_fail_restore(mut self) -> Self {
        self.fail_restore = true;
        self
    }

    #[must_use]
    pub fn is_raw(&self) -> bool { self.is_raw }
}

impl TerminalDriver for MockTerminalDriver {
    fn enter_raw(&mut self) -> miette::Result<()> {
        self.events.push(DriverEvent::EnterRaw);
        if self.fail_enter_raw {
            return Err(miette!("not a terminal"));
        }
        self.is_raw = true;
        Ok(())
    }

    fn restore(&mut self) -> miette::Result<()> {
        self.events.push(DriverEvent::Restore);
        if self.fail_restore {
            return Err(miette!("tcsetattr failed"));
        }
        self.is_raw = false;
        Ok(())
    }

    fn special_chars(&self) -> SpecialChars { self.special_chars }

    fn suspend_self(&mut self) -> miette::Result<()> {
        self.events.push(DriverEvent::Suspend);
        Ok(())
    }
}
