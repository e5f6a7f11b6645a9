// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Control characters the terminal driver reserves for line editing.
///
/// With the terminal in non-canonical mode the kernel no longer acts on most of these,
/// so the editor compares every incoming byte against this table and gives it the same
/// meaning it would have had in cooked mode. A slot is [`None`] when the platform
/// reports it as disabled (`_POSIX_VDISABLE`).
///
/// The table is refreshed by [`crate::TerminalDriver::enter_raw`], so an `stty erase ^H`
/// done while the program runs (e.g. during a suspend) is picked up on resume.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpecialChars {
    /// `VERASE`: erase the previous character.
    pub erase: Option<u8>,
    /// `VEOF`: end of input on an empty line.
    pub eof: Option<u8>,
    /// `VKILL`: erase the line before the cursor.
    pub kill: Option<u8>,
    /// `VWERASE`: erase the previous word.
    pub word_erase: Option<u8>,
    /// `VREPRINT`: reprint the prompt and line.
    pub reprint: Option<u8>,
    /// `VSUSP`: stop the process.
    pub suspend: Option<u8>,
}

pub const CTRL_D: u8 = 0x04;
pub const CTRL_R: u8 = 0x12;
pub const CTRL_U: u8 = 0x15;
pub const CTRL_W: u8 = 0x17;
pub const CTRL_Z: u8 = 0x1a;
pub const DEL: u8 = 0x7f;

impl Default for SpecialChars {
    /// What `stty sane` sets up on Linux.
    fn default() -> Self {
        Self {
            erase: Some(DEL),
            eof: Some(CTRL_D),
            kill: Some(CTRL_U),
            word_erase: Some(CTRL_W),
            reprint: Some(CTRL_R),
            suspend: Some(CTRL_Z),
        }
    }
}

impl SpecialChars {
    /// A table where every slot is disabled, so only the fixed key bindings apply.
    #[must_use]
    pub fn none() -> Self {
        Self {
            erase: None,
            eof: None,
            kill: None,
            word_erase: None,
            reprint: None,
            suspend: None,
        }
    }

    /// Map a raw `c_cc` value to a slot. Both `0` (Linux) and `0xff` (BSD, macOS) mean
    /// "disabled".
    #[must_use]
    pub fn slot(value: u8) -> Option<u8> {
        match value {
            0 | 0xff => None,
            it => Some(it),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_slots() {
        assert_eq!(SpecialChars::slot(0), None);
        assert_eq!(SpecialChars::slot(0xff), None);
        assert_eq!(SpecialChars::slot(DEL), Some(DEL));
    }

    #[test]
    fn test_default_table() {
        let table = SpecialChars::default();
        assert_eq!(table.erase, Some(0x7f));
        assert_eq!(table.suspend, Some(0x1a));
        assert_eq!(SpecialChars::none().eof, None);
    }
}
