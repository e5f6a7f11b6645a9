// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Bytes to [`EditCommand`]s.
//!
//! A byte is checked against these, in order:
//! 1. Printable ASCII and anything `>= 0x80`: text to insert.
//! 2. The terminal's special characters ([`SpecialChars`]), so that `stty` settings are
//!    honored.
//! 3. The fixed emacs style bindings.
//! 4. `ESC`, which starts a CSI (`ESC [`) or SS3 (`ESC O`) sequence. Those are
//!    decoded by [`decode_escape_sequence`] once the editor has read them in full.

use crate::{CompletionDirection, SpecialChars};

pub const CTRL_A: u8 = 0x01;
pub const CTRL_B: u8 = 0x02;
pub const CTRL_C: u8 = 0x03;
pub const CTRL_E: u8 = 0x05;
pub const CTRL_F: u8 = 0x06;
pub const CTRL_H: u8 = 0x08;
pub const TAB: u8 = 0x09;
pub const LF: u8 = 0x0a;
pub const CTRL_K: u8 = 0x0b;
pub const CTRL_L: u8 = 0x0c;
pub const CR: u8 = 0x0d;
pub const CTRL_N: u8 = 0x0e;
pub const CTRL_P: u8 = 0x10;
pub const ESC: u8 = 0x1b;

/// Everything the editor knows how to do to the line.
#[derive(Debug, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum EditCommand {
    /// One whole character (several bytes in UTF-8 mode).
    Insert(Vec<u8>),
    ErasePrevious,
    DeleteCurrent,
    MoveLeft,
    MoveRight,
    MoveStart,
    MoveEnd,
    KillToEnd,
    /// Erase from the start of the line to the cursor.
    KillLine,
    KillPreviousWord,
    Redraw,
    Complete(CompletionDirection),
    HistoryPrevious,
    HistoryNext,
    Suspend,
    Interrupt,
    /// End of input on an empty line, delete under the cursor otherwise.
    EndOfFile,
    Accept,
    Ignore,
}

/// Result of looking at a single byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Command(EditCommand),
    /// First byte of a character to insert. In UTF-8 mode the editor still has to
    /// collect its continuation bytes.
    InsertLead(u8),
    /// `ESC`. The editor reads the rest of the sequence.
    Escape,
}

#[must_use]
pub fn is_insertable(byte: u8) -> bool { (0x20..=0x7e).contains(&byte) || byte >= 0x80 }

/// Classify one byte. `del_erases_current_char` turns DEL into "delete under cursor",
/// whether DEL is the terminal's erase character or not.
#[must_use]
pub fn decode_byte(
    byte: u8,
    special_chars: &SpecialChars,
    del_erases_current_char: bool,
) -> Decoded {
    use EditCommand as C;

    if is_insertable(byte) {
        return Decoded::InsertLead(byte);
    }

    if let Some(command) = decode_special_char(byte, special_chars, del_erases_current_char) {
        return Decoded::Command(command);
    }

    let command = match byte {
        #[cfg(feature = "emacs")]
        CTRL_A => C::MoveStart,
        #[cfg(feature = "emacs")]
        CTRL_B => C::MoveLeft,
        #[cfg(feature = "emacs")]
        CTRL_E => C::MoveEnd,
        #[cfg(feature = "emacs")]
        CTRL_F => C::MoveRight,
        CTRL_C => C::Interrupt,
        crate::CTRL_D => C::EndOfFile,
        CTRL_H => C::ErasePrevious,
        TAB => C::Complete(CompletionDirection::Forward),
        CTRL_K => C::KillToEnd,
        CTRL_L | crate::CTRL_R => C::Redraw,
        CTRL_N => C::HistoryNext,
        CTRL_P => C::HistoryPrevious,
        crate::CTRL_U => C::KillLine,
        crate::CTRL_W => C::KillPreviousWord,
        LF | CR => C::Accept,
        crate::DEL if del_erases_current_char => C::DeleteCurrent,
        crate::DEL => C::ErasePrevious,
        ESC => return Decoded::Escape,
        _ => C::Ignore,
    };
    Decoded::Command(command)
}

fn decode_special_char(
    byte: u8,
    special_chars: &SpecialChars,
    del_erases_current_char: bool,
) -> Option<EditCommand> {
    let is = |slot: Option<u8>| slot == Some(byte);
    if is(special_chars.erase) {
        if byte == crate::DEL && del_erases_current_char {
            return Some(EditCommand::DeleteCurrent);
        }
        return Some(EditCommand::ErasePrevious);
    }
    if is(special_chars.eof) {
        return Some(EditCommand::EndOfFile);
    }
    if is(special_chars.kill) {
        return Some(EditCommand::KillLine);
    }
    if is(special_chars.word_erase) {
        return Some(EditCommand::KillPreviousWord);
    }
    if is(special_chars.reprint) {
        return Some(EditCommand::Redraw);
    }
    if is(special_chars.suspend) {
        return Some(EditCommand::Suspend);
    }
    None
}

/// Decode a complete escape sequence: `introducer` is `[` or `O`, `params` the
/// parameter bytes (digits and `;`), `final_byte` the terminator. Unknown sequences
/// decode to [`EditCommand::Ignore`].
#[must_use]
pub fn decode_escape_sequence(introducer: u8, params: &[u8], final_byte: u8) -> EditCommand {
    use EditCommand as C;

    match (introducer, params, final_byte) {
        (b'[' | b'O', [], b'A') => C::HistoryPrevious,
        (b'[' | b'O', [], b'B') => C::HistoryNext,
        (b'[' | b'O', [], b'C') => C::MoveRight,
        (b'[' | b'O', [], b'D') => C::MoveLeft,
        (b'[' | b'O', [], b'H') | (b'[', b"1" | b"7", b'~') => C::MoveStart,
        (b'[' | b'O', [], b'F') | (b'[', b"4" | b"8", b'~') => C::MoveEnd,
        (b'[', b"3", b'~') => C::DeleteCurrent,
        // Shift+Tab.
        (b'[', [], b'Z') => C::Complete(CompletionDirection::Backward),
        _ => C::Ignore,
    }
}

/// Parameter bytes of a CSI sequence.
#[must_use]
pub fn is_escape_param(byte: u8) -> bool { (0x30..=0x3f).contains(&byte) }

/// Final byte of a CSI or SS3 sequence.
#[must_use]
pub fn is_escape_final(byte: u8) -> bool { (0x40..=0x7e).contains(&byte) }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEL;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn decode(byte: u8) -> Decoded { decode_byte(byte, &SpecialChars::default(), false) }

    #[test_case(b'a', Decoded::InsertLead(b'a'))]
    #[test_case(b' ', Decoded::InsertLead(b' '))]
    #[test_case(0xC3, Decoded::InsertLead(0xC3))]
    #[test_case(LF, Decoded::Command(EditCommand::Accept))]
    #[test_case(CR, Decoded::Command(EditCommand::Accept))]
    #[test_case(TAB, Decoded::Command(EditCommand::Complete(CompletionDirection::Forward)))]
    #[test_case(CTRL_H, Decoded::Command(EditCommand::ErasePrevious))]
    #[test_case(DEL, Decoded::Command(EditCommand::ErasePrevious))]
    #[test_case(CTRL_K, Decoded::Command(EditCommand::KillToEnd))]
    #[test_case(CTRL_P, Decoded::Command(EditCommand::HistoryPrevious))]
    #[test_case(CTRL_N, Decoded::Command(EditCommand::HistoryNext))]
    #[test_case(0x1a, Decoded::Command(EditCommand::Suspend))]
    #[test_case(ESC, Decoded::Escape)]
    #[test_case(0x00, Decoded::Command(EditCommand::Ignore))]
    fn test_decode_byte(byte: u8, expected: Decoded) {
        assert_eq!(decode(byte), expected);
    }

    #[test]
    fn test_del_policy() {
        let table = SpecialChars::default();
        assert_eq!(
            decode_byte(DEL, &table, true),
            Decoded::Command(EditCommand::DeleteCurrent)
        );
        // Backspace still erases backwards.
        assert_eq!(
            decode_byte(CTRL_H, &table, true),
            Decoded::Command(EditCommand::ErasePrevious)
        );
    }

    #[test]
    fn test_stty_settings_win_over_fixed_bindings() {
        let table = SpecialChars {
            erase: Some(CTRL_H),
            kill: Some(CTRL_K),
            ..SpecialChars::none()
        };
        assert_eq!(
            decode_byte(CTRL_K, &table, false),
            Decoded::Command(EditCommand::KillLine)
        );
        // With nothing reserved, ^Z is not special.
        assert_eq!(
            decode_byte(0x1a, &SpecialChars::none(), false),
            Decoded::Command(EditCommand::Ignore)
        );
    }

    #[cfg(feature = "emacs")]
    #[test]
    fn test_emacs_bindings() {
        assert_eq!(decode(CTRL_A), Decoded::Command(EditCommand::MoveStart));
        assert_eq!(decode(CTRL_E), Decoded::Command(EditCommand::MoveEnd));
        assert_eq!(decode(CTRL_B), Decoded::Command(EditCommand::MoveLeft));
        assert_eq!(decode(CTRL_F), Decoded::Command(EditCommand::MoveRight));
    }

    #[test_case(b'[', b"", b'A', EditCommand::HistoryPrevious)]
    #[test_case(b'O', b"", b'B', EditCommand::HistoryNext)]
    #[test_case(b'[', b"", b'C', EditCommand::MoveRight)]
    #[test_case(b'[', b"", b'D', EditCommand::MoveLeft)]
    #[test_case(b'[', b"1", b'~', EditCommand::MoveStart)]
    #[test_case(b'O', b"", b'F', EditCommand::MoveEnd)]
    #[test_case(b'[', b"3", b'~', EditCommand::DeleteCurrent)]
    #[test_case(b'[', b"", b'Z', EditCommand::Complete(CompletionDirection::Backward))]
    #[test_case(b'[', b"1;5", b'C', EditCommand::Ignore)]
    fn test_decode_escape_sequence(
        introducer: u8,
        params: &[u8],
        final_byte: u8,
        expected: EditCommand,
    ) {
        assert_eq!(decode_escape_sequence(introducer, params, final_byte), expected);
    }
}
