// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Character decoding for cursor motion and erasing.
//!
//! The editor stores the line as raw bytes. Every operation that moves the cursor or
//! deletes something asks this module two questions about the byte at a given offset:
//!
//! 1. How many bytes make up the character that starts here ([`sequence_length`])?
//! 2. How many terminal columns does it occupy ([`display_width`])?
//!
//! Only two encodings are distinguished: single-byte (every byte is one character one
//! column wide) and UTF-8. Nothing in here panics or indexes out of bounds, even for
//! malformed input. A sequence that can't be resolved is treated as one byte.

use std::env;
use unicode_width::UnicodeWidthChar;

/// Encoding of the bytes arriving from the terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Encoding {
    /// Latin-1 and friends: one byte, one column.
    SingleByte,
    /// Multi-byte aware.
    #[default]
    Utf8,
}

impl Encoding {
    /// Classify from the usual locale variables. The first non-empty one of `LC_ALL`,
    /// `LC_CTYPE`, `LANG` decides. No locale at all means [`Encoding::SingleByte`].
    #[must_use]
    pub fn from_locale_env() -> Self {
        let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find(|value| !value.is_empty());
        match locale {
            Some(value) => Self::from_locale_name(&value),
            None => Encoding::SingleByte,
        }
    }

    /// `"en_US.UTF-8"` and `"C.utf8"` are UTF-8, everything else is single byte.
    #[must_use]
    pub fn from_locale_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.contains("utf-8") || lower.contains("utf8") {
            Encoding::Utf8
        } else {
            Encoding::SingleByte
        }
    }
}

/// Byte length and display width of one character. Computed on demand, never stored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CharSpan {
    pub len: usize,
    pub width: usize,
}

#[must_use]
pub fn is_continuation_byte(byte: u8) -> bool { byte & 0xC0 == 0x80 }

/// Number of bytes a UTF-8 lead byte announces. Continuation bytes and invalid lead
/// bytes announce 1.
#[must_use]
pub fn utf8_sequence_len_from_lead(byte: u8) -> usize {
    match byte {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

/// Number of bytes of the character starting at `pos`. Returns 0 when `pos` is at or
/// past the end of `buf`.
///
/// For UTF-8 this counts forward from `pos + 1` while the bytes look like continuation
/// bytes, bounded by the end of the buffer. A sequence that was cut off by the end of
/// the buffer (fewer continuation bytes than the lead byte announced) counts as one
/// byte, so loops driven by this function always make progress.
#[must_use]
pub fn sequence_length(encoding: Encoding, buf: &[u8], pos: usize) -> usize {
    if pos >= buf.len() {
        return 0;
    }
    match encoding {
        Encoding::SingleByte => 1,
        Encoding::Utf8 => {
            let mut len = 1;
            while pos + len < buf.len() && is_continuation_byte(buf[pos + len]) {
                len += 1;
            }
            let announced = utf8_sequence_len_from_lead(buf[pos]);
            let truncated = pos + len == buf.len() && len < announced;
            if truncated { 1 } else { len }
        }
    }
}

/// Start offset of the character that ends right before `pos`. Returns 0 for `pos == 0`.
#[must_use]
pub fn previous_sequence_start(encoding: Encoding, buf: &[u8], pos: usize) -> usize {
    let pos = pos.min(buf.len());
    if pos == 0 {
        return 0;
    }
    match encoding {
        Encoding::SingleByte => pos - 1,
        Encoding::Utf8 => {
            let mut start = pos - 1;
            while start > 0 && is_continuation_byte(buf[start]) {
                start -= 1;
            }
            // The forward scan has to agree, otherwise we are looking at a fragment and
            // step back exactly one byte.
            if start + sequence_length(encoding, buf, start) == pos {
                start
            } else {
                pos - 1
            }
        }
    }
}

/// Columns occupied by the character at `pos`: 2 for wide / CJK code points, otherwise
/// 1. Malformed sequences are 1.
#[must_use]
pub fn display_width(encoding: Encoding, buf: &[u8], pos: usize) -> usize {
    let len = sequence_length(encoding, buf, pos);
    if len == 0 {
        return 0;
    }
    match encoding {
        Encoding::SingleByte => 1,
        Encoding::Utf8 => std::str::from_utf8(&buf[pos..pos + len])
            .ok()
            .and_then(|it| it.chars().next())
            .and_then(UnicodeWidthChar::width)
            .map_or(1, |width| if width >= 2 { 2 } else { 1 }),
    }
}

#[must_use]
pub fn span_at(encoding: Encoding, buf: &[u8], pos: usize) -> CharSpan {
    CharSpan {
        len: sequence_length(encoding, buf, pos),
        width: display_width(encoding, buf, pos),
    }
}

/// Total display width of `bytes`, walking it one character at a time.
#[must_use]
pub fn str_width(encoding: Encoding, bytes: &[u8]) -> usize {
    let mut pos = 0;
    let mut width = 0;
    while pos < bytes.len() {
        let span = span_at(encoding, bytes, pos);
        width += span.width;
        pos += span.len;
    }
    width
}
