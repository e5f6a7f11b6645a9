// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Output primitives. The only bytes ever written are backspace, space, newline, the
//! prompt, and the line's own bytes, so this works on any terminal, including ones
//! that understand no escape sequences at all.

use crate::{Encoding, str_width};
use std::io::{self, Write};

pub const BACKSPACE: u8 = 0x08;
pub const SPACE: u8 = b' ';

/// Columns a single character deletion may leave behind (one wide character).
pub const STALE_COLS_ONE_CHAR: usize = 2;

/// Move the cursor left by `cols` columns.
///
/// # Errors
///
/// Returns an error when the output can't be written.
pub fn write_backspaces(out: &mut impl Write, cols: usize) -> io::Result<()> {
    write_repeated(out, BACKSPACE, cols)
}

/// # Errors
///
/// Returns an error when the output can't be written.
pub fn write_spaces(out: &mut impl Write, cols: usize) -> io::Result<()> {
    write_repeated(out, SPACE, cols)
}

fn write_repeated(out: &mut impl Write, byte: u8, count: usize) -> io::Result<()> {
    let chunk = [byte; 64];
    let mut left = count;
    while left > 0 {
        let n = left.min(chunk.len());
        out.write_all(&chunk[..n])?;
        left -= n;
    }
    Ok(())
}

/// Rewrite `tail` (the bytes from the cursor to the end of the line) at the cursor,
/// blank `stale_cols` columns after it that still show old text, and move back.
///
/// # Errors
///
/// Returns an error when the output can't be written.
pub fn redraw_tail(
    out: &mut impl Write,
    encoding: Encoding,
    tail: &[u8],
    stale_cols: usize,
) -> io::Result<()> {
    out.write_all(tail)?;
    write_spaces(out, stale_cols)?;
    write_backspaces(out, str_width(encoding, tail) + stale_cols)
}

/// Blank the whole line and leave the cursor at its first column. `line` is the
/// entire buffer and `cursor` the byte offset the terminal cursor is at.
///
/// # Errors
///
/// Returns an error when the output can't be written.
pub fn clear_line(
    out: &mut impl Write,
    encoding: Encoding,
    line: &[u8],
    cursor: usize,
) -> io::Result<()> {
    let total = str_width(encoding, line);
    write_backspaces(out, str_width(encoding, &line[..cursor.min(line.len())]))?;
    write_spaces(out, total)?;
    write_backspaces(out, total)
}

/// Start over on a fresh line: prompt, the whole line, then back to `cursor`.
///
/// # Errors
///
/// Returns an error when the output can't be written.
pub fn redraw_line(
    out: &mut impl Write,
    encoding: Encoding,
    prompt: &str,
    line: &[u8],
    cursor: usize,
) -> io::Result<()> {
    out.write_all(b"\n")?;
    out.write_all(prompt.as_bytes())?;
    out.write_all(line)?;
    write_backspaces(out, str_width(encoding, &line[cursor.min(line.len())..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_redraw_tail() {
        let mut out = vec![];
        redraw_tail(&mut out, Encoding::Utf8, b"cd", 2).unwrap();
        assert_eq!(out, b"cd  \x08\x08\x08\x08");
    }

    #[test]
    fn test_redraw_tail_wide() {
        let mut out = vec![];
        redraw_tail(&mut out, Encoding::Utf8, "中".as_bytes(), 0).unwrap();
        assert_eq!(out, "中\x08\x08".as_bytes());
    }

    #[test]
    fn test_clear_line() {
        let mut out = vec![];
        clear_line(&mut out, Encoding::Utf8, b"abc", 2).unwrap();
        assert_eq!(out, b"\x08\x08   \x08\x08\x08");
    }

    #[test]
    fn test_long_runs_are_chunked() {
        let mut out = vec![];
        write_spaces(&mut out, 150).unwrap();
        assert_eq!(out, vec![SPACE; 150]);
    }

    #[test]
    fn test_redraw_line() {
        let mut out = vec![];
        redraw_line(&mut out, Encoding::Utf8, "gp> ", b"plot x", 4).unwrap();
        assert_eq!(out, b"\ngp> plot x\x08\x08");
    }
}
