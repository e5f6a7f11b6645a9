// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{self, Write},
          sync::{Arc, Mutex}};
use unicode_width::UnicodeWidthChar;

/// You can safely clone this struct, since it only contains an `Arc<Mutex<Vec<u8>>>`.
/// The inner `buffer` will not be cloned, just the [Arc] will be cloned. Hand one clone
/// to the editor and keep the other to look at what was written.
#[derive(Debug, Clone, Default)]
pub struct StdoutMock {
    pub buffer: Arc<Mutex<Vec<u8>>>,
}

impl StdoutMock {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn get_copy_of_buffer(&self) -> Vec<u8> { self.buffer.lock().unwrap().clone() }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn get_copy_of_buffer_as_string(&self) -> String {
        String::from_utf8_lossy(&self.get_copy_of_buffer()).into_owned()
    }

    /// What a terminal would show on the line being edited, right before the
    /// newline that accepted it, and the cursor column there. Understands only what the
    /// editor emits: printable text, backspace, `\r` and `\n`.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn rendered_line_before_accept(&self) -> (String, usize) {
        let text = self.get_copy_of_buffer_as_string();
        let text = text.strip_suffix('\n').unwrap_or(&text);
        let last_line = text.rsplit('\n').next().unwrap_or_default();

        // Second half of a wide character is '\0'.
        let mut cells: Vec<char> = vec![];
        let mut col: usize = 0;
        for ch in last_line.chars() {
            match ch {
                '\r' => col = 0,
                '\x08' => col = col.saturating_sub(1),
                _ => {
                    let width = ch.width().unwrap_or(1).max(1);
                    if cells.len() < col + width {
                        cells.resize(col + width, ' ');
                    }
                    cells[col] = ch;
                    if width == 2 {
                        cells[col + 1] = '\0';
                    }
                    col += width;
                }
            }
        }

        let line: String = cells.into_iter().filter(|it| *it != '\0').collect();
        (line.trim_end().to_string(), col)
    }
}

impl Write for StdoutMock {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("stdout mock lock poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}
