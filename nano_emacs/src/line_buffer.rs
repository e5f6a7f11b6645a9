// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::ReadlineError;
use std::ops::Range;

/// Initial capacity of a [`LineBuffer`], and the amount it grows by.
pub const LINE_BUFFER_INCREMENT: usize = 1_024;

/// The line under construction.
///
/// Positions are plain byte indices into `bytes`, so growing the buffer can never
/// invalidate them. The buffer keeps one byte of headroom past the logical length
/// (where a C implementation would put its terminator), so the invariant is
/// `0 <= cursor <= len < capacity`.
///
/// Callers are responsible for keeping `cursor` on a character boundary. The editor
/// only ever moves it by amounts reported by [`crate::char_decoder`].
#[derive(Debug)]
pub struct LineBuffer {
    bytes: Vec<u8>,
    capacity: usize,
    increment: usize,
    cursor: usize,
}

impl Default for LineBuffer {
    fn default() -> Self { Self::new(LINE_BUFFER_INCREMENT) }
}

impl LineBuffer {
    #[must_use]
    pub fn new(increment: usize) -> Self {
        let increment = increment.max(1);
        Self {
            bytes: Vec::with_capacity(increment),
            capacity: increment,
            increment,
            cursor: 0,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] { &self.bytes }

    #[must_use]
    pub fn len(&self) -> usize { self.bytes.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    #[must_use]
    pub fn capacity(&self) -> usize { self.capacity }

    #[must_use]
    pub fn is_cursor_at_end(&self) -> bool { self.cursor == self.bytes.len() }

    /// Bytes from the cursor to the end of the line.
    #[must_use]
    pub fn tail(&self) -> &[u8] { &self.bytes[self.cursor..] }

    /// Clamped to `len`.
    pub fn set_cursor(&mut self, cursor: usize) { self.cursor = cursor.min(self.bytes.len()); }

    /// Make sure `extra` more bytes fit, growing by whole increments. This has to run
    /// before any bytes are shifted.
    ///
    /// # Errors
    ///
    /// Returns [`ReadlineError::Allocation`] when the allocator refuses.
    pub fn ensure_room(&mut self, extra: usize) -> Result<(), ReadlineError> {
        let needed = self.bytes.len() + extra;
        if needed < self.capacity {
            return Ok(());
        }
        let increments = (needed - self.capacity) / self.increment + 1;
        let requested = self.capacity + increments * self.increment;
        self.bytes
            .try_reserve_exact(requested - self.bytes.len())
            .map_err(|source| ReadlineError::Allocation { requested, source })?;
        tracing::trace!(message = "line buffer grew", from = self.capacity, to = requested);
        self.capacity = requested;
        Ok(())
    }

    /// Insert `data` at the cursor and move the cursor past it.
    ///
    /// # Errors
    ///
    /// Returns [`ReadlineError::Allocation`] when the buffer can't grow.
    pub fn insert(&mut self, data: &[u8]) -> Result<(), ReadlineError> {
        self.ensure_room(data.len())?;
        let at = self.cursor;
        self.bytes.splice(at..at, data.iter().copied());
        self.cursor += data.len();
        Ok(())
    }

    /// Remove `range` and keep the cursor pointing at the same text. A cursor inside
    /// the removed range lands on its start.
    pub fn remove(&mut self, range: Range<usize>) {
        let end = range.end.min(self.bytes.len());
        let start = range.start.min(end);
        self.bytes.drain(start..end);
        if self.cursor >= end {
            self.cursor -= end - start;
        } else if self.cursor > start {
            self.cursor = start;
        }
    }

    /// Drop everything from the cursor on.
    pub fn truncate_at_cursor(&mut self) { self.bytes.truncate(self.cursor); }

    /// Replace the whole line. The cursor ends up at the end.
    ///
    /// # Errors
    ///
    /// Returns [`ReadlineError::Allocation`] when the buffer can't grow.
    pub fn replace_all(&mut self, data: &[u8]) -> Result<(), ReadlineError> {
        self.clear();
        self.insert(data)
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
        self.cursor = 0;
    }

    /// Hand the line over, trimmed to its exact size.
    #[must_use]
    pub fn into_accepted(mut self) -> Vec<u8> {
        self.bytes.shrink_to_fit();
        self.bytes
    }

    /// Same as [`Self::into_accepted`] but leaves a fresh, empty buffer behind.
    pub fn take_accepted(&mut self) -> Vec<u8> {
        let increment = self.increment;
        std::mem::replace(self, LineBuffer::new(increment)).into_accepted()
    }
}
