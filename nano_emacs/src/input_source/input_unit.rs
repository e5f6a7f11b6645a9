// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

/// One unit of input, as delivered to the editing engine.
///
/// Signals that arrive while the editor waits for input are turned into ordinary
/// values here, so the engine handles a suspend exactly like a key press instead of
/// having a signal handler mutate its state from the side.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputUnit {
    Byte(u8),
    /// `SIGTSTP` (Ctrl+Z with signal generation on).
    Suspend,
    /// `SIGINT` (Ctrl+C with signal generation on).
    Interrupt,
    /// The source is exhausted.
    Eof,
}

/// A blocking "give me the next input unit" primitive.
pub trait ByteSource {
    /// Block until the next unit is available.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying device fails.
    fn read_unit(&mut self) -> io::Result<InputUnit>;

    /// Called when [`crate::LineEditor::read_line`] starts reading a line, before the
    /// first [`Self::read_unit`].
    ///
    /// # Errors
    ///
    /// Returns an error when the source can't get ready to deliver input.
    fn begin_line(&mut self) -> io::Result<()> { Ok(()) }

    /// Called on every exit path of [`crate::LineEditor::read_line`] that followed a
    /// successful [`Self::begin_line`].
    fn end_line(&mut self) {}
}

/// Adapts a host supplied closure into a [`ByteSource`]. This is how a host with its
/// own event loop embeds the editor: the closure pumps that loop until one unit is
/// available, then returns it.
pub struct FnByteSource<F>
where
    F: FnMut() -> io::Result<InputUnit>,
{
    fetch: F,
}

impl<F> FnByteSource<F>
where
    F: FnMut() -> io::Result<InputUnit>,
{
    pub fn new(fetch: F) -> Self { Self { fetch } }
}

impl<F> ByteSource for FnByteSource<F>
where
    F: FnMut() -> io::Result<InputUnit>,
{
    fn read_unit(&mut self) -> io::Result<InputUnit> { (self.fetch)() }
}

impl<F> std::fmt::Debug for FnByteSource<F>
where
    F: FnMut() -> io::Result<InputUnit>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnByteSource").finish_non_exhaustive()
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn read_unit(&mut self) -> io::Result<InputUnit> { (**self).read_unit() }

    fn begin_line(&mut self) -> io::Result<()> { (**self).begin_line() }

    fn end_line(&mut self) { (**self).end_line(); }
}
