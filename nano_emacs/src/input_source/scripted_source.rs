// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{ByteSource, InputUnit};
use std::{collections::VecDeque, io};

/// Replays a fixed sequence of [`InputUnit`]s, then reports [`InputUnit::Eof`]
/// forever. Used by tests, and by hosts that feed the editor canned keystrokes.
#[derive(Debug, Default, Clone)]
pub struct ScriptedByteSource {
    units: VecDeque<InputUnit>,
    lines_begun: usize,
    is_reading_line: bool,
}

impl ScriptedByteSource {
    #[must_use]
    pub fn new(units: impl IntoIterator<Item = InputUnit>) -> Self {
        Self {
            units: units.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Every byte of `bytes`, in order.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(bytes.iter().copied().map(InputUnit::Byte))
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.units.extend(bytes.iter().copied().map(InputUnit::Byte));
    }

    pub fn push(&mut self, unit: InputUnit) { self.units.push_back(unit); }

    #[must_use]
    pub fn remaining(&self) -> usize { self.units.len() }

    /// How many times [`ByteSource::begin_line`] was called.
    #[must_use]
    pub fn lines_begun(&self) -> usize { self.lines_begun }

    /// `true` between [`ByteSource::begin_line`] and [`ByteSource::end_line`].
    #[must_use]
    pub fn is_reading_line(&self) -> bool { self.is_reading_line }
}

impl ByteSource for ScriptedByteSource {
    fn read_unit(&mut self) -> io::Result<InputUnit> {
        Ok(self.units.pop_front().unwrap_or(InputUnit::Eof))
    }

    fn begin_line(&mut self) -> io::Result<()> {
        self.lines_begun += 1;
        self.is_reading_line = true;
        Ok(())
    }

    fn end_line(&mut self) { self.is_reading_line = false; }
}
