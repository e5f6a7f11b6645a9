// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{InputUnit, ScriptedByteSource};

/// The bytes of `text` as [`InputUnit::Byte`]s.
#[must_use]
pub fn units_from_str(text: &str) -> Vec<InputUnit> {
    text.bytes().map(InputUnit::Byte).collect()
}

/// Shorthand for a [`ScriptedByteSource`] that types `text`.
#[must_use]
pub fn scripted(text: &str) -> ScriptedByteSource { ScriptedByteSource::new(units_from_str(text)) }
