// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The editing engine: decodes input into [`EditCommand`]s and applies them to the
//! line buffer, echoing with nothing but backspace and space.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod key_map;
pub mod line_editor;
pub mod redraw;

// Re-export.
pub use key_map::*;
pub use line_editor::*;
pub use redraw::*;
