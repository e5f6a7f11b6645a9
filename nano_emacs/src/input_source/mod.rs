// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod input_unit;
pub mod scripted_source;
pub mod stdin_source;

// Re-export.
pub use input_unit::*;
pub use scripted_source::*;
pub use stdin_source::*;
