// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! In-memory stand-ins for the terminal, used by unit and integration tests.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod mock_terminal_driver;
pub mod scripted_units;
pub mod stdout_mock;

// Re-export.
pub use mock_terminal_driver::*;
pub use scripted_units::*;
pub use stdout_mock::*;
