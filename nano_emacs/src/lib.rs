// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words termios VMIN VTIME ICANON ISIG

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

//! # nano_emacs
//!
//! A small, blocking line editor for REPLs. It talks to the terminal directly in
//! non-canonical mode and redraws using nothing but backspace, space and the line's own
//! bytes, so it works on terminals that understand no escape sequences at all.
//!
//! ## Features
//!
//! - UTF-8 aware cursor motion and erasing (a wide CJK character is one keystroke and
//!   two columns), with a single-byte mode for non UTF-8 locales.
//! - History recall with `^P` / `^N` (and the arrow keys) over a host owned list.
//! - Word erase (`^W`), line kill (`^U`), kill to end of line (`^K`).
//! - Filename completion with `TAB`, cycling through candidates on repeated presses,
//!   and `Shift+TAB` to cycle backwards.
//! - Honors the terminal's `stty` settings for erase, kill, word erase, reprint, EOF
//!   and suspend.
//! - Suspend (`^Z`) and interrupt (`^C`) arrive as ordinary input units, so the
//!   terminal is always restored before the process stops, and re-entered after.
//!
//! ## Key bindings
//!
//! | Key                         | Action                                       |
//! | --------------------------- | -------------------------------------------- |
//! | `^A` / `Home`               | Start of line (`emacs` feature)              |
//! | `^E` / `End`                | End of line (`emacs` feature)                |
//! | `^B` / `Left`               | One character left (`emacs` feature)         |
//! | `^F` / `Right`              | One character right (`emacs` feature)        |
//! | `^H`, `DEL`                 | Erase previous character                     |
//! | `^D`                        | End of input on an empty line, else delete   |
//! | `^K`                        | Kill to end of line                          |
//! | `^U`                        | Kill from start of line to cursor            |
//! | `^W`                        | Kill previous word                           |
//! | `^L`, `^R`                  | Redraw the line                              |
//! | `^P` / `Up`, `^N` / `Down`  | Previous / next history entry                |
//! | `TAB`, `Shift+TAB`          | Complete filename, cycle forward / backward  |
//! | `Enter`                     | Accept                                       |
//!
//! ## Usage
//!
//! ```no_run
//! use nano_emacs::{EditorConfig, History, LineEditor, is_interactive};
//!
//! let mut editor = LineEditor::try_new_stdio(EditorConfig::default())?;
//! let mut history = History::default();
//! if is_interactive() {
//!     while let Some(line) = editor.read_line("gnuplot> ", &history)? {
//!         history.add(line);
//!     }
//! }
//! # Ok::<(), miette::Report>(())
//! ```
//!
//! ## Embedding under a host event loop
//!
//! [`LineEditor`] is generic over its [`ByteSource`]. A host that has to keep servicing
//! its own events while waiting for a key wraps its "wait for input" step in a
//! [`FnByteSource`].

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod char_decoder;
pub mod completion;
pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod input_source;
pub mod line_buffer;
pub mod log;
pub mod terminal_mode;
pub mod test_fixtures;

// Re-export.
pub use char_decoder::*;
pub use completion::*;
pub use config::*;
pub use editor::*;
pub use error::*;
pub use history::*;
pub use input_source::*;
pub use line_buffer::*;
pub use log::*;
pub use terminal_mode::*;
pub use test_fixtures::*;
