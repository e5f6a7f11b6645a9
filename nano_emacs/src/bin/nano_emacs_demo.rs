// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tiny REPL on top of [`nano_emacs::LineEditor`]: every accepted line is echoed back,
//! and kept in a history file across runs.
//!
//! ```text
//! cargo run --bin nano_emacs_demo -- --log-file /tmp/nano_emacs.log --log-level debug
//! ```

use clap::Parser;
use miette::IntoDiagnostic as _;
use nano_emacs::{EditorConfig, HISTORY_SIZE_MAX, History, LineEditor, ReadlineError,
                 TracingConfig, WriterConfig, is_interactive, try_initialize_logging_global};
use std::{io::{self, BufRead as _, Write as _},
          path::PathBuf};
use tracing_core::LevelFilter;

const HISTORY_FILE_NAME: &str = ".nano_emacs_history";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Prompt shown before each line
    #[arg(long, default_value = "nano> ")]
    prompt: String,

    /// History file [default: ~/.nano_emacs_history]
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Write logs to this file (nothing is logged otherwise)
    #[arg(long)]
    log_file: Option<String>,

    /// One of: off, error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// DEL deletes the character under the cursor instead of the one before it
    #[arg(long)]
    del_erases_current_char: bool,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    try_initialize_logging_global(TracingConfig {
        writer_config: WriterConfig::from_args(cli.log_file.clone(), None),
        level_filter: cli.log_level,
    })?;
    tracing::debug!(message = "starting", ?cli);

    let history_file = cli
        .history_file
        .clone()
        .or_else(|| dirs::home_dir().map(|it| it.join(HISTORY_FILE_NAME)));
    let mut history = match &history_file {
        Some(path) => History::load(path, HISTORY_SIZE_MAX).into_diagnostic()?,
        None => History::default(),
    };

    if is_interactive() {
        run_interactive(&cli, &mut history)?;
    } else {
        run_piped(&mut history)?;
    }

    if let Some(path) = &history_file {
        history.save(path).into_diagnostic()?;
    }
    Ok(())
}

fn run_interactive(cli: &Cli, history: &mut History) -> miette::Result<()> {
    let config = EditorConfig::default().with_del_erases_current_char(
        cli.del_erases_current_char || EditorConfig::default().del_erases_current_char,
    );
    let mut editor = LineEditor::try_new_stdio(config)?;

    loop {
        match editor.read_line(&cli.prompt, &*history) {
            Ok(Some(line)) => {
                println!("=> {line}");
                history.add(line);
            }
            Ok(None) => {
                println!();
                break;
            }
            Err(ReadlineError::Interrupted) => {}
            Err(error) => return Err(error.into()),
        }
    }
    Ok(())
}

/// Input isn't a terminal: no editor, just lines.
fn run_piped(history: &mut History) -> miette::Result<()> {
    let mut stdout = io::stdout().lock();
    for line in io::stdin().lock().lines() {
        let line = line.into_diagnostic()?;
        writeln!(stdout, "=> {line}").into_diagnostic()?;
        history.add(line);
    }
    Ok(())
}
