// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! `SIGINT` / `SIGTSTP` belong to the editor only while a line is being read.
//!
//! Each test re-runs this test binary as a child process with stdin on a pipe, and the
//! child does the signal raising, so a default action that terminates only takes the
//! child down.

#![cfg(unix)]

use nano_emacs::{ByteSource, InputUnit, StdinByteSource};
use pretty_assertions::assert_eq;
use signal_hook::{consts::{SIGINT, SIGTSTP},
                  low_level::raise};
use std::{os::unix::process::ExitStatusExt as _,
          process::{Command, ExitStatus, Stdio},
          thread,
          time::Duration};

const CHILD_ENV_VAR: &str = "NANO_EMACS_SIGNAL_TEST_CHILD";
/// Exit code of a child that is still alive after raising the signal.
const SURVIVED_EXIT_CODE: i32 = 3;

fn is_child() -> bool { std::env::var(CHILD_ENV_VAR).is_ok() }

fn run_in_child(test_name: &str) -> ExitStatus {
    let test_binary = std::env::current_exe().unwrap();
    let mut child = Command::new(test_binary)
        .env(CHILD_ENV_VAR, "1")
        .args(["--exact", test_name, "--test-threads", "1", "--nocapture"])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .unwrap();
    // Held open until the child exits, so the child never sees end of input.
    let stdin = child.stdin.take();
    let status = child.wait().unwrap();
    drop(stdin);
    status
}

/// Give a pending default action time to land, then report survival.
fn exit_survived() -> ! {
    thread::sleep(Duration::from_secs(2));
    std::process::exit(SURVIVED_EXIT_CODE);
}

#[test]
fn test_sigint_terminates_after_source_dropped() {
    if is_child() {
        let mut source = StdinByteSource::try_new().unwrap();
        source.begin_line().unwrap();
        source.end_line();
        drop(source);
        raise(SIGINT).unwrap();
        exit_survived();
    }

    let status = run_in_child("test_sigint_terminates_after_source_dropped");
    assert_eq!(status.signal(), Some(SIGINT));
}

#[test]
fn test_sigint_terminates_between_lines() {
    if is_child() {
        let mut source = StdinByteSource::try_new().unwrap();
        source.begin_line().unwrap();
        source.end_line();
        assert!(!source.owns_signals());
        raise(SIGINT).unwrap();
        exit_survived();
    }

    let status = run_in_child("test_sigint_terminates_between_lines");
    assert_eq!(status.signal(), Some(SIGINT));
}

#[test]
fn test_sigint_terminates_before_first_line() {
    if is_child() {
        let _source = StdinByteSource::try_new().unwrap();
        raise(SIGINT).unwrap();
        exit_survived();
    }

    let status = run_in_child("test_sigint_terminates_before_first_line");
    assert_eq!(status.signal(), Some(SIGINT));
}

#[test]
fn test_signals_become_input_units_while_reading_a_line() {
    if is_child() {
        let mut source = StdinByteSource::try_new().unwrap();
        source.begin_line().unwrap();
        assert!(source.owns_signals());

        raise(SIGINT).unwrap();
        assert_eq!(source.read_unit().unwrap(), InputUnit::Interrupt);
        raise(SIGTSTP).unwrap();
        assert_eq!(source.read_unit().unwrap(), InputUnit::Suspend);

        source.end_line();
        std::process::exit(0);
    }

    let status = run_in_child("test_signals_become_input_units_while_reading_a_line");
    assert!(status.success(), "child exited with {status:?}");
}
