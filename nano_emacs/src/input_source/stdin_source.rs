// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words EINTR epoll

//! [`ByteSource`] backed by the process's stdin.
//!
//! On Unix, stdin and a signal pipe for `SIGTSTP` and `SIGINT` are registered with one
//! [`mio::Poll`], so a Ctrl+Z typed while the editor is blocked waiting for a key comes
//! out of [`StdinByteSource::read_unit`] as [`InputUnit::Suspend`], in order with the
//! keys around it.
//!
//! The two signals are only taken over between [`ByteSource::begin_line`] and
//! [`ByteSource::end_line`]. The first `begin_line` in the process also installs one
//! permanent action per signal that performs the default action (terminate or stop)
//! whenever no line is being read, so outside of `read_line`, and after the source is
//! dropped, Ctrl+C and Ctrl+Z behave as they would without the editor.
//!
//! # EINTR handling
//!
//! Both `epoll_wait` and `read` are retried when interrupted by a signal.

use super::{ByteSource, InputUnit};
use std::{collections::VecDeque, io};

/// Read buffer size for stdin reads (`1_024` bytes).
pub const STDIN_READ_BUFFER_SIZE: usize = 1_024;

#[cfg(unix)]
mod unix_impl {
    use super::{ByteSource, InputUnit, STDIN_READ_BUFFER_SIZE, VecDeque, io};
    use miette::{Diagnostic, Report};
    use mio::{Events, Interest, Poll, Token, unix::SourceFd};
    use signal_hook::{consts::{SIGINT, SIGTSTP},
                      low_level::{emulate_default_handler, register}};
    use signal_hook_mio::v1_0::Signals;
    use std::{io::ErrorKind,
              os::fd::AsRawFd as _,
              sync::{OnceLock,
                     atomic::{AtomicBool, Ordering}}};

    /// Capacity for the [`mio::Events`] buffer.
    const EVENTS_CAPACITY: usize = 8;
    const STDIN_TOKEN: Token = Token(0);
    const SIGNALS_TOKEN: Token = Token(1);
    const HANDLED_SIGNALS: [i32; 2] = [SIGTSTP, SIGINT];

    /// Set while some [`StdinByteSource`] is between `begin_line` and `end_line`.
    static LINE_OWNS_SIGNALS: AtomicBool = AtomicBool::new(false);

    /// Failed to create [`mio::Poll`] (epoll/kqueue creation failed).
    #[derive(Debug, thiserror::Error, Diagnostic)]
    #[error("Failed to create mio::Poll")]
    #[diagnostic(
        code(nano_emacs::stdin_source::poll_creation),
        help("This usually means the system ran out of file descriptors")
    )]
    pub struct PollCreationError(#[source] pub io::Error);

    /// Failed to register stdin with mio.
    #[derive(Debug, thiserror::Error, Diagnostic)]
    #[error("Failed to register stdin with mio")]
    #[diagnostic(
        code(nano_emacs::stdin_source::stdin_registration),
        help("Ensure stdin is a valid file descriptor")
    )]
    pub struct StdinRegistrationError(#[source] pub io::Error);

    /// Installs, once per process, the action that keeps `SIGTSTP` and `SIGINT` doing
    /// their default thing while no line is being read.
    fn install_default_action_fallback() -> io::Result<()> {
        static INSTALLED: OnceLock<Result<(), ErrorKind>> = OnceLock::new();
        let installed = INSTALLED.get_or_init(|| {
            for signal in HANDLED_SIGNALS {
                // SAFETY: The action only does an atomic load and
                // `emulate_default_handler`, both async-signal-safe.
                let registered = unsafe {
                    register(signal, move || {
                        if !LINE_OWNS_SIGNALS.load(Ordering::SeqCst) {
                            emulate_default_handler(signal).ok();
                        }
                    })
                };
                registered.map_err(|error| error.kind())?;
            }
            Ok(())
        });
        (*installed).map_err(io::Error::from)
    }

    /// See the [module docs](super).
    #[allow(missing_debug_implementations)]
    pub struct StdinByteSource {
        poll_handle: Poll,
        ready_events_buffer: Events,
        /// [`Some`] only between `begin_line` and `end_line`.
        signals: Option<Signals>,
        stdin: io::Stdin,
        read_buffer: [u8; STDIN_READ_BUFFER_SIZE],
        /// Units that have been read but not handed out yet.
        pending: VecDeque<InputUnit>,
        /// epoll is edge triggered: a read that filled the whole buffer may have left
        /// data behind that won't produce another readiness event.
        more: bool,
        /// A read returned 0. Edge triggered readiness won't report that again.
        at_eof: bool,
    }

    impl StdinByteSource {
        /// Registers stdin for polling. Signals are left alone until
        /// [`ByteSource::begin_line`].
        ///
        /// # Errors
        ///
        /// Returns [`Report`] if any OS resource creation or registration fails.
        pub fn try_new() -> Result<Self, Report> {
            let poll_handle = Poll::new().map_err(PollCreationError)?;
            let stdin = io::stdin();

            poll_handle
                .registry()
                .register(
                    &mut SourceFd(&stdin.as_raw_fd()),
                    STDIN_TOKEN,
                    Interest::READABLE,
                )
                .map_err(StdinRegistrationError)?;

            Ok(Self {
                poll_handle,
                ready_events_buffer: Events::with_capacity(EVENTS_CAPACITY),
                signals: None,
                stdin,
                read_buffer: [0; STDIN_READ_BUFFER_SIZE],
                pending: VecDeque::new(),
                more: false,
                at_eof: false,
            })
        }

        /// `true` while this source turns `SIGTSTP` / `SIGINT` into input units.
        #[must_use]
        pub fn owns_signals(&self) -> bool { self.signals.is_some() }

        fn release_signals(&mut self) {
            if let Some(mut signals) = self.signals.take() {
                LINE_OWNS_SIGNALS.store(false, Ordering::SeqCst);
                if let Err(error) = self.poll_handle.registry().deregister(&mut signals) {
                    tracing::debug!(message = "signal pipe deregistration failed", %error);
                }
            }
            // A signal that arrived after the last read belongs to no line.
            self.pending
                .retain(|unit| !matches!(unit, InputUnit::Suspend | InputUnit::Interrupt));
        }

        fn consume_pending_signals(&mut self) {
            let Some(signals) = self.signals.as_mut() else {
                return;
            };
            for signal in signals.pending() {
                match signal {
                    SIGTSTP => self.pending.push_back(InputUnit::Suspend),
                    SIGINT => self.pending.push_back(InputUnit::Interrupt),
                    _ => {}
                }
            }
        }

        fn consume_stdin_input(&mut self) -> io::Result<()> {
            let n = rustix::io::retry_on_intr(|| {
                rustix::io::read(&self.stdin, &mut self.read_buffer[..])
            })?;
            if n == 0 {
                self.more = false;
                self.at_eof = true;
                self.pending.push_back(InputUnit::Eof);
            } else {
                self.more = n == STDIN_READ_BUFFER_SIZE;
                self.pending
                    .extend(self.read_buffer[..n].iter().copied().map(InputUnit::Byte));
            }
            Ok(())
        }
    }

    impl Drop for StdinByteSource {
        fn drop(&mut self) { self.release_signals(); }
    }

    impl ByteSource for StdinByteSource {
        fn read_unit(&mut self) -> io::Result<InputUnit> {
            // Breaks borrow so the handlers can use `&mut self`.
            fn collect_ready_tokens(events: &Events) -> Vec<Token> {
                events.iter().map(mio::event::Event::token).collect()
            }

            loop {
                if let Some(unit) = self.pending.pop_front() {
                    return Ok(unit);
                }

                if self.at_eof {
                    return Ok(InputUnit::Eof);
                }

                if self.more {
                    self.consume_stdin_input()?;
                    continue;
                }

                // Block until stdin or signals become ready.
                if let Err(err) = self.poll_handle.poll(&mut self.ready_events_buffer, None) {
                    if err.kind() == ErrorKind::Interrupted {
                        continue;
                    }
                    return Err(err);
                }

                let tokens = collect_ready_tokens(&self.ready_events_buffer);
                if tokens.contains(&SIGNALS_TOKEN) {
                    self.consume_pending_signals();
                }
                if tokens.contains(&STDIN_TOKEN) {
                    self.consume_stdin_input()?;
                }
            }
        }

        fn begin_line(&mut self) -> io::Result<()> {
            if self.signals.is_some() {
                return Ok(());
            }
            install_default_action_fallback()?;

            let mut signals = Signals::new(HANDLED_SIGNALS)?;
            self.poll_handle
                .registry()
                .register(&mut signals, SIGNALS_TOKEN, Interest::READABLE)?;
            self.signals = Some(signals);
            LINE_OWNS_SIGNALS.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn end_line(&mut self) { self.release_signals(); }
    }
}

#[cfg(not(unix))]
mod fallback_impl {
    use super::{ByteSource, InputUnit, STDIN_READ_BUFFER_SIZE, VecDeque, io};
    use std::io::Read as _;

    /// Plain blocking reads from stdin. No signal integration.
    #[derive(Debug)]
    pub struct StdinByteSource {
        pending: VecDeque<InputUnit>,
    }

    impl StdinByteSource {
        /// # Errors
        ///
        /// Never fails on this platform.
        pub fn try_new() -> miette::Result<Self> {
            Ok(Self {
                pending: VecDeque::new(),
            })
        }
    }

    impl ByteSource for StdinByteSource {
        fn read_unit(&mut self) -> io::Result<InputUnit> {
            if let Some(unit) = self.pending.pop_front() {
                return Ok(unit);
            }
            let mut buffer = [0; STDIN_READ_BUFFER_SIZE];
            loop {
                match io::stdin().read(&mut buffer) {
                    Ok(0) => return Ok(InputUnit::Eof),
                    Ok(n) => {
                        self.pending
                            .extend(buffer[..n].iter().copied().map(InputUnit::Byte));
                        return Ok(self.pending.pop_front().unwrap_or(InputUnit::Eof));
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => return Err(e),
                }
            }
        }
    }
}

#[cfg(unix)]
pub use unix_impl::*;

#[cfg(not(unix))]
pub use fallback_impl::*;
