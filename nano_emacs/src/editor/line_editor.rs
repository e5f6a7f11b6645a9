// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{Decoded, EditCommand, STALE_COLS_ONE_CHAR, clear_line, decode_byte,
            decode_escape_sequence, is_escape_final, is_escape_param,
            key_map::{CR, LF},
            redraw_line, redraw_tail, write_backspaces, write_spaces};
use crate::{ByteSource, CompletionDirection, CompletionState, DirectoryLister,
            EditorConfig, Encoding, FsDirectoryLister, HistoryList, HistoryNavigator,
            InputUnit, LineBuffer, PlatformDriver, ReadlineError, StdinByteSource,
            TerminalDriver, is_continuation_byte, previous_sequence_start,
            sequence_length, str_width, utf8_sequence_len_from_lead};
use std::{fmt,
          io::{self, Write}};

/// Parameter bytes kept for one escape sequence. Longer ones are still consumed.
const ESCAPE_PARAMS_MAX: usize = 8;

/// Whether [`LineEditor::read_line`] keeps reading after a command.
#[derive(Debug)]
enum Flow {
    Continue,
    Done(Option<String>),
}

/// Line editor for dumb terminals.
///
/// Owns everything one editing session needs: where bytes come from, where echo goes,
/// the terminal driver, the line buffer, and the history and completion cursors. Call
/// [`Self::read_line`] once per prompt.
///
/// ```no_run
/// use nano_emacs::{EditorConfig, History, LineEditor};
///
/// let mut editor = LineEditor::try_new_stdio(EditorConfig::default())?;
/// let mut history = History::default();
/// while let Some(line) = editor.read_line("gnuplot> ", &history)? {
///     history.add(line);
/// }
/// # Ok::<(), miette::Report>(())
/// ```
pub struct LineEditor<S, W, D>
where
    S: ByteSource,
    W: Write,
    D: TerminalDriver,
{
    source: S,
    output: W,
    driver: D,
    config: EditorConfig,
    encoding: Encoding,
    buffer: LineBuffer,
    history_navigator: HistoryNavigator,
    completion: CompletionState,
    lister: Box<dyn DirectoryLister>,
    prompt: String,
    /// A unit read while looking for the end of a character or escape sequence that
    /// turned out to belong to the next command.
    pushed_back: Option<InputUnit>,
}

impl<S, W, D> fmt::Debug for LineEditor<S, W, D>
where
    S: ByteSource,
    W: Write,
    D: TerminalDriver,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineEditor")
            .field("config", &self.config)
            .field("encoding", &self.encoding)
            .field("buffer", &self.buffer)
            .field("history_navigator", &self.history_navigator)
            .field("completion", &self.completion)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

impl LineEditor<StdinByteSource, io::Stdout, PlatformDriver> {
    /// Editor on the process's stdin and stdout, with the platform's terminal driver.
    ///
    /// # Errors
    ///
    /// Returns an error when stdin can't be set up for polling.
    pub fn try_new_stdio(config: EditorConfig) -> miette::Result<Self> {
        Ok(Self::new(
            StdinByteSource::try_new()?,
            io::stdout(),
            PlatformDriver::new(),
            config,
        ))
    }
}

impl<S, W, D> LineEditor<S, W, D>
where
    S: ByteSource,
    W: Write,
    D: TerminalDriver,
{
    pub fn new(source: S, output: W, driver: D, config: EditorConfig) -> Self {
        let encoding = config.resolve_encoding();
        let buffer = LineBuffer::new(config.buffer_increment);
        tracing::debug!(message = "line editor created", %encoding, ?config);
        Self {
            source,
            output,
            driver,
            config,
            encoding,
            buffer,
            history_navigator: HistoryNavigator::new(),
            completion: CompletionState::new(),
            lister: Box::new(FsDirectoryLister),
            prompt: String::new(),
            pushed_back: None,
        }
    }

    /// Use `lister` for filename completion instead of the real filesystem.
    #[must_use]
    pub fn with_directory_lister(mut self, lister: impl DirectoryLister + 'static) -> Self {
        self.lister = Box::new(lister);
        self
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig { &self.config }

    #[must_use]
    pub fn encoding(&self) -> Encoding { self.encoding }

    #[must_use]
    pub fn driver(&self) -> &D { &self.driver }

    pub fn source_mut(&mut self) -> &mut S { &mut self.source }

    #[must_use]
    pub fn into_parts(self) -> (S, W, D) { (self.source, self.output, self.driver) }

    /// Show `prompt` and edit one line.
    ///
    /// Returns `Ok(Some(line))` when the line is accepted (without its terminator),
    /// and `Ok(None)` on end of input with an empty line. The terminal is back in its
    /// original mode when this returns, whichever way it returns.
    ///
    /// `history` is only read. Adding the accepted line to it is up to the caller.
    ///
    /// # Errors
    ///
    /// - [`ReadlineError::Interrupted`] when `SIGINT` arrived. The line is discarded.
    /// - [`ReadlineError::Allocation`] when the line buffer can't grow.
    /// - [`ReadlineError::TerminalMode`] when the terminal can't be restored.
    /// - [`ReadlineError::IO`] when reading input or writing echo fails.
    pub fn read_line<H>(
        &mut self,
        prompt: &str,
        history: &H,
    ) -> Result<Option<String>, ReadlineError>
    where
        H: HistoryList + ?Sized,
    {
        prompt.clone_into(&mut self.prompt);
        self.buffer = LineBuffer::new(self.config.buffer_increment);
        self.history_navigator.reset();
        self.completion.reset();

        self.source.begin_line()?;
        let result = self.read_line_with_terminal(history);
        self.source.end_line();
        result
    }

    fn read_line_with_terminal<H>(&mut self, history: &H) -> Result<Option<String>, ReadlineError>
    where
        H: HistoryList + ?Sized,
    {
        if let Err(report) = self.driver.enter_raw() {
            tracing::warn!(message = "raw mode unavailable, reading without editing", error = %report);
            return self.read_line_cooked();
        }

        let result = self.edit(history);
        if result.is_err() {
            self.buffer.clear();
        }

        match (result, self.driver.restore()) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Ok(_), Err(report)) => Err(report.into()),
            (Err(error), restored) => {
                if let Err(report) = restored {
                    tracing::error!(message = "terminal restore failed", error = %report);
                }
                Err(error)
            }
        }
    }

    fn edit<H>(&mut self, history: &H) -> Result<Option<String>, ReadlineError>
    where
        H: HistoryList + ?Sized,
    {
        self.output.write_all(self.prompt.as_bytes())?;
        self.output.flush()?;

        loop {
            let command = self.next_command()?;
            tracing::trace!(
                message = "edit command",
                %command,
                cursor = self.buffer.cursor(),
                len = self.buffer.len()
            );

            if !matches!(command, EditCommand::Complete(_)) {
                self.completion.reset();
            }

            let flow = self.apply(command, history)?;
            self.output.flush()?;
            if let Flow::Done(outcome) = flow {
                return Ok(outcome);
            }
        }
    }

    /// No raw mode: the terminal's own line discipline echoes and edits, this only
    /// collects bytes up to the end of the line.
    fn read_line_cooked(&mut self) -> Result<Option<String>, ReadlineError> {
        self.output.write_all(self.prompt.as_bytes())?;
        self.output.flush()?;

        let mut saw_input = false;
        loop {
            match self.next_unit()? {
                InputUnit::Byte(LF | CR) => break,
                InputUnit::Byte(byte) => {
                    saw_input = true;
                    self.buffer.insert(&[byte])?;
                }
                InputUnit::Eof if saw_input => break,
                InputUnit::Eof => return Ok(None),
                InputUnit::Interrupt => {
                    self.buffer.clear();
                    return Err(ReadlineError::Interrupted);
                }
                InputUnit::Suspend => {
                    if let Err(report) = self.driver.suspend_self() {
                        tracing::warn!(message = "suspend failed", error = %report);
                    }
                }
            }
        }

        Ok(Some(into_line(self.buffer.take_accepted())))
    }

    fn next_unit(&mut self) -> io::Result<InputUnit> {
        match self.pushed_back.take() {
            Some(unit) => Ok(unit),
            None => self.source.read_unit(),
        }
    }

    fn next_command(&mut self) -> Result<EditCommand, ReadlineError> {
        let command = match self.next_unit()? {
            InputUnit::Byte(byte) => {
                let special_chars = self.driver.special_chars();
                match decode_byte(byte, &special_chars, self.config.del_erases_current_char) {
                    Decoded::Command(command) => command,
                    Decoded::InsertLead(lead) => EditCommand::Insert(self.collect_character(lead)?),
                    Decoded::Escape => self.read_escape_sequence()?,
                }
            }
            InputUnit::Suspend => EditCommand::Suspend,
            InputUnit::Interrupt => EditCommand::Interrupt,
            InputUnit::Eof if self.buffer.is_empty() => EditCommand::EndOfFile,
            // Nothing more is coming, take the line as it is.
            InputUnit::Eof => EditCommand::Accept,
        };
        Ok(command)
    }

    /// Pull in the continuation bytes `lead` announces. Stops early at anything that
    /// isn't a continuation byte, and leaves that for the next command.
    fn collect_character(&mut self, lead: u8) -> io::Result<Vec<u8>> {
        let mut bytes = vec![lead];
        if self.encoding == Encoding::Utf8 {
            let expected = utf8_sequence_len_from_lead(lead);
            while bytes.len() < expected {
                match self.next_unit()? {
                    InputUnit::Byte(byte) if is_continuation_byte(byte) => bytes.push(byte),
                    other => {
                        self.pushed_back = Some(other);
                        break;
                    }
                }
            }
        }
        Ok(bytes)
    }

    /// Called after `ESC`. Reads `[` or `O`, parameters and the final byte.
    fn read_escape_sequence(&mut self) -> io::Result<EditCommand> {
        let introducer = match self.next_unit()? {
            InputUnit::Byte(byte @ (b'[' | b'O')) => byte,
            // A lone ESC, or Alt+key. The key itself is still typed.
            other => {
                self.pushed_back = Some(other);
                return Ok(EditCommand::Ignore);
            }
        };

        let mut params = Vec::with_capacity(ESCAPE_PARAMS_MAX);
        loop {
            match self.next_unit()? {
                InputUnit::Byte(byte) if introducer == b'[' && is_escape_param(byte) => {
                    if params.len() < ESCAPE_PARAMS_MAX {
                        params.push(byte);
                    }
                }
                InputUnit::Byte(byte) if is_escape_final(byte) => {
                    return Ok(decode_escape_sequence(introducer, &params, byte));
                }
                InputUnit::Byte(_) => return Ok(EditCommand::Ignore),
                other => {
                    self.pushed_back = Some(other);
                    return Ok(EditCommand::Ignore);
                }
            }
        }
    }

    fn apply<H>(&mut self, command: EditCommand, history: &H) -> Result<Flow, ReadlineError>
    where
        H: HistoryList + ?Sized,
    {
        match command {
            EditCommand::Insert(bytes) => self.insert(&bytes)?,
            EditCommand::ErasePrevious => self.erase_previous()?,
            EditCommand::DeleteCurrent => self.delete_current()?,
            EditCommand::MoveLeft => self.move_left()?,
            EditCommand::MoveRight => self.move_right()?,
            EditCommand::MoveStart => {
                while self.buffer.cursor() > 0 {
                    self.move_left()?;
                }
            }
            EditCommand::MoveEnd => {
                while !self.buffer.is_cursor_at_end() {
                    self.move_right()?;
                }
            }
            EditCommand::KillToEnd => self.kill_to_end()?,
            EditCommand::KillLine => self.kill_before_cursor(0)?,
            EditCommand::KillPreviousWord => {
                let start = previous_word_start(self.buffer.as_bytes(), self.buffer.cursor());
                self.kill_before_cursor(start)?;
            }
            EditCommand::Redraw => redraw_line(
                &mut self.output,
                self.encoding,
                &self.prompt,
                self.buffer.as_bytes(),
                self.buffer.cursor(),
            )?,
            EditCommand::Complete(direction) => self.complete(direction)?,
            EditCommand::HistoryPrevious => {
                if let Some(entry) = self
                    .history_navigator
                    .recall_previous(history, self.buffer.as_bytes())
                {
                    self.replace_line(entry.as_bytes())?;
                }
            }
            EditCommand::HistoryNext => {
                if let Some(recall) = self.history_navigator.recall_next(history) {
                    self.replace_line(recall.as_bytes())?;
                }
            }
            EditCommand::Suspend => self.suspend()?,
            EditCommand::Interrupt => {
                tracing::debug!(message = "interrupted, discarding line");
                self.buffer.clear();
                self.output.write_all(b"\n")?;
                self.output.flush()?;
                return Err(ReadlineError::Interrupted);
            }
            EditCommand::EndOfFile => {
                if self.buffer.is_empty() {
                    return Ok(Flow::Done(None));
                }
                self.delete_current()?;
            }
            EditCommand::Accept => {
                self.output.write_all(b"\n")?;
                let line = self.buffer.take_accepted();
                return Ok(Flow::Done(Some(into_line(line))));
            }
            EditCommand::Ignore => {}
        }
        Ok(Flow::Continue)
    }

    fn insert(&mut self, bytes: &[u8]) -> Result<(), ReadlineError> {
        self.buffer.insert(bytes)?;
        self.output.write_all(bytes)?;
        if !self.buffer.is_cursor_at_end() {
            redraw_tail(&mut self.output, self.encoding, self.buffer.tail(), 0)?;
        }
        Ok(())
    }

    fn erase_previous(&mut self) -> io::Result<()> {
        let cursor = self.buffer.cursor();
        if cursor == 0 {
            return Ok(());
        }
        let start = previous_sequence_start(self.encoding, self.buffer.as_bytes(), cursor);
        let width = str_width(self.encoding, &self.buffer.as_bytes()[start..cursor]);
        self.buffer.remove(start..cursor);
        write_backspaces(&mut self.output, width)?;
        redraw_tail(
            &mut self.output,
            self.encoding,
            self.buffer.tail(),
            STALE_COLS_ONE_CHAR,
        )
    }

    fn delete_current(&mut self) -> io::Result<()> {
        if self.buffer.is_cursor_at_end() {
            return Ok(());
        }
        let cursor = self.buffer.cursor();
        let len = sequence_length(self.encoding, self.buffer.as_bytes(), cursor);
        self.buffer.remove(cursor..cursor + len);
        redraw_tail(
            &mut self.output,
            self.encoding,
            self.buffer.tail(),
            STALE_COLS_ONE_CHAR,
        )
    }

    fn move_left(&mut self) -> io::Result<()> {
        let cursor = self.buffer.cursor();
        if cursor == 0 {
            return Ok(());
        }
        let start = previous_sequence_start(self.encoding, self.buffer.as_bytes(), cursor);
        let width = str_width(self.encoding, &self.buffer.as_bytes()[start..cursor]);
        self.buffer.set_cursor(start);
        write_backspaces(&mut self.output, width)
    }

    fn move_right(&mut self) -> io::Result<()> {
        if self.buffer.is_cursor_at_end() {
            return Ok(());
        }
        let cursor = self.buffer.cursor();
        let len = sequence_length(self.encoding, self.buffer.as_bytes(), cursor);
        self.output
            .write_all(&self.buffer.as_bytes()[cursor..cursor + len])?;
        self.buffer.set_cursor(cursor + len);
        Ok(())
    }

    fn kill_to_end(&mut self) -> io::Result<()> {
        let width = str_width(self.encoding, self.buffer.tail());
        write_spaces(&mut self.output, width)?;
        write_backspaces(&mut self.output, width)?;
        self.buffer.truncate_at_cursor();
        Ok(())
    }

    /// Remove `[start, cursor)` and pull the tail left over it.
    fn kill_before_cursor(&mut self, start: usize) -> io::Result<()> {
        let cursor = self.buffer.cursor();
        if start >= cursor {
            return Ok(());
        }
        let width = str_width(self.encoding, &self.buffer.as_bytes()[start..cursor]);
        write_backspaces(&mut self.output, width)?;
        self.buffer.remove(start..cursor);
        redraw_tail(&mut self.output, self.encoding, self.buffer.tail(), width)
    }

    /// Blank what is on screen and show `line` instead, cursor at the end.
    fn replace_line(&mut self, line: &[u8]) -> Result<(), ReadlineError> {
        clear_line(
            &mut self.output,
            self.encoding,
            self.buffer.as_bytes(),
            self.buffer.cursor(),
        )?;
        self.buffer.replace_all(line)?;
        self.output.write_all(self.buffer.as_bytes())?;
        Ok(())
    }

    fn complete(&mut self, direction: CompletionDirection) -> Result<(), ReadlineError> {
        let cursor = self.buffer.cursor();
        let Some(suggestion) = self.completion.complete(
            self.buffer.as_bytes(),
            cursor,
            self.lister.as_ref(),
            direction,
            self.config.completion_limit,
        ) else {
            return Ok(());
        };

        // Take the previous suggestion back out.
        let erase_start = cursor.saturating_sub(suggestion.erase_len);
        let old_width = str_width(self.encoding, &self.buffer.as_bytes()[erase_start..cursor]);
        self.buffer.remove(erase_start..cursor);
        write_backspaces(&mut self.output, old_width)?;

        self.buffer.insert(&suggestion.insert)?;
        self.output.write_all(&suggestion.insert)?;
        let new_width = str_width(self.encoding, &suggestion.insert);
        redraw_tail(
            &mut self.output,
            self.encoding,
            self.buffer.tail(),
            old_width.saturating_sub(new_width),
        )?;
        Ok(())
    }

    /// Give the terminal back, stop, and pick up where we left off once continued.
    fn suspend(&mut self) -> Result<(), ReadlineError> {
        tracing::debug!(message = "suspending");
        self.output.flush()?;
        self.driver.restore()?;

        if let Err(report) = self.driver.suspend_self() {
            tracing::warn!(message = "suspend failed", error = %report);
        }

        tracing::debug!(message = "resumed");
        if let Err(report) = self.driver.enter_raw() {
            tracing::warn!(message = "raw mode unavailable after resume", error = %report);
        }

        redraw_line(
            &mut self.output,
            self.encoding,
            &self.prompt,
            self.buffer.as_bytes(),
            self.buffer.cursor(),
        )?;
        Ok(())
    }
}

/// Skip spaces left of `cursor`, then everything up to the previous space.
fn previous_word_start(buf: &[u8], cursor: usize) -> usize {
    let mut start = cursor.min(buf.len());
    while start > 0 && buf[start - 1] == b' ' {
        start -= 1;
    }
    while start > 0 && buf[start - 1] != b' ' {
        start -= 1;
    }
    start
}

fn into_line(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|error| String::from_utf8_lossy(error.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DriverEvent, MockTerminalDriver, ScriptedByteSource, StdoutMock};
    use pretty_assertions::assert_eq;

    type TestEditor = LineEditor<ScriptedByteSource, StdoutMock, MockTerminalDriver>;

    fn editor_with(source: ScriptedByteSource, driver: MockTerminalDriver) -> (TestEditor, StdoutMock) {
        let stdout_mock = StdoutMock::new();
        let config = EditorConfig::default()
            .with_encoding(Encoding::Utf8)
            .with_del_erases_current_char(false);
        let editor = LineEditor::new(source, stdout_mock.clone(), driver, config);
        (editor, stdout_mock)
    }

    fn editor(input: &[u8]) -> (TestEditor, StdoutMock) {
        editor_with(ScriptedByteSource::from_bytes(input), MockTerminalDriver::default())
    }

    #[test]
    fn test_erase_then_accept_output() {
        let (mut editor, stdout_mock) = editor(b"ab\x7fc\n");
        assert_eq!(editor.read_line("> ", &()).unwrap(), Some("ac".to_string()));
        assert_eq!(stdout_mock.get_copy_of_buffer(), b"> ab\x08  \x08\x08c\n".to_vec());
        assert_eq!(
            editor.driver().events,
            vec![DriverEvent::EnterRaw, DriverEvent::Restore]
        );
    }

    #[test]
    fn test_insert_in_the_middle_redraws_tail() {
        let (mut editor, stdout_mock) = editor(b"ac\x1b[Db");
        assert_eq!(editor.read_line("", &()).unwrap(), Some("abc".to_string()));
        let (line, col) = stdout_mock.rendered_line_before_accept();
        assert_eq!(line, "abc");
        assert_eq!(col, 2);
    }

    #[test]
    fn test_utf8_character_is_collected_and_erased_whole() {
        let (mut editor, _) = editor("é\x7f\n".as_bytes());
        assert_eq!(editor.read_line("", &()).unwrap(), Some(String::new()));
    }

    #[test]
    fn test_wide_character_motion() {
        // Cursor ends up between the two wide characters, 2 columns in.
        let (mut editor, stdout_mock) = editor("中文\x1b[D".as_bytes());
        assert_eq!(editor.read_line("", &()).unwrap(), Some("中文".to_string()));
        let (line, col) = stdout_mock.rendered_line_before_accept();
        assert_eq!(line, "中文");
        assert_eq!(col, 2);
    }

    #[test]
    fn test_truncated_character_leaves_next_byte_alone() {
        let (mut editor, _) = editor(b"\xc3a\n");
        assert_eq!(editor.read_line("", &()).unwrap(), Some("\u{FFFD}a".to_string()));
    }

    #[test]
    fn test_kill_to_end() {
        let (mut editor, stdout_mock) = editor(b"hello world\x1b[H\x1b[C\x1b[C\x0b\n");
        assert_eq!(editor.read_line("", &()).unwrap(), Some("he".to_string()));
        assert_eq!(stdout_mock.rendered_line_before_accept().0, "he");
    }

    #[test]
    fn test_kill_line_keeps_tail() {
        // Cursor before "world".
        let (mut editor, stdout_mock) = editor(b"hello world\x1b[D\x1b[D\x1b[D\x1b[D\x1b[D\x15\n");
        assert_eq!(editor.read_line("", &()).unwrap(), Some("world".to_string()));
        assert_eq!(stdout_mock.rendered_line_before_accept(), ("world".to_string(), 0));
    }

    #[test]
    fn test_kill_previous_word_skips_trailing_spaces() {
        let (mut editor, _) = editor(b"set term  \x17\n");
        assert_eq!(editor.read_line("", &()).unwrap(), Some("set ".to_string()));
    }

    #[test]
    fn test_redraw() {
        let (mut editor, stdout_mock) = editor(b"ab\x1b[D\x0c\n");
        assert_eq!(editor.read_line("gp> ", &()).unwrap(), Some("ab".to_string()));
        let output = stdout_mock.get_copy_of_buffer_as_string();
        assert!(output.ends_with("\ngp> ab\x08\n"), "{output:?}");
    }

    #[test]
    fn test_history_restores_in_progress_line() {
        let history = vec!["plot x".to_string()];
        let (mut editor, _) = editor(b"rep\x10\x0e\n");
        assert_eq!(editor.read_line("", &history).unwrap(), Some("rep".to_string()));
    }

    #[test]
    fn test_arrow_keys_recall_history() {
        let history = vec!["plot x".to_string(), "plot y".to_string()];
        let (mut editor, stdout_mock) = editor(b"\x1b[A\x1b[A\x1bOB\n");
        assert_eq!(editor.read_line("", &history).unwrap(), Some("plot y".to_string()));
        assert_eq!(stdout_mock.rendered_line_before_accept().0, "plot y");
    }

    #[test]
    fn test_unknown_escape_sequence_is_ignored() {
        let (mut editor, _) = editor(b"a\x1b[1;5Cb\x1bxc\n");
        assert_eq!(editor.read_line("", &()).unwrap(), Some("abc".to_string()));
    }

    #[test]
    fn test_delete_key() {
        let (mut editor, _) = editor(b"ab\x1b[D\x1b[3~\n");
        assert_eq!(editor.read_line("", &()).unwrap(), Some("a".to_string()));
    }

    #[test]
    fn test_del_policy_deletes_under_cursor() {
        let stdout_mock = StdoutMock::new();
        let config = EditorConfig::default()
            .with_encoding(Encoding::Utf8)
            .with_del_erases_current_char(true);
        let mut editor = LineEditor::new(
            ScriptedByteSource::from_bytes(b"ab\x1b[D\x7f\x08\n"),
            stdout_mock,
            MockTerminalDriver::default(),
            config,
        );
        assert_eq!(editor.read_line("", &()).unwrap(), Some(String::new()));
    }

    #[test]
    fn test_eof_on_empty_line() {
        let (mut editor, _) = editor(b"\x04");
        assert_eq!(editor.read_line("", &()).unwrap(), None);
        assert_eq!(
            editor.driver().events,
            vec![DriverEvent::EnterRaw, DriverEvent::Restore]
        );
    }

    #[test]
    fn test_source_eof_accepts_pending_text() {
        let (mut editor, _) = editor(b"replot");
        assert_eq!(editor.read_line("", &()).unwrap(), Some("replot".to_string()));
    }

    #[test]
    fn test_interrupt_discards_line() {
        let mut source = ScriptedByteSource::from_bytes(b"plot");
        source.push(InputUnit::Interrupt);
        let (mut editor, _) = editor_with(source, MockTerminalDriver::default());
        let result = editor.read_line("", &());
        assert!(matches!(result, Err(ReadlineError::Interrupted)));
        assert!(!editor.driver().is_raw());
    }

    #[test]
    fn test_suspend_restores_and_redraws() {
        let mut source = ScriptedByteSource::from_bytes(b"ab");
        source.push(InputUnit::Suspend);
        source.push_bytes(b"c\n");
        let (mut editor, stdout_mock) = editor_with(source, MockTerminalDriver::default());
        assert_eq!(editor.read_line("> ", &()).unwrap(), Some("abc".to_string()));
        assert_eq!(
            editor.driver().events,
            vec![
                DriverEvent::EnterRaw,
                DriverEvent::Restore,
                DriverEvent::Suspend,
                DriverEvent::EnterRaw,
                DriverEvent::Restore,
            ]
        );
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "> ab\n> abc\n");
    }

    #[test]
    fn test_suspend_byte_from_special_chars() {
        let (mut editor, _) = editor(b"a\x1ab\n");
        assert_eq!(editor.read_line("", &()).unwrap(), Some("ab".to_string()));
        assert!(editor.driver().events.contains(&DriverEvent::Suspend));
    }

    #[test]
    fn test_degrades_when_raw_mode_fails() {
        let driver = MockTerminalDriver::default().with_fail_enter_raw();
        let (mut editor, stdout_mock) =
            editor_with(ScriptedByteSource::from_bytes(b"plot\x7f\nrest"), driver);
        // No editing, DEL is kept as is.
        assert_eq!(editor.read_line("> ", &()).unwrap(), Some("plot\x7f".to_string()));
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "> ");
        assert_eq!(editor.read_line("> ", &()).unwrap(), Some("rest".to_string()));
        assert_eq!(editor.read_line("> ", &()).unwrap(), None);
    }

    #[test]
    fn test_restore_failure_is_reported() {
        let driver = MockTerminalDriver::default().with_fail_restore();
        let (mut editor, _) = editor_with(ScriptedByteSource::from_bytes(b"x\n"), driver);
        let result = editor.read_line("", &());
        assert!(matches!(result, Err(ReadlineError::TerminalMode(_))));
    }

    #[test]
    fn test_consecutive_lines_share_typeahead() {
        let (mut editor, _) = editor("a\né\n".as_bytes());
        assert_eq!(editor.read_line("", &()).unwrap(), Some("a".to_string()));
        assert_eq!(editor.read_line("", &()).unwrap(), Some("é".to_string()));
        assert_eq!(editor.read_line("", &()).unwrap(), None);
    }

    #[test]
    fn test_source_line_hooks_wrap_every_exit_path() {
        let mut source = ScriptedByteSource::from_bytes(b"ok\nab");
        source.push(InputUnit::Interrupt);
        let (mut editor, _) = editor_with(source, MockTerminalDriver::default());

        assert_eq!(editor.read_line("", &()).unwrap(), Some("ok".to_string()));
        assert!(!editor.source_mut().is_reading_line());
        assert!(matches!(editor.read_line("", &()), Err(ReadlineError::Interrupted)));
        assert!(!editor.source_mut().is_reading_line());
        assert_eq!(editor.read_line("", &()).unwrap(), None);
        assert_eq!(editor.source_mut().lines_begun(), 3);
    }

    #[test]
    fn test_source_line_hooks_wrap_cooked_reads() {
        let driver = MockTerminalDriver::default().with_fail_enter_raw();
        let (mut editor, _) = editor_with(ScriptedByteSource::from_bytes(b"x\n"), driver);
        assert_eq!(editor.read_line("", &()).unwrap(), Some("x".to_string()));
        assert_eq!(editor.source_mut().lines_begun(), 1);
        assert!(!editor.source_mut().is_reading_line());
    }

    #[test]
    fn test_lone_escape_keeps_next_key() {
        let (mut editor, _) = editor(b"ab\x1bcd\n");
        assert_eq!(editor.read_line("", &()).unwrap(), Some("abcd".to_string()));
    }

    #[test]
    fn test_double_escape_then_arrow_key() {
        let history = vec!["plot sin(x)".to_string()];
        let (mut editor, _) = editor(b"\x1b\x1b[A\n");
        assert_eq!(
            editor.read_line("", &history).unwrap(),
            Some("plot sin(x)".to_string())
        );
    }

    #[test]
    fn test_previous_word_start() {
        assert_eq!(previous_word_start(b"hello world", 11), 6);
        assert_eq!(previous_word_start(b"hello world", 6), 0);
        assert_eq!(previous_word_start(b"   ", 3), 0);
        assert_eq!(previous_word_start(b"", 0), 0);
    }
}
