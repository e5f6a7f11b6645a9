// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Filename completion with cycling.
//!
//! The first Tab computes every file in the fragment's directory whose name starts
//! with the fragment, and inserts the missing part of the first one. Each further Tab
//! (with the cursor still right after the inserted text) takes the previous insertion
//! back out and puts in the next candidate's. Shift+Tab cycles the other way.

use super::DirectoryLister;
use std::path::{Path, PathBuf};

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum CompletionDirection {
    Forward,
    Backward,
}

/// Edit to apply at the cursor: remove `erase_len` bytes before it, then insert
/// `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub erase_len: usize,
    pub insert: Vec<u8>,
}

/// Candidate list for the fragment the user is completing, and which one of them is
/// currently in the buffer. Empty `candidates` means there is no active cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompletionState {
    /// Byte offset where suffixes get inserted (the cursor at the first Tab).
    anchor: usize,
    /// Suffixes, i.e. candidate names with the typed prefix removed.
    candidates: Vec<Vec<u8>>,
    index: usize,
    /// Length of the suffix that is in the buffer right now.
    inserted_len: usize,
}

/// Where the filename under the cursor starts. Inside an unterminated quote that is
/// right after the quote, otherwise right after the last space or `!`, otherwise 0.
#[must_use]
pub fn fragment_start(buf: &[u8], cursor: usize) -> usize {
    let head = &buf[..cursor.min(buf.len())];

    let open_quote = [b'\'', b'"']
        .into_iter()
        .filter(|quote| head.iter().filter(|it| *it == quote).count() % 2 == 1)
        .filter_map(|quote| head.iter().rposition(|it| *it == quote))
        .max();
    if let Some(pos) = open_quote {
        return pos + 1;
    }

    head.iter()
        .rposition(|it| *it == b' ' || *it == b'!')
        .map_or(0, |pos| pos + 1)
}

impl CompletionState {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn is_active(&self) -> bool { !self.candidates.is_empty() }

    #[must_use]
    pub fn candidate_count(&self) -> usize { self.candidates.len() }

    pub fn reset(&mut self) { *self = Self::default(); }

    /// Next edit for a Tab (or Shift+Tab) press with the cursor at `cursor`.
    ///
    /// Returns [`None`] when nothing matches, including when the directory can't be
    /// read. A single candidate cycles onto itself, so repeated presses leave the
    /// buffer as it is.
    pub fn complete(
        &mut self,
        buf: &[u8],
        cursor: usize,
        lister: &dyn DirectoryLister,
        direction: CompletionDirection,
        limit: usize,
    ) -> Option<Suggestion> {
        if self.is_active() && cursor == self.anchor + self.inserted_len {
            return Some(self.step(direction));
        }

        self.reset();
        let start = fragment_start(buf, cursor);
        let Ok(fragment) = std::str::from_utf8(&buf[start..cursor]) else {
            tracing::debug!(message = "completion fragment is not UTF-8");
            return None;
        };

        let candidates = collect_candidates(fragment, lister, limit);
        if candidates.is_empty() {
            tracing::debug!(message = "no completion candidates", fragment);
            return None;
        }

        self.anchor = cursor;
        self.index = match direction {
            CompletionDirection::Forward => 0,
            CompletionDirection::Backward => candidates.len() - 1,
        };
        self.candidates = candidates;
        let insert = self.candidates[self.index].clone();
        self.inserted_len = insert.len();
        Some(Suggestion {
            erase_len: 0,
            insert,
        })
    }

    fn step(&mut self, direction: CompletionDirection) -> Suggestion {
        let count = self.candidates.len();
        self.index = match direction {
            CompletionDirection::Forward => (self.index + 1) % count,
            CompletionDirection::Backward => (self.index + count - 1) % count,
        };
        let erase_len = self.inserted_len;
        let insert = self.candidates[self.index].clone();
        self.inserted_len = insert.len();
        Suggestion { erase_len, insert }
    }
}

/// Expand a leading `~/`, split into directory and partial name, list, filter, sort.
fn collect_candidates(
    fragment: &str,
    lister: &dyn DirectoryLister,
    limit: usize,
) -> Vec<Vec<u8>> {
    // A bare `~` names the home directory itself.
    if fragment == "~" && lister.home_dir().is_some() {
        return vec![b"/".to_vec()];
    }

    let expanded = match fragment.strip_prefix("~/") {
        Some(rest) => match lister.home_dir() {
            Some(home) => format!("{}/{rest}", home.display()),
            None => fragment.to_string(),
        },
        None => fragment.to_string(),
    };

    let (dir, partial): (PathBuf, &str) = match expanded.rfind('/') {
        Some(pos) => (PathBuf::from(&expanded[..=pos]), &expanded[pos + 1..]),
        None => (Path::new(".").to_path_buf(), expanded.as_str()),
    };

    let entries = match lister.list(&dir) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::debug!(message = "completion directory unreadable", dir = %dir.display(), %error);
            return vec![];
        }
    };

    let show_dotfiles = partial.starts_with('.');
    let mut names: Vec<_> = entries
        .into_iter()
        .filter(|it| it.name.starts_with(partial))
        .filter(|it| show_dotfiles || !it.name.starts_with('.'))
        .collect();
    names.sort_by(|a, b| a.name.cmp(&b.name));
    names.truncate(limit);

    names
        .into_iter()
        .map(|it| {
            let mut suffix = it.name.as_bytes()[partial.len()..].to_vec();
            if it.is_dir {
                suffix.push(b'/');
            }
            suffix
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DirEntryName, FsDirectoryLister};
    use pretty_assertions::assert_eq;
    use std::{fs, io};
    use test_case::test_case;

    /// Fixed listing for whatever directory is asked for, and a fake home.
    struct FakeLister {
        entries: Vec<DirEntryName>,
    }

    impl DirectoryLister for FakeLister {
        fn list(&self, dir: &Path) -> io::Result<Vec<DirEntryName>> {
            if dir.ends_with("missing/") || dir.ends_with("missing") {
                return Err(io::Error::from(io::ErrorKind::NotFound));
            }
            Ok(self.entries.clone())
        }

        fn home_dir(&self) -> Option<PathBuf> { Some(PathBuf::from("/home/plot")) }
    }

    fn fake() -> FakeLister {
        FakeLister {
            entries: vec![
                DirEntryName::file("foobar.dat"),
                DirEntryName::file("foo.dat"),
                DirEntryName::file(".foorc"),
                DirEntryName::dir("fonts"),
            ],
        }
    }

    fn complete(state: &mut CompletionState, buf: &str) -> Option<Suggestion> {
        state.complete(
            buf.as_bytes(),
            buf.len(),
            &fake(),
            CompletionDirection::Forward,
            50,
        )
    }

    #[test_case("load 'fo", 6 ; "open single quote")]
    #[test_case("load \"a b", 6 ; "open double quote")]
    #[test_case("load 'a' fo", 9 ; "closed quote then space")]
    #[test_case("!ls", 1 ; "shell escape")]
    #[test_case("foo", 0 ; "no delimiter")]
    fn test_fragment_start(buf: &str, expected: usize) {
        assert_eq!(fragment_start(buf.as_bytes(), buf.len()), expected);
    }

    #[test]
    fn test_cycles_in_sorted_order() {
        let mut state = CompletionState::new();
        let first = complete(&mut state, "fo").unwrap();
        assert_eq!(first, Suggestion { erase_len: 0, insert: b"nts/".to_vec() });
        assert_eq!(state.candidate_count(), 3);

        let second = complete(&mut state, "fonts/").unwrap();
        assert_eq!(second, Suggestion { erase_len: 4, insert: b"o.dat".to_vec() });

        let third = complete(&mut state, "foo.dat").unwrap();
        assert_eq!(third, Suggestion { erase_len: 5, insert: b"obar.dat".to_vec() });

        let wrapped = complete(&mut state, "foobar.dat").unwrap();
        assert_eq!(wrapped.insert, b"nts/".to_vec());
    }

    #[test]
    fn test_backward() {
        let mut state = CompletionState::new();
        let lister = fake();
        let first = state
            .complete(b"foo", 3, &lister, CompletionDirection::Backward, 50)
            .unwrap();
        assert_eq!(first.insert, b"bar.dat".to_vec());
        let second = state
            .complete(b"foobar.dat", 10, &lister, CompletionDirection::Backward, 50)
            .unwrap();
        assert_eq!(second, Suggestion { erase_len: 7, insert: b".dat".to_vec() });
    }

    #[test]
    fn test_dotfiles_only_when_asked_for() {
        let mut state = CompletionState::new();
        let suggestion = complete(&mut state, ".f").unwrap();
        assert_eq!(suggestion.insert, b"oorc".to_vec());
        assert_eq!(state.candidate_count(), 1);
    }

    #[test]
    fn test_moving_the_cursor_starts_over() {
        let mut state = CompletionState::new();
        complete(&mut state, "fo").unwrap();
        let fresh = complete(&mut state, "fonts/ foo").unwrap();
        assert_eq!(fresh.erase_len, 0);
        assert_eq!(fresh.insert, b".dat".to_vec());
    }

    #[test]
    fn test_no_match_and_unreadable_dir() {
        let mut state = CompletionState::new();
        assert_eq!(complete(&mut state, "zzz"), None);
        assert!(!state.is_active());
        assert_eq!(complete(&mut state, "missing/fo"), None);
    }

    #[test]
    fn test_limit() {
        let mut state = CompletionState::new();
        state
            .complete(b"f", 1, &fake(), CompletionDirection::Forward, 2)
            .unwrap();
        assert_eq!(state.candidate_count(), 2);
    }

    #[test]
    fn test_real_directory_with_tilde_free_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.dat"), "").unwrap();
        fs::write(dir.path().join("foobar.dat"), "").unwrap();

        let line = format!("plot '{}/fo", dir.path().display());
        let mut state = CompletionState::new();
        let lister = FsDirectoryLister;
        let first = state
            .complete(line.as_bytes(), line.len(), &lister, CompletionDirection::Forward, 50)
            .unwrap();
        assert_eq!(first.insert, b"o.dat".to_vec());

        let line = format!("{line}o.dat");
        let second = state
            .complete(line.as_bytes(), line.len(), &lister, CompletionDirection::Forward, 50)
            .unwrap();
        assert_eq!(second, Suggestion { erase_len: 5, insert: b"obar.dat".to_vec() });
    }

    #[test]
    fn test_single_candidate_is_idempotent() {
        let lister = FakeLister {
            entries: vec![DirEntryName::file("only.dat")],
        };
        let mut state = CompletionState::new();
        let first = state
            .complete(b"on", 2, &lister, CompletionDirection::Forward, 50)
            .unwrap();
        assert_eq!(first.insert, b"ly.dat".to_vec());
        let again = state
            .complete(b"only.dat", 8, &lister, CompletionDirection::Forward, 50)
            .unwrap();
        assert_eq!(again, Suggestion { erase_len: 6, insert: b"ly.dat".to_vec() });
    }

    #[test]
    fn test_tilde_expansion() {
        struct HomeOnly;
        impl DirectoryLister for HomeOnly {
            fn list(&self, dir: &Path) -> io::Result<Vec<DirEntryName>> {
                assert_eq!(dir, Path::new("/home/plot/"));
                Ok(vec![DirEntryName::file("notes.gp")])
            }

            fn home_dir(&self) -> Option<PathBuf> { Some(PathBuf::from("/home/plot")) }
        }
        let mut state = CompletionState::new();
        let suggestion = state
            .complete(b"~/no", 4, &HomeOnly, CompletionDirection::Forward, 50)
            .unwrap();
        assert_eq!(suggestion.insert, b"tes.gp".to_vec());
    }

    #[test]
    fn test_bare_tilde_completes_to_home_dir() {
        let mut state = CompletionState::new();
        let lister = FakeLister {
            entries: vec![DirEntryName::file("~backup")],
        };
        let suggestion = state
            .complete(b"load ~", 6, &lister, CompletionDirection::Forward, 50)
            .unwrap();
        assert_eq!(suggestion, Suggestion { erase_len: 0, insert: b"/".to_vec() });
        assert_eq!(state.candidate_count(), 1);
    }
}
