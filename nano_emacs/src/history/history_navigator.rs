// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::HistoryList;

/// What [`HistoryNavigator::recall_next`] hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recall<'a> {
    /// A newer history entry.
    Entry(&'a str),
    /// Walked past the newest entry: the line that was being typed before the first
    /// recall.
    SavedLine(Vec<u8>),
}

impl Recall<'_> {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Recall::Entry(entry) => entry.as_bytes(),
            Recall::SavedLine(line) => line,
        }
    }
}

/// Position of the editor within a [`HistoryList`].
///
/// This is a weak cursor: it holds an index, never a reference, and it never modifies
/// the list. `None` means "not recalling anything", i.e. the user is on a fresh line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HistoryNavigator {
    current: Option<usize>,
    saved_line: Option<Vec<u8>>,
}

impl HistoryNavigator {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn current(&self) -> Option<usize> { self.current }

    /// Forget the position and the saved line. Done at the start of every line.
    pub fn reset(&mut self) {
        self.current = None;
        self.saved_line = None;
    }

    /// Step to the next older entry. The first step goes to the most recent entry and
    /// remembers `current_line`, so that walking forward again can give it back.
    /// Returns [`None`] when there is nothing older, and nothing changes.
    pub fn recall_previous<'a, H: HistoryList + ?Sized>(
        &mut self,
        list: &'a H,
        current_line: &[u8],
    ) -> Option<&'a str> {
        let index = match self.current {
            None => {
                let newest = list.len().checked_sub(1)?;
                self.saved_line = Some(current_line.to_vec());
                newest
            }
            // The list may have shrunk since the cursor was placed.
            Some(index) => index.min(list.len()).checked_sub(1)?,
        };
        let entry = list.entry(index)?;
        self.current = Some(index);
        Some(entry)
    }

    /// Step to the next newer entry. Returns [`None`] when not recalling. Stepping past
    /// the newest entry clears the cursor and yields the saved in-progress line.
    pub fn recall_next<'a, H: HistoryList + ?Sized>(
        &mut self,
        list: &'a H,
    ) -> Option<Recall<'a>> {
        let index = self.current?;
        let next = index + 1;
        if let Some(entry) = list.entry(next) {
            self.current = Some(next);
            return Some(Recall::Entry(entry));
        }
        self.current = None;
        Some(Recall::SavedLine(self.saved_line.take().unwrap_or_default()))
    }
}
