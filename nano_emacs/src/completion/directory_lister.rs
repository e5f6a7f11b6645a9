// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fs, io,
          path::{Path, PathBuf}};

/// One directory entry, as seen by filename completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryName {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntryName {
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    #[must_use]
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Filesystem access needed by completion. Swappable so tests don't depend on the
/// real home directory.
pub trait DirectoryLister {
    /// Entries of `dir`, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error when `dir` can't be read.
    fn list(&self, dir: &Path) -> io::Result<Vec<DirEntryName>>;

    /// Target of a leading `~`.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// [`DirectoryLister`] over the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDirectoryLister;

impl DirectoryLister for FsDirectoryLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirEntryName>> {
        let mut acc = vec![];
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            // Follow symlinks, a link to a directory completes like a directory.
            let is_dir = fs::metadata(entry.path()).is_ok_and(|it| it.is_dir());
            acc.push(DirEntryName {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        Ok(acc)
    }

    fn home_dir(&self) -> Option<PathBuf> { dirs::home_dir() }
}
