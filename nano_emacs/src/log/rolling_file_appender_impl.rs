// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::{IntoDiagnostic, miette};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Appender for a single log file that is never rotated.
///
/// # Errors
///
/// Returns an error if:
/// - The path has no file name
/// - The file or its directory can't be created
pub fn try_create(path_str: &str) -> miette::Result<RollingFileAppender> {
    let path = Path::new(path_str);

    let file_name = path
        .file_name()
        .ok_or_else(|| miette!("log file path {} has no file name", path.display()))?;

    // A bare file name has an empty parent.
    let parent = match path.parent() {
        Some(it) if !it.as_os_str().is_empty() => it,
        _ => Path::new("."),
    };

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(parent)
        .into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.log");
        let _appender = try_create(path.to_str().unwrap()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_rejects_path_without_file_name() {
        assert!(try_create("/").is_err());
    }
}
