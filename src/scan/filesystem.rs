use crate::error::Result;
use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const TEST_FILE_SUFFIX: &str = "Test.java";
pub const BASE_TEST_SUFFIX: &str = "ServiceTestBase.java";

/// `*Test.java` files directly inside `dir`, excluding base-test files,
/// sorted by file name. A missing directory yields an empty list.
pub fn list_test_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            name.ends_with(TEST_FILE_SUFFIX) && !name.ends_with(BASE_TEST_SUFFIX)
        })
        .map(|entry| entry.path().to_path_buf())
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files
}

/// Reads `path` as lines. `Ok(None)` when the file does not exist; any
/// other I/O failure propagates. Bytes that are not UTF-8 decode to U+FFFD.
pub fn read_lines_if_exists(path: &Path) -> Result<Option<Vec<String>>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let content = String::from_utf8_lossy(&bytes);
    if matches!(content, Cow::Owned(_)) {
        tracing::warn!(path = %path.display(), "file is not valid UTF-8; decoding lossily");
    }
    Ok(Some(content.lines().map(str::to_string).collect()))
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
