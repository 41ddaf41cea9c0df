//! Environment helpers for CLI tests
//!
//! Tests never mutate the process environment; they pass these values to
//! the spawned command instead (`assert_cmd::Command::env`).

use std::ffi::OsString;
use std::path::Path;

/// A `PATH` value containing only `bin_dir`
///
/// Engine lookup then sees exactly the fake engines placed there.
pub fn isolated_path(bin_dir: &Path) -> OsString {
    bin_dir.as_os_str().to_os_string()
}

/// `bin_dir` prepended to the current `PATH`
pub fn path_with(bin_dir: &Path) -> OsString {
    let mut dirs = vec![bin_dir.to_path_buf()];
    if let Some(existing) = std::env::var_os("PATH") {
        dirs.extend(std::env::split_paths(&existing));
    }
    std::env::join_paths(dirs).expect("PATH entries should not contain separators")
}
