//! Location of the running program, for the sibling-directory lookup.

use std::io;
use std::path::{Path, PathBuf};

/// Resolves the path of the running program artifact.
pub type ProgramLocator = Box<dyn Fn() -> io::Result<PathBuf> + Send + Sync>;

/// The default locator: the current executable.
pub fn current_program() -> io::Result<PathBuf> {
    std::env::current_exe()
}

/// Directory containing `program`, or `.` when it has none.
pub fn program_dir(program: &Path) -> PathBuf {
    match program.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
