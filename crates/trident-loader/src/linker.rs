//! The platform dynamic loader behind a trait, so the fallback chain can be
//! exercised without real shared objects.

use std::path::Path;

use libloading::Library;
use trident_core::errors::BoxError;

/// Maps shared libraries into the process.
pub trait Linker {
    /// Handle keeping a mapped library alive.
    type Handle;

    /// Load by logical name through the platform's default search
    /// (`LD_LIBRARY_PATH`, `DYLD_LIBRARY_PATH`, `PATH`, system dirs).
    fn open_by_name(&self, name: &str) -> Result<Self::Handle, BoxError>;

    /// Load the library file at an explicit path.
    fn open_path(&self, path: &Path) -> Result<Self::Handle, BoxError>;
}

/// `libloading`-backed linker used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct DylibLinker;

impl Linker for DylibLinker {
    type Handle = Library;

    fn open_by_name(&self, name: &str) -> Result<Library, BoxError> {
        let file_name = libloading::library_filename(name);
        // Safety: running library initializers is inherent to loading the
        // native engine; the libraries are trusted parts of the distribution.
        unsafe { Library::new(file_name) }.map_err(Into::into)
    }

    fn open_path(&self, path: &Path) -> Result<Library, BoxError> {
        unsafe { Library::new(path) }.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_library_by_name_fails() {
        let err = DylibLinker.open_by_name("trident-does-not-exist-7f3a").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_missing_path_fails() {
        let dir = std::env::temp_dir().join("trident-no-such-dir-7f3a");
        assert!(DylibLinker.open_path(&dir.join("libnothing.so")).is_err());
    }
}
