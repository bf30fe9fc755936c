//! Platform detection from an OS name, and shared-library file naming.

use serde::{Deserialize, Serialize};

/// Platform family, as far as shared-library naming is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Unix,
    MacOs,
    Windows,
}

impl Platform {
    /// Classify an OS name. Matching is case-insensitive and by substring,
    /// so `"Windows 10"` and `"Mac OS X"` are recognized. Unknown or absent
    /// names fall back to [`Platform::Unix`].
    pub fn from_os_name(os_name: Option<&str>) -> Platform {
        let Some(os) = os_name else {
            return Platform::Unix;
        };
        let os = os.to_lowercase();
        if os.contains("windows") {
            Platform::Windows
        } else if os.contains("mac") {
            Platform::MacOs
        } else {
            Platform::Unix
        }
    }

    /// The platform this process is running on.
    pub fn current() -> Platform {
        Platform::from_os_name(Some(std::env::consts::OS))
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Platform::Windows => "",
            Platform::Unix | Platform::MacOs => "lib",
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Platform::Unix => ".so",
            Platform::MacOs => ".dylib",
            Platform::Windows => ".dll",
        }
    }

    /// `trident-core` becomes `libtrident-core.so`, `trident-core.dll`, ...
    pub fn library_file_name(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix(), name, self.suffix())
    }

    /// Whether a library file may be removed while it is mapped.
    /// Windows locks loaded DLLs.
    pub fn deletes_loaded_files(&self) -> bool {
        !matches!(self, Platform::Windows)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Unix => "unix",
            Platform::MacOs => "macos",
            Platform::Windows => "windows",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
