//! Error types for the loader, configuration, and instance API.

use std::fmt;

use thiserror::Error;

/// Boxed underlying cause, kept for diagnostic chaining.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which step of library loading produced a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadErrorKind {
    /// The running program's own location could not be determined.
    ProgramLocation,
    /// The platform linker rejected the library.
    Link,
    /// No embedded copy of the library is bundled with the program.
    ResourceMissing,
    /// The embedded copy could not be written to a temporary directory.
    Extraction,
}

impl LoadErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProgramLocation => "program_location",
            Self::Link => "link",
            Self::ResourceMissing => "resource_missing",
            Self::Extraction => "extraction",
        }
    }
}

impl fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A native library failed to load.
///
/// Always names the logical library and, when one exists, chains the
/// platform error that caused the failure.
#[derive(Debug, Error)]
#[error("while loading {library}: {message}")]
pub struct LoadError {
    kind: LoadErrorKind,
    library: String,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl LoadError {
    pub fn new(kind: LoadErrorKind, library: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            library: library.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Build an error whose message is taken from `source`.
    pub fn caused_by<E>(kind: LoadErrorKind, library: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        let source = source.into();
        Self {
            kind,
            library: library.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub fn kind(&self) -> LoadErrorKind {
        self.kind
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The innermost error in the cause chain, if any.
    pub fn root_cause(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let mut current: &(dyn std::error::Error + 'static) = self.source.as_deref()?;
        while let Some(next) = current.source() {
            current = next;
        }
        Some(current)
    }
}

/// Configuration could not be read or parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors raised by the `Trident` instance API.
#[derive(Debug, Error)]
pub enum TridentError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("native runtime not initialized")]
    NotInitialized,

    #[error("native runtime already initialized")]
    AlreadyInitialized,

    #[error("library {0} was not loaded by the runtime")]
    LibraryNotLoaded(String),

    #[error("symbol {symbol} not found in {library}: {source}")]
    Symbol {
        library: String,
        symbol: String,
        #[source]
        source: BoxError,
    },

    #[error("{operation} failed in native engine (code {code})")]
    Native { operation: &'static str, code: i32 },

    #[error("no database loaded")]
    NotLoaded,

    #[error("argument contains an interior NUL byte: {0}")]
    InvalidArgument(#[from] std::ffi::NulError),

    #[error("path cannot be passed to the native engine unchanged: {0}")]
    UnrepresentablePath(std::path::PathBuf),

    #[error("native engine returned invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("malformed query result: {0}")]
    MalformedResult(String),
}
