//! Embedded library copies, looked up by platform file name.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// A namespace of library files shipped alongside the program.
pub trait ResourceBundle {
    /// Bytes of `file_name`, or `None` when the bundle has no such entry.
    fn resource(&self, file_name: &str) -> io::Result<Option<Cow<'_, [u8]>>>;
}

/// Bundle with nothing in it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoResources;

impl ResourceBundle for NoResources {
    fn resource(&self, _file_name: &str) -> io::Result<Option<Cow<'_, [u8]>>> {
        Ok(None)
    }
}

/// Libraries compiled into the program, typically with `include_bytes!`.
///
/// ```ignore
/// let bundle = StaticBundle::new()
///     .with("libtrident-core.so", include_bytes!("../native/libtrident-core.so"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct StaticBundle {
    entries: HashMap<String, &'static [u8]>,
}

impl StaticBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file_name: impl Into<String>, bytes: &'static [u8]) -> Self {
        self.insert(file_name, bytes);
        self
    }

    pub fn insert(&mut self, file_name: impl Into<String>, bytes: &'static [u8]) {
        self.entries.insert(file_name.into(), bytes);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceBundle for StaticBundle {
    fn resource(&self, file_name: &str) -> io::Result<Option<Cow<'_, [u8]>>> {
        Ok(self.entries.get(file_name).map(|bytes| Cow::Borrowed(*bytes)))
    }
}

/// Libraries kept in a resources directory installed with the program.
#[derive(Debug, Clone)]
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceBundle for DirectoryBundle {
    fn resource(&self, file_name: &str) -> io::Result<Option<Cow<'_, [u8]>>> {
        match std::fs::read(self.root.join(file_name)) {
            Ok(bytes) => Ok(Some(Cow::Owned(bytes))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<B: ResourceBundle + ?Sized> ResourceBundle for Box<B> {
    fn resource(&self, file_name: &str) -> io::Result<Option<Cow<'_, [u8]>>> {
        (**self).resource(file_name)
    }
}
