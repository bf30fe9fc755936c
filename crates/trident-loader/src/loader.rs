//! `NativeLoader` — maps a library by logical name, trying in order:
//!
//! 1. the platform's default search,
//! 2. `<program dir>/<platform file name>`,
//! 3. an embedded copy extracted to a fresh temporary directory.
//!
//! The first success wins. When all three fail, the error of the last
//! strategy is surfaced.

use std::path::PathBuf;

use trident_core::config::LoaderConfig;
use trident_core::constants::DEFAULT_TEMP_PREFIX;
use trident_core::errors::{LoadError, LoadErrorKind};
use trident_core::platform::Platform;

use crate::extract::{DeferredCleanup, Extracted};
use crate::linker::{DylibLinker, Linker};
use crate::locate::{self, ProgramLocator};
use crate::resources::{DirectoryBundle, NoResources, ResourceBundle};

/// Which strategy produced a loaded library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    SystemSearch,
    ProgramDir(PathBuf),
    Extracted(PathBuf),
}

/// A library mapped into the process.
#[derive(Debug)]
pub struct LoadedLibrary<H> {
    pub name: String,
    pub origin: LoadOrigin,
    pub handle: H,
}

pub struct NativeLoader<L: Linker = DylibLinker> {
    linker: L,
    platform: Platform,
    resources: Box<dyn ResourceBundle + Send + Sync>,
    locator: ProgramLocator,
    temp_prefix: String,
    deferred: DeferredCleanup,
}

impl NativeLoader<DylibLinker> {
    pub fn new() -> Self {
        Self::with_linker(DylibLinker)
    }

    /// Build a production loader from configuration.
    pub fn from_config(config: &LoaderConfig) -> Self {
        let mut loader = Self::new()
            .with_platform(config.effective_platform())
            .with_temp_prefix(config.effective_temp_prefix());
        if let Some(dir) = &config.resource_dir {
            loader = loader.with_resources(DirectoryBundle::new(dir));
        }
        if let Some(program) = &config.program_path {
            let program = program.clone();
            loader = loader.with_locator(move || Ok(program.clone()));
        }
        loader
    }
}

impl Default for NativeLoader<DylibLinker> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Linker> NativeLoader<L> {
    /// Loader for the current platform with no embedded resources.
    pub fn with_linker(linker: L) -> Self {
        Self {
            linker,
            platform: Platform::current(),
            resources: Box::new(NoResources),
            locator: Box::new(locate::current_program),
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
            deferred: DeferredCleanup::new(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_resources(mut self, resources: impl ResourceBundle + Send + Sync + 'static) -> Self {
        self.resources = Box::new(resources);
        self
    }

    pub fn with_locator<F>(mut self, locator: F) -> Self
    where
        F: Fn() -> std::io::Result<PathBuf> + Send + Sync + 'static,
    {
        self.locator = Box::new(locator);
        self
    }

    pub fn with_temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn linker(&self) -> &L {
        &self.linker
    }

    /// Extraction directories awaiting removal at shutdown.
    pub fn deferred_cleanup(&self) -> &DeferredCleanup {
        &self.deferred
    }

    /// Map `name` into the process.
    ///
    /// Not idempotent: calling it twice for the same name attempts the load
    /// twice. The runtime guarantees each library is requested once.
    pub fn load_library(&self, name: &str) -> Result<LoadedLibrary<L::Handle>, LoadError> {
        match self.linker.open_by_name(name) {
            Ok(handle) => {
                tracing::info!(library = name, "loaded from system search path");
                return Ok(LoadedLibrary {
                    name: name.to_string(),
                    origin: LoadOrigin::SystemSearch,
                    handle,
                });
            }
            Err(e) => {
                tracing::debug!(library = name, error = %e, "system search failed, trying program directory");
            }
        }

        let file_name = self.platform.library_file_name(name);

        let program = (self.locator)()
            .map_err(|e| LoadError::caused_by(LoadErrorKind::ProgramLocation, name, e))?;
        let sibling = locate::program_dir(&program).join(&file_name);
        match self.linker.open_path(&sibling) {
            Ok(handle) => {
                tracing::info!(library = name, path = %sibling.display(), "loaded from program directory");
                return Ok(LoadedLibrary {
                    name: name.to_string(),
                    origin: LoadOrigin::ProgramDir(sibling),
                    handle,
                });
            }
            Err(e) => {
                tracing::debug!(
                    library = name,
                    path = %sibling.display(),
                    error = %e,
                    "program directory load failed, trying embedded copy"
                );
            }
        }

        let (handle, extracted) = self.load_embedded(name, &file_name).inspect_err(|e| {
            tracing::warn!(library = name, kind = %e.kind(), error = %e, "all load strategies failed");
        })?;
        tracing::info!(library = name, path = %extracted.display(), "loaded from embedded copy");
        Ok(LoadedLibrary {
            name: name.to_string(),
            origin: LoadOrigin::Extracted(extracted),
            handle,
        })
    }

    /// Load `names` in order, stopping at the first failure.
    pub fn load_all<I, S>(&self, names: I) -> Result<Vec<LoadedLibrary<L::Handle>>, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.load_library(name.as_ref()))
            .collect()
    }

    fn load_embedded(&self, name: &str, file_name: &str) -> Result<(L::Handle, PathBuf), LoadError> {
        let bytes = match self.resources.resource(file_name) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                return Err(LoadError::new(
                    LoadErrorKind::ResourceMissing,
                    name,
                    format!("no embedded resource {file_name}"),
                ));
            }
            Err(e) => return Err(LoadError::caused_by(LoadErrorKind::Extraction, name, e)),
        };

        let extracted = Extracted::write(&bytes, file_name, &self.temp_prefix)
            .map_err(|e| LoadError::caused_by(LoadErrorKind::Extraction, name, e))?;
        let path = extracted.path().to_path_buf();
        let result = self.linker.open_path(&path);
        extracted.finish(self.platform, &self.deferred);

        result
            .map(|handle| (handle, path))
            .map_err(|e| LoadError::caused_by(LoadErrorKind::Link, name, e))
    }
}
