//! NativeRuntime — singleton via `OnceLock`, lock-free after initialization.
//!
//! Holds every Trident native library for the lifetime of the process.
//! Initialization runs at most once to completion: concurrent callers
//! serialize on `INIT_LOCK` and observe the finished runtime afterwards.
//! A failed initialization leaves nothing behind, so no instance can be
//! constructed on top of it.

use std::sync::{Arc, Mutex, OnceLock};

use libloading::Library;
use trident_core::config::LoaderConfig;
use trident_core::errors::TridentError;
use trident_core::platform::Platform;

use crate::extract::DeferredCleanup;
use crate::loader::{LoadedLibrary, NativeLoader};
use crate::resources::ResourceBundle;

/// Global singleton — lock-free after first successful initialization.
static RUNTIME: OnceLock<Arc<NativeRuntime>> = OnceLock::new();

/// Serializes initializers so libraries are never loaded twice.
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// All loaded native libraries, in load order.
#[derive(Debug)]
pub struct NativeRuntime {
    libraries: Vec<LoadedLibrary<Library>>,
    platform: Platform,
    deferred: DeferredCleanup,
}

/// Options for initializing the runtime.
#[derive(Default)]
pub struct RuntimeOptions {
    pub config: LoaderConfig,
    /// Embedded library copies. Takes precedence over `config.resource_dir`.
    pub resources: Option<Box<dyn ResourceBundle + Send + Sync>>,
}

impl RuntimeOptions {
    /// Options from `TRIDENT_CONFIG`, or a discovered `trident.toml`.
    pub fn from_env() -> Result<Self, TridentError> {
        Ok(Self {
            config: LoaderConfig::from_env()?,
            resources: None,
        })
    }
}

impl NativeRuntime {
    fn new(opts: RuntimeOptions) -> Result<Self, TridentError> {
        let mut loader = NativeLoader::from_config(&opts.config);
        if let Some(resources) = opts.resources {
            loader = loader.with_resources(resources);
        }

        let names = opts.config.effective_libraries();
        tracing::debug!(platform = %loader.platform(), libraries = ?names, "loading native libraries");
        let libraries = match loader.load_all(&names) {
            Ok(libraries) => libraries,
            Err(e) => {
                // Libraries loaded before the failure are already unmapped,
                // so directories kept for them can go now.
                loader.deferred_cleanup().run();
                return Err(e.into());
            }
        };

        Ok(Self {
            libraries,
            platform: loader.platform(),
            deferred: loader.deferred_cleanup().clone(),
        })
    }

    /// Handle of a loaded library by logical name.
    pub fn library(&self, name: &str) -> Option<&Library> {
        self.libraries
            .iter()
            .find(|lib| lib.name == name)
            .map(|lib| &lib.handle)
    }

    pub fn libraries(&self) -> impl Iterator<Item = &LoadedLibrary<Library>> {
        self.libraries.iter()
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn deferred_cleanup(&self) -> &DeferredCleanup {
        &self.deferred
    }
}

/// Initialize the global NativeRuntime.
///
/// Returns an error if already initialized or if any library fails to load.
pub fn initialize(opts: RuntimeOptions) -> Result<Arc<NativeRuntime>, TridentError> {
    let _guard = INIT_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if RUNTIME.get().is_some() {
        return Err(TridentError::AlreadyInitialized);
    }
    install(opts)
}

/// Get the runtime, initializing it from `TRIDENT_CONFIG` on first use.
pub fn ensure_initialized() -> Result<Arc<NativeRuntime>, TridentError> {
    if let Some(rt) = RUNTIME.get() {
        return Ok(Arc::clone(rt));
    }
    let _guard = INIT_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(rt) = RUNTIME.get() {
        return Ok(Arc::clone(rt));
    }
    install(RuntimeOptions::from_env()?)
}

/// Get the global NativeRuntime. Lock-free.
pub fn get() -> Result<Arc<NativeRuntime>, TridentError> {
    RUNTIME.get().cloned().ok_or(TridentError::NotInitialized)
}

pub fn is_initialized() -> bool {
    RUNTIME.get().is_some()
}

/// Remove extraction directories kept because the platform locks loaded
/// libraries. Libraries stay mapped; call at process exit.
///
/// Returns the number of directories removed.
pub fn shutdown() -> usize {
    match RUNTIME.get() {
        Some(rt) => rt.deferred.run(),
        None => 0,
    }
}

// Caller must hold INIT_LOCK.
fn install(opts: RuntimeOptions) -> Result<Arc<NativeRuntime>, TridentError> {
    let runtime = Arc::new(NativeRuntime::new(opts)?);
    let installed = RUNTIME.set(Arc::clone(&runtime));
    debug_assert!(installed.is_ok(), "runtime installed twice under INIT_LOCK");
    tracing::info!(libraries = runtime.libraries.len(), "native runtime initialized");
    Ok(runtime)
}
