//! `Trident` — one database opened through the native engine.
//!
//! Construction first makes sure every native library is loaded (see
//! `trident_loader::runtime`). If that fails, no instance is created.

use std::ffi::CString;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use trident_core::errors::TridentError;
use trident_loader::runtime;

use crate::engine::{Handles, NativeEngine};
use crate::ffi::SymbolEngine;
use crate::results::SparqlResults;

/// Engine bound to the process-wide runtime, resolved on first construction.
static ENGINE: OnceLock<Arc<dyn NativeEngine>> = OnceLock::new();

pub struct Trident {
    handles: Handles,
    engine: Arc<dyn NativeEngine>,
}

impl Trident {
    /// Create an instance backed by the native libraries, loading them on
    /// first use.
    pub fn new() -> Result<Self, TridentError> {
        Ok(Self::with_engine(shared_engine()?))
    }

    /// Create an instance over an explicit engine.
    pub fn with_engine(engine: Arc<dyn NativeEngine>) -> Self {
        Self {
            handles: Handles::default(),
            engine,
        }
    }

    pub fn my_trident(&self) -> i64 {
        self.handles.my_trident
    }

    pub fn my_trident_layer(&self) -> i64 {
        self.handles.my_trident_layer
    }

    pub fn handles(&self) -> Handles {
        self.handles
    }

    pub fn is_loaded(&self) -> bool {
        self.handles.is_set()
    }

    /// Open the database at `path`. A database already open on this
    /// instance is unloaded first.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), TridentError> {
        let path = path.as_ref();
        let c_path = path_to_cstring(path)?;
        if self.is_loaded() {
            self.unload()?;
        }
        self.handles = self.engine.load(&c_path)?;
        tracing::info!(path = %path.display(), "Trident database is loaded.");
        Ok(())
    }

    /// Run a SPARQL query and return the engine's JSON result unchanged.
    pub fn sparql(&self, query: &str) -> Result<String, TridentError> {
        if !self.is_loaded() {
            return Err(TridentError::NotLoaded);
        }
        let c_query = CString::new(query)?;
        self.engine.sparql(self.handles, &c_query)
    }

    /// Run a SPARQL query and parse the result.
    pub fn sparql_results(&self, query: &str) -> Result<SparqlResults, TridentError> {
        SparqlResults::parse(&self.sparql(query)?)
    }

    /// Release the database. The handles are reset to zero.
    pub fn unload(&mut self) -> Result<(), TridentError> {
        if !self.is_loaded() {
            return Err(TridentError::NotLoaded);
        }
        self.engine.unload(self.handles);
        self.handles = Handles::default();
        tracing::info!("Trident database is unloaded.");
        Ok(())
    }
}

impl Drop for Trident {
    fn drop(&mut self) {
        if self.is_loaded() {
            let _ = self.unload();
        }
    }
}

impl std::fmt::Debug for Trident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trident")
            .field("my_trident", &self.handles.my_trident)
            .field("my_trident_layer", &self.handles.my_trident_layer)
            .finish()
    }
}

#[cfg(unix)]
fn path_to_cstring(path: &Path) -> Result<CString, TridentError> {
    use std::os::unix::ffi::OsStrExt;
    Ok(CString::new(path.as_os_str().as_bytes())?)
}

#[cfg(not(unix))]
fn path_to_cstring(path: &Path) -> Result<CString, TridentError> {
    let utf8 = path
        .to_str()
        .ok_or_else(|| TridentError::UnrepresentablePath(path.to_path_buf()))?;
    Ok(CString::new(utf8)?)
}

fn shared_engine() -> Result<Arc<dyn NativeEngine>, TridentError> {
    if let Some(engine) = ENGINE.get() {
        return Ok(Arc::clone(engine));
    }
    let rt = runtime::ensure_initialized()?;
    let engine: Arc<dyn NativeEngine> = Arc::new(SymbolEngine::bind(rt)?);
    Ok(Arc::clone(ENGINE.get_or_init(|| engine)))
}
