//! # trident-loader
//!
//! Finds and maps the Trident native libraries into the process.
//!
//! Architecture:
//! - `linker` — `Linker` seam over the platform dynamic loader (`libloading`)
//! - `resources` — embedded copies of the libraries bundled with the program
//! - `locate` — where the running program lives (sibling-directory lookup)
//! - `extract` — temp-dir extraction and deferred cleanup
//! - `loader` — the three-strategy fallback chain
//! - `runtime` — `NativeRuntime` singleton via `OnceLock`, loaded once per process

pub mod extract;
pub mod linker;
pub mod loader;
pub mod locate;
pub mod resources;
pub mod runtime;

pub use extract::DeferredCleanup;
pub use linker::{DylibLinker, Linker};
pub use loader::{LoadOrigin, LoadedLibrary, NativeLoader};
pub use resources::{DirectoryBundle, NoResources, ResourceBundle, StaticBundle};
pub use runtime::{NativeRuntime, RuntimeOptions};
