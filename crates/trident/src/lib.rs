//! # trident
//!
//! Rust bindings for the Trident graph database.
//!
//! Architecture:
//! - `engine` — `NativeEngine` seam over the engine's entry points
//! - `ffi` — `SymbolEngine`, entry points resolved from the loaded binding library
//! - `instance` — `Trident`, owning one database's handle pair
//! - `results` — typed view of the engine's SPARQL JSON output

pub mod engine;
pub mod ffi;
pub mod instance;
pub mod results;

pub use engine::{Handles, NativeEngine};
pub use instance::Trident;
pub use results::SparqlResults;
pub use trident_core::errors::TridentError;
