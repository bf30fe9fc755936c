//! # trident-core
//!
//! Shared foundation for the Trident native loader and bindings.
//! Errors, configuration, platform naming, library set constants,
//! and tracing setup.

pub mod config;
pub mod constants;
pub mod errors;
pub mod platform;
pub mod tracing_setup;

pub use config::LoaderConfig;
pub use errors::{ConfigError, LoadError, LoadErrorKind, TridentError};
pub use platform::Platform;
