//! Fixed names shared by the loader and the bindings.

/// Native libraries in dependency order. Later entries link against
/// symbols exported by earlier ones.
pub const LIBRARIES: &[&str] = &[
    "kognac-core",
    "trident-core",
    "trident-sparql",
    "trident-java",
    "trident-web",
];

/// The library exporting the engine entry points (`trident_load` etc.).
pub const BINDING_LIBRARY: &str = "trident-java";

/// Prefix for temporary directories holding extracted libraries.
pub const DEFAULT_TEMP_PREFIX: &str = "Trident-tmp";

/// Config file looked up by default initialization.
pub const CONFIG_FILE_NAME: &str = "trident.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "TRIDENT_CONFIG";

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV_VAR: &str = "TRIDENT_LOG";
