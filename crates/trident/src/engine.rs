//! The three engine operations, behind a trait so `Trident` can be driven
//! without the native libraries present.

use std::ffi::CStr;

use trident_core::errors::TridentError;

/// Opaque references into engine-owned state.
///
/// The values are never interpreted, with one exception: the engine hands
/// back addresses of the objects it allocated, which are never null, so a
/// zero pair is taken to mean no database is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Handles {
    /// The knowledge base.
    pub my_trident: i64,
    /// The query layer built over it.
    pub my_trident_layer: i64,
}

impl Handles {
    pub fn is_set(&self) -> bool {
        self.my_trident != 0 || self.my_trident_layer != 0
    }
}

pub trait NativeEngine: Send + Sync {
    /// Open the database at `path`.
    fn load(&self, path: &CStr) -> Result<Handles, TridentError>;

    /// Run `query` and return the engine's serialized result.
    fn sparql(&self, handles: Handles, query: &CStr) -> Result<String, TridentError>;

    /// Release the database behind `handles`.
    fn unload(&self, handles: Handles);
}
