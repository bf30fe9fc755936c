//! Entry points of the native binding library, resolved with `libloading`.
//!
//! The binding library is mapped by the runtime; this module only looks up
//! symbols in it. All unsafe code of the crate lives here.

use std::ffi::{c_char, CStr};
use std::sync::Arc;

use libloading::Symbol;
use trident_core::constants::BINDING_LIBRARY;
use trident_core::errors::TridentError;
use trident_loader::NativeRuntime;

use crate::engine::{Handles, NativeEngine};

type FnLoad = unsafe extern "C" fn(path: *const c_char, kb: *mut i64, layer: *mut i64) -> i32;
type FnSparql = unsafe extern "C" fn(kb: i64, layer: i64, query: *const c_char) -> *mut c_char;
type FnFreeString = unsafe extern "C" fn(s: *mut c_char);
type FnUnload = unsafe extern "C" fn(kb: i64, layer: i64);

/// Engine calls dispatched through the loaded binding library.
pub struct SymbolEngine {
    _runtime: Arc<NativeRuntime>, // keeps the library mapped
    fn_load: FnLoad,
    fn_sparql: FnSparql,
    fn_free_string: FnFreeString,
    fn_unload: FnUnload,
}

impl SymbolEngine {
    pub fn bind(runtime: Arc<NativeRuntime>) -> Result<Self, TridentError> {
        let lib = runtime
            .library(BINDING_LIBRARY)
            .ok_or_else(|| TridentError::LibraryNotLoaded(BINDING_LIBRARY.to_string()))?;

        macro_rules! sym {
            ($name:literal, $ty:ty) => {
                unsafe {
                    let s: Symbol<$ty> = lib.get($name).map_err(|e| TridentError::Symbol {
                        library: BINDING_LIBRARY.to_string(),
                        symbol: String::from_utf8_lossy(&$name[..$name.len() - 1]).into_owned(),
                        source: Box::new(e),
                    })?;
                    *s
                }
            };
        }

        let fn_load: FnLoad = sym!(b"trident_load\0", FnLoad);
        let fn_sparql: FnSparql = sym!(b"trident_sparql\0", FnSparql);
        let fn_free_string: FnFreeString = sym!(b"trident_free_string\0", FnFreeString);
        let fn_unload: FnUnload = sym!(b"trident_unload\0", FnUnload);

        Ok(Self {
            _runtime: runtime,
            fn_load,
            fn_sparql,
            fn_free_string,
            fn_unload,
        })
    }
}

impl NativeEngine for SymbolEngine {
    fn load(&self, path: &CStr) -> Result<Handles, TridentError> {
        let mut handles = Handles::default();
        let code = unsafe {
            (self.fn_load)(
                path.as_ptr(),
                &mut handles.my_trident,
                &mut handles.my_trident_layer,
            )
        };
        if code != 0 {
            return Err(TridentError::Native {
                operation: "load",
                code,
            });
        }
        Ok(handles)
    }

    fn sparql(&self, handles: Handles, query: &CStr) -> Result<String, TridentError> {
        let raw = unsafe {
            (self.fn_sparql)(handles.my_trident, handles.my_trident_layer, query.as_ptr())
        };
        if raw.is_null() {
            return Err(TridentError::Native {
                operation: "sparql",
                code: -1,
            });
        }
        // The engine owns `raw` until it is handed back to trident_free_string.
        let result = unsafe { CStr::from_ptr(raw) }.to_str().map(str::to_owned);
        unsafe { (self.fn_free_string)(raw) };
        Ok(result?)
    }

    fn unload(&self, handles: Handles) {
        unsafe { (self.fn_unload)(handles.my_trident, handles.my_trident_layer) }
    }
}
