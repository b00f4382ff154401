//! The C-ABI embedding surface.
//!
//! Three entry points with stable names wrap the kernel for foreign
//! callers and for the drivers produced by the AOT emitter: `paren_init`
//! installs the kernel and loads the prelude, `paren_eval_string` runs a
//! source buffer against the global environment, `paren_import` evaluates
//! a file. `paren_init` must be called exactly once before the other two.
//!
//! The kernel handle lives in a process-global slot; calls before init are
//! ignored. Rust embedders should use [`crate::Interp`] directly instead.

use std::ffi::{c_char, CStr};

use lazy_static::lazy_static;
use parking_lot::Mutex;

use crate::runtime::Interp;

lazy_static! {
    static ref KERNEL: Mutex<Option<Interp>> = Mutex::new(None);
}

/// A handle onto the installed kernel, if any
fn kernel() -> Option<Interp> {
    KERNEL.lock().clone()
}

/// Installs the kernel and loads the prelude.
#[no_mangle]
pub extern "C" fn paren_init() {
    let interp = Interp::new();
    interp.load_prelude();
    *KERNEL.lock() = Some(interp);
}

/// Evaluates a nul-terminated source buffer; the result is discarded.
///
/// # Safety
///
/// `source` must be null or point to a nul-terminated byte string that
/// stays valid for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn paren_eval_string(source: *const c_char) {
    if source.is_null() {
        return;
    }
    let Some(interp) = kernel() else {
        return;
    };
    let source = CStr::from_ptr(source).to_string_lossy();
    interp.eval_source(&source);
}

/// Reads a file and evaluates it as source; failures go to stderr.
///
/// # Safety
///
/// `path` must be null or point to a nul-terminated byte string that
/// stays valid for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn paren_import(path: *const c_char) {
    if path.is_null() {
        return;
    }
    let Some(interp) = kernel() else {
        return;
    };
    let path = CStr::from_ptr(path).to_string_lossy();
    interp.import_file(&path);
}
