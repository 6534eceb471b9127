//! C ABI
//!
//! Every object crosses the boundary as a heap handle created by a
//! `*_Create` function and released by the matching `*_Destroy`. Null
//! handles are logged and ignored; getters then return 0, null or `NPOS`.
//! Errors the C signatures cannot carry are reported through `bg_warn!`
//! and `bg_error!` and leave the object unchanged.
//!
//! Function names follow the C header of the library, hence the casing.

#![allow(non_snake_case)]
#![allow(clippy::missing_safety_doc)]

pub mod logging;
pub mod mutex;
pub mod string;
pub mod sysinfo;
pub mod thread;
pub mod timing;
pub mod vector;

use std::ffi::{c_char, CStr};
use std::fmt::Display;

use glgebg_core::{bg_error, bg_warn};

pub(crate) fn into_handle<T>(value: T) -> *mut T {
    Box::into_raw(Box::new(value))
}

/// Drop a handle made by `into_handle`; null is ignored
pub(crate) unsafe fn destroy<T>(handle: *mut T) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

pub(crate) unsafe fn handle_ref<'a, T>(handle: *const T, func: &str) -> Option<&'a T> {
    if handle.is_null() {
        bg_warn!("{}: null handle", func);
        None
    } else {
        Some(&*handle)
    }
}

pub(crate) unsafe fn handle_mut<'a, T>(handle: *mut T, func: &str) -> Option<&'a mut T> {
    if handle.is_null() {
        bg_warn!("{}: null handle", func);
        None
    } else {
        Some(&mut *handle)
    }
}

/// Bytes of a NUL-terminated C string, without the terminator
pub(crate) unsafe fn cstr_bytes<'a>(s: *const c_char, func: &str) -> Option<&'a [u8]> {
    if s.is_null() {
        bg_warn!("{}: null string", func);
        None
    } else {
        Some(CStr::from_ptr(s).to_bytes())
    }
}

/// C position or count as `usize`, saturating on narrow targets
#[inline]
pub(crate) fn to_usize(v: u64) -> usize {
    usize::try_from(v).unwrap_or(usize::MAX)
}

pub(crate) fn report<E: Display>(func: &str, result: Result<(), E>) {
    if let Err(e) = result {
        bg_error!("{}: {}", func, e);
    }
}
