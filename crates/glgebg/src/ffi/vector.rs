//! `vector_*`: the C view of `ByteBuffer`
//!
//! A `Vector*` points at a `ByteBuffer`, whose `#[repr(C)]` prefix
//! (`byteCapacity`, `byteSize`, `ptr`, `elementSize`) C code may read
//! directly. Element access through `vector_Get` is unchecked like the C
//! header promises; everything that can fail is logged.

use std::ffi::c_void;

use glgebg_core::{bg_error, bg_warn, ByteBuffer};
use glgebg_runtime::config;

use super::{destroy, handle_mut, handle_ref, into_handle, report, to_usize};

fn configured(mut buf: ByteBuffer) -> ByteBuffer {
    buf.set_policy(config::global().growth_policy());
    buf
}

fn warn_zero_size(func: &str, element_size: u64) {
    if element_size == 0 {
        bg_warn!("{}: element size 0, vector stays empty", func);
    }
}

/// New vector with the configured initial capacity
#[no_mangle]
pub extern "C" fn vector_Create(element_size: u64) -> *mut ByteBuffer {
    warn_zero_size("vector_Create", element_size);
    into_handle(ByteBuffer::with_policy(
        to_usize(element_size),
        config::global().growth_policy(),
    ))
}

/// New vector with exactly `elements` zeroed elements of capacity, size 0
#[no_mangle]
pub extern "C" fn vector_CreatePreallocated(element_size: u64, elements: u64) -> *mut ByteBuffer {
    warn_zero_size("vector_CreatePreallocated", element_size);
    into_handle(configured(ByteBuffer::with_capacity(
        to_usize(element_size),
        to_usize(elements),
    )))
}

/// New vector holding a copy of `elements` elements read from `data`
///
/// # Safety
///
/// `data` must be readable for `element_size * elements` bytes.
#[no_mangle]
pub unsafe extern "C" fn vector_CreateFrom(
    element_size: u64,
    elements: u64,
    data: *const c_void,
) -> *mut ByteBuffer {
    let es = to_usize(element_size);
    let n = to_usize(elements);
    let buf = if data.is_null() && n > 0 {
        bg_warn!("vector_CreateFrom: null data for {} elements", n);
        ByteBuffer::empty(es, config::global().growth_policy())
    } else {
        ByteBuffer::try_from_raw(es, n, data.cast()).unwrap_or_else(|e| {
            bg_error!("vector_CreateFrom: {}", e);
            ByteBuffer::empty(es, config::global().growth_policy())
        })
    };
    into_handle(configured(buf))
}

/// # Safety
///
/// `vec` must be null or come from a `vector_Create*` function, and must not
/// be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn vector_Destroy(vec: *mut ByteBuffer) {
    destroy(vec);
}

/// Address of element `i`; not bounds checked
///
/// # Safety
///
/// `vec` must be null or a live vector.
#[no_mangle]
pub unsafe extern "C" fn vector_Get(i: u64, vec: *const ByteBuffer) -> *mut c_void {
    match handle_ref(vec, "vector_Get") {
        Some(v) => v.element_ptr(to_usize(i)).cast(),
        None => std::ptr::null_mut(),
    }
}

/// Base address of the storage, null when capacity is 0
///
/// # Safety
///
/// `vec` must be null or a live vector.
#[no_mangle]
pub unsafe extern "C" fn vector_Data(vec: *const ByteBuffer) -> *mut c_void {
    match handle_ref(vec, "vector_Data") {
        Some(v) => v.data().cast(),
        None => std::ptr::null_mut(),
    }
}

/// # Safety
///
/// `vec` must be null or a live vector.
#[no_mangle]
pub unsafe extern "C" fn vector_Size(vec: *const ByteBuffer) -> u64 {
    handle_ref(vec, "vector_Size").map_or(0, |v| v.len() as u64)
}

/// # Safety
///
/// `vec` must be null or a live vector.
#[no_mangle]
pub unsafe extern "C" fn vector_Capacity(vec: *const ByteBuffer) -> u64 {
    handle_ref(vec, "vector_Capacity").map_or(0, |v| v.capacity() as u64)
}

/// # Safety
///
/// `vec` must be null or a live vector.
#[no_mangle]
pub unsafe extern "C" fn vector_ElementSize(vec: *const ByteBuffer) -> u64 {
    handle_ref(vec, "vector_ElementSize").map_or(0, |v| v.element_size() as u64)
}

/// # Safety
///
/// `vec` must be null or a live vector.
#[no_mangle]
pub unsafe extern "C" fn vector_Resize(elements: u64, vec: *mut ByteBuffer) {
    if let Some(v) = handle_mut(vec, "vector_Resize") {
        report("vector_Resize", v.resize(to_usize(elements)));
    }
}

/// # Safety
///
/// `vec` must be null or a live vector.
#[no_mangle]
pub unsafe extern "C" fn vector_Reserve(elements: u64, vec: *mut ByteBuffer) {
    if let Some(v) = handle_mut(vec, "vector_Reserve") {
        report("vector_Reserve", v.reserve(to_usize(elements)));
    }
}

/// Copy one element from `value` to the end
///
/// # Safety
///
/// `vec` must be null or a live vector; `value` must be readable for one
/// element. `value` may point into the vector itself.
#[no_mangle]
pub unsafe extern "C" fn vector_Push_back(value: *const c_void, vec: *mut ByteBuffer) {
    let Some(v) = handle_mut(vec, "vector_Push_back") else {
        return;
    };
    if value.is_null() {
        bg_warn!("vector_Push_back: null value");
        return;
    }
    report("vector_Push_back", v.push_back_raw(value.cast()));
}

/// Copy one element from `value` to the front
///
/// # Safety
///
/// As for `vector_Push_back`.
#[no_mangle]
pub unsafe extern "C" fn vector_Push_front(value: *const c_void, vec: *mut ByteBuffer) {
    let Some(v) = handle_mut(vec, "vector_Push_front") else {
        return;
    };
    if value.is_null() {
        bg_warn!("vector_Push_front: null value");
        return;
    }
    report("vector_Push_front", v.push_front_raw(value.cast()));
}

/// # Safety
///
/// `vec` must be null or a live vector.
#[no_mangle]
pub unsafe extern "C" fn vector_Pop_back(vec: *mut ByteBuffer) {
    if let Some(v) = handle_mut(vec, "vector_Pop_back") {
        v.pop_back();
    }
}

/// # Safety
///
/// `vec` must be null or a live vector.
#[no_mangle]
pub unsafe extern "C" fn vector_Pop_front(vec: *mut ByteBuffer) {
    if let Some(v) = handle_mut(vec, "vector_Pop_front") {
        v.pop_front();
    }
}

/// Release the storage; size and capacity become 0
///
/// # Safety
///
/// `vec` must be null or a live vector.
#[no_mangle]
pub unsafe extern "C" fn vector_Clear(vec: *mut ByteBuffer) {
    if let Some(v) = handle_mut(vec, "vector_Clear") {
        v.clear();
    }
}

/// # Safety
///
/// `vec` must be null or a live vector.
#[no_mangle]
pub unsafe extern "C" fn vector_Erase(index: u64, vec: *mut ByteBuffer) {
    if let Some(v) = handle_mut(vec, "vector_Erase") {
        report("vector_Erase", v.erase(to_usize(index)));
    }
}

/// Remove `n` elements starting at `index`
///
/// # Safety
///
/// `vec` must be null or a live vector.
#[no_mangle]
pub unsafe extern "C" fn vector_EraseSome(index: u64, n: u64, vec: *mut ByteBuffer) {
    if let Some(v) = handle_mut(vec, "vector_EraseSome") {
        report("vector_EraseSome", v.erase_range(to_usize(index), to_usize(n)));
    }
}
