//! `thread_*`: OS threads started from C function pointers

use std::ffi::{c_uint, c_void};

use glgebg_core::bg_warn;
use glgebg_runtime::{BgThread, ThreadFn};

use super::{destroy, handle_mut, handle_ref, into_handle, report};

/// Start `func(data)` on a new thread; null if `func` is null or the spawn fails
///
/// # Safety
///
/// `func` must be safe to call with `data` from another thread, and `data`
/// must outlive the call.
#[no_mangle]
pub unsafe extern "C" fn thread_Create(func: Option<ThreadFn>, data: *mut c_void) -> *mut BgThread {
    let Some(func) = func else {
        bg_warn!("thread_Create: null function");
        return std::ptr::null_mut();
    };
    match BgThread::spawn_raw(func, data) {
        Ok(t) => into_handle(t),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Join (if still joinable) and free the handle
///
/// # Safety
///
/// `thread` must be null or come from `thread_Create`, and must not be used
/// afterwards.
#[no_mangle]
pub unsafe extern "C" fn thread_Destroy(thread: *mut BgThread) {
    destroy(thread);
}

/// # Safety
///
/// `thread` must be null or a live thread handle.
#[no_mangle]
pub unsafe extern "C" fn thread_Join(thread: *mut BgThread) {
    if let Some(t) = handle_mut(thread, "thread_Join") {
        report("thread_Join", t.join());
    }
}

/// # Safety
///
/// `thread` must be null or a live thread handle.
#[no_mangle]
pub unsafe extern "C" fn thread_Detach(thread: *mut BgThread) {
    if let Some(t) = handle_mut(thread, "thread_Detach") {
        report("thread_Detach", t.detach());
    }
}

/// # Safety
///
/// `thread` must be null or a live thread handle.
#[no_mangle]
pub unsafe extern "C" fn thread_Joinable(thread: *mut BgThread) -> bool {
    handle_ref(thread, "thread_Joinable").map_or(false, |t| t.is_joinable())
}

/// Lower-case name declared by the C header
///
/// # Safety
///
/// As for `thread_Joinable`.
#[no_mangle]
pub unsafe extern "C" fn thread_joinable(thread: *mut BgThread) -> bool {
    thread_Joinable(thread)
}

/// # Safety
///
/// Both handles must be null or live thread handles.
#[no_mangle]
pub unsafe extern "C" fn thread_Swap(thread: *mut BgThread, other: *mut BgThread) {
    if std::ptr::eq(thread, other) {
        return;
    }
    let Some(a) = handle_mut(thread, "thread_Swap") else {
        return;
    };
    if let Some(b) = handle_mut(other, "thread_Swap") {
        a.swap(b);
    }
}

/// Parallelism estimate, 0 if unknown
#[no_mangle]
pub extern "C" fn thread_Hardware_concurrency() -> c_uint {
    BgThread::hardware_concurrency()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    unsafe extern "C" fn add_one(data: *mut c_void) {
        (*(data as *const AtomicU32)).fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_create_join_destroy() {
        let counter = AtomicU32::new(0);
        unsafe {
            let t = thread_Create(Some(add_one), &counter as *const AtomicU32 as *mut c_void);
            assert!(!t.is_null());
            assert!(thread_Joinable(t));
            thread_Join(t);
            assert!(!thread_joinable(t));

            // second join is reported and ignored
            thread_Join(t);
            thread_Destroy(t);
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_swap_and_destroy_joins() {
        let counter = AtomicU32::new(0);
        unsafe {
            let a = thread_Create(Some(add_one), &counter as *const AtomicU32 as *mut c_void);
            let b = thread_Create(Some(add_one), &counter as *const AtomicU32 as *mut c_void);
            thread_Join(b);

            thread_Swap(a, b);
            assert!(!thread_Joinable(a));
            assert!(thread_Joinable(b));

            thread_Destroy(a);
            thread_Destroy(b);
        }
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_null_function() {
        unsafe {
            assert!(thread_Create(None, std::ptr::null_mut()).is_null());
        }
        assert!(thread_Hardware_concurrency() >= 1);
    }
}
