//! `timer_*` and `scopeTimer_*`

use std::ffi::c_char;

use glgebg_core::{ScopeTimer, Timer};

use super::{cstr_bytes, destroy, handle_mut, handle_ref, into_handle};

#[no_mangle]
pub extern "C" fn timer_Create() -> *mut Timer {
    into_handle(Timer::new())
}

/// # Safety
///
/// `timer` must be null or come from `timer_Create`, and must not be used
/// afterwards.
#[no_mangle]
pub unsafe extern "C" fn timer_Destroy(timer: *mut Timer) {
    destroy(timer);
}

/// # Safety
///
/// `timer` must be null or a live timer.
#[no_mangle]
pub unsafe extern "C" fn timer_Restart(timer: *mut Timer) {
    if let Some(t) = handle_mut(timer, "timer_Restart") {
        t.restart();
    }
}

/// Seconds since creation or the last restart
///
/// # Safety
///
/// `timer` must be null or a live timer.
#[no_mangle]
pub unsafe extern "C" fn timer_GetDeltaTime(timer: *mut Timer) -> f64 {
    handle_ref(timer, "timer_GetDeltaTime").map_or(0.0, Timer::delta_time)
}

/// Start a named timer; `scopeTimer_Destroy` prints how long it lived
///
/// # Safety
///
/// `name` must be null or NUL-terminated. The name is copied.
#[no_mangle]
pub unsafe extern "C" fn scopeTimer_Create(name: *const c_char) -> *mut ScopeTimer {
    let name = cstr_bytes(name, "scopeTimer_Create").unwrap_or_default();
    into_handle(ScopeTimer::new(String::from_utf8_lossy(name)))
}

/// Print `"<name> took <seconds> seconds"` and free the timer
///
/// # Safety
///
/// `timer` must be null or come from `scopeTimer_Create`, and must not be
/// used afterwards.
#[no_mangle]
pub unsafe extern "C" fn scopeTimer_Destroy(timer: *mut ScopeTimer) {
    destroy(timer);
}
