//! `mutex_*`: a bare lock for C
//!
//! The C side locks and unlocks explicitly, so these wrap the raw half of
//! `BgMutex`.

use glgebg_core::{bg_warn, BgMutex};

use super::{destroy, handle_ref, into_handle};

/// Lock with no guarded data
pub type CMutex = BgMutex<()>;

#[no_mangle]
pub extern "C" fn mutex_Create() -> *mut CMutex {
    into_handle(BgMutex::new(()))
}

/// # Safety
///
/// `mutex` must be null or come from `mutex_Create`, must be unlocked, and
/// must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn mutex_Destroy(mutex: *mut CMutex) {
    if mutex.is_null() {
        return;
    }
    if (*mutex).is_locked() {
        bg_warn!("mutex_Destroy: destroying a locked mutex");
    }
    destroy(mutex);
}

/// Block until the lock is held
///
/// # Safety
///
/// `mutex` must be null or a live mutex.
#[no_mangle]
pub unsafe extern "C" fn mutex_Lock(mutex: *mut CMutex) {
    if let Some(m) = handle_ref(mutex, "mutex_Lock") {
        m.lock_raw();
    }
}

/// # Safety
///
/// `mutex` must be null or a live mutex locked by the caller.
#[no_mangle]
pub unsafe extern "C" fn mutex_Unlock(mutex: *mut CMutex) {
    let Some(m) = handle_ref(mutex, "mutex_Unlock") else {
        return;
    };
    if !m.is_locked() {
        bg_warn!("mutex_Unlock: mutex is not locked");
        return;
    }
    m.unlock_raw();
}

/// True if the lock was taken
///
/// # Safety
///
/// `mutex` must be null or a live mutex.
#[no_mangle]
pub unsafe extern "C" fn mutex_Try_lock(mutex: *mut CMutex) -> bool {
    handle_ref(mutex, "mutex_Try_lock").map_or(false, |m| m.try_lock_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_cycle() {
        unsafe {
            let m = mutex_Create();
            mutex_Lock(m);
            assert!(!mutex_Try_lock(m));
            mutex_Unlock(m);
            assert!(mutex_Try_lock(m));
            mutex_Unlock(m);

            // unlocking twice is reported, not fatal
            mutex_Unlock(m);
            mutex_Destroy(m);
        }
    }

    #[test]
    fn test_null_mutex() {
        unsafe {
            mutex_Lock(std::ptr::null_mut());
            assert!(!mutex_Try_lock(std::ptr::null_mut()));
            mutex_Destroy(std::ptr::null_mut());
        }
    }

    #[test]
    fn test_destroy_null_or_locked() {
        unsafe {
            // null is a no-op, like the other destroy calls
            mutex_Destroy(std::ptr::null_mut());

            let m = mutex_Create();
            mutex_Lock(m);
            mutex_Destroy(m);
        }
    }
}
