//! Spin-then-yield mutex
//!
//! `BgMutex` guards a value like `std::sync::Mutex`, but also exposes a raw
//! lock/unlock pair so a C caller can hold the lock across calls without a
//! guard object. Contended lockers yield the OS thread between attempts.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

/// Mutex with guard-based and raw locking
///
/// # Example
///
/// ```ignore
/// let mutex = BgMutex::new(0);
/// {
///     let mut guard = mutex.lock();
///     *guard += 1;
/// } // unlocked here
/// ```
pub struct BgMutex<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

// Safety: BgMutex provides exclusive access to T
unsafe impl<T: Send> Send for BgMutex<T> {}
unsafe impl<T: Send> Sync for BgMutex<T> {}

impl<T> BgMutex<T> {
    pub const fn new(value: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(value),
        }
    }

    #[inline]
    fn acquire(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    fn acquire_slow(&self) {
        loop {
            if self
                .locked
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                return;
            }
            while self.locked.load(Ordering::Relaxed) {
                std::thread::yield_now();
                std::hint::spin_loop();
            }
        }
    }

    /// Block until the lock is held
    pub fn lock(&self) -> BgMutexGuard<'_, T> {
        self.lock_raw();
        BgMutexGuard { mutex: self }
    }

    pub fn try_lock(&self) -> Option<BgMutexGuard<'_, T>> {
        if self.acquire() {
            Some(BgMutexGuard { mutex: self })
        } else {
            None
        }
    }

    /// Acquire without producing a guard
    ///
    /// The caller must later call `unlock_raw` exactly once.
    pub fn lock_raw(&self) {
        if !self.acquire() {
            self.acquire_slow();
        }
    }

    /// Non-blocking `lock_raw`; true if the lock was taken
    pub fn try_lock_raw(&self) -> bool {
        self.acquire()
    }

    /// Release a lock taken with `lock_raw` or `try_lock_raw`
    ///
    /// # Safety
    ///
    /// The caller must hold the lock and must not hold a guard for it.
    pub unsafe fn unlock_raw(&self) {
        debug_assert!(self.is_locked(), "unlock of an unlocked BgMutex");
        self.locked.store(false, Ordering::Release);
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    /// Mutable access without locking; `&mut self` proves exclusivity
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: Default> Default for BgMutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for BgMutex<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.try_lock() {
            Some(guard) => f.debug_struct("BgMutex").field("data", &*guard).finish(),
            None => f.debug_struct("BgMutex").field("data", &"<locked>").finish(),
        }
    }
}

/// Guard that releases the mutex when dropped
pub struct BgMutexGuard<'a, T> {
    mutex: &'a BgMutex<T>,
}

impl<'a, T> Deref for BgMutexGuard<'a, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Safety: We hold the lock
        unsafe { &*self.mutex.data.get() }
    }
}

impl<'a, T> DerefMut for BgMutexGuard<'a, T> {
    fn deref_mut(&mut self) -> &mut T {
        // Safety: We hold the lock
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<'a, T> Drop for BgMutexGuard<'a, T> {
    fn drop(&mut self) {
        self.mutex.locked.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_basic_lock() {
        let mutex = BgMutex::new(0);
        {
            let mut guard = mutex.lock();
            *guard = 42;
        }
        assert_eq!(*mutex.lock(), 42);
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_try_lock() {
        let mutex = BgMutex::new(0);

        let guard = mutex.try_lock();
        assert!(guard.is_some());
        assert!(mutex.try_lock().is_none());
        assert!(!mutex.try_lock_raw());

        drop(guard);
        assert!(mutex.try_lock().is_some());
    }

    #[test]
    fn test_concurrent() {
        let mutex = Arc::new(BgMutex::new(0));
        let mut handles = vec![];

        for _ in 0..4 {
            let mutex = Arc::clone(&mutex);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    *mutex.lock() += 1;
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*mutex.lock(), 4000);
    }

    #[test]
    fn test_raw_lock_excludes_guards() {
        let mutex = Arc::new(BgMutex::new(()));
        mutex.lock_raw();
        assert!(mutex.is_locked());

        let other = Arc::clone(&mutex);
        let probe = thread::spawn(move || other.try_lock().is_some());
        assert!(!probe.join().unwrap());

        unsafe { mutex.unlock_raw() };
        assert!(mutex.try_lock_raw());
        unsafe { mutex.unlock_raw() };
    }

    #[test]
    fn test_debug_and_into_inner() {
        let mutex = BgMutex::new(7);
        assert_eq!(format!("{:?}", mutex), "BgMutex { data: 7 }");
        let guard = mutex.lock();
        assert_eq!(format!("{:?}", mutex), "BgMutex { data: \"<locked>\" }");
        drop(guard);
        assert_eq!(mutex.into_inner(), 7);
    }
}
