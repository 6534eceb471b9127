//! OS thread handle
//!
//! `BgThread` owns at most one running OS thread. It can start from a Rust
//! closure or from a C function pointer plus an opaque data pointer. A
//! handle that is still joinable when dropped joins its thread.

use std::ffi::c_void;
use std::thread::{self, JoinHandle, ThreadId};

use glgebg_core::{bg_debug, bg_error, bg_warn, ThreadError};

/// Entry point signature for threads started from C
pub type ThreadFn = unsafe extern "C" fn(*mut c_void);

/// Data pointer moved into the spawned thread
struct SendPtr(*mut c_void);

// Safety: the caller of `spawn_raw` guarantees the pointee may be used from
// the new thread
unsafe impl Send for SendPtr {}

impl SendPtr {
    fn into_inner(self) -> *mut c_void {
        self.0
    }
}

/// Handle to an OS thread
#[derive(Debug, Default)]
pub struct BgThread {
    handle: Option<JoinHandle<()>>,
}

impl BgThread {
    /// Handle that owns no thread
    pub const fn empty() -> Self {
        Self { handle: None }
    }

    /// Start `body` on a new thread
    pub fn spawn<F>(body: F) -> Result<Self, ThreadError>
    where
        F: FnOnce() + Send + 'static,
    {
        match thread::Builder::new().spawn(body) {
            Ok(handle) => {
                bg_debug!("spawned thread {:?}", handle.thread().id());
                Ok(Self { handle: Some(handle) })
            }
            Err(e) => {
                bg_error!("thread spawn failed: {}", e);
                Err(ThreadError::SpawnFailed)
            }
        }
    }

    /// Start `func(data)` on a new thread
    ///
    /// # Safety
    ///
    /// `func` must be safe to call with `data` from another thread, and
    /// whatever `data` points to must stay valid until `func` returns.
    pub unsafe fn spawn_raw(func: ThreadFn, data: *mut c_void) -> Result<Self, ThreadError> {
        let data = SendPtr(data);
        Self::spawn(move || {
            let data = data.into_inner();
            // Safety: upheld by the caller of spawn_raw
            unsafe { func(data) }
        })
    }

    /// Whether this handle owns a thread that has not been joined or detached
    pub fn is_joinable(&self) -> bool {
        self.handle.is_some()
    }

    pub fn id(&self) -> Option<ThreadId> {
        self.handle.as_ref().map(|h| h.thread().id())
    }

    /// Wait for the thread to finish
    pub fn join(&mut self) -> Result<(), ThreadError> {
        let handle = self.handle.take().ok_or(ThreadError::NotJoinable)?;
        if handle.thread().id() == thread::current().id() {
            // joining ourselves would deadlock; keep the handle
            self.handle = Some(handle);
            return Err(ThreadError::NotJoinable);
        }
        handle.join().map_err(|_| ThreadError::Panicked)
    }

    /// Let the thread run on without this handle
    pub fn detach(&mut self) -> Result<(), ThreadError> {
        self.handle.take().map(drop).ok_or(ThreadError::NotJoinable)
    }

    pub fn swap(&mut self, other: &mut BgThread) {
        std::mem::swap(&mut self.handle, &mut other.handle);
    }

    /// Number of threads that can run in parallel, or 0 if unknown
    pub fn hardware_concurrency() -> u32 {
        match thread::available_parallelism() {
            Ok(n) => u32::try_from(n.get()).unwrap_or(u32::MAX),
            Err(_) => online_cpus(),
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        fn online_cpus() -> u32 {
            // Safety: sysconf has no memory-safety preconditions
            let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
            if n > 0 { u32::try_from(n).unwrap_or(u32::MAX) } else { 0 }
        }
    } else {
        fn online_cpus() -> u32 {
            0
        }
    }
}

impl Drop for BgThread {
    fn drop(&mut self) {
        if self.is_joinable() {
            if let Err(e) = self.join() {
                bg_warn!("joining thread on drop: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_spawn_and_join() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let mut t = BgThread::spawn(move || {
            h.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        assert!(t.is_joinable());
        t.join().unwrap();
        assert!(!t.is_joinable());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(t.join(), Err(ThreadError::NotJoinable));
    }

    unsafe extern "C" fn bump(data: *mut c_void) {
        let counter = &*(data as *const AtomicUsize);
        counter.fetch_add(5, Ordering::SeqCst);
    }

    #[test]
    fn test_spawn_raw() {
        let counter = AtomicUsize::new(0);
        let mut t = unsafe {
            BgThread::spawn_raw(bump, &counter as *const AtomicUsize as *mut c_void).unwrap()
        };
        t.join().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_panic_is_reported() {
        let mut t = BgThread::spawn(|| panic!("boom")).unwrap();
        assert_eq!(t.join(), Err(ThreadError::Panicked));
    }

    #[test]
    fn test_detach_and_swap() {
        let mut a = BgThread::spawn(|| {}).unwrap();
        let mut b = BgThread::empty();

        a.swap(&mut b);
        assert!(!a.is_joinable());
        assert!(b.is_joinable());
        assert!(b.id().is_some());

        b.detach().unwrap();
        assert!(!b.is_joinable());
        assert_eq!(b.detach(), Err(ThreadError::NotJoinable));
    }

    #[test]
    fn test_drop_joins() {
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let h = Arc::clone(&hits);
            let _t = BgThread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(10));
                h.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hardware_concurrency() {
        assert!(BgThread::hardware_concurrency() >= 1);
    }
}
