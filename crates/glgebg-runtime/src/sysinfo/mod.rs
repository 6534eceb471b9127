//! System memory statistics
//!
//! Byte counts for physical memory and for this process's virtual size.
//! Linux reads the proc filesystem (with a `sysinfo(2)` fallback for the
//! system totals). Windows asks `GlobalMemoryStatusEx` and
//! `GetProcessMemoryInfo` and ignores the proc root. Other platforms report
//! `SysInfoError::Unsupported`.
//!
//! The `try_*` methods return errors. The plain methods, and the free
//! functions backed by the global configuration, log a warning and return 0.

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod linux;
        use linux as backend;
    } else if #[cfg(windows)] {
        mod windows;
        use windows as backend;
    } else {
        mod fallback;
        use fallback as backend;
    }
}

use std::path::{Path, PathBuf};

use glgebg_core::{bg_warn, SysInfoError};

use crate::config;

pub type SysInfoResult<T> = Result<T, SysInfoError>;

/// One reading of every statistic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryInfo {
    /// Total physical memory in bytes
    pub total: u64,
    /// Memory available for new allocations in bytes
    pub available: u64,
    /// Virtual size of this process in bytes
    pub own: u64,
}

impl MemoryInfo {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.available)
    }
}

/// Memory queries against one proc root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysInfo {
    proc_root: PathBuf,
}

impl SysInfo {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    pub fn try_total_memory(&self) -> SysInfoResult<u64> {
        backend::total_memory(&self.proc_root)
    }

    pub fn try_free_memory(&self) -> SysInfoResult<u64> {
        backend::available_memory(&self.proc_root)
    }

    /// Total minus available
    pub fn try_used_memory(&self) -> SysInfoResult<u64> {
        let total = self.try_total_memory()?;
        let free = self.try_free_memory()?;
        Ok(total.saturating_sub(free))
    }

    pub fn try_own_memory(&self) -> SysInfoResult<u64> {
        backend::own_memory(&self.proc_root)
    }

    pub fn try_snapshot(&self) -> SysInfoResult<MemoryInfo> {
        Ok(MemoryInfo {
            total: self.try_total_memory()?,
            available: self.try_free_memory()?,
            own: self.try_own_memory()?,
        })
    }

    pub fn total_memory(&self) -> u64 {
        or_zero("total memory", self.try_total_memory())
    }

    pub fn free_memory(&self) -> u64 {
        or_zero("free memory", self.try_free_memory())
    }

    pub fn used_memory(&self) -> u64 {
        or_zero("used memory", self.try_used_memory())
    }

    pub fn own_memory(&self) -> u64 {
        or_zero("own memory", self.try_own_memory())
    }
}

impl Default for SysInfo {
    /// Uses the proc root of the global configuration
    fn default() -> Self {
        Self::new(&config::global().proc_root)
    }
}

fn or_zero(what: &str, result: SysInfoResult<u64>) -> u64 {
    result.unwrap_or_else(|e| {
        bg_warn!("cannot query {}: {}", what, e);
        0
    })
}

/// Total physical memory in bytes, 0 if unknown
pub fn total_memory() -> u64 {
    SysInfo::default().total_memory()
}

/// Available memory in bytes, 0 if unknown
pub fn free_memory() -> u64 {
    SysInfo::default().free_memory()
}

/// Total minus available memory in bytes, 0 if unknown
pub fn used_memory() -> u64 {
    SysInfo::default().used_memory()
}

/// Virtual size of this process in bytes, 0 if unknown
pub fn own_memory() -> u64 {
    SysInfo::default().own_memory()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_used_saturates() {
        let info = MemoryInfo { total: 10, available: 30, own: 0 };
        assert_eq!(info.used(), 0);
        let info = MemoryInfo { total: 30, available: 10, own: 0 };
        assert_eq!(info.used(), 20);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_missing_root_reports_zero() {
        let info = SysInfo::new("/nonexistent/glge-proc");
        assert!(info.try_own_memory().is_err());
        assert_eq!(info.own_memory(), 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_live_system() {
        let info = SysInfo::new("/proc");
        let snap = info.try_snapshot().unwrap();
        assert!(snap.total > 0);
        assert!(snap.available <= snap.total);
        assert!(snap.own > 0);
    }
}
