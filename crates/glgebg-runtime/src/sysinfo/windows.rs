//! Windows backend: Win32 memory status and process counters
//!
//! The proc root has no meaning here. Own memory is the commit charge
//! (`PagefileUsage`), the closest Windows figure to a virtual size.

use std::mem;
use std::path::Path;

use glgebg_core::SysInfoError;
use windows_sys::Win32::System::ProcessStatus::{GetProcessMemoryInfo, PROCESS_MEMORY_COUNTERS};
use windows_sys::Win32::System::SystemInformation::{GlobalMemoryStatusEx, MEMORYSTATUSEX};
use windows_sys::Win32::System::Threading::GetCurrentProcess;

use super::SysInfoResult;

fn last_error(call: &str) -> SysInfoError {
    SysInfoError::Os {
        call: call.to_string(),
        code: std::io::Error::last_os_error().raw_os_error().unwrap_or(0),
    }
}

fn memory_status() -> SysInfoResult<MEMORYSTATUSEX> {
    // Safety: MEMORYSTATUSEX is plain data; dwLength is set before the call
    let mut status: MEMORYSTATUSEX = unsafe { mem::zeroed() };
    status.dwLength = mem::size_of::<MEMORYSTATUSEX>() as u32;
    if unsafe { GlobalMemoryStatusEx(&mut status) } == 0 {
        return Err(last_error("GlobalMemoryStatusEx"));
    }
    Ok(status)
}

pub(super) fn total_memory(_proc_root: &Path) -> SysInfoResult<u64> {
    memory_status().map(|s| s.ullTotalPhys)
}

pub(super) fn available_memory(_proc_root: &Path) -> SysInfoResult<u64> {
    memory_status().map(|s| s.ullAvailPhys)
}

pub(super) fn own_memory(_proc_root: &Path) -> SysInfoResult<u64> {
    // Safety: plain data, cb set before the call; the pseudo handle from
    // GetCurrentProcess needs no closing
    let cb = mem::size_of::<PROCESS_MEMORY_COUNTERS>() as u32;
    let mut counters: PROCESS_MEMORY_COUNTERS = unsafe { mem::zeroed() };
    counters.cb = cb;
    let ok = unsafe { GetProcessMemoryInfo(GetCurrentProcess(), &mut counters, cb) };
    if ok == 0 {
        return Err(last_error("GetProcessMemoryInfo"));
    }
    Ok(counters.PagefileUsage as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win32_queries() {
        let root = Path::new("ignored");
        let total = total_memory(root).unwrap();
        let available = available_memory(root).unwrap();
        assert!(total > 0);
        assert!(available <= total);
        assert!(own_memory(root).unwrap() > 0);
    }
}
