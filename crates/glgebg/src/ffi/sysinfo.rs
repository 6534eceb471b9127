//! `glge_Get*`: memory statistics in bytes, 0 when unavailable

use glgebg_runtime::sysinfo;

/// Total physical memory
#[no_mangle]
pub extern "C" fn glge_GetMaxMemoryCount() -> u64 {
    sysinfo::total_memory()
}

/// Total minus available memory
#[no_mangle]
pub extern "C" fn glge_GetCurrentMemoryUsage() -> u64 {
    sysinfo::used_memory()
}

/// Memory available for new allocations
#[no_mangle]
pub extern "C" fn glge_GetFreeMemory() -> u64 {
    sysinfo::free_memory()
}

/// Virtual size of this process
#[no_mangle]
pub extern "C" fn glge_GetOwnMemoryUsage() -> u64 {
    sysinfo::own_memory()
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn test_memory_report() {
        let total = glge_GetMaxMemoryCount();
        let free = glge_GetFreeMemory();
        assert!(total > 0);
        assert!(free <= total);
        assert!(glge_GetCurrentMemoryUsage() <= total);
        assert!(glge_GetOwnMemoryUsage() > 0);
    }
}
