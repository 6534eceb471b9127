//! Backend for platforms without a memory query implementation

use std::path::Path;

use glgebg_core::SysInfoError;

use super::SysInfoResult;

pub(super) fn total_memory(_proc_root: &Path) -> SysInfoResult<u64> {
    Err(SysInfoError::Unsupported)
}

pub(super) fn available_memory(_proc_root: &Path) -> SysInfoResult<u64> {
    Err(SysInfoError::Unsupported)
}

pub(super) fn own_memory(_proc_root: &Path) -> SysInfoResult<u64> {
    Err(SysInfoError::Unsupported)
}
