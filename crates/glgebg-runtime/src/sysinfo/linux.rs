//! Linux backend: procfs with a sysinfo(2) fallback

use std::path::Path;

use glgebg_core::{bg_debug, SysInfoError};

use super::SysInfoResult;

/// Value of a `Name:   1234 kB` line, in bytes
fn parse_kb_field(content: &str, field: &str) -> Option<u64> {
    content.lines().find_map(|line| {
        let rest = line.strip_prefix(field)?.strip_prefix(':')?;
        let kb: u64 = rest.split_whitespace().next()?.parse().ok()?;
        Some(kb.saturating_mul(1024))
    })
}

fn read_kb_field(path: &Path, field: &str) -> SysInfoResult<u64> {
    let content = std::fs::read_to_string(path).map_err(|e| SysInfoError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_kb_field(&content, field).ok_or_else(|| SysInfoError::MissingField {
        path: path.display().to_string(),
        field: field.to_string(),
    })
}

/// (total, free) physical memory from sysinfo(2)
fn sysinfo_totals() -> Option<(u64, u64)> {
    // Safety: sysinfo only writes into the struct we hand it
    let mut info: libc::sysinfo = unsafe { std::mem::zeroed() };
    if unsafe { libc::sysinfo(&mut info) } != 0 {
        return None;
    }
    let unit = u64::from(info.mem_unit.max(1));
    Some((
        (info.totalram as u64).saturating_mul(unit),
        (info.freeram as u64).saturating_mul(unit),
    ))
}

fn meminfo_or_sysinfo(
    proc_root: &Path,
    field: &str,
    pick: fn((u64, u64)) -> u64,
) -> SysInfoResult<u64> {
    read_kb_field(&proc_root.join("meminfo"), field).or_else(|e| {
        bg_debug!("{}; falling back to sysinfo(2)", e);
        sysinfo_totals().map(pick).ok_or(e)
    })
}

pub(super) fn total_memory(proc_root: &Path) -> SysInfoResult<u64> {
    meminfo_or_sysinfo(proc_root, "MemTotal", |(total, _)| total)
}

pub(super) fn available_memory(proc_root: &Path) -> SysInfoResult<u64> {
    meminfo_or_sysinfo(proc_root, "MemAvailable", |(_, free)| free)
}

pub(super) fn own_memory(proc_root: &Path) -> SysInfoResult<u64> {
    read_kb_field(&proc_root.join("self").join("status"), "VmSize")
}
