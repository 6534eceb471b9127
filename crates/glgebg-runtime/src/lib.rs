//! # glgebg-runtime
//!
//! Platform-specific pieces of the GLGE background library.
//!
//! This crate provides:
//! - Thread handles (`BgThread`) that can run C entry points
//! - System memory statistics (procfs on Linux)
//! - Runtime configuration with `GLGE_*` environment overrides

pub mod config;
pub mod sysinfo;
pub mod thread;

// Re-exports
pub use config::BgConfig;
pub use sysinfo::{MemoryInfo, SysInfo};
pub use thread::{BgThread, ThreadFn};
