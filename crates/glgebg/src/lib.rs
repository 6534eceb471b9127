//! # glgebg - GLGE background library
//!
//! Small native support facilities behind both a Rust API and a C ABI.
//!
//! ## Features
//!
//! - **Vector**: untyped growable buffer of fixed-size elements, readable
//!   directly from C (`byteCapacity`, `byteSize`, `ptr`, `elementSize`)
//! - **String**: NUL-terminated byte string
//! - **Mutex / Thread**: lock and thread handles usable from C
//! - **Timer / ScopeTimer**: wall-time measurement
//! - **Logger**: print-now or queue-and-flush logging with a custom sink
//! - **Memory info**: total, free, used and own-process memory
//!
//! ## Quick Start
//!
//! ```ignore
//! use glgebg::{Logger, RecordBuffer, ScopeTimer};
//!
//! glgebg::init()?;
//! let log = Logger::with_auto_print(false);
//! {
//!     let _t = ScopeTimer::new("fill");
//!     let mut buf = RecordBuffer::<u16>::new();
//!     buf.reserve(65535)?;
//!     for i in 0..u16::MAX {
//!         buf.push_back(i)?;
//!     }
//! }
//! log.log("done");
//! log.print_all();
//! ```
//!
//! From C, link the `cdylib` or `staticlib` and call the `ffi` functions
//! (`vector_Create`, `logger_log`, `glge_GetFreeMemory`, ...).
//!
//! ## Crate Layout
//!
//! ```text
//!   glgebg          re-exports + ffi (C ABI)
//!     ├── glgebg-runtime   BgThread, sysinfo, BgConfig
//!     └── glgebg-core      ByteBuffer, RecordBuffer, BgString, BgMutex,
//!                          Timer, Logger, errors, bgprint
//! ```

pub mod ffi;

// Re-export core types
pub use glgebg_core::{
    BgError, BgMutex, BgMutexGuard, BgResult, BgString, BufferError, BufferResult, ByteBuffer,
    GrowthPolicy, LogSink, Logger, RecordBuffer, ScopeTimer, StringError, SysInfoError,
    ThreadError, Timer,
};
pub use glgebg_core::constants;
pub use glgebg_core::logger::default_print;

// Re-export bgprint macros for diagnostics
pub use glgebg_core::{bg_debug, bg_error, bg_info, bg_trace, bg_warn, bgprintln};
pub use glgebg_core::bgprint::{
    init as init_logging, set_flush_enabled, set_log_level, set_time_enabled, LogLevel,
};

// Re-export env utilities
pub use glgebg_core::env::{env_get, env_get_bool, env_get_opt, env_get_str};

// Re-export runtime types
pub use glgebg_runtime::{config, sysinfo, BgConfig, BgThread, MemoryInfo, SysInfo, ThreadFn};

/// Install configuration from the environment
///
/// Optional: everything initializes lazily on first use. Call this early to
/// surface an invalid `GLGE_*` environment as an error instead of a warning.
pub fn init() -> BgResult<()> {
    config::init(BgConfig::from_env())
}
