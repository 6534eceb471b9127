//! # glgebg-core
//!
//! Core types for the GLGE background library (GLGEBg).
//!
//! This crate is platform-agnostic and contains no OS-specific code.
//! Threads and system queries live in `glgebg-runtime`; the C ABI lives
//! in the `glgebg` facade crate.
//!
//! ## Modules
//!
//! - `buffer` - Untyped, element-size-parameterized growable byte buffer
//! - `record` - Typed view over `ByteBuffer` for `Copy` records
//! - `string` - NUL-terminated byte string wrapper
//! - `mutex` - Mutex with guard and raw (C-style) lock/unlock
//! - `timer` - Monotonic interval timer and scope timer
//! - `logger` - Print-or-queue logger
//! - `error` - Error types
//! - `env` - `GLGE_*` environment variable helpers
//! - `bgprint` - Leveled stderr print macros

pub mod bgprint;
pub mod buffer;
pub mod env;
pub mod error;
pub mod logger;
pub mod mutex;
pub mod record;
pub mod string;
pub mod timer;

// Re-exports for convenience
pub use buffer::{ByteBuffer, GrowthPolicy};
pub use error::{BgError, BgResult, BufferError, BufferResult, StringError, SysInfoError, ThreadError};
pub use logger::{LogSink, Logger};
pub use mutex::{BgMutex, BgMutexGuard};
pub use record::RecordBuffer;
pub use string::BgString;
pub use timer::{ScopeTimer, Timer};

/// Constants for buffer layout and library defaults
pub mod constants {
    // Compile-time defaults, optionally overridden through GLGE_CONFIG_RS.
    include!(concat!(env!("OUT_DIR"), "/glge_merged_config.rs"));

    cfg_if::cfg_if! {
        if #[cfg(target_pointer_width = "64")] {
            /// Alignment of buffer storage (matches the platform malloc guarantee)
            pub const BUFFER_ALIGN: usize = 16;
        } else {
            /// Alignment of buffer storage (matches the platform malloc guarantee)
            pub const BUFFER_ALIGN: usize = 8;
        }
    }

    /// Sentinel returned by C string searches when nothing matches
    pub const NPOS: u64 = u64::MAX;
}
