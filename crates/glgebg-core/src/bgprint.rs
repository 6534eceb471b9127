//! Leveled stderr print macros for GLGEBg
//!
//! Thread-safe, optionally-flushing diagnostic output. The C facade uses these
//! to report contract violations and allocation failures it cannot return.
//!
//! # Environment Variables
//!
//! - `GLGE_FLUSH_EPRINT=1` - Flush stderr after each print
//! - `GLGE_LOG_LEVEL=<level>` - off, error, warn, info, debug, trace (or 0-5)
//! - `GLGE_LOG_TIME=1` - Prefix lines with seconds since first use
//!
//! # Usage
//!
//! ```ignore
//! use glgebg_core::{bg_info, bg_warn};
//!
//! bg_info!("reserved {} elements", n);
//! bg_warn!("vector_Get called with a null vector");
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use crate::constants;
use crate::env::env_flag;

/// Log levels
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Parse a level name or digit; `None` for anything else
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "1" => Some(LogLevel::Error),
            "warn" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[GLGE ERROR]",
            LogLevel::Warn => "[GLGE WARN] ",
            LogLevel::Info => "[GLGE INFO] ",
            LogLevel::Debug => "[GLGE DEBUG]",
            LogLevel::Trace => "[GLGE TRACE]",
        }
    }
}

static FLUSH_ENABLED: AtomicBool = AtomicBool::new(constants::FLUSH_EPRINT);
static TIME_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(constants::LOG_LEVEL);
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static START: OnceLock<Instant> = OnceLock::new();

/// Initialize from environment variables
///
/// Called automatically on first print. Explicit setters called before the
/// first print are overridden by the environment.
pub fn init() {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }
    let _ = START.get_or_init(Instant::now);

    if let Some(flush) = env_flag("GLGE_FLUSH_EPRINT") {
        FLUSH_ENABLED.store(flush, Ordering::Relaxed);
    }
    if let Some(time) = env_flag("GLGE_LOG_TIME") {
        TIME_ENABLED.store(time, Ordering::Relaxed);
    }
    if let Ok(val) = std::env::var("GLGE_LOG_LEVEL") {
        let level = LogLevel::parse(&val).unwrap_or(LogLevel::Info);
        LOG_LEVEL.store(level as u8, Ordering::Relaxed);
    }
}

#[inline]
fn ensure_init() {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
}

#[inline]
pub fn flush_enabled() -> bool {
    ensure_init();
    FLUSH_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn time_enabled() -> bool {
    ensure_init();
    TIME_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn log_level() -> LogLevel {
    ensure_init();
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Set log level programmatically
pub fn set_log_level(level: LogLevel) {
    ensure_init();
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Set flush mode programmatically
pub fn set_flush_enabled(enabled: bool) {
    ensure_init();
    FLUSH_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Enable or disable the elapsed-seconds prefix
pub fn set_time_enabled(enabled: bool) {
    ensure_init();
    TIME_ENABLED.store(enabled, Ordering::Relaxed);
}

#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    level != LogLevel::Off && level as u8 <= log_level() as u8
}

fn write_time_prefix(handle: &mut impl Write) {
    if time_enabled() {
        let secs = START.get_or_init(Instant::now).elapsed().as_secs_f64();
        let _ = write!(handle, "[{:>12.6}] ", secs);
    }
}

#[doc(hidden)]
pub fn _bgprintln_impl(args: std::fmt::Arguments<'_>) {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    write_time_prefix(&mut handle);
    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");
    if flush_enabled() {
        let _ = handle.flush();
    }
}

#[doc(hidden)]
pub fn _bglog_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    write_time_prefix(&mut handle);
    let _ = write!(handle, "{} ", level.prefix());
    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");
    if flush_enabled() {
        let _ = handle.flush();
    }
}

// ============================================================================
// Public Macros
// ============================================================================

/// Print a line to stderr, regardless of level
#[macro_export]
macro_rules! bgprintln {
    () => {{
        $crate::bgprint::_bgprintln_impl(format_args!(""));
    }};
    ($($arg:tt)*) => {{
        $crate::bgprint::_bgprintln_impl(format_args!($($arg)*));
    }};
}

/// Error level log
#[macro_export]
macro_rules! bg_error {
    ($($arg:tt)*) => {{
        $crate::bgprint::_bglog_impl($crate::bgprint::LogLevel::Error, format_args!($($arg)*));
    }};
}

/// Warning level log
#[macro_export]
macro_rules! bg_warn {
    ($($arg:tt)*) => {{
        $crate::bgprint::_bglog_impl($crate::bgprint::LogLevel::Warn, format_args!($($arg)*));
    }};
}

/// Info level log
#[macro_export]
macro_rules! bg_info {
    ($($arg:tt)*) => {{
        $crate::bgprint::_bglog_impl($crate::bgprint::LogLevel::Info, format_args!($($arg)*));
    }};
}

/// Debug level log
#[macro_export]
macro_rules! bg_debug {
    ($($arg:tt)*) => {{
        $crate::bgprint::_bglog_impl($crate::bgprint::LogLevel::Debug, format_args!($($arg)*));
    }};
}

/// Trace level log
#[macro_export]
macro_rules! bg_trace {
    ($($arg:tt)*) => {{
        $crate::bgprint::_bglog_impl($crate::bgprint::LogLevel::Trace, format_args!($($arg)*));
    }};
}
