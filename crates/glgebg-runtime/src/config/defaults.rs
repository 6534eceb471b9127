//! Compile-time defaults
//!
//! Values come from `glgebg_core::constants`, which `build.rs` merges from the
//! library defaults and the optional file named by `GLGE_CONFIG_RS`.

pub use glgebg_core::constants::{
    FLUSH_EPRINT, LOGGER_AUTO_PRINT, LOG_LEVEL, PROC_ROOT, VECTOR_FRONT_MAX_GROWTH,
    VECTOR_MIN_ELEMENTS,
};

/// Upper bound accepted for either growth factor
pub const MAX_GROWTH_ELEMENTS: usize = 1 << 20;
