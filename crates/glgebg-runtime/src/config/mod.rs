//! GLGEBg configuration
//!
//! Compile-time defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Environment variables (runtime)
//! 2. The file named by `GLGE_CONFIG_RS` (compile-time, merged by build.rs)
//! 3. Library defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use glgebg_runtime::config::BgConfig;
//!
//! let config = BgConfig::from_env()
//!     .min_elements(16)
//!     .logger_auto_print(true);
//! glgebg_runtime::config::init(config)?;
//! ```

pub mod defaults;

use std::path::PathBuf;
use std::sync::OnceLock;

use glgebg_core::bgprint::{self, LogLevel};
use glgebg_core::env::{env_flag, env_get, env_get_opt};
use glgebg_core::{bg_warn, bgprintln, BgError, BgResult, GrowthPolicy};

/// Library configuration with builder pattern.
///
/// Use `from_env()` to start with compile-time defaults and apply
/// any environment variable overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct BgConfig {
    /// Initial element capacity of a new vector
    pub min_elements: usize,
    /// Cap, in elements, on one front-insertion growth step
    pub front_max_growth: usize,
    /// Diagnostic level for the bgprint macros
    pub log_level: LogLevel,
    /// Flush stderr after every diagnostic line
    pub flush_eprint: bool,
    /// Prefix diagnostics with elapsed seconds
    pub log_time: bool,
    /// Whether loggers created without an explicit mode print immediately
    pub logger_auto_print: bool,
    /// Where the proc filesystem is mounted
    pub proc_root: PathBuf,
}

impl Default for BgConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl BgConfig {
    /// Create config from compile-time defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `GLGE_VECTOR_MIN_ELEMENTS` - Initial vector capacity in elements
    /// - `GLGE_VECTOR_FRONT_MAX_GROWTH` - Front growth cap in elements
    /// - `GLGE_LOG_LEVEL` - off, error, warn, info, debug, trace (or 0-5)
    /// - `GLGE_FLUSH_EPRINT` - Flush diagnostics (0/1)
    /// - `GLGE_LOG_TIME` - Timestamp diagnostics (0/1)
    /// - `GLGE_LOGGER_AUTO_PRINT` - Default logger mode (0/1)
    /// - `GLGE_PROC_ROOT` - proc filesystem mount point
    pub fn from_env() -> Self {
        let base = Self::new();
        Self {
            min_elements: env_get("GLGE_VECTOR_MIN_ELEMENTS", base.min_elements),
            front_max_growth: env_get("GLGE_VECTOR_FRONT_MAX_GROWTH", base.front_max_growth),
            log_level: env_get_opt::<String>("GLGE_LOG_LEVEL")
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(base.log_level),
            flush_eprint: env_flag("GLGE_FLUSH_EPRINT").unwrap_or(base.flush_eprint),
            log_time: env_flag("GLGE_LOG_TIME").unwrap_or(base.log_time),
            logger_auto_print: env_flag("GLGE_LOGGER_AUTO_PRINT").unwrap_or(base.logger_auto_print),
            proc_root: env_get_opt::<PathBuf>("GLGE_PROC_ROOT").unwrap_or(base.proc_root),
        }
    }

    /// Create config with compile-time defaults only (no env override).
    pub fn new() -> Self {
        Self {
            min_elements: defaults::VECTOR_MIN_ELEMENTS,
            front_max_growth: defaults::VECTOR_FRONT_MAX_GROWTH,
            log_level: LogLevel::from_u8(defaults::LOG_LEVEL),
            flush_eprint: defaults::FLUSH_EPRINT,
            log_time: false,
            logger_auto_print: defaults::LOGGER_AUTO_PRINT,
            proc_root: PathBuf::from(defaults::PROC_ROOT),
        }
    }

    // Builder methods

    pub fn min_elements(mut self, n: usize) -> Self {
        self.min_elements = n;
        self
    }

    pub fn front_max_growth(mut self, n: usize) -> Self {
        self.front_max_growth = n;
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn flush_eprint(mut self, enable: bool) -> Self {
        self.flush_eprint = enable;
        self
    }

    pub fn log_time(mut self, enable: bool) -> Self {
        self.log_time = enable;
        self
    }

    pub fn logger_auto_print(mut self, enable: bool) -> Self {
        self.logger_auto_print = enable;
        self
    }

    pub fn proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self
    }

    /// Growth factors for new vectors
    pub fn growth_policy(&self) -> GrowthPolicy {
        GrowthPolicy::new(self.min_elements, self.front_max_growth)
    }

    /// Validate configuration and return errors if invalid.
    pub fn validate(&self) -> BgResult<()> {
        if self.min_elements == 0 {
            return Err(BgError::InvalidConfig("min_elements must be > 0"));
        }
        if self.min_elements > defaults::MAX_GROWTH_ELEMENTS {
            return Err(BgError::InvalidConfig("min_elements must be <= 1048576"));
        }
        if self.front_max_growth == 0 {
            return Err(BgError::InvalidConfig("front_max_growth must be > 0"));
        }
        if self.front_max_growth > defaults::MAX_GROWTH_ELEMENTS {
            return Err(BgError::InvalidConfig("front_max_growth must be <= 1048576"));
        }
        if self.proc_root.as_os_str().is_empty() {
            return Err(BgError::InvalidConfig("proc_root must not be empty"));
        }
        Ok(())
    }

    /// Push the diagnostic settings into the bgprint globals
    pub fn apply(&self) {
        bgprint::set_log_level(self.log_level);
        bgprint::set_flush_enabled(self.flush_eprint);
        bgprint::set_time_enabled(self.log_time);
    }

    /// Print configuration (for debugging)
    pub fn print(&self) {
        bgprintln!("GLGEBg Configuration:");
        bgprintln!("  min_elements:       {}", self.min_elements);
        bgprintln!("  front_max_growth:   {}", self.front_max_growth);
        bgprintln!("  log_level:          {:?}", self.log_level);
        bgprintln!("  flush_eprint:       {}", self.flush_eprint);
        bgprintln!("  log_time:           {}", self.log_time);
        bgprintln!("  logger_auto_print:  {}", self.logger_auto_print);
        bgprintln!("  proc_root:          {}", self.proc_root.display());
    }
}

static GLOBAL: OnceLock<BgConfig> = OnceLock::new();

/// Install `config` as the process-wide configuration
///
/// Fails if the config is invalid or a configuration is already installed
/// (either by an earlier `init` or by a first call to `global`).
pub fn init(config: BgConfig) -> BgResult<()> {
    config.validate()?;
    config.apply();
    GLOBAL
        .set(config)
        .map_err(|_| BgError::InvalidConfig("configuration already initialized"))
}

/// The process-wide configuration, loaded from the environment on first use
///
/// An invalid environment falls back to the compile-time defaults.
pub fn global() -> &'static BgConfig {
    GLOBAL.get_or_init(|| {
        let config = BgConfig::from_env();
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                bg_warn!("{}; using compile-time defaults", e);
                BgConfig::new()
            }
        };
        config.apply();
        config
    })
}
