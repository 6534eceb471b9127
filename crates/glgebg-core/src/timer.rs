//! Wall-time measurement
//!
//! `Timer` measures seconds since construction or the last restart on the
//! monotonic clock. `ScopeTimer` reports its lifetime to stdout on drop:
//!
//! ```text
//! fill took 0.001234 seconds
//! ```

use std::io::Write;
use std::time::{Duration, Instant};

/// Monotonic stopwatch
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn restart(&mut self) {
        self.start = Instant::now();
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Seconds since start, nanosecond resolution
    pub fn delta_time(&self) -> f64 {
        self.elapsed().as_nanos() as f64 / 1_000_000_000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Named timer that prints its duration when dropped
#[derive(Debug)]
pub struct ScopeTimer {
    name: String,
    timer: Timer,
}

impl ScopeTimer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timer: Timer::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// The line printed on drop, for the current elapsed time
    pub fn report(&self) -> String {
        format_report(&self.name, self.timer.delta_time())
    }
}

fn format_report(name: &str, seconds: f64) -> String {
    format!("{} took {:.6} seconds", name, seconds)
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        let line = self.report();
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_time_advances() {
        let timer = Timer::new();
        std::thread::sleep(Duration::from_millis(5));
        let dt = timer.delta_time();
        assert!(dt >= 0.005, "dt = {}", dt);
        assert!(timer.delta_time() >= dt);
    }

    #[test]
    fn test_restart_resets() {
        let mut timer = Timer::new();
        std::thread::sleep(Duration::from_millis(20));
        timer.restart();
        assert!(timer.delta_time() < 0.020);
    }

    #[test]
    fn test_report_format() {
        assert_eq!(format_report("fill", 1.5), "fill took 1.500000 seconds");
        assert_eq!(format_report("x", 0.0), "x took 0.000000 seconds");

        let scope = ScopeTimer::new("scope");
        assert!(scope.report().starts_with("scope took "));
        assert!(scope.report().ends_with(" seconds"));
        assert_eq!(scope.name(), "scope");
    }
}
