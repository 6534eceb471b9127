//! Basic GLGEBg example
//!
//! Prints a memory report, times a buffer fill while queuing log lines, then
//! flushes the log. Printing is slow, so the time-critical part only queues.
//!
//! # Environment Variables
//!
//! - `GLGE_LOG_LEVEL=debug` - Library diagnostics level (off, error, warn, info, debug, trace)
//! - `GLGE_FLUSH_EPRINT=1` - Flush diagnostics immediately
//! - `GLGE_PROC_ROOT=/host/proc` - Read memory statistics from another proc mount

use std::sync::Arc;

use glgebg::{bg_error, bg_info, sysinfo};
use glgebg::{BgResult, BgString, BgThread, Logger, RecordBuffer, ScopeTimer};

// GLGE_LOG_LEVEL=debug cargo run -p glgebg-basic
fn main() {
    if let Err(e) = glgebg::init() {
        bg_error!("{}", e);
        std::process::exit(1);
    }

    let log = Arc::new(Logger::with_sink(
        false,
        Box::new(|line: &mut BgString| println!("[INFO] {}", line)),
    ));

    println!("=====================");
    println!("RAM info:");
    println!("Total RAM size: {} bytes", sysinfo::total_memory());
    println!("Used RAM: {} bytes", sysinfo::used_memory());
    println!("Free RAM: {} bytes", sysinfo::free_memory());
    println!("Used by this process: {} bytes", sysinfo::own_memory());
    println!("=====================");

    if let Err(e) = time_critical_stuff(&log) {
        bg_error!("time critical scope failed: {}", e);
    }

    // Loggers are shared between threads; order within a thread is kept
    let worker_log = Arc::clone(&log);
    match BgThread::spawn(move || worker_log.log("Hello from a worker thread")) {
        Ok(mut worker) => {
            if let Err(e) = worker.join() {
                bg_error!("worker: {}", e);
            }
        }
        Err(e) => bg_error!("worker: {}", e),
    }
    bg_info!(
        "{} log lines queued on {} hardware threads",
        log.pending(),
        BgThread::hardware_concurrency()
    );

    log.print_all();
}

fn time_critical_stuff(log: &Logger) -> BgResult<()> {
    let _timer = ScopeTimer::new("Time Critical Scope");

    log.log("Starting time critical stuff");

    let mut values = RecordBuffer::<u16>::new();
    values.reserve(u16::MAX as usize)?;
    for i in 0..values.capacity() {
        values.push_back(i as u16)?;
    }

    log.log("Done with timing stuff");
    Ok(())
}
