//! Print-or-queue logger
//!
//! A `Logger` either hands every message to its sink immediately
//! (`auto_print`), or queues messages until `print_all` flushes them in
//! submission order. The queue is shared between threads through a
//! `BgMutex`; message text is packed into one `ByteBuffer` and located by a
//! `RecordBuffer` of spans, so queuing a message never allocates per line.
//!
//! The sink runs while the queue lock is held during `print_all`. A sink
//! must not log to the logger that is calling it.

use std::io::Write;

use crate::buffer::ByteBuffer;
use crate::constants;
use crate::error::BufferResult;
use crate::mutex::BgMutex;
use crate::record::RecordBuffer;
use crate::string::BgString;

/// Destination for log lines
pub type LogSink = Box<dyn Fn(&mut BgString) + Send + Sync>;

/// Print one line to stdout and flush it
///
/// Logs are flushed eagerly so nothing is lost if the process dies before
/// the next regular flush.
pub fn default_print(line: &mut BgString) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    let _ = handle.write_all(line.as_bytes());
    let _ = handle.write_all(b"\n");
    let _ = handle.flush();
}

#[derive(Debug, Clone, Copy)]
struct LogSpan {
    offset: u64,
    len: u64,
}

struct LogQueue {
    text: ByteBuffer,
    spans: RecordBuffer<LogSpan>,
}

impl LogQueue {
    fn new() -> Self {
        Self {
            text: ByteBuffer::new(1),
            spans: RecordBuffer::new(),
        }
    }

    fn push(&mut self, message: &[u8]) -> BufferResult<()> {
        let span = LogSpan {
            offset: self.text.byte_size() as u64,
            len: message.len() as u64,
        };
        self.spans.push_back(span)?;
        if let Err(e) = self.text.append(message) {
            self.spans.pop_back();
            return Err(e);
        }
        Ok(())
    }

    fn message(&self, span: LogSpan) -> &[u8] {
        let start = span.offset as usize;
        &self.text.as_bytes()[start..start + span.len as usize]
    }

    fn clear(&mut self) {
        self.text.clear();
        self.spans.clear();
    }
}

/// Thread-safe logger with a pluggable sink
pub struct Logger {
    queue: BgMutex<LogQueue>,
    auto_print: bool,
    sink: LogSink,
}

impl Logger {
    /// Logger using the configured auto-print default and `default_print`
    pub fn new() -> Self {
        Self::with_auto_print(constants::LOGGER_AUTO_PRINT)
    }

    pub fn with_auto_print(auto_print: bool) -> Self {
        Self::with_sink(auto_print, Box::new(default_print))
    }

    pub fn with_sink(auto_print: bool, sink: LogSink) -> Self {
        Self {
            queue: BgMutex::new(LogQueue::new()),
            auto_print,
            sink,
        }
    }

    pub fn auto_print(&self) -> bool {
        self.auto_print
    }

    /// Log a message; printed now or queued depending on `auto_print`
    pub fn log(&self, message: &str) {
        self.log_bytes(message.as_bytes());
    }

    pub fn log_string(&self, message: &BgString) {
        self.log_bytes(message.as_bytes());
    }

    pub fn log_bytes(&self, message: &[u8]) {
        if self.auto_print {
            let mut line = BgString::from_bytes(message);
            (self.sink)(&mut line);
            return;
        }

        let mut queue = self.queue.lock();
        if let Err(e) = queue.push(message) {
            crate::bg_error!("dropping log message of {} bytes: {}", message.len(), e);
        }
    }

    /// Number of queued messages
    pub fn pending(&self) -> usize {
        self.queue.lock().spans.len()
    }

    /// Hand every queued message to the sink in order, then release the queue
    pub fn print_all(&self) {
        let mut queue = self.queue.lock();
        if queue.spans.is_empty() {
            return;
        }
        for span in queue.spans.iter() {
            let mut line = BgString::from_bytes(queue.message(span));
            (self.sink)(&mut line);
        }
        queue.clear();
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("auto_print", &self.auto_print)
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn capture(auto_print: bool) -> (Logger, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        let logger = Logger::with_sink(
            auto_print,
            Box::new(move |line: &mut BgString| {
                sink_lines.lock().unwrap().push(line.to_string());
            }),
        );
        (logger, lines)
    }

    #[test]
    fn test_queued_until_print_all() {
        let (logger, lines) = capture(false);
        logger.log("first");
        logger.log_string(&BgString::from("second"));
        logger.log("");
        assert_eq!(logger.pending(), 3);
        assert!(lines.lock().unwrap().is_empty());

        logger.print_all();
        assert_eq!(*lines.lock().unwrap(), vec!["first", "second", ""]);
        assert_eq!(logger.pending(), 0);

        // second flush has nothing to print
        logger.print_all();
        assert_eq!(lines.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_auto_print_is_immediate() {
        let (logger, lines) = capture(true);
        logger.log("now");
        assert_eq!(*lines.lock().unwrap(), vec!["now"]);
        assert_eq!(logger.pending(), 0);
    }

    #[test]
    fn test_sink_may_edit_line() {
        let seen = Arc::new(Mutex::new(String::new()));
        let sink_seen = Arc::clone(&seen);
        let logger = Logger::with_sink(
            true,
            Box::new(move |line: &mut BgString| {
                line.insert_bytes(0, b"[INFO] ").unwrap();
                *sink_seen.lock().unwrap() = line.to_string();
            }),
        );
        logger.log("ready");
        assert_eq!(*seen.lock().unwrap(), "[INFO] ready");
    }

    #[test]
    fn test_concurrent_logging() {
        let (logger, lines) = capture(false);
        let logger = Arc::new(logger);
        let mut handles = vec![];

        for t in 0..4 {
            let logger = Arc::clone(&logger);
            handles.push(std::thread::spawn(move || {
                for i in 0..250 {
                    logger.log(&format!("t{} m{}", t, i));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(logger.pending(), 1000);
        logger.print_all();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1000);
        // per-thread order is preserved
        let t0: Vec<_> = lines.iter().filter(|l| l.starts_with("t0 ")).collect();
        assert_eq!(t0.first().map(|s| s.as_str()), Some("t0 m0"));
        assert_eq!(t0.last().map(|s| s.as_str()), Some("t0 m249"));
    }
}
