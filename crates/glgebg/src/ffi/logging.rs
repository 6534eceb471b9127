//! `logger_*`
//!
//! A custom print function receives each line as a `String*` it may read or
//! modify but must not destroy.

use std::ffi::c_char;

use glgebg_core::logger::default_print;
use glgebg_core::{BgString, Logger};
use glgebg_runtime::config;

use super::{cstr_bytes, destroy, handle_mut, handle_ref, into_handle};

/// C print callback
pub type LogPrintFn = unsafe extern "C" fn(*mut BgString);

/// Print `str` and a newline to stdout, then flush
///
/// # Safety
///
/// `str` must be null or a live string.
#[no_mangle]
pub unsafe extern "C" fn logger_defaultPrint(str: *mut BgString) {
    if let Some(s) = handle_mut(str, "logger_defaultPrint") {
        default_print(s);
    }
}

/// Logger in the configured mode with the default print function
#[no_mangle]
pub extern "C" fn logger_Create() -> *mut Logger {
    into_handle(Logger::with_auto_print(config::global().logger_auto_print))
}

#[no_mangle]
pub extern "C" fn logger_CreateAutoPrint(auto_print: bool) -> *mut Logger {
    into_handle(Logger::with_auto_print(auto_print))
}

/// Logger that prints through `func`; null `func` means the default printer
///
/// # Safety
///
/// `func` must be callable from any thread that logs or flushes.
#[no_mangle]
pub unsafe extern "C" fn logger_CreateAndOverload(auto_print: bool, func: Option<LogPrintFn>) -> *mut Logger {
    let logger = match func {
        Some(func) => Logger::with_sink(
            auto_print,
            // Safety: upheld by the caller of logger_CreateAndOverload
            Box::new(move |line: &mut BgString| unsafe { func(line) }),
        ),
        None => Logger::with_auto_print(auto_print),
    };
    into_handle(logger)
}

/// Free the logger; messages still queued are dropped unprinted
///
/// # Safety
///
/// `logger` must be null or come from a `logger_Create*` function, and must
/// not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn logger_Destroy(logger: *mut Logger) {
    destroy(logger);
}

/// # Safety
///
/// `logger` must be null or a live logger; `cstr` null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn logger_log(cstr: *const c_char, logger: *mut Logger) {
    let Some(bytes) = cstr_bytes(cstr, "logger_log") else {
        return;
    };
    if let Some(l) = handle_ref(logger, "logger_log") {
        l.log_bytes(bytes);
    }
}

/// # Safety
///
/// `logger` must be null or a live logger; `str` null or a live string.
#[no_mangle]
pub unsafe extern "C" fn logger_logString(str: *const BgString, logger: *mut Logger) {
    let Some(s) = handle_ref(str, "logger_logString") else {
        return;
    };
    if let Some(l) = handle_ref(logger, "logger_logString") {
        l.log_string(s);
    }
}

/// Print and drop every queued message
///
/// # Safety
///
/// `logger` must be null or a live logger.
#[no_mangle]
pub unsafe extern "C" fn logger_printAll(logger: *mut Logger) {
    if let Some(l) = handle_ref(logger, "logger_printAll") {
        l.print_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static SEEN: Mutex<Vec<String>> = Mutex::new(Vec::new());

    unsafe extern "C" fn tag_and_keep(str: *mut BgString) {
        string_prefix(&mut *str);
        SEEN.lock().unwrap().push((*str).to_string());
    }

    fn string_prefix(s: &mut BgString) {
        s.insert_bytes(0, b"[INFO] ").unwrap();
    }

    #[test]
    fn test_overloaded_queue() {
        unsafe {
            let logger = logger_CreateAndOverload(false, Some(tag_and_keep));
            logger_log(c"first".as_ptr(), logger);

            let s = BgString::from("second");
            logger_logString(&s, logger);
            logger_log(std::ptr::null(), logger);

            assert!(SEEN.lock().unwrap().is_empty());
            logger_printAll(logger);
            logger_Destroy(logger);
        }
        assert_eq!(*SEEN.lock().unwrap(), vec!["[INFO] first", "[INFO] second"]);
    }

    #[test]
    fn test_default_constructors() {
        unsafe {
            let a = logger_Create();
            let b = logger_CreateAutoPrint(true);
            let c = logger_CreateAndOverload(false, None);
            assert!(!(*a).auto_print());
            assert!((*b).auto_print());
            assert!(!(*c).auto_print());

            logger_printAll(a);
            logger_Destroy(a);
            logger_Destroy(b);
            logger_Destroy(c);
            logger_printAll(std::ptr::null_mut());
        }
    }
}
