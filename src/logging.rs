//! `log` backend writing to logcat on Android. Elsewhere records are
//! dropped.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct Logcat;

static LOGGER: Logcat = Logcat;

impl Log for Logcat {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            logcat(record.level(), &record.args().to_string());
        }
    }

    fn flush(&self) {}
}

/// Installs the logger once; later calls are no-ops.
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        let level = if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        log::set_max_level(level);
    }
}

#[cfg(target_os = "android")]
fn logcat(level: Level, msg: &str) {
    use android_log_sys::LogPriority;
    use std::ffi::CString;

    let priority = match level {
        Level::Error => LogPriority::ERROR,
        Level::Warn => LogPriority::WARN,
        Level::Info => LogPriority::INFO,
        Level::Debug => LogPriority::DEBUG,
        Level::Trace => LogPriority::VERBOSE,
    };
    let tag = b"calculator-core\0";
    let Ok(c_msg) = CString::new(msg.replace('\0', " ")) else {
        return;
    };
    unsafe {
        android_log_sys::__android_log_write(
            priority as _,
            tag.as_ptr() as *const _,
            c_msg.as_ptr(),
        );
    }
}

#[cfg(not(target_os = "android"))]
fn logcat(_level: Level, _msg: &str) {}
