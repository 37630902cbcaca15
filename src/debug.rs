//! Debugging and logging infrastructure.
//!
//! All output goes to `/tmp/geolens_debug.log` on Unix/macOS, or
//! `%TEMP%\geolens_debug.log` on Windows, keeping stdout clean for the
//! one-shot CLI path.
//!
//! Two producers feed the file:
//!
//! - the `debug_*!` macros, gated by the `DEBUG_LEVEL` environment variable
//!   (0 or unset: off, 1: errors, 2: info, 3: debug, 4: trace);
//! - the `log` facade, routed here by [`init_log_bridge`]. When `RUST_LOG`
//!   is set, `log` records are also mirrored to stderr.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn from_env() -> Self {
        match std::env::var("DEBUG_LEVEL") {
            Ok(val) => match val.trim().parse::<u8>() {
                Ok(0) => DebugLevel::Off,
                Ok(1) => DebugLevel::Error,
                Ok(2) => DebugLevel::Info,
                Ok(3) => DebugLevel::Debug,
                Ok(4) => DebugLevel::Trace,
                _ => DebugLevel::Off,
            },
            Err(_) => DebugLevel::Off,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DebugLevel::Error => "ERROR",
            DebugLevel::Info => "INFO ",
            DebugLevel::Debug => "DEBUG",
            DebugLevel::Trace => "TRACE",
            DebugLevel::Off => "     ",
        }
    }
}

/// Global debug logger
struct DebugLogger {
    level: DebugLevel,
    file: Option<std::fs::File>,
}

impl DebugLogger {
    fn new() -> Self {
        let level = DebugLevel::from_env();

        #[cfg(unix)]
        let log_path = std::path::PathBuf::from("/tmp/geolens_debug.log");
        #[cfg(windows)]
        let log_path = std::env::temp_dir().join("geolens_debug.log");

        // Silently run file-less if the log file can't be opened; debug
        // output must never break the application.
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&log_path)
            .ok();

        let mut logger = DebugLogger { level, file };
        logger.write_raw(&format!(
            "{}\ngeolens session started at {} (DEBUG_LEVEL={:?})\n{}\n",
            "=".repeat(80),
            get_timestamp(),
            level,
            "=".repeat(80)
        ));
        logger
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn log(&mut self, level: DebugLevel, category: &str, msg: &str) {
        if level <= self.level {
            self.write_line(level, category, msg);
        }
    }

    fn write_line(&mut self, level: DebugLevel, category: &str, msg: &str) {
        self.write_raw(&format!(
            "[{}] [{}] [{}] {}\n",
            get_timestamp(),
            level.label(),
            category,
            msg
        ));
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

fn get_logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::new()))
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Check if debugging is enabled at given level
pub fn is_enabled(level: DebugLevel) -> bool {
    let logger = get_logger().lock();
    level <= logger.level
}

/// Log a message at specified level
pub fn log(level: DebugLevel, category: &str, msg: &str) {
    let mut logger = get_logger().lock();
    logger.log(level, category, msg);
}

/// Log formatted message
pub fn logf(level: DebugLevel, category: &str, args: fmt::Arguments) {
    if is_enabled(level) {
        log(level, category, &format!("{}", args));
    }
}

// Convenience macros for logging
#[macro_export]
macro_rules! debug_error {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Error, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Info, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Debug, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Trace, $category, format_args!($($arg)*))
    };
}

/// Bridge routing `log` facade records into the debug log file.
struct LogBridge {
    mirror_stderr: bool,
}

impl LogBridge {
    fn debug_level(level: log::Level) -> DebugLevel {
        match level {
            log::Level::Error => DebugLevel::Error,
            log::Level::Warn | log::Level::Info => DebugLevel::Info,
            log::Level::Debug => DebugLevel::Debug,
            log::Level::Trace => DebugLevel::Trace,
        }
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = format!("{}", record.args());
        // Bridge records bypass the DEBUG_LEVEL gate: `log::max_level()`
        // already filtered them.
        let mut logger = get_logger().lock();
        logger.write_line(Self::debug_level(record.level()), record.target(), &msg);
        drop(logger);

        if self.mirror_stderr {
            eprintln!("[{}] [{}] {}", record.level(), record.target(), msg);
        }
    }

    fn flush(&self) {}
}

/// Install the `log` → debug-file bridge.
///
/// Level precedence: the CLI `--log-level` flag, then `RUST_LOG`, then
/// `Info`. Mirrors to stderr only when `RUST_LOG` is set, so the GUI path
/// stays quiet by default.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let level = cli_level
        .or_else(|| rust_log.as_deref().and_then(|v| v.parse().ok()))
        .unwrap_or(log::LevelFilter::Info);

    let bridge = LogBridge {
        mirror_stderr: rust_log.is_some(),
    };
    if log::set_boxed_logger(Box::new(bridge)).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(DebugLevel::Error < DebugLevel::Info);
        assert!(DebugLevel::Info < DebugLevel::Debug);
        assert!(DebugLevel::Debug < DebugLevel::Trace);
        assert!(DebugLevel::Off < DebugLevel::Error);
    }

    #[test]
    fn test_bridge_level_mapping() {
        assert_eq!(
            LogBridge::debug_level(log::Level::Error),
            DebugLevel::Error
        );
        assert_eq!(LogBridge::debug_level(log::Level::Warn), DebugLevel::Info);
        assert_eq!(LogBridge::debug_level(log::Level::Info), DebugLevel::Info);
        assert_eq!(
            LogBridge::debug_level(log::Level::Debug),
            DebugLevel::Debug
        );
        assert_eq!(
            LogBridge::debug_level(log::Level::Trace),
            DebugLevel::Trace
        );
    }
}
