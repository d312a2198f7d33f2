//! Structured logging with visual formatting.
//!
//! The daemon prints one continuous block per run: a version header, branches
//! for each soundscape change and a final marker.
//!
//! ```text
//! ┏ ambientr v0.1.0 ━━╸
//! ┃
//! ┣ Entering morning1 → evening
//! ┃   birds at 50%
//! ┃   river at 50%
//! ┣ Next change in 9h 28m
//! ╹
//! ```
//!
//! Plain messages carry a level prefix instead. Two global switches control
//! output: [`Log::set_enabled`] silences everything (tests, embedding), and
//! [`Log::set_debug_enabled`] lets `[DEBUG]` lines through for `--debug` runs.

use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Log level enumeration for categorizing message importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Log,   // Normal operational logs
    Warn,  // Warning messages (playback hiccups, ignored config)
    Err,   // Error messages (recoverable failures)
    Crit,  // Critical errors (the daemon is about to stop)
    Info,  // Informational messages (gaps in the mix table and the like)
    Debug, // Only shown with --debug
}

impl LogLevel {
    fn prefix(self) -> &'static str {
        match self {
            LogLevel::Log => "[LOG]",
            LogLevel::Warn => "[WARN]",
            LogLevel::Err => "[ERR]",
            LogLevel::Crit => "[CRIT]",
            LogLevel::Info => "[INFO]",
            LogLevel::Debug => "[DEBUG]",
        }
    }
}

/// Main logging interface providing structured output formatting.
pub struct Log;

impl Log {
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Let `[DEBUG]` messages through. Set once from the `--debug` flag.
    pub fn set_debug_enabled(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug_enabled() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Whether a message of `level` would currently be printed.
    pub fn should_print(level: LogLevel) -> bool {
        Self::is_enabled() && (level != LogLevel::Debug || Self::is_debug_enabled())
    }

    /// Format a plain message with its level prefix.
    pub fn format(level: LogLevel, message: &str) -> String {
        format!("{} {}", level.prefix(), message)
    }

    pub fn log(level: LogLevel, message: &str) {
        if Self::should_print(level) {
            println!("{}", Self::format(level, message));
        }
    }

    pub fn log_error(message: &str) {
        Self::log(LogLevel::Err, message);
    }

    pub fn log_warning(message: &str) {
        Self::log(LogLevel::Warn, message);
    }

    pub fn log_info(message: &str) {
        Self::log(LogLevel::Info, message);
    }

    pub fn log_debug(message: &str) {
        Self::log(LogLevel::Debug, message);
    }

    pub fn log_critical(message: &str) {
        Self::log(LogLevel::Crit, message);
    }

    // ═══ Block output ═══

    fn emit(lines: &[&str]) {
        if !Self::is_enabled() {
            return;
        }
        for line in lines {
            println!("{}", line);
        }
    }

    /// A branch off the main line.
    pub fn log_decorated(message: &str) {
        Self::emit(&[format!("┣ {}", message).as_str()]);
    }

    /// A detail line under the last branch.
    pub fn log_indented(message: &str) {
        Self::emit(&[format!("┃   {}", message).as_str()]);
    }

    pub fn log_pipe() {
        Self::emit(&["┃"]);
    }

    /// Start a new block, e.g. when the soundscape changes.
    pub fn log_block_start(message: &str) {
        Self::emit(&["┃", format!("┣ {}", message).as_str()]);
    }

    pub fn log_version() {
        Self::emit(&[
            format!("┏ ambientr v{} ━━╸", env!("CARGO_PKG_VERSION")).as_str(),
            "┃",
        ]);
    }

    pub fn log_end() {
        Self::emit(&["╹"]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_level_prefixes() {
        assert_eq!(Log::format(LogLevel::Warn, "river.mp3 missing"), "[WARN] river.mp3 missing");
        assert_eq!(Log::format(LogLevel::Crit, "x"), "[CRIT] x");
        assert_eq!(Log::format(LogLevel::Debug, "tick"), "[DEBUG] tick");
    }

    #[test]
    #[serial]
    fn test_debug_messages_need_debug_flag() {
        Log::set_enabled(true);
        Log::set_debug_enabled(false);
        assert!(Log::should_print(LogLevel::Info));
        assert!(!Log::should_print(LogLevel::Debug));

        Log::set_debug_enabled(true);
        assert!(Log::should_print(LogLevel::Debug));

        Log::set_debug_enabled(false);
    }

    #[test]
    #[serial]
    fn test_disabled_logging_silences_everything() {
        Log::set_enabled(false);
        Log::set_debug_enabled(true);
        assert!(!Log::should_print(LogLevel::Err));
        assert!(!Log::should_print(LogLevel::Debug));

        Log::set_enabled(true);
        Log::set_debug_enabled(false);
    }
}
