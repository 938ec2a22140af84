//! Logging utilities for the application
//!
//! Messages go to stderr; stdout is reserved for manifest records.

/// Log levels for controlling verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Normal execution, no verbose flag
    Normal = 0,
    /// Info level, one verbose flag (-v)
    Info = 1,
    /// Debug level, two verbose flags (-v -v)
    Debug = 2,
}

/// Logger for application messages
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    verbosity: u8,
}

impl Logger {
    /// Create a new logger with the specified verbosity
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }

    /// True if a message at `level` would be printed
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.verbosity >= level as u8
    }

    /// Log a message if the current verbosity level is at least the specified level
    pub fn log(&self, msg: &str, level: LogLevel) {
        if let Some(line) = format_line(msg, self.verbosity, level) {
            eprintln!("{line}");
        }
    }

    /// Log at info level (verbose >= 1)
    pub fn info(&self, msg: &str) {
        self.log(msg, LogLevel::Info);
    }

    /// Log at debug level (verbose >= 2)
    pub fn debug(&self, msg: &str) {
        self.log(msg, LogLevel::Debug);
    }
}

fn format_line(msg: &str, verbosity: u8, level: LogLevel) -> Option<String> {
    if verbosity < level as u8 {
        return None;
    }
    Some(match level {
        LogLevel::Normal => msg.to_string(),
        LogLevel::Info => format!("info: {msg}"),
        LogLevel::Debug => format!("dbg: {msg}"),
    })
}
