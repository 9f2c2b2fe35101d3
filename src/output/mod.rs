//! Output control module with leveled logging
//!
//! [`OutputManager`] is the single place user-visible diagnostics go through.
//! It can also record every emitted line, which the tests use to assert on
//! what a push logged.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Verbose,
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    fn label(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn emoji(self) -> &'static str {
        match self {
            LogLevel::Debug => "🐛",
            LogLevel::Verbose => "🔍",
            LogLevel::Info => "ℹ️",
            LogLevel::Success => "✅",
            LogLevel::Warning => "⚠️",
            LogLevel::Error => "❌",
        }
    }
}

type Recorded = Arc<Mutex<Vec<(LogLevel, String)>>>;

#[derive(Clone, Debug)]
pub struct OutputManager {
    pub verbose: bool,
    quiet: bool,
    start_time: Option<Instant>,
    recorded: Option<Recorded>,
}

impl OutputManager {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            quiet: false,
            start_time: Some(Instant::now()),
            recorded: None,
        }
    }

    pub fn new_quiet() -> Self {
        Self {
            verbose: false,
            quiet: true,
            start_time: Some(Instant::now()),
            recorded: None,
        }
    }

    /// Captures lines in memory instead of printing them. Debug lines are
    /// captured too.
    pub fn recording() -> Self {
        Self {
            verbose: true,
            quiet: false,
            start_time: None,
            recorded: Some(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Lines captured so far; empty unless built with [`OutputManager::recording`].
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        match &self.recorded {
            Some(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Captured messages at one level, in emission order.
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.emit(LogLevel::Debug, message);
        }
    }

    pub fn verbose(&self, message: &str) {
        if self.verbose {
            self.emit(LogLevel::Verbose, message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.emit(LogLevel::Info, message);
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.emit(LogLevel::Success, message);
        }
    }

    pub fn warning(&self, message: &str) {
        self.emit(LogLevel::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message);
    }

    // Section headers
    pub fn section(&self, title: &str) {
        if self.quiet || self.recorded.is_some() {
            return;
        }

        if self.verbose {
            let separator = "━".repeat(60);
            println!("\n{}", separator);
            println!("📋 {}", title);
            println!("{}", separator);
        } else {
            println!("\n📋 {}", title);
        }
    }

    pub fn detail(&self, detail: &str) {
        if self.verbose && self.recorded.is_none() {
            println!("      📝 {}", detail);
        }
    }

    fn emit(&self, level: LogLevel, message: &str) {
        if let Some(lines) = &self.recorded {
            if let Ok(mut lines) = lines.lock() {
                lines.push((level, message.to_string()));
            }
            return;
        }

        let timestamp = if let Some(start_time) = self.start_time {
            format!("[{:8.3}s]", start_time.elapsed().as_secs_f64())
        } else {
            String::new()
        };

        let line = if self.verbose {
            format!("{} {} {} {}", timestamp, level.emoji(), level.label(), message)
        } else {
            format!("{} {}", level.emoji(), message)
        };

        match level {
            LogLevel::Warning | LogLevel::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }

    pub fn format_duration(&self, duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs < 60 {
            format!("{:.1}s", duration.as_secs_f64())
        } else if secs < 3600 {
            format!("{}m{:02}s", secs / 60, secs % 60)
        } else {
            format!("{}h{:02}m{:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }
}
