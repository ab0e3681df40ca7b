//! Structured diagnostic logging for skipscore.
//!
//! Entries are recorded into an in-memory [`LogCollector`] rather than written
//! to a global sink, so a data structure can carry its own diagnostics and the
//! caller decides when (and whether) to drain and render them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Log level for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl LogLevel {
    fn rank(self) -> u8 {
        match self {
            LogLevel::Error => 0,
            LogLevel::Warn => 1,
            LogLevel::Info => 2,
            LogLevel::Debug => 3,
            LogLevel::Trace => 4,
        }
    }

    /// Check if this level should log messages at the given level
    pub fn should_log(&self, level: LogLevel) -> bool {
        self.rank() >= level.rank()
    }

    /// Upper-case label used by the plain and compact formats.
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Plain,
    Json,
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Plain
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level to output
    #[serde(default)]
    pub level: LogLevel,
    /// Output format
    #[serde(default)]
    pub format: LogFormat,
    /// Component-specific log levels
    #[serde(default)]
    pub component_levels: HashMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Plain,
            component_levels: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Create a new logging config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set a component-specific log level
    pub fn with_component_level(mut self, component: impl Into<String>, level: LogLevel) -> Self {
        self.component_levels.insert(component.into(), level);
        self
    }

    /// Get the effective log level for a component
    pub fn effective_level(&self, component: Option<&str>) -> LogLevel {
        component
            .and_then(|comp| self.component_levels.get(comp).copied())
            .unwrap_or(self.level)
    }

    /// Check if a message at the given level should be logged
    pub fn should_log(&self, level: LogLevel, component: Option<&str>) -> bool {
        self.effective_level(component).should_log(level)
    }
}

/// A log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub component: Option<String>,
    pub message: String,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level,
            component: None,
            message: message.into(),
        }
    }

    /// Create a log entry with a component
    pub fn with_component(
        level: LogLevel,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            component: Some(component.into()),
            ..Self::new(level, message)
        }
    }

    /// Render the entry as a single line in the given format.
    pub fn render(&self, format: LogFormat) -> String {
        match format {
            LogFormat::Plain => match &self.component {
                Some(component) => format!(
                    "{} {:<5} [{}] {}",
                    self.timestamp, self.level, component, self.message
                ),
                None => format!("{} {:<5} {}", self.timestamp, self.level, self.message),
            },
            LogFormat::Compact => match &self.component {
                Some(component) => format!("{} {}: {}", self.level, component, self.message),
                None => format!("{} {}", self.level, self.message),
            },
            // A struct of plain strings always serializes.
            LogFormat::Json => serde_json::to_string(self).unwrap_or_default(),
        }
    }
}

/// Log collector for capturing log entries
#[derive(Debug, Default)]
pub struct LogCollector {
    entries: Vec<LogEntry>,
}

impl LogCollector {
    /// Create a new log collector
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Add a log entry
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Get all collected entries
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Get entries matching a level
    pub fn filter_by_level(&self, level: LogLevel) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.level == level).collect()
    }

    /// Remove and return every collected entry.
    pub fn drain(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A collector bound to one component and filtered by a [`LoggingConfig`].
#[derive(Debug)]
pub struct Logger {
    config: LoggingConfig,
    component: String,
    collector: LogCollector,
}

impl Logger {
    pub fn new(config: LoggingConfig, component: impl Into<String>) -> Self {
        Self {
            config,
            component: component.into(),
            collector: LogCollector::new(),
        }
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    /// Whether a message at `level` would be kept.
    ///
    /// Callers check this before formatting expensive messages.
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.config.should_log(level, Some(&self.component))
    }

    /// Record a message if the level passes the filter.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.enabled(level) {
            self.collector
                .push(LogEntry::with_component(level, self.component.clone(), message));
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        self.collector.entries()
    }

    pub fn drain(&mut self) -> Vec<LogEntry> {
        self.collector.drain()
    }

    /// Render every collected entry in the configured format, one per line.
    pub fn render(&self) -> String {
        self.collector
            .entries()
            .iter()
            .map(|e| e.render(self.config.format))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
