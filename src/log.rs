//! Diagnostic log panel state
//!
//! Append-only list of timestamped entries shown to the user. Not to be
//! confused with `tracing` output, which goes to stderr.

/// Text shown while the log holds no entries
pub const PLACEHOLDER: &str = "The diagnostic log will appear here...";

/// Entry severity. Only used for styling, never for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "OK",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    /// Local wall-clock time, `HH:MM:SS`
    pub time: String,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct DiagnosticLog {
    entries: Vec<LogEntry>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, message: impl Into<String>, level: LogLevel) {
        self.entries.push(LogEntry {
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
            level,
            message: message.into(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(message, LogLevel::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.log(message, LogLevel::Success);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.log(message, LogLevel::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(message, LogLevel::Error);
    }

    /// Back to the placeholder
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// True while nothing has been logged since the last clear
    pub fn is_placeholder(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plain-text rendering for the clipboard
    pub fn to_text(&self) -> String {
        if self.entries.is_empty() {
            return format!("{PLACEHOLDER}\n");
        }
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!(
                "[{}] {:<5} {}\n",
                entry.time,
                entry.level.tag(),
                entry.message
            ));
        }
        out
    }
}
