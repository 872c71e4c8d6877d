/// Severity of an activity line shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub text: String,
}

/// Operator-facing log panel contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(LogLevel::Info, text.into());
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(LogLevel::Warn, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(LogLevel::Error, text.into());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn push(&mut self, level: LogLevel, text: String) {
        self.entries.push(LogEntry { level, text });
    }
}
