//! Destinations for rendered log lines.

use std::sync::Mutex;

use crate::logging::LogLevel;

/// Receives fully rendered log lines.
pub trait LogSink: Send + Sync {
    /// Write one rendered line.
    fn write_line(&self, level: LogLevel, line: &str);
}

/// Writes every line to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write_line(&self, _level: LogLevel, line: &str) {
        eprintln!("{}", line);
    }
}

/// Keeps lines in memory (for tests and diagnostics).
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MemorySink {
    /// All captured lines in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(|(_, l)| l.clone()).collect()
    }

    /// Captured lines at exactly `level`.
    pub fn lines_at(&self, level: LogLevel) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(LogLevel, String)>> {
        // A poisoned buffer still holds valid lines.
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, level: LogLevel, line: &str) {
        self.lock().push((level, line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_filters_by_level() {
        let sink = MemorySink::default();
        sink.write_line(LogLevel::Info, "a");
        sink.write_line(LogLevel::Error, "b");

        assert_eq!(sink.lines(), vec!["a", "b"]);
        assert_eq!(sink.lines_at(LogLevel::Error), vec!["b"]);
    }
}
