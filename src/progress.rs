//! Progress reporting for stage runs.
//!
//! A stage emits one line per successfully processed unit, in processing
//! order. Hosts pick the reporter: console output for CLI runs, in-memory
//! capture for tests and embedding hosts, or nothing.

use std::sync::Mutex;

/// Receives progress lines from a running stage.
pub trait ProgressLog: Send + Sync {
    /// Record one progress line.
    fn log(&self, message: &str);
}

/// Reporter that prints each line to stdout.
#[derive(Debug, Default)]
pub struct ConsoleLog;

impl ConsoleLog {
    /// Create a new console reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ProgressLog for ConsoleLog {
    fn log(&self, message: &str) {
        println!("{}", message);
    }
}

/// Reporter that discards all lines.
#[derive(Debug, Default)]
pub struct NullLog;

impl NullLog {
    /// Create a new null reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ProgressLog for NullLog {
    fn log(&self, _message: &str) {}
}

/// Reporter that keeps lines in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    /// Create a new in-memory reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("progress log poisoned").clone()
    }
}

impl ProgressLog for MemoryLog {
    fn log(&self, message: &str) {
        self.lines.lock().expect("progress log poisoned").push(message.to_string());
    }
}
