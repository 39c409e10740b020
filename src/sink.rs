//! Destination file materialization.

use std::fs;
use std::io;
use std::path::Path;

/// Writes compiled content to a destination path.
///
/// Implementations must surface failure through the `Result`; the stage
/// interprets any error as a write failure for the unit being processed.
pub trait Sink {
    /// Write `content` to `destination`, replacing any existing file.
    fn write(&self, destination: &Path, content: &str) -> io::Result<()>;
}

/// Sink that writes to the local filesystem.
///
/// Missing parent directories are created recursively with default
/// permissions; an existing destination file is overwritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskSink;

impl DiskSink {
    /// Create a new disk sink.
    pub fn new() -> Self {
        Self
    }
}

impl Sink for DiskSink {
    fn write(&self, destination: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(destination, content)
    }
}
