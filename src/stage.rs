//! The stylesheet compile stage.
//!
//! A [`CompileStage`] either compiles a static source-to-destination map
//! (pipeline head) or the in-memory units received from an upstream stage
//! (pipeline link), never both in one run. Units are processed sequentially
//! in map order; the first failing unit aborts the run. Output already
//! written for earlier units stays on disk.

use crate::compiler::{CompileError, Compiler};
use crate::progress::{NullLog, ProgressLog};
use crate::result::RunResult;
use crate::sink::{DiskSink, Sink};
use crate::state::{StagePayload, StageUnit};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Message reported when every unit was processed.
pub const SUCCESS_MESSAGE: &str = "All files have been compiled.";

/// Error that aborts a stage run.
///
/// The `Display` output of the first error encountered becomes the
/// [`RunResult`] failure message.
// Display and Error are implemented by hand instead of via `#[derive(Error)]`
// because thiserror treats any field named `source` as the error's cause,
// which does not compile for the `String` source identifiers below.
#[derive(Debug)]
#[non_exhaustive]
pub enum StageError {
    /// Neither a destinations map nor inbound state was supplied
    MissingDestinationsMap,
    /// A static-map source path could not be read
    SourceNotFound(PathBuf),
    /// The engine rejected a unit's input
    Compile {
        /// Source identifier of the failing unit
        source: String,
        /// Engine error message
        message: String,
    },
    /// A unit's destination could not be written
    Write {
        /// Source identifier of the failing unit
        source: String,
    },
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDestinationsMap => {
                write!(f, "Impossible to run without a destinations map.")
            }
            Self::SourceNotFound(path) => {
                write!(f, "Impossible to find source file {}", path.display())
            }
            Self::Compile { source, message } => {
                write!(f, "Failed to compile source file {source}: {message}")
            }
            Self::Write { source } => write!(
                f,
                "An error occurred while writing the destination file for source file {source}"
            ),
        }
    }
}

impl std::error::Error for StageError {}

/// Input selected for one run, decided exactly once.
enum RunInput<'a> {
    /// Compile files listed in the static destinations map
    StaticSources(&'a [(PathBuf, PathBuf)]),
    /// Compile in-memory units received from the upstream stage
    UpstreamUnits(StagePayload),
}

/// Pipeline stage that compiles stylesheet sources to target stylesheets.
pub struct CompileStage {
    /// Static source -> destination pairs, in processing order
    destinations_map: Vec<(PathBuf, PathBuf)>,
    /// Injected engine adapter
    compiler: Box<dyn Compiler>,
    /// Destination writer
    sink: Box<dyn Sink>,
    /// Per-unit progress lines
    progress: Arc<dyn ProgressLog>,
    /// Whether compiled output is written to disk
    write_to_disk: bool,
    /// State received from the previous stage, consumed by the next run
    inbound: Option<StagePayload>,
}

impl CompileStage {
    /// Create a stage with an injected compiler, an empty destinations map,
    /// disk writing enabled, and no progress output.
    pub fn new(compiler: Box<dyn Compiler>) -> Self {
        Self {
            destinations_map: Vec::new(),
            compiler,
            sink: Box::new(DiskSink::new()),
            progress: Arc::new(NullLog::new()),
            write_to_disk: true,
            inbound: None,
        }
    }

    /// Set the destinations map (builder form).
    pub fn with_destinations_map(mut self, map: Vec<(PathBuf, PathBuf)>) -> Self {
        self.destinations_map = map;
        self
    }

    /// Set the destinations map.
    pub fn set_destinations_map(&mut self, map: Vec<(PathBuf, PathBuf)>) -> &mut Self {
        self.destinations_map = map;
        self
    }

    /// Replace the destination sink.
    pub fn with_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the progress reporter.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressLog>) -> Self {
        self.progress = progress;
        self
    }

    /// Store state from the previous stage for the next run.
    ///
    /// The stored payload is consumed when that run starts; calling this
    /// after a run has already consumed it only affects later runs.
    pub fn receive_state(&mut self, payload: StagePayload) {
        self.inbound = Some(payload);
    }

    /// Skip writing destinations to disk on the next runs.
    ///
    /// Units are still compiled, logged, and placed in the outbound payload.
    pub fn disable_write_file(&mut self) {
        self.write_to_disk = false;
    }

    /// Run the stage over the selected input.
    ///
    /// A non-empty inbound payload takes precedence over the static map for
    /// the whole run. With neither present, the run fails before touching
    /// any unit.
    pub fn run(&mut self) -> RunResult {
        let input = match self.inbound.take() {
            Some(payload) if !payload.is_empty() => RunInput::UpstreamUnits(payload),
            _ => {
                if self.destinations_map.is_empty() {
                    return RunResult::error(
                        StageError::MissingDestinationsMap.to_string(),
                        StagePayload::new(),
                    );
                }
                RunInput::StaticSources(&self.destinations_map)
            }
        };

        let mut outbound = StagePayload::new();
        let outcome = match input {
            RunInput::StaticSources(map) => self.process_destinations_map(map, &mut outbound),
            RunInput::UpstreamUnits(units) => self.process_upstream_units(units, &mut outbound),
        };

        match outcome {
            Ok(()) => RunResult::success(SUCCESS_MESSAGE, outbound),
            Err(e) => RunResult::error(e.to_string(), outbound),
        }
    }

    /// Compile every static-map entry, failing fast on the first error.
    fn process_destinations_map(
        &self,
        map: &[(PathBuf, PathBuf)],
        outbound: &mut StagePayload,
    ) -> Result<(), StageError> {
        for (source, destination) in map {
            let compiled = self.compiler.compile_file(source).map_err(|e| match e {
                CompileError::Read { .. } => StageError::SourceNotFound(source.clone()),
                CompileError::Engine(message) => {
                    StageError::Compile { source: source.display().to_string(), message }
                }
            })?;
            self.finish_unit(&source.display().to_string(), destination, compiled, outbound)?;
        }
        Ok(())
    }

    /// Compile every upstream unit, failing fast on the first error.
    fn process_upstream_units(
        &self,
        units: StagePayload,
        outbound: &mut StagePayload,
    ) -> Result<(), StageError> {
        for (source, unit) in units {
            let compiled = self.compiler.compile_str(&unit.content).map_err(|e| {
                StageError::Compile { source: source.clone(), message: e.to_string() }
            })?;
            self.finish_unit(&source, &unit.destination, compiled, outbound)?;
        }
        Ok(())
    }

    /// Write (unless disabled), log, and record a compiled unit.
    fn finish_unit(
        &self,
        source: &str,
        destination: &Path,
        compiled: String,
        outbound: &mut StagePayload,
    ) -> Result<(), StageError> {
        if self.write_to_disk {
            self.sink
                .write(destination, &compiled)
                .map_err(|_| StageError::Write { source: source.to_string() })?;
            self.progress.log(&format!("Compiled {} to {}", source, destination.display()));
        } else {
            self.progress.log(&format!("Compiled {}", source));
        }
        outbound.insert(source, StageUnit::new(compiled, destination));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::MemoryLog;
    use std::io;

    /// Engine stand-in that uppercases its input.
    struct UppercaseCompiler;

    impl Compiler for UppercaseCompiler {
        fn compile_file(&self, path: &Path) -> Result<String, CompileError> {
            let raw = std::fs::read_to_string(path)
                .map_err(|source| CompileError::Read { path: path.to_path_buf(), source })?;
            self.compile_str(&raw)
        }

        fn compile_str(&self, raw: &str) -> Result<String, CompileError> {
            Ok(raw.to_uppercase())
        }
    }

    /// Sink that never writes.
    struct FailingSink;

    impl Sink for FailingSink {
        fn write(&self, _destination: &Path, _content: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn payload_of(entries: &[(&str, &str, &str)]) -> StagePayload {
        entries
            .iter()
            .map(|(k, content, dest)| (k.to_string(), StageUnit::new(*content, *dest)))
            .collect()
    }

    #[test]
    fn test_run_without_map_or_state_fails() {
        let mut stage = CompileStage::new(Box::new(UppercaseCompiler));
        let result = stage.run();

        assert!(!result.is_success());
        assert_eq!(result.message, "Impossible to run without a destinations map.");
        assert!(result.data.is_empty());
    }

    #[test]
    fn test_empty_inbound_state_falls_back_to_map_check() {
        let mut stage = CompileStage::new(Box::new(UppercaseCompiler));
        stage.receive_state(StagePayload::new());
        let result = stage.run();

        assert!(!result.is_success());
        assert_eq!(result.message, "Impossible to run without a destinations map.");
    }

    #[test]
    fn test_inbound_state_takes_precedence_over_map() {
        let mut stage = CompileStage::new(Box::new(UppercaseCompiler))
            .with_destinations_map(vec![("missing.scss".into(), "missing.css".into())]);
        stage.disable_write_file();
        stage.receive_state(payload_of(&[("mem.scss", "body {}", "mem.css")]));

        let result = stage.run();

        assert!(result.is_success());
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data.get("mem.scss").unwrap().content, "BODY {}");
    }

    #[test]
    fn test_inbound_state_is_consumed_by_one_run() {
        let mut stage = CompileStage::new(Box::new(UppercaseCompiler));
        stage.disable_write_file();
        stage.receive_state(payload_of(&[("mem.scss", "a", "mem.css")]));

        assert!(stage.run().is_success());

        // Second run has no state left and no map.
        let second = stage.run();
        assert!(!second.is_success());
        assert_eq!(second.message, "Impossible to run without a destinations map.");
    }

    #[test]
    fn test_write_disabled_logs_without_destination() {
        let log = Arc::new(MemoryLog::new());
        let mut stage = CompileStage::new(Box::new(UppercaseCompiler))
            .with_progress(log.clone() as Arc<dyn ProgressLog>);
        stage.disable_write_file();
        stage.receive_state(payload_of(&[("mem.scss", "a", "out/mem.css")]));

        let result = stage.run();

        assert!(result.is_success());
        assert_eq!(result.message, SUCCESS_MESSAGE);
        assert_eq!(log.lines(), vec!["Compiled mem.scss".to_string()]);
        let unit = result.data.get("mem.scss").unwrap();
        assert_eq!(unit.content, "A");
        assert_eq!(unit.destination, PathBuf::from("out/mem.css"));
    }

    #[test]
    fn test_sink_failure_aborts_with_write_error() {
        let mut stage =
            CompileStage::new(Box::new(UppercaseCompiler)).with_sink(Box::new(FailingSink));
        stage.receive_state(payload_of(&[("mem.scss", "a", "mem.css")]));

        let result = stage.run();

        assert!(!result.is_success());
        assert_eq!(
            result.message,
            "An error occurred while writing the destination file for source file mem.scss"
        );
        assert!(result.data.is_empty());
    }

    #[test]
    fn test_compile_failure_names_the_source() {
        struct RejectingCompiler;

        impl Compiler for RejectingCompiler {
            fn compile_file(&self, path: &Path) -> Result<String, CompileError> {
                Err(CompileError::Read {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::NotFound, "not found"),
                })
            }

            fn compile_str(&self, _raw: &str) -> Result<String, CompileError> {
                Err(CompileError::Engine("unexpected token".to_string()))
            }
        }

        let mut stage = CompileStage::new(Box::new(RejectingCompiler));
        stage.receive_state(payload_of(&[("bad.scss", "?", "bad.css")]));

        let result = stage.run();
        assert!(!result.is_success());
        assert_eq!(result.message, "Failed to compile source file bad.scss: unexpected token");
    }
}
