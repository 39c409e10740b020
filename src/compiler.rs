//! Compiler seam over the stylesheet engine.
//!
//! [`CompileStage`](crate::stage::CompileStage) never talks to an engine
//! directly; it goes through the [`Compiler`] trait so hosts and tests can
//! substitute their own engine. [`LightningCompiler`] is the bundled
//! adapter, wrapping lightningcss (parse + re-print, optional minify).

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error from a compilation attempt.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Source file could not be read
    #[error("failed to read {}: {}", .path.display(), .source)]
    Read {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// Engine rejected the stylesheet
    #[error("{0}")]
    Engine(String),
}

// lightningcss errors borrow the source text; convert to an owned message at
// the boundary.
impl<T: fmt::Display> From<lightningcss::error::Error<T>> for CompileError {
    fn from(e: lightningcss::error::Error<T>) -> Self {
        CompileError::Engine(e.to_string())
    }
}

/// Adapter contract consumed by the compile stage.
///
/// Both operations map stylesheet input to compiled text or fail; the stage
/// does not inspect failures beyond the [`CompileError`] variant.
pub trait Compiler {
    /// Compile a stylesheet from a source file on disk.
    fn compile_file(&self, path: &Path) -> Result<String, CompileError>;

    /// Compile raw stylesheet text.
    fn compile_str(&self, raw: &str) -> Result<String, CompileError>;
}

/// Stylesheet compiler backed by lightningcss.
#[derive(Debug, Clone, Default)]
pub struct LightningCompiler {
    minify: bool,
}

impl LightningCompiler {
    /// Create a compiler that re-prints stylesheets in expanded form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether output is minified.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }
}

impl Compiler for LightningCompiler {
    fn compile_file(&self, path: &Path) -> Result<String, CompileError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CompileError::Read { path: path.to_path_buf(), source })?;
        self.compile_str(&raw)
    }

    fn compile_str(&self, raw: &str) -> Result<String, CompileError> {
        let sheet = StyleSheet::parse(raw, ParserOptions::default())?;
        let output = sheet.to_css(PrinterOptions { minify: self.minify, ..Default::default() })?;
        Ok(output.code)
    }
}
