//! Stylepipe - stylesheet compile stage for chained build pipelines
//!
//! This library provides functionality to:
//! - Compile a static source-to-destination map of stylesheet files
//! - Consume in-memory compiled content from an upstream pipeline stage
//! - Produce a state payload consumable by a further downstream stage

pub mod cli;
pub mod compiler;
pub mod config;
pub mod progress;
pub mod result;
pub mod sink;
pub mod stage;
pub mod state;
