//! yamltriage core library.
//!
//! This crate exposes programmatic APIs for validating a directory of YAML
//! documents, classifying parse failures into canonical error patterns, and
//! applying conservative pattern-specific repairs.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `store`: Document discovery and text I/O.
//! - `validate`: Parse and shape checks per document.
//! - `classify`: Ordered rules mapping parser messages to error patterns.
//! - `aggregate`: Buckets of failures per pattern.
//! - `fix`: Fix registry, dispatcher, and fix functions.
//! - `pipeline`: End-to-end run.
//! - `models`: Report and log structs.
//! - `output`: Human/JSON printers and report artifacts.
//! - `utils`: Supporting helpers.
pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod config;
pub mod fix;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod store;
pub mod utils;
pub mod validate;
