use std::io;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Run-fatal load errors
// ---------------------------------------------------------------------------

/// Failure to obtain any rows from the input. No analysis is performed.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read input file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("input file {path} contains no records")]
    Empty { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Per-row rejections (never fatal)
// ---------------------------------------------------------------------------

/// Why a single input row was skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("line {line}: expected at least 3 fields, found {fields}")]
    Shape { line: u64, fields: usize },
    #[error("line {line}: {column} value '{value}' is not a number")]
    Parse {
        line: u64,
        column: &'static str,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse JSON configuration in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration for '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}
