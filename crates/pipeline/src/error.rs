// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

// Error types for pipeline operations
use std::path::{Path, PathBuf};

/// Coarse classification of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Filesystem, directory or session failures
    Io,
    /// Source CSV missing or unparseable
    Load,
    /// Query file missing
    NotFound,
    /// Malformed or semantically invalid SQL
    Query,
    /// Invalid pipeline configuration
    Config,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("DuckDB session error: {0}")]
    Session(#[source] duckdb::Error),

    #[error("Failed to load {path}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("Query file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Query {origin} failed: {source}")]
    Query {
        origin: String,
        #[source]
        source: duckdb::Error,
    },

    #[error("Failed to write CSV {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: arrow_schema::ArrowError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Io { .. } | PipelineError::Session(_) | PipelineError::Export { .. } => {
                ErrorKind::Io
            }
            PipelineError::Load { .. } => ErrorKind::Load,
            PipelineError::NotFound { .. } => ErrorKind::NotFound,
            PipelineError::Query { .. } => ErrorKind::Query,
            PipelineError::Config(_) => ErrorKind::Config,
        }
    }

    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P, message: impl Into<String>) -> Self {
        PipelineError::Load {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn not_found<P: AsRef<Path>>(path: P) -> Self {
        PipelineError::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn query(origin: impl Into<String>, source: duckdb::Error) -> Self {
        PipelineError::Query {
            origin: origin.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        PipelineError::Config(message.into())
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind as IoErrorKind};

    #[test]
    fn test_kind_classification() {
        let err = PipelineError::io("/out", IoError::new(IoErrorKind::PermissionDenied, "denied"));
        assert_eq!(err.kind(), ErrorKind::Io);

        assert_eq!(PipelineError::load("data.csv", "bad row").kind(), ErrorKind::Load);
        assert_eq!(PipelineError::not_found("kpi.sql").kind(), ErrorKind::NotFound);
        assert_eq!(PipelineError::config("no kpis").kind(), ErrorKind::Config);
    }

    #[test]
    fn test_messages_name_the_path() {
        let err = PipelineError::not_found("sql/kpi_priority_mix.sql");
        assert!(err.to_string().contains("sql/kpi_priority_mix.sql"));

        let err = PipelineError::load("raw/tickets.csv", "no such file");
        assert_eq!(err.to_string(), "Failed to load raw/tickets.csv: no such file");
    }
}
