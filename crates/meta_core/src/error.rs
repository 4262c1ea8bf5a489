//! Error types for station group extraction.

use crate::GenerId;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by an injected collaborator (generator source, sink).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A generator stream that cannot be partitioned into station groups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("multiple control generators in one group: {existing} and {duplicate}")]
    DuplicateControl { existing: GenerId, duplicate: GenerId },

    #[error("generator {appended} added after group was closed by {closing}")]
    AppendedAfterClose { closing: GenerId, appended: GenerId },
}

/// An absent or unusable scenario specification.
#[derive(Debug, Error)]
pub enum SpecificationError {
    #[error("scenario specification not found: {0}")]
    Missing(PathBuf),

    #[error("reading scenario specification {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing scenario specification {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("scenario specification {path} is missing required key '{key}'")]
    MissingKey { path: PathBuf, key: &'static str },
}

/// Failure of one scenario's extraction. Nothing is persisted when this is returned.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("simulation '{simulation}': {source}")]
    Structural {
        simulation: String,
        #[source]
        source: StructuralError,
    },

    #[error(transparent)]
    Specification(#[from] SpecificationError),

    #[error("reading generators of simulation '{simulation}': {source}")]
    Source {
        simulation: String,
        #[source]
        source: BoxError,
    },

    #[error("persisting scenario '{scenario}': {source}")]
    Persist {
        scenario: String,
        #[source]
        source: BoxError,
    },
}
