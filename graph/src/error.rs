//! Error taxonomy for the semantic graph.
//!
//! Malformed triples are not errors: ingestion drops them silently. The
//! variants below are reserved for malformed *calls* (bad arguments, missing
//! capabilities, unknown nodes) and for I/O or startup failures.

use std::path::PathBuf;

/// Errors raised by graph construction, ingestion and resolution.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A constructor or operation argument has the wrong shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The resolver bundle or graph configuration is missing a required capability.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A class, property or field IRI is not a node in the graph.
    #[error("node not found: {0}")]
    NotFound(String),

    /// A file could not be read during `parse_file`.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The external parser rejected its input. Triples decoded before the
    /// failure remain indexed.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The seed vocabulary could not be loaded; no graph can be constructed.
    #[error("seed vocabulary failed to load: {0}")]
    FatalStartup(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = GraphError::Io {
            path: PathBuf::from("/missing/data.ttl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/missing/data.ttl"), "unexpected message: {msg}");
        assert!(msg.contains("no such file"), "unexpected message: {msg}");
    }

    #[test]
    fn not_found_carries_the_iri() {
        let err = GraphError::NotFound("http://example.org/Nope".into());
        assert_eq!(err.to_string(), "node not found: http://example.org/Nope");
    }
}
