#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the profile generator."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Only [`Error::ArtifactIo`] is fatal to a run. Network, identifier and
//! timestamp failures are handled by the collection pipeline, which degrades
//! to cached or placeholder data instead of aborting.

use std::path::{Path, PathBuf};

/// Unified error type returned by the data sources, the aggregator and the
/// artifact writers.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Timeout, transport failure or non-2xx response from the remote API.
    #[error("network failure: {message}")]
    Network {
        /// Human readable description of the failed request.
        message: String
    },
    /// A timestamp that could not be interpreted as a calendar date.
    #[error("malformed timestamp '{value}'")]
    MalformedTimestamp {
        /// The offending input.
        value: String
    },
    /// An account or repository identifier rejected by the allow-list.
    #[error("invalid identifier '{value}'")]
    InvalidIdentifier {
        /// The rejected identifier.
        value: String
    },
    /// Wraps I/O errors that occur while reading configuration or cache files.
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// Location of the file being read.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps JSON encoding and decoding errors.
    #[error("failed to process JSON: {source}")]
    Serialize {
        /// Underlying serde_json error.
        source: serde_json::Error
    },
    /// Returned when a configuration value violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps I/O errors that occur while writing the document or the chart.
    #[error("failed to write artifact at {path:?}: {source}")]
    ArtifactIo {
        /// Location of the artifact being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    }
}

impl Error {
    /// Constructs a network error from the provided displayable value.
    pub fn network<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Network {
            message: message.into()
        }
    }

    /// Constructs a validation error from the provided displayable value.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a malformed timestamp error for the rejected input.
    pub fn malformed_timestamp<V>(value: V) -> Self
    where
        V: Into<String>
    {
        Self::MalformedTimestamp {
            value: value.into()
        }
    }

    /// Constructs an invalid identifier error for the rejected input.
    pub fn invalid_identifier<V>(value: V) -> Self
    where
        V: Into<String>
    {
        Self::InvalidIdentifier {
            value: value.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation and
    /// is what the CLI prints before exiting with a non-zero status.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::ArtifactIo`] variant capturing the failing path and
/// source.
pub fn artifact_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::ArtifactIo {
        path: path.to_path_buf(),
        source
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn network_constructor_populates_message() {
        let error = Error::network("connection reset");
        match error {
            Error::Network {
                ref message
            } => {
                assert_eq!(message, "connection reset");
            }
            other => panic!("expected network error, got {other:?}")
        }
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::malformed_timestamp("2024-13-40");
        assert_eq!(error.to_string(), error.to_display_string());
        assert_eq!(error.to_string(), "malformed timestamp '2024-13-40'");
    }

    #[test]
    fn invalid_identifier_mentions_value() {
        let error = Error::invalid_identifier("bad\"login");
        assert!(error.to_string().contains("bad\"login"));
    }

    #[test]
    fn io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/repos_cache.json");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::io_error(path, io_error);

        match error {
            Error::Io {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {other:?}")
        }
    }

    #[test]
    fn serde_yaml_conversion_maps_to_parse_variant() {
        let error = serde_yaml::from_str::<usize>("not-a-number").unwrap_err();
        let mapped: Error = error.into();
        assert!(matches!(mapped, Error::Parse { .. }));
    }

    #[test]
    fn serde_json_conversion_maps_to_serialize_variant() {
        let invalid = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let mapped: Error = invalid.into();
        assert!(matches!(mapped, Error::Serialize { .. }));
    }

    #[test]
    fn artifact_io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/README.md");
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = super::artifact_io_error(path, io_error);

        match error {
            Error::ArtifactIo {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected artifact io error, got {other:?}")
        }
    }
}
