//! Error taxonomy for the ingestion pipeline.
//!
//! Every failure that leaves a pipeline stage, the loader or the storage
//! layer is an [`ErcError`]. Each variant carries a stable error code and a
//! JSON details map so callers can render the `{error_code, message, details}`
//! shape without inspecting variants.
//!
//! | Category   | Variants                                                        |
//! |------------|-----------------------------------------------------------------|
//! | Schema     | `InvalidHeaders`, `MissingSourceColumns`, `MissingRequiredColumns` |
//! | Data       | `EmptyFile`                                                     |
//! | Storage    | `DatabaseConnection`, `DatabaseInsert`, `DuplicateKey`          |
//! | Config     | `DatabaseAliasNotRegistered`, `InvalidConfig`                   |
//! | Input      | `UnsupportedFileFormat`, `FileRead`                             |
//! | Unexpected | `Transformation`                                                |

use std::collections::BTreeSet;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErcError {
    #[error("invalid headers: missing {missing:?} (present: {present:?})")]
    InvalidHeaders {
        missing: Vec<String>,
        present: Vec<String>,
    },

    #[error("missing source columns for mapping: {missing:?}")]
    MissingSourceColumns { missing: Vec<String> },

    #[error("missing required columns after mapping: {missing:?}")]
    MissingRequiredColumns { missing: Vec<String> },

    #[error("the uploaded file contains no rows")]
    EmptyFile,

    #[error("transformation failed: {original_error}")]
    Transformation { original_error: String },

    #[error("could not connect to the database: {reason}")]
    DatabaseConnection { reason: String },

    #[error("database insert failed: {reason}")]
    DatabaseInsert { reason: String },

    #[error("duplicate key detected: {reason}")]
    DuplicateKey { reason: String },

    #[error("database alias '{alias}' is not registered")]
    DatabaseAliasNotRegistered { alias: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("unsupported file format '{extension}' (supported: {supported:?})")]
    UnsupportedFileFormat {
        extension: String,
        supported: Vec<String>,
    },

    #[error("failed to read file {file_name}: {original_error}")]
    FileRead {
        file_name: String,
        original_error: String,
    },
}

/// Coarse grouping of errors, used by callers to pick a transport status or exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Schema,
    Data,
    Storage,
    Config,
    Input,
    Unexpected,
}

/// Serializable failure shape shared by every caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    pub details: Map<String, Value>,
}

impl ErcError {
    /// Builds an [`ErcError::InvalidHeaders`] with sorted, de-duplicated label lists.
    pub fn invalid_headers<M, P>(missing: M, present: P) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self::InvalidHeaders {
            missing: sorted_labels(missing),
            present: sorted_labels(present),
        }
    }

    pub fn missing_source_columns<I>(missing: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::MissingSourceColumns {
            missing: sorted_labels(missing),
        }
    }

    pub fn missing_required_columns<I>(missing: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::MissingRequiredColumns {
            missing: sorted_labels(missing),
        }
    }

    /// Wraps an error that does not belong to the taxonomy.
    pub fn transformation(error: impl Display) -> Self {
        Self::Transformation {
            original_error: error.to_string(),
        }
    }

    pub fn file_read(file_name: impl Into<String>, error: impl Display) -> Self {
        Self::FileRead {
            file_name: file_name.into(),
            original_error: error.to_string(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transformation { .. } => "TRANSFORM_001",
            Self::MissingSourceColumns { .. } => "TRANSFORM_002",
            Self::MissingRequiredColumns { .. } => "TRANSFORM_003",
            Self::EmptyFile => "TRANSFORM_004",
            Self::InvalidHeaders { .. } => "TRANSFORM_005",
            Self::DatabaseConnection { .. } => "DB_001",
            Self::DatabaseInsert { .. } => "DB_002",
            Self::DuplicateKey { .. } => "DB_003",
            Self::DatabaseAliasNotRegistered { .. } => "CONFIG_001",
            Self::InvalidConfig { .. } => "CONFIG_002",
            Self::UnsupportedFileFormat { .. } => "FILE_001",
            Self::FileRead { .. } => "FILE_002",
        }
    }

    /// Stable human-readable message; variable data lives in [`ErcError::details`].
    pub fn message(&self) -> String {
        match self {
            Self::InvalidHeaders { .. } => "The file does not contain the expected headers.".into(),
            Self::MissingSourceColumns { .. } => "Missing source columns for mapping.".into(),
            Self::MissingRequiredColumns { .. } => {
                "Missing required columns after transformation.".into()
            }
            Self::EmptyFile => "The uploaded file contains no valid rows.".into(),
            Self::Transformation { .. } => "Unexpected error during transformation.".into(),
            Self::DatabaseConnection { .. } => "Could not connect to the database.".into(),
            Self::DatabaseInsert { .. } => {
                "An error occurred while inserting data into the database.".into()
            }
            Self::DuplicateKey { .. } => "Duplicate key detected.".into(),
            Self::DatabaseAliasNotRegistered { alias } => {
                format!("Database alias '{alias}' is not registered.")
            }
            Self::InvalidConfig { .. } => "Invalid configuration.".into(),
            Self::UnsupportedFileFormat { extension, .. } => {
                format!("Unsupported file format '{extension}'.")
            }
            Self::FileRead { file_name, .. } => format!("Could not read file '{file_name}'."),
        }
    }

    pub fn details(&self) -> Map<String, Value> {
        let value = match self {
            Self::InvalidHeaders { missing, present } => json!({
                "missing_headers": missing,
                "present_headers": present,
            }),
            Self::MissingSourceColumns { missing } | Self::MissingRequiredColumns { missing } => {
                json!({ "missing_columns": missing })
            }
            Self::EmptyFile => json!({}),
            Self::Transformation { original_error } => json!({ "original_error": original_error }),
            Self::DatabaseConnection { reason }
            | Self::DatabaseInsert { reason }
            | Self::DuplicateKey { reason }
            | Self::InvalidConfig { reason } => json!({ "reason": reason }),
            Self::DatabaseAliasNotRegistered { alias } => json!({ "alias": alias }),
            Self::UnsupportedFileFormat {
                extension,
                supported,
            } => json!({ "extension": extension, "supported": supported }),
            Self::FileRead {
                file_name,
                original_error,
            } => json!({ "file_name": file_name, "original_error": original_error }),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidHeaders { .. }
            | Self::MissingSourceColumns { .. }
            | Self::MissingRequiredColumns { .. } => ErrorCategory::Schema,
            Self::EmptyFile => ErrorCategory::Data,
            Self::DatabaseConnection { .. }
            | Self::DatabaseInsert { .. }
            | Self::DuplicateKey { .. } => ErrorCategory::Storage,
            Self::DatabaseAliasNotRegistered { .. } | Self::InvalidConfig { .. } => {
                ErrorCategory::Config
            }
            Self::UnsupportedFileFormat { .. } | Self::FileRead { .. } => ErrorCategory::Input,
            Self::Transformation { .. } => ErrorCategory::Unexpected,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error_code: self.error_code().to_string(),
            message: self.message(),
            details: self.details(),
        }
    }
}

impl From<&ErcError> for ErrorResponse {
    fn from(error: &ErcError) -> Self {
        error.to_response()
    }
}

fn sorted_labels<I>(labels: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    labels
        .into_iter()
        .map(Into::into)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

pub type Result<T> = std::result::Result<T, ErcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_sets_are_sorted_and_deduplicated() {
        let err = ErcError::missing_source_columns(["pais", "cod_pais", "pais"]);
        assert_eq!(
            err,
            ErcError::MissingSourceColumns {
                missing: vec!["cod_pais".into(), "pais".into()]
            }
        );
    }

    #[test]
    fn every_variant_has_object_details() {
        let errors = [
            ErcError::EmptyFile,
            ErcError::transformation("boom"),
            ErcError::invalid_config("no databases"),
            ErcError::DatabaseAliasNotRegistered {
                alias: "erc".into(),
            },
        ];
        for err in errors {
            let response = err.to_response();
            assert_eq!(response.error_code, err.error_code());
            assert!(!response.message.is_empty());
        }
    }

    #[test]
    fn categories_follow_taxonomy() {
        assert_eq!(
            ErcError::invalid_headers(["a"], ["b"]).category(),
            ErrorCategory::Schema
        );
        assert_eq!(ErcError::EmptyFile.category(), ErrorCategory::Data);
        assert_eq!(
            ErcError::DuplicateKey {
                reason: "x".into()
            }
            .category(),
            ErrorCategory::Storage
        );
        assert_eq!(
            ErcError::transformation("x").category(),
            ErrorCategory::Unexpected
        );
    }
}
