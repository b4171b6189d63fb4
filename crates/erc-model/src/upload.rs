use serde::{Deserialize, Serialize};

use crate::source::DataSource;

/// Outcome of one upload call. Zero rows is a valid, non-error outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub rows_uploaded: usize,
}

impl UploadResult {
    pub fn new(rows_uploaded: usize) -> Self {
        Self { rows_uploaded }
    }

    pub fn is_empty(&self) -> bool {
        self.rows_uploaded == 0
    }
}

/// Success shape returned to callers of the upload service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub rows_uploaded: usize,
    pub destination_table: String,
}

impl UploadResponse {
    pub fn new(source: DataSource, destination_table: impl Into<String>, result: UploadResult) -> Self {
        Self {
            message: format!("{source} records updated"),
            rows_uploaded: result.rows_uploaded,
            destination_table: destination_table.into(),
        }
    }
}
