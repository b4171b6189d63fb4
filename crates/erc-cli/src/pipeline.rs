//! Upload service: transform a loaded table and persist it.

use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{error, info, info_span};

use erc_model::{DataSource, ErcError, ErrorCategory, Result, UploadResponse};
use erc_storage::{StorageRegistry, WriteMode, upload};
use erc_transform::{Transformer, default_registry};

/// Output of a transform that was not written.
#[derive(Debug)]
pub struct TransformPreview {
    pub source: DataSource,
    pub destination_table: &'static str,
    pub table: DataFrame,
}

fn transformer_for(source: DataSource) -> Result<&'static dyn Transformer> {
    default_registry()
        .get(source)
        .ok_or_else(|| ErcError::transformation(format!("no transformer registered for {source}")))
}

/// Runs the transformation for `source` without touching storage.
pub fn preview_transform(table: DataFrame, source: DataSource) -> Result<TransformPreview> {
    let transformer = transformer_for(source)?;
    let table = transformer.transform(table)?;
    Ok(TransformPreview {
        source,
        destination_table: transformer.destination_table(),
        table,
    })
}

/// Transforms `table` for `source` and writes it to the source's fixed
/// destination through the handle registered under `alias`.
///
/// The alias is resolved before any transformation work so configuration
/// mistakes surface first.
pub fn process_upload(
    table: DataFrame,
    source: DataSource,
    registry: &StorageRegistry,
    alias: &str,
    mode: WriteMode,
) -> Result<UploadResponse> {
    let span = info_span!("process_upload", %source, alias);
    let _guard = span.enter();
    let start = Instant::now();

    let outcome = registry.get_handle(alias).and_then(|handle| {
        let preview = preview_transform(table, source)?;
        let result = upload(&preview.table, preview.destination_table, &handle, mode)?;
        Ok(UploadResponse::new(source, preview.destination_table, result))
    });

    match &outcome {
        Ok(response) => info!(
            rows_uploaded = response.rows_uploaded,
            destination_table = %response.destination_table,
            duration_ms = start.elapsed().as_millis() as u64,
            "upload processed"
        ),
        Err(err) => error!(error_code = err.error_code(), %err, "upload failed"),
    }
    outcome
}

/// Process exit status for a failed command.
pub fn exit_code(err: &ErcError) -> i32 {
    match err.category() {
        ErrorCategory::Schema | ErrorCategory::Data | ErrorCategory::Input => 2,
        ErrorCategory::Storage | ErrorCategory::Config => 3,
        ErrorCategory::Unexpected => 1,
    }
}
