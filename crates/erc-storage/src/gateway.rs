//! Transactional upload of transformed tables.

use std::time::Instant;

use polars::prelude::DataFrame;
use rusqlite::types::Value;
use rusqlite::{ErrorCode, ffi, params_from_iter};
use tracing::{debug, info, info_span};

use erc_model::{ErcError, Result, UploadResult};

use crate::registry::StorageHandle;
use crate::value::to_sql_value;

/// How rows colliding with an existing unique key are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Colliding rows are skipped and not counted.
    #[default]
    InsertOrIgnore,
    /// A colliding row aborts the whole call with [`ErcError::DuplicateKey`].
    Append,
}

impl WriteMode {
    fn verb(self) -> &'static str {
        match self {
            Self::InsertOrIgnore => "INSERT OR IGNORE",
            Self::Append => "INSERT",
        }
    }
}

/// Quotes an SQL identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn insert_statement(destination: &str, columns: &[String], mode: WriteMode) -> String {
    let names: Vec<String> = columns.iter().map(|name| quote_identifier(name)).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|idx| format!("?{idx}")).collect();
    format!(
        "{} INTO {} ({}) VALUES ({})",
        mode.verb(),
        quote_identifier(destination),
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Maps a SQLite failure onto the storage error kinds.
pub fn classify_sqlite_error(err: &rusqlite::Error, mode: WriteMode) -> ErcError {
    let reason = err.to_string();
    let rusqlite::Error::SqliteFailure(failure, _) = err else {
        return ErcError::DatabaseInsert { reason };
    };
    match failure.code {
        ErrorCode::CannotOpen
        | ErrorCode::DatabaseBusy
        | ErrorCode::DatabaseLocked
        | ErrorCode::NotADatabase
        | ErrorCode::SystemIoFailure => ErcError::DatabaseConnection { reason },
        ErrorCode::ConstraintViolation
            if mode == WriteMode::Append
                && (failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY) =>
        {
            ErcError::DuplicateKey { reason }
        }
        _ => ErcError::DatabaseInsert { reason },
    }
}

/// Writes every row of `df` to `destination` in a single transaction.
///
/// Columns are written under their own names; the table must already match
/// the destination schema. An empty table returns zero without touching
/// storage. Any failure rolls back every row written by this call.
pub fn upload(
    df: &DataFrame,
    destination: &str,
    handle: &StorageHandle,
    mode: WriteMode,
) -> Result<UploadResult> {
    let rows = df.height();
    let span = info_span!(
        "upload",
        destination,
        alias = handle.alias(),
        rows,
        mode = ?mode
    );
    let _guard = span.enter();

    if rows == 0 {
        debug!("nothing to upload");
        return Ok(UploadResult::new(0));
    }

    let start = Instant::now();
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(ToString::to_string)
        .collect();
    let sql = insert_statement(destination, &columns, mode);
    let classify = |err: rusqlite::Error| classify_sqlite_error(&err, mode);

    let mut conn = handle.connection()?;
    let tx = conn.transaction().map_err(classify)?;
    let mut inserted = 0usize;
    {
        let mut stmt = tx.prepare(&sql).map_err(classify)?;
        for idx in 0..rows {
            let params: Vec<Value> = df
                .get_columns()
                .iter()
                .map(|column| column.get(idx).map_or(Value::Null, to_sql_value))
                .collect();
            inserted += stmt.execute(params_from_iter(params)).map_err(classify)?;
        }
    }
    tx.commit().map_err(classify)?;

    info!(
        inserted,
        ignored = rows - inserted,
        duration_ms = start.elapsed().as_millis() as u64,
        "upload complete"
    );
    Ok(UploadResult::new(inserted))
}
