//! Schema checks run before and after column mapping.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use tracing::debug;

use erc_model::{ErcError, Result};

use crate::frame_utils::column_set;
use crate::reshape::PeriodPattern;

/// Checks that every expected label is present before any renaming.
///
/// An empty `expected` set always passes.
pub fn validate_headers(df: &DataFrame, expected: &BTreeSet<String>) -> Result<()> {
    if expected.is_empty() {
        return Ok(());
    }
    let present = column_set(df);
    let missing: Vec<String> = expected.difference(&present).cloned().collect();
    if missing.is_empty() {
        return Ok(());
    }
    debug!(missing = missing.len(), "header validation failed");
    Err(ErcError::invalid_headers(missing, present))
}

/// Checks that at least one column matches the period pattern.
pub fn validate_period_headers(df: &DataFrame, pattern: &PeriodPattern) -> Result<()> {
    let present = column_set(df);
    if present.iter().any(|label| pattern.matches(label)) {
        return Ok(());
    }
    Err(ErcError::invalid_headers([pattern.as_str()], present))
}

/// Checks that every required output column exists after mapping.
pub fn validate_required(df: &DataFrame, required: &BTreeSet<String>) -> Result<()> {
    let present = column_set(df);
    let missing: Vec<String> = required.difference(&present).cloned().collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ErcError::missing_required_columns(missing))
    }
}
