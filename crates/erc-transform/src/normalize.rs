//! Canonical column labels.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::frame_utils::{column_names, rename_all};

/// Canonical form of a column label.
///
/// Decomposes to NFD, drops combining marks, trims, lower-cases and joins
/// whitespace runs with a single underscore: `" Año  Mes "` becomes `ano_mes`.
///
/// A run of spaces or tabs yields one underscore, not one per character, so
/// `"usd  millones"` and `"usd millones"` share the label `usd_millones`.
/// Existing underscores are kept as they are.
pub fn normalize_label(label: &str) -> String {
    let stripped: String = label.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Renames every column to its canonical label.
///
/// Never fails. When two labels collide after normalization the first keeps
/// the canonical label and later ones get a `__{position}` suffix, so the
/// collision shows up downstream as a missing or unexpected column.
pub fn normalize_columns(df: DataFrame) -> DataFrame {
    let original = column_names(&df);
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut renamed = Vec::with_capacity(original.len());

    for (position, label) in original.iter().enumerate() {
        let canonical = normalize_label(label);
        if let Some(first) = seen.get(&canonical) {
            let unique = format!("{canonical}__{position}");
            warn!(
                column = %label,
                canonical = %canonical,
                first_position = first,
                renamed = %unique,
                "column label collides after normalization"
            );
            renamed.push(unique);
        } else {
            seen.insert(canonical.clone(), position);
            renamed.push(canonical);
        }
    }

    if renamed == original {
        return df;
    }
    match rename_all(&df, &renamed) {
        Ok(normalized) => {
            debug!(columns = renamed.len(), "normalized column labels");
            normalized
        }
        Err(error) => {
            warn!(%error, "column normalization skipped");
            df
        }
    }
}
