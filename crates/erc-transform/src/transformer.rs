//! Transformer trait and the shared transformation workflow.
//!
//! Every data source runs the same ordered stages:
//!
//! 1. normalize column labels
//! 2. reject a table with no rows
//! 3. validate source headers (and period columns, when declared)
//! 4. project and rename columns
//! 5. validate the renamed schema
//! 6. source-specific reshape
//!
//! The first failing stage ends the run. A transformer only supplies its
//! [`TransformerDescriptor`] and the reshape step.

use std::collections::BTreeSet;
use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use erc_model::{ColumnMapping, DataSource, ErcError, Result};

use crate::mapper::map_columns;
use crate::normalize::normalize_columns;
use crate::reshape::PeriodPattern;
use crate::validate::{validate_headers, validate_period_headers, validate_required};

/// Dynamic period columns discovered by pattern.
#[derive(Debug, Clone)]
pub struct PeriodColumns {
    pub pattern: PeriodPattern,
    /// When set, header validation fails unless at least one column matches.
    pub required: bool,
}

impl PeriodColumns {
    pub fn required(pattern: PeriodPattern) -> Self {
        Self {
            pattern,
            required: true,
        }
    }

    pub fn optional(pattern: PeriodPattern) -> Self {
        Self {
            pattern,
            required: false,
        }
    }
}

/// Immutable configuration of one data source.
#[derive(Debug, Clone)]
pub struct TransformerDescriptor {
    pub source: DataSource,
    pub destination_table: &'static str,
    pub column_mapping: ColumnMapping,
    pub required_columns: BTreeSet<String>,
    pub period_columns: Option<PeriodColumns>,
}

impl TransformerDescriptor {
    pub fn new(source: DataSource, destination_table: &'static str) -> Self {
        Self {
            source,
            destination_table,
            column_mapping: ColumnMapping::new(),
            required_columns: BTreeSet::new(),
            period_columns: None,
        }
    }

    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.column_mapping = mapping;
        self
    }

    pub fn with_required<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_columns = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_period_columns(mut self, period_columns: PeriodColumns) -> Self {
        self.period_columns = Some(period_columns);
        self
    }

    /// Source labels checked by header validation.
    pub fn expected_headers(&self) -> BTreeSet<String> {
        self.column_mapping.source_set()
    }

    pub fn period_pattern(&self) -> Option<&PeriodPattern> {
        self.period_columns.as_ref().map(|period| &period.pattern)
    }

    /// No mapping and no period columns: the normalized table goes straight
    /// to the reshape step.
    pub fn is_pass_through(&self) -> bool {
        self.column_mapping.is_empty() && self.period_columns.is_none()
    }
}

/// Per-source transformation logic.
///
/// Implementors are stateless beyond their descriptor and can be shared
/// across threads.
pub trait Transformer: Send + Sync {
    fn descriptor(&self) -> &TransformerDescriptor;

    /// Source-specific reshape, run on the mapped and validated table.
    fn reshape(&self, df: DataFrame) -> Result<DataFrame>;

    fn source(&self) -> DataSource {
        self.descriptor().source
    }

    /// Fixed destination table. Never derived from request data.
    fn destination_table(&self) -> &'static str {
        self.descriptor().destination_table
    }

    /// Runs the full workflow on a loaded table.
    fn transform(&self, df: DataFrame) -> Result<DataFrame> {
        run_transform(self, df)
    }
}

/// Runs the ordered stages for `transformer` on `df`.
pub fn run_transform<T>(transformer: &T, df: DataFrame) -> Result<DataFrame>
where
    T: Transformer + ?Sized,
{
    let descriptor = transformer.descriptor();
    let span = info_span!(
        "transform",
        source = %descriptor.source,
        destination_table = descriptor.destination_table
    );
    let _guard = span.enter();
    let start = Instant::now();

    let df = normalize_columns(df);
    let input_rows = df.height();
    if input_rows == 0 {
        return Err(ErcError::EmptyFile);
    }

    let df = if descriptor.is_pass_through() {
        debug!("no column mapping declared, passing table through");
        df
    } else {
        validate_headers(&df, &descriptor.expected_headers())?;
        if let Some(period) = descriptor.period_columns.as_ref().filter(|p| p.required) {
            validate_period_headers(&df, &period.pattern)?;
        }
        map_columns(df, &descriptor.column_mapping, descriptor.period_pattern())?
    };
    validate_required(&df, &descriptor.required_columns)?;

    let output = transformer.reshape(df)?;
    info!(
        input_rows,
        output_rows = output.height(),
        duration_ms = start.elapsed().as_millis() as u64,
        "transform complete"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    struct Passthrough {
        descriptor: TransformerDescriptor,
    }

    impl Transformer for Passthrough {
        fn descriptor(&self) -> &TransformerDescriptor {
            &self.descriptor
        }

        fn reshape(&self, df: DataFrame) -> Result<DataFrame> {
            Ok(df)
        }
    }

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("País".into(), vec!["Chile"]).into_column(),
            Series::new("Valor".into(), vec!["1"]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn pass_through_skips_header_checks() {
        let transformer = Passthrough {
            descriptor: TransformerDescriptor::new(DataSource::Turismo, "visitas_turismo"),
        };
        assert!(transformer.descriptor().is_pass_through());
        let out = transformer.transform(frame()).unwrap();
        let names: Vec<String> = out
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["pais", "valor"]);
    }

    #[test]
    fn pass_through_still_checks_required_columns() {
        let transformer = Passthrough {
            descriptor: TransformerDescriptor::new(DataSource::Turismo, "visitas_turismo")
                .with_required(["pais", "anio"]),
        };
        let err = transformer.transform(frame()).unwrap_err();
        assert_eq!(err.error_code(), "TRANSFORM_003");
    }

    #[test]
    fn empty_table_is_rejected_first() {
        let transformer = Passthrough {
            descriptor: TransformerDescriptor::new(DataSource::Turismo, "visitas_turismo")
                .with_mapping(ColumnMapping::identity(["missing"])),
        };
        let empty = frame().slice(0, 0);
        assert_eq!(transformer.transform(empty).unwrap_err(), ErcError::EmptyFile);
    }

    #[test]
    fn header_errors_use_source_labels() {
        let transformer = Passthrough {
            descriptor: TransformerDescriptor::new(DataSource::Turismo, "visitas_turismo")
                .with_mapping(ColumnMapping::new().with("pais_turismo", "pais")),
        };
        let err = transformer.transform(frame()).unwrap_err();
        assert_eq!(
            err,
            ErcError::InvalidHeaders {
                missing: vec!["pais_turismo".to_string()],
                present: vec!["pais".to_string(), "valor".to_string()],
            }
        );
    }
}
