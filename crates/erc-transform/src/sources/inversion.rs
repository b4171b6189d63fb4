//! Foreign direct investment, one column per year.

use std::sync::LazyLock;

use polars::prelude::DataFrame;
use regex::Regex;

use erc_model::{ColumnMapping, DataSource, ErcError, Result};

use crate::reshape::{FlagEncoding, PeriodPattern, UnpivotColumns, unpivot_periods};
use crate::transformer::{PeriodColumns, Transformer, TransformerDescriptor};

pub const DESTINATION_TABLE: &str = "ban_rep_inversion";

/// `2019`, `2024pre`, `2026_pro`.
static YEAR_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}(_?(pre|pro))?$").expect("Invalid investment year column regex")
});

const COLUMNS: [&str; 5] = ["pais", "pais_banrep", "cod_pais", "pais_aladi", "flujo"];

const OUTPUT: UnpivotColumns = UnpivotColumns {
    value: "valor",
    period: "fecha",
    flag: "tipo_dato",
    flag_encoding: FlagEncoding::Code,
};

/// Un-pivots yearly investment columns into `valor`, `fecha` and `tipo_dato`.
/// At least one year column must be present.
#[derive(Debug, Clone)]
pub struct InversionTransformer {
    descriptor: TransformerDescriptor,
}

impl InversionTransformer {
    pub fn new() -> Self {
        Self {
            descriptor: TransformerDescriptor::new(DataSource::Inversion, DESTINATION_TABLE)
                .with_mapping(ColumnMapping::identity(COLUMNS))
                .with_required(COLUMNS)
                .with_period_columns(PeriodColumns::required(PeriodPattern::from_regex(
                    YEAR_COLUMN.clone(),
                ))),
        }
    }
}

impl Default for InversionTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for InversionTransformer {
    fn descriptor(&self) -> &TransformerDescriptor {
        &self.descriptor
    }

    fn reshape(&self, df: DataFrame) -> Result<DataFrame> {
        let pattern = self
            .descriptor
            .period_pattern()
            .ok_or_else(|| ErcError::transformation("year column pattern is not configured"))?;
        unpivot_periods(&df, pattern, &OUTPUT)
    }
}
