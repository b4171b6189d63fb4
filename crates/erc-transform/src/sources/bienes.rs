//! Goods trade, one column per year with optional preliminary marker.

use std::sync::LazyLock;

use polars::prelude::DataFrame;
use regex::Regex;

use erc_model::{ColumnMapping, DataSource, ErcError, Result};

use crate::reshape::{FlagEncoding, PeriodPattern, UnpivotColumns, unpivot_periods};
use crate::transformer::{PeriodColumns, Transformer, TransformerDescriptor};

pub const DESTINATION_TABLE: &str = "comercio_bienes";

/// `2019`, `2020-p`, `2020-P`.
static YEAR_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d{4}(-p)?$").expect("Invalid goods year column regex"));

const OUTPUT: UnpivotColumns = UnpivotColumns {
    value: "valor",
    period: "anio",
    flag: "es_preliminar",
    flag_encoding: FlagEncoding::Preliminary,
};

/// Un-pivots yearly goods columns into `valor`, `anio` and `es_preliminar`.
#[derive(Debug, Clone)]
pub struct BienesTransformer {
    descriptor: TransformerDescriptor,
}

impl BienesTransformer {
    pub fn new() -> Self {
        let mapping = ColumnMapping::new()
            .with("cod_pais", "cod_pais")
            .with("pais", "pais")
            .with("nandina", "nandina")
            .with("descripcion_resumida", "descripcion_resumida")
            .with("ambito", "ambito")
            .with("mineros/no_mineros", "mineros_no_mineros")
            .with("departamento", "departamento")
            .with("flujo", "flujo")
            .with("periodo", "periodo");
        Self {
            descriptor: TransformerDescriptor::new(DataSource::Bienes, DESTINATION_TABLE)
                .with_mapping(mapping)
                .with_required(["cod_pais", "nandina", "departamento", "flujo", "periodo"])
                .with_period_columns(PeriodColumns::optional(PeriodPattern::from_regex(
                    YEAR_COLUMN.clone(),
                ))),
        }
    }
}

impl Default for BienesTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for BienesTransformer {
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
