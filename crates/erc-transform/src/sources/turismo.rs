//! Monthly tourism arrivals and departures.

use polars::prelude::DataFrame;

use erc_model::{ColumnMapping, DataSource, Result};

use crate::reshape::aggregate_sum;
use crate::transformer::{Transformer, TransformerDescriptor};

pub const DESTINATION_TABLE: &str = "visitas_turismo";

const GROUP_KEYS: [&str; 5] = ["anio", "mes", "codigo_pais", "pais", "flujo"];
const MEASURE: &str = "viajeros";

/// Sums travellers per year, month, country and flow.
#[derive(Debug, Clone)]
pub struct TurismoTransformer {
    descriptor: TransformerDescriptor,
}

impl TurismoTransformer {
    pub fn new() -> Self {
        let mapping = ColumnMapping::new()
            .with("ano", "anio")
            .with("mes", "mes")
            .with("cod_pais", "codigo_pais")
            .with("pais_turismo", "pais")
            .with("viajeros", MEASURE)
            .with("flujo_turismo", "flujo");
        Self {
            descriptor: TransformerDescriptor::new(DataSource::Turismo, DESTINATION_TABLE)
                .with_mapping(mapping)
                .with_required(["anio", "pais", "codigo_pais", "viajeros", "mes", "flujo"]),
        }
    }
}

impl Default for TurismoTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for TurismoTransformer {
    fn descriptor(&self) -> &TransformerDescriptor {
        &self.descriptor
    }

    fn reshape(&self, df: DataFrame) -> Result<DataFrame> {
        aggregate_sum(df, &GROUP_KEYS, MEASURE)
    }
}
