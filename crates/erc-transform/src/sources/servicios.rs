//! Monthly services trade by country, department and service category.

use polars::prelude::DataFrame;

use erc_model::{ColumnMapping, DataSource, Result};

use crate::reshape::aggregate_sum;
use crate::transformer::{Transformer, TransformerDescriptor};

pub const DESTINATION_TABLE: &str = "emces_servicios";

const GROUP_KEYS: [&str; 5] = [
    "flujo_comercial",
    "periodo_mes",
    "codigo_cabps",
    "cod_pais",
    "cod_depto",
];
const MEASURE: &str = "millones_dolares";

/// Sums USD millions per flow, month, category, country and department.
/// Descriptive columns outside the key are dropped.
#[derive(Debug, Clone)]
pub struct ServiciosTransformer {
    descriptor: TransformerDescriptor,
}

impl ServiciosTransformer {
    pub fn new() -> Self {
        let mapping = ColumnMapping::new()
            .with("cod_pais", "cod_pais")
            .with("pais_serv", "nombre_pais")
            .with("pais_aladi", "pais_aladi")
            .with("flujo_comercial", "flujo_comercial")
            .with("periodo_mes", "periodo_mes")
            .with("codigo_cabps", "codigo_cabps")
            .with("descripcion_cabps", "descripcion_cabps")
            .with("cod_depto", "cod_depto")
            .with("nombre_departamento", "nombre_departamento")
            .with("usd_millones", MEASURE);
        Self {
            descriptor: TransformerDescriptor::new(DataSource::Servicios, DESTINATION_TABLE)
                .with_mapping(mapping)
                .with_required(GROUP_KEYS),
        }
    }
}

impl Default for ServiciosTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for ServiciosTransformer {
    fn descriptor(&self) -> &TransformerDescriptor {
        &self.descriptor
    }

    fn reshape(&self, df: DataFrame) -> Result<DataFrame> {
        aggregate_sum(df, &GROUP_KEYS, MEASURE)
    }
}
