//! End-to-end transformation tests for the shipped data sources.

use polars::prelude::*;

use erc_model::{ColumnMapping, DataSource, ErcError, Result};
use erc_transform::{
    FlagEncoding, PeriodColumns, PeriodPattern, Transformer, TransformerDescriptor,
    UnpivotColumns, default_registry, map_columns, normalize_label, unpivot_periods,
};

fn test_df(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.into(), values).into_column())
        .collect();
    DataFrame::new(cols).unwrap()
}

fn names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

fn transformer(source: DataSource) -> &'static dyn Transformer {
    default_registry().get(source).unwrap()
}

/// Minimal source with a static mapping and an optional year pattern.
struct Wide {
    descriptor: TransformerDescriptor,
}

impl Wide {
    fn new() -> Self {
        Self {
            descriptor: TransformerDescriptor::new(DataSource::Bienes, "comercio_bienes")
                .with_mapping(ColumnMapping::identity(["pais", "cod_pais"]))
                .with_required(["pais", "cod_pais"])
                .with_period_columns(PeriodColumns::optional(
                    PeriodPattern::new(r"(?i)^\d{4}(-p)?$").unwrap(),
                )),
        }
    }
}

impl Transformer for Wide {
    fn descriptor(&self) -> &TransformerDescriptor {
        &self.descriptor
    }

    fn reshape(&self, df: DataFrame) -> Result<DataFrame> {
        let output = UnpivotColumns {
            value: "valor",
            period: "periodo",
            flag: "estado",
            flag_encoding: FlagEncoding::Code,
        };
        let pattern = self.descriptor.period_pattern().unwrap();
        unpivot_periods(&df, pattern, &output)
    }
}

#[test]
fn two_period_columns_produce_two_rows_per_source_row() {
    let df = test_df(vec![
        ("pais", vec!["Chile", "Peru"]),
        ("cod_pais", vec!["CL", "PE"]),
        ("2019", vec!["1", "2"]),
        ("2020-p", vec!["3", "4"]),
    ]);
    let out = Wide::new().transform(df).unwrap();

    assert_eq!(out.height(), 4);
    let pais = out.column("pais").unwrap().str().unwrap();
    let periodo = out.column("periodo").unwrap().i32().unwrap();
    let estado = out.column("estado").unwrap().str().unwrap();
    for idx in 0..2 {
        assert_eq!(periodo.get(idx), Some(2019));
        assert_eq!(estado.get(idx), Some("actual"));
    }
    for idx in 2..4 {
        assert_eq!(periodo.get(idx), Some(2020));
        assert_eq!(estado.get(idx), Some("pre"));
    }
    assert_eq!(pais.get(0), Some("Chile"));
    assert_eq!(pais.get(2), Some("Chile"));
}

#[test]
fn missing_source_column_fails_before_reshape() {
    let df = test_df(vec![("pais", vec!["Chile"]), ("2019", vec!["1"])]);
    let wide = Wide::new();
    let err = map_columns(df.clone(), &wide.descriptor().column_mapping, None).unwrap_err();
    assert_eq!(
        err,
        ErcError::MissingSourceColumns {
            missing: vec!["cod_pais".to_string()]
        }
    );

    // Through the full workflow the header check reports it first.
    let err = wide.transform(df).unwrap_err();
    assert_eq!(err.error_code(), "TRANSFORM_005");
}

#[test]
fn turismo_sums_travellers_per_key() {
    let df = test_df(vec![
        ("Año", vec!["2024", "2024", "2024"]),
        ("Mes", vec!["1", "1", "2"]),
        ("Cod País", vec!["152", "152", "152"]),
        ("País Turismo", vec!["Chile", "Chile", "Chile"]),
        ("Viajeros", vec!["10", "15", "7,5"]),
        ("Flujo Turismo", vec!["entrada", "entrada", "entrada"]),
        ("Motivo", vec!["negocios", "ocio", "ocio"]),
    ]);
    let out = transformer(DataSource::Turismo).transform(df).unwrap();

    assert_eq!(
        names(&out),
        vec!["anio", "mes", "codigo_pais", "pais", "flujo", "viajeros"]
    );
    assert_eq!(out.height(), 2);
    let viajeros = out.column("viajeros").unwrap().f64().unwrap();
    assert_eq!(viajeros.get(0), Some(25.0));
    assert_eq!(viajeros.get(1), Some(7.5));
}

#[test]
fn servicios_collapses_subcategories() {
    let df = test_df(vec![
        ("cod_pais", vec!["840", "840"]),
        ("pais_serv", vec!["Estados Unidos", "Estados Unidos"]),
        ("pais_aladi", vec!["no", "no"]),
        ("flujo_comercial", vec!["X", "X"]),
        ("periodo_mes", vec!["2024-01", "2024-01"]),
        ("codigo_cabps", vec!["3", "3"]),
        ("descripcion_cabps", vec!["Viajes", "Viajes negocios"]),
        ("cod_depto", vec!["11", "11"]),
        ("nombre_departamento", vec!["Bogota", "Bogota"]),
        ("usd_millones", vec!["10", "15"]),
    ]);
    let out = transformer(DataSource::Servicios).transform(df).unwrap();

    assert_eq!(
        names(&out),
        vec![
            "flujo_comercial",
            "periodo_mes",
            "codigo_cabps",
            "cod_pais",
            "cod_depto",
            "millones_dolares"
        ]
    );
    assert_eq!(out.height(), 1);
    let total = out.column("millones_dolares").unwrap().f64().unwrap();
    assert_eq!(total.get(0), Some(25.0));
}

#[test]
fn inversion_requires_a_year_column() {
    let df = test_df(vec![
        ("pais", vec!["Chile"]),
        ("pais_banrep", vec!["Chile"]),
        ("cod_pais", vec!["152"]),
        ("pais_aladi", vec!["si"]),
        ("flujo", vec!["IED"]),
    ]);
    let err = transformer(DataSource::Inversion).transform(df).unwrap_err();
    assert!(matches!(err, ErcError::InvalidHeaders { .. }));
}

#[test]
fn inversion_tags_preliminary_and_projected_years() {
    let df = test_df(vec![
        ("País", vec!["Chile"]),
        ("pais_banrep", vec!["Chile"]),
        ("cod_pais", vec!["152"]),
        ("pais_aladi", vec!["si"]),
        ("flujo", vec!["IED"]),
        ("2023", vec!["1,25"]),
        ("2024pre", vec!["2"]),
        ("2025_pro", vec!["n.d."]),
    ]);
    let out = transformer(DataSource::Inversion).transform(df).unwrap();

    assert_eq!(out.height(), 3);
    assert_eq!(
        names(&out),
        vec![
            "pais",
            "pais_banrep",
            "cod_pais",
            "pais_aladi",
            "flujo",
            "valor",
            "fecha",
            "tipo_dato"
        ]
    );
    let valor = out.column("valor").unwrap().f64().unwrap();
    let fecha = out.column("fecha").unwrap().i32().unwrap();
    let tipo = out.column("tipo_dato").unwrap().str().unwrap();
    assert_eq!(valor.get(0), Some(1.25));
    assert_eq!(valor.get(2), None);
    assert_eq!(fecha.get(1), Some(2024));
    assert_eq!(tipo.get(0), Some("actual"));
    assert_eq!(tipo.get(1), Some("pre"));
    assert_eq!(tipo.get(2), Some("pro"));
}

#[test]
fn bienes_marks_preliminary_years() {
    let df = test_df(vec![
        ("cod_pais", vec!["152"]),
        ("pais", vec!["Chile"]),
        ("nandina", vec!["0901"]),
        ("Descripción Resumida", vec!["Cafe"]),
        ("ambito", vec!["agro"]),
        ("Mineros/No Mineros", vec!["no mineros"]),
        ("departamento", vec!["Huila"]),
        ("flujo", vec!["X"]),
        ("periodo", vec!["anual"]),
        ("2023", vec!["100"]),
        ("2024-P", vec!["120,5"]),
    ]);
    let out = transformer(DataSource::Bienes).transform(df).unwrap();

    assert_eq!(out.height(), 2);
    assert!(names(&out).contains(&"mineros_no_mineros".to_string()));
    let anio = out.column("anio").unwrap().i32().unwrap();
    let preliminar = out.column("es_preliminar").unwrap().bool().unwrap();
    let valor = out.column("valor").unwrap().f64().unwrap();
    assert_eq!(anio.get(1), Some(2024));
    assert_eq!(preliminar.get(0), Some(false));
    assert_eq!(preliminar.get(1), Some(true));
    assert_eq!(valor.get(1), Some(120.5));
}

#[test]
fn bienes_without_year_columns_yields_no_rows() {
    let df = test_df(vec![
        ("cod_pais", vec!["152"]),
        ("pais", vec!["Chile"]),
        ("nandina", vec!["0901"]),
        ("descripcion_resumida", vec!["Cafe"]),
        ("ambito", vec!["agro"]),
        ("mineros/no_mineros", vec!["no mineros"]),
        ("departamento", vec!["Huila"]),
        ("flujo", vec!["X"]),
        ("periodo", vec!["anual"]),
    ]);
    let out = transformer(DataSource::Bienes).transform(df).unwrap();
    assert_eq!(out.height(), 0);
}

#[test]
fn empty_table_is_an_empty_file_error() {
    let df = test_df(vec![("ano", vec![]), ("mes", vec![])]);
    let err = transformer(DataSource::Turismo).transform(df).unwrap_err();
    assert_eq!(err, ErcError::EmptyFile);
    assert_eq!(err.error_code(), "TRANSFORM_004");
}

#[test]
fn mapping_keys_are_canonical_labels() {
    for source in DataSource::ALL {
        let descriptor = transformer(source).descriptor();
        for key in descriptor.column_mapping.source_columns() {
            assert_eq!(normalize_label(key), key, "{source}: {key}");
        }
    }
}
