//! Projection and renaming of source columns.

use polars::prelude::DataFrame;
use tracing::debug;

use erc_model::{ColumnMapping, ErcError, Result};

use crate::frame_utils::{column_names, column_set, rename_all};
use crate::reshape::PeriodPattern;

/// Projects `df` to the mapped source columns plus any columns matching
/// `dynamic`, then renames the mapped columns.
///
/// Output order is the mapping order followed by the dynamic columns in the
/// order they appear in `df`. Dynamic columns keep their labels.
pub fn map_columns(
    df: DataFrame,
    mapping: &ColumnMapping,
    dynamic: Option<&PeriodPattern>,
) -> Result<DataFrame> {
    let present = column_set(&df);
    let missing: Vec<&str> = mapping
        .source_columns()
        .filter(|source| !present.contains(*source))
        .collect();
    if !missing.is_empty() {
        return Err(ErcError::missing_source_columns(missing));
    }

    let dynamic_columns: Vec<String> = match dynamic {
        Some(pattern) => column_names(&df)
            .into_iter()
            .filter(|label| pattern.matches(label) && mapping.output_for(label).is_none())
            .collect(),
        None => Vec::new(),
    };

    let projection: Vec<&str> = mapping
        .source_columns()
        .chain(dynamic_columns.iter().map(String::as_str))
        .collect();
    let projected = df.select(projection).map_err(ErcError::transformation)?;

    let renamed: Vec<String> = mapping
        .output_columns()
        .map(str::to_string)
        .chain(dynamic_columns.iter().cloned())
        .collect();
    let mapped = rename_all(&projected, &renamed).map_err(ErcError::transformation)?;

    debug!(
        static_columns = mapping.len(),
        dynamic_columns = dynamic_columns.len(),
        "mapped columns"
    );
    Ok(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn frame(labels: &[&str]) -> DataFrame {
        DataFrame::new(
            labels
                .iter()
                .map(|label| Series::new((*label).into(), vec!["1", "2"]).into_column())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn projects_and_renames_in_mapping_order() {
        let mapping = ColumnMapping::new()
            .with("pais_turismo", "pais")
            .with("ano", "anio");
        let df = map_columns(frame(&["ano", "extra", "pais_turismo"]), &mapping, None).unwrap();
        assert_eq!(column_names(&df), vec!["pais", "anio"]);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn keeps_dynamic_columns_after_static_ones() {
        let mapping = ColumnMapping::identity(["pais"]);
        let pattern = PeriodPattern::new(r"^\d{4}(-p)?$").unwrap();
        let df = map_columns(
            frame(&["2020-p", "pais", "nota", "2019"]),
            &mapping,
            Some(&pattern),
        )
        .unwrap();
        assert_eq!(column_names(&df), vec!["pais", "2020-p", "2019"]);
    }

    #[test]
    fn reports_missing_source_columns() {
        let mapping = ColumnMapping::identity(["pais", "cod_pais"]);
        let err = map_columns(frame(&["pais"]), &mapping, None).unwrap_err();
        assert_eq!(
            err,
            ErcError::MissingSourceColumns {
                missing: vec!["cod_pais".to_string()]
            }
        );
    }
}
