//! Wide-to-long reshaping and group aggregation.
//!
//! Wide tables carry one column per period (`2019`, `2020-p`, `1994_pre`).
//! [`unpivot_periods`] turns each of those columns into rows holding the
//! period's year, its status flag and the numeric value, while
//! [`aggregate_sum`] collapses rows that share a grouping key.

use std::sync::LazyLock;

use polars::prelude::{
    DataFrame, Expr, IntoColumn, IntoLazy, NamedFrom, Series, col,
};
use regex::Regex;
use tracing::debug;

use erc_model::{ErcError, PeriodFlag, Result};

use crate::frame_utils::{any_to_decimal, column_names, with_decimal_column};

static YEAR_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})").expect("Invalid year digits regex"));

/// Pattern recognizing dynamic period columns.
#[derive(Debug, Clone)]
pub struct PeriodPattern {
    regex: Regex,
}

impl PeriodPattern {
    pub fn new(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn from_regex(regex: Regex) -> Self {
        Self { regex }
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn matches(&self, label: &str) -> bool {
        self.regex.is_match(label)
    }

    /// Four-digit year inside a period label, independent of any suffix.
    pub fn year(label: &str) -> Option<i32> {
        YEAR_DIGITS
            .captures(label)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

/// How the period status is written to the long table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagEncoding {
    /// `true` for preliminary periods.
    Preliminary,
    /// `actual`, `pre` or `pro`.
    Code,
}

/// Output columns produced by [`unpivot_periods`].
#[derive(Debug, Clone, Copy)]
pub struct UnpivotColumns {
    pub value: &'static str,
    pub period: &'static str,
    pub flag: &'static str,
    pub flag_encoding: FlagEncoding,
}

/// Splits labels into index columns and period (measure) columns.
pub fn partition_columns(df: &DataFrame, pattern: &PeriodPattern) -> (Vec<String>, Vec<String>) {
    column_names(df)
        .into_iter()
        .partition(|label| !pattern.matches(label))
}

/// Un-pivots every period column into rows.
///
/// A table with `R` rows and `M` period columns yields `R * M` rows: the
/// index columns repeated once per period column, followed by the value,
/// the Int32 year and the flag. No rows are dropped; values that do not
/// parse become null.
pub fn unpivot_periods(
    df: &DataFrame,
    pattern: &PeriodPattern,
    output: &UnpivotColumns,
) -> Result<DataFrame> {
    let (index_columns, measure_columns) = partition_columns(df, pattern);
    let index = df
        .select(index_columns.iter().map(String::as_str))
        .map_err(ErcError::transformation)?;

    let rows = df.height();
    let capacity = rows * measure_columns.len();
    let mut long = index.slice(0, 0);
    let mut values: Vec<Option<f64>> = Vec::with_capacity(capacity);
    let mut years: Vec<Option<i32>> = Vec::with_capacity(capacity);
    let mut flags: Vec<PeriodFlag> = Vec::with_capacity(capacity);

    for label in &measure_columns {
        let column = df.column(label).map_err(ErcError::transformation)?;
        let year = PeriodPattern::year(label);
        let flag = PeriodFlag::from_label(label);
        debug!(column = %label, year, flag = flag.as_str(), "un-pivoting period column");
        for idx in 0..rows {
            let cell = column.get(idx).map_err(ErcError::transformation)?;
            values.push(any_to_decimal(cell));
            years.push(year);
            flags.push(flag);
        }
        long.vstack_mut(&index).map_err(ErcError::transformation)?;
    }

    long.with_column(Series::new(output.value.into(), values).into_column())
        .map_err(ErcError::transformation)?;
    long.with_column(Series::new(output.period.into(), years).into_column())
        .map_err(ErcError::transformation)?;
    let flag_series = match output.flag_encoding {
        FlagEncoding::Preliminary => Series::new(
            output.flag.into(),
            flags.iter().map(|flag| flag.is_preliminary()).collect::<Vec<bool>>(),
        ),
        FlagEncoding::Code => Series::new(
            output.flag.into(),
            flags.iter().map(|flag| flag.code()).collect::<Vec<&str>>(),
        ),
    };
    long.with_column(flag_series.into_column())
        .map_err(ErcError::transformation)?;

    debug!(
        input_rows = rows,
        period_columns = measure_columns.len(),
        output_rows = long.height(),
        "unpivoted period columns"
    );
    Ok(long)
}

/// Sums `measure` per distinct `keys` tuple, keeping first-seen group order.
///
/// The measure is parsed as a decimal first. Nulls are skipped, so a group
/// with only null values sums to zero. Columns outside `keys` are dropped.
pub fn aggregate_sum(df: DataFrame, keys: &[&str], measure: &str) -> Result<DataFrame> {
    let input_rows = df.height();
    let df = with_decimal_column(df, measure).map_err(ErcError::transformation)?;
    let group_keys: Vec<Expr> = keys.iter().map(|key| col(*key)).collect();
    let aggregated = df
        .lazy()
        .group_by_stable(group_keys)
        .agg([col(measure).sum()])
        .collect()
        .map_err(ErcError::transformation)?;
    debug!(
        input_rows,
        groups = aggregated.height(),
        measure,
        "aggregated duplicate keys"
    );
    Ok(aggregated)
}
