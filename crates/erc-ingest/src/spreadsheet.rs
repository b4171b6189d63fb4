//! First-worksheet decoding for xlsx, xls and xlsb workbooks.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

/// Typed cell read from a worksheet.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Cell {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => Self::Null,
            Data::Int(v) => Self::Int(*v),
            Data::Float(v) => Self::Float(*v),
            Data::Bool(v) => Self::Bool(*v),
            Data::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Self::Null
                } else {
                    Self::Text(trimmed.to_string())
                }
            }
            other => Self::Text(other.to_string()),
        }
    }

    fn as_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Int(v) => Some(v.to_string()),
            Self::Float(v) => Some(v.to_string()),
            Self::Bool(v) => Some(v.to_string()),
            Self::Text(s) => Some(s.clone()),
        }
    }
}

fn is_whole(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15
}

/// Builds one column, keeping the narrowest type every non-null cell fits.
///
/// Whole-valued floats become Int64, numeric mixes become Float64, anything
/// else mixed falls back to strings.
fn build_column(name: &str, cells: &[Cell]) -> Column {
    let values = cells.iter().filter(|cell| **cell != Cell::Null);
    let all_bool = values.clone().all(|cell| matches!(cell, Cell::Bool(_)));
    let all_numeric = values
        .clone()
        .all(|cell| matches!(cell, Cell::Int(_) | Cell::Float(_)));
    let all_whole = values.clone().all(|cell| match cell {
        Cell::Int(_) => true,
        Cell::Float(v) => is_whole(*v),
        _ => false,
    });
    let has_values = values.clone().next().is_some();

    let series = if has_values && all_whole {
        let ints: Vec<Option<i64>> = cells
            .iter()
            .map(|cell| match cell {
                Cell::Int(v) => Some(*v),
                Cell::Float(v) => Some(*v as i64),
                _ => None,
            })
            .collect();
        Series::new(name.into(), ints)
    } else if has_values && all_numeric {
        let floats: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| match cell {
                Cell::Int(v) => Some(*v as f64),
                Cell::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name.into(), floats)
    } else if has_values && all_bool {
        let bools: Vec<Option<bool>> = cells
            .iter()
            .map(|cell| match cell {
                Cell::Bool(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name.into(), bools)
    } else {
        let text: Vec<Option<String>> = cells.iter().map(Cell::as_text).collect();
        Series::new(name.into(), text)
    };
    series.into_column()
}

fn header_label(data: Option<&Data>, idx: usize) -> String {
    let label = data.map(|cell| cell.to_string().trim().to_string()).unwrap_or_default();
    if label.is_empty() {
        format!("column_{}", idx + 1)
    } else {
        label
    }
}

/// Reads the first worksheet of a workbook into a frame. The first row is
/// the header row; fully empty rows are skipped.
pub fn read_spreadsheet_bytes(bytes: Vec<u8>) -> Result<DataFrame, String> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|err| err.to_string())?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| "workbook has no worksheets".to_string())?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|err| err.to_string())?;

    let mut rows = range.rows().filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)));
    let Some(header_row) = rows.next() else {
        return DataFrame::new(Vec::new()).map_err(|err| err.to_string());
    };
    let headers: Vec<String> = (0..header_row.len())
        .map(|idx| header_label(header_row.get(idx), idx))
        .collect();

    let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(row.get(idx).map_or(Cell::Null, Cell::from_data));
        }
    }

    let columns: Vec<Column> = headers
        .iter()
        .zip(&columns)
        .map(|(name, cells)| build_column(name, cells))
        .collect();
    DataFrame::new(columns).map_err(|err| err.to_string())
}
