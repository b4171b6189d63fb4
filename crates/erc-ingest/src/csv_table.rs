use csv::ReaderBuilder;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};

/// Raw CSV contents: one header row and string cells.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Builds a frame of string columns; empty cells become null.
    pub fn into_frame(self) -> PolarsResult<DataFrame> {
        let columns: Vec<Column> = self
            .headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let values: Vec<Option<&str>> = self
                    .rows
                    .iter()
                    .map(|row| row.get(idx).map(String::as_str).filter(|v| !v.is_empty()))
                    .collect();
                Series::new(header.as_str().into(), values).into_column()
            })
            .collect();
        DataFrame::new(columns)
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Label for a header cell; blank headers get a positional name.
fn header_label(raw: &str, idx: usize) -> String {
    let cell = normalize_cell(raw);
    if cell.is_empty() {
        format!("column_{}", idx + 1)
    } else {
        cell
    }
}

/// Parses CSV bytes. The first non-blank record is the header row; blank
/// records are skipped and short records are padded.
pub fn read_csv_bytes(bytes: &[u8]) -> csv::Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        raw_rows.push(row);
    }
    let mut rows_iter = raw_rows.into_iter();
    let Some(header_row) = rows_iter.next() else {
        return Ok(CsvTable::default());
    };
    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(idx, value)| header_label(value, idx))
        .collect();
    let rows = rows_iter
        .map(|mut record| {
            record.resize(headers.len(), String::new());
            record
        })
        .collect();
    Ok(CsvTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_rows_and_pads_short_records() {
        let input = "\u{feff}Año , Mes,Viajeros\n\n,,\n2024,1,10\n2024,2\n";
        let table = read_csv_bytes(input.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Año", "Mes", "Viajeros"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["2024".to_string(), "1".to_string(), "10".to_string()],
                vec!["2024".to_string(), "2".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn empty_input_has_no_headers() {
        let table = read_csv_bytes(b"\n\n").unwrap();
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn empty_cells_become_null() {
        let table = read_csv_bytes(b"pais,valor\nChile,\n").unwrap();
        let df = table.into_frame().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.column("valor").unwrap().null_count(), 1);
    }

    #[test]
    fn blank_header_cells_get_positional_names() {
        let table = read_csv_bytes(b"pais,,2019\nChile,x,1\n").unwrap();
        assert_eq!(table.headers, vec!["pais", "column_2", "2019"]);
    }
}
