use std::path::Path;

use polars::prelude::DataFrame;
use tracing::{debug, info};

use erc_model::{ErcError, Result};

use crate::csv_table::read_csv_bytes;
use crate::format::SupportedFormat;
use crate::spreadsheet::read_spreadsheet_bytes;

/// Loads a CSV or spreadsheet file from disk.
pub fn load_file(path: &Path) -> Result<DataFrame> {
    let file_name = path.display().to_string();
    let format = SupportedFormat::from_file_name(&file_name)?;
    let bytes = std::fs::read(path).map_err(|err| ErcError::file_read(&file_name, err))?;
    load_format(&file_name, format, bytes)
}

/// Loads an uploaded file held in memory. The format comes from the
/// extension of `file_name`.
pub fn load_bytes(file_name: &str, bytes: Vec<u8>) -> Result<DataFrame> {
    let format = SupportedFormat::from_file_name(file_name)?;
    load_format(file_name, format, bytes)
}

fn load_format(file_name: &str, format: SupportedFormat, bytes: Vec<u8>) -> Result<DataFrame> {
    debug!(file = file_name, %format, bytes = bytes.len(), "decoding file");
    let df = match format {
        SupportedFormat::Csv => read_csv_bytes(&bytes)
            .map_err(|err| ErcError::file_read(file_name, err))?
            .into_frame()
            .map_err(|err| ErcError::file_read(file_name, err))?,
        SupportedFormat::Xlsx | SupportedFormat::Xls | SupportedFormat::Xlsb => {
            read_spreadsheet_bytes(bytes).map_err(|err| ErcError::file_read(file_name, err))?
        }
    };
    info!(
        file = file_name,
        %format,
        rows = df.height(),
        columns = df.width(),
        "loaded file"
    );
    Ok(df)
}
