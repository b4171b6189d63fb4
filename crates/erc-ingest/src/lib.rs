//! File loading for the ERC ingestion pipeline.
//!
//! Maps a file extension to a decoder and produces a polars `DataFrame` with
//! the file's headers untouched. Label normalization happens later, in the
//! transformation pipeline.

pub mod csv_table;
pub mod format;
pub mod loader;
pub mod spreadsheet;

pub use csv_table::{CsvTable, read_csv_bytes};
pub use format::SupportedFormat;
pub use loader::{load_bytes, load_file};
pub use spreadsheet::read_spreadsheet_bytes;
