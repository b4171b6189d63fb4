use std::fmt;
use std::path::Path;

use erc_model::{ErcError, Result};

/// File formats the loader can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedFormat {
    Csv,
    Xlsx,
    Xls,
    Xlsb,
}

impl SupportedFormat {
    pub const ALL: [SupportedFormat; 4] = [Self::Csv, Self::Xlsx, Self::Xls, Self::Xlsb];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Xlsb => "xlsb",
        }
    }

    pub fn is_spreadsheet(self) -> bool {
        !matches!(self, Self::Csv)
    }

    /// Resolves the format from an extension, ignoring case and a leading dot.
    pub fn from_extension(extension: &str) -> Result<Self> {
        let wanted = extension.trim().trim_start_matches('.').to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == wanted)
            .ok_or_else(|| ErcError::UnsupportedFileFormat {
                extension: wanted,
                supported: Self::ALL
                    .iter()
                    .map(|format| format.extension().to_string())
                    .collect(),
            })
    }

    /// Resolves the format from a file name or path.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }
}

impl fmt::Display for SupportedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
