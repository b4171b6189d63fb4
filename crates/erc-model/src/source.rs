//! Data sources handled by the pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One economic-indicator data source. Each source has exactly one
/// transformer and one fixed destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Monthly traveller counts.
    Turismo,
    /// Foreign direct investment flows, one column per year.
    Inversion,
    /// Services trade, monthly.
    Servicios,
    /// Goods trade, one column per year.
    Bienes,
}

impl DataSource {
    pub const ALL: [DataSource; 4] = [
        DataSource::Turismo,
        DataSource::Inversion,
        DataSource::Servicios,
        DataSource::Bienes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Turismo => "turismo",
            Self::Inversion => "inversion",
            Self::Servicios => "servicios",
            Self::Bienes => "bienes",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Turismo => "Tourism arrivals and departures",
            Self::Inversion => "Foreign direct investment",
            Self::Servicios => "Services trade",
            Self::Bienes => "Goods trade",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == wanted)
            .ok_or_else(|| format!("unknown data source: {s}"))
    }
}
