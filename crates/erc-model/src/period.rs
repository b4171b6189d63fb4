use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a period column, read from the suffix of its label.
///
/// | Label suffix    | Flag          |
/// |-----------------|---------------|
/// | `-p`, `pre`     | `Preliminary` |
/// | `pro`           | `Projected`   |
/// | none            | `Actual`      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodFlag {
    #[default]
    Actual,
    Preliminary,
    Projected,
}

impl PeriodFlag {
    /// Reads the flag from a period label such as `2020-p`, `1994_pre` or `2026pro`.
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        if lower.ends_with("-p") || lower.ends_with("pre") {
            Self::Preliminary
        } else if lower.ends_with("pro") {
            Self::Projected
        } else {
            Self::Actual
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Actual => "actual",
            Self::Preliminary => "preliminary",
            Self::Projected => "projected",
        }
    }

    /// Short code stored in destination tables.
    pub fn code(self) -> &'static str {
        match self {
            Self::Actual => "actual",
            Self::Preliminary => "pre",
            Self::Projected => "pro",
        }
    }

    pub fn is_preliminary(self) -> bool {
        matches!(self, Self::Preliminary)
    }
}

impl fmt::Display for PeriodFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
