//! Game build variants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which build of the game a feed describes.
///
/// The variant selects both the data file and the subset of visible columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Evrima,
    Hordetest,
}

impl Variant {
    /// Lowercase identifier used in file names and settings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Evrima => "evrima",
            Self::Hordetest => "hordetest",
        }
    }

    /// Feed file name for this variant, relative to the data directory.
    pub fn file_name(&self) -> String {
        format!("dinosaurs_{}.yaml", self.as_str())
    }

    /// The other variant.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Evrima => Self::Hordetest,
            Self::Hordetest => Self::Evrima,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown variant name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant '{0}' (expected 'evrima' or 'hordetest')")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    /// Anything mentioning "hordetest" selects it; matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower.contains("hordetest") {
            Ok(Self::Hordetest)
        } else if lower == "evrima" {
            Ok(Self::Evrima)
        } else {
            Err(UnknownVariant(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("Evrima".parse::<Variant>(), Ok(Variant::Evrima));
        assert_eq!("hordetest-2".parse::<Variant>(), Ok(Variant::Hordetest));
        assert!("legacy".parse::<Variant>().is_err());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(Variant::Hordetest.file_name(), "dinosaurs_hordetest.yaml");
        assert_eq!(Variant::Evrima.toggled(), Variant::Hordetest);
    }
}
