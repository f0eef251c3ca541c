use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::key::deserialize_id;

/// One verse from an external, verse-indexed translation dump.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CorrectionEntry {
    #[serde(alias = "sura", alias = "sure", alias = "chapter", deserialize_with = "deserialize_id")]
    pub chapter_id: String,

    #[serde(alias = "verse", alias = "ayah", alias = "ayet", deserialize_with = "deserialize_id")]
    pub verse_id: String,

    #[serde(alias = "metin")]
    pub text: String,
}

/// Shape of a correction source. Always given explicitly, never sniffed.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectionFormat {
    /// Flat array of `{ chapter_id, verse_id, text }` records.
    Records,
    /// Same page-nested shape as the structured dataset.
    #[default]
    Paginated,
    /// `{ "chapter:verse": text }`, as written by the locator.
    ReferenceMap,
}

impl CorrectionFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            CorrectionFormat::Records => "records",
            CorrectionFormat::Paginated => "paginated",
            CorrectionFormat::ReferenceMap => "reference-map",
        }
    }
}

impl fmt::Display for CorrectionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrectionFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "records" => Ok(CorrectionFormat::Records),
            "paginated" => Ok(CorrectionFormat::Paginated),
            "reference-map" | "reference_map" => Ok(CorrectionFormat::ReferenceMap),
            other => Err(format!(
                "unknown correction format '{other}' (expected records, paginated or reference-map)"
            )),
        }
    }
}
