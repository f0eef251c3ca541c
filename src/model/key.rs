use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AlignError;

/// Verse id used by sources for chapter headers (basmala), never a real verse.
pub const HEADER_VERSE_ID: &str = "0";

/// Canonical form of a chapter or verse id.
///
/// Whitespace is trimmed and all-digit ids lose their leading zeros, so
/// `" 007"`, `"7"` and `7` all become `"7"`. Anything else stays opaque.
pub fn canonical_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = trimmed.trim_start_matches('0');
        if stripped.is_empty() {
            return "0".to_string();
        }
        return stripped.to_string();
    }
    trimmed.to_string()
}

/// Orders ids numerically when both are numeric, numeric ids first otherwise.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match (numeric(a), numeric(b)) {
        // canonical numeric ids have no leading zeros, so length orders first
        (true, true) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerseKey {
    pub chapter: String,
    pub verse: String,
}

impl VerseKey {
    pub fn new(chapter: &str, verse: &str) -> Self {
        Self {
            chapter: canonical_id(chapter),
            verse: canonical_id(verse),
        }
    }

    pub fn is_header(&self) -> bool {
        self.verse == HEADER_VERSE_ID
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}

impl FromStr for VerseKey {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AlignError::InvalidReference {
            reference: s.to_string(),
        };

        let (chapter, verse) = s.split_once(':').ok_or_else(invalid)?;
        if chapter.trim().is_empty() || verse.trim().is_empty() || verse.contains(':') {
            return Err(invalid());
        }

        Ok(Self::new(chapter, verse))
    }
}

impl Ord for VerseKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_ids(&self.chapter, &other.chapter)
            .then_with(|| compare_ids(&self.verse, &other.verse))
    }
}

impl PartialOrd for VerseKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for VerseKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VerseKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Id fields arrive as either JSON strings or numbers.
pub(crate) fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
