use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::{AlignError, Result};
use crate::model::key::{canonical_id, VerseKey};

const SURA_FIELD: &str = "sura";
const VERSES_FIELD: &str = "verses";

/// Page-organized translation store: `page -> sura -> chapter -> verses`.
///
/// Only verse text is modeled. Every other field (titles, notes, page
/// headers, ...) is kept verbatim in `fields` and written back in its
/// original position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructuredDataset {
    pub pages: Vec<DatasetPage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetPage {
    pub page_id: String,
    pub chapters: Vec<Chapter>,
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    /// Canonical id used for matching.
    pub id: String,
    /// Key exactly as it appeared in the source.
    pub raw_id: String,
    pub verses: Vec<StructuredVerse>,
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructuredVerse {
    pub id: String,
    pub raw_id: String,
    pub text: String,
}

/// Read-only view of one verse with its position in the dataset.
#[derive(Debug, Clone, Copy)]
pub struct VerseRef<'a> {
    pub page_id: &'a str,
    pub chapter: &'a Chapter,
    pub verse: &'a StructuredVerse,
}

impl VerseRef<'_> {
    pub fn key(&self) -> VerseKey {
        VerseKey {
            chapter: self.chapter.id.clone(),
            verse: self.verse.id.clone(),
        }
    }
}

impl StructuredDataset {
    /// Parses the nested JSON shape, failing on the first malformed record.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(AlignError::malformed(
                "dataset root",
                "expected an object keyed by page",
            ));
        };

        let mut pages = Vec::with_capacity(root.len());
        for (page_id, page_value) in root {
            pages.push(parse_page(page_id, page_value)?);
        }

        Ok(Self { pages })
    }

    pub fn to_value(&self) -> Value {
        let mut root = Map::with_capacity(self.pages.len());
        for page in &self.pages {
            root.insert(page.page_id.clone(), Value::Object(page.to_map()));
        }
        Value::Object(root)
    }

    pub fn verses(&self) -> impl Iterator<Item = VerseRef<'_>> {
        self.pages.iter().flat_map(|page| {
            page.chapters.iter().flat_map(move |chapter| {
                chapter.verses.iter().map(move |verse| VerseRef {
                    page_id: &page.page_id,
                    chapter,
                    verse,
                })
            })
        })
    }

    pub fn verse_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| &p.chapters)
            .map(|c| c.verses.len())
            .sum()
    }

    #[cfg(test)]
    pub fn text(&self, key: &VerseKey) -> Option<&str> {
        self.verses()
            .find(|v| v.chapter.id == key.chapter && v.verse.id == key.verse)
            .map(|v| v.verse.text.as_str())
    }

    /// SHA-256 over every verse key and text, in dataset order.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for v in self.verses() {
            hasher.update(v.chapter.id.as_bytes());
            hasher.update(b":");
            hasher.update(v.verse.id.as_bytes());
            hasher.update(b"\t");
            hasher.update(v.verse.text.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

impl DatasetPage {
    fn to_map(&self) -> Map<String, Value> {
        let mut sura = Map::with_capacity(self.chapters.len());
        for chapter in &self.chapters {
            sura.insert(chapter.raw_id.clone(), Value::Object(chapter.to_map()));
        }

        let mut out = self.fields.clone();
        // insert on an existing key keeps its position
        out.insert(SURA_FIELD.to_string(), Value::Object(sura));
        out
    }
}

impl Chapter {
    fn to_map(&self) -> Map<String, Value> {
        let mut verses = Map::with_capacity(self.verses.len());
        for v in &self.verses {
            verses.insert(v.raw_id.clone(), Value::String(v.text.clone()));
        }

        let mut out = self.fields.clone();
        out.insert(VERSES_FIELD.to_string(), Value::Object(verses));
        out
    }
}

fn parse_page(page_id: String, value: Value) -> Result<DatasetPage> {
    let location = format!("page {page_id}");

    let Value::Object(mut fields) = value else {
        return Err(AlignError::malformed(location, "page is not an object"));
    };

    let sura = match fields.get_mut(SURA_FIELD).map(Value::take) {
        Some(Value::Object(sura)) => sura,
        Some(_) => return Err(AlignError::malformed(location, "`sura` is not an object")),
        None => return Err(AlignError::malformed(location, "missing field `sura`")),
    };

    let mut chapters = Vec::with_capacity(sura.len());
    for (raw_id, chapter_value) in sura {
        chapters.push(parse_chapter(&page_id, raw_id, chapter_value)?);
    }

    Ok(DatasetPage {
        page_id,
        chapters,
        fields,
    })
}

fn parse_chapter(page_id: &str, raw_id: String, value: Value) -> Result<Chapter> {
    let location = format!("page {page_id} / chapter {raw_id}");

    let Value::Object(mut fields) = value else {
        return Err(AlignError::malformed(location, "chapter is not an object"));
    };

    let raw_verses = match fields.get_mut(VERSES_FIELD).map(Value::take) {
        Some(Value::Object(verses)) => verses,
        Some(_) => return Err(AlignError::malformed(location, "`verses` is not an object")),
        None => return Err(AlignError::malformed(location, "missing field `verses`")),
    };

    let mut verses = Vec::with_capacity(raw_verses.len());
    for (verse_id, text) in raw_verses {
        let Value::String(text) = text else {
            return Err(AlignError::malformed(
                format!("{location} / verse {verse_id}"),
                "verse text is not a string",
            ));
        };
        verses.push(StructuredVerse {
            id: canonical_id(&verse_id),
            raw_id: verse_id,
            text,
        });
    }

    Ok(Chapter {
        id: canonical_id(&raw_id),
        raw_id,
        verses,
        fields,
    })
}

impl Serialize for StructuredDataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StructuredDataset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "23": {
                "page": ["Sura 1: The Key"],
                "sura": {
                    "1": {
                        "encrypted": {},
                        "verses": { "1": "In the name of GOD", "2": "Praise be to GOD" },
                        "titles": { "1": "The Key" }
                    }
                },
                "notes": { "data": ["*1:1 note"] }
            }
        })
    }

    #[test]
    fn round_trips_unknown_fields_in_place() {
        let value = sample();
        let dataset = StructuredDataset::from_value(value.clone()).unwrap();

        assert_eq!(dataset.verse_count(), 2);
        let out = dataset.to_value();
        assert_eq!(out, value);
        assert_eq!(
            serde_json::to_string(&out).unwrap(),
            serde_json::to_string(&value).unwrap()
        );
    }

    #[test]
    fn canonicalizes_ids_but_keeps_raw_keys() {
        let value = json!({ "1": { "sura": { "002": { "verses": { "05": "text" } } } } });
        let dataset = StructuredDataset::from_value(value.clone()).unwrap();

        assert_eq!(dataset.text(&VerseKey::new("2", "5")), Some("text"));
        assert_eq!(dataset.to_value(), value);
    }

    #[test]
    fn missing_verses_names_location() {
        let value = json!({ "40": { "sura": { "3": { "titles": {} } } } });
        let err = StructuredDataset::from_value(value).unwrap_err().to_string();
        assert!(err.contains("page 40 / chapter 3"), "{err}");
        assert!(err.contains("verses"), "{err}");
    }

    #[test]
    fn missing_sura_fails() {
        let err = StructuredDataset::from_value(json!({ "7": { "notes": {} } })).unwrap_err();
        assert!(matches!(err, AlignError::Malformed { .. }));
    }

    #[test]
    fn non_string_verse_fails() {
        let value = json!({ "1": { "sura": { "1": { "verses": { "4": 12 } } } } });
        let err = StructuredDataset::from_value(value).unwrap_err().to_string();
        assert!(err.contains("verse 4"), "{err}");
    }

    #[test]
    fn digest_tracks_text() {
        let mut dataset = StructuredDataset::from_value(sample()).unwrap();
        let before = dataset.digest();
        assert_eq!(before, dataset.clone().digest());

        dataset.pages[0].chapters[0].verses[0].text = "changed".into();
        assert_ne!(before, dataset.digest());
    }
}
