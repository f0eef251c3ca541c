//! Flattening of paginated verse data into a `chapter:verse -> text` index.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::error::{AlignError, Result};
use crate::model::dataset::StructuredDataset;
use crate::model::key::VerseKey;

/// Canonical `chapter:verse -> text` lookup, ordered by key.
pub type VerseIndex = BTreeMap<VerseKey, String>;

/// Flattens a structured dataset. Every verse is carried through as-is;
/// a key seen twice is an error since it breaks verse uniqueness.
pub fn flatten(dataset: &StructuredDataset) -> Result<VerseIndex> {
    let mut index = VerseIndex::new();
    let mut seen_on: HashMap<VerseKey, &str> = HashMap::with_capacity(dataset.verse_count());

    for v in dataset.verses() {
        let key = v.key();

        if let Some(first_page) = seen_on.get(&key) {
            return Err(AlignError::DuplicateVerse {
                key: key.to_string(),
                first_page: (*first_page).to_string(),
                second_page: v.page_id.to_string(),
            });
        }

        seen_on.insert(key.clone(), v.page_id);
        index.insert(key, v.verse.text.clone());
    }

    tracing::debug!(verses = index.len(), pages = dataset.pages.len(), "flattened dataset");
    Ok(index)
}

/// Writes index text back into a copy of `template`, keeping its page
/// boundaries and every non-verse field.
pub fn renest(template: &StructuredDataset, index: &VerseIndex) -> Result<StructuredDataset> {
    let mut out = template.clone();

    for page in &mut out.pages {
        for chapter in &mut page.chapters {
            for verse in &mut chapter.verses {
                let key = VerseKey {
                    chapter: chapter.id.clone(),
                    verse: verse.id.clone(),
                };
                match index.get(&key) {
                    Some(text) => verse.text.clone_from(text),
                    None => {
                        return Err(AlignError::MissingVerse {
                            key: key.to_string(),
                        })
                    }
                }
            }
        }
    }

    Ok(out)
}

/// Verse count per chapter.
pub fn chapter_counts(index: &VerseIndex) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for key in index.keys() {
        *counts.entry(key.chapter.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset() -> StructuredDataset {
        StructuredDataset::from_value(json!({
            "40": { "sura": { "2": { "verses": {
                "254": "a",
                "255": "Allah! There is no deity except Him"
            } } } },
            "41": { "sura": {
                "2": { "verses": { "256": "c" }, "titles": { "256": "No compulsion" } },
                "3": { "verses": { "1": "A.L.M." } }
            } }
        }))
        .unwrap()
    }

    #[test]
    fn flattens_across_pages() {
        let index = flatten(&dataset()).unwrap();
        assert_eq!(index.len(), 4);
        assert_eq!(
            index[&VerseKey::new("2", "255")],
            "Allah! There is no deity except Him"
        );

        let counts = chapter_counts(&index);
        assert_eq!(counts["2"], 3);
        assert_eq!(counts["3"], 1);
    }

    #[test]
    fn flatten_then_renest_is_identity() {
        let original = dataset();
        let index = flatten(&original).unwrap();
        let rebuilt = renest(&original, &index).unwrap();

        assert_eq!(rebuilt, original);
        assert_eq!(
            serde_json::to_string(&rebuilt).unwrap(),
            serde_json::to_string(&original).unwrap()
        );
    }

    #[test]
    fn renest_requires_every_key() {
        let original = dataset();
        let mut index = flatten(&original).unwrap();
        index.remove(&VerseKey::new("3", "1"));

        let err = renest(&original, &index).unwrap_err();
        assert!(matches!(err, AlignError::MissingVerse { ref key } if key == "3:1"));
    }

    #[test]
    fn duplicate_key_is_reported_with_pages() {
        let dup = StructuredDataset::from_value(json!({
            "1": { "sura": { "2": { "verses": { "5": "x" } } } },
            "2": { "sura": { "02": { "verses": { "005": "y" } } } }
        }))
        .unwrap();

        let err = flatten(&dup).unwrap_err().to_string();
        assert!(err.contains("2:5"), "{err}");
        assert!(err.contains("page 1") && err.contains("page 2"), "{err}");
    }
}
