use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::dataset::StructuredDataset;
use crate::model::key::VerseKey;
use crate::services::index::VerseIndex;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Verses whose text was replaced with different text.
    pub replaced: usize,
    /// Overlapping verses that already had the correction text.
    pub identical: usize,
    /// Verses with no correction.
    pub untouched: usize,
    /// Correction keys that matched no verse of the dataset.
    pub unmatched_keys: Vec<VerseKey>,
    pub before_digest: String,
    pub after_digest: String,
}

/// Overwrites every verse whose key is in `corrections`, in place.
///
/// No verse is added or removed and non-verse fields are not touched, so the
/// result depends only on the overlapping keys.
pub fn merge(dataset: &mut StructuredDataset, corrections: &VerseIndex) -> MergeReport {
    let mut report = MergeReport {
        before_digest: dataset.digest(),
        ..MergeReport::default()
    };

    let mut used: HashSet<VerseKey> = HashSet::new();

    for page in &mut dataset.pages {
        for chapter in &mut page.chapters {
            for verse in &mut chapter.verses {
                let key = VerseKey {
                    chapter: chapter.id.clone(),
                    verse: verse.id.clone(),
                };

                let Some(text) = corrections.get(&key) else {
                    report.untouched += 1;
                    continue;
                };

                if verse.text == *text {
                    report.identical += 1;
                } else {
                    tracing::trace!(%key, page = %page.page_id, "replacing verse text");
                    verse.text.clone_from(text);
                    report.replaced += 1;
                }
                used.insert(key);
            }
        }
    }

    for key in corrections.keys() {
        if !used.contains(key) {
            tracing::warn!(%key, "correction matches no verse in the dataset");
            report.unmatched_keys.push(key.clone());
        }
    }

    report.after_digest = dataset.digest();

    tracing::info!(
        replaced = report.replaced,
        identical = report.identical,
        untouched = report.untouched,
        unmatched = report.unmatched_keys.len(),
        "merge finished"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::index::flatten;
    use serde_json::json;

    fn dataset() -> StructuredDataset {
        StructuredDataset::from_value(json!({
            "40": { "sura": { "2": {
                "verses": { "254": "O you who believe", "255": "Allah! There is no deity except Him" },
                "titles": { "255": "Throne verse" }
            } } },
            "41": { "sura": { "2": { "verses": { "256": "There is no compulsion" } } } }
        }))
        .unwrap()
    }

    fn corrections(entries: &[(&str, &str, &str)]) -> VerseIndex {
        entries
            .iter()
            .map(|(c, v, t)| (VerseKey::new(c, v), t.to_string()))
            .collect()
    }

    #[test]
    fn replaces_only_overlapping_verses() {
        let mut ds = dataset();
        let before = flatten(&ds).unwrap();

        let fix = corrections(&[("2", "255", "GOD: there is no god except He")]);
        let report = merge(&mut ds, &fix);

        let after = flatten(&ds).unwrap();
        assert_eq!(after[&VerseKey::new("2", "255")], "GOD: there is no god except He");
        for (key, text) in &before {
            if key != &VerseKey::new("2", "255") {
                assert_eq!(&after[key], text);
            }
        }

        assert_eq!(report.replaced, 1);
        assert_eq!(report.untouched, 2);
        assert!(report.unmatched_keys.is_empty());
        assert_ne!(report.before_digest, report.after_digest);
        assert_eq!(ds.verse_count(), 3);
    }

    #[test]
    fn is_idempotent() {
        let fix = corrections(&[("2", "254", "O you who believed"), ("2", "256", "No compulsion")]);

        let mut once = dataset();
        merge(&mut once, &fix);

        let mut twice = once.clone();
        let second = merge(&mut twice, &fix);

        assert_eq!(once, twice);
        assert_eq!(second.replaced, 0);
        assert_eq!(second.identical, 2);
        assert_eq!(second.before_digest, second.after_digest);
    }

    #[test]
    fn matches_padded_keys() {
        let mut ds = StructuredDataset::from_value(json!({
            "1": { "sura": { "002": { "verses": { "005": "old" } } } }
        }))
        .unwrap();

        merge(&mut ds, &corrections(&[("2", "5", "new")]));
        assert_eq!(
            ds.to_value(),
            json!({ "1": { "sura": { "002": { "verses": { "005": "new" } } } } })
        );
    }

    #[test]
    fn reports_unmatched_correction_keys() {
        let mut ds = dataset();
        let report = merge(&mut ds, &corrections(&[("2", "300", "x"), ("114", "1", "y")]));

        let keys: Vec<String> = report.unmatched_keys.iter().map(ToString::to_string).collect();
        assert_eq!(keys, ["2:300", "114:1"]);
        assert_eq!(report.replaced, 0);
        assert_eq!(ds, dataset());
    }

    #[test]
    fn leaves_non_verse_fields_alone() {
        let mut ds = dataset();
        merge(&mut ds, &corrections(&[("2", "255", "changed")]));

        let value = ds.to_value();
        assert_eq!(value["40"]["sura"]["2"]["titles"]["255"], "Throne verse");
    }
}
