use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AlignError, Result};
use crate::model::dataset::StructuredDataset;
use crate::model::key::{canonical_id, compare_ids};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CoverageIssue {
    pub chapter_id: String,
    pub code: String,
    pub message: String,
}

/// Expected verses per chapter, keyed by canonical chapter id.
pub type ExpectedCounts = BTreeMap<String, usize>;

/// Reads `{ "2": 286 }` or `{ "2": { "nAyah": 286, ... } }`.
pub fn expected_counts_from_value(value: Value) -> Result<ExpectedCounts> {
    let Value::Object(map) = value else {
        return Err(AlignError::malformed(
            "expected counts root",
            "expected an object keyed by chapter",
        ));
    };

    let mut out = ExpectedCounts::new();
    for (chapter, entry) in map {
        let count = match &entry {
            Value::Number(n) => n.as_u64(),
            Value::Object(info) => info.get("nAyah").and_then(Value::as_u64),
            _ => None,
        };

        let Some(count) = count else {
            return Err(AlignError::malformed(
                format!("expected counts / chapter {chapter}"),
                "expected a verse count or an object with `nAyah`",
            ));
        };
        out.insert(canonical_id(&chapter), count as usize);
    }

    Ok(out)
}

/// Checks verse coverage of the dataset. Issues are findings, not errors.
pub fn run(dataset: &StructuredDataset, expected: &ExpectedCounts) -> Vec<CoverageIssue> {
    let mut issues: Vec<CoverageIssue> = Vec::new();
    let mut actual: BTreeMap<String, usize> = BTreeMap::new();

    for v in dataset.verses() {
        *actual.entry(v.chapter.id.clone()).or_insert(0) += 1;

        if v.verse.text.trim().is_empty() {
            issues.push(CoverageIssue {
                chapter_id: v.chapter.id.clone(),
                code: "EMPTY_VERSE".to_string(),
                message: format!(
                    "verse {}:{} on page {} has no text",
                    v.chapter.id, v.verse.id, v.page_id
                ),
            });
        }
    }

    for (chapter, &want) in expected {
        match actual.get(chapter) {
            None => issues.push(CoverageIssue {
                chapter_id: chapter.clone(),
                code: "MISSING_CHAPTER".to_string(),
                message: format!("chapter {chapter}: expected {want} verses, found none"),
            }),
            Some(&found) if found != want => issues.push(CoverageIssue {
                chapter_id: chapter.clone(),
                code: "VERSE_COUNT_MISMATCH".to_string(),
                message: format!("chapter {chapter}: expected {want} verses, found {found}"),
            }),
            Some(_) => {}
        }
    }

    for (chapter, &found) in &actual {
        if !expected.contains_key(chapter) {
            issues.push(CoverageIssue {
                chapter_id: chapter.clone(),
                code: "UNEXPECTED_CHAPTER".to_string(),
                message: format!("chapter {chapter} has {found} verses but no expected count"),
            });
        }
    }

    issues.sort_by(|a, b| compare_ids(&a.chapter_id, &b.chapter_id).then_with(|| a.code.cmp(&b.code)));

    if issues.is_empty() {
        tracing::info!(chapters = actual.len(), "coverage verified");
    } else {
        tracing::warn!(issues = issues.len(), "coverage issues found");
    }

    issues
}
