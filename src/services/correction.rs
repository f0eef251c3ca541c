//! Adapters from each known correction-source shape to a [`VerseIndex`].

use serde_json::Value;

use crate::error::{AlignError, Result};
use crate::model::correction::{CorrectionEntry, CorrectionFormat};
use crate::model::dataset::StructuredDataset;
use crate::model::key::VerseKey;
use crate::services::index::{self, VerseIndex};

/// Converts a parsed correction source using the format it was declared as.
pub fn from_value(value: Value, format: CorrectionFormat) -> Result<VerseIndex> {
    let index = match format {
        CorrectionFormat::Records => from_records_value(value)?,
        CorrectionFormat::Paginated => from_paginated(&StructuredDataset::from_value(value)?)?,
        CorrectionFormat::ReferenceMap => from_reference_map(value)?,
    };

    tracing::info!(%format, verses = index.len(), "loaded correction source");
    Ok(index)
}

pub fn from_records(entries: Vec<CorrectionEntry>) -> VerseIndex {
    let mut out = VerseIndex::new();
    for e in entries {
        insert(&mut out, VerseKey::new(&e.chapter_id, &e.verse_id), e.text);
    }
    out
}

fn from_records_value(value: Value) -> Result<VerseIndex> {
    let Value::Array(items) = value else {
        return Err(AlignError::malformed(
            "correction root",
            "records format expects an array",
        ));
    };

    let mut entries = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<CorrectionEntry>(item) {
            Ok(e) => entries.push(e),
            Err(e) => {
                return Err(AlignError::malformed(
                    format!("correction record {i}"),
                    e.to_string(),
                ))
            }
        }
    }

    Ok(from_records(entries))
}

/// Flattens a page-nested source, then drops header verses.
pub fn from_paginated(dataset: &StructuredDataset) -> Result<VerseIndex> {
    let flat = index::flatten(dataset)?;

    let mut out = VerseIndex::new();
    for (key, text) in flat {
        insert(&mut out, key, text);
    }
    Ok(out)
}

fn from_reference_map(value: Value) -> Result<VerseIndex> {
    let Value::Object(map) = value else {
        return Err(AlignError::malformed(
            "correction root",
            "reference-map format expects an object",
        ));
    };

    let mut out = VerseIndex::new();
    for (reference, text) in map {
        let key: VerseKey = reference.parse()?;
        let Value::String(text) = text else {
            return Err(AlignError::malformed(
                format!("correction {reference}"),
                "text is not a string",
            ));
        };
        insert(&mut out, key, text);
    }
    Ok(out)
}

fn insert(index: &mut VerseIndex, key: VerseKey, text: String) {
    if key.is_header() {
        tracing::debug!(%key, "skipping chapter header entry");
        return;
    }

    if index.insert(key.clone(), text).is_some() {
        tracing::warn!(%key, "correction source repeats a verse, keeping the later text");
    }
}
