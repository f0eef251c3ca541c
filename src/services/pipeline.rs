//! File-level passes: load inputs, run one pass, persist its artifact.
//!
//! Every pass computes its full result before writing anything, so a failed
//! run leaves no artifact behind.

use std::path::Path;

use crate::error::Result;
use crate::model::config::AlignConfig;
use crate::model::corpus::{self, CorpusPage};
use crate::model::correction::CorrectionFormat;
use crate::model::dataset::StructuredDataset;
use crate::services::config::require;
use crate::services::index::{self, VerseIndex};
use crate::services::locator::{self, LocateReport, LocatorOptions};
use crate::services::merge::{self, MergeReport};
use crate::services::verify::{self, CoverageIssue};
use crate::services::{correction, store};

pub fn load_dataset(path: &Path) -> Result<StructuredDataset> {
    let dataset = StructuredDataset::from_value(store::load_json(path)?)?;
    tracing::debug!(
        path = %path.display(),
        pages = dataset.pages.len(),
        verses = dataset.verse_count(),
        "loaded dataset"
    );
    Ok(dataset)
}

pub fn load_corpus(path: &Path) -> Result<Vec<CorpusPage>> {
    let pages = corpus::pages_from_value(store::load_json(path)?)?;
    tracing::debug!(path = %path.display(), pages = pages.len(), "loaded corpus");
    Ok(pages)
}

pub fn load_verse_source(path: &Path, format: CorrectionFormat) -> Result<VerseIndex> {
    correction::from_value(store::load_json(path)?, format)
}

/// Flattens the dataset, optionally writing the `chapter:verse` map.
pub fn run_index(cfg: &AlignConfig, output: Option<&Path>) -> Result<VerseIndex> {
    let dataset = load_dataset(require(&cfg.dataset_path, "dataset_path")?)?;
    let index = index::flatten(&dataset)?;

    if let Some(out) = output {
        store::save_json(out, &index)?;
    }

    Ok(index)
}

/// Locates every reference verse in the corpus and writes the review map.
pub fn run_locate(cfg: &AlignConfig) -> Result<LocateReport> {
    let corpus_path = require(&cfg.corpus_path, "corpus_path")?;
    let reference_path = require(&cfg.reference_path, "reference_path")?;
    let snippets_output = require(&cfg.snippets_output, "snippets_output")?;

    let pages = load_corpus(corpus_path)?;
    let reference = load_verse_source(reference_path, cfg.reference_format)?;

    let report = locator::locate(&reference, &pages, &LocatorOptions::from(cfg))?;

    let mut artifacts = vec![(snippets_output, store::to_pretty_json(&report.snippets)?)];

    match &cfg.candidates_output {
        Some(path) => {
            artifacts.push((path.as_path(), store::to_pretty_json(&report.ambiguous)?));
        }
        None => {
            for (key, found) in &report.ambiguous {
                let pages: Vec<&str> = found.iter().map(|c| c.page_id.as_str()).collect();
                tracing::warn!(%key, ?pages, "verse matched on several pages");
            }
        }
    }

    store::save_all(&artifacts)?;

    Ok(report)
}

/// Applies the correction source onto the dataset and writes the result.
pub fn run_merge(cfg: &AlignConfig) -> Result<MergeReport> {
    let dataset_path = require(&cfg.dataset_path, "dataset_path")?;
    let correction_path = require(&cfg.correction_path, "correction_path")?;
    let merged_output = require(&cfg.merged_output, "merged_output")?;

    let mut dataset = load_dataset(dataset_path)?;
    let corrections = load_verse_source(correction_path, cfg.correction_format)?;

    let report = merge::merge(&mut dataset, &corrections);
    store::save_json(merged_output, &dataset)?;

    Ok(report)
}

pub fn run_verify(cfg: &AlignConfig) -> Result<Vec<CoverageIssue>> {
    let dataset = load_dataset(require(&cfg.dataset_path, "dataset_path")?)?;
    let expected = verify::expected_counts_from_value(store::load_json(require(
        &cfg.expected_counts_path,
        "expected_counts_path",
    )?)?)?;

    // duplicates make per-chapter counts meaningless
    index::flatten(&dataset)?;

    Ok(verify::run(&dataset, &expected))
}
