//! Fuzzy location of reference verses inside the raw page corpus.
//!
//! Each verse gets one tolerant, case-insensitive pattern (see [`pattern`])
//! that is tested against every page. Verses are independent, so the scan
//! runs across verses in parallel and results are merged by key.

pub mod pattern;
pub mod scan;

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};
use crate::model::config::{AlignConfig, DuplicatePolicy, DEFAULT_CONTEXT_WORDS};
use crate::model::corpus::CorpusPage;
use crate::model::key::VerseKey;
use crate::services::index::VerseIndex;

pub use scan::MatchCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorOptions {
    pub context_words: usize,
    pub policy: DuplicatePolicy,
    pub parallel: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            context_words: DEFAULT_CONTEXT_WORDS,
            policy: DuplicatePolicy::default(),
            parallel: true,
        }
    }
}

impl From<&AlignConfig> for LocatorOptions {
    fn from(cfg: &AlignConfig) -> Self {
        Self {
            context_words: cfg.context_words,
            policy: cfg.duplicate_policy,
            parallel: cfg.parallel,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct LocateStats {
    pub considered: usize,
    pub skipped: usize,
    pub matched: usize,
    pub ambiguous: usize,
    pub unmatched: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct LocateReport {
    /// Review map: one cleaned snippet per resolved verse.
    pub snippets: BTreeMap<VerseKey, String>,
    /// Every candidate of verses that matched on more than one page.
    pub ambiguous: BTreeMap<VerseKey, Vec<MatchCandidate>>,
    pub stats: LocateStats,
}

enum VerseOutcome {
    Skipped,
    Found(Vec<MatchCandidate>),
}

/// Locates every reference verse in the corpus.
///
/// A verse with no tokens is skipped; a verse found nowhere is simply absent
/// from the report.
pub fn locate(
    reference: &VerseIndex,
    pages: &[CorpusPage],
    opts: &LocatorOptions,
) -> Result<LocateReport> {
    let work = |(key, text): (&VerseKey, &String)| -> Result<(VerseKey, VerseOutcome)> {
        locate_verse(key, text, pages, opts.context_words).map(|outcome| (key.clone(), outcome))
    };

    let outcomes: Vec<(VerseKey, VerseOutcome)> = if opts.parallel {
        reference.par_iter().map(work).collect::<Result<_>>()?
    } else {
        reference.iter().map(work).collect::<Result<_>>()?
    };

    let mut report = LocateReport::default();
    report.stats.considered = reference.len();

    for (key, outcome) in outcomes {
        let mut found = match outcome {
            VerseOutcome::Skipped => {
                tracing::debug!(%key, "verse has no tokens, skipped");
                report.stats.skipped += 1;
                continue;
            }
            VerseOutcome::Found(found) => found,
        };

        match found.len() {
            0 => {
                tracing::trace!(%key, "no match on any page");
                report.stats.unmatched += 1;
            }
            1 => {
                let only = found.remove(0);
                report.snippets.insert(key, only.snippet);
                report.stats.matched += 1;
            }
            n => {
                tracing::debug!(%key, pages = n, policy = %opts.policy, "verse matched on several pages");
                report.stats.ambiguous += 1;

                let chosen = match opts.policy {
                    DuplicatePolicy::First => found.first(),
                    DuplicatePolicy::Last => found.last(),
                    DuplicatePolicy::All => None,
                };
                if let Some(c) = chosen {
                    report.snippets.insert(key.clone(), c.snippet.clone());
                    report.stats.matched += 1;
                }

                report.ambiguous.insert(key, found);
            }
        }
    }

    tracing::info!(
        considered = report.stats.considered,
        matched = report.stats.matched,
        ambiguous = report.stats.ambiguous,
        unmatched = report.stats.unmatched,
        skipped = report.stats.skipped,
        "locate finished"
    );

    Ok(report)
}

fn locate_verse(
    key: &VerseKey,
    text: &str,
    pages: &[CorpusPage],
    context_words: usize,
) -> Result<VerseOutcome> {
    let compiled = pattern::compile(text, context_words).map_err(|source| AlignError::Pattern {
        key: key.to_string(),
        source,
    })?;

    Ok(match compiled {
        Some(re) => VerseOutcome::Found(scan::candidates(&re, pages)),
        None => VerseOutcome::Skipped,
    })
}
