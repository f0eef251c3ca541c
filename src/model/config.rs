use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::correction::CorrectionFormat;

pub const DEFAULT_CONTEXT_WORDS: usize = 10;

fn default_context_words() -> usize {
    DEFAULT_CONTEXT_WORDS
}

fn default_parallel() -> bool {
    true
}

/// What to keep when a verse matches on more than one page.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    First,
    Last,
    /// Keep every candidate and leave the choice to the reviewer.
    #[default]
    All,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DuplicatePolicy::First => "first",
            DuplicatePolicy::Last => "last",
            DuplicatePolicy::All => "all",
        })
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(DuplicatePolicy::First),
            "last" => Ok(DuplicatePolicy::Last),
            "all" => Ok(DuplicatePolicy::All),
            other => Err(format!(
                "unknown duplicate policy '{other}' (expected first, last or all)"
            )),
        }
    }
}

/// Run file (`align.json`) shared by the batch passes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AlignConfig {
    #[serde(default)]
    pub corpus_path: Option<PathBuf>,

    #[serde(default)]
    pub reference_path: Option<PathBuf>,

    #[serde(default)]
    pub reference_format: CorrectionFormat,

    #[serde(default, alias = "structured_path")]
    pub dataset_path: Option<PathBuf>,

    #[serde(default)]
    pub correction_path: Option<PathBuf>,

    #[serde(default)]
    pub correction_format: CorrectionFormat,

    #[serde(default)]
    pub expected_counts_path: Option<PathBuf>,

    #[serde(default)]
    pub snippets_output: Option<PathBuf>,

    #[serde(default)]
    pub candidates_output: Option<PathBuf>,

    #[serde(default)]
    pub merged_output: Option<PathBuf>,

    #[serde(default = "default_context_words")]
    pub context_words: usize,

    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,

    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            corpus_path: None,
            reference_path: None,
            reference_format: CorrectionFormat::default(),
            dataset_path: None,
            correction_path: None,
            correction_format: CorrectionFormat::default(),
            expected_counts_path: None,
            snippets_output: None,
            candidates_output: None,
            merged_output: None,
            context_words: DEFAULT_CONTEXT_WORDS,
            duplicate_policy: DuplicatePolicy::default(),
            parallel: true,
        }
    }
}
