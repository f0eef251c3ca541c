//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::logging::LogFormat;
use crate::model::config::{AlignConfig, DuplicatePolicy};
use crate::model::correction::CorrectionFormat;

#[derive(Parser)]
#[command(
    name = "verse-align",
    version,
    about = "Locate verse translations in extracted page text and merge corrections by chapter/verse"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Run file with input/output paths and locator options.
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log output format: pretty, compact or json.
    #[arg(long = "log-format", default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Disable ANSI colors in log output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Flatten the structured dataset into a `chapter:verse` map.
    Index(IndexArgs),

    /// Find each reference verse in the raw corpus and write a review map.
    Locate(LocateArgs),

    /// Overwrite dataset verses that also appear in a correction source.
    Merge(MergeArgs),

    /// Check verse coverage against expected per-chapter counts.
    Verify(VerifyArgs),

    /// Guess the text encoding of an input file.
    DetectEncoding {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Serve JSON-lines requests on stdin/stdout.
    Serve,
}

#[derive(Args)]
pub struct IndexArgs {
    #[arg(long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,

    /// Where to write the flat map (prints counts only when omitted).
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct LocateArgs {
    /// Raw page corpus (`[{ page, text }]`).
    #[arg(long, value_name = "FILE")]
    pub corpus: Option<PathBuf>,

    /// Verse-indexed reference translation whose verses are searched for.
    #[arg(long, value_name = "FILE")]
    pub reference: Option<PathBuf>,

    #[arg(long = "reference-format", value_name = "FORMAT")]
    pub reference_format: Option<CorrectionFormat>,

    /// Review map output (`{ "chapter:verse": snippet }`).
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// All candidates of verses found on several pages.
    #[arg(long, value_name = "FILE")]
    pub candidates: Option<PathBuf>,

    #[arg(long = "context-words", value_name = "N")]
    pub context_words: Option<usize>,

    /// first, last or all.
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<DuplicatePolicy>,

    /// Scan verses on one thread.
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Args)]
pub struct MergeArgs {
    #[arg(long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    pub corrections: Option<PathBuf>,

    /// records, paginated or reference-map.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<CorrectionFormat>,

    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct VerifyArgs {
    #[arg(long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,

    /// `{ chapter: count }` or `{ chapter: { nAyah: count } }`.
    #[arg(long, value_name = "FILE")]
    pub expected: Option<PathBuf>,
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

impl IndexArgs {
    pub fn apply(self, cfg: &mut AlignConfig) -> Option<PathBuf> {
        set(&mut cfg.dataset_path, self.dataset);
        self.output
    }
}

impl LocateArgs {
    pub fn apply(self, cfg: &mut AlignConfig) {
        set(&mut cfg.corpus_path, self.corpus);
        set(&mut cfg.reference_path, self.reference);
        set(&mut cfg.snippets_output, self.output);
        set(&mut cfg.candidates_output, self.candidates);
        if let Some(format) = self.reference_format {
            cfg.reference_format = format;
        }
        if let Some(n) = self.context_words {
            cfg.context_words = n;
        }
        if let Some(policy) = self.policy {
            cfg.duplicate_policy = policy;
        }
        if self.sequential {
            cfg.parallel = false;
        }
    }
}

impl MergeArgs {
    pub fn apply(self, cfg: &mut AlignConfig) {
        set(&mut cfg.dataset_path, self.dataset);
        set(&mut cfg.correction_path, self.corrections);
        set(&mut cfg.merged_output, self.output);
        if let Some(format) = self.format {
            cfg.correction_format = format;
        }
    }
}

impl VerifyArgs {
    pub fn apply(self, cfg: &mut AlignConfig) {
        set(&mut cfg.dataset_path, self.dataset);
        set(&mut cfg.expected_counts_path, self.expected);
    }
}
