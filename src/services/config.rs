use std::path::{Path, PathBuf};

use crate::error::{AlignError, Result};
use crate::model::config::AlignConfig;
use crate::services::store;

/// Opens a run file. A missing `--config` means all defaults.
pub fn load(path: Option<&Path>) -> Result<AlignConfig> {
    let Some(path) = path else {
        return Ok(AlignConfig::default());
    };

    let value = store::load_json(path)?;
    let mut cfg: AlignConfig =
        serde_json::from_value(value).map_err(|e| AlignError::json(path.display().to_string(), e))?;

    // relative paths in the run file are relative to the file itself
    if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        for slot in [
            &mut cfg.corpus_path,
            &mut cfg.reference_path,
            &mut cfg.dataset_path,
            &mut cfg.correction_path,
            &mut cfg.expected_counts_path,
            &mut cfg.snippets_output,
            &mut cfg.candidates_output,
            &mut cfg.merged_output,
        ] {
            if let Some(p) = slot.as_mut().filter(|p| p.is_relative()) {
                *p = base.join(&*p);
            }
        }
    }

    tracing::debug!(path = %path.display(), "loaded run configuration");
    Ok(cfg)
}

/// Returns a required path or a config error naming the missing field.
pub fn require<'a>(value: &'a Option<PathBuf>, field: &str) -> Result<&'a Path> {
    value
        .as_deref()
        .ok_or_else(|| {
            AlignError::Config(format!(
                "`{field}` is required (set it in the run file or pass it as a flag)"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::correction::CorrectionFormat;
    use std::fs;

    #[test]
    fn no_file_means_defaults() {
        assert_eq!(load(None).unwrap(), AlignConfig::default());
    }

    #[test]
    fn resolves_relative_paths_against_run_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("align.json");
        fs::write(
            &path,
            r#"{ "dataset_path": "quran_tr.json", "correction_path": "/abs/tr-new.json", "correction_format": "records" }"#,
        )
        .unwrap();

        let cfg = load(Some(&path)).unwrap();
        assert_eq!(cfg.dataset_path, Some(dir.path().join("quran_tr.json")));
        assert_eq!(cfg.correction_path, Some(PathBuf::from("/abs/tr-new.json")));
        assert_eq!(cfg.correction_format, CorrectionFormat::Records);
    }

    #[test]
    fn require_names_field() {
        let err = require(&None, "corpus_path").unwrap_err().to_string();
        assert!(err.contains("corpus_path"), "{err}");
    }
}
