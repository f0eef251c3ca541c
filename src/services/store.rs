use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::{AlignError, Result};
use crate::services::encoding;

/// Loads a JSON input, decoding it first if it is not UTF-8.
pub fn load_json(path: &Path) -> Result<Value> {
    let text = encoding::read_text(path)?;
    serde_json::from_str(&text).map_err(|e| AlignError::json(path.display().to_string(), e))
}

/// Renders JSON with 4-space indentation and unescaped non-ASCII text.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| AlignError::json("output", e))?;
    Ok(buf)
}

/// Writes an artifact atomically: either the whole file lands or nothing does.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = to_pretty_json(value)?;
    write_atomic(path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
    Ok(())
}

/// Writes several rendered artifacts as one unit.
///
/// Every file is staged next to its target before any is renamed into place,
/// so a failure part way leaves none of the targets written.
pub fn save_all(artifacts: &[(&Path, Vec<u8>)]) -> Result<()> {
    let mut staged = Vec::with_capacity(artifacts.len());

    for (path, bytes) in artifacts {
        match stage(path, bytes) {
            Ok(tmp) => staged.push(tmp),
            Err(e) => {
                discard(&staged);
                return Err(e);
            }
        }
    }

    for (i, ((path, bytes), tmp)) in artifacts.iter().zip(&staged).enumerate() {
        if let Err(e) = fs::rename(tmp, path) {
            discard(&staged[i..]);
            for (done, _) in &artifacts[..i] {
                let _ = fs::remove_file(done);
            }
            return Err(AlignError::io(*path, e));
        }
        tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
    }

    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = stage(path, bytes)?;

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(AlignError::io(path, e));
    }

    Ok(())
}

fn stage(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AlignError::io(parent, e))?;
    }

    fs::write(&tmp, bytes).map_err(|e| AlignError::io(&tmp, e))?;
    Ok(tmp)
}

fn discard(staged: &[PathBuf]) {
    for tmp in staged {
        let _ = fs::remove_file(tmp);
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "artifact".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn writes_four_space_unescaped_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("snippets.json");

        save_json(&path, &json!({ "1:1": "Gebet für" })).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n    \"1:1\": \"Gebet für\"\n}");
        assert!(!dir.path().join("out").join("snippets.json.tmp").exists());
        assert_eq!(load_json(&path).unwrap(), json!({ "1:1": "Gebet für" }));
    }

    #[test]
    fn invalid_json_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_json(&path).unwrap_err();
        assert!(matches!(err, AlignError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn write_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        // the parent "directory" is a regular file
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = save_json(&blocker.join("out.json"), &json!({})).unwrap_err();
        assert!(matches!(err, AlignError::Io { .. }));
    }

    #[test]
    fn save_all_leaves_nothing_when_one_target_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let first = dir.path().join("snippets.json");
        let second = blocker.join("candidates.json");
        let artifacts = [
            (first.as_path(), to_pretty_json(&json!({ "1:1": "a" })).unwrap()),
            (second.as_path(), to_pretty_json(&json!({})).unwrap()),
        ];

        let err = save_all(&artifacts).unwrap_err();
        assert!(matches!(err, AlignError::Io { .. }));
        assert!(!first.exists());
        assert!(!dir.path().join("snippets.json.tmp").exists());
    }

    #[test]
    fn save_all_writes_every_target() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.json");
        let second = dir.path().join("nested").join("b.json");
        let artifacts = [
            (first.as_path(), to_pretty_json(&json!([1])).unwrap()),
            (second.as_path(), to_pretty_json(&json!([2])).unwrap()),
        ];

        save_all(&artifacts).unwrap();
        assert_eq!(load_json(&first).unwrap(), json!([1]));
        assert_eq!(load_json(&second).unwrap(), json!([2]));
    }
}
