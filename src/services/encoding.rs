use std::borrow::Cow;
use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::error::{AlignError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Serialize)]
pub struct EncodingCandidate {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub candidates: Vec<EncodingCandidate>,
}

/// Reads a text input, decoding non-UTF-8 files with the guessed encoding.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| AlignError::io(path, e))?;
    let (text, encoding) = decode(&bytes);

    if encoding != UTF_8 {
        tracing::warn!(
            path = %path.display(),
            encoding = encoding.name(),
            "input is not UTF-8, decoded with guessed encoding"
        );
    }

    Ok(text.into_owned())
}

/// Decodes bytes as UTF-8 (BOM stripped) or, failing that, the guessed encoding.
pub fn decode(bytes: &[u8]) -> (Cow<'_, str>, &'static Encoding) {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if let Ok(text) = std::str::from_utf8(body) {
        return (Cow::Borrowed(text), UTF_8);
    }

    let encoding = guess(body);
    let (text, _) = encoding.decode_without_bom_handling(body);
    (text, encoding)
}

fn guess(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetectionResult> {
    let bytes = fs::read(path).map_err(|e| AlignError::io(path, e))?;
    Ok(detect(&bytes))
}

pub fn detect(bytes: &[u8]) -> EncodingDetectionResult {
    if bytes.starts_with(UTF8_BOM) {
        return EncodingDetectionResult {
            best: "utf-8-sig".into(),
            confidence: 0.99,
            candidates: vec![
                EncodingCandidate {
                    name: "utf-8-sig".into(),
                    confidence: 0.99,
                },
                EncodingCandidate {
                    name: "utf-8".into(),
                    confidence: 0.90,
                },
            ],
        };
    }

    let encoding = guess(bytes);
    let best = encoding.name().to_lowercase();
    let confidence = estimate_confidence(bytes, encoding);

    let mut candidates = vec![EncodingCandidate {
        name: best.clone(),
        confidence,
    }];

    // latin-1 decodes the same bytes for most cp1252 input
    if best == "windows-1252" {
        candidates.push(EncodingCandidate {
            name: "iso-8859-1".into(),
            confidence: (confidence - 0.05).max(0.0),
        });
    }

    EncodingDetectionResult {
        best,
        confidence,
        candidates,
    }
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_utf8_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("“GOD”".as_bytes());

        let (text, encoding) = decode(&bytes);
        assert_eq!(text, "“GOD”");
        assert_eq!(encoding, UTF_8);
        assert_eq!(detect(&bytes).best, "utf-8-sig");
    }

    #[test]
    fn decodes_legacy_bytes() {
        // "Gebet für" in windows-1252
        let bytes = b"Gebet f\xfcr alle Menschen, die glauben und Gutes tun.";
        let (text, encoding) = decode(bytes);

        assert_ne!(encoding, UTF_8);
        assert!(text.contains("für"), "{text}");
    }

    #[test]
    fn read_text_reports_missing_file() {
        let err = read_text(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, AlignError::Io { .. }));
    }
}
