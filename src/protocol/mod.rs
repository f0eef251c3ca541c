//! JSON-lines request/response protocol for editor front ends.
//!
//! Requests are `{ "id", "cmd", "payload" }`; responses are
//! `{ "id", "status": "ok", "payload" }` or `{ "id", "status": "error", "message" }`.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{AlignError, Result};
use crate::model::config::{DuplicatePolicy, DEFAULT_CONTEXT_WORDS};
use crate::model::corpus;
use crate::model::correction::CorrectionFormat;
use crate::model::dataset::StructuredDataset;
use crate::services::locator::{self, LocatorOptions};
use crate::services::{correction, encoding, index, merge, verify};

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn required(payload: &Value, field: &str) -> Result<Value> {
    match payload.get(field) {
        Some(v) if !v.is_null() => Ok(v.clone()),
        _ => Err(AlignError::malformed("payload", format!("payload.{field} is required"))),
    }
}

/// Reads an optional typed field, falling back to `default` when absent.
fn optional<T: DeserializeOwned>(payload: &Value, field: &str, default: T) -> Result<T> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| AlignError::json(format!("payload.{field}"), e)),
    }
}

fn run_flatten(payload: &Value) -> Result<Value> {
    let dataset = StructuredDataset::from_value(required(payload, "dataset")?)?;
    let verses = index::flatten(&dataset)?;
    Ok(json!({ "count": verses.len(), "verses": verses }))
}

fn run_locate(payload: &Value) -> Result<Value> {
    let format: CorrectionFormat = optional(payload, "reference_format", CorrectionFormat::Paginated)?;
    let reference = correction::from_value(required(payload, "reference")?, format)?;
    let pages = corpus::pages_from_value(required(payload, "corpus")?)?;

    let opts = LocatorOptions {
        context_words: optional(payload, "context_words", DEFAULT_CONTEXT_WORDS)?,
        policy: optional(payload, "policy", DuplicatePolicy::default())?,
        parallel: optional(payload, "parallel", true)?,
    };

    let report = locator::locate(&reference, &pages, &opts)?;
    serde_json::to_value(report).map_err(|e| AlignError::json("locate report", e))
}

fn run_merge(payload: &Value) -> Result<Value> {
    let mut dataset = StructuredDataset::from_value(required(payload, "dataset")?)?;
    let format: CorrectionFormat = optional(payload, "correction_format", CorrectionFormat::Records)?;
    let corrections = correction::from_value(required(payload, "corrections")?, format)?;

    let report = merge::merge(&mut dataset, &corrections);
    Ok(json!({ "dataset": dataset, "report": report }))
}

fn run_verify(payload: &Value) -> Result<Value> {
    let dataset = StructuredDataset::from_value(required(payload, "dataset")?)?;
    let expected = verify::expected_counts_from_value(required(payload, "expected")?)?;
    index::flatten(&dataset)?;

    let issues = verify::run(&dataset, &expected);
    Ok(json!({ "issues": issues }))
}

fn run_detect_encoding(payload: &Value) -> Result<Value> {
    let path_str = payload.get("path").and_then(|v| v.as_str()).unwrap_or("");
    if path_str.is_empty() {
        return Err(AlignError::malformed("payload", "payload.path is required"));
    }

    let result = encoding::detect_from_file(std::path::Path::new(path_str))?;
    serde_json::to_value(result).map_err(|e| AlignError::json("encoding result", e))
}

pub fn handle(input: &str) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let cmd_str = get_cmd(&req);
    let payload = get_payload(&req);

    let result = match Command::from(cmd_str) {
        Command::Ping => Ok(json!({ "message": "verse-align alive" })),
        Command::Flatten => run_flatten(payload),
        Command::Locate => run_locate(payload),
        Command::Merge => run_merge(payload),
        Command::Verify => run_verify(payload),
        Command::DetectEncoding => run_detect_encoding(payload),
        Command::Unknown => return err(id, "unknown command"),
    };

    match result {
        Ok(payload) => ok(id, payload),
        Err(e) => {
            tracing::warn!(cmd = cmd_str, error = %e, "request failed");
            err(id, e.to_string())
        }
    }
}
