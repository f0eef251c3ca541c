use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AlignError, Result};
use crate::model::key::deserialize_id;

/// One physical page of the extracted source document.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CorpusPage {
    #[serde(alias = "page", deserialize_with = "deserialize_id")]
    pub page_id: String,

    pub text: String,
}

/// Parses the raw corpus, an ordered array of page records.
pub fn pages_from_value(value: Value) -> Result<Vec<CorpusPage>> {
    let Value::Array(items) = value else {
        return Err(AlignError::malformed(
            "corpus root",
            "expected an array of page records",
        ));
    };

    let mut pages = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<CorpusPage>(item) {
            Ok(page) => pages.push(page),
            Err(e) => {
                return Err(AlignError::malformed(
                    format!("corpus record {i}"),
                    e.to_string(),
                ))
            }
        }
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numeric_page_ids() {
        let pages = pages_from_value(json!([
            { "page": 23, "text": "In the name of GOD" },
            { "page_id": "24", "text": "" }
        ]))
        .unwrap();

        assert_eq!(pages[0].page_id, "23");
        assert_eq!(pages[1].page_id, "24");
    }

    #[test]
    fn missing_text_names_record() {
        let err = pages_from_value(json!([{ "page": 1, "text": "" }, { "page": 2 }]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("corpus record 1"), "{err}");
    }
}
