use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::corpus::CorpusPage;
use crate::services::normalize;

/// A cleaned span of one corpus page that matched a verse pattern.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    pub page_id: String,
    pub snippet: String,
}

/// First match on every page, in page order.
pub fn candidates(pattern: &Regex, pages: &[CorpusPage]) -> Vec<MatchCandidate> {
    pages
        .iter()
        .filter_map(|page| {
            pattern.find(&page.text).map(|m| MatchCandidate {
                page_id: page.page_id.clone(),
                snippet: normalize::clean_snippet(m.as_str()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::locator::pattern;

    fn page(id: &str, text: &str) -> CorpusPage {
        CorpusPage {
            page_id: id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn one_candidate_per_matching_page() {
        let re = pattern::compile("no god except He", 0).unwrap().unwrap();
        let pages = vec![
            page("40", "there is no god except He.\nThere is no god\nexcept He"),
            page("41", "nothing here"),
            page("42", "No  god\nexcept   He, the Living"),
        ];

        let found = candidates(&re, &pages);
        assert_eq!(
            found,
            vec![
                MatchCandidate { page_id: "40".into(), snippet: "no god except He".into() },
                MatchCandidate { page_id: "42".into(), snippet: "No godexcept He".into() },
            ]
        );
    }
}
