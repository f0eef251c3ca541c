/// Whitespace-delimited tokens of a verse, empty tokens dropped.
pub fn tokens(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Cleans a matched snippet for review.
///
/// Line breaks are removed outright, then every remaining whitespace run
/// becomes one space.
pub fn clean_snippet(snippet: &str) -> String {
    let joined: String = snippet.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_skip_empty() {
        assert_eq!(tokens("  In the\tname \n"), ["In", "the", "name"]);
        assert!(tokens(" \n\t ").is_empty());
    }

    #[test]
    fn snippet_drops_newlines_then_collapses() {
        assert_eq!(clean_snippet("In   the \nname  of\r\n   GOD"), "In the name of GOD");
        assert_eq!(clean_snippet("Mes-\nsenger"), "Mes-senger");
    }
}
