use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TERM: Regex = Regex::new(r"\S+").expect("valid regex");
}

/// Normalized form of a free-text query: trimmed and lowercased. Two queries
/// with the same normalized form share a cache entry.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Split a query into lowercase, whitespace-separated terms. Repeated terms are
/// kept, so they contribute to the score once per occurrence.
pub fn search_terms(query: &str) -> Vec<String> {
    let lower = query.to_lowercase();
    TERM.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_terms() {
        assert_eq!(search_terms("Goa  Beaches\tnightlife"), vec!["goa", "beaches", "nightlife"]);
    }
}
