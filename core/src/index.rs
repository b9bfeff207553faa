use crate::model::{DestinationRecord, DestinationType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use time::OffsetDateTime;

pub const NAME_WEIGHT: u32 = 10;
pub const TEXT_WEIGHT: u32 = 5;
pub const TAG_WEIGHT: u32 = 3;

/// Reduced projection of a [`DestinationRecord`] stored under `search_index:<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndexRecord {
    pub id: String,
    pub name: String,
    /// Lowercase concatenation of name, state, description, tags and attraction names.
    pub search_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub kind: DestinationType,
    #[serde(default)]
    pub rating: f64,
    /// Copied from `travelInfo.estimatedBudget`.
    #[serde(default)]
    pub estimated_budget: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

impl SearchIndexRecord {
    pub fn from_destination(dest: &DestinationRecord) -> Self {
        let mut parts: Vec<&str> = vec![dest.name.as_str()];
        if let Some(state) = &dest.state {
            parts.push(state);
        }
        parts.push(&dest.description);
        parts.extend(dest.tags.iter().map(String::as_str));
        parts.extend(dest.attractions.iter().map(|a| a.name.as_str()));

        Self {
            id: dest.id.clone(),
            name: dest.name.clone(),
            search_text: parts.join(" ").to_lowercase(),
            tags: dest.tags.clone(),
            kind: dest.kind,
            rating: dest.metadata.rating.unwrap_or(0.0),
            estimated_budget: dest.travel_info.estimated_budget,
            last_updated: dest.sources.last_updated,
        }
    }

    /// Relevance of this record for already-lowercased `terms`. Each term scores
    /// independently on name, search text and tags.
    pub fn score(&self, terms: &[String]) -> u32 {
        let name = self.name.to_lowercase();
        let tags: Vec<String> = self.tags.iter().map(|t| t.to_lowercase()).collect();
        let mut score = 0;
        for term in terms {
            if name.contains(term.as_str()) { score += NAME_WEIGHT; }
            if self.search_text.contains(term.as_str()) { score += TEXT_WEIGHT; }
            if tags.iter().any(|t| t.contains(term.as_str())) { score += TAG_WEIGHT; }
        }
        score
    }
}

/// Optional constraints for stored-destination search. A record failing any
/// present constraint is excluded regardless of its score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, rename = "type")]
    pub kinds: Option<Vec<DestinationType>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub max_budget: Option<u32>,
}

impl SearchFilters {
    pub fn admits(&self, entry: &SearchIndexRecord) -> bool {
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&entry.kind) { return false; }
        }
        if let Some(min) = self.min_rating {
            if entry.rating < min { return false; }
        }
        if let Some(wanted) = &self.tags {
            let has_any = wanted
                .iter()
                .any(|w| entry.tags.iter().any(|t| t.eq_ignore_ascii_case(w)));
            if !has_any { return false; }
        }
        if let Some(max) = self.max_budget {
            if entry.estimated_budget > max { return false; }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntry {
    pub entry: SearchIndexRecord,
    pub score: u32,
}

/// Filter, score and order index entries. Only positive scores survive; ties are
/// broken by id so the order is deterministic for identical input.
pub fn rank(entries: Vec<SearchIndexRecord>, terms: &[String], filters: &SearchFilters) -> Vec<ScoredEntry> {
    let mut scored: Vec<ScoredEntry> = entries
        .into_iter()
        .filter(|e| filters.admits(e))
        .filter_map(|entry| {
            let score = entry.score(terms);
            (score > 0).then_some(ScoredEntry { entry, score })
        })
        .collect();
    scored.sort_by(|a, b| match b.score.cmp(&a.score) {
        Ordering::Equal => a.entry.id.cmp(&b.entry.id),
        other => other,
    });
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::search_terms;

    fn entry(id: &str, name: &str, text: &str, tags: &[&str], kind: DestinationType, rating: f64) -> SearchIndexRecord {
        SearchIndexRecord {
            id: id.into(),
            name: name.into(),
            search_text: text.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            kind,
            rating,
            estimated_budget: 20_000,
            last_updated: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn term_scores_on_every_axis() {
        let e = entry("a", "Goa", "goa beaches", &["Goa Nightlife"], DestinationType::Beach, 4.0);
        assert_eq!(e.score(&search_terms("goa")), 18);
        assert_eq!(e.score(&search_terms("beaches")), 5);
        assert_eq!(e.score(&search_terms("goa goa")), 36);
        assert_eq!(e.score(&search_terms("kerala")), 0);
    }

    #[test]
    fn rank_orders_by_score_then_id() {
        let entries = vec![
            entry("b", "Temple Town", "temple town", &[], DestinationType::Temple, 4.0),
            entry("a", "Old Temple", "old temple", &[], DestinationType::Temple, 4.0),
            entry("c", "Fort", "fort near temple", &[], DestinationType::Heritage, 4.0),
            entry("d", "Lake", "lake", &[], DestinationType::General, 4.0),
        ];
        let ranked = rank(entries, &search_terms("temple"), &SearchFilters::default());
        let ids: Vec<&str> = ranked.iter().map(|s| s.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(ranked[0].score, 15);
        assert_eq!(ranked[2].score, 5);
    }

    #[test]
    fn filters_exclude_before_scoring() {
        let entries = vec![
            entry("low", "Goa", "goa", &[], DestinationType::Beach, 4.5),
            entry("high", "Goa Fort", "goa fort", &[], DestinationType::Heritage, 4.9),
        ];
        let filters = SearchFilters { min_rating: Some(4.8), ..Default::default() };
        let ranked = rank(entries.clone(), &search_terms("goa"), &filters);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].entry.id, "high");

        let filters = SearchFilters { kinds: Some(vec![DestinationType::Beach]), ..Default::default() };
        let ranked = rank(entries, &search_terms("goa"), &filters);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].entry.id, "low");
    }

    #[test]
    fn tag_filter_matches_case_insensitively() {
        let e = entry("x", "X", "x", &["Heritage"], DestinationType::City, 0.0);
        let filters = SearchFilters { tags: Some(vec!["heritage".into()]), ..Default::default() };
        assert!(filters.admits(&e));
        let filters = SearchFilters { tags: Some(vec!["beach".into()]), ..Default::default() };
        assert!(!filters.admits(&e));
    }

    #[test]
    fn budget_filter_is_inclusive() {
        let e = entry("x", "X", "x", &[], DestinationType::City, 0.0);
        let within = SearchFilters { max_budget: Some(20_000), ..Default::default() };
        assert!(within.admits(&e));
        let below = SearchFilters { max_budget: Some(19_999), ..Default::default() };
        assert!(!below.admits(&e));
    }
}
