use crate::error::UnknownDestinationType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Closed set of destination kinds a record can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationType {
    City,
    Region,
    Beach,
    Heritage,
    Mountain,
    Temple,
    Monument,
    Wildlife,
    General,
}

impl DestinationType {
    pub const ALL: [DestinationType; 9] = [
        DestinationType::City,
        DestinationType::Region,
        DestinationType::Beach,
        DestinationType::Heritage,
        DestinationType::Mountain,
        DestinationType::Temple,
        DestinationType::Monument,
        DestinationType::Wildlife,
        DestinationType::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationType::City => "city",
            DestinationType::Region => "region",
            DestinationType::Beach => "beach",
            DestinationType::Heritage => "heritage",
            DestinationType::Mountain => "mountain",
            DestinationType::Temple => "temple",
            DestinationType::Monument => "monument",
            DestinationType::Wildlife => "wildlife",
            DestinationType::General => "general",
        }
    }
}

impl fmt::Display for DestinationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DestinationType {
    type Err = UnknownDestinationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        DestinationType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| UnknownDestinationType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Default for Coordinates {
    fn default() -> Self {
        Self { lat: 0.0, lng: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttractionRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub estimated_cost: u32,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelInfo {
    pub best_season: String,
    pub avg_duration: String,
    pub estimated_budget: u32,
    pub accessibility: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_reviews: Option<u32>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub popular_with: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climate: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub fetched_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

impl Sources {
    pub fn fetched(place_id: Option<String>, now: OffsetDateTime) -> Self {
        Self { place_id, fetched_at: now, last_updated: now }
    }
}

/// Curated records loaded from files may omit provenance.
impl Default for Sources {
    fn default() -> Self {
        Self::fetched(None, OffsetDateTime::UNIX_EPOCH)
    }
}

/// Canonical, normalized destination as persisted under `destination:id:<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    #[serde(rename = "type")]
    pub kind: DestinationType,
    pub description: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attractions: Vec<AttractionRecord>,
    pub travel_info: TravelInfo,
    #[serde(default)]
    pub metadata: DestinationMetadata,
    #[serde(default)]
    pub sources: Sources,
}

impl DestinationRecord {
    pub fn rating(&self) -> Option<f64> {
        self.metadata.rating
    }
}

/// Result list cached under `destination:<normalized query>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCacheEntry {
    pub query: String,
    pub data: Vec<DestinationRecord>,
    #[serde(with = "time::serde::rfc3339")]
    pub fetched_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl QueryCacheEntry {
    /// A `ttl` that runs past the representable calendar yields an entry that
    /// is already stale.
    pub fn new(query: &str, data: Vec<DestinationRecord>, now: OffsetDateTime, ttl: time::Duration) -> Self {
        let expires_at = now.checked_add(ttl).unwrap_or(now);
        Self { query: query.to_string(), data, fetched_at: now, expires_at }
    }

    pub fn is_fresh(&self, now: OffsetDateTime) -> bool {
        self.expires_at > now
    }
}

/// Append `tag` unless an equal tag is already present, keeping first-seen order.
pub fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn destination_type_parses_case_insensitively() {
        assert_eq!("Beach".parse::<DestinationType>(), Ok(DestinationType::Beach));
        assert_eq!(" wildlife ".parse::<DestinationType>(), Ok(DestinationType::Wildlife));
        let err = "volcano".parse::<DestinationType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown destination type: volcano");
    }

    #[test]
    fn cache_entry_freshness_is_strict() {
        let now = datetime!(2024-03-01 12:00 UTC);
        let entry = QueryCacheEntry::new("goa", vec![], now, time::Duration::days(7));
        assert_eq!(entry.expires_at, datetime!(2024-03-08 12:00 UTC));
        assert!(entry.is_fresh(now));
        assert!(!entry.is_fresh(entry.expires_at));
    }

    #[test]
    fn overflowing_ttl_does_not_panic() {
        let now = datetime!(2024-03-01 12:00 UTC);
        let entry = QueryCacheEntry::new("goa", vec![], now, time::Duration::MAX);
        assert_eq!(entry.expires_at, now);
        assert!(!entry.is_fresh(now));
    }

    #[test]
    fn record_uses_wire_field_names() {
        let json = serde_json::json!({
            "id": "dest_x",
            "name": "X",
            "country": "India",
            "type": "temple",
            "description": "d",
            "coordinates": { "lat": 1.0, "lng": 2.0 },
            "travelInfo": { "bestSeason": "Oct-Mar", "avgDuration": "1-2 days", "estimatedBudget": 30000, "accessibility": "Good" }
        });
        let rec: DestinationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(rec.kind, DestinationType::Temple);
        assert_eq!(rec.sources.fetched_at, OffsetDateTime::UNIX_EPOCH);
        let back = serde_json::to_value(&rec).unwrap();
        assert_eq!(back["travelInfo"]["estimatedBudget"], 30000);
        assert_eq!(back["type"], "temple");
        assert!(back.get("state").is_none());
    }

    #[test]
    fn push_unique_keeps_insertion_order() {
        let mut tags = vec!["nature".to_string()];
        push_unique(&mut tags, "scenic");
        push_unique(&mut tags, "nature");
        assert_eq!(tags, vec!["nature", "scenic"]);
    }
}
