//! Static heuristics used to normalize upstream place data, plus the fallback
//! destinations served when the upstream API is unavailable.
//!
//! A [`Catalog`] is built once at startup (from [`Catalog::builtin`] or a JSON
//! file) and shared read-only. Every table has an explicit default, so an
//! unknown region, type or category never fails a lookup.

mod builtin;

use crate::error::CatalogError;
use crate::model::{push_unique, DestinationRecord, DestinationType, Sources, TravelInfo};
use crate::tokenizer::normalize_query;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupTable<V> {
    #[serde(default)]
    pub entries: BTreeMap<String, V>,
    pub default: V,
}

impl<V> LookupTable<V> {
    pub fn new(default: V) -> Self {
        Self { entries: BTreeMap::new(), default }
    }

    pub fn with(mut self, key: &str, value: V) -> Self {
        self.entries.insert(key.to_string(), value);
        self
    }

    pub fn lookup(&self, key: &str) -> &V {
        self.entries.get(key).unwrap_or(&self.default)
    }
}

/// Maps any of `categories` to `value`. Rules are checked in order; first match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule<T> {
    pub categories: Vec<String>,
    pub value: T,
}

impl<T> CategoryRule<T> {
    pub fn new(categories: &[&str], value: T) -> Self {
        Self { categories: categories.iter().map(|c| c.to_string()).collect(), value }
    }

    fn matches(&self, upstream: &[String]) -> bool {
        self.categories.iter().any(|c| upstream.contains(c))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceRule {
    pub tag: String,
    pub audience: String,
}

/// A destination served when live data is unavailable, matched by `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackEntry {
    pub key: String,
    pub record: DestinationRecord,
}

impl FallbackEntry {
    /// Keyed by the lowercase destination name.
    pub fn from_record(record: DestinationRecord) -> Self {
        Self { key: normalize_query(&record.name), record }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub country: String,
    /// First-level administrative regions, matched as substrings of an address.
    pub regions: Vec<String>,
    pub best_season: LookupTable<String>,
    pub climate: LookupTable<String>,
    pub languages: LookupTable<Vec<String>>,
    /// Keyed by destination type.
    pub visit_duration: LookupTable<String>,
    /// Keyed by destination type; `{name}`, `{country}` and `{tags}` are substituted.
    pub description_templates: LookupTable<String>,
    pub base_budget: u32,
    pub default_price_level: u32,
    pub accessibility: String,
    pub type_rules: Vec<CategoryRule<DestinationType>>,
    pub category_tags: BTreeMap<String, Vec<String>>,
    pub query_keywords: Vec<String>,
    pub audiences: Vec<AudienceRule>,
    pub default_audience: String,
    pub attraction_costs: Vec<CategoryRule<u32>>,
    pub default_attraction_cost: u32,
    pub attraction_duration: String,
    /// Travel info for records built from search data alone.
    pub basic_travel_info: TravelInfo,
    #[serde(default)]
    pub fallback: Vec<FallbackEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    /// Load a complete catalog from a JSON document.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io { path: path_str.clone(), source })?;
        let catalog: Self =
            serde_json::from_str(&text).map_err(|source| CatalogError::Parse { path: path_str.clone(), source })?;
        tracing::info!(path = %path_str, regions = catalog.regions.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Add fallback entries; an entry with an existing key replaces the old one.
    pub fn with_fallback(mut self, entries: Vec<FallbackEntry>) -> Self {
        for entry in entries {
            self.fallback.retain(|e| e.key != entry.key);
            self.fallback.push(entry);
        }
        self
    }

    pub fn destination_type(&self, categories: &[String]) -> DestinationType {
        self.type_rules
            .iter()
            .find(|r| r.matches(categories))
            .map(|r| r.value)
            .unwrap_or(DestinationType::General)
    }

    /// First known region named in `address`, or the country when none is.
    pub fn extract_state(&self, address: &str) -> String {
        self.regions
            .iter()
            .find(|r| address.contains(r.as_str()))
            .cloned()
            .unwrap_or_else(|| self.country.clone())
    }

    pub fn generate_tags(&self, categories: &[String], query: &str) -> Vec<String> {
        let mut tags = Vec::new();
        for category in categories {
            if let Some(mapped) = self.category_tags.get(category) {
                for tag in mapped {
                    push_unique(&mut tags, tag);
                }
            }
        }
        let query = query.to_lowercase();
        for keyword in &self.query_keywords {
            if query.contains(keyword.as_str()) {
                push_unique(&mut tags, keyword);
            }
        }
        tags
    }

    pub fn describe(&self, name: &str, kind: DestinationType, tags: &[String]) -> String {
        let leading: Vec<&str> = tags.iter().take(3).map(String::as_str).collect();
        self.description_templates
            .lookup(kind.as_str())
            .replace("{name}", name)
            .replace("{country}", &self.country)
            .replace("{tags}", &leading.join(", "))
    }

    pub fn best_season(&self, state: &str) -> &str {
        self.best_season.lookup(state)
    }

    pub fn climate(&self, state: &str) -> &str {
        self.climate.lookup(state)
    }

    pub fn languages(&self, state: &str) -> &[String] {
        self.languages.lookup(state)
    }

    pub fn visit_duration(&self, kind: DestinationType) -> &str {
        self.visit_duration.lookup(kind.as_str())
    }

    /// Base budget scaled by the upstream price tier. A missing or zero tier uses the default.
    pub fn estimate_budget(&self, price_level: Option<u32>) -> u32 {
        let level = match price_level {
            Some(l) if l > 0 => l,
            _ => self.default_price_level,
        };
        self.base_budget.saturating_mul(level)
    }

    pub fn attraction_cost(&self, categories: &[String]) -> u32 {
        self.attraction_costs
            .iter()
            .find(|r| r.matches(categories))
            .map(|r| r.value)
            .unwrap_or(self.default_attraction_cost)
    }

    pub fn audiences(&self, tags: &[String]) -> Vec<String> {
        let found: Vec<String> = self
            .audiences
            .iter()
            .filter(|r| tags.contains(&r.tag))
            .map(|r| r.audience.clone())
            .collect();
        if found.is_empty() { vec![self.default_audience.clone()] } else { found }
    }

    /// Fallback records whose key contains the query or is contained by it,
    /// stamped as fetched at `now`. A blank query matches nothing.
    pub fn fallback_for(&self, query: &str, now: OffsetDateTime) -> Vec<DestinationRecord> {
        let query = normalize_query(query);
        if query.is_empty() {
            return Vec::new();
        }
        self.fallback
            .iter()
            .filter(|e| query.contains(e.key.as_str()) || e.key.contains(query.as_str()))
            .map(|e| {
                let mut record = e.record.clone();
                record.sources = Sources::fetched(record.sources.place_id.take(), now);
                record
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn type_rules_apply_in_order() {
        let c = Catalog::builtin();
        assert_eq!(c.destination_type(&strings(&["park", "museum"])), DestinationType::Heritage);
        assert_eq!(c.destination_type(&strings(&["place_of_worship"])), DestinationType::Temple);
        assert_eq!(c.destination_type(&strings(&["natural_feature", "locality"])), DestinationType::Beach);
        assert_eq!(c.destination_type(&strings(&["administrative_area_level_2"])), DestinationType::City);
        assert_eq!(c.destination_type(&strings(&["restaurant"])), DestinationType::General);
    }

    #[test]
    fn unknown_keys_fall_back_to_defaults() {
        let c = Catalog::builtin();
        assert_eq!(c.best_season("Atlantis"), "Oct-Mar");
        assert_eq!(c.climate("Atlantis"), "Moderate");
        assert_eq!(c.languages("Atlantis"), &strings(&["Hindi", "English"])[..]);
        assert_eq!(c.visit_duration(DestinationType::Wildlife), "3-4 days");
        assert_eq!(c.attraction_cost(&strings(&["zoo"])), 300);
        assert_eq!(c.audiences(&[]), strings(&["All travelers"]));
    }

    #[test]
    fn known_keys_use_table_entries() {
        let c = Catalog::builtin();
        assert_eq!(c.best_season("Himachal Pradesh"), "Mar-Jun, Sep-Nov");
        assert_eq!(c.climate("Rajasthan"), "Arid");
        assert_eq!(c.languages("Kerala"), &strings(&["Malayalam", "Hindi", "English"])[..]);
        assert_eq!(c.visit_duration(DestinationType::Beach), "4-5 days");
        assert_eq!(c.attraction_cost(&strings(&["tourist_attraction", "museum"])), 500);
        assert_eq!(c.attraction_cost(&strings(&["hindu_temple"])), 0);
    }

    #[test]
    fn budget_scales_with_price_level() {
        let c = Catalog::builtin();
        assert_eq!(c.estimate_budget(None), 30000);
        assert_eq!(c.estimate_budget(Some(0)), 30000);
        assert_eq!(c.estimate_budget(Some(3)), 45000);
    }

    #[test]
    fn state_is_found_in_address() {
        let c = Catalog::builtin();
        assert_eq!(c.extract_state("Calangute, Goa 403516, India"), "Goa");
        assert_eq!(c.extract_state("Amer, Jaipur, Rajasthan 302001"), "Rajasthan");
        assert_eq!(c.extract_state("Somewhere"), "India");
    }

    #[test]
    fn tags_combine_categories_and_query() {
        let c = Catalog::builtin();
        let tags = c.generate_tags(&strings(&["hindu_temple", "museum", "point_of_interest"]), "Heritage food walk");
        assert_eq!(tags, strings(&["spiritual", "heritage", "temple", "culture", "history", "food"]));
        assert_eq!(c.audiences(&tags), strings(&["History buffs", "Spiritual travelers"]));
    }

    #[test]
    fn descriptions_use_type_templates() {
        let c = Catalog::builtin();
        assert_eq!(
            c.describe("Baga", DestinationType::Beach, &[]),
            "Baga is a beautiful coastal destination known for its pristine beaches and water activities."
        );
        assert_eq!(
            c.describe("Ziro", DestinationType::General, &strings(&["nature", "scenic", "culture", "music"])),
            "Ziro is a popular tourist destination in India, known for nature, scenic, culture."
        );
    }

    #[test]
    fn fallback_matches_by_substring_either_way() {
        let c = Catalog::builtin();
        let now = datetime!(2024-05-01 00:00 UTC);
        let hits = c.fallback_for("Arunachal Pradesh", now);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "dest_arunachal");
        assert_eq!(hits[0].sources.fetched_at, now);
        assert_eq!(c.fallback_for("trekking in arunachal pradesh", now).len(), 1);
        assert_eq!(c.fallback_for("arunachal", now).len(), 1);
        assert!(c.fallback_for("Goa beaches", now).is_empty());
        assert!(c.fallback_for("   ", now).is_empty());
    }

    #[test]
    fn catalog_loads_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let mut c = Catalog::builtin();
        c.country = "Nepal".into();
        std::fs::write(&path, serde_json::to_string(&c).unwrap()).unwrap();
        let loaded = Catalog::from_json_file(&path).unwrap();
        assert_eq!(loaded.country, "Nepal");
        assert_eq!(loaded.extract_state("Pokhara"), "Nepal");

        std::fs::write(&path, "{").unwrap();
        assert!(matches!(Catalog::from_json_file(&path), Err(CatalogError::Parse { .. })));
    }
}
