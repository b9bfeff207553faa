//! Cache-first access to destination data and keyword retrieval over
//! everything stored.
//!
//! The service keeps no state of its own between calls: query caches, full
//! records and their search-index projections all live in the [`KvStore`].
//! Concurrent misses for the same query may both fetch and both write the
//! cache entry; entries are self-contained, so the last write wins.

use std::sync::Arc;

use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tripdata_core::index::rank;
use tripdata_core::store::{get_json, keys, set_json};
use tripdata_core::tokenizer::{normalize_query, search_terms};
use tripdata_core::{
    DestinationRecord, DestinationSource, KvStore, QueryCacheEntry, SearchFilters, SearchIndexRecord, StoreError,
};

pub const DEFAULT_CACHE_TTL: Duration = Duration::days(7);
pub const MAX_SEARCH_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub total_destinations: usize,
    pub total_caches: usize,
    pub storage_healthy: bool,
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDestination {
    pub destination: DestinationRecord,
    pub score: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub total_hits: usize,
    /// At most [`MAX_SEARCH_RESULTS`], best first.
    pub results: Vec<ScoredDestination>,
}

pub struct DestinationDataService {
    store: Arc<dyn KvStore>,
    source: Arc<dyn DestinationSource>,
    cache_ttl: Duration,
}

impl DestinationDataService {
    pub fn new(store: Arc<dyn KvStore>, source: Arc<dyn DestinationSource>) -> Self {
        Self { store, source, cache_ttl: DEFAULT_CACHE_TTL }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Destinations for a free-text query, from a fresh cache entry when one
    /// exists and from the live source otherwise.
    pub async fn get_destination_data(&self, query: &str) -> Vec<DestinationRecord> {
        let key = keys::query_cache(&normalize_query(query));
        // `destination:id:` belongs to stored records; such a query is never cached.
        let cache_key = if key.starts_with(keys::DESTINATION_PREFIX) {
            tracing::warn!(query, "query overlaps the record key space, bypassing cache");
            None
        } else {
            Some(key)
        };

        if let Some(key) = &cache_key {
            if let Some(entry) = self.read_cache(key).await {
                if entry.is_fresh(OffsetDateTime::now_utc()) {
                    tracing::debug!(query, "serving cached destination data");
                    return entry.data;
                }
                tracing::debug!(query, expired_at = %entry.expires_at, "cache entry expired");
            }
        }

        let destinations = self.source.fetch_live_destination_data(query).await;
        if !destinations.is_empty() {
            self.store_destination_data(query, cache_key.as_deref(), &destinations).await;
        }
        destinations
    }

    /// Keyword search over every stored destination, best match first, at most
    /// [`MAX_SEARCH_RESULTS`] records.
    pub async fn search_stored_destinations(&self, query: &str, filters: &SearchFilters) -> Vec<DestinationRecord> {
        self.search_scored(query, filters).await.into_iter().map(|s| s.destination).collect()
    }

    pub async fn search_scored(&self, query: &str, filters: &SearchFilters) -> Vec<ScoredDestination> {
        self.search_page(query, filters).await.results
    }

    /// Ranked search plus the number of index entries that matched before the
    /// result cap.
    pub async fn search_page(&self, query: &str, filters: &SearchFilters) -> SearchPage {
        let values = match self.store.get_by_prefix(keys::SEARCH_INDEX_PREFIX).await {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "failed to load search index");
                return SearchPage::default();
            }
        };
        if values.is_empty() {
            tracing::info!("no stored destinations to search");
            return SearchPage::default();
        }

        let entries: Vec<SearchIndexRecord> = values
            .into_iter()
            .filter_map(|v| match serde_json::from_value(v) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping undecodable search index entry");
                    None
                }
            })
            .collect();

        let terms = search_terms(query);
        let ranked = rank(entries, &terms, filters);
        let total_hits = ranked.len();
        let mut results = Vec::new();
        for scored in ranked {
            if results.len() >= MAX_SEARCH_RESULTS {
                break;
            }
            let Some(destination) = self.get_destination_by_id(&scored.entry.id).await else {
                continue;
            };
            results.push(ScoredDestination { destination, score: scored.score });
        }
        tracing::info!(query, total_hits, count = results.len(), "searched stored destinations");
        SearchPage { total_hits, results }
    }

    pub async fn get_destination_by_id(&self, id: &str) -> Option<DestinationRecord> {
        match get_json(self.store.as_ref(), &keys::destination(id)).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(id, error = %e, "failed to read destination");
                None
            }
        }
    }

    pub async fn get_storage_stats(&self) -> StorageStats {
        match self.count_entries().await {
            Ok((total_destinations, total_caches)) => StorageStats {
                total_destinations,
                total_caches,
                storage_healthy: true,
                last_updated: Some(OffsetDateTime::now_utc()),
                error: None,
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to read storage stats");
                StorageStats {
                    total_destinations: 0,
                    total_caches: 0,
                    storage_healthy: false,
                    last_updated: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Persist curated records with their index projections, without a query
    /// cache entry. Returns how many were written.
    pub async fn store_destinations(&self, destinations: &[DestinationRecord]) -> Result<usize, StoreError> {
        for dest in destinations {
            self.persist_destination(dest).await?;
        }
        tracing::info!(count = destinations.len(), "stored curated destinations");
        Ok(destinations.len())
    }

    async fn read_cache(&self, key: &str) -> Option<QueryCacheEntry> {
        match get_json(self.store.as_ref(), key).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, error = %e, "unreadable cache entry, treating as miss");
                None
            }
        }
    }

    /// Write failures are logged only; the caller still gets the fetched data.
    async fn store_destination_data(&self, query: &str, key: Option<&str>, destinations: &[DestinationRecord]) {
        if let Some(key) = key {
            let entry = QueryCacheEntry::new(query, destinations.to_vec(), OffsetDateTime::now_utc(), self.cache_ttl);
            if let Err(e) = set_json(self.store.as_ref(), key, &entry).await {
                tracing::error!(key, error = %e, "failed to write query cache");
            }
        }

        let mut stored = 0;
        for dest in destinations {
            match self.persist_destination(dest).await {
                Ok(()) => stored += 1,
                Err(e) => tracing::error!(id = %dest.id, error = %e, "failed to store destination"),
            }
        }
        tracing::info!(query, stored, "stored destinations for retrieval");
    }

    /// Record and index projection go out in one batch so they never diverge.
    async fn persist_destination(&self, dest: &DestinationRecord) -> Result<(), StoreError> {
        let index = SearchIndexRecord::from_destination(dest);
        self.store
            .set_many(vec![
                (keys::destination(&dest.id), serde_json::to_value(dest)?),
                (keys::search_index(&dest.id), serde_json::to_value(&index)?),
            ])
            .await
    }

    /// (index entries, query caches). `destination:` also covers per-id records.
    async fn count_entries(&self) -> Result<(usize, usize), StoreError> {
        let indexed = self.store.get_by_prefix(keys::SEARCH_INDEX_PREFIX).await?.len();
        let under_destination = self.store.get_by_prefix(keys::QUERY_CACHE_PREFIX).await?.len();
        let records = self.store.get_by_prefix(keys::DESTINATION_PREFIX).await?.len();
        Ok((indexed, under_destination.saturating_sub(records)))
    }
}
