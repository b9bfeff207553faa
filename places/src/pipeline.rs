use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tripdata_core::{AttractionRecord, Catalog, Coordinates, DestinationRecord, DestinationSource, ServiceConfig};

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::normalize::{attraction_from_nearby, create_basic_destination_data, destination_from_details};
use crate::types::PlaceSummary;

pub const MAX_CANDIDATES: usize = 5;
pub const MAX_ATTRACTIONS: usize = 10;
pub const MAX_PHOTOS: usize = 5;
pub const NEARBY_RADIUS_M: u32 = 10_000;
pub const NEARBY_CATEGORY: &str = "tourist_attraction";

/// Live fetch: text search, then details and nearby attractions per candidate.
///
/// Without a client (no API key) every query is answered from the catalog's
/// fallback set.
pub struct LivePipeline {
    client: Option<PlacesClient>,
    catalog: Arc<Catalog>,
}

impl LivePipeline {
    pub fn new(client: Option<PlacesClient>, catalog: Arc<Catalog>) -> Self {
        Self { client, catalog }
    }

    pub fn from_config(config: &ServiceConfig, catalog: Arc<Catalog>) -> Result<Self, PlacesError> {
        let client = match &config.places_api_key {
            Some(key) => {
                let client = match &config.places_base_url {
                    Some(base) => PlacesClient::with_base_url(key, config.http_timeout_secs, base)?,
                    None => PlacesClient::new(key, config.http_timeout_secs)?,
                };
                tracing::info!("live destination data enabled");
                Some(client)
            }
            None => {
                tracing::warn!("GOOGLE_MAPS_API_KEY not set, live destination data disabled");
                None
            }
        };
        Ok(Self::new(client, catalog))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn fetch_live_destination_data(&self, query: &str) -> Vec<DestinationRecord> {
        let Some(client) = &self.client else {
            tracing::info!(query, "places API not configured, serving fallback data");
            return self.fallback(query);
        };

        let search_query = format!("{} {} tourism", query.trim(), self.catalog.country);
        let response = match client.text_search(&search_query).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(query, error = %e, "text search failed, serving fallback data");
                return self.fallback(query);
            }
        };
        if response.results.is_empty() {
            tracing::info!(query, "no upstream results, serving fallback data");
            return self.fallback(query);
        }

        let mut destinations = Vec::with_capacity(MAX_CANDIDATES);
        for place in response.results.iter().take(MAX_CANDIDATES) {
            destinations.push(self.enrich_destination_data(client, place, query).await);
        }
        tracing::info!(query, count = destinations.len(), "fetched live destinations");
        destinations
    }

    /// Details plus nearby attractions for one candidate. Never fails: any
    /// upstream problem degrades this place to a basic record.
    pub async fn enrich_destination_data(
        &self,
        client: &PlacesClient,
        place: &PlaceSummary,
        query: &str,
    ) -> DestinationRecord {
        let now = OffsetDateTime::now_utc();
        let Some(place_id) = place.place_id.as_deref() else {
            tracing::warn!(name = ?place.name, "candidate has no place id, using basic record");
            return create_basic_destination_data(&self.catalog, place, query, now);
        };

        let details = match client.place_details(place_id).await {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(place_id, error = %e, "details lookup failed, using basic record");
                return create_basic_destination_data(&self.catalog, place, query, now);
            }
        };

        let mut photo_urls = Vec::new();
        for photo in details.photos.iter().take(MAX_PHOTOS) {
            match client.photo_url(&photo.photo_reference) {
                Ok(url) => photo_urls.push(url),
                Err(e) => tracing::warn!(place_id, error = %e, "skipping photo"),
            }
        }
        let attractions = self
            .fetch_nearby_attractions(client, details.geometry.location.into(), &details.name)
            .await;

        destination_from_details(&self.catalog, place_id, details, attractions, photo_urls, query, now)
    }

    /// Up to [`MAX_ATTRACTIONS`] tourist attractions around `location`; empty on any failure.
    pub async fn fetch_nearby_attractions(
        &self,
        client: &PlacesClient,
        location: Coordinates,
        place_name: &str,
    ) -> Vec<AttractionRecord> {
        match client.nearby_search(location, NEARBY_RADIUS_M, NEARBY_CATEGORY).await {
            Ok(places) => {
                let attractions: Vec<AttractionRecord> = places
                    .into_iter()
                    .take(MAX_ATTRACTIONS)
                    .map(|p| attraction_from_nearby(&self.catalog, p))
                    .collect();
                tracing::debug!(place_name, count = attractions.len(), "fetched nearby attractions");
                attractions
            }
            Err(e) => {
                tracing::warn!(place_name, error = %e, "nearby search failed");
                Vec::new()
            }
        }
    }

    fn fallback(&self, query: &str) -> Vec<DestinationRecord> {
        self.catalog.fallback_for(query, OffsetDateTime::now_utc())
    }
}

#[async_trait]
impl DestinationSource for LivePipeline {
    async fn fetch_live_destination_data(&self, query: &str) -> Vec<DestinationRecord> {
        LivePipeline::fetch_live_destination_data(self, query).await
    }
}
