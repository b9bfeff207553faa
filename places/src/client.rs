//! HTTP client for the places web service.
//!
//! Wraps `reqwest` with API key handling, a bounded request timeout and typed
//! response decoding. Every endpoint checks the `"status"` field of the JSON
//! envelope and surfaces anything unexpected as [`PlacesError::ApiStatus`].

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tripdata_core::Coordinates;
use url::Url;

use crate::error::PlacesError;
use crate::types::{
    DetailsResponse, NearbyPlace, NearbySearchResponse, PlaceDetails, TextSearchResponse, STATUS_OK,
    STATUS_ZERO_RESULTS,
};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";

const DETAIL_FIELDS: &str = "name,formatted_address,geometry,rating,user_ratings_total,types,photos,\
                             price_level,opening_hours,website,editorial_summary";
const PHOTO_MAX_WIDTH: &str = "800";

/// Client for the places API. Use [`PlacesClient::with_base_url`] to point it at
/// a mock server.
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PlacesClient {
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, timeout_secs: u64, base_url: &str) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tripdata/0.1 (destination-cache)")
            .build()?;

        // Exactly one trailing slash, so endpoint paths join under it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self { client, api_key: api_key.to_owned(), base_url })
    }

    /// Free-text place search. `ZERO_RESULTS` is a success with no candidates.
    pub async fn text_search(&self, query: &str) -> Result<TextSearchResponse, PlacesError> {
        let url = self.build_url("textsearch/json", &[("query", query)])?;
        let body: TextSearchResponse = self.request_json(&url, "textsearch").await?;
        if body.status != STATUS_OK && body.status != STATUS_ZERO_RESULTS {
            return Err(PlacesError::ApiStatus { status: body.status, message: body.error_message });
        }
        Ok(body)
    }

    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let url = self.build_url("details/json", &[("place_id", place_id), ("fields", DETAIL_FIELDS)])?;
        let body: DetailsResponse = self.request_json(&url, &format!("details(place_id={place_id})")).await?;
        if body.status != STATUS_OK {
            return Err(PlacesError::ApiStatus { status: body.status, message: body.error_message });
        }
        body.result.ok_or_else(|| PlacesError::MissingResult(place_id.to_string()))
    }

    /// Points of interest of category `kind` within `radius_m` metres of `location`.
    pub async fn nearby_search(
        &self,
        location: Coordinates,
        radius_m: u32,
        kind: &str,
    ) -> Result<Vec<NearbyPlace>, PlacesError> {
        let loc = format!("{},{}", location.lat, location.lng);
        let radius = radius_m.to_string();
        let url = self.build_url("nearbysearch/json", &[("location", &loc), ("radius", &radius), ("type", kind)])?;
        let body: NearbySearchResponse = self.request_json(&url, &format!("nearbysearch(location={loc})")).await?;
        if body.status != STATUS_OK {
            return Err(PlacesError::ApiStatus { status: body.status, message: body.error_message });
        }
        Ok(body.results)
    }

    /// Public URL for a photo reference.
    pub fn photo_url(&self, photo_reference: &str) -> Result<String, PlacesError> {
        let url = self.build_url("photo", &[("maxwidth", PHOTO_MAX_WIDTH), ("photo_reference", photo_reference)])?;
        Ok(url.to_string())
    }

    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| PlacesError::InvalidBaseUrl(format!("{path}: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    async fn request_json<T: DeserializeOwned>(&self, url: &Url, context: &str) -> Result<T, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| PlacesError::Deserialize { context: context.to_string(), source })
    }
}
