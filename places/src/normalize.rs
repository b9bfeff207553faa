//! Mapping from upstream place payloads to [`DestinationRecord`]s.

use time::OffsetDateTime;
use tripdata_core::model::{DestinationMetadata, Sources, TravelInfo};
use tripdata_core::{AttractionRecord, Catalog, Coordinates, DestinationRecord, DestinationType};

use crate::types::{NearbyPlace, PlaceDetails, PlaceSummary};

pub const DEFAULT_ATTRACTION_TYPE: &str = "attraction";

/// `dest_<place id>`, or `dest_<unix millis>` when the upstream has no id.
pub fn record_id(place_id: Option<&str>, now: OffsetDateTime) -> String {
    match place_id {
        Some(id) => format!("dest_{id}"),
        None => format!("dest_{}", now.unix_timestamp_nanos() / 1_000_000),
    }
}

/// Fully enriched record from a details lookup.
pub fn destination_from_details(
    catalog: &Catalog,
    place_id: &str,
    details: PlaceDetails,
    attractions: Vec<AttractionRecord>,
    photo_urls: Vec<String>,
    query: &str,
    now: OffsetDateTime,
) -> DestinationRecord {
    let kind = catalog.destination_type(&details.types);
    let state = catalog.extract_state(details.formatted_address.as_deref().unwrap_or(""));
    let tags = catalog.generate_tags(&details.types, query);
    let description = details
        .editorial_summary
        .and_then(|s| s.overview)
        .filter(|o| !o.trim().is_empty())
        .unwrap_or_else(|| catalog.describe(&details.name, kind, &tags));

    DestinationRecord {
        id: record_id(Some(place_id), now),
        name: details.name,
        country: catalog.country.clone(),
        kind,
        description,
        coordinates: details.geometry.location.into(),
        attractions,
        travel_info: TravelInfo {
            best_season: catalog.best_season(&state).to_string(),
            avg_duration: catalog.visit_duration(kind).to_string(),
            estimated_budget: catalog.estimate_budget(details.price_level),
            accessibility: catalog.accessibility.clone(),
        },
        metadata: DestinationMetadata {
            rating: details.rating,
            total_reviews: details.user_ratings_total,
            photo_urls,
            popular_with: catalog.audiences(&tags),
            climate: Some(catalog.climate(&state).to_string()),
            languages: catalog.languages(&state).to_vec(),
        },
        sources: Sources::fetched(Some(place_id.to_string()), now),
        state: Some(state),
        tags,
    }
}

/// Minimal record built only from what the text search returned.
pub fn create_basic_destination_data(
    catalog: &Catalog,
    place: &PlaceSummary,
    query: &str,
    now: OffsetDateTime,
) -> DestinationRecord {
    let name = place
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| query.trim().to_string());
    DestinationRecord {
        id: record_id(place.place_id.as_deref(), now),
        description: format!("{name} is a destination in {}.", catalog.country),
        name,
        state: None,
        country: catalog.country.clone(),
        kind: DestinationType::General,
        coordinates: place.geometry.map(|g| g.location.into()).unwrap_or_default(),
        tags: catalog.generate_tags(&place.types, query),
        attractions: Vec::new(),
        travel_info: catalog.basic_travel_info.clone(),
        metadata: DestinationMetadata { rating: place.rating, ..Default::default() },
        sources: Sources::fetched(place.place_id.clone(), now),
    }
}

pub fn attraction_from_nearby(catalog: &Catalog, place: NearbyPlace) -> AttractionRecord {
    let kind = place.types.first().cloned().unwrap_or_else(|| DEFAULT_ATTRACTION_TYPE.to_string());
    let estimated_cost = catalog.attraction_cost(&place.types);
    let coordinates: Coordinates = place.geometry.location.into();
    AttractionRecord {
        name: place.name,
        kind,
        rating: place.rating,
        description: place.vicinity,
        coordinates: Some(coordinates),
        estimated_cost,
        duration: catalog.attraction_duration.clone(),
        tags: place.types.into_iter().filter(|t| !t.contains('_')).collect(),
    }
}
