use super::{AudienceRule, Catalog, CategoryRule, FallbackEntry, LookupTable};
use crate::model::{
    AttractionRecord, Coordinates, DestinationMetadata, DestinationRecord, DestinationType, Sources, TravelInfo,
};
use std::collections::BTreeMap;

const REGIONS: &[&str] = &[
    "Andhra Pradesh", "Arunachal Pradesh", "Assam", "Bihar", "Chhattisgarh",
    "Goa", "Gujarat", "Haryana", "Himachal Pradesh", "Jharkhand",
    "Karnataka", "Kerala", "Madhya Pradesh", "Maharashtra", "Manipur",
    "Meghalaya", "Mizoram", "Nagaland", "Odisha", "Punjab",
    "Rajasthan", "Sikkim", "Tamil Nadu", "Telangana", "Tripura",
    "Uttar Pradesh", "Uttarakhand", "West Bengal",
];

const CATEGORY_TAGS: &[(&str, &[&str])] = &[
    ("tourist_attraction", &["tourism", "sightseeing"]),
    ("natural_feature", &["nature", "scenic"]),
    ("hindu_temple", &["spiritual", "heritage", "temple"]),
    ("museum", &["heritage", "culture", "history"]),
    ("park", &["nature", "outdoor", "relaxation"]),
    ("beach", &["beach", "coastal", "water sports"]),
    ("mountain", &["adventure", "trekking", "mountains"]),
];

const QUERY_KEYWORDS: &[&str] = &[
    "heritage", "beach", "adventure", "spiritual", "nature", "nightlife", "food", "shopping", "wildlife",
];

const AUDIENCES: &[(&str, &str)] = &[
    ("adventure", "Adventure seekers"),
    ("heritage", "History buffs"),
    ("beach", "Beach lovers"),
    ("spiritual", "Spiritual travelers"),
    ("nature", "Nature enthusiasts"),
];

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

pub(super) fn catalog() -> Catalog {
    Catalog {
        country: "India".into(),
        regions: strings(REGIONS),
        best_season: LookupTable::new("Oct-Mar".to_string())
            .with("Goa", "Nov-Feb".into())
            .with("Kerala", "Sep-Mar".into())
            .with("Rajasthan", "Oct-Mar".into())
            .with("Himachal Pradesh", "Mar-Jun, Sep-Nov".into())
            .with("Uttarakhand", "Apr-Jun, Sep-Nov".into())
            .with("Tamil Nadu", "Nov-Mar".into()),
        climate: LookupTable::new("Moderate".to_string())
            .with("Goa", "Tropical".into())
            .with("Kerala", "Tropical".into())
            .with("Rajasthan", "Arid".into())
            .with("Himachal Pradesh", "Alpine".into())
            .with("Uttarakhand", "Alpine".into()),
        languages: LookupTable::new(strings(&["Hindi", "English"]))
            .with("Goa", strings(&["Konkani", "Hindi", "English"]))
            .with("Kerala", strings(&["Malayalam", "Hindi", "English"]))
            .with("Rajasthan", strings(&["Hindi", "Rajasthani", "English"]))
            .with("Tamil Nadu", strings(&["Tamil", "Hindi", "English"]))
            .with("Karnataka", strings(&["Kannada", "Hindi", "English"])),
        visit_duration: LookupTable::new("3-4 days".to_string())
            .with("beach", "4-5 days".into())
            .with("mountain", "5-7 days".into())
            .with("heritage", "2-3 days".into())
            .with("temple", "1-2 days".into())
            .with("city", "3-5 days".into()),
        description_templates: LookupTable::new(
            "{name} is a popular tourist destination in {country}, known for {tags}.".to_string(),
        )
        .with("beach", "{name} is a beautiful coastal destination known for its pristine beaches and water activities.".into())
        .with("mountain", "{name} is a scenic mountain destination perfect for trekking and adventure sports.".into())
        .with("heritage", "{name} is a historic site showcasing {country}'s rich cultural heritage.".into())
        .with("temple", "{name} is a sacred spiritual destination with architectural beauty.".into())
        .with("city", "{name} is a vibrant city offering diverse experiences for travelers.".into()),
        base_budget: 15_000,
        default_price_level: 2,
        accessibility: "Good".into(),
        type_rules: vec![
            CategoryRule::new(&["natural_feature"], DestinationType::Beach),
            CategoryRule::new(&["mountain"], DestinationType::Mountain),
            CategoryRule::new(&["hindu_temple", "place_of_worship"], DestinationType::Temple),
            CategoryRule::new(&["museum", "landmark"], DestinationType::Heritage),
            CategoryRule::new(&["park"], DestinationType::Wildlife),
            CategoryRule::new(&["locality", "administrative_area_level_2"], DestinationType::City),
        ],
        category_tags: CATEGORY_TAGS
            .iter()
            .map(|(k, v)| (k.to_string(), strings(v)))
            .collect::<BTreeMap<_, _>>(),
        query_keywords: strings(QUERY_KEYWORDS),
        audiences: AUDIENCES
            .iter()
            .map(|(tag, audience)| AudienceRule { tag: tag.to_string(), audience: audience.to_string() })
            .collect(),
        default_audience: "All travelers".into(),
        attraction_costs: vec![
            CategoryRule::new(&["museum"], 500),
            CategoryRule::new(&["park"], 200),
            CategoryRule::new(&["hindu_temple"], 0),
        ],
        default_attraction_cost: 300,
        attraction_duration: "2-3 hours".into(),
        basic_travel_info: TravelInfo {
            best_season: "Oct-Mar".into(),
            avg_duration: "3-4 days".into(),
            estimated_budget: 20_000,
            accessibility: "Good".into(),
        },
        fallback: vec![arunachal_pradesh()],
    }
}

fn attraction(name: &str, kind: &str, rating: f64, duration: &str, cost: u32, tags: &[&str]) -> AttractionRecord {
    AttractionRecord {
        name: name.into(),
        kind: kind.into(),
        rating: Some(rating),
        description: None,
        coordinates: None,
        estimated_cost: cost,
        duration: duration.into(),
        tags: strings(tags),
    }
}

fn arunachal_pradesh() -> FallbackEntry {
    FallbackEntry {
        key: "arunachal pradesh".into(),
        record: DestinationRecord {
            id: "dest_arunachal".into(),
            name: "Arunachal Pradesh".into(),
            state: Some("Arunachal Pradesh".into()),
            country: "India".into(),
            kind: DestinationType::Region,
            description: "Arunachal Pradesh is the land of rising sun, known for its pristine natural beauty, \
                          Buddhist monasteries, and diverse tribal culture."
                .into(),
            coordinates: Coordinates { lat: 28.2180, lng: 94.7278 },
            tags: strings(&["nature", "adventure", "mountains", "trekking", "spiritual", "wildlife"]),
            attractions: vec![
                attraction("Tawang Monastery", "spiritual", 4.7, "2-3 hours", 0, &["heritage", "spiritual"]),
                attraction("Sela Pass", "scenic", 4.8, "1-2 hours", 0, &["nature", "photography"]),
                attraction("Ziro Valley", "nature", 4.6, "1 day", 500, &["nature", "culture"]),
                attraction("Namdapha National Park", "wildlife", 4.5, "1-2 days", 2000, &["wildlife", "nature"]),
            ],
            travel_info: TravelInfo {
                best_season: "Mar-Oct".into(),
                avg_duration: "7-10 days".into(),
                estimated_budget: 35_000,
                accessibility: "Moderate (requires permits)".into(),
            },
            metadata: DestinationMetadata {
                rating: Some(4.6),
                total_reviews: Some(1200),
                photo_urls: Vec::new(),
                popular_with: strings(&["Adventure seekers", "Nature lovers", "Photography enthusiasts"]),
                climate: Some("Alpine".into()),
                languages: strings(&["Hindi", "English", "Local dialects"]),
            },
            sources: Sources::default(),
        },
    }
}
