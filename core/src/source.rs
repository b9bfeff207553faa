use crate::model::DestinationRecord;
use async_trait::async_trait;

/// Producer of fresh destination records for a free-text query.
///
/// Implementations absorb their own failures: an unreachable upstream yields
/// fallback data or an empty list, never an error.
#[async_trait]
pub trait DestinationSource: Send + Sync {
    async fn fetch_live_destination_data(&self, query: &str) -> Vec<DestinationRecord>;
}
