pub mod ingest;
pub mod service;

pub use service::{DestinationDataService, ScoredDestination, SearchPage, StorageStats};

use anyhow::Result;
use std::sync::Arc;
use tripdata_core::{KvStore, ServiceConfig};
use tripdata_places::LivePipeline;

/// Wire catalog, live pipeline and store into a service per `config`.
pub fn build_service(config: &ServiceConfig, store: Arc<dyn KvStore>) -> Result<DestinationDataService> {
    let catalog = Arc::new(ingest::load_catalog(config)?);
    let pipeline = LivePipeline::from_config(config, catalog)?;
    Ok(DestinationDataService::new(store, Arc::new(pipeline)).with_cache_ttl(config.cache_ttl()))
}
