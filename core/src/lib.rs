pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod source;
pub mod store;
pub mod tokenizer;

pub use catalog::{Catalog, FallbackEntry};
pub use config::ServiceConfig;
pub use error::{CatalogError, ConfigError, StoreError, UnknownDestinationType};
pub use index::{SearchFilters, SearchIndexRecord};
pub use model::{AttractionRecord, Coordinates, DestinationRecord, DestinationType, QueryCacheEntry};
pub use source::DestinationSource;
pub use store::{KvStore, MemoryStore, SledStore};
