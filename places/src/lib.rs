//! Upstream places API access and the live destination fetch pipeline.

pub mod client;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use pipeline::LivePipeline;
