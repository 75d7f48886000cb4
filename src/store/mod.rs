//! Incremental store stage: append-only, deduplicated on the natural key.

pub mod dedup;
pub mod error;
pub mod repository;
pub mod schema;
pub mod series;

pub use dedup::{partition_new, Partition};
pub use error::{StoreError, StoreResult};
pub use repository::{StoreOutcome, WeatherRepository};
pub use schema::initialize_schema;
