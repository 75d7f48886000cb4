pub mod cli;
mod config;
mod error;
mod fetch;
mod pipeline;
mod server;
mod store;
mod types;

pub use error::IngestError;

pub use config::{ApiSettings, DatabaseSettings, IngestSettings, ServerSettings, Settings};

pub use fetch::client::OpenMeteoClient;
pub use fetch::error::{FetchError, NormalizeError};
pub use fetch::normalize::{expand_timeline, normalize};
pub use fetch::response::{SeriesBlock, SeriesResponse};

pub use store::dedup::{partition_new, Partition};
pub use store::error::{StoreError, StoreResult};
pub use store::repository::{StoreOutcome, WeatherRepository};
pub use store::schema::{bootstrap_statements, initialize_schema};

pub use pipeline::{DatasetOutcome, IngestRequest, Ingestor};
pub use server::{router, AppState};

pub use types::dataset::{BlockGranularity, DatasetKind};
pub use types::observation::{NaturalKey, ObservationBatch, ObservationRow};
pub use types::place::{Place, SeriesPoint};
