//! Fetch/normalize stage: one upstream call in, one observation batch out.

pub mod client;
pub mod error;
pub mod normalize;
pub mod response;

pub use client::OpenMeteoClient;
pub use error::{FetchError, NormalizeError};
pub use normalize::normalize;
pub use response::{SeriesBlock, SeriesResponse};
