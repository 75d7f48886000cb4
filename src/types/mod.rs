pub mod dataset;
pub mod observation;
pub mod place;
