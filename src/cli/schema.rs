//! `init-schema` command: out-of-band, idempotent bootstrap.

use crate::config::Settings;
use crate::store::repository::WeatherRepository;
use crate::store::schema::initialize_schema;
use anyhow::Result;
use tracing::info;

pub async fn execute(settings: Settings) -> Result<()> {
    let repository = WeatherRepository::from_settings(&settings.database).await?;
    initialize_schema(repository.pool()).await?;
    info!("observation tables, key indexes, and place registry are in place");
    Ok(())
}
