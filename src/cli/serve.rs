//! `serve` command: bind the router and run until shutdown.

use crate::config::Settings;
use crate::fetch::client::OpenMeteoClient;
use crate::pipeline::Ingestor;
use crate::server::{router, AppState};
use crate::store::repository::WeatherRepository;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub async fn execute(settings: Settings) -> Result<()> {
    let repository = WeatherRepository::from_settings(&settings.database).await?;
    let client = OpenMeteoClient::new(settings.api.clone());
    let ingestor = Ingestor::new(client, repository, settings.ingest.clone());

    let state = AppState {
        ingestor: Arc::new(ingestor),
    };
    let app = router(state);

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "meteo-ingest listening");
    axum::serve(listener, app).await?;
    Ok(())
}
