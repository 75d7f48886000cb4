use thiserror::Error;

/// Failures in the incremental store path.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Table '{0}' does not exist; run `meteo-ingest init-schema` first")]
    TableNotFound(String),

    #[error("Malformed batch for table '{table}': {reason}")]
    MalformedBatch { table: String, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_error_points_at_the_bootstrap_command() {
        let err = StoreError::TableNotFound("daily_weather_data".to_string());
        let message = err.to_string();
        assert!(message.contains("daily_weather_data"));
        assert!(message.contains("init-schema"));
    }
}
