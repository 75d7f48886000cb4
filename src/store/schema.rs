//! Idempotent schema bootstrap, run out-of-band via `meteo-ingest init-schema`.
//!
//! The regular write path never creates tables (see
//! [`StoreError::TableNotFound`](crate::store::error::StoreError)); this is
//! the one place DDL lives. Each observation table gets a unique index on the
//! natural key, which is what makes racing writers harmless at insert time.

use crate::store::error::StoreResult;
use crate::types::dataset::DatasetKind;
use sqlx::PgPool;
use tracing::info;

/// Runs every bootstrap statement. All statements are `IF NOT EXISTS`, so the
/// command is safe to re-run.
pub async fn initialize_schema(pool: &PgPool) -> StoreResult<()> {
    for statement in bootstrap_statements() {
        sqlx::query(&statement).execute(pool).await?;
    }
    info!("schema bootstrap complete");
    Ok(())
}

/// The full DDL set: one table plus unique natural-key index per dataset kind,
/// and the `places_data` registry.
pub fn bootstrap_statements() -> Vec<String> {
    let mut statements = Vec::new();
    for kind in DatasetKind::ALL {
        let table = kind.table_name();
        let measure_columns = kind
            .measures()
            .iter()
            .map(|measure| format!("{measure} DOUBLE PRECISION"))
            .collect::<Vec<_>>()
            .join(", ");
        statements.push(format!(
            "CREATE TABLE IF NOT EXISTS {table} (\
             place_name TEXT NOT NULL, \
             date_id TIMESTAMPTZ NOT NULL, \
             {measure_columns})"
        ));
        statements.push(format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {table}_natural_key \
             ON {table} (place_name, date_id)"
        ));
    }
    statements.push(
        "CREATE TABLE IF NOT EXISTS places_data (\
         place_name TEXT PRIMARY KEY, \
         latitude DOUBLE PRECISION NOT NULL, \
         longitude DOUBLE PRECISION NOT NULL)"
            .to_string(),
    );
    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_covers_every_table_and_its_key_index() {
        let statements = bootstrap_statements();
        // Three dataset tables, three indexes, one registry.
        assert_eq!(statements.len(), 7);
        for kind in DatasetKind::ALL {
            let table = kind.table_name();
            assert!(statements
                .iter()
                .any(|s| s.contains(&format!("CREATE TABLE IF NOT EXISTS {table} "))));
            assert!(statements
                .iter()
                .any(|s| s.contains(&format!("{table}_natural_key"))
                    && s.contains("(place_name, date_id)")));
        }
        assert!(statements
            .iter()
            .any(|s| s.contains("CREATE TABLE IF NOT EXISTS places_data ")));
    }

    #[test]
    fn every_measure_column_is_nullable_double_precision() {
        let statements = bootstrap_statements();
        let daily = statements
            .iter()
            .find(|s| s.contains("daily_weather_data ("))
            .unwrap();
        for measure in DatasetKind::DailyHistory.measures() {
            assert!(daily.contains(&format!("{measure} DOUBLE PRECISION")));
            assert!(!daily.contains(&format!("{measure} DOUBLE PRECISION NOT NULL")));
        }
    }
}
