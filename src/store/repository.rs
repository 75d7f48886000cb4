//! Incremental write path: read the key projection, partition, append.

use crate::config::DatabaseSettings;
use crate::store::dedup::partition_new;
use crate::store::error::{StoreError, StoreResult};
use crate::types::dataset::DatasetKind;
use crate::types::observation::{NaturalKey, ObservationBatch};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

/// What one incremental write did with its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOutcome {
    /// Rows actually appended.
    pub appended: u64,
    /// Rows discarded as duplicates of existing natural keys.
    pub skipped: usize,
}

/// Append-only repository over the per-dataset observation tables.
///
/// All writes go through [`WeatherRepository::save_batch`], which enforces the
/// at-most-once-per-natural-key invariant: dedup against the stored key
/// projection first, and a unique index with `ON CONFLICT DO NOTHING` as the
/// store-level guard for writers racing between the key read and the append.
#[derive(Debug, Clone)]
pub struct WeatherRepository {
    pool: PgPool,
}

impl WeatherRepository {
    /// Wraps an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool from settings and wraps it.
    pub async fn from_settings(settings: &DatabaseSettings) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&settings.url)
            .await?;
        Ok(Self::new(pool))
    }

    /// The underlying pool, for schema bootstrap and read helpers.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Appends the rows of `batch` whose natural key is not yet present in the
    /// dataset's table; duplicates are discarded, never updated.
    ///
    /// The table must already exist ([`StoreError::TableNotFound`] otherwise;
    /// bootstrap is an out-of-band step, see [`crate::store::schema`]). The
    /// append runs in one transaction: a failed write leaves the table in its
    /// pre-call state.
    pub async fn save_batch(&self, batch: ObservationBatch) -> StoreResult<StoreOutcome> {
        let kind = batch.kind;
        let table = kind.table_name();
        self.ensure_table_exists(table).await?;

        let existing = self.existing_keys(kind).await?;
        let partition = partition_new(kind, batch.rows, &existing)?;

        if partition.new_rows.is_empty() {
            info!(%kind, skipped = partition.duplicates, "no new rows, table is up to date");
            return Ok(StoreOutcome {
                appended: 0,
                skipped: partition.duplicates,
            });
        }

        let statement = insert_statement(kind);
        let mut tx = self.pool.begin().await?;
        let mut appended = 0u64;
        for row in &partition.new_rows {
            let mut query = sqlx::query(&statement)
                .bind(&row.place_name)
                .bind(row.timestamp);
            for value in &row.values {
                query = query.bind(*value);
            }
            appended += query.execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        info!(%kind, appended, skipped = partition.duplicates, "incremental write committed");
        Ok(StoreOutcome {
            appended,
            skipped: partition.duplicates,
        })
    }

    /// Reads only the key columns of `kind`'s table, UTC-normalized.
    ///
    /// Projecting to the key columns bounds the read cost regardless of how
    /// many measure columns the table carries.
    pub async fn existing_keys(&self, kind: DatasetKind) -> StoreResult<HashSet<NaturalKey>> {
        let query = format!(
            "SELECT place_name, date_id FROM {}",
            kind.table_name()
        );
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        let mut keys = HashSet::with_capacity(rows.len());
        for row in rows {
            let place_name: String = row.try_get("place_name")?;
            let timestamp: DateTime<Utc> = row.try_get("date_id")?;
            keys.insert(NaturalKey::new(place_name, timestamp));
        }
        debug!(kind = %kind, existing = keys.len(), "loaded key projection");
        Ok(keys)
    }

    /// Fails fast when the target table is missing rather than letting the
    /// driver create or guess at a differently-shaped one.
    async fn ensure_table_exists(&self, table: &str) -> StoreResult<()> {
        let found: Option<String> = sqlx::query_scalar("SELECT to_regclass($1)::text")
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
        if found.is_none() {
            return Err(StoreError::TableNotFound(table.to_string()));
        }
        Ok(())
    }
}

/// Builds the per-dataset insert statement: key columns first, then the
/// measure columns in positional order. The `ON CONFLICT DO NOTHING` clause
/// rides on the unique natural-key index so two racing writers cannot both
/// land the same key.
fn insert_statement(kind: DatasetKind) -> String {
    let measures = kind.measures();
    let columns = measures.join(", ");
    let placeholders = (0..measures.len())
        .map(|i| format!("${}", i + 3))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} (place_name, date_id, {}) VALUES ($1, $2, {}) \
         ON CONFLICT (place_name, date_id) DO NOTHING",
        kind.table_name(),
        columns,
        placeholders
    )
}
