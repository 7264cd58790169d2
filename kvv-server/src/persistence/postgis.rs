//! PostGIS-backed stop sink.
//!
//! Opens one connection per upsert batch. The `stops` table is created on
//! first use. Name and geometry are always overwritten; city, MOT codes
//! and the search text only replace stored values when the new value is
//! non-empty.

use chrono::Utc;
use futures::future::BoxFuture;
use tokio_postgres::NoTls;
use tracing::warn;

use crate::domain::StopRecord;

use super::StopSink;
use super::error::PersistenceError;

const SCHEMA_SQL: &str = "
    CREATE EXTENSION IF NOT EXISTS postgis;

    CREATE TABLE IF NOT EXISTS stops (
        id text PRIMARY KEY,
        name text NOT NULL,
        city text,
        mot_codes integer[] NOT NULL DEFAULT '{}',
        geom geometry(Point, 4326) NOT NULL,
        search_query text,
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now()
    );

    CREATE INDEX IF NOT EXISTS stops_geom_idx ON stops USING GIST (geom);
";

const UPSERT_SQL: &str = "
    INSERT INTO stops (id, name, city, mot_codes, geom, search_query, created_at, updated_at)
    VALUES ($1, $2, $3, $4, ST_SetSRID(ST_MakePoint($5::float8, $6::float8), 4326), $7, $8, $8)
    ON CONFLICT (id) DO UPDATE SET
        name = EXCLUDED.name,
        geom = EXCLUDED.geom,
        city = COALESCE(NULLIF(EXCLUDED.city, ''), stops.city),
        mot_codes = CASE
            WHEN cardinality(EXCLUDED.mot_codes) > 0 THEN EXCLUDED.mot_codes
            ELSE stops.mot_codes
        END,
        search_query = COALESCE(NULLIF(EXCLUDED.search_query, ''), stops.search_query),
        updated_at = EXCLUDED.updated_at;
";

/// Connection settings for the PostGIS sink.
#[derive(Debug, Clone)]
pub struct PostgisConfig {
    /// libpq-style connection string or `postgres://` URL
    pub url: String,
    /// Run `CREATE ... IF NOT EXISTS` before each batch
    pub ensure_schema: bool,
}

impl PostgisConfig {
    /// Create a new config for the given connection string.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ensure_schema: true,
        }
    }

    /// Skip schema creation (for databases managed elsewhere).
    pub fn without_schema_setup(mut self) -> Self {
        self.ensure_schema = false;
        self
    }
}

/// Upserts stops into a PostGIS `stops` table.
#[derive(Debug, Clone)]
pub struct PostgisSink {
    config: PostgisConfig,
}

impl PostgisSink {
    /// Create a sink. Fails if the connection string is blank.
    pub fn new(config: PostgisConfig) -> Result<Self, PersistenceError> {
        if config.url.trim().is_empty() {
            return Err(PersistenceError::NotConfigured);
        }
        Ok(Self { config })
    }

    async fn write(&self, stops: &[StopRecord], query: &str) -> Result<usize, PersistenceError> {
        let (mut client, connection) = tokio_postgres::connect(&self.config.url, NoTls)
            .await
            .map_err(PersistenceError::Connect)?;

        // The connection object performs the actual communication with the
        // database, so it runs on its own task.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!("postgis connection error: {e}");
            }
        });

        if self.config.ensure_schema {
            client.batch_execute(SCHEMA_SQL).await?;
        }

        let transaction = client.transaction().await?;
        let statement = transaction.prepare(UPSERT_SQL).await?;
        let now = Utc::now();

        for stop in stops {
            transaction
                .execute(
                    &statement,
                    &[
                        &stop.id,
                        &stop.name,
                        &stop.city,
                        &stop.mot_codes,
                        &stop.longitude(),
                        &stop.latitude(),
                        &query,
                        &now,
                    ],
                )
                .await?;
        }

        transaction.commit().await?;
        Ok(stops.len())
    }
}

impl StopSink for PostgisSink {
    fn upsert<'a>(
        &'a self,
        stops: &'a [StopRecord],
        query: &'a str,
    ) -> BoxFuture<'a, Result<usize, PersistenceError>> {
        Box::pin(self.write(stops, query))
    }
}
