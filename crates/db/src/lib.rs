//! SQLite connection pool and migration runner.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use shelf_kernel::settings::DatabaseSettings;
use shelf_kernel::Migration;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const LEDGER_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

/// Owned handle to the service's database. Cloning shares the pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool for `settings.url`, creating the database file if it does not exist.
    pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(&settings.url)
            .with_context(|| format!("invalid database url '{}'", settings.url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = is_in_memory(&settings.url);

        // Every connection to `:memory:` is a separate database, so memory stores
        // get exactly one connection that is never recycled.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(settings.max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("failed to connect to database '{}'", settings.url))?;

        tracing::info!(
            target: "shelf-db",
            url = %settings.url,
            in_memory,
            "database pool ready"
        );

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply every migration not yet recorded in `schema_migrations`.
    ///
    /// Each migration runs in its own transaction together with its ledger row,
    /// so a failed migration leaves no trace. Returns the number applied.
    pub async fn migrate(&self, migrations: &[(String, Migration)]) -> anyhow::Result<usize> {
        sqlx::raw_sql(LEDGER_DDL)
            .execute(&self.pool)
            .await
            .context("failed to create migration ledger")?;

        let mut applied = 0;

        for (module, migration) in migrations {
            let already: Option<i64> =
                sqlx::query_scalar("SELECT 1 FROM schema_migrations WHERE module = ? AND id = ?")
                    .bind(module)
                    .bind(migration.id)
                    .fetch_optional(&self.pool)
                    .await
                    .with_context(|| format!("failed to read ledger for {}/{}", module, migration.id))?;

            if already.is_some() {
                tracing::debug!(target: "shelf-db", %module, id = migration.id, "migration already applied");
                continue;
            }

            let mut tx = self.pool.begin().await.context("failed to open transaction")?;

            sqlx::raw_sql(migration.up)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("migration {}/{} failed", module, migration.id))?;

            sqlx::query("INSERT INTO schema_migrations (module, id) VALUES (?, ?)")
                .bind(module)
                .bind(migration.id)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to record migration {}/{}", module, migration.id))?;

            tx.commit()
                .await
                .with_context(|| format!("failed to commit migration {}/{}", module, migration.id))?;

            tracing::info!(target: "shelf-db", %module, id = migration.id, "migration applied");
            applied += 1;
        }

        Ok(applied)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
