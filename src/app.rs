//! Application bootstrap: database, migrations, module lifecycle, HTTP server.

use anyhow::Context;
use axum::Router;
use shelf_db::Database;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Fully wired service: an open database with migrations applied and every
/// module registered against it.
pub struct Application {
    settings: Settings,
    db: Database,
    registry: ModuleRegistry,
}

impl Application {
    /// Connect, register modules, and apply pending migrations.
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let (db, registry, applied) = assemble(&settings).await?;
        tracing::info!(applied, modules = registry.len(), "application assembled");

        Ok(Self {
            settings,
            db,
            registry,
        })
    }

    /// The complete HTTP router, without binding a socket
    pub fn router(&self) -> Router {
        shelf_http::build_router(&self.registry, &self.settings)
    }

    /// Run the module lifecycle around the HTTP server until shutdown.
    pub async fn run(self) -> anyhow::Result<()> {
        let ctx = InitCtx {
            settings: &self.settings,
        };

        self.registry.init_all(&ctx).await?;
        self.registry.start_all(&ctx).await?;

        let served = shelf_http::start_server(&self.registry, &self.settings).await;

        // Stop modules even when the server failed, then report the first error.
        let stopped = self.registry.stop_all().await;
        self.db.close().await;

        served?;
        stopped
    }
}

/// Apply migrations and serve until shutdown.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    Application::build(settings).await?.run().await
}

/// Apply pending migrations and return how many ran.
pub async fn migrate(settings: Settings) -> anyhow::Result<usize> {
    let (db, _registry, applied) = assemble(&settings).await?;
    db.close().await;
    Ok(applied)
}

async fn assemble(settings: &Settings) -> anyhow::Result<(Database, ModuleRegistry, usize)> {
    let db = Database::connect(&settings.database)
        .await
        .context("failed to open database")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, db.pool());

    let applied = db
        .migrate(&registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;

    Ok((db, registry, applied))
}
