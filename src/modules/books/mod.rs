pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Migration, Module};
use sqlx::SqlitePool;

use repository::SqliteBookRepository;
use service::CatalogService;

/// Book inventory module: list, add, fetch, and toggle availability
pub struct BooksModule {
    service: Arc<CatalogService>,
}

impl BooksModule {
    pub fn new(service: Arc<CatalogService>) -> Self {
        Self { service }
    }

    /// Wire the module against a SQLite pool
    pub fn with_pool(pool: SqlitePool) -> Self {
        let repo = SqliteBookRepository::new(pool);
        Self::new(Arc::new(CatalogService::new(Arc::new(repo))))
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id           INTEGER PRIMARY KEY AUTOINCREMENT,
                    title        TEXT    NOT NULL CHECK (length(trim(title)) > 0),
                    author       TEXT    NOT NULL CHECK (length(trim(author)) > 0),
                    is_available BOOLEAN NOT NULL DEFAULT 1
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let id_param = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    });

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "Every book in the catalog",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            }
                        },
                        "500": error_response("Internal server error")
                    }
                },
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateBook" }
                            }
                        }
                    },
                    "responses": {
                        "201": book_response("The stored book"),
                        "400": error_response("Missing title or author, or malformed body"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Fetch a book",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "responses": {
                        "200": book_response("The book"),
                        "404": error_response("Unknown id")
                    }
                },
                "put": {
                    "summary": "Toggle a book's availability",
                    "tags": ["Books"],
                    "parameters": [id_param],
                    "responses": {
                        "200": book_response("The book with its flag flipped"),
                        "404": error_response("Unknown id")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "is_available": { "type": "boolean" }
                    },
                    "required": ["id", "title", "author", "is_available"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" }
                    },
                    "required": ["title", "author"]
                }
            }
        }
    })
}

/// Create the books module against a pool
pub fn create_module(pool: SqlitePool) -> Arc<dyn Module> {
    Arc::new(BooksModule::with_pool(pool))
}

#[cfg(test)]
pub(crate) mod test_support {
    use shelf_db::Database;
    use shelf_kernel::{settings::DatabaseSettings, Module};
    use sqlx::SqlitePool;

    /// Fresh in-memory store with the books schema applied
    pub async fn migrated_pool() -> SqlitePool {
        let db = Database::connect(&DatabaseSettings::in_memory()).await.unwrap();
        let module = super::BooksModule::with_pool(db.pool().clone());
        let migrations: Vec<_> = module
            .migrations()
            .into_iter()
            .map(|m| (module.name().to_string(), m))
            .collect();
        db.migrate(&migrations).await.unwrap();
        db.pool().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_fragment_covers_both_paths() {
        let spec = openapi_fragment();
        assert!(spec["paths"]["/"]["post"]["responses"]["201"].is_object());
        assert!(spec["paths"]["/{id}"]["put"]["responses"]["404"].is_object());
        assert!(spec["components"]["schemas"]["Book"].is_object());
    }
}
