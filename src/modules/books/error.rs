use serde_json::json;
use shelf_http::error::AppError;
use thiserror::Error;

/// Failures of the catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("missing required field(s): {}", .fields.join(", "))]
    Validation { fields: Vec<&'static str> },

    #[error("book {0} not found")]
    NotFound(i64),

    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation { ref fields } => {
                let details = fields
                    .iter()
                    .map(|field| json!({"field": field, "error": "required"}))
                    .collect();
                AppError::validation(details, err.to_string())
            }
            CatalogError::NotFound(_) => AppError::not_found(err.to_string()),
            CatalogError::Persistence(e) => {
                AppError::Internal(anyhow::Error::new(e).context("book store unavailable"))
            }
        }
    }
}
