//! HTTP handlers for `/api/books`.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shelf_http::error::AppError;

use super::models::{Book, CreateBook};
use super::service::CatalogService;

type Catalog = State<Arc<CatalogService>>;

/// Routes relative to the module mount point
pub fn router(service: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/", get(list_books).post(add_book))
        .route("/{id}", get(get_book).put(toggle_availability))
        .with_state(service)
}

async fn list_books(State(catalog): Catalog) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(catalog.list_books().await?))
}

async fn add_book(
    State(catalog): Catalog,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let book = catalog.add_book(request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book(
    State(catalog): Catalog,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    Ok(Json(catalog.get_book(id).await?))
}

async fn toggle_availability(
    State(catalog): Catalog,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    Ok(Json(catalog.toggle_availability(id).await?))
}
