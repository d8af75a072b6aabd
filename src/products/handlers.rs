use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{ProductPatch, ProductPayload, ProductResponse};
use super::services::ProductService;
use crate::{auth::middleware::AuthenticatedIdentity, error::AppError, state::AppState};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:product_id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[instrument(skip_all, fields(user_id = identity.user_id))]
pub async fn list_products(
    identity: AuthenticatedIdentity,
    State(products): State<ProductService>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    Ok(Json(products.list(identity.user_id).await?))
}

#[instrument(skip_all, fields(user_id = identity.user_id))]
pub async fn get_product(
    identity: AuthenticatedIdentity,
    State(products): State<ProductService>,
    product_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let Path(product_id) = product_id?;
    Ok(Json(products.get(identity.user_id, product_id).await?))
}

#[instrument(skip_all, fields(user_id = identity.user_id))]
pub async fn create_product(
    identity: AuthenticatedIdentity,
    State(products): State<ProductService>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let Json(payload) = payload?;
    let product = products.create(identity.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip_all, fields(user_id = identity.user_id))]
pub async fn update_product(
    identity: AuthenticatedIdentity,
    State(products): State<ProductService>,
    product_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let Path(product_id) = product_id?;
    let Json(patch) = payload?;
    Ok(Json(products.update(identity.user_id, product_id, patch).await?))
}

#[instrument(skip_all, fields(user_id = identity.user_id))]
pub async fn delete_product(
    identity: AuthenticatedIdentity,
    State(products): State<ProductService>,
    product_id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(product_id) = product_id?;
    products.delete(identity.user_id, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
