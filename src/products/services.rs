use std::sync::Arc;

use axum::extract::FromRef;
use time::{Date, OffsetDateTime};
use tracing::{info, instrument};

use super::dto::{ProductPatch, ProductPayload, ProductResponse};
use super::repo::ProductRepository;
use crate::error::AppError;
use crate::state::AppState;
use crate::validation::{validate_product, validate_product_patch};

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
}

impl FromRef<AppState> for ProductService {
    fn from_ref(state: &AppState) -> Self {
        state.products.clone()
    }
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, user_id: i64) -> Result<Vec<ProductResponse>, AppError> {
        let today = today();
        let rows = self.products.list_by_user(user_id).await?;
        Ok(rows
            .into_iter()
            .map(|p| ProductResponse::project(p, today))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: i64, product_id: i64) -> Result<ProductResponse, AppError> {
        let product = self.products.find_by_user(user_id, product_id).await?;
        Ok(ProductResponse::project(product, today()))
    }

    #[instrument(skip(self, payload))]
    pub async fn create(
        &self,
        user_id: i64,
        payload: ProductPayload,
    ) -> Result<ProductResponse, AppError> {
        validate_product(&payload)?;
        let new_product = payload
            .into_new_product(user_id)
            .ok_or_else(|| AppError::BadRequest("incomplete product".into()))?;

        let product = self.products.create(new_product).await?;
        info!(product_id = product.id, "product created");
        Ok(ProductResponse::project(product, today()))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        user_id: i64,
        product_id: i64,
        patch: ProductPatch,
    ) -> Result<ProductResponse, AppError> {
        validate_product_patch(&patch)?;
        let product = self
            .products
            .update_by_user(user_id, product_id, patch.into_changes())
            .await?;
        info!(product_id, "product updated");
        Ok(ProductResponse::project(product, today()))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: i64, product_id: i64) -> Result<(), AppError> {
        self.products.delete_by_user(user_id, product_id).await?;
        info!(product_id, "product deleted");
        Ok(())
    }
}
