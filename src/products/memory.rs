use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::repo::ProductRepository;
use super::repo_types::{NewProduct, Product, ProductChanges};
use crate::error::{RepoError, RepoResult};

/// Test double; keeps soft-deleted rows around like the real table.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn live(p: &Product, user_id: i64, product_id: i64) -> bool {
    p.id == product_id && p.user_id == user_id && p.deleted_at.is_none()
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_by_user(&self, user_id: i64) -> RepoResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut owned: Vec<Product> = products
            .iter()
            .filter(|p| p.user_id == user_id && p.deleted_at.is_none())
            .cloned()
            .collect();
        owned.sort_by_key(|p| (p.created_at, p.id));
        Ok(owned)
    }

    async fn find_by_user(&self, user_id: i64, product_id: i64) -> RepoResult<Product> {
        let products = self.products.read().await;
        products
            .iter()
            .find(|p| live(p, user_id, product_id))
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn create(&self, new: NewProduct) -> RepoResult<Product> {
        let mut products = self.products.write().await;
        let now = OffsetDateTime::now_utc();
        let product = Product {
            id: products.len() as i64 + 1,
            user_id: new.user_id,
            name: new.name,
            description: new.description,
            quantity: new.quantity,
            expiry_date: new.expiry_date,
            expiry_type: new.expiry_type,
            is_notified: new.is_notified,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        products.push(product.clone());
        Ok(product)
    }

    async fn update_by_user(
        &self,
        user_id: i64,
        product_id: i64,
        c: ProductChanges,
    ) -> RepoResult<Product> {
        let mut products = self.products.write().await;
        let p = products
            .iter_mut()
            .find(|p| live(p, user_id, product_id))
            .ok_or(RepoError::NotFound)?;
        if let Some(name) = c.name {
            p.name = name;
        }
        if let Some(description) = c.description {
            p.description = description;
        }
        if let Some(quantity) = c.quantity {
            p.quantity = quantity;
        }
        if let Some(expiry_date) = c.expiry_date {
            p.expiry_date = expiry_date;
        }
        if let Some(expiry_type) = c.expiry_type {
            p.expiry_type = expiry_type;
        }
        if let Some(is_notified) = c.is_notified {
            p.is_notified = is_notified;
        }
        p.updated_at = OffsetDateTime::now_utc();
        Ok(p.clone())
    }

    async fn delete_by_user(&self, user_id: i64, product_id: i64) -> RepoResult<()> {
        let mut products = self.products.write().await;
        let p = products
            .iter_mut()
            .find(|p| live(p, user_id, product_id))
            .ok_or(RepoError::NotFound)?;
        let now = OffsetDateTime::now_utc();
        p.deleted_at = Some(now);
        p.updated_at = now;
        Ok(())
    }
}
