use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewProduct, Product, ProductChanges};
use crate::error::{RepoError, RepoResult};

/// Every operation is scoped by owner; a row belonging to someone else is
/// indistinguishable from a missing one.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Live products of `user_id`, oldest first.
    async fn list_by_user(&self, user_id: i64) -> RepoResult<Vec<Product>>;
    async fn find_by_user(&self, user_id: i64, product_id: i64) -> RepoResult<Product>;
    async fn create(&self, new_product: NewProduct) -> RepoResult<Product>;
    async fn update_by_user(
        &self,
        user_id: i64,
        product_id: i64,
        changes: ProductChanges,
    ) -> RepoResult<Product>;
    /// Soft delete: sets `deleted_at`, the row stays in the table.
    async fn delete_by_user(&self, user_id: i64, product_id: i64) -> RepoResult<()>;
}

#[derive(Clone)]
pub struct PgProductRepository {
    db: PgPool,
}

impl PgProductRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const COLUMNS: &str = "id, user_id, name, description, quantity, expiry_date, expiry_type, \
                       is_notified, created_at, updated_at, deleted_at";

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list_by_user(&self, user_id: i64) -> RepoResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM products
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_user(&self, user_id: i64, product_id: i64) -> RepoResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM products
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#
        ))
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound)
    }

    async fn create(&self, p: NewProduct) -> RepoResult<Product> {
        let row = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products
                (user_id, name, description, quantity, expiry_date, expiry_type, is_notified)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(p.user_id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.quantity)
        .bind(p.expiry_date)
        .bind(p.expiry_type)
        .bind(p.is_notified)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update_by_user(
        &self,
        user_id: i64,
        product_id: i64,
        c: ProductChanges,
    ) -> RepoResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products SET
                name        = COALESCE($3, name),
                description = COALESCE($4, description),
                quantity    = COALESCE($5, quantity),
                expiry_date = COALESCE($6, expiry_date),
                expiry_type = COALESCE($7, expiry_type),
                is_notified = COALESCE($8, is_notified),
                updated_at  = now()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            RETURNING {COLUMNS}
            "#
        ))
        .bind(product_id)
        .bind(user_id)
        .bind(c.name)
        .bind(c.description)
        .bind(c.quantity)
        .bind(c.expiry_date)
        .bind(c.expiry_type)
        .bind(c.is_notified)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound)
    }

    async fn delete_by_user(&self, user_id: i64, product_id: i64) -> RepoResult<()> {
        let res = sqlx::query(
            r#"
            UPDATE products
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;
        if res.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
