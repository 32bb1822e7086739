//! Product repository.

use async_trait::async_trait;
use roya_core::ProductId;

use super::{PgStore, RepositoryError};
use crate::models::Product;

/// Persistence for the product catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products in insertion order.
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn count_products(&self) -> Result<u64, RepositoryError>;

    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;

    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError>;

    /// Set the title of the product with `id`. Returns `false` if none matched.
    async fn rename_product(&self, id: &ProductId, title: &str) -> Result<bool, RepositoryError>;

    /// Delete the product with `id`. Returns `false` if none matched.
    async fn delete_product(&self, id: &ProductId) -> Result<bool, RepositoryError>;
}

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    title: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
        }
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, title
            FROM roya.product
            ORDER BY created_at, id
            ",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn count_products(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roya.product")
            .fetch_one(self.pool())
            .await?;

        u64::try_from(count)
            .map_err(|_| RepositoryError::DataCorruption(format!("negative count: {count}")))
    }

    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, title
            FROM roya.product
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Product::from))
    }

    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO roya.product (id, title) VALUES ($1, $2)")
            .bind(&product.id)
            .bind(&product.title)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    async fn rename_product(&self, id: &ProductId, title: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE roya.product SET title = $2 WHERE id = $1")
            .bind(id)
            .bind(title)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM roya.product WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
