//! Basket repository.
//!
//! Line items are stored as a JSONB array inside the basket row, the same
//! embedded-copy shape the rest of the application works with.

use async_trait::async_trait;
use roya_core::{BasketId, LineItem};
use sqlx::types::Json;

use super::{PgStore, RepositoryError};
use crate::models::Basket;

/// Persistence for baskets.
#[async_trait]
pub trait BasketStore: Send + Sync {
    /// All baskets in insertion order.
    async fn list_baskets(&self) -> Result<Vec<Basket>, RepositoryError>;

    async fn count_baskets(&self) -> Result<u64, RepositoryError>;

    async fn find_basket(&self, id: &BasketId) -> Result<Option<Basket>, RepositoryError>;

    async fn insert_basket(&self, basket: &Basket) -> Result<(), RepositoryError>;

    /// Overwrite title, description, time and line items of the basket with
    /// `basket.id`. Returns `false` if none matched.
    async fn update_basket(&self, basket: &Basket) -> Result<bool, RepositoryError>;

    /// Delete the basket with `id`. Returns `false` if none matched.
    async fn delete_basket(&self, id: &BasketId) -> Result<bool, RepositoryError>;
}

/// Internal row type for `PostgreSQL` basket queries.
#[derive(Debug, sqlx::FromRow)]
struct BasketRow {
    id: BasketId,
    title: String,
    description: String,
    time_ms: i64,
    line_items: Json<Vec<LineItem>>,
}

impl From<BasketRow> for Basket {
    fn from(row: BasketRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            time: row.time_ms,
            line_items: row.line_items.0,
        }
    }
}

#[async_trait]
impl BasketStore for PgStore {
    async fn list_baskets(&self) -> Result<Vec<Basket>, RepositoryError> {
        let rows = sqlx::query_as::<_, BasketRow>(
            r"
            SELECT id, title, description, time_ms, line_items
            FROM roya.basket
            ORDER BY created_at, id
            ",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Basket::from).collect())
    }

    async fn count_baskets(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roya.basket")
            .fetch_one(self.pool())
            .await?;

        u64::try_from(count)
            .map_err(|_| RepositoryError::DataCorruption(format!("negative count: {count}")))
    }

    async fn find_basket(&self, id: &BasketId) -> Result<Option<Basket>, RepositoryError> {
        let row = sqlx::query_as::<_, BasketRow>(
            r"
            SELECT id, title, description, time_ms, line_items
            FROM roya.basket
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Basket::from))
    }

    async fn insert_basket(&self, basket: &Basket) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO roya.basket (id, title, description, time_ms, line_items)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&basket.id)
        .bind(&basket.title)
        .bind(&basket.description)
        .bind(basket.time)
        .bind(Json(&basket.line_items))
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn update_basket(&self, basket: &Basket) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE roya.basket
            SET title = $2, description = $3, time_ms = $4, line_items = $5
            WHERE id = $1
            ",
        )
        .bind(&basket.id)
        .bind(&basket.title)
        .bind(&basket.description)
        .bind(basket.time)
        .bind(Json(&basket.line_items))
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_basket(&self, id: &BasketId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM roya.basket WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
