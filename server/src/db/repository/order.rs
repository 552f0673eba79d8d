//! Order Repository
//!
//! Orders are append-only snapshots; only the status fields are ever
//! updated after creation (by the admin surface).

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Order, OrderUpdate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

// Plural table name: ORDER is a SurrealQL keyword.
const ORDER_TABLE: &str = "orders";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a finalized order snapshot
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// All orders owned by a user, newest first
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find an order owned by the given user.
    ///
    /// Returns None both when the order does not exist and when it is owned
    /// by someone else — callers must not be able to tell the difference.
    pub async fn find_owned(&self, id: &str, user: &RecordId) -> RepoResult<Option<Order>> {
        let pure_id = strip_table_prefix(ORDER_TABLE, id);
        let order: Option<Order> = self.base.db().select((ORDER_TABLE, pure_id)).await?;
        Ok(order.filter(|o| &o.user == user))
    }

    /// Permanently delete an order owned by the given user
    pub async fn delete_owned(&self, id: &str, user: &RecordId) -> RepoResult<bool> {
        let Some(order) = self.find_owned(id, user).await? else {
            return Ok(false);
        };

        if let Some(order_id) = &order.id {
            let _: Option<Order> = self
                .base
                .db()
                .delete((ORDER_TABLE, order_id.key().to_string()))
                .await?;
        }
        Ok(true)
    }

    // ========== Admin surface ==========

    /// All orders in the system, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Most recent orders (dashboard)
    pub async fn find_recent(&self, limit: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders ORDER BY created_at DESC LIMIT $limit")
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Update the status fields of an order
    pub async fn update_status(&self, id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let pure_id = strip_table_prefix(ORDER_TABLE, id);
        let updated: Option<Order> = self
            .base
            .db()
            .update((ORDER_TABLE, pure_id))
            .merge(data)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Count all orders
    pub async fn count(&self) -> RepoResult<i64> {
        self.scalar_count("SELECT count() AS count FROM orders GROUP ALL")
            .await
    }

    /// Count orders whose payment is still pending
    pub async fn count_pending(&self) -> RepoResult<i64> {
        self.scalar_count(
            "SELECT count() AS count FROM orders WHERE payment_status = 'pending' GROUP ALL",
        )
        .await
    }

    /// Total revenue: sum of the canonical total_amount over all orders
    pub async fn total_revenue(&self) -> RepoResult<f64> {
        #[derive(serde::Deserialize)]
        struct Revenue {
            revenue: f64,
        }

        let result: Option<Revenue> = self
            .base
            .db()
            .query("SELECT math::sum(total_amount) AS revenue FROM orders GROUP ALL")
            .await?
            .take(0)?;
        Ok(result.map(|r| r.revenue).unwrap_or(0.0))
    }

    async fn scalar_count(&self, query: &str) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct Count {
            count: i64,
        }

        let result: Option<Count> = self.base.db().query(query).await?.take(0)?;
        Ok(result.map(|c| c.count).unwrap_or(0))
    }
}
