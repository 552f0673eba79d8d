//! Cart Repository
//!
//! One cart document per user. Writes are full-document replaces of the
//! items list (last write wins; no per-user optimistic concurrency).

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Cart, CartItem};
use serde::Serialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const CART_TABLE: &str = "cart";

#[derive(Serialize)]
struct ItemsPatch {
    items: Vec<CartItem>,
}

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the cart owned by a user, if one was ever persisted
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Option<Cart>> {
        let cart: Option<Cart> = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user = $user LIMIT 1")
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        Ok(cart)
    }

    /// Persist a cart: create on first mutation, replace items afterwards
    pub async fn save(&self, cart: &Cart) -> RepoResult<Cart> {
        match &cart.id {
            Some(id) => {
                let updated: Option<Cart> = self
                    .base
                    .db()
                    .update((CART_TABLE, id.key().to_string()))
                    .merge(ItemsPatch {
                        items: cart.items.clone(),
                    })
                    .await?;
                updated.ok_or_else(|| RepoError::NotFound("Cart not found".to_string()))
            }
            None => {
                let created: Option<Cart> = self
                    .base
                    .db()
                    .create(CART_TABLE)
                    .content(cart.clone())
                    .await?;
                created.ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
            }
        }
    }

    /// Empty the cart's items (post-checkout). A cart that was never
    /// persisted has nothing to clear.
    pub async fn clear(&self, cart: &Cart) -> RepoResult<()> {
        if let Some(id) = &cart.id {
            let _: Option<Cart> = self
                .base
                .db()
                .update((CART_TABLE, id.key().to_string()))
                .merge(ItemsPatch { items: Vec::new() })
                .await?;
        }
        Ok(())
    }
}
