//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.price < 0.0 {
            return Err(RepoError::Validation("price cannot be negative".into()));
        }

        let product = Product {
            id: None,
            name: data.name,
            description: data.description,
            price: data.price,
            image: data.image.unwrap_or_default(),
            category: data.category,
            stock: data.stock.unwrap_or(0),
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Partially update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);

        if let Some(price) = data.price
            && price < 0.0
        {
            return Err(RepoError::Validation("price cannot be negative".into()));
        }

        let updated: Option<Product> = self
            .base
            .db()
            .update((PRODUCT_TABLE, pure_id))
            .merge(data)
            .await?;

        updated.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product. Carts and orders holding a reference keep it
    /// as a stale reference; they are never touched here.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let result: Option<Product> = self.base.db().delete((PRODUCT_TABLE, pure_id)).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }

    /// Count all products (admin dashboard)
    pub async fn count(&self) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct Count {
            count: i64,
        }

        let result: Option<Count> = self
            .base
            .db()
            .query("SELECT count() AS count FROM product GROUP ALL")
            .await?
            .take(0)?;
        Ok(result.map(|c| c.count).unwrap_or(0))
    }
}
