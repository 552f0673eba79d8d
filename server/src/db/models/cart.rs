//! Cart Model
//!
//! 每个用户一个购物车：同一商品只允许一行，重复添加合并数量。

use super::serde_helpers;
use super::{Product, ProductId};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One (product reference, quantity) pair within a cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: ProductId,
    pub quantity: i64,
}

/// Cart model — one per user, created lazily on first mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Empty cart for a user (not persisted until first mutation)
    pub fn new(user: RecordId) -> Self {
        Self {
            id: None,
            user,
            items: Vec::new(),
        }
    }

    /// Add quantity for a product, merging into an existing line.
    ///
    /// Duplicate detection is equality on the product RecordId.
    pub fn add_item(&mut self, product: ProductId, quantity: i64) {
        match self.items.iter_mut().find(|i| i.product == product) {
            Some(line) => line.quantity += quantity,
            None => self.items.push(CartItem { product, quantity }),
        }
    }

    /// Remove the line for a product. Absent line is a no-op.
    pub fn remove_item(&mut self, product: &ProductId) {
        self.items.retain(|i| &i.product != product);
    }

    /// Overwrite the quantity of an existing line. Quantity 0 removes the line.
    ///
    /// Returns false when no line matches the product.
    pub fn set_quantity(&mut self, product: &ProductId, quantity: i64) -> bool {
        let Some(idx) = self.items.iter().position(|i| &i.product == product) else {
            return false;
        };
        if quantity == 0 {
            self.items.remove(idx);
        } else {
            self.items[idx].quantity = quantity;
        }
        true
    }

    /// Total item count (sum of all quantities)
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// API Response Types (for frontend)
// =============================================================================

/// Cart line with the product reference resolved for display.
///
/// `product` is None when the referenced product was deleted from the catalog
/// (stale reference); the line is kept so the client can show it as gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineView {
    #[serde(with = "serde_helpers::record_id")]
    pub product_id: ProductId,
    pub product: Option<Product>,
    pub quantity: i64,
}

/// Cart with resolved products, as returned by every cart endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub items: Vec<CartLineView>,
}

/// Mutation response: the updated cart plus the total item count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartMutationResponse {
    pub message: String,
    pub cart: CartView,
    #[serde(rename = "itemCount")]
    pub item_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(key: &str) -> ProductId {
        RecordId::from_table_key("product", key)
    }

    #[test]
    fn test_add_item_merges_duplicate_lines() {
        let mut cart = Cart::new(RecordId::from_table_key("user", "u1"));
        cart.add_item(pid("p1"), 1);
        cart.add_item(pid("p1"), 2);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_item_appends_new_line() {
        let mut cart = Cart::new(RecordId::from_table_key("user", "u1"));
        cart.add_item(pid("p1"), 2);
        cart.add_item(pid("p2"), 5);

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn test_set_quantity_overwrites_not_merges() {
        let mut cart = Cart::new(RecordId::from_table_key("user", "u1"));
        cart.add_item(pid("p1"), 4);

        assert!(cart.set_quantity(&pid("p1"), 2));
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let mut a = Cart::new(RecordId::from_table_key("user", "u1"));
        a.add_item(pid("p1"), 3);
        assert!(a.set_quantity(&pid("p1"), 0));

        let mut b = Cart::new(RecordId::from_table_key("user", "u1"));
        b.add_item(pid("p1"), 3);
        b.remove_item(&pid("p1"));

        assert!(a.is_empty());
        assert!(b.is_empty());
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let mut cart = Cart::new(RecordId::from_table_key("user", "u1"));
        assert!(!cart.set_quantity(&pid("nope"), 2));
    }

    #[test]
    fn test_remove_absent_line_is_noop() {
        let mut cart = Cart::new(RecordId::from_table_key("user", "u1"));
        cart.add_item(pid("p1"), 1);
        cart.remove_item(&pid("p2"));
        assert_eq!(cart.items.len(), 1);
    }
}
