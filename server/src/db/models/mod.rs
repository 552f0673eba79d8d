//! Database Models
//!
//! Serde structs matching the SurrealDB tables plus the API view types.

pub mod cart;
pub mod order;
pub mod product;
pub mod serde_helpers;
pub mod user;

pub use cart::{Cart, CartItem, CartLineView, CartMutationResponse, CartView};
pub use order::{
    Order, OrderId, OrderItem, OrderLineView, OrderStatus, OrderUpdate, OrderView, PaymentMethod,
    PaymentStatus,
};
pub use product::{Product, ProductCreate, ProductId, ProductUpdate};
pub use user::{User, UserCreate, UserId, UserView};
