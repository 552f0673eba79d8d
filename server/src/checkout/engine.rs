//! Checkout Engine
//!
//! 所有结账变体共享同一套校验：加载购物车、按当前目录解析商品、
//! 静默丢弃已下架商品对应的行、按当前价格计算总额。三种提交变体
//! 只在订单的支付字段上有差别，写入的是同一种订单快照。
//!
//! 提交顺序：先持久化订单，再清空购物车。两次写入之间进程崩溃会
//! 留下「已下单但购物车未清空」的状态，由用户下次结账时自然修复。

use chrono::Utc;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::AppError;
use crate::db::models::{
    Cart, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus, Product,
};
use crate::db::repository::{CartRepository, OrderRepository, ProductRepository, RepoError};

/// 结账错误
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("No valid products in cart")]
    NoValidProducts,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => AppError::validation("Cart is empty"),
            CheckoutError::NoValidProducts => AppError::validation("No valid products in cart"),
            CheckoutError::Repo(e) => e.into(),
        }
    }
}

/// 校验后仍然有效的一行
#[derive(Debug, Clone)]
pub struct ValidatedLine {
    pub product: Product,
    pub quantity: i64,
}

/// 校验后的购物车：存活的行与按当前价格计算的总额
#[derive(Debug, Clone)]
pub struct ValidatedCart {
    pub cart: Cart,
    pub lines: Vec<ValidatedLine>,
    pub total: f64,
}

#[derive(Clone)]
pub struct CheckoutEngine {
    carts: CartRepository,
    orders: OrderRepository,
    products: ProductRepository,
}

impl CheckoutEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            carts: CartRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            products: ProductRepository::new(db),
        }
    }

    /// 共享校验：加载购物车并按当前目录解析商品。
    ///
    /// 已下架商品对应的行被静默丢弃；全部被丢弃时报
    /// [`CheckoutError::NoValidProducts`]。
    pub async fn validate_cart(&self, user: &RecordId) -> Result<ValidatedCart, CheckoutError> {
        let cart = self
            .carts
            .find_by_user(user)
            .await?
            .ok_or(CheckoutError::EmptyCart)?;

        if cart.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut lines = Vec::with_capacity(cart.items.len());
        for item in &cart.items {
            if let Some(product) = self.products.find_by_id(&item.product.to_string()).await? {
                lines.push(ValidatedLine {
                    product,
                    quantity: item.quantity,
                });
            }
        }

        if lines.is_empty() {
            return Err(CheckoutError::NoValidProducts);
        }

        let total = lines
            .iter()
            .map(|l| l.product.price * l.quantity as f64)
            .sum();

        Ok(ValidatedCart { cart, lines, total })
    }

    /// 变体 1：直接下单 (货到付款，无收货地址)
    pub async fn direct_order(&self, user: &RecordId) -> Result<Order, CheckoutError> {
        let validated = self.validate_cart(user).await?;
        let order = self.build_order(user, &validated, PaymentMethod::Cod, PaymentStatus::Pending);
        self.commit(order, &validated.cart).await
    }

    /// 变体 2：货到付款结账 (带收货地址)
    pub async fn simple_checkout(
        &self,
        user: &RecordId,
        shipping_address: String,
    ) -> Result<Order, CheckoutError> {
        let validated = self.validate_cart(user).await?;
        let mut order =
            self.build_order(user, &validated, PaymentMethod::Cod, PaymentStatus::Pending);
        order.shipping_address = Some(shipping_address);
        self.commit(order, &validated.cart).await
    }

    /// 变体 3：网关支付确认后的提交。
    ///
    /// 签名验证通过后购物车从头重新校验；地址缺省为 "Not provided"。
    pub async fn commit_paid(
        &self,
        user: &RecordId,
        gateway_order_id: String,
        gateway_payment_id: String,
        shipping_address: Option<String>,
    ) -> Result<Order, CheckoutError> {
        let validated = self.validate_cart(user).await?;
        let mut order =
            self.build_order(user, &validated, PaymentMethod::Online, PaymentStatus::Paid);
        order.shipping_address =
            Some(shipping_address.unwrap_or_else(|| "Not provided".to_string()));
        order.gateway_order_id = Some(gateway_order_id);
        order.gateway_payment_id = Some(gateway_payment_id);
        self.commit(order, &validated.cart).await
    }

    fn build_order(
        &self,
        user: &RecordId,
        validated: &ValidatedCart,
        payment_method: PaymentMethod,
        payment_status: PaymentStatus,
    ) -> Order {
        // 价格快照：记录下单时刻的目录价格，之后改价不影响已有订单
        let items = validated
            .lines
            .iter()
            .filter_map(|line| {
                line.product.id.clone().map(|id| OrderItem {
                    product: id,
                    quantity: line.quantity,
                    price: line.product.price,
                })
            })
            .collect();

        Order {
            id: None,
            user: user.clone(),
            items,
            total_amount: validated.total,
            payment_method,
            payment_status,
            order_status: OrderStatus::Confirmed,
            shipping_address: None,
            gateway_order_id: None,
            gateway_payment_id: None,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// 先持久化订单，再清空购物车
    async fn commit(&self, order: Order, cart: &Cart) -> Result<Order, CheckoutError> {
        let created = self.orders.create(order).await?;
        self.carts.clear(cart).await?;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{CartItem, ProductCreate};

    async fn engine() -> (CheckoutEngine, CartRepository, ProductRepository, OrderRepository) {
        let db = DbService::memory().await.unwrap().db;
        (
            CheckoutEngine::new(db.clone()),
            CartRepository::new(db.clone()),
            ProductRepository::new(db.clone()),
            OrderRepository::new(db),
        )
    }

    fn user() -> RecordId {
        RecordId::from(("user", "tester"))
    }

    async fn seed_product(products: &ProductRepository, name: &str, price: f64) -> Product {
        products
            .create(ProductCreate {
                name: name.to_string(),
                description: String::new(),
                price,
                image: None,
                category: "test".to_string(),
                stock: Some(10),
            })
            .await
            .unwrap()
    }

    async fn seed_cart(carts: &CartRepository, user: &RecordId, items: Vec<CartItem>) -> Cart {
        let mut cart = Cart::new(user.clone());
        cart.items = items;
        carts.save(&cart).await.unwrap()
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let (engine, carts, _, _) = engine().await;
        let user = user();

        // No cart at all
        assert!(matches!(
            engine.validate_cart(&user).await,
            Err(CheckoutError::EmptyCart)
        ));

        // Persisted but empty cart
        seed_cart(&carts, &user, vec![]).await;
        assert!(matches!(
            engine.validate_cart(&user).await,
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[tokio::test]
    async fn test_stale_lines_filtered_silently() {
        let (engine, carts, products, _) = engine().await;
        let user = user();

        let keep = seed_product(&products, "keep", 10.0).await;
        let gone = seed_product(&products, "gone", 99.0).await;
        let gone_id = gone.id.clone().unwrap();

        seed_cart(
            &carts,
            &user,
            vec![
                CartItem {
                    product: keep.id.clone().unwrap(),
                    quantity: 2,
                },
                CartItem {
                    product: gone_id.clone(),
                    quantity: 1,
                },
            ],
        )
        .await;

        products.delete(&gone_id.to_string()).await.unwrap();

        let validated = engine.validate_cart(&user).await.unwrap();
        assert_eq!(validated.lines.len(), 1);
        assert_eq!(validated.total, 20.0);
    }

    #[tokio::test]
    async fn test_all_stale_means_no_valid_products() {
        let (engine, carts, products, _) = engine().await;
        let user = user();

        let gone = seed_product(&products, "gone", 5.0).await;
        let gone_id = gone.id.clone().unwrap();
        seed_cart(
            &carts,
            &user,
            vec![CartItem {
                product: gone_id.clone(),
                quantity: 3,
            }],
        )
        .await;
        products.delete(&gone_id.to_string()).await.unwrap();

        assert!(matches!(
            engine.validate_cart(&user).await,
            Err(CheckoutError::NoValidProducts)
        ));
    }

    #[tokio::test]
    async fn test_simple_checkout_snapshots_and_clears_cart() {
        let (engine, carts, products, _) = engine().await;
        let user = user();

        let a = seed_product(&products, "a", 10.0).await;
        let b = seed_product(&products, "b", 5.0).await;
        seed_cart(
            &carts,
            &user,
            vec![
                CartItem {
                    product: a.id.clone().unwrap(),
                    quantity: 2,
                },
                CartItem {
                    product: b.id.clone().unwrap(),
                    quantity: 1,
                },
            ],
        )
        .await;

        let order = engine
            .simple_checkout(&user, "42 Some Street".to_string())
            .await
            .unwrap();

        assert_eq!(order.total_amount, 25.0);
        assert_eq!(order.payment_method, PaymentMethod::Cod);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.order_status, OrderStatus::Confirmed);
        assert_eq!(order.shipping_address.as_deref(), Some("42 Some Street"));

        let cart = carts.find_by_user(&user).await.unwrap().unwrap();
        assert!(cart.items.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_immune_to_later_price_change() {
        let (engine, carts, products, orders) = engine().await;
        let user = user();

        let p = seed_product(&products, "p", 10.0).await;
        let pid = p.id.clone().unwrap();
        seed_cart(
            &carts,
            &user,
            vec![CartItem {
                product: pid.clone(),
                quantity: 1,
            }],
        )
        .await;

        let order = engine.direct_order(&user).await.unwrap();
        assert_eq!(order.total_amount, 10.0);

        products
            .update(
                &pid.to_string(),
                crate::db::models::ProductUpdate {
                    price: Some(999.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = orders.find_by_user(&user).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].total_amount, 10.0);
        assert_eq!(stored[0].items[0].price, 10.0);
    }

    #[tokio::test]
    async fn test_commit_paid_defaults_address() {
        let (engine, carts, products, _) = engine().await;
        let user = user();

        let p = seed_product(&products, "p", 7.5).await;
        seed_cart(
            &carts,
            &user,
            vec![CartItem {
                product: p.id.clone().unwrap(),
                quantity: 2,
            }],
        )
        .await;

        let order = engine
            .commit_paid(&user, "order_x".to_string(), "pay_y".to_string(), None)
            .await
            .unwrap();

        assert_eq!(order.payment_method, PaymentMethod::Online);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.shipping_address.as_deref(), Some("Not provided"));
        assert_eq!(order.gateway_order_id.as_deref(), Some("order_x"));
        assert_eq!(order.gateway_payment_id.as_deref(), Some("pay_y"));
        assert_eq!(order.total_amount, 15.0);
    }
}
