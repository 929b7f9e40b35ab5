// streamshop/src/store/mod.rs

//! Persistence port. Handlers and pipelines only see `dyn Store`.

pub mod memory;
pub mod postgres;

use crate::errors::Result;
use crate::models::{Cart, Coupon, Order, OrderStatus, Product, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Maximum rows returned by list endpoints.
pub const LIST_LIMIT: i64 = 100;

#[async_trait]
pub trait Store: Send + Sync {
  /// Fails with `AppError::Conflict` when the email is taken.
  async fn create_user(&self, user: &User) -> Result<()>;
  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
  async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

  async fn list_products(&self, limit: i64) -> Result<Vec<Product>>;
  async fn find_product(&self, id: Uuid) -> Result<Option<Product>>;
  /// Inserts the catalog and coupons in one step, unless a product already
  /// exists. Returns whether anything was written. Concurrent callers see at
  /// most one `true`.
  async fn seed_catalog(&self, products: &[Product], coupons: &[Coupon]) -> Result<bool>;

  /// Looks a cart up by session, or by owner when `user_id` is given. A
  /// session match wins over an owner match.
  async fn find_cart(&self, session_id: &str, user_id: Option<Uuid>) -> Result<Option<Cart>>;
  /// Replaces the items of the session's cart, creating it if needed. An
  /// anonymous update keeps the cart's existing owner.
  async fn upsert_cart(&self, cart: &Cart) -> Result<()>;

  /// `code` must already be normalized (see `Coupon::normalize_code`).
  async fn find_active_coupon(&self, code: &str) -> Result<Option<Coupon>>;
  async fn insert_coupons(&self, coupons: &[Coupon]) -> Result<()>;

  /// Fails with `AppError::Conflict` when the id is taken.
  async fn insert_order(&self, order: &Order) -> Result<()>;
  async fn find_order(&self, id: Uuid) -> Result<Option<Order>>;
  /// Newest first.
  async fn list_orders_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Order>>;
  /// Returns `false` when no order has this id.
  async fn update_order_status(
    &self,
    id: Uuid,
    gateway_status: Option<&str>,
    status: OrderStatus,
    updated_at: DateTime<Utc>,
  ) -> Result<bool>;
}
