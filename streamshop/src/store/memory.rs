// streamshop/src/store/memory.rs

use super::Store;
use crate::errors::{AppError, Result};
use crate::models::{Cart, Coupon, Order, OrderStatus, Product, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Collections {
  users: HashMap<Uuid, User>,
  products: Vec<Product>,
  carts: HashMap<String, Cart>,
  coupons: HashMap<String, Coupon>,
  orders: HashMap<Uuid, Order>,
}

/// A `Store` kept entirely in memory.
///
/// Clones share the same data. Used by the test suite and handy for running
/// the API without a database.
#[derive(Default, Clone)]
pub struct MemoryStore {
  inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn order_count(&self) -> usize {
    self.inner.read().await.orders.len()
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn create_user(&self, user: &User) -> Result<()> {
    let mut data = self.inner.write().await;
    if data.users.values().any(|u| u.email == user.email) {
      return Err(AppError::Conflict("Email already registered".to_string()));
    }
    data.users.insert(user.id, user.clone());
    Ok(())
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let data = self.inner.read().await;
    Ok(data.users.values().find(|u| u.email == email).cloned())
  }

  async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
    Ok(self.inner.read().await.users.get(&id).cloned())
  }

  async fn list_products(&self, limit: i64) -> Result<Vec<Product>> {
    let data = self.inner.read().await;
    Ok(data.products.iter().take(limit.max(0) as usize).cloned().collect())
  }

  async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
    let data = self.inner.read().await;
    Ok(data.products.iter().find(|p| p.id == id).cloned())
  }

  async fn seed_catalog(&self, products: &[Product], coupons: &[Coupon]) -> Result<bool> {
    let mut data = self.inner.write().await;
    if !data.products.is_empty() {
      return Ok(false);
    }
    data.products.extend_from_slice(products);
    for coupon in coupons {
      data.coupons.entry(coupon.code.clone()).or_insert_with(|| coupon.clone());
    }
    Ok(true)
  }

  async fn find_cart(&self, session_id: &str, user_id: Option<Uuid>) -> Result<Option<Cart>> {
    let data = self.inner.read().await;
    if let Some(cart) = data.carts.get(session_id) {
      return Ok(Some(cart.clone()));
    }
    Ok(user_id.and_then(|owner| {
      data
        .carts
        .values()
        .filter(|c| c.user_id == Some(owner))
        .max_by_key(|c| c.updated_at)
        .cloned()
    }))
  }

  async fn upsert_cart(&self, cart: &Cart) -> Result<()> {
    let mut data = self.inner.write().await;
    let previous_owner = data.carts.get(&cart.session_id).and_then(|c| c.user_id);
    let mut stored = cart.clone();
    stored.user_id = cart.user_id.or(previous_owner);
    data.carts.insert(cart.session_id.clone(), stored);
    Ok(())
  }

  async fn find_active_coupon(&self, code: &str) -> Result<Option<Coupon>> {
    let data = self.inner.read().await;
    Ok(data.coupons.get(code).filter(|c| c.is_active).cloned())
  }

  async fn insert_coupons(&self, coupons: &[Coupon]) -> Result<()> {
    let mut data = self.inner.write().await;
    for coupon in coupons {
      data.coupons.entry(coupon.code.clone()).or_insert_with(|| coupon.clone());
    }
    Ok(())
  }

  async fn insert_order(&self, order: &Order) -> Result<()> {
    let mut data = self.inner.write().await;
    if data.orders.contains_key(&order.id) {
      return Err(AppError::Conflict("Order already exists".to_string()));
    }
    data.orders.insert(order.id, order.clone());
    Ok(())
  }

  async fn find_order(&self, id: Uuid) -> Result<Option<Order>> {
    Ok(self.inner.read().await.orders.get(&id).cloned())
  }

  async fn list_orders_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Order>> {
    let data = self.inner.read().await;
    let mut orders: Vec<Order> = data
      .orders
      .values()
      .filter(|o| o.user_id == Some(user_id))
      .cloned()
      .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders.truncate(limit.max(0) as usize);
    Ok(orders)
  }

  async fn update_order_status(
    &self,
    id: Uuid,
    gateway_status: Option<&str>,
    status: OrderStatus,
    updated_at: DateTime<Utc>,
  ) -> Result<bool> {
    let mut data = self.inner.write().await;
    match data.orders.get_mut(&id) {
      Some(order) => {
        order.gateway_status = gateway_status.map(str::to_string);
        order.status = status;
        order.updated_at = updated_at;
        Ok(true)
      }
      None => Ok(false),
    }
  }
}
