// streamshop/src/store/postgres.rs

use super::Store;
use crate::errors::{AppError, Result};
use crate::models::{Cart, Coupon, Order, OrderStatus, Product, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone, created_at";
const PRODUCT_COLUMNS: &str = "id, name, description, platform, price, duration, image, features, is_available";
const ORDER_COLUMNS: &str = "id, user_id, session_id, items, subtotal, discount, total, coupon_code, customer, \
   payment_method, gateway_payment_id, gateway_status, status, pix_qr_code, pix_qr_code_base64, \
   boleto_url, boleto_barcode, created_at, updated_at";

/// Advisory lock key taken while seeding the catalog.
const SEED_LOCK_KEY: i64 = 0x5354_5245_414d;

fn conflict_on_duplicate(err: sqlx::Error, message: &str) -> AppError {
  match err {
    sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Conflict(message.to_string()),
    other => other.into(),
  }
}

async fn insert_product_row(tx: &mut Transaction<'_, Postgres>, product: &Product) -> Result<()> {
  sqlx::query(
    "INSERT INTO products (id, name, description, platform, price, duration, image, features, is_available) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
  )
  .bind(product.id)
  .bind(&product.name)
  .bind(&product.description)
  .bind(&product.platform)
  .bind(product.price)
  .bind(&product.duration)
  .bind(&product.image)
  .bind(&product.features)
  .bind(product.is_available)
  .execute(&mut **tx)
  .await?;
  Ok(())
}

async fn insert_coupon_row(tx: &mut Transaction<'_, Postgres>, coupon: &Coupon) -> Result<()> {
  sqlx::query("INSERT INTO coupons (code, discount, is_active) VALUES ($1, $2, $3) ON CONFLICT (code) DO NOTHING")
    .bind(&coupon.code)
    .bind(coupon.discount)
    .bind(coupon.is_active)
    .execute(&mut **tx)
    .await?;
  Ok(())
}

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl Store for PgStore {
  #[instrument(name = "store::create_user", skip_all, fields(user_id = %user.id), err(Display))]
  async fn create_user(&self, user: &User) -> Result<()> {
    let inserted = sqlx::query(
      "INSERT INTO users (id, email, password_hash, first_name, last_name, phone, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.phone)
    .bind(user.created_at)
    .execute(&self.pool)
    .await;

    inserted.map(|_| ()).map_err(|e| conflict_on_duplicate(e, "Email already registered"))
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    Ok(sqlx::query_as::<_, User>(&sql).bind(email).fetch_optional(&self.pool).await?)
  }

  async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    Ok(sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(&self.pool).await?)
  }

  async fn list_products(&self, limit: i64) -> Result<Vec<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY position LIMIT $1");
    Ok(sqlx::query_as::<_, Product>(&sql).bind(limit).fetch_all(&self.pool).await?)
  }

  async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
    Ok(sqlx::query_as::<_, Product>(&sql).bind(id).fetch_optional(&self.pool).await?)
  }

  #[instrument(
    name = "store::seed_catalog",
    skip_all,
    fields(products = products.len(), coupons = coupons.len()),
    err(Display)
  )]
  async fn seed_catalog(&self, products: &[Product], coupons: &[Coupon]) -> Result<bool> {
    let mut tx = self.pool.begin().await?;
    // Held until commit or rollback; concurrent seeders queue here.
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
      .bind(SEED_LOCK_KEY)
      .execute(&mut *tx)
      .await?;
    let seeded = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products)")
      .fetch_one(&mut *tx)
      .await?;
    if seeded {
      tx.rollback().await?;
      return Ok(false);
    }
    for product in products {
      insert_product_row(&mut tx, product).await?;
    }
    for coupon in coupons {
      insert_coupon_row(&mut tx, coupon).await?;
    }
    tx.commit().await?;
    Ok(true)
  }

  async fn find_cart(&self, session_id: &str, user_id: Option<Uuid>) -> Result<Option<Cart>> {
    Ok(
      sqlx::query_as::<_, Cart>(
        "SELECT session_id, user_id, items, updated_at FROM carts \
         WHERE session_id = $1 OR ($2::uuid IS NOT NULL AND user_id = $2) \
         ORDER BY (session_id = $1) DESC, updated_at DESC LIMIT 1",
      )
      .bind(session_id)
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?,
    )
  }

  #[instrument(name = "store::upsert_cart", skip_all, fields(session_id = %cart.session_id), err(Display))]
  async fn upsert_cart(&self, cart: &Cart) -> Result<()> {
    sqlx::query(
      "INSERT INTO carts (session_id, user_id, items, updated_at) VALUES ($1, $2, $3, $4) \
       ON CONFLICT (session_id) DO UPDATE SET \
         user_id = COALESCE(EXCLUDED.user_id, carts.user_id), \
         items = EXCLUDED.items, \
         updated_at = EXCLUDED.updated_at",
    )
    .bind(&cart.session_id)
    .bind(cart.user_id)
    .bind(Json(&cart.items))
    .bind(cart.updated_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn find_active_coupon(&self, code: &str) -> Result<Option<Coupon>> {
    Ok(
      sqlx::query_as::<_, Coupon>(
        "SELECT code, discount, is_active FROM coupons WHERE code = $1 AND is_active",
      )
      .bind(code)
      .fetch_optional(&self.pool)
      .await?,
    )
  }

  async fn insert_coupons(&self, coupons: &[Coupon]) -> Result<()> {
    let mut tx = self.pool.begin().await?;
    for coupon in coupons {
      insert_coupon_row(&mut tx, coupon).await?;
    }
    tx.commit().await?;
    Ok(())
  }

  #[instrument(name = "store::insert_order", skip_all, fields(order_id = %order.id), err(Display))]
  async fn insert_order(&self, order: &Order) -> Result<()> {
    let sql = format!(
      "INSERT INTO orders ({ORDER_COLUMNS}) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)"
    );
    sqlx::query(&sql)
      .bind(order.id)
      .bind(order.user_id)
      .bind(&order.session_id)
      .bind(Json(&order.items))
      .bind(order.subtotal)
      .bind(order.discount)
      .bind(order.total)
      .bind(&order.coupon_code)
      .bind(Json(&order.customer))
      .bind(order.payment_method)
      .bind(&order.gateway_payment_id)
      .bind(&order.gateway_status)
      .bind(order.status)
      .bind(&order.pix_qr_code)
      .bind(&order.pix_qr_code_base64)
      .bind(&order.boleto_url)
      .bind(&order.boleto_barcode)
      .bind(order.created_at)
      .bind(order.updated_at)
      .execute(&self.pool)
      .await
      .map(|_| ())
      .map_err(|e| conflict_on_duplicate(e, "Order already exists"))
  }

  async fn find_order(&self, id: Uuid) -> Result<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
    Ok(sqlx::query_as::<_, Order>(&sql).bind(id).fetch_optional(&self.pool).await?)
  }

  async fn list_orders_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2");
    Ok(
      sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?,
    )
  }

  #[instrument(name = "store::update_order_status", skip(self), err(Display))]
  async fn update_order_status(
    &self,
    id: Uuid,
    gateway_status: Option<&str>,
    status: OrderStatus,
    updated_at: DateTime<Utc>,
  ) -> Result<bool> {
    let result = sqlx::query("UPDATE orders SET gateway_status = $2, status = $3, updated_at = $4 WHERE id = $1")
      .bind(id)
      .bind(gateway_status)
      .bind(status)
      .bind(updated_at)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}
