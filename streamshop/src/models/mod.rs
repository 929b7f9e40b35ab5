// streamshop/src/models/mod.rs

//! Data structures stored by the application and exchanged with the storefront.

pub mod cart;
pub mod coupon;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem};
pub use coupon::Coupon;
pub use order::{
  BoletoData, CustomerInfo, Identification, Order, OrderItem, OrderStatus, PaymentMethod, PixData,
};
pub use product::Product;
pub use user::User;
