// streamshop/src/seed.rs

//! One-shot catalog and coupon seed.

use crate::errors::Result;
use crate::models::{Coupon, Product};
use crate::store::Store;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
  AlreadySeeded,
  Seeded { products: usize, coupons: usize },
}

struct CatalogEntry {
  name: &'static str,
  description: &'static str,
  platform: &'static str,
  price: f64,
  image: &'static str,
  features: [&'static str; 4],
}

const DURATION: &str = "1 mês";

const CATALOG: [CatalogEntry; 6] = [
  CatalogEntry {
    name: "Netflix Premium",
    description: "4 telas simultâneas em Ultra HD",
    platform: "Netflix",
    price: 29.90,
    image: "https://images.unsplash.com/photo-1637363990764-de84fd247b7d?crop=entropy&cs=srgb&fm=jpg&q=85",
    features: ["4 telas simultâneas", "Qualidade Ultra HD", "Download ilimitado", "Catálogo completo"],
  },
  CatalogEntry {
    name: "Spotify Premium",
    description: "Música sem anúncios e offline",
    platform: "Spotify",
    price: 19.90,
    image: "https://images.unsplash.com/photo-1706879350865-e1cdb3792b22?crop=entropy&cs=srgb&fm=jpg&q=85",
    features: ["Sem anúncios", "Download offline", "Qualidade de áudio superior", "Pular músicas ilimitado"],
  },
  CatalogEntry {
    name: "Disney+ Premium",
    description: "Todo o conteúdo Disney, Pixar, Marvel e Star Wars",
    platform: "Disney+",
    price: 27.90,
    image: "https://images.unsplash.com/photo-1662338571360-e20bfb6f2545?crop=entropy&cs=srgb&fm=jpg&q=85",
    features: ["4K Ultra HD", "4 dispositivos simultâneos", "Download ilimitado", "Conteúdo exclusivo"],
  },
  CatalogEntry {
    name: "HBO Max Premium",
    description: "Séries e filmes HBO originais",
    platform: "HBO Max",
    price: 34.90,
    image: "https://images.unsplash.com/photo-1761044590940-9e3205a60b92?crop=entropy&cs=srgb&fm=jpg&q=85",
    features: ["Qualidade 4K", "3 telas simultâneas", "Lançamentos Warner Bros", "Conteúdo HBO"],
  },
  CatalogEntry {
    name: "Amazon Prime Video",
    description: "Streaming de filmes, séries e frete grátis",
    platform: "Amazon Prime",
    price: 14.90,
    image: "https://images.unsplash.com/photo-1662466767400-27c176fab51b?crop=entropy&cs=srgb&fm=jpg&q=85",
    features: ["Frete grátis Amazon", "Prime Video", "Prime Music", "Prime Reading"],
  },
  CatalogEntry {
    name: "YouTube Premium",
    description: "YouTube sem anúncios e música incluída",
    platform: "YouTube",
    price: 1.0,
    image: "https://images.unsplash.com/photo-1611162616475-46b635cb6868?crop=entropy&cs=srgb&fm=jpg&q=85",
    features: ["Sem anúncios", "Download de vídeos", "YouTube Music Premium", "Reprodução em segundo plano"],
  },
];

const COUPONS: [(&str, f64); 3] = [("BEMVINDO10", 0.10), ("STREAM20", 0.20), ("PRIMEIRA15", 0.15)];

pub fn catalog() -> Vec<Product> {
  CATALOG
    .iter()
    .map(|entry| Product {
      id: Uuid::new_v4(),
      name: entry.name.to_string(),
      description: entry.description.to_string(),
      platform: entry.platform.to_string(),
      price: entry.price,
      duration: DURATION.to_string(),
      image: entry.image.to_string(),
      features: entry.features.iter().map(|f| f.to_string()).collect(),
      is_available: true,
    })
    .collect()
}

pub fn coupons() -> Vec<Coupon> {
  COUPONS
    .iter()
    .map(|(code, discount)| Coupon {
      code: code.to_string(),
      discount: *discount,
      is_active: true,
    })
    .collect()
}

/// Inserts the catalog and coupons unless any product already exists.
#[instrument(name = "seed::seed_store", skip_all, err(Display))]
pub async fn seed_store(store: &dyn Store) -> Result<SeedOutcome> {
  let products = catalog();
  let coupons = coupons();
  if !store.seed_catalog(&products, &coupons).await? {
    info!("Store already seeded.");
    return Ok(SeedOutcome::AlreadySeeded);
  }
  info!(products = products.len(), coupons = coupons.len(), "Store seeded.");
  Ok(SeedOutcome::Seeded {
    products: products.len(),
    coupons: coupons.len(),
  })
}
