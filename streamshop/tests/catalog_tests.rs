// tests/catalog_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::*;
use serde_json::{json, Value};
use streamshop::models::Coupon;
use streamshop::store::Store;
use uuid::Uuid;

#[actix_web::test]
async fn health_and_root_banner() {
  let (state, _store) = test_state(None);
  let app = init_app!(state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"status": "ok", "service": "StreamShop API"}));

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"status": "healthy"}));
}

#[actix_web::test]
async fn seed_runs_once_and_fills_the_catalog() {
  let (state, _store) = test_state(None);
  let app = init_app!(state);

  let resp = test::call_service(&app, test::TestRequest::post().uri("/api/seed").to_request()).await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"message": "Seeded", "products": 6}));

  let resp = test::call_service(&app, test::TestRequest::post().uri("/api/seed").to_request()).await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"message": "Already seeded"}));

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/products").to_request()).await;
  let products: Vec<Value> = test::read_body_json(resp).await;
  assert_eq!(products.len(), 6);
  assert_eq!(products[0]["name"], "Netflix Premium");
  assert_eq!(products[0]["isAvailable"], true);

  let id = products[0]["id"].as_str().unwrap();
  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri(&format!("/api/products/{}", id)).to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let product: Value = test::read_body_json(resp).await;
  assert_eq!(product["features"].as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn unknown_or_malformed_product_is_not_found() {
  let (state, _store) = test_state(None);
  let app = init_app!(state);

  for uri in [format!("/api/products/{}", Uuid::new_v4()), "/api/products/not-a-uuid".to_string()] {
    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Product not found");
  }
}

#[actix_web::test]
async fn coupon_lookup_is_case_insensitive_and_active_only() {
  let (state, store) = test_state(None);
  store
    .insert_coupons(&[
      Coupon {
        code: "STREAM20".into(),
        discount: 0.20,
        is_active: true,
      },
      Coupon {
        code: "EXPIRED5".into(),
        discount: 0.05,
        is_active: false,
      },
    ])
    .await
    .unwrap();
  let app = init_app!(state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/coupons/validate/stream20").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"code": "STREAM20", "discount": 0.2, "isActive": true}));

  for code in ["expired5", "NOPE"] {
    let uri = format!("/api/coupons/validate/{}", code);
    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}

#[actix_web::test]
async fn cart_replacement_is_idempotent() {
  let (state, _store) = test_state(None);
  let app = init_app!(state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/cart/s-1").to_request()).await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"items": []}));

  let product = Uuid::new_v4();
  let items = json!([{"productId": product, "quantity": 2}]);
  for _ in 0..2 {
    let req = test::TestRequest::post().uri("/api/cart/s-1").set_json(&items).to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": true}));
  }

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/cart/s-1").to_request()).await;
  let cart: Value = test::read_body_json(resp).await;
  assert_eq!(cart["sessionId"], "s-1");
  assert_eq!(cart["items"], items);
}

#[actix_web::test]
async fn cart_rejects_non_positive_quantities() {
  let (state, _store) = test_state(None);
  let app = init_app!(state);

  let req = test::TestRequest::post()
    .uri("/api/cart/s-1")
    .set_json(json!([{"productId": Uuid::new_v4(), "quantity": 0}]))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn signed_in_user_finds_their_cart_from_another_session() {
  let (state, _store) = test_state(None);
  let app = init_app!(state);

  let req = test::TestRequest::post()
    .uri("/api/auth/register")
    .set_json(json!({"email": "ana@example.com", "password": "hunter22", "firstName": "Ana", "lastName": "Souza"}))
    .to_request();
  let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
  let bearer = format!("Bearer {}", body["token"].as_str().unwrap());

  let items = json!([{"productId": Uuid::new_v4(), "quantity": 1}]);
  let req = test::TestRequest::post()
    .uri("/api/cart/phone")
    .insert_header(("Authorization", bearer.clone()))
    .set_json(&items)
    .to_request();
  test::call_service(&app, req).await;

  // Anonymous on the new session: nothing.
  let req = test::TestRequest::get().uri("/api/cart/laptop").to_request();
  let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
  assert_eq!(body["items"], json!([]));

  let req = test::TestRequest::get()
    .uri("/api/cart/laptop")
    .insert_header(("Authorization", bearer))
    .to_request();
  let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
  assert_eq!(body["items"], items);
  assert!(body["userId"].is_string());
}

#[actix_web::test]
async fn invalid_token_on_optional_route_is_anonymous() {
  let (state, _store) = test_state(None);
  let app = init_app!(state);

  let req = test::TestRequest::get()
    .uri("/api/cart/s-9")
    .insert_header(("Authorization", "Bearer garbage"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
}
