//! End-to-end checks of the HTTP surface over the in-memory store.

mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{Duration, Utc};
use common::*;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use std::time::Duration as StdDuration;
use uuid::Uuid;

use supplier_portal_backend::auth::jwt::Claims;
use supplier_portal_backend::auth::middleware::JwtSecret;
use supplier_portal_backend::cache::ViewerCache;
use supplier_portal_backend::clock::FixedClock;
use supplier_portal_backend::handlers;
use supplier_portal_backend::store::memory::MemoryStore;

const SECRET: &str = "http-test-secret-at-least-256-bits-long-xxxxxxxxxxx";

fn token(user_id: Uuid, email: &str, role: &str) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 3600,
        iat: Some(now),
        email: Some(email.to_string()),
        name: None,
        role: Some(role.to_string()),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

fn tender_body(published: bool) -> Value {
    json!({
        "rfq_subject": "Steel pipes",
        "rfq_description": "Seamless pipes, 2 inch",
        "published_on_website": published,
        "submission_deadline": t0() + Duration::days(10),
        "live_bidding_enabled": true,
        "min_bid_decrement": "100",
        "items": [{ "item_code": "PIPE-2IN", "qty": "10", "uom": "Nos", "unit_budget": "100" }],
    })
}

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(engine()))
                .app_data(web::Data::new(ViewerCache::new(StdDuration::from_secs(60))))
                .app_data(web::Data::new(JwtSecret(SECRET.to_string())))
                .service(
                    web::scope("/api")
                        .configure(handlers::init_routes::<MemoryStore, FixedClock>),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn me_requires_a_token() {
    let app = app!();

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn invalid_token_is_rejected_even_on_public_routes() {
    let app = app!();

    let req = test::TestRequest::get()
        .uri("/api/tenders")
        .insert_header(bearer("garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn me_returns_the_portal_profile() {
    let app = app!();
    let user_id = Uuid::new_v4();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token(user_id, "buyer@corp.test", "procurement")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], user_id.to_string());
    assert_eq!(body["role"], "Procurement");
    assert_eq!(body["supplier_id"], Value::Null);
}

#[actix_web::test]
async fn anonymous_listing_hides_invite_only_tenders() {
    let app = app!();
    let buyer = token(Uuid::new_v4(), "buyer@corp.test", "procurement");

    for published in [true, false] {
        let req = test::TestRequest::post()
            .uri("/api/tenders")
            .insert_header(bearer(&buyer))
            .set_json(tender_body(published))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/tenders").to_request();
    let listed: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["rfq_subject"], "Steel pipes");
}

#[actix_web::test]
async fn hidden_tender_is_forbidden() {
    let app = app!();
    let buyer = token(Uuid::new_v4(), "buyer@corp.test", "procurement");
    let req = test::TestRequest::post()
        .uri("/api/tenders")
        .insert_header(bearer(&buyer))
        .set_json(tender_body(false))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/tenders/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "You are not authorized to view this tender");
}

#[actix_web::test]
async fn suppliers_cannot_create_tenders() {
    let app = app!();
    let seller = token(Uuid::new_v4(), "sales@acme.test", "supplier");

    let req = test::TestRequest::post()
        .uri("/api/tenders")
        .insert_header(bearer(&seller))
        .set_json(tender_body(true))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn publishing_without_subject_is_a_bad_request() {
    let app = app!();
    let buyer = token(Uuid::new_v4(), "buyer@corp.test", "procurement");
    let mut body = tender_body(true);
    body["rfq_subject"] = Value::Null;

    let req = test::TestRequest::post()
        .uri("/api/tenders")
        .insert_header(bearer(&buyer))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "RFQ Subject is mandatory when publishing on website"
    );
}

#[actix_web::test]
async fn vendor_registers_and_bids_against_the_floor() {
    let app = app!();
    let buyer = token(Uuid::new_v4(), "buyer@corp.test", "procurement");

    let req = test::TestRequest::post()
        .uri("/api/tenders")
        .insert_header(bearer(&buyer))
        .set_json(tender_body(true))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let tender_id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/tenders/{tender_id}/submit"))
        .insert_header(bearer(&buyer))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let mut sellers = Vec::new();
    for email in ["a@acme.test", "b@bolt.test"] {
        let seller = token(Uuid::new_v4(), email, "supplier");

        // resolve the viewer once before registering so the cache holds a stale entry
        let req = test::TestRequest::get()
            .uri("/api/bids")
            .insert_header(bearer(&seller))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/vendors/register")
            .insert_header(bearer(&seller))
            .set_json(json!({ "company_name": email, "contact_person": "Sales" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        sellers.push(seller);
    }

    let bid = |seller: &str, amount: &str| {
        test::TestRequest::post()
            .uri(&format!("/api/tenders/{tender_id}/bids"))
            .insert_header(bearer(seller))
            .set_json(json!({ "grand_total": amount }))
            .to_request()
    };
    let submit = |seller: &str, bid_id: &str| {
        test::TestRequest::post()
            .uri(&format!("/api/bids/{bid_id}/submit"))
            .insert_header(bearer(seller))
            .to_request()
    };

    let draft: Value = test::call_and_read_body_json(&app, bid(&sellers[0], "1000")).await;
    let req = submit(&sellers[0], draft["id"].as_str().unwrap());
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let draft: Value = test::call_and_read_body_json(&app, bid(&sellers[1], "950")).await;
    let resp = test::call_service(&app, submit(&sellers[1], draft["id"].as_str().unwrap())).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "bid must be at least 100 below current lowest bid 1000; maximum allowed is 900"
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/tenders/{tender_id}/bid-floor"))
        .to_request();
    let floor: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(floor["submitted_bids"], 1);
    assert_eq!(floor["max_allowed"], "900");
}

#[actix_web::test]
async fn category_item_groups_are_public() {
    let app = app!();

    let req = test::TestRequest::get()
        .uri("/api/categories/Raw%20Material/item-groups")
        .to_request();
    let groups: Vec<String> = test::call_and_read_body_json(&app, req).await;

    assert!(groups.is_empty());
}
