//! Shared fixtures for the integration tests: an engine over the in-memory store with
//! a clock pinned to a known instant.
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use supplier_portal_backend::clock::FixedClock;
use supplier_portal_backend::config::EngineConfig;
use supplier_portal_backend::engine::{Engine, Viewer};
use supplier_portal_backend::models::bids::{Bid, CreateBid};
use supplier_portal_backend::models::tenders::{SaveTender, Tender, TenderItemInput};
use supplier_portal_backend::store::memory::MemoryStore;

pub type TestEngine = Engine<MemoryStore, FixedClock>;

/// 2026-03-02 12:00:00 UTC.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
}

pub fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

pub fn engine() -> TestEngine {
    engine_with(EngineConfig::default())
}

pub fn engine_with(config: EngineConfig) -> TestEngine {
    Engine::new(MemoryStore::new(), FixedClock::new(t0()), config)
}

pub fn procurement() -> Viewer {
    Viewer::procurement(Uuid::new_v4())
}

pub fn supplier() -> Viewer {
    Viewer::supplier(Uuid::new_v4(), Uuid::new_v4())
}

pub fn item(code: &str, qty: i64, unit_budget: i64) -> TenderItemInput {
    TenderItemInput {
        item_code: code.to_string(),
        qty: Some(dec(qty)),
        uom: Some("Nos".to_string()),
        unit_budget: Some(dec(unit_budget)),
        conversion_factor: None,
    }
}

/// A published tender body closing `deadline_in` after [`t0`].
pub fn published_tender(deadline_in: Duration) -> SaveTender {
    SaveTender {
        rfq_subject: Some("Steel pipes".to_string()),
        rfq_description: Some("Seamless pipes, 2 inch".to_string()),
        category: Some("Raw Material".to_string()),
        published_on_website: true,
        submission_deadline: Some(t0() + deadline_in),
        live_bidding_enabled: false,
        min_bid_decrement: None,
        items: vec![item("PIPE-2IN", 10, 100)],
        invited_suppliers: Vec::new(),
    }
}

/// A submitted, published tender with live bidding and the given decrement.
pub async fn open_live_tender(engine: &TestEngine, decrement: i64) -> Tender {
    let buyer = procurement();
    let input = SaveTender {
        live_bidding_enabled: true,
        min_bid_decrement: Some(dec(decrement)),
        ..published_tender(Duration::days(10))
    };
    let tender = engine.create_tender(&buyer, input).await.unwrap();
    engine.submit_tender(&buyer, tender.id()).await.unwrap()
}

/// Create and submit a bid for `viewer`.
pub async fn place_bid(
    engine: &TestEngine,
    viewer: &Viewer,
    tender_id: Uuid,
    amount: i64,
) -> Result<Bid, supplier_portal_backend::error::EngineError> {
    let draft = engine
        .create_bid(viewer, tender_id, CreateBid { grand_total: dec(amount) })
        .await?;
    engine.submit_bid(viewer, draft.id).await
}
