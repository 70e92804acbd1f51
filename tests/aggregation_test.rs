mod common;

use chrono::Duration;
use common::*;
use supplier_portal_backend::clock::Clock;
use supplier_portal_backend::config::EngineConfig;
use supplier_portal_backend::error::EngineError;
use supplier_portal_backend::models::tenders::{SaveTender, TenderItemInput};

#[tokio::test]
async fn totals_are_summed_from_line_items() {
    let engine = engine();
    let input = SaveTender {
        items: vec![
            item("PIPE-2IN", 2, 50),
            TenderItemInput {
                item_code: "FLANGE".to_string(),
                qty: Some(dec(3)),
                uom: Some("Box".to_string()),
                unit_budget: Some(dec(10)),
                conversion_factor: Some(dec(2)),
            },
        ],
        ..published_tender(Duration::days(10))
    };

    let tender = engine.create_tender(&procurement(), input).await.unwrap();

    assert_eq!(tender.items[0].idx, 1);
    assert_eq!(tender.items[1].idx, 2);
    assert_eq!(tender.items[0].budget_amount, Some(dec(100)));
    assert_eq!(tender.items[0].budget_as_stock_uom, None);
    assert_eq!(tender.items[1].budget_amount, Some(dec(30)));
    assert_eq!(tender.items[1].budget_as_stock_uom, Some(dec(20)));
    assert_eq!(tender.header.total_budget, dec(130));
    assert_eq!(tender.header.total_quantity, dec(5));
    assert!(tender.items.iter().all(|i| i.tender_id == tender.id()));
}

#[tokio::test]
async fn rows_without_a_budget_do_not_count_towards_the_total() {
    let engine = engine();
    let input = SaveTender {
        items: vec![
            item("PIPE-2IN", 4, 25),
            TenderItemInput {
                item_code: "SAMPLE".to_string(),
                qty: Some(dec(1)),
                uom: None,
                unit_budget: None,
                conversion_factor: Some(dec(12)),
            },
        ],
        ..published_tender(Duration::days(10))
    };

    let tender = engine.create_tender(&procurement(), input).await.unwrap();

    assert_eq!(tender.items[1].budget_amount, None);
    assert_eq!(tender.items[1].budget_as_stock_uom, None);
    assert_eq!(tender.header.total_budget, dec(100));
    assert_eq!(tender.header.total_quantity, dec(5));
}

#[tokio::test]
async fn recompute_is_idempotent() {
    let engine = engine();
    let tender = engine
        .create_tender(&procurement(), published_tender(Duration::days(10)))
        .await
        .unwrap();

    engine.clock().advance(Duration::hours(5));
    let again = engine.recompute_aggregates(tender.clone()).unwrap();

    assert_eq!(again, tender);
}

#[tokio::test]
async fn stale_derived_values_are_overwritten() {
    let engine = engine();
    let mut tender = engine
        .create_tender(&procurement(), published_tender(Duration::days(10)))
        .await
        .unwrap();
    tender.header.total_budget = dec(1);
    tender.items[0].budget_amount = Some(dec(999_999));

    let fixed = engine.recompute_aggregates(tender).unwrap();

    assert_eq!(fixed.items[0].budget_amount, Some(dec(1000)));
    assert_eq!(fixed.header.total_budget, dec(1000));
}

#[tokio::test]
async fn publishing_without_a_subject_fails() {
    let engine = engine();
    let input = SaveTender {
        rfq_subject: Some("   ".to_string()),
        ..published_tender(Duration::days(10))
    };

    let err = engine.create_tender(&procurement(), input).await.unwrap_err();

    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(
        err.to_string(),
        "RFQ Subject is mandatory when publishing on website"
    );
}

#[tokio::test]
async fn publishing_without_a_description_fails() {
    let engine = engine();
    let input = SaveTender {
        rfq_description: None,
        ..published_tender(Duration::days(10))
    };

    let err = engine.create_tender(&procurement(), input).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "RFQ Description is mandatory when publishing on website"
    );
}

#[tokio::test]
async fn unpublished_tenders_may_omit_subject_and_description() {
    let engine = engine();
    let input = SaveTender {
        rfq_subject: None,
        rfq_description: None,
        published_on_website: false,
        ..published_tender(Duration::days(10))
    };

    let tender = engine.create_tender(&procurement(), input).await.unwrap();

    assert_eq!(tender.header.publish_date, None);
}

#[tokio::test]
async fn publish_date_is_stamped_once() {
    let engine = engine();
    let buyer = procurement();
    let draft = SaveTender {
        published_on_website: false,
        ..published_tender(Duration::days(10))
    };
    let tender = engine.create_tender(&buyer, draft).await.unwrap();
    assert_eq!(tender.header.publish_date, None);

    engine.clock().advance(Duration::hours(1));
    let published = engine
        .update_tender(&buyer, tender.id(), published_tender(Duration::days(10)))
        .await
        .unwrap();
    let stamped = t0() + Duration::hours(1);
    assert_eq!(published.header.publish_date, Some(stamped));

    engine.clock().advance(Duration::hours(1));
    let edited = engine
        .update_tender(&buyer, tender.id(), published_tender(Duration::days(12)))
        .await
        .unwrap();
    assert_eq!(edited.header.publish_date, Some(stamped));
}

#[tokio::test]
async fn negative_quantities_and_decrements_are_rejected() {
    let engine = engine();
    let negative_qty = SaveTender {
        items: vec![item("PIPE-2IN", -1, 100)],
        ..published_tender(Duration::days(10))
    };
    let err = engine
        .create_tender(&procurement(), negative_qty)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Quantity cannot be negative on row 1");

    let negative_decrement = SaveTender {
        live_bidding_enabled: true,
        min_bid_decrement: Some(dec(-5)),
        ..published_tender(Duration::days(10))
    };
    let err = engine
        .create_tender(&procurement(), negative_decrement)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn live_bidding_falls_back_to_the_configured_decrement() {
    let engine = engine_with(EngineConfig {
        default_min_bid_decrement: Some(dec(50)),
        ..EngineConfig::default()
    });
    let input = SaveTender {
        live_bidding_enabled: true,
        min_bid_decrement: None,
        ..published_tender(Duration::days(10))
    };

    let tender = engine.create_tender(&procurement(), input).await.unwrap();

    assert_eq!(tender.header.min_bid_decrement, Some(dec(50)));
}

#[tokio::test]
async fn oversized_budget_is_rejected_instead_of_overflowing() {
    let engine = engine();
    let huge = TenderItemInput {
        item_code: "BULK".to_string(),
        qty: Some(dec(2)),
        uom: Some("Nos".to_string()),
        unit_budget: Some(rust_decimal::Decimal::MAX),
        conversion_factor: None,
    };
    let input = SaveTender {
        items: vec![item("PIPE-2IN", 1, 10), huge],
        ..published_tender(Duration::days(10))
    };

    let err = engine.create_tender(&procurement(), input).await.unwrap_err();

    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(err.to_string(), "Budget amount is too large on row 2");
}

#[tokio::test]
async fn oversized_total_budget_is_rejected() {
    let engine = engine();
    let line = || TenderItemInput {
        item_code: "BULK".to_string(),
        qty: Some(dec(1)),
        uom: Some("Nos".to_string()),
        unit_budget: Some(rust_decimal::Decimal::MAX),
        conversion_factor: None,
    };
    let input = SaveTender {
        items: vec![line(), line()],
        ..published_tender(Duration::days(10))
    };

    let err = engine.create_tender(&procurement(), input).await.unwrap_err();

    assert_eq!(err.to_string(), "Total budget is too large");
}
