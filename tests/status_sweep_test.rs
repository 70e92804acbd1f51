mod common;

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use common::*;

use supplier_portal_backend::config::{EngineConfig, MAX_CLOSING_SOON_FENCE_DAYS, StatusPolicy};
use supplier_portal_backend::engine::status::target_status;
use supplier_portal_backend::scheduler::spawn_status_sweeper;
use supplier_portal_backend::engine::SweepReport;
use supplier_portal_backend::models::tenders::{SaveTender, Tender, TenderStatus};
use supplier_portal_backend::store::TenderStore;

/// Sweep instant, well after the tenders are created at `t0`.
fn sweep_at() -> DateTime<Utc> {
    t0() + Duration::days(20)
}

async fn tender_closing_at(engine: &TestEngine, deadline: DateTime<Utc>) -> Tender {
    let input = SaveTender {
        submission_deadline: Some(deadline),
        ..published_tender(Duration::days(1))
    };
    let tender = engine.create_tender(&procurement(), input).await.unwrap();
    assert_eq!(tender.header.status, TenderStatus::Active);
    tender
}

async fn status_of(engine: &TestEngine, tender: &Tender) -> TenderStatus {
    engine
        .store()
        .get_tender(tender.id())
        .await
        .unwrap()
        .unwrap()
        .header
        .status
}

#[tokio::test]
async fn sweep_moves_tenders_by_deadline() {
    let engine = engine();
    let now = sweep_at();
    let past = tender_closing_at(&engine, now - Duration::hours(1)).await;
    let soon = tender_closing_at(&engine, now + Duration::days(1)).await;
    let later = tender_closing_at(&engine, now + Duration::days(10)).await;

    let report = engine.run_status_sweep(now).await.unwrap();

    assert_eq!(status_of(&engine, &past).await, TenderStatus::Closed);
    assert_eq!(status_of(&engine, &soon).await, TenderStatus::ClosingSoon);
    assert_eq!(status_of(&engine, &later).await, TenderStatus::Active);
    assert_eq!(
        report,
        SweepReport {
            updated: 2,
            skipped: 0,
            unchanged: 1,
        }
    );
}

#[tokio::test]
async fn fence_boundary_is_inclusive() {
    let engine = engine();
    let now = sweep_at();
    let edge = tender_closing_at(&engine, now + Duration::days(3)).await;

    engine.run_status_sweep(now).await.unwrap();

    assert_eq!(status_of(&engine, &edge).await, TenderStatus::ClosingSoon);
}

#[tokio::test]
async fn second_sweep_changes_nothing() {
    let engine = engine();
    let now = sweep_at();
    tender_closing_at(&engine, now - Duration::hours(1)).await;
    tender_closing_at(&engine, now + Duration::days(1)).await;

    engine.run_status_sweep(now).await.unwrap();
    let report = engine.run_status_sweep(now).await.unwrap();

    assert_eq!(report.updated, 0);
    assert_eq!(report.unchanged, 2);
}

#[tokio::test]
async fn unpublished_tenders_are_left_alone() {
    let engine = engine();
    let now = sweep_at();
    let input = SaveTender {
        published_on_website: false,
        submission_deadline: Some(now - Duration::hours(1)),
        ..published_tender(Duration::days(1))
    };
    let hidden = engine.create_tender(&procurement(), input).await.unwrap();

    let report = engine.run_status_sweep(now).await.unwrap();

    assert_eq!(report, SweepReport::default());
    assert_eq!(status_of(&engine, &hidden).await, TenderStatus::Active);
}

#[tokio::test]
async fn closed_is_sticky_when_the_deadline_moves_forward() {
    let engine = engine();
    let buyer = procurement();
    let now = sweep_at();
    let tender = tender_closing_at(&engine, now - Duration::hours(1)).await;
    engine.run_status_sweep(now).await.unwrap();
    assert_eq!(status_of(&engine, &tender).await, TenderStatus::Closed);

    let extended = SaveTender {
        submission_deadline: Some(now + Duration::days(10)),
        ..published_tender(Duration::days(1))
    };
    let edited = engine
        .update_tender(&buyer, tender.id(), extended)
        .await
        .unwrap();
    assert_eq!(edited.header.status, TenderStatus::Closed);

    let report = engine.run_status_sweep(now).await.unwrap();
    assert_eq!(report.updated, 0);
    assert_eq!(status_of(&engine, &tender).await, TenderStatus::Closed);
}

#[tokio::test]
async fn rederive_policy_reopens_on_extended_deadline() {
    let engine = engine_with(EngineConfig {
        status_policy: StatusPolicy::Rederive,
        ..EngineConfig::default()
    });
    let now = sweep_at();
    let tender = tender_closing_at(&engine, now - Duration::hours(1)).await;
    engine.run_status_sweep(now).await.unwrap();

    let extended = SaveTender {
        submission_deadline: Some(now + Duration::days(10)),
        ..published_tender(Duration::days(1))
    };
    engine
        .update_tender(&procurement(), tender.id(), extended)
        .await
        .unwrap();
    engine.run_status_sweep(now).await.unwrap();

    assert_eq!(status_of(&engine, &tender).await, TenderStatus::Active);
}

#[tokio::test]
async fn explicit_reopen_rederives_from_the_new_deadline() {
    let engine = engine();
    let buyer = procurement();
    let tender = engine
        .create_tender(&buyer, published_tender(Duration::days(1)))
        .await
        .unwrap();
    engine
        .run_status_sweep(t0() + Duration::days(2))
        .await
        .unwrap();
    assert_eq!(status_of(&engine, &tender).await, TenderStatus::Closed);

    let reopened = engine
        .reopen_tender(&buyer, tender.id(), Some(t0() + Duration::days(2)))
        .await
        .unwrap();

    assert_eq!(reopened.header.status, TenderStatus::ClosingSoon);
    assert_eq!(
        reopened.header.submission_deadline,
        Some(t0() + Duration::days(2))
    );
}

#[tokio::test]
async fn reopen_requires_a_future_deadline() {
    let engine = engine();
    let buyer = procurement();
    let tender = engine
        .create_tender(&buyer, published_tender(Duration::days(1)))
        .await
        .unwrap();
    engine
        .run_status_sweep(t0() + Duration::days(2))
        .await
        .unwrap();

    let past = engine
        .reopen_tender(&buyer, tender.id(), Some(t0() - Duration::hours(1)))
        .await;
    assert!(past.is_err());
}

#[tokio::test]
async fn non_closed_tenders_cannot_be_reopened() {
    let engine = engine();
    let buyer = procurement();
    let tender = engine
        .create_tender(&buyer, published_tender(Duration::days(10)))
        .await
        .unwrap();

    let err = engine
        .reopen_tender(&buyer, tender.id(), None)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Only closed tenders can be reopened");
}

#[tokio::test]
async fn new_tender_status_follows_its_deadline() {
    let engine = engine();

    let soon = engine
        .create_tender(&procurement(), published_tender(Duration::days(2)))
        .await
        .unwrap();
    let no_deadline = engine
        .create_tender(
            &procurement(),
            SaveTender {
                submission_deadline: None,
                ..published_tender(Duration::days(2))
            },
        )
        .await
        .unwrap();

    let lapsed = engine
        .create_tender(&procurement(), published_tender(Duration::hours(-1)))
        .await
        .unwrap();

    assert_eq!(soon.header.status, TenderStatus::ClosingSoon);
    assert_eq!(no_deadline.header.status, TenderStatus::Active);
    assert_eq!(lapsed.header.status, TenderStatus::Closed);
}

#[tokio::test]
async fn oversized_fence_is_capped() {
    let config = EngineConfig {
        closing_soon_fence_days: 100_000_000,
        ..EngineConfig::default()
    };
    assert_eq!(config.fence_days(), MAX_CLOSING_SOON_FENCE_DAYS);

    let engine = engine_with(config);
    let tender = engine
        .create_tender(&procurement(), published_tender(Duration::days(10)))
        .await
        .unwrap();
    assert_eq!(tender.header.status, TenderStatus::ClosingSoon);

    let report = engine.run_status_sweep(sweep_at()).await.unwrap();
    assert_eq!(report.updated, 1);
    assert_eq!(status_of(&engine, &tender).await, TenderStatus::Closed);
}

#[test]
fn fence_past_the_calendar_end_counts_as_closing_soon() {
    let now = t0();
    assert_eq!(
        target_status(now + Duration::days(365), now, i64::MAX),
        TenderStatus::ClosingSoon
    );
    assert_eq!(
        target_status(now - Duration::hours(1), now, i64::MAX),
        TenderStatus::Closed
    );
}

#[tokio::test]
async fn sweeper_survives_a_zero_interval() {
    let engine = Arc::new(engine());
    let tender = engine
        .create_tender(&procurement(), published_tender(Duration::days(10)))
        .await
        .unwrap();
    engine.clock().set(t0() + Duration::days(11));

    let handle = spawn_status_sweeper(engine.clone(), std::time::Duration::ZERO);

    let mut closed = false;
    for _ in 0..50 {
        if status_of(&engine, &tender).await == TenderStatus::Closed {
            closed = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    assert!(closed);
    assert!(!handle.is_finished());
    handle.abort();
}
