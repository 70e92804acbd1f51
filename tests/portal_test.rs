mod common;

use chrono::Duration;
use common::*;
use uuid::Uuid;

use supplier_portal_backend::engine::Viewer;
use supplier_portal_backend::error::EngineError;
use supplier_portal_backend::models::DocStatus;
use supplier_portal_backend::models::rfq_queries::{CreateQuery, QueryStatus, UpdateQuery};
use supplier_portal_backend::models::suppliers::RegisterVendor;
use supplier_portal_backend::models::users::{CreateUserFromAuth, Roles};

fn login(email: &str, role: Roles) -> CreateUserFromAuth {
    CreateUserFromAuth {
        id: Uuid::new_v4(),
        email: email.to_string(),
        display_name: Some("Test User".to_string()),
        role,
    }
}

fn vendor_form() -> RegisterVendor {
    RegisterVendor {
        company_name: "Acme Pipes Pvt Ltd".to_string(),
        contact_person: "R. Kumar".to_string(),
        phone: Some("+91 98450 00000".to_string()),
        gst: Some("29ABCDE1234F1Z5".to_string()),
    }
}

// ── Vendor registration ──

#[tokio::test]
async fn registering_links_a_supplier_to_the_user() {
    let engine = engine();
    let identity = login("sales@acme.test", Roles::Supplier);
    let viewer = engine.resolve_viewer(identity.clone()).await.unwrap();
    assert_eq!(viewer.supplier_id(), None);

    let supplier = engine
        .register_vendor(&viewer, &identity.email, vendor_form())
        .await
        .unwrap();

    let viewer = engine.resolve_viewer(identity).await.unwrap();
    assert_eq!(viewer.supplier_id(), Some(supplier.id));
    assert_eq!(supplier.email, "sales@acme.test");
    assert_eq!(supplier.supplier_name, "Acme Pipes Pvt Ltd");
}

#[tokio::test]
async fn registering_twice_is_rejected() {
    let engine = engine();
    let identity = login("sales@acme.test", Roles::Supplier);
    let viewer = engine.resolve_viewer(identity.clone()).await.unwrap();
    engine
        .register_vendor(&viewer, &identity.email, vendor_form())
        .await
        .unwrap();

    // a stale viewer (no supplier yet) still hits the store-level check
    let err = engine
        .register_vendor(&viewer, &identity.email, vendor_form())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Email already registered");

    let fresh = engine.resolve_viewer(identity.clone()).await.unwrap();
    let err = engine
        .register_vendor(&fresh, &identity.email, vendor_form())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Email already registered");
}

#[tokio::test]
async fn anonymous_callers_cannot_register() {
    let engine = engine();

    let err = engine
        .register_vendor(&Viewer::Anonymous, "x@y.test", vendor_form())
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Permission(_)));
}

// ── RFQ queries ──

#[tokio::test]
async fn response_requires_answered_status() {
    let engine = engine();
    let buyer = procurement();
    let asker = supplier();
    let tender = engine
        .create_tender(&buyer, published_tender(Duration::days(10)))
        .await
        .unwrap();
    let query = engine
        .ask_query(
            &asker,
            tender.id(),
            CreateQuery {
                question: "Is galvanised acceptable?".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(query.status, QueryStatus::Pending);

    let err = engine
        .answer_query(
            &buyer,
            query.id,
            UpdateQuery {
                response: Some("Yes".to_string()),
                status: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Please change status to 'Answered' before saving the response."
    );

    let answered = engine
        .answer_query(
            &buyer,
            query.id,
            UpdateQuery {
                response: Some("Yes".to_string()),
                status: Some(QueryStatus::Answered),
            },
        )
        .await
        .unwrap();
    assert_eq!(answered.status, QueryStatus::Answered);
    assert_eq!(answered.response.as_deref(), Some("Yes"));
    assert_eq!(answered.answered_at, Some(t0()));
}

#[tokio::test]
async fn suppliers_see_only_their_own_queries() {
    let engine = engine();
    let buyer = procurement();
    let s1 = supplier();
    let s2 = supplier();
    let tender = engine
        .create_tender(&buyer, published_tender(Duration::days(10)))
        .await
        .unwrap();
    for (viewer, question) in [(&s1, "Delivery terms?"), (&s2, "Payment terms?")] {
        engine
            .ask_query(
                viewer,
                tender.id(),
                CreateQuery {
                    question: question.to_string(),
                },
            )
            .await
            .unwrap();
    }

    let own = engine.tender_queries(&s1, tender.id()).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].question, "Delivery terms?");

    let all = engine.tender_queries(&buyer, tender.id()).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn suppliers_cannot_answer_queries() {
    let engine = engine();
    let asker = supplier();
    let tender = engine
        .create_tender(&procurement(), published_tender(Duration::days(10)))
        .await
        .unwrap();
    let query = engine
        .ask_query(
            &asker,
            tender.id(),
            CreateQuery {
                question: "Samples?".to_string(),
            },
        )
        .await
        .unwrap();

    let err = engine
        .answer_query(
            &asker,
            query.id,
            UpdateQuery {
                response: Some("sure".to_string()),
                status: Some(QueryStatus::Answered),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Permission(_)));
}

// ── RFQ categories ──

#[tokio::test]
async fn category_item_groups_are_listed() {
    let engine = engine();
    engine
        .store()
        .add_category("Raw Material", &["Pipes", "Sheets"])
        .await;

    let groups = engine.category_item_groups("Raw Material").await.unwrap();
    assert_eq!(groups, vec!["Pipes".to_string(), "Sheets".to_string()]);

    assert!(engine.category_item_groups("  ").await.unwrap().is_empty());
    assert!(engine.category_item_groups("Unknown").await.unwrap().is_empty());
}

// ── Tender lifecycle ──

#[tokio::test]
async fn suppliers_cannot_create_tenders() {
    let engine = engine();

    let err = engine
        .create_tender(&supplier(), published_tender(Duration::days(10)))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Permission(_)));
}

#[tokio::test]
async fn submitted_tenders_are_frozen_and_can_be_cancelled() {
    let engine = engine();
    let buyer = procurement();
    let tender = engine
        .create_tender(&buyer, published_tender(Duration::days(10)))
        .await
        .unwrap();

    let submitted = engine.submit_tender(&buyer, tender.id()).await.unwrap();
    assert_eq!(submitted.header.doc_status, DocStatus::Submitted);

    let err = engine
        .update_tender(&buyer, tender.id(), published_tender(Duration::days(12)))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Only draft tenders can be edited");

    let err = engine.delete_tender(&buyer, tender.id()).await.unwrap_err();
    assert_eq!(err.to_string(), "Only draft tenders can be deleted");

    let cancelled = engine.cancel_tender(&buyer, tender.id()).await.unwrap();
    assert_eq!(cancelled.header.doc_status, DocStatus::Cancelled);
}

#[tokio::test]
async fn tenders_without_items_cannot_be_submitted() {
    let engine = engine();
    let buyer = procurement();
    let mut input = published_tender(Duration::days(10));
    input.items.clear();
    let tender = engine.create_tender(&buyer, input).await.unwrap();

    let err = engine.submit_tender(&buyer, tender.id()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Add at least one item before submitting the tender"
    );
}

#[tokio::test]
async fn draft_tenders_can_be_deleted() {
    let engine = engine();
    let buyer = procurement();
    let tender = engine
        .create_tender(&buyer, published_tender(Duration::days(10)))
        .await
        .unwrap();

    engine.delete_tender(&buyer, tender.id()).await.unwrap();

    let err = engine.tender_for(&buyer, tender.id()).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
