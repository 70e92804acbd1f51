use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::DocStatus;
use crate::models::bids::{self, Bid, BidFilter};
use crate::models::tenders;
use crate::store::{StoreError, StoreResult};

/// Insert a new bid.
pub async fn insert_bid(db: &DatabaseConnection, bid: Bid) -> Result<Bid, DbErr> {
    let new_bid = bids::ActiveModel {
        id: Set(bid.id),
        tender_id: Set(bid.tender_id),
        supplier_id: Set(bid.supplier_id),
        grand_total: Set(bid.grand_total),
        doc_status: Set(bid.doc_status),
        created_at: Set(bid.created_at),
        submitted_at: Set(bid.submitted_at),
    };

    new_bid.insert(db).await
}

/// Fetch a single bid by ID.
pub async fn get_bid_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Bid>, DbErr> {
    bids::Entity::find_by_id(id).one(db).await
}

/// Fetch bids matching `filter`, oldest first.
pub async fn list_bids(db: &DatabaseConnection, filter: BidFilter) -> Result<Vec<Bid>, DbErr> {
    let mut query = bids::Entity::find();
    if let Some(tender_id) = filter.tender_id {
        query = query.filter(bids::Column::TenderId.eq(tender_id));
    }
    if let Some(supplier_id) = filter.supplier_id {
        query = query.filter(bids::Column::SupplierId.eq(supplier_id));
    }
    if let Some(doc_status) = filter.doc_status {
        query = query.filter(bids::Column::DocStatus.eq(doc_status));
    }

    query
        .order_by_asc(bids::Column::CreatedAt)
        .order_by_asc(bids::Column::Id)
        .all(db)
        .await
}

/// Lowest submitted `grand_total` on a tender, ignoring one bid.
pub async fn lowest_submitted_bid<C: ConnectionTrait>(
    db: &C,
    tender_id: Uuid,
    excluding: Uuid,
) -> Result<Option<Decimal>, DbErr> {
    let lowest = bids::Entity::find()
        .filter(bids::Column::TenderId.eq(tender_id))
        .filter(bids::Column::DocStatus.eq(DocStatus::Submitted))
        .filter(bids::Column::Id.ne(excluding))
        .order_by_asc(bids::Column::GrandTotal)
        .one(db)
        .await?;

    Ok(lowest.map(|bid| bid.grand_total))
}

/// Mark a draft bid submitted if the tender's floor is still `expected_floor`.
///
/// The tender row is locked for the transaction, so submissions on the same tender
/// serialize here even across server instances.
pub async fn submit_bid(
    db: &DatabaseConnection,
    bid_id: Uuid,
    expected_floor: Option<Decimal>,
    at: DateTime<Utc>,
) -> StoreResult<Bid> {
    let txn = db.begin().await?;

    let bid = bids::Entity::find_by_id(bid_id)
        .one(&txn)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Bid {bid_id} not found")))?;
    tenders::Entity::find_by_id(bid.tender_id)
        .lock_exclusive()
        .one(&txn)
        .await?;

    if bid.doc_status != DocStatus::Draft {
        return Err(StoreError::Conflict(format!(
            "Bid {bid_id} is no longer a draft"
        )));
    }
    if lowest_submitted_bid(&txn, bid.tender_id, bid_id).await? != expected_floor {
        return Err(StoreError::Conflict(
            "The lowest bid changed while your bid was being checked".to_string(),
        ));
    }

    let mut active: bids::ActiveModel = bid.into();
    active.doc_status = Set(DocStatus::Submitted);
    active.submitted_at = Set(Some(at));
    let submitted = active.update(&txn).await?;

    txn.commit().await?;
    Ok(submitted)
}

/// Mark a submitted bid cancelled.
pub async fn cancel_bid(db: &DatabaseConnection, bid_id: Uuid) -> StoreResult<Bid> {
    let result = bids::Entity::update_many()
        .col_expr(bids::Column::DocStatus, Expr::value(DocStatus::Cancelled))
        .filter(bids::Column::Id.eq(bid_id))
        .filter(bids::Column::DocStatus.eq(DocStatus::Submitted))
        .exec(db)
        .await?;

    let bid = get_bid_by_id(db, bid_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Bid {bid_id} not found")))?;
    if result.rows_affected == 0 {
        return Err(StoreError::Conflict(format!("Bid {bid_id} is not submitted")));
    }
    Ok(bid)
}
