//! The document store the engine runs against.
//!
//! Every method is atomic per document. Methods that guard a state change take the
//! state the caller observed and fail with [`StoreError::Conflict`] when it no longer
//! holds, so callers never overwrite a concurrent edit blindly.

pub mod memory;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::DbErr;
use std::future::Future;
use thiserror::Error;
use uuid::Uuid;

use crate::models::DocStatus;
use crate::models::bids::{Bid, BidFilter};
use crate::models::rfq_queries;
use crate::models::suppliers;
use crate::models::tenders::{Tender, TenderStatus};
use crate::models::users::{self, CreateUserFromAuth};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Which tenders a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenderFilter {
    All,
    Published,
    /// Published tenders plus the ones the supplier is invited to.
    VisibleToSupplier(Uuid),
}

impl TenderFilter {
    pub fn matches(&self, tender: &Tender) -> bool {
        match self {
            TenderFilter::All => true,
            TenderFilter::Published => tender.header.published_on_website,
            TenderFilter::VisibleToSupplier(supplier_id) => {
                tender.header.published_on_website || tender.is_invited(*supplier_id)
            }
        }
    }
}

pub trait TenderStore: Send + Sync + 'static {
    fn get_tender(&self, id: Uuid) -> impl Future<Output = StoreResult<Option<Tender>>> + Send;

    fn list_tenders(
        &self,
        filter: TenderFilter,
    ) -> impl Future<Output = StoreResult<Vec<Tender>>> + Send;

    /// Insert or replace a tender with its items and invitations.
    ///
    /// Replacing an existing tender keeps its stored `status` and `doc_status`; those
    /// only change through the compare-and-set methods below. The returned tender
    /// reflects what was stored.
    fn save_tender(&self, tender: Tender) -> impl Future<Output = StoreResult<Tender>> + Send;

    fn delete_tender(&self, id: Uuid) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Compare-and-set on the bid status column.
    fn set_tender_status(
        &self,
        id: Uuid,
        expected: TenderStatus,
        next: TenderStatus,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Compare-and-set on the document lifecycle column.
    fn set_tender_doc_status(
        &self,
        id: Uuid,
        expected: DocStatus,
        next: DocStatus,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    fn get_bid(&self, id: Uuid) -> impl Future<Output = StoreResult<Option<Bid>>> + Send;

    fn list_bids(&self, filter: BidFilter) -> impl Future<Output = StoreResult<Vec<Bid>>> + Send;

    fn insert_bid(&self, bid: Bid) -> impl Future<Output = StoreResult<Bid>> + Send;

    /// Lowest `grand_total` among submitted bids on a tender, ignoring `excluding`.
    fn lowest_submitted_bid(
        &self,
        tender_id: Uuid,
        excluding: Uuid,
    ) -> impl Future<Output = StoreResult<Option<Decimal>>> + Send;

    /// Move a draft bid to submitted.
    ///
    /// Fails with `Conflict` when the bid is no longer a draft or when the lowest other
    /// submitted bid differs from `expected_floor`, the value admission was checked against.
    fn submit_bid(
        &self,
        bid_id: Uuid,
        expected_floor: Option<Decimal>,
        at: DateTime<Utc>,
    ) -> impl Future<Output = StoreResult<Bid>> + Send;

    /// Move a submitted bid to cancelled.
    fn cancel_bid(&self, bid_id: Uuid) -> impl Future<Output = StoreResult<Bid>> + Send;

    fn find_or_create_user(
        &self,
        input: CreateUserFromAuth,
    ) -> impl Future<Output = StoreResult<users::Model>> + Send;

    fn supplier_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = StoreResult<Option<suppliers::Model>>> + Send;

    /// Fails with `Conflict` when the user already has a supplier.
    fn insert_supplier(
        &self,
        supplier: suppliers::Model,
    ) -> impl Future<Output = StoreResult<suppliers::Model>> + Send;

    fn category_item_groups(
        &self,
        category: &str,
    ) -> impl Future<Output = StoreResult<Vec<String>>> + Send;

    fn insert_query(
        &self,
        query: rfq_queries::Model,
    ) -> impl Future<Output = StoreResult<rfq_queries::Model>> + Send;

    fn get_query(
        &self,
        id: Uuid,
    ) -> impl Future<Output = StoreResult<Option<rfq_queries::Model>>> + Send;

    fn list_queries(
        &self,
        tender_id: Uuid,
        supplier_id: Option<Uuid>,
    ) -> impl Future<Output = StoreResult<Vec<rfq_queries::Model>>> + Send;

    fn update_query(
        &self,
        query: rfq_queries::Model,
    ) -> impl Future<Output = StoreResult<rfq_queries::Model>> + Send;
}
