//! Postgres persistence through SeaORM.
//!
//! Each submodule holds free query functions for one area; [`SeaOrmStore`] wires them
//! into the [`TenderStore`] trait the engine runs against.

pub mod bids;
pub mod queries;
pub mod tenders;
pub mod users;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection, DbErr};
use uuid::Uuid;

use crate::models::DocStatus;
use crate::models::bids::{Bid, BidFilter};
use crate::models::rfq_queries;
use crate::models::suppliers;
use crate::models::tenders::{Tender, TenderStatus};
use crate::models::users::{self as user_models, CreateUserFromAuth};
use crate::store::{StoreResult, TenderFilter, TenderStore};

/// Create a SeaORM database connection pool.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TenderStore for SeaOrmStore {
    async fn get_tender(&self, id: Uuid) -> StoreResult<Option<Tender>> {
        Ok(tenders::get_tender(&self.db, id).await?)
    }

    async fn list_tenders(&self, filter: TenderFilter) -> StoreResult<Vec<Tender>> {
        Ok(tenders::list_tenders(&self.db, filter).await?)
    }

    async fn save_tender(&self, tender: Tender) -> StoreResult<Tender> {
        Ok(tenders::save_tender(&self.db, tender).await?)
    }

    async fn delete_tender(&self, id: Uuid) -> StoreResult<bool> {
        let result = tenders::delete_tender(&self.db, id).await?;
        Ok(result.rows_affected > 0)
    }

    async fn set_tender_status(
        &self,
        id: Uuid,
        expected: TenderStatus,
        next: TenderStatus,
    ) -> StoreResult<()> {
        tenders::set_tender_status(&self.db, id, expected, next).await
    }

    async fn set_tender_doc_status(
        &self,
        id: Uuid,
        expected: DocStatus,
        next: DocStatus,
    ) -> StoreResult<()> {
        tenders::set_tender_doc_status(&self.db, id, expected, next).await
    }

    async fn get_bid(&self, id: Uuid) -> StoreResult<Option<Bid>> {
        Ok(bids::get_bid_by_id(&self.db, id).await?)
    }

    async fn list_bids(&self, filter: BidFilter) -> StoreResult<Vec<Bid>> {
        Ok(bids::list_bids(&self.db, filter).await?)
    }

    async fn insert_bid(&self, bid: Bid) -> StoreResult<Bid> {
        Ok(bids::insert_bid(&self.db, bid).await?)
    }

    async fn lowest_submitted_bid(
        &self,
        tender_id: Uuid,
        excluding: Uuid,
    ) -> StoreResult<Option<Decimal>> {
        Ok(bids::lowest_submitted_bid(&self.db, tender_id, excluding).await?)
    }

    async fn submit_bid(
        &self,
        bid_id: Uuid,
        expected_floor: Option<Decimal>,
        at: DateTime<Utc>,
    ) -> StoreResult<Bid> {
        bids::submit_bid(&self.db, bid_id, expected_floor, at).await
    }

    async fn cancel_bid(&self, bid_id: Uuid) -> StoreResult<Bid> {
        bids::cancel_bid(&self.db, bid_id).await
    }

    async fn find_or_create_user(
        &self,
        input: CreateUserFromAuth,
    ) -> StoreResult<user_models::Model> {
        Ok(users::find_or_create_from_auth(&self.db, input).await?)
    }

    async fn supplier_for_user(&self, user_id: Uuid) -> StoreResult<Option<suppliers::Model>> {
        Ok(users::get_supplier_by_user_id(&self.db, user_id).await?)
    }

    async fn insert_supplier(&self, supplier: suppliers::Model) -> StoreResult<suppliers::Model> {
        users::insert_supplier(&self.db, supplier).await
    }

    async fn category_item_groups(&self, category: &str) -> StoreResult<Vec<String>> {
        Ok(queries::get_category_item_groups(&self.db, category).await?)
    }

    async fn insert_query(&self, query: rfq_queries::Model) -> StoreResult<rfq_queries::Model> {
        Ok(queries::insert_query(&self.db, query).await?)
    }

    async fn get_query(&self, id: Uuid) -> StoreResult<Option<rfq_queries::Model>> {
        Ok(queries::get_query_by_id(&self.db, id).await?)
    }

    async fn list_queries(
        &self,
        tender_id: Uuid,
        supplier_id: Option<Uuid>,
    ) -> StoreResult<Vec<rfq_queries::Model>> {
        Ok(queries::list_queries(&self.db, tender_id, supplier_id).await?)
    }

    async fn update_query(&self, query: rfq_queries::Model) -> StoreResult<rfq_queries::Model> {
        queries::update_query(&self.db, query).await
    }
}
