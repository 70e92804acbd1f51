use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{DocStatus, tender_items};

/// Bid status of a published tender, advanced by the status sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum TenderStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "closing_soon")]
    ClosingSoon,
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// SeaORM entity for the `tenders` table (Request for Quotation header).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub rfq_subject: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rfq_description: Option<String>,
    pub category: Option<String>,
    pub published_on_website: bool,
    pub publish_date: Option<DateTimeUtc>,
    pub submission_deadline: Option<DateTimeUtc>,
    pub status: TenderStatus,
    pub doc_status: DocStatus,
    pub live_bidding_enabled: bool,
    #[sea_orm(column_type = "Decimal(Some((18, 4)))", nullable)]
    pub min_bid_decrement: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((18, 4)))")]
    pub total_budget: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 4)))")]
    pub total_quantity: Decimal,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tender_items::Entity")]
    Items,
    #[sea_orm(has_many = "super::tender_suppliers::Entity")]
    InvitedSuppliers,
    #[sea_orm(has_many = "super::bids::Entity")]
    Bids,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl Related<super::tender_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::tender_suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvitedSuppliers.def()
    }
}

impl Related<super::bids::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A tender header together with its line items and invited suppliers.
///
/// This is the unit the engine reads, recomputes and persists. Items are kept in
/// `idx` order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tender {
    #[serde(flatten)]
    pub header: Model,
    pub items: Vec<tender_items::Model>,
    pub invited_suppliers: Vec<Uuid>,
}

impl Tender {
    pub fn id(&self) -> Uuid {
        self.header.id
    }

    pub fn is_invited(&self, supplier_id: Uuid) -> bool {
        self.invited_suppliers.contains(&supplier_id)
    }
}

// ── DTOs ──

/// Line item as sent by a procurement user. Derived amounts are never accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct TenderItemInput {
    pub item_code: String,
    pub qty: Option<Decimal>,
    pub uom: Option<String>,
    pub unit_budget: Option<Decimal>,
    pub conversion_factor: Option<Decimal>,
}

/// Request body for creating or editing a tender.
///
/// Totals, `status`, `publish_date` and `doc_status` are absent on purpose: they are
/// derived or owned by explicit lifecycle actions.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveTender {
    pub rfq_subject: Option<String>,
    pub rfq_description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub published_on_website: bool,
    pub submission_deadline: Option<DateTimeUtc>,
    #[serde(default)]
    pub live_bidding_enabled: bool,
    pub min_bid_decrement: Option<Decimal>,
    #[serde(default)]
    pub items: Vec<TenderItemInput>,
    #[serde(default)]
    pub invited_suppliers: Vec<Uuid>,
}

/// Request body for POST /api/tenders/{id}/reopen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReopenTender {
    pub submission_deadline: Option<DateTimeUtc>,
}

/// Public listing row: header fields plus aggregates, without line items.
#[derive(Debug, Clone, Serialize)]
pub struct TenderSummary {
    pub id: Uuid,
    pub rfq_subject: Option<String>,
    pub category: Option<String>,
    pub publish_date: Option<DateTimeUtc>,
    pub submission_deadline: Option<DateTimeUtc>,
    pub status: TenderStatus,
    pub live_bidding_enabled: bool,
    pub total_budget: Decimal,
    pub total_quantity: Decimal,
}

impl From<&Tender> for TenderSummary {
    fn from(t: &Tender) -> Self {
        Self {
            id: t.header.id,
            rfq_subject: t.header.rfq_subject.clone(),
            category: t.header.category.clone(),
            publish_date: t.header.publish_date,
            submission_deadline: t.header.submission_deadline,
            status: t.header.status,
            live_bidding_enabled: t.header.live_bidding_enabled,
            total_budget: t.header.total_budget,
            total_quantity: t.header.total_quantity,
        }
    }
}
