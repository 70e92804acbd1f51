use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::DocStatus;

/// SeaORM entity for the `bids` table (Supplier Quotation).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bids")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tender_id: Uuid,
    pub supplier_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((18, 4)))")]
    pub grand_total: Decimal,
    pub doc_status: DocStatus,
    pub created_at: DateTimeUtc,
    pub submitted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenders::Entity",
        from = "Column::TenderId",
        to = "super::tenders::Column::Id"
    )]
    Tender,
    #[sea_orm(
        belongs_to = "super::suppliers::Entity",
        from = "Column::SupplierId",
        to = "super::suppliers::Column::Id"
    )]
    Supplier,
}

impl Related<super::tenders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tender.def()
    }
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub type Bid = Model;

// ── DTOs ──

/// Request body for POST /api/tenders/{id}/bids.
/// The supplier comes from the caller's identity, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBid {
    pub grand_total: Decimal,
}

/// Filter for bid listings. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct BidFilter {
    pub tender_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub doc_status: Option<DocStatus>,
}

impl BidFilter {
    pub fn matches(&self, bid: &Model) -> bool {
        self.tender_id.is_none_or(|id| bid.tender_id == id)
            && self.supplier_id.is_none_or(|id| bid.supplier_id == id)
            && self.doc_status.is_none_or(|s| bid.doc_status == s)
    }
}
