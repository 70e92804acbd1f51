pub mod bids;
pub mod rfq_categories;
pub mod rfq_category_item_groups;
pub mod rfq_queries;
pub mod suppliers;
pub mod tender_items;
pub mod tender_suppliers;
pub mod tenders;
pub mod users;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Document lifecycle shared by tenders and bids, stored as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum DocStatus {
    #[sea_orm(num_value = 0)]
    Draft,
    #[sea_orm(num_value = 1)]
    Submitted,
    #[sea_orm(num_value = 2)]
    Cancelled,
}
