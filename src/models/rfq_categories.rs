use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for `rfq_categories`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rfq_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rfq_category_item_groups::Entity")]
    ItemGroups,
}

impl Related<super::rfq_category_item_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
