use sea_orm::*;
use uuid::Uuid;

use crate::models::rfq_categories;
use crate::models::rfq_category_item_groups;
use crate::models::rfq_queries;
use crate::store::{StoreError, StoreResult};

/// Item groups allowed by a category, alphabetically.
pub async fn get_category_item_groups(
    db: &DatabaseConnection,
    category: &str,
) -> Result<Vec<String>, DbErr> {
    let Some(category) = rfq_categories::Entity::find_by_id(category.to_string())
        .one(db)
        .await?
    else {
        return Ok(Vec::new());
    };

    let groups = rfq_category_item_groups::Entity::find()
        .filter(rfq_category_item_groups::Column::Category.eq(category.name))
        .order_by_asc(rfq_category_item_groups::Column::ItemGroup)
        .all(db)
        .await?;

    Ok(groups.into_iter().map(|g| g.item_group).collect())
}

/// Insert a new RFQ query.
pub async fn insert_query(
    db: &DatabaseConnection,
    query: rfq_queries::Model,
) -> Result<rfq_queries::Model, DbErr> {
    let new_query = rfq_queries::ActiveModel {
        id: Set(query.id),
        tender_id: Set(query.tender_id),
        supplier_id: Set(query.supplier_id),
        question: Set(query.question),
        response: Set(query.response),
        status: Set(query.status),
        created_at: Set(query.created_at),
        answered_at: Set(query.answered_at),
    };

    new_query.insert(db).await
}

/// Fetch a single query by ID.
pub async fn get_query_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<rfq_queries::Model>, DbErr> {
    rfq_queries::Entity::find_by_id(id).one(db).await
}

/// Queries on a tender, optionally only one supplier's, oldest first.
pub async fn list_queries(
    db: &DatabaseConnection,
    tender_id: Uuid,
    supplier_id: Option<Uuid>,
) -> Result<Vec<rfq_queries::Model>, DbErr> {
    let mut query = rfq_queries::Entity::find().filter(rfq_queries::Column::TenderId.eq(tender_id));
    if let Some(supplier_id) = supplier_id {
        query = query.filter(rfq_queries::Column::SupplierId.eq(supplier_id));
    }

    query
        .order_by_asc(rfq_queries::Column::CreatedAt)
        .order_by_asc(rfq_queries::Column::Id)
        .all(db)
        .await
}

/// Write back the response, status and answer time of a query.
pub async fn update_query(
    db: &DatabaseConnection,
    query: rfq_queries::Model,
) -> StoreResult<rfq_queries::Model> {
    let existing = rfq_queries::Entity::find_by_id(query.id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Query {} not found", query.id)))?;

    let mut active: rfq_queries::ActiveModel = existing.into();
    active.response = Set(query.response);
    active.status = Set(query.status);
    active.answered_at = Set(query.answered_at);

    Ok(active.update(db).await?)
}
