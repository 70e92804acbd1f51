use sea_orm::prelude::Expr;
use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::DocStatus;
use crate::models::tender_items;
use crate::models::tender_suppliers;
use crate::models::tenders::{self, Tender, TenderStatus};
use crate::store::{StoreError, StoreResult, TenderFilter};

/// Fetch a tender with its items and invited suppliers.
pub async fn get_tender(db: &DatabaseConnection, id: Uuid) -> Result<Option<Tender>, DbErr> {
    let Some(header) = tenders::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let items = tender_items::Entity::find()
        .filter(tender_items::Column::TenderId.eq(id))
        .order_by_asc(tender_items::Column::Idx)
        .all(db)
        .await?;
    let invited_suppliers = tender_suppliers::Entity::find()
        .filter(tender_suppliers::Column::TenderId.eq(id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.supplier_id)
        .collect();

    Ok(Some(Tender {
        header,
        items,
        invited_suppliers,
    }))
}

/// List tenders matching `filter`, oldest first. Children are loaded in two batch queries.
pub async fn list_tenders(
    db: &DatabaseConnection,
    filter: TenderFilter,
) -> Result<Vec<Tender>, DbErr> {
    let mut query = tenders::Entity::find();

    match filter {
        TenderFilter::All => {}
        TenderFilter::Published => {
            query = query.filter(tenders::Column::PublishedOnWebsite.eq(true));
        }
        TenderFilter::VisibleToSupplier(supplier_id) => {
            let invited: Vec<Uuid> = tender_suppliers::Entity::find()
                .filter(tender_suppliers::Column::SupplierId.eq(supplier_id))
                .all(db)
                .await?
                .into_iter()
                .map(|row| row.tender_id)
                .collect();

            let mut visible = Condition::any().add(tenders::Column::PublishedOnWebsite.eq(true));
            if !invited.is_empty() {
                visible = visible.add(tenders::Column::Id.is_in(invited));
            }
            query = query.filter(visible);
        }
    }

    let headers = query
        .order_by_asc(tenders::Column::CreatedAt)
        .order_by_asc(tenders::Column::Id)
        .all(db)
        .await?;
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();
    let mut items: HashMap<Uuid, Vec<tender_items::Model>> = HashMap::new();
    for item in tender_items::Entity::find()
        .filter(tender_items::Column::TenderId.is_in(ids.clone()))
        .order_by_asc(tender_items::Column::Idx)
        .all(db)
        .await?
    {
        items.entry(item.tender_id).or_default().push(item);
    }

    let mut invites: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in tender_suppliers::Entity::find()
        .filter(tender_suppliers::Column::TenderId.is_in(ids))
        .all(db)
        .await?
    {
        invites.entry(row.tender_id).or_default().push(row.supplier_id);
    }

    Ok(headers
        .into_iter()
        .map(|header| Tender {
            items: items.remove(&header.id).unwrap_or_default(),
            invited_suppliers: invites.remove(&header.id).unwrap_or_default(),
            header,
        })
        .collect())
}

/// Insert or replace a tender and its children in one transaction.
///
/// The header row is locked for the duration, and an existing row keeps its stored
/// `status` and `doc_status`.
pub async fn save_tender(db: &DatabaseConnection, tender: Tender) -> Result<Tender, DbErr> {
    let txn = db.begin().await?;
    let Tender {
        mut header,
        items,
        invited_suppliers,
    } = tender;

    let existing = tenders::Entity::find_by_id(header.id)
        .lock_exclusive()
        .one(&txn)
        .await?;

    let header = match existing {
        Some(stored) => {
            header.status = stored.status;
            header.doc_status = stored.doc_status;
            header.into_active_model().reset_all().update(&txn).await?
        }
        None => header.into_active_model().reset_all().insert(&txn).await?,
    };

    tender_items::Entity::delete_many()
        .filter(tender_items::Column::TenderId.eq(header.id))
        .exec(&txn)
        .await?;
    let mut saved_items = Vec::with_capacity(items.len());
    for item in items {
        saved_items.push(item.into_active_model().reset_all().insert(&txn).await?);
    }

    tender_suppliers::Entity::delete_many()
        .filter(tender_suppliers::Column::TenderId.eq(header.id))
        .exec(&txn)
        .await?;
    for supplier_id in &invited_suppliers {
        tender_suppliers::ActiveModel {
            tender_id: Set(header.id),
            supplier_id: Set(*supplier_id),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    Ok(Tender {
        header,
        items: saved_items,
        invited_suppliers,
    })
}

/// Delete a tender by ID. Items, invitations, bids and queries cascade.
pub async fn delete_tender(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    tenders::Entity::delete_by_id(id).exec(db).await
}

/// Set `status` to `next` only if it is still `expected`.
pub async fn set_tender_status(
    db: &DatabaseConnection,
    id: Uuid,
    expected: TenderStatus,
    next: TenderStatus,
) -> StoreResult<()> {
    let result = tenders::Entity::update_many()
        .col_expr(tenders::Column::Status, Expr::value(next))
        .filter(tenders::Column::Id.eq(id))
        .filter(tenders::Column::Status.eq(expected))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(missing_or_conflict(db, id, "status changed concurrently").await);
    }
    Ok(())
}

/// Set `doc_status` to `next` only if it is still `expected`.
pub async fn set_tender_doc_status(
    db: &DatabaseConnection,
    id: Uuid,
    expected: DocStatus,
    next: DocStatus,
) -> StoreResult<()> {
    let result = tenders::Entity::update_many()
        .col_expr(tenders::Column::DocStatus, Expr::value(next))
        .col_expr(tenders::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(tenders::Column::Id.eq(id))
        .filter(tenders::Column::DocStatus.eq(expected))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(missing_or_conflict(db, id, "was modified concurrently").await);
    }
    Ok(())
}

async fn missing_or_conflict(db: &DatabaseConnection, id: Uuid, what: &str) -> StoreError {
    match tenders::Entity::find_by_id(id).one(db).await {
        Ok(Some(_)) => StoreError::Conflict(format!("Tender {id} {what}")),
        Ok(None) => StoreError::NotFound(format!("Tender {id} not found")),
        Err(e) => StoreError::Database(e),
    }
}
