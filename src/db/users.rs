use sea_orm::*;
use uuid::Uuid;

use crate::models::suppliers;
use crate::models::users::{self, CreateUserFromAuth};
use crate::store::{StoreError, StoreResult};

/// Find a portal user by the JWT subject, creating it on first login.
pub async fn find_or_create_from_auth(
    db: &DatabaseConnection,
    input: CreateUserFromAuth,
) -> Result<users::Model, DbErr> {
    if let Some(existing) = users::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    let new_user = users::ActiveModel {
        id: Set(input.id),
        email: Set(input.email),
        display_name: Set(input.display_name),
        role: Set(input.role),
        created_at: Set(chrono::Utc::now()),
    };

    new_user.insert(db).await
}

/// The supplier linked to a portal user, if any.
pub async fn get_supplier_by_user_id(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<suppliers::Model>, DbErr> {
    suppliers::Entity::find()
        .filter(suppliers::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Insert a supplier unless the user or the email is already registered.
pub async fn insert_supplier(
    db: &DatabaseConnection,
    supplier: suppliers::Model,
) -> StoreResult<suppliers::Model> {
    let taken = suppliers::Entity::find()
        .filter(
            Condition::any()
                .add(suppliers::Column::UserId.eq(supplier.user_id))
                .add(suppliers::Column::Email.eq(supplier.email.clone())),
        )
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(StoreError::Conflict("Email already registered".to_string()));
    }

    let new_supplier = suppliers::ActiveModel {
        id: Set(supplier.id),
        user_id: Set(supplier.user_id),
        supplier_name: Set(supplier.supplier_name),
        contact_person: Set(supplier.contact_person),
        email: Set(supplier.email),
        phone: Set(supplier.phone),
        tax_id: Set(supplier.tax_id),
        created_at: Set(supplier.created_at),
    };

    Ok(new_supplier.insert(db).await?)
}
