use actix_web::{HttpResponse, web};

use super::{EngineData, viewer_for};
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::ViewerCache;
use crate::clock::Clock;
use crate::error::EngineError;
use crate::models::suppliers::RegisterVendor;
use crate::store::TenderStore;

/// POST /api/vendors/register: link a new supplier company to the caller.
pub async fn register<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    body: web::Json<RegisterVendor>,
) -> Result<HttpResponse, EngineError> {
    let identity = user.0;
    let user_id = identity.id;
    let email = identity.email.clone();

    let viewer = viewer_for(&engine, &cache, Some(identity)).await?;
    let supplier = engine
        .register_vendor(&viewer, &email, body.into_inner())
        .await?;
    cache.invalidate(&user_id).await;

    Ok(HttpResponse::Created().json(supplier))
}
