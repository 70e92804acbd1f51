use actix_web::{HttpResponse, web};
use uuid::Uuid;

use super::{EngineData, viewer_for};
use crate::auth::middleware::{AuthenticatedUser, MaybeAuthenticated};
use crate::cache::ViewerCache;
use crate::clock::Clock;
use crate::error::EngineError;
use crate::models::tenders::{ReopenTender, SaveTender, TenderSummary};
use crate::store::TenderStore;

/// GET /api/tenders: tenders visible to the caller, without line items.
pub async fn list_tenders<S: TenderStore, C: Clock>(
    auth: MaybeAuthenticated,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, auth.0).await?;
    let tenders = engine.visible_tenders(&viewer).await?;
    let summaries: Vec<TenderSummary> = tenders.iter().map(TenderSummary::from).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

/// GET /api/tenders/{id}
pub async fn get_tender<S: TenderStore, C: Clock>(
    auth: MaybeAuthenticated,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, auth.0).await?;
    let tender = engine.tender_for(&viewer, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tender))
}

/// POST /api/tenders: create a draft tender.
pub async fn create_tender<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    body: web::Json<SaveTender>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let tender = engine.create_tender(&viewer, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(tender))
}

/// PUT /api/tenders/{id}: replace a draft tender's content.
pub async fn update_tender<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
    body: web::Json<SaveTender>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let tender = engine
        .update_tender(&viewer, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(tender))
}

/// DELETE /api/tenders/{id}
pub async fn delete_tender<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    engine.delete_tender(&viewer, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn submit_tender<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let tender = engine.submit_tender(&viewer, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tender))
}

pub async fn cancel_tender<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let tender = engine.cancel_tender(&viewer, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tender))
}

/// POST /api/tenders/{id}/reopen: body is optional and may carry a new deadline.
pub async fn reopen_tender<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReopenTender>>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let new_deadline = body.and_then(|b| b.into_inner().submission_deadline);
    let tender = engine
        .reopen_tender(&viewer, path.into_inner(), new_deadline)
        .await?;
    Ok(HttpResponse::Ok().json(tender))
}
