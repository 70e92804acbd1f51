use actix_web::{HttpResponse, web};
use uuid::Uuid;

use super::{EngineData, viewer_for};
use crate::auth::middleware::{AuthenticatedUser, MaybeAuthenticated};
use crate::cache::ViewerCache;
use crate::clock::Clock;
use crate::error::EngineError;
use crate::models::bids::CreateBid;
use crate::store::TenderStore;

/// GET /api/tenders/{id}/bid-floor: lowest bid and next allowed amount.
pub async fn bid_floor<S: TenderStore, C: Clock>(
    auth: MaybeAuthenticated,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, auth.0).await?;
    let floor = engine.bid_floor(&viewer, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(floor))
}

/// GET /api/tenders/{id}/bids: every bid on a tender (procurement).
pub async fn get_tender_bids<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let bids = engine.tender_bids(&viewer, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(bids))
}

/// POST /api/tenders/{id}/bids: create a draft bid for the caller's supplier.
pub async fn create_bid<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
    body: web::Json<CreateBid>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let bid = engine
        .create_bid(&viewer, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(bid))
}

/// GET /api/bids
pub async fn get_my_bids<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let bids = engine.my_bids(&viewer).await?;
    Ok(HttpResponse::Ok().json(bids))
}

/// GET /api/bids/{id}
pub async fn get_bid<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let bid = engine.bid_for(&viewer, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(bid))
}

/// POST /api/bids/{id}/submit: run admission and submit.
///
/// A rejected bid comes back as 400 with the admission message.
pub async fn submit_bid<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let bid = engine.submit_bid(&viewer, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(bid))
}

/// POST /api/bids/{id}/cancel
pub async fn cancel_bid<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let bid = engine.cancel_bid(&viewer, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(bid))
}
