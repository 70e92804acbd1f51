use actix_web::{HttpResponse, web};
use uuid::Uuid;

use super::{EngineData, viewer_for};
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::ViewerCache;
use crate::clock::Clock;
use crate::error::EngineError;
use crate::models::rfq_queries::{CreateQuery, UpdateQuery};
use crate::store::TenderStore;

/// GET /api/tenders/{id}/queries: own queries for suppliers, all for procurement.
pub async fn get_tender_queries<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let queries = engine.tender_queries(&viewer, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(queries))
}

/// POST /api/tenders/{id}/queries
pub async fn ask_query<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
    body: web::Json<CreateQuery>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let query = engine
        .ask_query(&viewer, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(query))
}

/// PUT /api/queries/{id}: answer a query or change its status.
pub async fn answer_query<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
    cache: web::Data<ViewerCache>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateQuery>,
) -> Result<HttpResponse, EngineError> {
    let viewer = viewer_for(&engine, &cache, Some(user.0)).await?;
    let query = engine
        .answer_query(&viewer, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(query))
}
