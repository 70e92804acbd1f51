use actix_web::{HttpResponse, web};

use super::EngineData;
use crate::clock::Clock;
use crate::error::EngineError;
use crate::store::TenderStore;

/// GET /api/categories/{name}/item-groups: item groups an RFQ category allows.
pub async fn get_item_groups<S: TenderStore, C: Clock>(
    engine: EngineData<S, C>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    let groups = engine.category_item_groups(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(groups))
}
