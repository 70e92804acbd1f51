use actix_web::HttpResponse;

use super::EngineData;
use crate::auth::middleware::AuthenticatedUser;
use crate::clock::Clock;
use crate::error::EngineError;
use crate::store::TenderStore;

/// GET /api/auth/me: the authenticated user's profile and linked supplier.
pub async fn me<S: TenderStore, C: Clock>(
    user: AuthenticatedUser,
    engine: EngineData<S, C>,
) -> Result<HttpResponse, EngineError> {
    let profile = engine.profile(user.0).await?;
    Ok(HttpResponse::Ok().json(profile))
}
