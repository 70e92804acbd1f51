use actix_web::FromRequest;
use actix_web::{Error, HttpRequest, dev::Payload, web};
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt;
use crate::models::users::CreateUserFromAuth;

/// A request carrying a valid bearer token.
///
/// Holds the identity from the token; handlers turn it into a `Viewer` through the
/// engine so the linked supplier is always current.
pub struct AuthenticatedUser(pub CreateUserFromAuth);

/// Like [`AuthenticatedUser`], but a request without an `Authorization` header is let
/// through as anonymous. A header that is present and invalid is still rejected.
pub struct MaybeAuthenticated(pub Option<CreateUserFromAuth>);

/// Wrapper type to store the JWT secret in Actix app data.
#[derive(Clone)]
pub struct JwtSecret(pub String);

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let header = authorization_header(&req).ok_or_else(|| {
                actix_web::error::ErrorUnauthorized("Missing Authorization header")
            })?;
            Ok(AuthenticatedUser(identity_from_header(&req, header)?))
        })
    }
}

impl FromRequest for MaybeAuthenticated {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            match authorization_header(&req) {
                None => Ok(MaybeAuthenticated(None)),
                Some(header) => Ok(MaybeAuthenticated(Some(identity_from_header(&req, header)?))),
            }
        })
    }
}

fn authorization_header(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn identity_from_header(req: &HttpRequest, header: String) -> Result<CreateUserFromAuth, Error> {
    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        actix_web::error::ErrorUnauthorized("Authorization header must be: Bearer <token>")
    })?;

    let secret = req
        .app_data::<web::Data<JwtSecret>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("JWT secret not configured"))?;

    let claims = jwt::validate_token(token, &secret.0)
        .map_err(|e| actix_web::error::ErrorUnauthorized(format!("Invalid token: {e}")))?;

    claims.identity().map_err(actix_web::error::ErrorUnauthorized)
}
