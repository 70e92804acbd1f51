use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::users::{CreateUserFromAuth, Roles};

/// Portal JWT claims.
///
/// Tokens are issued by the identity provider the portal trusts and signed with HS256
/// using the shared `JWT_SECRET`. The `sub` field is the portal user's UUID.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The portal user UUID.
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: Option<usize>,
    pub email: Option<String>,
    pub name: Option<String>,
    /// Portal role: "supplier", "procurement" or "admin". Only used when the user is
    /// first seen; afterwards the stored role wins.
    pub role: Option<String>,
}

impl Claims {
    /// Extract the user UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    /// Role requested by the token, defaulting to supplier.
    pub fn portal_role(&self) -> Roles {
        match self.role.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("procurement") => Roles::Procurement,
            Some("admin") => Roles::Admin,
            _ => Roles::Supplier,
        }
    }

    /// The user record to look up or create for this token.
    pub fn identity(&self) -> Result<CreateUserFromAuth, String> {
        let id = self.user_id()?;
        let email = self
            .email
            .clone()
            .filter(|e| !e.trim().is_empty())
            .ok_or("No email in token claims")?;

        Ok(CreateUserFromAuth {
            id,
            email,
            display_name: self.name.clone(),
            role: self.portal_role(),
        })
    }
}

/// Validate an HS256 JWT and return the decoded claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| format!("Token validation failed: {e}"))
}
