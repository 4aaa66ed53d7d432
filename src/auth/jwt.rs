use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by Pikxora bearer tokens.
///
/// The identity provider signs HS256 tokens whose `sub` is the user's UUID.
/// Profile fields are best-effort: the backend keeps its own user row and
/// only reads these on first sight of a token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The auth user UUID.
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: Option<usize>,
    /// Issuer.
    pub iss: Option<String>,
    /// User's email.
    pub email: Option<String>,
    /// Display name from the provider, if any.
    pub name: Option<String>,
}

impl Claims {
    /// Extract the user UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    pub fn display_name(&self) -> Option<String> {
        self.name.clone()
    }
}

/// Validate an HS256 JWT against the shared secret and return its claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|td| td.claims)
    .map_err(|e| format!("Token validation failed: {e:?}"))
}
