use actix_web::FromRequest;
use actix_web::{Error, HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt;
use crate::db::users::find_or_create_from_auth;
use crate::models::users::{self, CreateUserFromAuth, Roles};

/// Wrapper type to store the JWT secret in Actix app data.
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// A request whose bearer token resolved to a persisted user. Handlers take
/// this where authentication is mandatory; missing or bad tokens become 401.
pub struct AuthenticatedUser(pub users::Model);

/// An optionally authenticated request. Read endpoints take this so that
/// anonymous callers get a narrowed result set instead of an error.
pub struct MaybeUser(pub Option<users::Model>);

impl MaybeUser {
    pub fn id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|u| u.id)
    }
}

async fn resolve_user(req: &HttpRequest) -> Result<users::Model, Error> {
    // 1. Extract the Bearer token from the Authorization header.
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| actix_web::error::ErrorUnauthorized("Missing Authorization header"))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        actix_web::error::ErrorUnauthorized("Authorization header must be: Bearer <token>")
    })?;

    // 2. Validate the JWT against the shared secret.
    let secret = req
        .app_data::<web::Data<JwtSecret>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("JWT secret not configured"))?;

    let claims = jwt::validate_token(token, &secret.0)
        .map_err(|e| actix_web::error::ErrorUnauthorized(format!("Invalid token: {e}")))?;

    // 3. Extract user info from claims.
    let user_id = claims
        .user_id()
        .map_err(actix_web::error::ErrorUnauthorized)?;

    let email = claims
        .email
        .clone()
        .ok_or_else(|| actix_web::error::ErrorUnauthorized("No email in token claims"))?;

    // 4. Get the database connection.
    let db = req
        .app_data::<web::Data<DatabaseConnection>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Database not configured"))?;

    // 5. Find or create the user.
    let user = find_or_create_from_auth(
        db.get_ref(),
        CreateUserFromAuth {
            id: user_id,
            email,
            display_name: claims.display_name(),
            auth_provider: "pikxora-auth".to_string(),
            role: Roles::Artist, // default role until the profile is completed
        },
    )
    .await
    .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Database error: {e}")))?;

    Ok(user)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { resolve_user(&req).await.map(AuthenticatedUser) })
    }
}

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            // A missing or invalid token narrows visibility rather than
            // failing the read.
            match resolve_user(&req).await {
                Ok(user) => Ok(MaybeUser(Some(user))),
                Err(_) => Ok(MaybeUser(None)),
            }
        })
    }
}
