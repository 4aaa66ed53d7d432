use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{RedisCache, keys};
use crate::db::users;
use crate::error::ApiError;
use crate::models::users::{CompleteProfile, UserResponse};

/// GET /api/auth/me — return the currently authenticated user's profile.
pub async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse::from(user.0))
}

/// POST /api/auth/complete-profile — set username, role, display_name after first login.
pub async fn complete_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<CompleteProfile>,
) -> Result<HttpResponse, ApiError> {
    let updated = users::complete_profile(db.get_ref(), user.0.id, body.into_inner()).await?;

    // The profile read caches under this key; a stale entry would keep
    // serving the old role.
    if let Err(e) = cache.delete(&keys::user(updated.id)).await {
        tracing::warn!("cache invalidation failed for user {}: {e}", updated.id);
    }

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}
