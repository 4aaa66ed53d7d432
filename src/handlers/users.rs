use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{RedisCache, keys};
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::users::UserResponse;

/// GET /api/users/{id} — public profile lookup (requires authentication).
pub async fn get_user(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let cache_key = keys::user(id);

    match cache.get::<UserResponse>(&cache_key).await {
        Ok(Some(cached)) => return Ok(HttpResponse::Ok().json(cached)),
        Ok(None) => {}
        Err(e) => tracing::warn!("cache error on {cache_key}: {e}"),
    }

    let user = user_db::get_user_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {id} not found")))?;

    let response = UserResponse::from(user);
    if let Err(e) = cache.set(&cache_key, &response, Some(900)).await {
        tracing::warn!("cache write failed on {cache_key}: {e}");
    }

    Ok(HttpResponse::Ok().json(response))
}
