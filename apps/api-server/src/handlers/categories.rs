//! Category handlers.

use actix_web::{HttpResponse, web};

use moodlog_shared::MessageResponse;
use moodlog_shared::dto::{CategoryRequest, CategoryResponse};

use super::convert;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/categories
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .create(identity.caller(), &body.name)
        .await?;

    Ok(HttpResponse::Created().json(convert::category(category)))
}

/// GET /api/categories
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let categories: Vec<CategoryResponse> = state
        .categories
        .list(identity.caller())
        .await?
        .into_iter()
        .map(convert::category)
        .collect();

    Ok(HttpResponse::Ok().json(categories))
}

/// GET /api/categories/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .get(identity.caller(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(convert::category(category)))
}

/// PUT /api/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .rename(identity.caller(), path.into_inner(), &body.name)
        .await?;

    Ok(HttpResponse::Ok().json(convert::category(category)))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .categories
        .delete(identity.caller(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Category deleted")))
}
