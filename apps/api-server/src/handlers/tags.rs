//! Tag handlers.

use actix_web::{HttpResponse, web};

use moodlog_shared::MessageResponse;
use moodlog_shared::dto::{TagListQuery, TagRequest, TagResponse};

use super::convert;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/tags
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<TagRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let tag = state
        .tags
        .create(identity.caller(), &req.name, req.is_public)
        .await?;

    Ok(HttpResponse::Created().json(convert::tag(tag)))
}

/// GET /api/tags?include_public=true
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<TagListQuery>,
) -> AppResult<HttpResponse> {
    let tags: Vec<TagResponse> = state
        .tags
        .list(identity.caller(), query.include_public)
        .await?
        .into_iter()
        .map(convert::tag)
        .collect();

    Ok(HttpResponse::Ok().json(tags))
}

/// GET /api/tags/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let tag = state.tags.get(identity.caller(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(convert::tag(tag)))
}

/// PUT /api/tags/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<TagRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let tag = state
        .tags
        .update(identity.caller(), path.into_inner(), &req.name, req.is_public)
        .await?;

    Ok(HttpResponse::Ok().json(convert::tag(tag)))
}

/// DELETE /api/tags/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .tags
        .delete(identity.caller(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Tag deleted")))
}
