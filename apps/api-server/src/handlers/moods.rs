//! Mood journal handlers.

use actix_web::{HttpResponse, web};

use moodlog_core::services::MoodDraft;
use moodlog_shared::dto::{MoodRequest, MoodResponse};
use moodlog_shared::{ApiResponse, MessageResponse};

use super::{convert, parse_date};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/moods
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<MoodRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let draft = MoodDraft {
        title: req.title,
        description: req.description,
        emoji: req.emoji,
        tag_ids: req.tag_ids,
        category_ids: req.category_ids,
    };
    let view = state.moods.create(identity.caller(), draft).await?;

    Ok(HttpResponse::Created().json(convert::mood(view)))
}

/// GET /api/moods
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let moods: Vec<MoodResponse> = state
        .moods
        .list(identity.caller())
        .await?
        .into_iter()
        .map(convert::mood)
        .collect();

    Ok(HttpResponse::Ok().json(moods))
}

/// GET /api/moods/date/{date}
pub async fn on_date(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let day = parse_date(&path)?;
    let moods: Vec<MoodResponse> = state
        .moods
        .on_date(identity.caller(), day)
        .await?
        .into_iter()
        .map(convert::mood)
        .collect();

    Ok(HttpResponse::Ok().json(moods))
}

/// GET /api/moods/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let view = state.moods.get(identity.caller(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(convert::mood(view)))
}

/// DELETE /api/moods/{id} - soft delete.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .moods
        .delete(identity.caller(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Mood deleted")))
}

/// POST /api/moods/{id}/categories/{category_id}
pub async fn link_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (mood_id, category_id) = path.into_inner();
    let view = state
        .moods
        .link_category(identity.caller(), mood_id, category_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        convert::mood(view),
        "Category linked to mood",
    )))
}

/// DELETE /api/moods/{id}/categories/{category_id}
pub async fn unlink_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (mood_id, category_id) = path.into_inner();
    state
        .moods
        .unlink_category(identity.caller(), mood_id, category_id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Category removed from mood")))
}

/// POST /api/moods/{id}/tags/{tag_id}
pub async fn link_tag(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (mood_id, tag_id) = path.into_inner();
    let view = state
        .moods
        .link_tag(identity.caller(), mood_id, tag_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        convert::mood(view),
        "Tag linked to mood",
    )))
}

/// DELETE /api/moods/{id}/tags/{tag_id}
pub async fn unlink_tag(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (mood_id, tag_id) = path.into_inner();
    state
        .moods
        .unlink_tag(identity.caller(), mood_id, tag_id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Tag removed from mood")))
}
