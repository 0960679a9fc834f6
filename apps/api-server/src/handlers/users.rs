//! The caller's own account.

use actix_web::{HttpResponse, web};

use moodlog_shared::MessageResponse;
use moodlog_shared::dto::{AppPasswordRequest, UpdateUserRequest};

use super::convert;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/user
pub async fn profile(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.accounts.profile(identity.caller()).await?;

    Ok(HttpResponse::Ok().json(convert::user(user)))
}

/// PUT /api/user
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .accounts
        .rename(identity.caller(), &body.username)
        .await?;

    Ok(HttpResponse::Ok().json(convert::user(user)))
}

/// DELETE /api/user - requires the app password.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<AppPasswordRequest>,
) -> AppResult<HttpResponse> {
    state
        .accounts
        .delete_account(identity.caller(), &body.app_password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Account deleted")))
}
