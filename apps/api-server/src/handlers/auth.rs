//! Authentication handlers.

use actix_web::{HttpResponse, web};

use moodlog_shared::MessageResponse;
use moodlog_shared::dto::{AppPasswordRequest, AppPasswordStatus, LoginRequest, RegisterRequest};

use super::convert;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state.accounts.register(&req.username, &req.password).await?;

    Ok(HttpResponse::Ok().json(convert::auth(session)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state.accounts.login(&req.username, &req.password).await?;

    Ok(HttpResponse::Ok().json(convert::auth(session)))
}

/// POST /api/auth/set-app-password
pub async fn set_app_password(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<AppPasswordRequest>,
) -> AppResult<HttpResponse> {
    state
        .accounts
        .set_app_password(identity.caller(), &body.app_password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("App password set")))
}

/// POST /api/auth/verify-app-password
pub async fn verify_app_password(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<AppPasswordRequest>,
) -> AppResult<HttpResponse> {
    state
        .accounts
        .verify_app_password(identity.caller(), &body.app_password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("App password verified")))
}

/// GET /api/auth/check-app-password
pub async fn check_app_password(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let is_set = state.accounts.has_app_password(identity.caller()).await?;

    Ok(HttpResponse::Ok().json(AppPasswordStatus { is_set }))
}
