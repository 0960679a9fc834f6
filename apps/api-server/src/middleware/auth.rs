//! Authentication extractor.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::header, web};

use moodlog_core::Caller;
use moodlog_core::ports::AuthError;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated caller extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.caller().user_id())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Identity(Caller);

impl Identity {
    pub fn caller(&self) -> &Caller {
        &self.0
    }
}

fn resolve(req: &HttpRequest) -> Result<Caller, AppError> {
    // Resolved once per request; later extractors reuse it.
    if let Some(caller) = req.extensions().get::<Caller>() {
        return Ok(*caller);
    }

    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AppError::Internal("Server configuration error".to_string()));
    };

    let header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            AuthError::InvalidToken("Invalid authorization header".to_string())
        })?),
        None => None,
    };

    let caller = state.resolver.resolve(header).inspect_err(|e| {
        tracing::debug!(error = %e, "Rejected credentials");
    })?;
    req.extensions_mut().insert(caller);
    Ok(caller)
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req).map(Identity))
    }
}
