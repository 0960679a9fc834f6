//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod convert;
mod foods;
mod health;
mod moods;
mod tags;
mod users;

use actix_web::web;
use chrono::NaiveDate;

use crate::middleware::error::{self, AppError};

/// Parse a `YYYY-MM-DD` path segment.
fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error))
        .app_data(web::PathConfig::default().error_handler(error::path_error))
        .app_data(web::QueryConfig::default().error_handler(error::query_error))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/set-app-password", web::post().to(auth::set_app_password))
                        .route(
                            "/verify-app-password",
                            web::post().to(auth::verify_app_password),
                        )
                        .route(
                            "/check-app-password",
                            web::get().to(auth::check_app_password),
                        ),
                )
                .service(
                    web::resource("/user")
                        .route(web::get().to(users::profile))
                        .route(web::put().to(users::update))
                        .route(web::delete().to(users::delete)),
                )
                .service(
                    web::scope("/categories")
                        .route("", web::post().to(categories::create))
                        .route("", web::get().to(categories::list))
                        .route("/{id}", web::get().to(categories::get))
                        .route("/{id}", web::put().to(categories::update))
                        .route("/{id}", web::delete().to(categories::delete)),
                )
                .service(
                    web::scope("/tags")
                        .route("", web::post().to(tags::create))
                        .route("", web::get().to(tags::list))
                        .route("/{id}", web::get().to(tags::get))
                        .route("/{id}", web::put().to(tags::update))
                        .route("/{id}", web::delete().to(tags::delete)),
                )
                .service(
                    web::scope("/moods")
                        .route("", web::post().to(moods::create))
                        .route("", web::get().to(moods::list))
                        .route("/date/{date}", web::get().to(moods::on_date))
                        .route("/{id}", web::get().to(moods::get))
                        .route("/{id}", web::delete().to(moods::delete))
                        .route(
                            "/{id}/categories/{category_id}",
                            web::post().to(moods::link_category),
                        )
                        .route(
                            "/{id}/categories/{category_id}",
                            web::delete().to(moods::unlink_category),
                        )
                        .route("/{id}/tags/{tag_id}", web::post().to(moods::link_tag))
                        .route("/{id}/tags/{tag_id}", web::delete().to(moods::unlink_tag)),
                )
                .service(
                    web::scope("/foods")
                        .route("", web::post().to(foods::create))
                        .route("", web::get().to(foods::list))
                        .route("/multiple", web::post().to(foods::create_many))
                        .route("/date/{date}", web::get().to(foods::entries_on_date))
                        .route("/{id}", web::get().to(foods::get))
                        .route("/{id}", web::put().to(foods::update))
                        .route("/{id}", web::delete().to(foods::delete))
                        .route(
                            "/{id}/categories/{category_id}",
                            web::post().to(foods::link_category),
                        )
                        .route(
                            "/{id}/categories/{category_id}",
                            web::delete().to(foods::unlink_category),
                        )
                        .route("/{id}/entries", web::post().to(foods::log_entry)),
                ),
        );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, middleware::from_fn, test, web};
    use serde_json::{Value, json};

    use moodlog_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

    use super::*;
    use crate::middleware::request_id::request_id;
    use crate::state::AppState;

    fn state() -> web::Data<AppState> {
        let passwords = Arc::new(Argon2PasswordService::with_params(1024, 1, 1).unwrap());
        let tokens = Arc::new(JwtTokenService::new(JwtConfig::default()));
        web::Data::new(AppState::in_memory(passwords, tokens))
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {token}"))
    }

    /// Register `username` and return its token.
    macro_rules! register {
        ($app:expr, $username:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(json!({"username": $username, "password": "pw1"}))
                .to_request();
            let resp = test::call_service(&$app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            body["token"].as_str().unwrap().to_string()
        }};
    }

    #[actix_web::test]
    async fn test_register_login_and_category_ownership() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"username": "alice", "password": "pw1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["expires_in"], 86400);
        let alice = body["token"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": "alice", "password": "wrong"}))
            .to_request();
        let wrong_password = test::call_service(&app, req).await;
        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        let wrong_password: Value = test::read_body_json(wrong_password).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": "nobody", "password": "pw1"}))
            .to_request();
        let unknown_user = test::call_service(&app, req).await;
        assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
        let unknown_user: Value = test::read_body_json(unknown_user).await;
        assert_eq!(wrong_password, unknown_user);

        let create = |token: &str| {
            test::TestRequest::post()
                .uri("/api/categories")
                .insert_header(bearer(token))
                .set_json(json!({"name": "Breakfast"}))
                .to_request()
        };

        let resp = test::call_service(&app, create(&alice)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let breakfast: Value = test::read_body_json(resp).await;

        let resp = test::call_service(&app, create(&alice)).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let bob = register!(app, "bob");
        let resp = test::call_service(&app, create(&bob)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get()
            .uri(&format!("/api/categories/{}", breakfast["id"]))
            .insert_header(bearer(&bob))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_rejects_missing_and_invalid_tokens() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/api/categories").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Authentication Required");

        let req = test::TestRequest::get()
            .uri("/api/categories")
            .insert_header(bearer("not-a-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Invalid Token");
    }

    #[actix_web::test]
    async fn test_malformed_input_is_bad_request() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;
        let token = register!(app, "alice");

        let req = test::TestRequest::get()
            .uri("/api/categories/abc")
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"name\":")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(bearer(&token))
            .set_json(json!({"name": "   "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/api/moods/date/yesterday")
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_food_create_is_idempotent_by_name() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;
        let token = register!(app, "alice");

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(bearer(&token))
            .set_json(json!({"name": "Fruit"}))
            .to_request();
        let fruit: Value = test::call_and_read_body_json(&app, req).await;

        let create = || {
            test::TestRequest::post()
                .uri("/api/foods")
                .insert_header(bearer(&token))
                .set_json(json!({"name": "Apple", "calories": 95, "category_id": fruit["id"]}))
                .to_request()
        };

        let first = test::call_service(&app, create()).await;
        assert_eq!(first.status(), StatusCode::CREATED);
        let first: Value = test::read_body_json(first).await;
        assert_eq!(first["categories"][0]["name"], "Fruit");

        let second = test::call_service(&app, create()).await;
        assert_eq!(second.status(), StatusCode::OK);
        let second: Value = test::read_body_json(second).await;
        assert_eq!(first["id"], second["id"]);
    }

    #[actix_web::test]
    async fn test_mood_links_and_soft_delete() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;
        let token = register!(app, "alice");

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(bearer(&token))
            .set_json(json!({"name": "Work"}))
            .to_request();
        let work: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/moods")
            .insert_header(bearer(&token))
            .set_json(json!({"title": "Busy", "description": "deadline", "emoji": "😤"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let mood: Value = test::read_body_json(resp).await;

        let link_uri = format!("/api/moods/{}/categories/{}", mood["id"], work["id"]);
        let link = || {
            test::TestRequest::post()
                .uri(&link_uri)
                .insert_header(bearer(&token))
                .to_request()
        };
        let unlink = || {
            test::TestRequest::delete()
                .uri(&link_uri)
                .insert_header(bearer(&token))
                .to_request()
        };

        let resp = test::call_service(&app, link()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["categories"][0]["name"], "Work");

        assert_eq!(test::call_service(&app, link()).await.status(), StatusCode::CONFLICT);
        assert_eq!(test::call_service(&app, unlink()).await.status(), StatusCode::OK);
        assert_eq!(test::call_service(&app, unlink()).await.status(), StatusCode::NOT_FOUND);

        let mood_uri = format!("/api/moods/{}", mood["id"]);
        let req = test::TestRequest::delete()
            .uri(&mood_uri)
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/moods")
            .insert_header(bearer(&token))
            .to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed, json!([]));

        let req = test::TestRequest::get()
            .uri(&mood_uri)
            .insert_header(bearer(&token))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert!(fetched["deleted_at"].is_string());
    }

    #[actix_web::test]
    async fn test_account_deletion_requires_app_password() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;
        let token = register!(app, "alice");

        let delete = |app_password: &str| {
            test::TestRequest::delete()
                .uri("/api/user")
                .insert_header(bearer(&token))
                .set_json(json!({"app_password": app_password}))
                .to_request()
        };

        let resp = test::call_service(&app, delete("1234")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "App Password Not Set");

        let req = test::TestRequest::post()
            .uri("/api/auth/set-app-password")
            .insert_header(bearer(&token))
            .set_json(json!({"app_password": "1234"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/auth/check-app-password")
            .insert_header(bearer(&token))
            .to_request();
        let status: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status, json!({"is_set": true}));

        let resp = test::call_service(&app, delete("0000")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Unauthorized");

        assert_eq!(test::call_service(&app, delete("1234")).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": "alice", "password": "pw1"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn test_health_is_public_and_tagged_with_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(request_id))
                .app_data(state())
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/health")
            .insert_header(("X-Request-ID", "trace-me"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-me");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
    }
}
