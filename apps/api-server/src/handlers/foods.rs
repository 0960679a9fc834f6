//! Food handlers, including the consumption log.

use actix_web::{HttpResponse, web};

use moodlog_core::services::FoodDraft;
use moodlog_shared::dto::{
    BulkFoodRequest, FoodEntryRequest, FoodEntryResponse, FoodListQuery, FoodRequest,
    FoodResponse, UpdateFoodRequest,
};
use moodlog_shared::{ApiResponse, MessageResponse};

use super::{convert, parse_date};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn draft(req: FoodRequest) -> FoodDraft {
    FoodDraft {
        name: req.name,
        calories: req.calories,
        category_id: req.category_id,
    }
}

/// POST /api/foods - 201 for a new food, 200 when the name already exists.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<FoodRequest>,
) -> AppResult<HttpResponse> {
    let (view, created) = state
        .foods
        .create(identity.caller(), draft(body.into_inner()))
        .await?;

    let mut response = if created {
        HttpResponse::Created()
    } else {
        HttpResponse::Ok()
    };
    Ok(response.json(convert::food(view)))
}

/// POST /api/foods/multiple
pub async fn create_many(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<BulkFoodRequest>,
) -> AppResult<HttpResponse> {
    let drafts = body.into_inner().foods.into_iter().map(draft).collect();
    let foods: Vec<FoodResponse> = state
        .foods
        .create_many(identity.caller(), drafts)
        .await?
        .into_iter()
        .map(convert::food)
        .collect();

    Ok(HttpResponse::Created().json(foods))
}

/// GET /api/foods?category_id=
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<FoodListQuery>,
) -> AppResult<HttpResponse> {
    let foods: Vec<FoodResponse> = state
        .foods
        .list(identity.caller(), query.category_id)
        .await?
        .into_iter()
        .map(convert::food)
        .collect();

    Ok(HttpResponse::Ok().json(foods))
}

/// GET /api/foods/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let view = state.foods.get(identity.caller(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(convert::food(view)))
}

/// PUT /api/foods/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<UpdateFoodRequest>,
) -> AppResult<HttpResponse> {
    let view = state
        .foods
        .update(identity.caller(), path.into_inner(), &body.name, body.calories)
        .await?;

    Ok(HttpResponse::Ok().json(convert::food(view)))
}

/// DELETE /api/foods/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .foods
        .delete(identity.caller(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Food deleted")))
}

/// POST /api/foods/{id}/categories/{category_id}
pub async fn link_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (food_id, category_id) = path.into_inner();
    let view = state
        .foods
        .link_category(identity.caller(), food_id, category_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        convert::food(view),
        "Category linked to food",
    )))
}

/// DELETE /api/foods/{id}/categories/{category_id}
pub async fn unlink_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (food_id, category_id) = path.into_inner();
    state
        .foods
        .unlink_category(identity.caller(), food_id, category_id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Category removed from food")))
}

/// POST /api/foods/{id}/entries
pub async fn log_entry(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<FoodEntryRequest>,
) -> AppResult<HttpResponse> {
    let view = state
        .foods
        .log_entry(identity.caller(), path.into_inner(), body.quantity)
        .await?;

    Ok(HttpResponse::Created().json(convert::entry(view)))
}

/// GET /api/foods/date/{date}
pub async fn entries_on_date(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let day = parse_date(&path)?;
    let entries: Vec<FoodEntryResponse> = state
        .foods
        .entries_on(identity.caller(), day)
        .await?
        .into_iter()
        .map(convert::entry)
        .collect();

    Ok(HttpResponse::Ok().json(entries))
}
