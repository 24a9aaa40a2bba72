use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::categories::{CategoryList, CategoryPayload, CategoryRequest},
    error::AppResult,
    middleware::auth::AdminUser,
    response::{ApiResponse, Empty},
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-category", post(create_category))
        .route("/update-category/{id}", put(update_category))
        .route("/get-category", get(list_categories))
        .route("/single-category/{slug}", get(single_category))
        .route("/delete-category/{id}", delete(delete_category))
}

#[utoipa::path(
    post,
    path = "/api/v1/category/create-category",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryPayload>),
        (status = 200, description = "Category already exists", body = ApiResponse<CategoryPayload>),
        (status = 401, description = "Name missing or caller is not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Category"
)]
pub async fn create_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<ApiResponse<CategoryPayload>> {
    category_service::create_category(&state, payload).await
}

#[utoipa::path(
    put,
    path = "/api/v1/category/update-category/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryPayload>),
    ),
    security(("bearer_auth" = [])),
    tag = "Category"
)]
pub async fn update_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<ApiResponse<CategoryPayload>> {
    category_service::update_category(&state, id, payload).await
}

#[utoipa::path(
    get,
    path = "/api/v1/category/get-category",
    responses(
        (status = 200, description = "All categories", body = ApiResponse<CategoryList>),
    ),
    tag = "Category"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<CategoryList>> {
    category_service::list_categories(&state).await
}

#[utoipa::path(
    get,
    path = "/api/v1/category/single-category/{slug}",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Single category", body = ApiResponse<CategoryPayload>),
    ),
    tag = "Category"
)]
pub async fn single_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<CategoryPayload>> {
    category_service::single_category(&state, &slug).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/category/delete-category/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<Empty>),
    ),
    security(("bearer_auth" = [])),
    tag = "Category"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Empty>> {
    category_service::delete_category(&state, id).await
}
