use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        auth::{
            ForgotPasswordRequest, LoginPayload, LoginRequest, ProfilePayload, ProfileRequest,
            RegisterRequest, UserList, UserPayload,
        },
        orders::OrderStatusRequest,
    },
    error::AppResult,
    middleware::auth::{AdminUser, AuthUser},
    models::{Order, OrderRecord},
    response::{ApiResponse, Empty, OkFlag},
    services::{auth_service, order_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/user-auth", get(user_auth))
        .route("/admin-auth", get(admin_auth))
        .route("/profile", put(update_profile))
        .route("/orders", get(buyer_orders))
        .route("/all-orders", get(all_orders))
        .route("/order-status/{order_id}", put(update_order_status))
        .route("/all-users", get(all_users))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<UserPayload>),
        (status = 200, description = "Email already registered"),
        (status = 400, description = "A field is missing"),
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<ApiResponse<UserPayload>> {
    auth_service::register(&state, payload).await
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<LoginPayload>),
        (status = 404, description = "Unknown email or missing credentials"),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginPayload>> {
    auth_service::login(&state, payload).await
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = ApiResponse<Empty>),
        (status = 404, description = "Wrong email or answer"),
    ),
    tag = "Auth"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> AppResult<ApiResponse<Empty>> {
    auth_service::forgot_password(&state, payload).await
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/user-auth",
    responses(
        (status = 200, description = "Caller is signed in", body = OkFlag),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn user_auth(_user: AuthUser) -> Json<OkFlag> {
    Json(OkFlag::yes())
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/admin-auth",
    responses(
        (status = 200, description = "Caller is an admin", body = OkFlag),
        (status = 401, description = "Not signed in or not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn admin_auth(_admin: AdminUser) -> Json<OkFlag> {
    Json(OkFlag::yes())
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<ProfilePayload>),
        (status = 400, description = "Password too short"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ProfileRequest>,
) -> AppResult<ApiResponse<ProfilePayload>> {
    auth_service::update_profile(&state, &user, payload).await
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/orders",
    responses(
        (status = 200, description = "Caller's orders, newest first", body = Vec<Order>),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn buyer_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order_service::buyer_orders(&state, &user).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/all-orders",
    responses(
        (status = 200, description = "Every order, newest first", body = Vec<Order>),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn all_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order_service::all_orders(&state).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/order-status/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order ID")),
    request_body = OrderStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = OrderRecord),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<OrderStatusRequest>,
) -> AppResult<Json<OrderRecord>> {
    let order = order_service::update_status(&state, order_id, payload).await?;
    Ok(Json(order))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/all-users",
    responses(
        (status = 200, description = "All users", body = ApiResponse<UserList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn all_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<ApiResponse<UserList>> {
    auth_service::all_users(&state).await
}
