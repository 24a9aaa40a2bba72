use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        payment::PaymentRequest,
        products::{
            CategoryProducts, ProductCount, ProductFilters, ProductForm, ProductList, Products,
            SavedProduct, SingleProduct,
        },
    },
    error::AppResult,
    gateway::ClientToken,
    middleware::auth::{AdminUser, AuthUser},
    models::Product,
    response::{ApiResponse, Empty, OkFlag},
    services::{payment_service, product_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-product", post(create_product))
        .route("/update-product/{pid}", put(update_product))
        .route("/get-product", get(list_products))
        .route("/get-product/{slug}", get(single_product))
        .route("/product-photo/{pid}", get(product_photo))
        .route("/delete-product/{pid}", delete(delete_product))
        .route("/product-filters", post(filter_products))
        .route("/product-count", get(product_count))
        .route("/product-list/{page}", get(product_page))
        .route("/search/{keyword}", get(search_products))
        .route("/related-product/{pid}/{cid}", get(related_products))
        .route("/product-category/{slug}", get(products_by_category))
        .route("/braintree/token", get(braintree_token))
        .route("/braintree/payment", post(braintree_payment))
}

#[utoipa::path(
    post,
    path = "/api/v1/product/create-product",
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = ApiResponse<SavedProduct>),
        (status = 400, description = "A field is missing or the photo is too large"),
    ),
    security(("bearer_auth" = [])),
    tag = "Product"
)]
pub async fn create_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    multipart: Multipart,
) -> AppResult<ApiResponse<SavedProduct>> {
    let form = ProductForm::from_multipart(multipart).await?;
    product_service::create_product(&state, form).await
}

#[utoipa::path(
    put,
    path = "/api/v1/product/update-product/{pid}",
    params(("pid" = Uuid, Path, description = "Product ID")),
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product updated", body = ApiResponse<SavedProduct>),
        (status = 400, description = "A field is missing or the photo is too large"),
    ),
    security(("bearer_auth" = [])),
    tag = "Product"
)]
pub async fn update_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(pid): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<ApiResponse<SavedProduct>> {
    let form = ProductForm::from_multipart(multipart).await?;
    product_service::update_product(&state, pid, form).await
}

#[utoipa::path(
    get,
    path = "/api/v1/product/get-product",
    responses(
        (status = 200, description = "Latest products", body = ApiResponse<ProductList>),
    ),
    tag = "Product"
)]
pub async fn list_products(State(state): State<AppState>) -> AppResult<ApiResponse<ProductList>> {
    product_service::list_products(&state).await
}

#[utoipa::path(
    get,
    path = "/api/v1/product/get-product/{slug}",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Single product", body = ApiResponse<SingleProduct>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Product"
)]
pub async fn single_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<SingleProduct>> {
    product_service::single_product(&state, &slug).await
}

#[utoipa::path(
    get,
    path = "/api/v1/product/product-photo/{pid}",
    params(("pid" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Photo bytes with their stored content type"),
        (status = 404, description = "No photo stored"),
    ),
    tag = "Product"
)]
pub async fn product_photo(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> AppResult<Response> {
    let photo = product_service::product_photo(&state, pid).await?;
    Ok(([(header::CONTENT_TYPE, photo.content_type)], photo.data).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/v1/product/delete-product/{pid}",
    params(("pid" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<Empty>),
    ),
    security(("bearer_auth" = [])),
    tag = "Product"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(pid): Path<Uuid>,
) -> AppResult<ApiResponse<Empty>> {
    product_service::delete_product(&state, pid).await
}

#[utoipa::path(
    post,
    path = "/api/v1/product/product-filters",
    request_body = ProductFilters,
    responses(
        (status = 200, description = "Filtered products", body = ApiResponse<Products>),
    ),
    tag = "Product"
)]
pub async fn filter_products(
    State(state): State<AppState>,
    Json(filters): Json<ProductFilters>,
) -> AppResult<ApiResponse<Products>> {
    product_service::filter_products(&state, filters).await
}

#[utoipa::path(
    get,
    path = "/api/v1/product/product-count",
    responses(
        (status = 200, description = "Number of products", body = ApiResponse<ProductCount>),
    ),
    tag = "Product"
)]
pub async fn product_count(State(state): State<AppState>) -> AppResult<ApiResponse<ProductCount>> {
    product_service::product_count(&state).await
}

#[utoipa::path(
    get,
    path = "/api/v1/product/product-list/{page}",
    params(("page" = u64, Path, description = "Page number, 1-based")),
    responses(
        (status = 200, description = "One page of products", body = ApiResponse<Products>),
    ),
    tag = "Product"
)]
pub async fn product_page(
    State(state): State<AppState>,
    Path(page): Path<u64>,
) -> AppResult<ApiResponse<Products>> {
    product_service::product_page(&state, page).await
}

#[utoipa::path(
    get,
    path = "/api/v1/product/search/{keyword}",
    params(("keyword" = String, Path, description = "Text matched against name and description")),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
    ),
    tag = "Product"
)]
pub async fn search_products(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product_service::search_products(&state, &keyword).await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/v1/product/related-product/{pid}/{cid}",
    params(
        ("pid" = Uuid, Path, description = "Product to exclude"),
        ("cid" = Uuid, Path, description = "Category ID"),
    ),
    responses(
        (status = 200, description = "Related products", body = ApiResponse<Products>),
    ),
    tag = "Product"
)]
pub async fn related_products(
    State(state): State<AppState>,
    Path((pid, cid)): Path<(Uuid, Uuid)>,
) -> AppResult<ApiResponse<Products>> {
    product_service::related_products(&state, pid, cid).await
}

#[utoipa::path(
    get,
    path = "/api/v1/product/product-category/{slug}",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category with its products", body = ApiResponse<CategoryProducts>),
        (status = 404, description = "Category not found"),
    ),
    tag = "Product"
)]
pub async fn products_by_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<CategoryProducts>> {
    product_service::products_by_category(&state, &slug).await
}

#[utoipa::path(
    get,
    path = "/api/v1/product/braintree/token",
    responses(
        (status = 200, description = "Client token for the drop-in", body = ClientToken),
        (status = 500, description = "Gateway error"),
    ),
    tag = "Payment"
)]
pub async fn braintree_token(State(state): State<AppState>) -> AppResult<Json<ClientToken>> {
    let token = payment_service::client_token(&state).await?;
    Ok(Json(token))
}

#[utoipa::path(
    post,
    path = "/api/v1/product/braintree/payment",
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Payment captured and order recorded", body = OkFlag),
        (status = 400, description = "Cart is empty"),
        (status = 500, description = "Gateway error"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payment"
)]
pub async fn braintree_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PaymentRequest>,
) -> AppResult<Json<OkFlag>> {
    let ok = payment_service::checkout(&state, &user, payload).await?;
    Ok(Json(ok))
}
