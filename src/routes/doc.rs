use utoipa::{
    Modify, OpenApi,
    openapi::{
        self, OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            ForgotPasswordRequest, LoginPayload, LoginRequest, ProfilePayload, ProfileRequest,
            RegisterRequest, UserList, UserPayload,
        },
        categories::{CategoryList, CategoryPayload, CategoryRequest},
        orders::OrderStatusRequest,
        payment::{CartLine, PaymentRequest},
        products::{
            CategoryProducts, ProductCount, ProductFilters, ProductForm, ProductList, Products,
            SavedProduct, SingleProduct,
        },
    },
    gateway::ClientToken,
    models::{Buyer, Category, CategoryRef, Order, OrderRecord, OrderStatus, Product, User},
    response::{Empty, OkFlag},
    routes::{auth, categories, health, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        // The storefront sends the token as the bare Authorization value.
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        categories::create_category,
        categories::update_category,
        categories::list_categories,
        categories::single_category,
        categories::delete_category,
        products::create_product,
        products::update_product,
        products::list_products,
        products::single_product,
        products::product_photo,
        products::delete_product,
        products::filter_products,
        products::product_count,
        products::product_page,
        products::search_products,
        products::related_products,
        products::products_by_category,
        products::braintree_token,
        products::braintree_payment,
        auth::register,
        auth::login,
        auth::forgot_password,
        auth::user_auth,
        auth::admin_auth,
        auth::update_profile,
        auth::buyer_orders,
        auth::all_orders,
        auth::update_order_status,
        auth::all_users
    ),
    components(
        schemas(
            User,
            Category,
            CategoryRef,
            Product,
            Buyer,
            Order,
            OrderRecord,
            OrderStatus,
            ClientToken,
            Empty,
            OkFlag,
            RegisterRequest,
            LoginRequest,
            LoginPayload,
            ForgotPasswordRequest,
            ProfileRequest,
            ProfilePayload,
            UserPayload,
            UserList,
            CategoryRequest,
            CategoryPayload,
            CategoryList,
            ProductForm,
            ProductFilters,
            ProductList,
            SingleProduct,
            SavedProduct,
            Products,
            ProductCount,
            CategoryProducts,
            OrderStatusRequest,
            PaymentRequest,
            CartLine
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Category", description = "Category endpoints"),
        (name = "Product", description = "Product endpoints"),
        (name = "Payment", description = "Braintree token and checkout"),
        (name = "Auth", description = "Account and guard endpoints"),
        (name = "Orders", description = "Order history and status"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
