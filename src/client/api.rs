use reqwest::{Client, RequestBuilder, header::AUTHORIZATION};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    dto::{
        auth::{LoginRequest, ProfileRequest, RegisterRequest},
        orders::OrderStatusRequest,
        payment::{CartLine, PaymentRequest},
        products::ProductFilters,
    },
    gateway::ClientToken,
    models::{Category, Order, OrderRecord, Product, User},
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status or `success: false`.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    Url(String),
}

#[derive(Debug, Deserialize)]
struct CategoriesBody {
    category: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub struct ProductListBody {
    #[serde(rename = "countTotal")]
    pub count_total: usize,
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct ProductsBody {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct CountBody {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct UsersBody {
    data: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    user: User,
}

#[derive(Debug, Deserialize)]
struct ProfileBody {
    #[serde(rename = "updatedUser")]
    updated_user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginBody {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct OkBody {
    ok: bool,
}

/// Typed calls against the `/api/v1` routes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        // The server reads the bare token from the Authorization header.
        let request = match &self.token {
            Some(token) => request.header(AUTHORIZATION, token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body: Value = response.json().await?;

        let declined = body.get("success").and_then(Value::as_bool) == Some(false);
        if !status.is_success() || declined {
            let message = body
                .get("message")
                .or_else(|| body.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("request failed")
                .to_owned();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_value(body)?)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ClientError> {
        let body: UserBody = self
            .send(self.client.post(self.url("/auth/register")).json(request))
            .await?;
        Ok(body.user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginBody, ClientError> {
        let request = LoginRequest {
            email: Some(email.to_owned()),
            password: Some(password.to_owned()),
        };
        self.send(self.client.post(self.url("/auth/login")).json(&request))
            .await
    }

    pub async fn update_profile(&self, request: &ProfileRequest) -> Result<User, ClientError> {
        let body: ProfileBody = self
            .send(self.client.put(self.url("/auth/profile")).json(request))
            .await?;
        Ok(body.updated_user)
    }

    pub async fn all_users(&self) -> Result<Vec<User>, ClientError> {
        let body: UsersBody = self.send(self.client.get(self.url("/auth/all-users"))).await?;
        Ok(body.data)
    }

    pub async fn orders(&self) -> Result<Vec<Order>, ClientError> {
        self.send(self.client.get(self.url("/auth/orders"))).await
    }

    pub async fn all_orders(&self) -> Result<Vec<Order>, ClientError> {
        self.send(self.client.get(self.url("/auth/all-orders"))).await
    }

    pub async fn update_order_status(
        &self,
        order_id: Uuid,
        status: &str,
    ) -> Result<OrderRecord, ClientError> {
        let request = OrderStatusRequest {
            status: status.to_owned(),
        };
        self.send(
            self.client
                .put(self.url(&format!("/auth/order-status/{order_id}")))
                .json(&request),
        )
        .await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        let body: CategoriesBody = self
            .send(self.client.get(self.url("/category/get-category")))
            .await?;
        Ok(body.category)
    }

    pub async fn products(&self) -> Result<ProductListBody, ClientError> {
        self.send(self.client.get(self.url("/product/get-product")))
            .await
    }

    pub async fn product_count(&self) -> Result<u64, ClientError> {
        let body: CountBody = self
            .send(self.client.get(self.url("/product/product-count")))
            .await?;
        Ok(body.total)
    }

    pub async fn product_page(&self, page: u64) -> Result<Vec<Product>, ClientError> {
        let body: ProductsBody = self
            .send(
                self.client
                    .get(self.url(&format!("/product/product-list/{page}"))),
            )
            .await?;
        Ok(body.products)
    }

    pub async fn filter_products(
        &self,
        filters: &ProductFilters,
    ) -> Result<Vec<Product>, ClientError> {
        let body: ProductsBody = self
            .send(
                self.client
                    .post(self.url("/product/product-filters"))
                    .json(filters),
            )
            .await?;
        Ok(body.products)
    }

    pub async fn search(&self, keyword: &str) -> Result<Vec<Product>, ClientError> {
        // Pushed as a path segment so the keyword is percent-encoded.
        let mut url = reqwest::Url::parse(&self.url("/product/search/"))
            .map_err(|e| ClientError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(self.base_url.clone()))?
            .pop_if_empty()
            .push(keyword);
        self.send(self.client.get(url)).await
    }

    pub async fn braintree_token(&self) -> Result<ClientToken, ClientError> {
        self.send(self.client.get(self.url("/product/braintree/token")))
            .await
    }

    pub async fn pay(&self, nonce: &str, cart: Vec<CartLine>) -> Result<bool, ClientError> {
        let request = PaymentRequest {
            nonce: nonce.to_owned(),
            cart,
        };
        let body: OkBody = self
            .send(
                self.client
                    .post(self.url("/product/braintree/payment"))
                    .json(&request),
            )
            .await?;
        Ok(body.ok)
    }
}
