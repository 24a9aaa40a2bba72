use std::env;

use secrecy::Secret;

use crate::gateway::{BraintreeConfig, BraintreeEnvironment};

/// Room for a 1 MB photo plus the rest of the product form.
const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub max_body_bytes: usize,
    pub braintree: BraintreeConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let jwt_secret = env::var("JWT_SECRET")?;
        let max_body_bytes = env::var("MAX_BODY_BYTES")
            .ok()
            .and_then(|b| b.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        let braintree = BraintreeConfig {
            merchant_id: env::var("BRAINTREE_MERCHANT_ID").unwrap_or_default(),
            public_key: env::var("BRAINTREE_PUBLIC_KEY").unwrap_or_default(),
            private_key: Secret::new(env::var("BRAINTREE_PRIVATE_KEY").unwrap_or_default()),
            environment: BraintreeEnvironment::parse(
                &env::var("BRAINTREE_ENVIRONMENT").unwrap_or_default(),
            ),
            api_url: env::var("BRAINTREE_API_URL").ok(),
        };

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            max_body_bytes,
            braintree,
        })
    }
}
