//! Braintree client over its GraphQL API.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ClientToken, GatewayError, PaymentGateway, SaleRequest};

const BRAINTREE_VERSION: &str = "2019-01-01";

const CREATE_CLIENT_TOKEN: &str = r#"
mutation CreateClientToken($input: CreateClientTokenInput) {
  createClientToken(input: $input) {
    clientToken
  }
}"#;

const CHARGE_PAYMENT_METHOD: &str = r#"
mutation ChargePaymentMethod($input: ChargePaymentMethodInput!) {
  chargePaymentMethod(input: $input) {
    transaction {
      id
      legacyId
      status
      amount { value currencyCode }
      createdAt
    }
  }
}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraintreeEnvironment {
    Sandbox,
    Production,
}

impl BraintreeEnvironment {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") {
            BraintreeEnvironment::Production
        } else {
            BraintreeEnvironment::Sandbox
        }
    }

    pub fn graphql_url(&self) -> &'static str {
        match self {
            BraintreeEnvironment::Sandbox => "https://payments.sandbox.braintree-api.com/graphql",
            BraintreeEnvironment::Production => "https://payments.braintree-api.com/graphql",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BraintreeConfig {
    pub merchant_id: String,
    pub public_key: String,
    pub private_key: Secret<String>,
    pub environment: BraintreeEnvironment,
    /// Overrides the environment's endpoint; used against local stand-ins.
    pub api_url: Option<String>,
}

#[derive(Clone)]
pub struct BraintreeGateway {
    client: Client,
    config: BraintreeConfig,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<Value>,
}

impl BraintreeGateway {
    pub fn new(config: BraintreeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.merchant_id.is_empty()
            && !self.config.public_key.is_empty()
            && !self.config.private_key.expose_secret().is_empty()
    }

    fn endpoint(&self) -> &str {
        self.config
            .api_url
            .as_deref()
            .unwrap_or_else(|| self.config.environment.graphql_url())
    }

    async fn execute(&self, query: &str, variables: Value) -> Result<Value, GatewayError> {
        if !self.is_configured() {
            return Err(GatewayError::NotConfigured);
        }

        let response = self
            .client
            .post(self.endpoint())
            .basic_auth(
                &self.config.public_key,
                Some(self.config.private_key.expose_secret()),
            )
            .header("Braintree-Version", BRAINTREE_VERSION)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = %status, "braintree response received");

        let parsed: GraphQlResponse = serde_json::from_str(&body).map_err(|err| {
            GatewayError::Decode(format!("status {status}: {err}"))
        })?;

        if !parsed.errors.is_empty() {
            let message = parsed
                .errors
                .first()
                .and_then(|err| err.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("payment gateway error")
                .to_string();
            return Err(GatewayError::Rejected {
                message,
                details: Value::Array(parsed.errors),
            });
        }

        if !status.is_success() {
            return Err(GatewayError::Decode(format!("status {status}")));
        }

        parsed
            .data
            .ok_or_else(|| GatewayError::Decode("response carried no data".into()))
    }
}

#[async_trait]
impl PaymentGateway for BraintreeGateway {
    async fn generate_client_token(&self) -> Result<ClientToken, GatewayError> {
        let data = self
            .execute(CREATE_CLIENT_TOKEN, serde_json::json!({ "input": {} }))
            .await?;

        let client_token = data
            .pointer("/createClientToken/clientToken")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::Decode("missing clientToken".into()))?
            .to_string();

        Ok(ClientToken {
            client_token,
            success: true,
        })
    }

    async fn sale(&self, request: SaleRequest) -> Result<Value, GatewayError> {
        let variables = serde_json::json!({
            "input": {
                "paymentMethodId": request.payment_method_nonce,
                "transaction": {
                    "amount": format!("{:.2}", request.amount.round_dp(2)),
                }
            }
        });

        let data = self.execute(CHARGE_PAYMENT_METHOD, variables).await?;
        let transaction = data
            .get("chargePaymentMethod")
            .and_then(|payload| payload.get("transaction"))
            .cloned()
            .ok_or_else(|| GatewayError::Decode("missing transaction".into()))?;

        let transaction_id = transaction
            .get("id")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("-");
        let status = transaction
            .get("status")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("-");
        tracing::info!(transaction_id, status, "braintree sale accepted");

        Ok(serde_json::json!({
            "success": true,
            "transaction": transaction,
        }))
    }
}
