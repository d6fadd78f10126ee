use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use common_observability::GatewayMetrics;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{ConfigSummary, GatewayConfig};
use crate::environment::{Endpoints, Environment};
use crate::error::{ErrorCode, GatewayError, GatewayResult};
use crate::models::{PaymentInitResult, PaymentRequest, Verification, VerifyRequest};
use crate::token::{parse_expiry, CachedToken, TokenCache};
use crate::validation::{validate_config, validate_payment_request};
use crate::wire::{InitializeRequestBody, InitializeResponse, RemoteFault, TokenRequest, TokenResponse};

const HASH_HEADER: &str = "x-hash";

/// The three remote calls, each with its own error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Token,
    Initialize,
    Verify,
}

impl Operation {
    fn label(&self) -> &'static str {
        match self {
            Operation::Token => "token",
            Operation::Initialize => "initialize",
            Operation::Verify => "verify",
        }
    }

    /// Code for error fields reported inside a gateway response body.
    fn fault_code(&self) -> ErrorCode {
        match self {
            Operation::Token => ErrorCode::TokenError,
            Operation::Initialize => ErrorCode::InitError,
            Operation::Verify => ErrorCode::VerifyError,
        }
    }

    /// Code for local failures that are not already a [`GatewayError`].
    fn failure_code(&self) -> ErrorCode {
        match self {
            Operation::Token => ErrorCode::AuthError,
            Operation::Initialize => ErrorCode::InitError,
            Operation::Verify => ErrorCode::VerifyError,
        }
    }

    fn fault_message(&self) -> &'static str {
        match self {
            Operation::Token => "Failed to get token",
            Operation::Initialize => "Payment initialization failed",
            Operation::Verify => "Transaction verification failed",
        }
    }

    fn failure(&self, detail: impl std::fmt::Display) -> GatewayError {
        let prefix = match self {
            Operation::Token => "Authentication failed",
            Operation::Initialize => "Payment initialization failed",
            Operation::Verify => "Transaction verification failed",
        };
        GatewayError::new(self.failure_code(), format!("{prefix}: {detail}"))
    }
}

/// Client for the EPS payment gateway.
///
/// Holds one set of merchant credentials and a single cached bearer token. Cheap to share
/// behind an `Arc`; every operation takes `&self`.
pub struct EpsClient {
    config: GatewayConfig,
    endpoints: Endpoints,
    http: Client,
    tokens: TokenCache,
    metrics: Arc<GatewayMetrics>,
}

impl EpsClient {
    /// Validate `config` and build a client for the environment it selects.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: GatewayConfig) -> EpsClientBuilder {
        EpsClientBuilder::new(config)
    }

    pub fn environment(&self) -> Environment {
        self.config.environment()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn metrics(&self) -> &Arc<GatewayMetrics> {
        &self.metrics
    }

    pub fn config_summary(&self) -> ConfigSummary {
        self.config.summary()
    }

    /// Drop the cached bearer token; the next call fetches a new one.
    pub fn clear_token(&self) {
        self.tokens.clear();
        debug!("cleared cached EPS token");
    }

    /// Register a payment and obtain the URL the customer must be redirected to.
    ///
    /// Validation failures return before any signing or network traffic.
    pub async fn initialize_payment(
        &self,
        request: &PaymentRequest,
    ) -> GatewayResult<PaymentInitResult> {
        let result = self.initialize_inner(request).await;
        self.record_outcome(Operation::Initialize, &result);
        match &result {
            Ok(session) => info!(
                merchant_transaction_id = %request.merchant_transaction_id,
                transaction_id = %session.transaction_id,
                "EPS payment initialized"
            ),
            Err(err) => warn!(
                merchant_transaction_id = %request.merchant_transaction_id,
                code = %err.code,
                remote_code = ?err.remote_code,
                error = %err.message,
                "EPS payment initialization failed"
            ),
        }
        result
    }

    /// Fetch the current state of a transaction by merchant and/or gateway id.
    pub async fn verify_payment(&self, request: &VerifyRequest) -> GatewayResult<Verification> {
        let result = self.verify_inner(request).await;
        self.record_outcome(Operation::Verify, &result);
        match &result {
            Ok(verification) => info!(
                merchant_transaction_id = %verification.merchant_transaction_id,
                eps_transaction_id = %verification.eps_transaction_id,
                status = %verification.status,
                "EPS transaction verified"
            ),
            Err(err) => warn!(
                merchant_transaction_id = ?request.merchant_transaction_id,
                eps_transaction_id = ?request.eps_transaction_id,
                code = %err.code,
                remote_code = ?err.remote_code,
                error = %err.message,
                "EPS transaction verification failed"
            ),
        }
        result
    }

    /// `true` only when the gateway reports status "success" for this merchant transaction
    /// id. Never fails: every error maps to `false`.
    pub async fn is_payment_successful(&self, merchant_transaction_id: &str) -> bool {
        self.verify_payment(&VerifyRequest::by_merchant_id(merchant_transaction_id))
            .await
            .map(|verification| verification.is_success())
            .unwrap_or(false)
    }

    async fn initialize_inner(&self, request: &PaymentRequest) -> GatewayResult<PaymentInitResult> {
        let op = Operation::Initialize;
        validate_payment_request(request)?;

        let token = self.get_token().await?;
        let signature = self.sign(op, &request.merchant_transaction_id)?;
        let body = InitializeRequestBody::from_request(&self.config, request);

        let builder = self
            .http
            .post(&self.endpoints.initialize)
            .header(HASH_HEADER, signature)
            .bearer_auth(token)
            .json(&body);
        let raw = self.execute(op, builder).await?;

        let data: InitializeResponse = decode(op, &raw)?;
        let transaction_id = data.transaction_id.filter(|id| !id.is_empty());
        let redirect_url = data.redirect_url.filter(|url| !url.is_empty());
        match (transaction_id, redirect_url) {
            (Some(transaction_id), Some(redirect_url)) => Ok(PaymentInitResult {
                transaction_id,
                redirect_url,
                financial_entities: data.financial_entity_list.unwrap_or_default(),
            }),
            _ => Err(op
                .failure("response is missing TransactionId or RedirectURL")
                .with_raw_response(raw)),
        }
    }

    async fn verify_inner(&self, request: &VerifyRequest) -> GatewayResult<Verification> {
        let op = Operation::Verify;
        let merchant_id = request.merchant_id();
        let eps_id = request.eps_id();
        let signed_value = match (merchant_id, eps_id) {
            (Some(id), _) | (None, Some(id)) => id,
            (None, None) => {
                return Err(GatewayError::invalid_params(
                    "Either merchant_transaction_id or eps_transaction_id is required",
                ))
            }
        };

        let token = self.get_token().await?;
        let signature = self.sign(op, signed_value)?;

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(2);
        if let Some(id) = merchant_id {
            query.push(("merchantTransactionId", id));
        }
        if let Some(id) = eps_id {
            query.push(("EPSTransactionId", id));
        }

        let builder = self
            .http
            .get(&self.endpoints.verify)
            .query(&query)
            .header(HASH_HEADER, signature)
            .bearer_auth(token);
        let raw = self.execute(op, builder).await?;
        decode(op, &raw)
    }

    /// A valid bearer token, from the cache when possible.
    async fn get_token(&self) -> GatewayResult<String> {
        if let Some(token) = self.tokens.get_valid(Utc::now()) {
            return Ok(token);
        }
        let result = self.refresh_token().await;
        self.metrics.record_token_refresh(result.is_ok());
        self.record_outcome(Operation::Token, &result);
        if let Err(err) = &result {
            warn!(code = %err.code, remote_code = ?err.remote_code, error = %err.message, "EPS token refresh failed");
        }
        result
    }

    // Touches the cache only once the whole exchange succeeded.
    async fn refresh_token(&self) -> GatewayResult<String> {
        let op = Operation::Token;
        let signature = self.sign(op, &self.config.username)?;
        let body = TokenRequest {
            user_name: &self.config.username,
            password: self.config.password.expose(),
        };
        let builder = self
            .http
            .post(&self.endpoints.token)
            .header(HASH_HEADER, signature)
            .json(&body);
        let raw = self.execute(op, builder).await?;

        let data: TokenResponse = decode(op, &raw)?;
        let token = match data.token.filter(|token| !token.is_empty()) {
            Some(token) => token,
            None => {
                return Err(op
                    .failure("response did not contain a token")
                    .with_raw_response(raw))
            }
        };

        match data.expire_date.as_deref().and_then(parse_expiry) {
            Some(expires_at) => {
                self.tokens
                    .store(CachedToken::new(token.clone(), expires_at));
                debug!(%expires_at, "cached EPS bearer token");
            }
            None => warn!(
                expire_date = ?data.expire_date,
                "EPS token expiry unreadable; token used once and not cached"
            ),
        }
        Ok(token)
    }

    fn sign(&self, op: Operation, value: &str) -> GatewayResult<String> {
        common_crypto::sign(value, self.config.hash_key.expose())
            .map_err(|err| op.failure(format!("hash generation failed ({err})")))
    }

    async fn execute(&self, op: Operation, builder: RequestBuilder) -> GatewayResult<Value> {
        let started = Instant::now();
        let result = self.send(op, builder).await;
        self.metrics
            .observe_duration(op.label(), started.elapsed().as_secs_f64());
        result
    }

    /// Send and normalize: transport failures first, then error fields in the body, then
    /// the HTTP status.
    async fn send(&self, op: Operation, builder: RequestBuilder) -> GatewayResult<Value> {
        let response = builder
            .send()
            .await
            .map_err(|err| transport_error(op, err))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| transport_error(op, err))?;
        let body = parse_body(text);
        debug!(operation = op.label(), status = status.as_u16(), "EPS response received");

        if let Some(fault) = RemoteFault::detect(&body) {
            let message = fault
                .message
                .unwrap_or_else(|| op.fault_message().to_string());
            return Err(GatewayError::new(op.fault_code(), message)
                .with_remote_code(fault.code)
                .with_status(status.as_u16())
                .with_raw_response(body));
        }

        if !status.is_success() {
            return Err(GatewayError::new(
                ErrorCode::HttpError,
                format!("EPS responded with HTTP {status}"),
            )
            .with_status(status.as_u16())
            .with_raw_response(body));
        }

        Ok(body)
    }

    fn record_outcome<T>(&self, op: Operation, result: &GatewayResult<T>) {
        let outcome = match result {
            Ok(_) => "success",
            Err(err) => err.code.as_str(),
        };
        self.metrics.record_request(op.label(), outcome);
    }
}

impl std::fmt::Debug for EpsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EpsClient")
            .field("config", &self.config)
            .field("endpoints", &self.endpoints)
            .field("tokens", &self.tokens)
            .finish()
    }
}

/// Builder for [`EpsClient`], mainly to point it at a non-default host or share metrics.
pub struct EpsClientBuilder {
    config: GatewayConfig,
    endpoints: Option<Endpoints>,
    http: Option<Client>,
    metrics: Option<Arc<GatewayMetrics>>,
}

impl EpsClientBuilder {
    fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            endpoints: None,
            http: None,
            metrics: None,
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Use a preconfigured HTTP client. Its timeout replaces the configured one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<GatewayMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> GatewayResult<EpsClient> {
        validate_config(&self.config)?;

        let endpoints = self
            .endpoints
            .unwrap_or_else(|| Endpoints::for_environment(self.config.environment()));
        let http = match self.http {
            Some(client) => client,
            None => default_http_client(&self.config)?,
        };
        let metrics = match self.metrics {
            Some(metrics) => metrics,
            None => Arc::new(GatewayMetrics::new().map_err(|err| {
                GatewayError::new(
                    ErrorCode::UnknownError,
                    format!("failed to register gateway metrics: {err}"),
                )
            })?),
        };

        info!(
            environment = self.config.environment().as_str(),
            merchant_id = %self.config.merchant_id,
            store_id = %self.config.store_id,
            "EPS client ready"
        );

        Ok(EpsClient {
            config: self.config,
            endpoints,
            http,
            tokens: TokenCache::new(),
            metrics,
        })
    }
}

fn default_http_client(config: &GatewayConfig) -> GatewayResult<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Client::builder()
        .timeout(config.timeout)
        .default_headers(headers)
        .build()
        .map_err(|err| GatewayError::invalid_config(format!("failed to build HTTP client: {err}")))
}

fn transport_error(op: Operation, err: reqwest::Error) -> GatewayError {
    // Builder errors (e.g. a header value the server handed us that cannot be sent back)
    // never reached the wire; they belong to the operation.
    if err.is_builder() {
        op.failure(err)
    } else {
        GatewayError::from_transport(&err)
    }
}

fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

fn decode<T: DeserializeOwned>(op: Operation, raw: &Value) -> GatewayResult<T> {
    serde_json::from_value(raw.clone()).map_err(|err| {
        op.failure(format!("unexpected response body ({err})"))
            .with_raw_response(raw.clone())
    })
}
