use serde_json::Value;
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Short machine-readable classification carried by every [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidConfig,
    InvalidParams,
    InvalidTransactionId,
    InvalidAmount,
    InvalidEmail,
    InvalidPhone,
    InvalidUrl,
    TokenError,
    AuthError,
    InitError,
    VerifyError,
    HttpError,
    NetworkError,
    UnknownError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::InvalidParams => "INVALID_PARAMS",
            ErrorCode::InvalidTransactionId => "INVALID_TRANSACTION_ID",
            ErrorCode::InvalidAmount => "INVALID_AMOUNT",
            ErrorCode::InvalidEmail => "INVALID_EMAIL",
            ErrorCode::InvalidPhone => "INVALID_PHONE",
            ErrorCode::InvalidUrl => "INVALID_URL",
            ErrorCode::TokenError => "TOKEN_ERROR",
            ErrorCode::AuthError => "AUTH_ERROR",
            ErrorCode::InitError => "INIT_ERROR",
            ErrorCode::VerifyError => "VERIFY_ERROR",
            ErrorCode::HttpError => "HTTP_ERROR",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Codes raised before any hash computation or network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorCode::InvalidConfig
                | ErrorCode::InvalidParams
                | ErrorCode::InvalidTransactionId
                | ErrorCode::InvalidAmount
                | ErrorCode::InvalidEmail
                | ErrorCode::InvalidPhone
                | ErrorCode::InvalidUrl
        )
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error shape every failure path of the client converges to.
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct GatewayError {
    pub code: ErrorCode,
    pub message: String,
    /// Error code reported by the gateway itself (e.g. `E01`), when present.
    pub remote_code: Option<String>,
    /// HTTP status of the response that produced this error, when one was received.
    pub status: Option<u16>,
    /// Decoded response body kept for diagnostics.
    pub raw_response: Option<Value>,
}

impl GatewayError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            remote_code: None,
            status: None,
            raw_response: None,
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfig, message)
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }

    pub fn with_remote_code(mut self, remote_code: Option<String>) -> Self {
        self.remote_code = remote_code;
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_raw_response(mut self, raw: Value) -> Self {
        self.raw_response = Some(raw);
        self
    }

    /// Normalize a transport failure. Anything that never produced a response is a
    /// network error; the rest is unclassified.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::new(
                ErrorCode::NetworkError,
                format!("No response from EPS server: request timed out ({err})"),
            );
        }
        if err.is_connect() || err.is_request() {
            return Self::new(
                ErrorCode::NetworkError,
                format!("No response from EPS server: {err}"),
            );
        }
        Self::new(ErrorCode::UnknownError, err.to_string())
    }
}
