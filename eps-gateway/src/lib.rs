//! Client for the EPS (Easy Payment System) hosted payment gateway.
//!
//! [`EpsClient`] obtains and caches a bearer token, signs each request with an
//! HMAC-SHA512 `x-hash` header, initializes payments and verifies their outcome. All
//! failures surface as [`GatewayError`].

pub mod client;
pub mod config;
pub mod environment;
pub mod error;
pub mod models;
pub mod token;
pub mod transaction_id;
pub mod validation;
pub mod wire;

pub use crate::client::{EpsClient, EpsClientBuilder};
pub use crate::config::{ConfigSummary, GatewayConfig};
pub use crate::environment::{Endpoints, Environment};
pub use crate::error::{ErrorCode, GatewayError, GatewayResult};
pub use crate::models::{
    PaymentInitResult, PaymentRequest, ProductItem, Shipment, TransactionType, Verification,
    VerifyRequest,
};
pub use crate::transaction_id::generate_transaction_id;
pub use common_crypto::{sign, validate_hash_key, CryptoError, SecretString};
pub use common_observability::GatewayMetrics;
