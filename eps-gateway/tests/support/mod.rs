#![allow(dead_code)]

use std::time::Duration;

use chrono::Utc;
use eps_gateway::{Endpoints, EpsClient, GatewayConfig, PaymentRequest};
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::json;

pub const USERNAME: &str = "merchant@example.com";
pub const PASSWORD: &str = "p4ssw0rd";
pub const HASH_KEY: &str = "SFNLQHJlY2lwZXdhbGEjYTc3Zi1mOTQ5NWZhY2M2ZTZuZXQ=";
pub const MERCHANT_ID: &str = "29e86e70-0ac6-45eb-ba04-9fcb0aaed12a";
pub const STORE_ID: &str = "d44e705f-9e3a-41de-98b1-1674631637da";

pub const TOKEN_PATH: &str = "/v1/Auth/GetToken";
pub const INITIALIZE_PATH: &str = "/v1/EPSEngine/InitializeEPS";
pub const VERIFY_PATH: &str = "/v1/EPSEngine/CheckMerchantTransactionStatus";

pub fn config() -> GatewayConfig {
    GatewayConfig::new(USERNAME, PASSWORD, HASH_KEY, MERCHANT_ID, STORE_ID).with_sandbox(true)
}

pub fn client_for(server: &MockServer) -> EpsClient {
    client_with_config(server, config())
}

pub fn client_with_timeout(server: &MockServer, timeout: Duration) -> EpsClient {
    client_with_config(server, config().with_timeout(timeout))
}

pub fn client_with_config(server: &MockServer, config: GatewayConfig) -> EpsClient {
    EpsClient::builder(config)
        .with_endpoints(Endpoints::with_base_url(&server.base_url()))
        .build()
        .expect("client builds")
}

pub fn signature(value: &str) -> String {
    eps_gateway::sign(value, HASH_KEY).expect("sign")
}

pub fn future_expiry() -> String {
    (Utc::now() + chrono::Duration::hours(1)).to_rfc3339()
}

pub fn past_expiry() -> String {
    "2000-01-01T00:00:00".to_string()
}

/// Token endpoint answering with `token` valid until `expire_date`.
pub async fn mock_token<'a>(server: &'a MockServer, token: &str, expire_date: &str) -> Mock<'a> {
    let body = json!({
        "token": token,
        "expireDate": expire_date,
        "errorMessage": null,
        "errorCode": null
    });
    let hash = signature(USERNAME);
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(TOKEN_PATH)
                .header("x-hash", hash.as_str())
                .json_body(json!({ "userName": USERNAME, "password": PASSWORD }));
            then.status(200)
                .header("content-type", "application/json")
                .body(body.to_string());
        })
        .await
}

pub async fn mock_verify_status<'a>(
    server: &'a MockServer,
    merchant_transaction_id: &str,
    status: &str,
) -> Mock<'a> {
    let body = json!({
        "MerchantTransactionId": merchant_transaction_id,
        "EpsTransactionId": "C2549190401",
        "Status": status,
        "TotalAmount": "1000.00",
        "FinancialEntity": "bKash",
        "ErrorCode": null,
        "ErrorMessage": null
    });
    let id = merchant_transaction_id.to_string();
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(VERIFY_PATH)
                .query_param("merchantTransactionId", id.as_str());
            then.status(200)
                .header("content-type", "application/json")
                .body(body.to_string());
        })
        .await
}

pub fn payment_request() -> PaymentRequest {
    PaymentRequest {
        customer_order_id: "ORD123".into(),
        merchant_transaction_id: "20240117120000123".into(),
        total_amount: Some(1000.0),
        success_url: "https://shop.example/payment/success".into(),
        fail_url: "https://shop.example/payment/fail".into(),
        cancel_url: "https://shop.example/payment/cancel".into(),
        customer_name: "Rahim Uddin".into(),
        customer_email: "rahim@example.com".into(),
        customer_address: "House 1, Road 2, Dhanmondi".into(),
        customer_city: "Dhaka".into(),
        customer_state: "Dhaka".into(),
        customer_postcode: "1209".into(),
        customer_phone: "01712345678".into(),
        product_name: "Test Product".into(),
        ..Default::default()
    }
}
