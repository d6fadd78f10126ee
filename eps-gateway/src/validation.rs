//! Shape checks run before any hash computation or network call.
//!
//! Each check stops at the first violated rule and names the offending field.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

use crate::config::GatewayConfig;
use crate::error::{ErrorCode, GatewayError, GatewayResult};
use crate::models::PaymentRequest;

const MIN_TRANSACTION_ID_LEN: usize = 10;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("uuid regex")
});
static BD_PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^01[0-9]{9}$").expect("phone regex"));

pub fn validate_config(config: &GatewayConfig) -> GatewayResult<()> {
    let required: [(&str, bool); 5] = [
        ("username", config.username.is_empty()),
        ("password", config.password.is_empty()),
        ("hash_key", config.hash_key.is_empty()),
        ("merchant_id", config.merchant_id.is_empty()),
        ("store_id", config.store_id.is_empty()),
    ];
    if let Some((field, _)) = required.iter().find(|(_, missing)| *missing) {
        return Err(GatewayError::invalid_config(format!(
            "Missing required configuration: {field}"
        )));
    }

    if !is_valid_email(&config.username) {
        return Err(GatewayError::invalid_config(
            "Invalid username format (expected email)",
        ));
    }
    if !is_valid_uuid(&config.merchant_id) {
        return Err(GatewayError::invalid_config(
            "Invalid merchant_id format (expected UUID)",
        ));
    }
    if !is_valid_uuid(&config.store_id) {
        return Err(GatewayError::invalid_config(
            "Invalid store_id format (expected UUID)",
        ));
    }
    Ok(())
}

pub fn validate_payment_request(request: &PaymentRequest) -> GatewayResult<()> {
    let required: [(&str, bool); 14] = [
        ("customer_order_id", request.customer_order_id.is_empty()),
        (
            "merchant_transaction_id",
            request.merchant_transaction_id.is_empty(),
        ),
        ("total_amount", request.total_amount.is_none()),
        ("success_url", request.success_url.is_empty()),
        ("fail_url", request.fail_url.is_empty()),
        ("cancel_url", request.cancel_url.is_empty()),
        ("customer_name", request.customer_name.is_empty()),
        ("customer_email", request.customer_email.is_empty()),
        ("customer_address", request.customer_address.is_empty()),
        ("customer_city", request.customer_city.is_empty()),
        ("customer_state", request.customer_state.is_empty()),
        ("customer_postcode", request.customer_postcode.is_empty()),
        ("customer_phone", request.customer_phone.is_empty()),
        ("product_name", request.product_name.is_empty()),
    ];
    if let Some((field, _)) = required.iter().find(|(_, missing)| *missing) {
        return Err(GatewayError::invalid_params(format!(
            "Missing required parameter: {field}"
        )));
    }

    if request.merchant_transaction_id.chars().count() < MIN_TRANSACTION_ID_LEN {
        return Err(GatewayError::new(
            ErrorCode::InvalidTransactionId,
            format!("merchant_transaction_id must be at least {MIN_TRANSACTION_ID_LEN} characters"),
        ));
    }

    if !request
        .total_amount
        .is_some_and(|amount| amount.is_finite() && amount > 0.0)
    {
        return Err(GatewayError::new(
            ErrorCode::InvalidAmount,
            "total_amount must be greater than 0",
        ));
    }

    if !is_valid_email(&request.customer_email) {
        return Err(GatewayError::new(
            ErrorCode::InvalidEmail,
            "Invalid customer email format",
        ));
    }

    if !is_valid_bd_phone(&request.customer_phone) {
        return Err(GatewayError::new(
            ErrorCode::InvalidPhone,
            "Invalid phone number format (expected Bangladesh format: 01XXXXXXXXX)",
        ));
    }

    for (field, url) in [
        ("success_url", &request.success_url),
        ("fail_url", &request.fail_url),
        ("cancel_url", &request.cancel_url),
    ] {
        if !is_valid_url(url) {
            return Err(GatewayError::new(
                ErrorCode::InvalidUrl,
                format!("Invalid {field} format"),
            ));
        }
    }

    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_uuid(value: &str) -> bool {
    UUID_RE.is_match(value)
}

/// Eleven digits starting with `01` once every non-digit is stripped.
pub fn is_valid_bd_phone(phone: &str) -> bool {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    BD_PHONE_RE.is_match(&digits)
}

pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}
