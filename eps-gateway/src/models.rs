//! Caller-facing request and result types.
//!
//! These describe what a merchant supplies and receives. The exact JSON the gateway
//! expects lives in [`crate::wire`]; [`crate::wire::InitializeRequestBody::from_request`]
//! is the single place where optional fields receive their defaults.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Channel the payment originates from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    #[default]
    Web,
    Android,
    Ios,
}

impl TransactionType {
    /// Numeric id used by the gateway's `transactionTypeId` field.
    pub fn id(&self) -> u8 {
        match self {
            TransactionType::Web => 1,
            TransactionType::Android => 2,
            TransactionType::Ios => 3,
        }
    }
}

/// One line of a multi-product cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductItem {
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "NoOfItem")]
    pub no_of_item: u32,
    #[serde(rename = "ProductProfile", skip_serializing_if = "Option::is_none", default)]
    pub product_profile: Option<String>,
    #[serde(rename = "ProductCategory", skip_serializing_if = "Option::is_none", default)]
    pub product_category: Option<String>,
    #[serde(rename = "ProductPrice")]
    pub product_price: f64,
}

/// Delivery address, when it differs from the customer's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shipment {
    pub name: Option<String>,
    pub address: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

/// Parameters for [`crate::EpsClient::initialize_payment`].
///
/// Required strings are considered missing when empty; `total_amount` when `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentRequest {
    pub customer_order_id: String,
    /// Merchant-assigned id, at least 10 characters. See [`crate::generate_transaction_id`].
    pub merchant_transaction_id: String,
    pub transaction_type: Option<TransactionType>,
    pub total_amount: Option<f64>,
    pub success_url: String,
    pub fail_url: String,
    pub cancel_url: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: String,
    pub customer_address2: Option<String>,
    pub customer_city: String,
    pub customer_state: String,
    pub customer_postcode: String,
    /// ISO country code, `BD` when absent.
    pub customer_country: Option<String>,
    pub customer_phone: String,
    pub shipment: Option<Shipment>,
    pub value_a: Option<String>,
    pub value_b: Option<String>,
    pub value_c: Option<String>,
    pub value_d: Option<String>,
    pub shipping_method: Option<String>,
    pub no_of_item: Option<u32>,
    pub product_name: String,
    pub product_profile: Option<String>,
    pub product_category: Option<String>,
    pub product_list: Vec<ProductItem>,
    pub ip_address: Option<String>,
}

/// Identifies the transaction to look up. At least one id must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyRequest {
    pub merchant_transaction_id: Option<String>,
    pub eps_transaction_id: Option<String>,
}

impl VerifyRequest {
    pub fn by_merchant_id(id: impl Into<String>) -> Self {
        Self {
            merchant_transaction_id: Some(id.into()),
            eps_transaction_id: None,
        }
    }

    pub fn by_eps_id(id: impl Into<String>) -> Self {
        Self {
            merchant_transaction_id: None,
            eps_transaction_id: Some(id.into()),
        }
    }

    pub(crate) fn merchant_id(&self) -> Option<&str> {
        non_empty(self.merchant_transaction_id.as_deref())
    }

    pub(crate) fn eps_id(&self) -> Option<&str> {
        non_empty(self.eps_transaction_id.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Outcome of a successful initialization: where to send the customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentInitResult {
    /// Gateway-assigned transaction id.
    pub transaction_id: String,
    pub redirect_url: String,
    pub financial_entities: Vec<Value>,
}

/// Transaction snapshot returned by the verification endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Verification {
    #[serde(default, deserialize_with = "lenient_string")]
    pub merchant_transaction_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub eps_transaction_id: String,
    /// `Success`, `Failed`, `Pending`, ...
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub total_amount: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transaction_date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transaction_type: String,
    /// Wallet or bank used, e.g. bKash.
    #[serde(default, deserialize_with = "lenient_string")]
    pub financial_entity: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub error_code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub error_message: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_address: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_address2: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_city: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_state: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_postcode: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_country: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_phone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub shipment_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub shipment_address: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub shipment_address2: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub shipment_city: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub shipment_state: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub shipment_postcode: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub shipment_country: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value_a: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value_b: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value_c: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value_d: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub shipping_method: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub no_of_item: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_profile: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_category: String,
    // The gateway spells it this way.
    #[serde(rename = "PaymentReferance", default, skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
}

impl Verification {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

/// Accept strings, numbers, booleans and null; the gateway is not consistent about which.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}
