//! JSON shapes exchanged with the gateway.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::models::{PaymentRequest, ProductItem, Shipment};

const DEFAULT_IP_ADDRESS: &str = "0.0.0.0";
const DEFAULT_COUNTRY: &str = "BD";
const DEFAULT_SHIPPING_METHOD: &str = "NO";
const DEFAULT_NO_OF_ITEM: &str = "1";
const DEFAULT_PRODUCT_PROFILE: &str = "general";
const DEFAULT_PRODUCT_CATEGORY: &str = "general";
const API_VERSION: &str = "1";

#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    #[serde(rename = "userName")]
    pub user_name: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "expireDate", default)]
    pub expire_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InitializeResponse {
    #[serde(rename = "TransactionId", default)]
    pub transaction_id: Option<String>,
    #[serde(rename = "RedirectURL", default)]
    pub redirect_url: Option<String>,
    #[serde(rename = "FinancialEntityList", default)]
    pub financial_entity_list: Option<Vec<Value>>,
}

/// Fully populated initialization payload. Every field the gateway schema lists is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitializeRequestBody {
    #[serde(rename = "merchantId")]
    pub merchant_id: String,
    #[serde(rename = "storeId")]
    pub store_id: String,
    #[serde(rename = "CustomerOrderId")]
    pub customer_order_id: String,
    #[serde(rename = "merchantTransactionId")]
    pub merchant_transaction_id: String,
    #[serde(rename = "transactionTypeId")]
    pub transaction_type_id: u8,
    #[serde(rename = "financialEntityId")]
    pub financial_entity_id: u32,
    #[serde(rename = "transitionStatusId")]
    pub transition_status_id: u32,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
    #[serde(rename = "ipAddress")]
    pub ip_address: String,
    pub version: String,
    #[serde(rename = "successUrl")]
    pub success_url: String,
    #[serde(rename = "failUrl")]
    pub fail_url: String,
    #[serde(rename = "cancelUrl")]
    pub cancel_url: String,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(rename = "customerEmail")]
    pub customer_email: String,
    #[serde(rename = "CustomerAddress")]
    pub customer_address: String,
    #[serde(rename = "CustomerAddress2")]
    pub customer_address2: String,
    #[serde(rename = "CustomerCity")]
    pub customer_city: String,
    #[serde(rename = "CustomerState")]
    pub customer_state: String,
    #[serde(rename = "CustomerPostcode")]
    pub customer_postcode: String,
    #[serde(rename = "CustomerCountry")]
    pub customer_country: String,
    #[serde(rename = "CustomerPhone")]
    pub customer_phone: String,
    #[serde(rename = "ShipmentName")]
    pub shipment_name: String,
    #[serde(rename = "ShipmentAddress")]
    pub shipment_address: String,
    #[serde(rename = "ShipmentAddress2")]
    pub shipment_address2: String,
    #[serde(rename = "ShipmentCity")]
    pub shipment_city: String,
    #[serde(rename = "ShipmentState")]
    pub shipment_state: String,
    #[serde(rename = "ShipmentPostcode")]
    pub shipment_postcode: String,
    #[serde(rename = "ShipmentCountry")]
    pub shipment_country: String,
    #[serde(rename = "ValueA")]
    pub value_a: String,
    #[serde(rename = "ValueB")]
    pub value_b: String,
    #[serde(rename = "ValueC")]
    pub value_c: String,
    #[serde(rename = "ValueD")]
    pub value_d: String,
    #[serde(rename = "ShippingMethod")]
    pub shipping_method: String,
    #[serde(rename = "NoOfItem")]
    pub no_of_item: String,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "ProductProfile")]
    pub product_profile: String,
    #[serde(rename = "ProductCategory")]
    pub product_category: String,
    #[serde(rename = "ProductList")]
    pub product_list: Vec<ProductItem>,
}

impl InitializeRequestBody {
    /// Apply every default once, turning the caller's partially-optional request into
    /// the wire payload.
    pub fn from_request(config: &GatewayConfig, request: &PaymentRequest) -> Self {
        let shipment = request.shipment.clone().unwrap_or_default();
        let Shipment {
            name,
            address,
            address2,
            city,
            state,
            postcode,
            country,
        } = shipment;

        Self {
            merchant_id: config.merchant_id.clone(),
            store_id: config.store_id.clone(),
            customer_order_id: request.customer_order_id.clone(),
            merchant_transaction_id: request.merchant_transaction_id.clone(),
            transaction_type_id: request.transaction_type.unwrap_or_default().id(),
            financial_entity_id: 0,
            transition_status_id: 0,
            total_amount: request.total_amount.unwrap_or_default(),
            ip_address: or_default(&request.ip_address, DEFAULT_IP_ADDRESS),
            version: API_VERSION.to_string(),
            success_url: request.success_url.clone(),
            fail_url: request.fail_url.clone(),
            cancel_url: request.cancel_url.clone(),
            customer_name: request.customer_name.clone(),
            customer_email: request.customer_email.clone(),
            customer_address: request.customer_address.clone(),
            customer_address2: or_empty(&request.customer_address2),
            customer_city: request.customer_city.clone(),
            customer_state: request.customer_state.clone(),
            customer_postcode: request.customer_postcode.clone(),
            customer_country: or_default(&request.customer_country, DEFAULT_COUNTRY),
            customer_phone: request.customer_phone.clone(),
            shipment_name: or_empty(&name),
            shipment_address: or_empty(&address),
            shipment_address2: or_empty(&address2),
            shipment_city: or_empty(&city),
            shipment_state: or_empty(&state),
            shipment_postcode: or_empty(&postcode),
            shipment_country: or_empty(&country),
            value_a: or_empty(&request.value_a),
            value_b: or_empty(&request.value_b),
            value_c: or_empty(&request.value_c),
            value_d: or_empty(&request.value_d),
            shipping_method: or_default(&request.shipping_method, DEFAULT_SHIPPING_METHOD),
            no_of_item: request
                .no_of_item
                .map(|n| n.to_string())
                .unwrap_or_else(|| DEFAULT_NO_OF_ITEM.to_string()),
            product_name: request.product_name.clone(),
            product_profile: or_default(&request.product_profile, DEFAULT_PRODUCT_PROFILE),
            product_category: or_default(&request.product_category, DEFAULT_PRODUCT_CATEGORY),
            product_list: request.product_list.clone(),
        }
    }
}

// Empty strings count as absent, same as a missing value.
fn or_default(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

fn or_empty(value: &Option<String>) -> String {
    or_default(value, "")
}

/// Error fields the gateway embeds in otherwise ordinary responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFault {
    pub message: Option<String>,
    pub code: Option<String>,
}

impl RemoteFault {
    /// Look for `ErrorMessage`/`ErrorCode` (or their camelCase forms used by the token
    /// endpoint). Null, empty and zero values do not count.
    pub fn detect(body: &Value) -> Option<Self> {
        let message = field_text(body, &["ErrorMessage", "errorMessage"]);
        let code = field_text(body, &["ErrorCode", "errorCode"]);
        if message.is_none() && code.is_none() {
            None
        } else {
            Some(Self { message, code })
        }
    }
}

fn field_text(body: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match body.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    })
}
