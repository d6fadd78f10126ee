//! Command-line walkthrough of the EPS client against the configured environment.
//!
//! ```text
//! eps-demo txid
//! eps-demo init <order-id> <amount>
//! eps-demo verify <merchant-transaction-id>
//! eps-demo check <merchant-transaction-id>
//! ```

use std::env;

use anyhow::{bail, Context, Result};
use eps_gateway::{
    generate_transaction_id, EpsClient, GatewayConfig, PaymentRequest, VerifyRequest,
};
use tracing::info;

const USAGE: &str = "usage: eps-demo <txid | init <order-id> <amount> | verify <id> | check <id>>";

#[tokio::main]
async fn main() -> Result<()> {
    common_observability::init_tracing("info")?;

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or_default();

    if command == "txid" {
        println!("{}", generate_transaction_id());
        return Ok(());
    }

    let config = GatewayConfig::from_env()?;
    let client = EpsClient::new(config)?;
    info!(environment = client.environment().as_str(), "using EPS environment");

    match (command, args.get(1), args.get(2)) {
        ("init", Some(order_id), Some(amount)) => {
            let amount: f64 = amount
                .parse()
                .with_context(|| format!("amount must be a number, got {amount:?}"))?;
            let request = demo_request(order_id, amount);
            let session = client.initialize_payment(&request).await?;
            println!("merchant transaction id: {}", request.merchant_transaction_id);
            println!("EPS transaction id:      {}", session.transaction_id);
            println!("redirect customer to:    {}", session.redirect_url);
        }
        ("verify", Some(id), None) => {
            let verification = client
                .verify_payment(&VerifyRequest::by_merchant_id(id.as_str()))
                .await?;
            println!("status:           {}", verification.status);
            println!("amount:           {}", verification.total_amount);
            println!("financial entity: {}", verification.financial_entity);
        }
        ("check", Some(id), None) => {
            println!("{}", client.is_payment_successful(id).await);
        }
        _ => bail!(USAGE),
    }

    print!("{}", client.metrics().render()?);
    Ok(())
}

fn demo_request(order_id: &str, amount: f64) -> PaymentRequest {
    let base_url = demo_var("EPS_DEMO_BASE_URL", "https://shop.example");
    PaymentRequest {
        customer_order_id: order_id.to_string(),
        merchant_transaction_id: generate_transaction_id(),
        total_amount: Some(amount),
        success_url: format!("{base_url}/payment/success"),
        fail_url: format!("{base_url}/payment/fail"),
        cancel_url: format!("{base_url}/payment/cancel"),
        customer_name: demo_var("EPS_DEMO_CUSTOMER_NAME", "Rahim Uddin"),
        customer_email: demo_var("EPS_DEMO_CUSTOMER_EMAIL", "rahim@example.com"),
        customer_address: demo_var("EPS_DEMO_CUSTOMER_ADDRESS", "House 1, Road 2, Dhanmondi"),
        customer_city: demo_var("EPS_DEMO_CUSTOMER_CITY", "Dhaka"),
        customer_state: demo_var("EPS_DEMO_CUSTOMER_STATE", "Dhaka"),
        customer_postcode: demo_var("EPS_DEMO_CUSTOMER_POSTCODE", "1209"),
        customer_phone: demo_var("EPS_DEMO_CUSTOMER_PHONE", "01712345678"),
        product_name: demo_var("EPS_DEMO_PRODUCT_NAME", "Demo Product"),
        ..Default::default()
    }
}

fn demo_var(key: &str, fallback: &str) -> String {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
