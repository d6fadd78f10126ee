mod support;

use eps_gateway::{EpsClient, Endpoints, ErrorCode, VerifyRequest};
use httpmock::prelude::*;
use serde_json::json;
use support::*;

#[tokio::test]
async fn verifies_by_merchant_transaction_id() {
    let server = MockServer::start_async().await;
    let _token = mock_token(&server, "tok-verify", &future_expiry()).await;
    let hash = signature("20240117120000123");
    let verify = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(VERIFY_PATH)
                .query_param("merchantTransactionId", "20240117120000123")
                .header("x-hash", hash.as_str())
                .header("authorization", "Bearer tok-verify");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    json!({
                        "MerchantTransactionId": "20240117120000123",
                        "EpsTransactionId": "C2549190401",
                        "Status": "Success",
                        "TotalAmount": 1000.5,
                        "TransactionDate": "2024-01-17 12:01:09",
                        "FinancialEntity": "bKash",
                        "CustomerName": "Rahim Uddin",
                        "PaymentReferance": "BK-9981",
                        "ErrorCode": null,
                        "ErrorMessage": null
                    })
                    .to_string(),
                );
        })
        .await;
    let client = client_for(&server);

    let verification = client
        .verify_payment(&VerifyRequest::by_merchant_id("20240117120000123"))
        .await
        .expect("verify succeeds");

    assert_eq!(verification.merchant_transaction_id, "20240117120000123");
    assert_eq!(verification.eps_transaction_id, "C2549190401");
    assert_eq!(verification.total_amount, "1000.5");
    assert_eq!(verification.financial_entity, "bKash");
    assert_eq!(verification.payment_reference.as_deref(), Some("BK-9981"));
    assert!(verification.is_success());
    verify.assert_hits_async(1).await;
    assert_eq!(client.metrics().request_count("verify", "success"), 1);
}

#[tokio::test]
async fn verifies_by_eps_transaction_id() {
    let server = MockServer::start_async().await;
    let _token = mock_token(&server, "tok-verify", &future_expiry()).await;
    let hash = signature("C2549190401");
    let verify = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(VERIFY_PATH)
                .query_param("EPSTransactionId", "C2549190401")
                .header("x-hash", hash.as_str());
            then.status(200)
                .header("content-type", "application/json")
                .body(json!({ "EpsTransactionId": "C2549190401", "Status": "Pending" }).to_string());
        })
        .await;
    let client = client_for(&server);

    let verification = client
        .verify_payment(&VerifyRequest::by_eps_id("C2549190401"))
        .await
        .expect("verify succeeds");

    assert_eq!(verification.status, "Pending");
    assert!(!verification.is_success());
    verify.assert_hits_async(1).await;
}

#[tokio::test]
async fn both_ids_are_sent_and_merchant_id_is_signed() {
    let server = MockServer::start_async().await;
    let _token = mock_token(&server, "tok-verify", &future_expiry()).await;
    let hash = signature("20240117120000123");
    let verify = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(VERIFY_PATH)
                .query_param("merchantTransactionId", "20240117120000123")
                .query_param("EPSTransactionId", "C2549190401")
                .header("x-hash", hash.as_str());
            then.status(200)
                .header("content-type", "application/json")
                .body(json!({ "Status": "Success" }).to_string());
        })
        .await;
    let client = client_for(&server);

    let request = VerifyRequest {
        merchant_transaction_id: Some("20240117120000123".into()),
        eps_transaction_id: Some("C2549190401".into()),
    };
    client.verify_payment(&request).await.expect("verify succeeds");
    verify.assert_hits_async(1).await;
}

#[tokio::test]
async fn missing_ids_fail_before_any_request() {
    let server = MockServer::start_async().await;
    let token = mock_token(&server, "tok-verify", &future_expiry()).await;
    let client = client_for(&server);

    for request in [
        VerifyRequest::default(),
        VerifyRequest {
            merchant_transaction_id: Some(String::new()),
            eps_transaction_id: Some(String::new()),
        },
    ] {
        let err = client.verify_payment(&request).await.expect_err("no ids");
        assert_eq!(err.code, ErrorCode::InvalidParams);
        assert_eq!(
            err.message,
            "Either merchant_transaction_id or eps_transaction_id is required"
        );
    }
    token.assert_hits_async(0).await;
}

#[tokio::test]
async fn remote_error_fields_become_verify_error() {
    let server = MockServer::start_async().await;
    let _token = mock_token(&server, "tok-verify", &future_expiry()).await;
    let _verify = server
        .mock_async(|when, then| {
            when.method(GET).path(VERIFY_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .body(json!({ "ErrorCode": "E11", "ErrorMessage": "Transaction not found" }).to_string());
        })
        .await;
    let client = client_for(&server);

    let err = client
        .verify_payment(&VerifyRequest::by_merchant_id("20240117999999999"))
        .await
        .expect_err("not found");
    assert_eq!(err.code, ErrorCode::VerifyError);
    assert_eq!(err.message, "Transaction not found");
    assert_eq!(err.remote_code.as_deref(), Some("E11"));
}

#[tokio::test]
async fn error_code_without_message_gets_default_message() {
    let server = MockServer::start_async().await;
    let _token = mock_token(&server, "tok-verify", &future_expiry()).await;
    let _verify = server
        .mock_async(|when, then| {
            when.method(GET).path(VERIFY_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .body(json!({ "ErrorCode": "E99" }).to_string());
        })
        .await;
    let client = client_for(&server);

    let err = client
        .verify_payment(&VerifyRequest::by_merchant_id("20240117120000123"))
        .await
        .expect_err("remote error");
    assert_eq!(err.code, ErrorCode::VerifyError);
    assert_eq!(err.message, "Transaction verification failed");
}

#[tokio::test]
async fn payment_success_check_reads_status_case_insensitively() {
    let server = MockServer::start_async().await;
    let _token = mock_token(&server, "tok-verify", &future_expiry()).await;
    let _ok = mock_verify_status(&server, "20240117120000001", "SUCCESS").await;
    let _failed = mock_verify_status(&server, "20240117120000002", "Failed").await;
    let client = client_for(&server);

    assert!(client.is_payment_successful("20240117120000001").await);
    assert!(!client.is_payment_successful("20240117120000002").await);
}

#[tokio::test]
async fn payment_success_check_swallows_errors() {
    let server = MockServer::start_async().await;
    let _token = mock_token(&server, "tok-verify", &future_expiry()).await;
    let _verify = server
        .mock_async(|when, then| {
            when.method(GET).path(VERIFY_PATH);
            then.status(500).body("oops");
        })
        .await;
    let client = client_for(&server);

    assert!(!client.is_payment_successful("20240117120000123").await);
    assert!(!client.is_payment_successful("").await);
    assert_eq!(client.metrics().request_count("verify", "HTTP_ERROR"), 1);
    assert_eq!(client.metrics().request_count("verify", "INVALID_PARAMS"), 1);
}

#[tokio::test]
async fn payment_success_check_is_false_when_gateway_unreachable() {
    let client = EpsClient::builder(config())
        .with_endpoints(Endpoints::with_base_url("http://127.0.0.1:1"))
        .build()
        .expect("client builds");

    assert!(!client.is_payment_successful("20240117120000123").await);
    assert_eq!(client.metrics().request_count("verify", "NETWORK_ERROR"), 1);
}
