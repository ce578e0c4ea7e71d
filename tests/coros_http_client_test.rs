// ABOUTME: Wire-level tests for the reqwest-backed COROS transport
// ABOUTME: Uses a mock HTTP server to check headers, query encoding and body handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use common::{coros_config, envelope_ok, login_ok, ManualClock};
use fitgo::config::CorosConfig;
use fitgo::constants::coros::{self, endpoints};
use fitgo::coros::{
    ActivityAggregator, CorosTransport, HttpCorosClient, SessionCache, UpstreamRequest,
};
use fitgo::errors::ErrorCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> CorosConfig {
    CorosConfig {
        api_base: server.uri(),
        ..coros_config()
    }
}

#[tokio::test]
async fn test_sends_device_user_agent_and_access_token() {
    common::init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activity/query"))
        .and(header("user-agent", coros::USER_AGENT))
        .and(header(coros::ACCESS_TOKEN_HEADER, "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope_ok(&json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpCorosClient::new(&config_for(&server)).unwrap();
    let body = client
        .send(UpstreamRequest::get(endpoints::ACTIVITY_LIST).with_credential("tok-123"))
        .await
        .unwrap();

    assert!(body.contains("0000"));
}

#[tokio::test]
async fn test_query_values_are_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/activity/detail/query"))
        .and(query_param("labelId", "476 a&b=c"))
        .and(query_param("sportType", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpCorosClient::new(&config_for(&server)).unwrap();
    client
        .send(
            UpstreamRequest::post(endpoints::ACTIVITY_DETAIL)
                .with_query("labelId", "476 a&b=c")
                .with_query("sportType", "100"),
        )
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    let query = received[0].url.query().unwrap_or_default().to_owned();
    assert!(!query.contains(' '));
    assert!(query.contains("labelId=476+a%26b%3Dc"));
}

#[tokio::test]
async fn test_body_is_returned_for_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"result":"9999"}"#))
        .mount(&server)
        .await;

    let client = HttpCorosClient::new(&config_for(&server)).unwrap();
    let body = client
        .send(UpstreamRequest::get(endpoints::ACTIVITY_LIST))
        .await
        .unwrap();

    assert_eq!(body, r#"{"result":"9999"}"#);
}

#[tokio::test]
async fn test_unreachable_upstream_is_transport_error() {
    let config = CorosConfig {
        api_base: "http://127.0.0.1:1".to_owned(),
        ..coros_config()
    };
    let client = HttpCorosClient::new(&config).unwrap();

    let err = client
        .send(UpstreamRequest::get(endpoints::ACTIVITY_LIST))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    assert!(err.source.is_some());
    assert!(err.chain().len() > err.to_string().len());
}

#[test]
fn test_invalid_base_url_is_config_invalid() {
    let config = CorosConfig {
        api_base: "not a url".to_owned(),
        ..coros_config()
    };

    let err = HttpCorosClient::new(&config).unwrap_err();

    assert_eq!(err.code, ErrorCode::ConfigInvalid);
}

#[tokio::test]
async fn test_login_then_detail_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/account/login"))
        .and(body_json(json!({
            "account": 12345,
            "accountType": 2,
            "pwd": "hashed-secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_ok("wire-token")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/activity/detail/query"))
        .and(header(coros::ACCESS_TOKEN_HEADER, "wire-token"))
        .and(query_param("screenW", "781"))
        .and(query_param("screenH", "1440"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope_ok(&json!({
            "lapList": [{ "type": 2, "lapItemList": [{ "lapIndex": 1 }] }],
            "summary": { "distance": 100_000 }
        }))))
        .expect(2)
        .mount(&server)
        .await;

    let transport = Arc::new(HttpCorosClient::new(&config_for(&server)).unwrap());
    let session = Arc::new(SessionCache::new(
        transport.clone(),
        Arc::new(ManualClock::starting_2025()),
        config_for(&server),
    ));
    let aggregator = ActivityAggregator::new(transport, session);

    let first = aggregator.fetch_summary("abc", "100").await.unwrap();
    let second = aggregator.fetch_summary("abc", "100").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.lap_list.len(), 1);
    assert_eq!(first.summary.get("distance"), Some(&json!(100_000)));
}
