use httpmock::prelude::*;
use is_in_country::{ErrorCategory, LocationQuery, VerificationClient, VerificationOutcome};
use std::time::Duration;

fn france() -> LocationQuery {
    LocationQuery::new(48.8566, 2.3522, "FR").unwrap()
}

fn success_body(inside: bool, country_name: &str, lat: f64, lon: f64) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "data": {
            "is_inside_country": inside,
            "latitude": lat,
            "longitude": lon,
            "country_code": "FR",
            "country_name": country_name,
            "checked_at": "2024-01-01T00:00:00Z"
        }
    })
}

fn configured_client(server: &MockServer) -> VerificationClient {
    let mut client = VerificationClient::new().unwrap();
    client.configure(&server.base_url());
    client
}

#[tokio::test]
async fn test_successful_check_is_verified() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/check");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(r#"{"success":true,"data":{"is_inside_country":true,"latitude":48.85,"longitude":2.35,"country_code":"FR","country_name":"France","checked_at":"2024-01-01T00:00:00Z"}}"#);
        })
        .await;

    let client = configured_client(&server);
    let outcome = client.check(&france()).await;

    api_mock.assert_async().await;
    match outcome {
        VerificationOutcome::Verified(v) => {
            assert!(v.is_inside);
            assert_eq!(v.country_name, "France");
            assert_eq!(v.latitude, 48.85);
            assert_eq!(v.longitude, 2.35);
            assert_eq!(v.checked_at, "2024-01-01T00:00:00Z");
            assert!(v.checked_at_utc().is_some());
        }
        other => panic!("expected a verified outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_outside_verdict() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/check");
            then.status(200)
                .json_body(success_body(false, "France", 51.5, -0.12));
        })
        .await;

    let client = configured_client(&server);
    let query = LocationQuery::new(51.5, -0.12, "FR").unwrap();

    assert_eq!(client.check(&query).await.is_inside(), Some(false));
}

#[tokio::test]
async fn test_application_failure_is_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/check");
            then.status(200)
                .body(r#"{"success":false,"error":"point outside supported region"}"#);
        })
        .await;

    let client = configured_client(&server);

    match client.check(&france()).await {
        VerificationOutcome::Failed(f) => {
            assert_eq!(f.category, ErrorCategory::ServerError);
            assert!(f.reason.contains("point outside supported region"));
            assert_eq!(f.reason, "Server error: point outside supported region");
        }
        other => panic!("expected a failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_500_is_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/check");
            then.status(500).body("database unavailable");
        })
        .await;

    let client = configured_client(&server);

    match client.check(&france()).await {
        VerificationOutcome::Failed(f) => {
            assert_eq!(f.category, ErrorCategory::ServerError);
            assert!(f.reason.contains("500"));
            assert_eq!(f.reason, "Server error (500): database unavailable");
        }
        other => panic!("expected a failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_error_without_body_reports_unknown_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/check");
            then.status(404);
        })
        .await;

    let client = configured_client(&server);
    let outcome = client.check(&france()).await;

    assert_eq!(
        outcome,
        VerificationOutcome::failed("Server error (404): Unknown error", ErrorCategory::ServerError)
    );
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/check");
            then.status(200).body("<html>gateway</html>");
        })
        .await;

    let client = configured_client(&server);

    match client.check(&france()).await {
        VerificationOutcome::Failed(f) => {
            assert_eq!(f.category, ErrorCategory::ParseError);
            assert!(f.reason.starts_with("Response parsing error: "));
        }
        other => panic!("expected a failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_truncated_body_after_200_is_parse_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    // promises 500 bytes, sends a fragment, then hangs up
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.ends_with(b"}") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 500\r\n\r\n{\"success\":true")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let mut client = VerificationClient::new().unwrap();
    client.configure(&format!("http://127.0.0.1:{}", port));

    let outcome = client.check(&france()).await;
    server.await.unwrap();

    match outcome {
        VerificationOutcome::Failed(f) => {
            assert_eq!(f.category, ErrorCategory::ParseError);
            assert!(f.reason.starts_with("Response parsing error: "));
            assert!(!f.category.is_retryable());
        }
        other => panic!("expected a failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // bind then drop a listener so the port is known to be closed
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut client = VerificationClient::new().unwrap();
    client.configure(&format!("http://127.0.0.1:{}/", port));

    match client.check(&france()).await {
        VerificationOutcome::Failed(f) => {
            assert_eq!(f.category, ErrorCategory::NetworkError);
            assert!(f.reason.starts_with("Network error: "));
            assert!(f.category.is_retryable());
        }
        other => panic!("expected a failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_response_times_out_as_network_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/check");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(success_body(true, "France", 48.85, 2.35));
        })
        .await;

    let mut client = VerificationClient::with_timeout(Duration::from_millis(300)).unwrap();
    client.configure(&server.base_url());

    let outcome = client.check(&france()).await;

    assert_eq!(outcome.category(), Some(ErrorCategory::NetworkError));
}

#[tokio::test]
async fn test_trailing_slash_yields_same_request_path() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/check");
            then.status(200)
                .json_body(success_body(true, "France", 48.85, 2.35));
        })
        .await;

    let mut client = VerificationClient::new().unwrap();
    client.configure(&format!("{}/", server.base_url()));
    assert!(client.check(&france()).await.is_verified());

    client.configure(&server.base_url());
    assert!(client.check(&france()).await.is_verified());

    assert_eq!(api_mock.hits_async().await, 2);
}

#[tokio::test]
async fn test_concurrent_checks_do_not_cross_talk() {
    let server = MockServer::start_async().await;
    let paris = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/check")
                .json_body(serde_json::json!({"latitude": 48.8566, "longitude": 2.3522, "country_code": "FR"}));
            then.status(200)
                .delay(Duration::from_millis(200))
                .json_body(success_body(true, "France", 48.8566, 2.3522));
        })
        .await;
    let tokyo = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/check")
                .json_body(serde_json::json!({"latitude": 35.6762, "longitude": 139.6503, "country_code": "FR"}));
            then.status(200)
                .json_body(success_body(false, "France", 35.6762, 139.6503));
        })
        .await;

    let client = configured_client(&server);
    let paris_query = france();
    let tokyo_query = LocationQuery::new(35.6762, 139.6503, "FR").unwrap();

    let (a, b) = tokio::join!(
        client.spawn_check(paris_query),
        client.spawn_check(tokyo_query)
    );
    let a = a.unwrap().into_result().unwrap();
    let b = b.unwrap().into_result().unwrap();

    assert!(a.is_inside);
    assert_eq!(a.latitude, 48.8566);
    assert!(!b.is_inside);
    assert_eq!(b.latitude, 35.6762);

    paris.assert_hits_async(1).await;
    tokyo.assert_hits_async(1).await;
}
