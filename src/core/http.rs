//! HTTP utilities shared by the OAuth and fantasy API clients

use crate::{FantasyWearError, Result};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const USER_AGENT: &str = concat!("fantasy-wear/", env!("CARGO_PKG_VERSION"));

/// Upper bound on a whole request, body included.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the process-wide HTTP client. Construct once and share by reference.
pub fn build_http_client() -> Result<Client> {
    build_http_client_with_timeout(HTTP_TIMEOUT)
}

pub fn build_http_client_with_timeout(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Send a request, aborting if `cancel` fires first.
///
/// Non-2xx responses become `FantasyWearError::Status`.
pub async fn send_cancellable(
    builder: RequestBuilder,
    cancel: &CancellationToken,
) -> Result<Response> {
    let response = tokio::select! {
        _ = cancel.cancelled() => return Err(FantasyWearError::Cancelled),
        response = builder.send() => response?,
    };

    let status = response.status();
    if !status.is_success() {
        return Err(FantasyWearError::Status {
            code: status.as_u16(),
        });
    }
    Ok(response)
}

/// Send a request and read the body as text.
pub async fn fetch_text(builder: RequestBuilder, cancel: &CancellationToken) -> Result<String> {
    let response = send_cancellable(builder, cancel).await?;
    tokio::select! {
        _ = cancel.cancelled() => Err(FantasyWearError::Cancelled),
        body = response.text() => Ok(body?),
    }
}

/// Send a request and read the body as raw bytes.
pub async fn fetch_bytes(builder: RequestBuilder, cancel: &CancellationToken) -> Result<Vec<u8>> {
    let response = send_cancellable(builder, cancel).await?;
    tokio::select! {
        _ = cancel.cancelled() => Err(FantasyWearError::Cancelled),
        body = response.bytes() => Ok(body?.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn test_fetch_text_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_string("world"))
            .mount(&mock_server)
            .await;

        let client = build_http_client().unwrap();
        let cancel = CancellationToken::new();
        let body = fetch_text(client.get(format!("{}/hello", mock_server.uri())), &cancel)
            .await
            .unwrap();
        assert_eq!(body, "world");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/denied"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = build_http_client().unwrap();
        let cancel = CancellationToken::new();
        let err = fetch_text(client.get(format!("{}/denied", mock_server.uri())), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(401));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_stalled_request_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&mock_server)
            .await;

        let client = build_http_client_with_timeout(Duration::from_millis(100)).unwrap();
        let err = fetch_text(client.get(mock_server.uri()), &CancellationToken::new())
            .await
            .unwrap_err();
        match &err {
            FantasyWearError::Http(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_io_failure());
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let client = build_http_client().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = fetch_bytes(client.get(mock_server.uri()), &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancellation());
    }
}
