//! JSON over HTTP helpers shared by the clients.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use p2wdb_core::error::{P2wdbError, Result};

/// Issues a GET and decodes the JSON body.
///
/// A 404 means the requested entry does not exist and is reported as
/// [`P2wdbError::NotFound`].
pub(crate) async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    debug!(url, "GET");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| P2wdbError::HttpError(e.to_string()))?;

    if response.status() == StatusCode::NOT_FOUND {
        return Err(P2wdbError::NotFound(url.to_string()));
    }

    decode(url, response).await
}

/// Issues a POST with a JSON body and decodes the JSON answer.
pub(crate) async fn post_json<B, T>(client: &Client, url: &str, body: &B) -> Result<T>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    debug!(url, "POST");
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| P2wdbError::HttpError(e.to_string()))?;

    decode(url, response).await
}

async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(P2wdbError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
            body,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| P2wdbError::HttpError(e.to_string()))?;

    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_json_decodes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "a": 1 })))
            .mount(&server)
            .await;

        let value: Value = get_json(&Client::new(), &format!("{}/thing", server.uri()))
            .await
            .unwrap();
        assert_eq!(value, json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn test_not_found_maps_to_not_found() {
        let server = MockServer::start().await;

        let result: Result<Value> = get_json(&Client::new(), &format!("{}/missing", server.uri())).await;
        assert!(matches!(result, Err(P2wdbError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_post_not_found_keeps_status() {
        let server = MockServer::start().await;

        let result: Result<Value> =
            post_json(&Client::new(), &format!("{}/pin-json", server.uri()), &json!({})).await;
        assert!(matches!(result, Err(P2wdbError::HttpStatus { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/write"))
            .and(body_json(json!({ "x": true })))
            .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
            .mount(&server)
            .await;

        let result: Result<Value> =
            post_json(&Client::new(), &format!("{}/write", server.uri()), &json!({ "x": true })).await;

        match result {
            Err(P2wdbError::HttpStatus { status, body, .. }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "try later");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result: Result<Value> = get_json(&Client::new(), &server.uri()).await;
        assert!(matches!(result, Err(P2wdbError::JsonError(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_recoverable() {
        let result: Result<Value> = get_json(&Client::new(), "http://127.0.0.1:1/none").await;
        let err = result.unwrap_err();
        assert!(matches!(err, P2wdbError::HttpError(_)));
        assert!(err.is_recoverable());
    }
}
