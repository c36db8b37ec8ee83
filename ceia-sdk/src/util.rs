use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::errors::{Error, RequestError, Result};

/// Convert non-2xx responses into a structured error that includes the server message.
///
/// If the status is successful (2xx), the original response is returned.
/// If the status is an error (4xx or 5xx), the response body is consumed to
/// build a `RequestError::Server`. The backend reports failures as
/// `{"message": "..."}`; that field is preferred over the raw body.
pub(crate) async fn check_http_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string()
    });

    Err(Error::from(RequestError::Server { status, message }))
}

/// Read a JSON body. An empty body reads as JSON `null`.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    let bytes: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };

    Ok(serde_json::from_slice(bytes)?)
}

fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match value.get("message").and_then(serde_json::Value::as_str) {
            Some(message) => Some(message.to_string()),
            None => Some(body.to_string()),
        },
        Err(_) => Some(body.to_string()),
    }
}
