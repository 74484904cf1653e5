//! Shared HTTP client and response classification.

use std::time::Duration;

use curator_config::ClientConfig;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// Stateless client for the server's REST API.
///
/// Joins request paths onto the configured base URL, attaches basic-auth
/// credentials when configured, and decodes JSON bodies.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
}

impl ApiClient {
    /// Build a client from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed,
    /// for example when the configured locale is not a valid header value.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let mut default_headers = HeaderMap::new();
        if let Some(locale) = &config.locale {
            let value = HeaderValue::from_str(locale).map_err(|_| ApiError::InvalidLocale {
                value: locale.clone(),
            })?;
            default_headers.insert(ACCEPT_LANGUAGE, value);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.server.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|source| ApiError::Client { source })?;

        Ok(Self {
            http,
            base_url: config.server.url.clone(),
            username: config.credentials.username.clone(),
            password: config.credentials.password.clone(),
        })
    }

    /// Issue a GET request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or an
    /// undecodable body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let request = self.request(Method::GET, path)?;
        self.execute(path, request).await
    }

    /// Issue a GET request with query parameters and decode the response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or an
    /// undecodable body.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let request = self.request(Method::GET, path)?.query(query);
        self.execute(path, request).await
    }

    /// Issue a POST request with a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or an
    /// undecodable body.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let request = self.request(Method::POST, path)?.json(body);
        self.execute(path, request).await
    }

    /// Issue a PUT request with a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or an
    /// undecodable body.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let request = self.request(Method::PUT, path)?.json(body);
        self.execute(path, request).await
    }

    /// Issue a DELETE request and return the server's message body.
    ///
    /// The server answers deletions with a plain message; a JSON-encoded
    /// string is unwrapped, anything else is returned verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    pub async fn delete(&self, path: &str) -> ApiResult<String> {
        let request = self.request(Method::DELETE, path)?;
        let response = request.send().await.map_err(|source| ApiError::Request {
            path: path.to_string(),
            source,
        })?;
        let status = response.status();
        if status.is_success() {
            let text = response.text().await.map_err(|source| ApiError::Decode {
                path: path.to_string(),
                source,
            })?;
            Ok(serde_json::from_str::<String>(&text).unwrap_or(text))
        } else {
            Err(classify_status(status, &response.bytes().await.unwrap_or_default()))
        }
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self
            .base_url
            .join(path)
            .map_err(|source| ApiError::InvalidUrl {
                path: path.to_string(),
                source,
            })?;
        let mut builder = self.http.request(method, url);
        if let Some(username) = &self.username {
            builder = builder.basic_auth(username, self.password.as_deref());
        }
        Ok(builder)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let response = request.send().await.map_err(|source| ApiError::Request {
            path: path.to_string(),
            source,
        })?;
        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(|source| ApiError::Decode {
                path: path.to_string(),
                source,
            })
        } else {
            debug!(%path, %status, "server returned an error response");
            Err(classify_status(status, &response.bytes().await.unwrap_or_default()))
        }
    }
}

/// Error body shapes the server is known to produce.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(rename = "displayMessage")]
    display_message: Option<String>,
    errors: Option<Vec<Value>>,
}

fn classify_status(status: StatusCode, bytes: &[u8]) -> ApiError {
    let body_text = String::from_utf8_lossy(bytes);
    let message = serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| {
            body.display_message.or_else(|| {
                body.errors
                    .as_ref()
                    .and_then(|errors| errors.first())
                    .map(error_entry_text)
            })
        })
        .unwrap_or_else(|| {
            let trimmed = body_text.trim();
            if trimmed.is_empty() {
                format!("request failed with status {status}")
            } else {
                trimmed.to_string()
            }
        });
    ApiError::Status { status, message }
}

fn error_entry_text(entry: &Value) -> String {
    entry
        .as_str()
        .map_or_else(|| entry.to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prefers_display_message() {
        let body = br#"{"displayMessage": "changeset locked", "errors": ["other"]}"#;
        let err = classify_status(StatusCode::CONFLICT, body);
        assert!(matches!(
            err,
            ApiError::Status { message, .. } if message == "changeset locked"
        ));
    }

    #[test]
    fn classify_falls_back_to_errors_list() {
        let body = br#"{"errors": ["validation failed"]}"#;
        let err = classify_status(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert!(matches!(
            err,
            ApiError::Status { message, .. } if message == "validation failed"
        ));
    }

    #[test]
    fn classify_uses_raw_body_or_status() {
        let err = classify_status(StatusCode::BAD_GATEWAY, b"upstream broke");
        assert!(matches!(
            err,
            ApiError::Status { message, .. } if message == "upstream broke"
        ));

        let err = classify_status(StatusCode::INTERNAL_SERVER_ERROR, b"");
        assert!(matches!(
            err,
            ApiError::Status { message, .. } if message.contains("500")
        ));
    }
}
