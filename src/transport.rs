// Catalog Rust Client Library
// Copyright 2025 catalog-rs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Moves JSON requests to the catalog service and back.

use crate::auth::BoxedCatalogAuth;
use crate::config::RetryConfig;
use crate::error::{Error, NetworkError, ServerError, ValidationErr};
use async_trait::async_trait;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use http::Method;
use serde_json::Value;
use std::fmt::Debug;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// Header carrying a per-request id, echoed in server logs.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// A way of executing catalog API calls.
///
/// [`HttpTransport`] is the production implementation. Other implementations
/// can be plugged into [`CatalogClientBuilder::transport`](crate::client::CatalogClientBuilder::transport),
/// e.g. in-memory catalogs for tests.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Executes one API call and returns the decoded JSON response body.
    ///
    /// `path` is relative to the tenant base URL, e.g. `/api/meta/search/indexsearch`.
    async fn execute(&self, method: Method, path: &str, body: Option<Value>)
    -> Result<Value, Error>;
}

/// JSON-over-HTTP transport with authentication and retries.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: Url,
    auth: BoxedCatalogAuth,
    retry: RetryConfig,
}

impl HttpTransport {
    pub fn new(
        http_client: reqwest::Client,
        base_url: Url,
        auth: BoxedCatalogAuth,
        retry: RetryConfig,
    ) -> Self {
        Self {
            http_client,
            base_url,
            auth,
            retry,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Appends `path` to the base URL, keeping any path prefix the base URL has.
    pub fn url_for(&self, path: &str) -> Result<Url, ValidationErr> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ValidationErr::InvalidBaseUrl {
            url: joined,
            cause: e.to_string(),
        })
    }

    fn headers(&self, with_body: bool) -> Result<HeaderMap, ValidationErr> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if with_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.insert(
            X_REQUEST_ID,
            HeaderValue::from_str(&Uuid::new_v4().to_string())?,
        );
        self.auth.authenticate(&mut headers)?;
        Ok(headers)
    }
}

/// Reads a `Retry-After` header given in seconds.
pub(crate) fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, Error> {
        let url = self.url_for(path)?;
        let body = body
            .map(|b| serde_json::to_vec(&b))
            .transpose()
            .map_err(ValidationErr::from)?;

        let mut attempt: u32 = 0;
        loop {
            let mut req = self
                .http_client
                .request(method.clone(), url.clone())
                .headers(self.headers(body.is_some())?);
            if let Some(b) = &body {
                req = req.body(b.clone());
            }

            let resp = match req.send().await {
                Ok(r) => r,
                Err(e) if is_transient(&e) && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay_for(attempt, None);
                    log::warn!(
                        "{method} {path}: {e}; retry {attempt}/{} in {delay:?}",
                        self.retry.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                Err(e) => return Err(NetworkError::ReqwestError(e).into()),
            };

            let status = resp.status();
            if status.is_success() {
                let bytes = resp.bytes().await.map_err(NetworkError::ReqwestError)?;
                if bytes.is_empty() {
                    return Ok(Value::Null);
                }
                return serde_json::from_slice(&bytes).map_err(|e| Error::Decode {
                    what: "response body",
                    source: e,
                });
            }

            if self.retry.should_retry(status.as_u16()) && attempt < self.retry.max_retries {
                attempt += 1;
                let delay = self.retry.delay_for(attempt, retry_after(resp.headers()));
                log::warn!(
                    "{method} {path}: HTTP {status}; retry {attempt}/{} in {delay:?}",
                    self.retry.max_retries
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            let bytes = resp.bytes().await.map_err(NetworkError::ReqwestError)?;
            let err = ServerError::from_status(status, &bytes);
            log::debug!("{method} {path}: {err}");
            return Err(err.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ApiKeyAuth, NoAuth};
    use crate::error::ErrorKind;
    use http::header::AUTHORIZATION;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            Arc::new(ApiKeyAuth::new("k-123")),
            RetryConfig::default(),
        )
    }

    #[test]
    fn url_for_keeps_base_path() {
        let t = transport("https://tenant.example.com/");
        assert_eq!(
            t.url_for("/api/meta/search/indexsearch").unwrap().as_str(),
            "https://tenant.example.com/api/meta/search/indexsearch"
        );
        let t = transport("http://localhost:8080/proxy/");
        assert_eq!(
            t.url_for("api/meta/entity/auditSearch").unwrap().as_str(),
            "http://localhost:8080/proxy/api/meta/entity/auditSearch"
        );
    }

    #[test]
    fn headers_carry_auth_and_request_id() {
        let t = transport("https://tenant.example.com");
        let h = t.headers(true).unwrap();
        assert_eq!(h.get(AUTHORIZATION).unwrap(), "Bearer k-123");
        assert_eq!(h.get(CONTENT_TYPE).unwrap(), "application/json");
        let id = h.get(X_REQUEST_ID).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());

        let anon = HttpTransport::new(
            reqwest::Client::new(),
            Url::parse("https://tenant.example.com").unwrap(),
            Arc::new(NoAuth),
            RetryConfig::disabled(),
        );
        let h = anon.headers(false).unwrap();
        assert!(h.get(AUTHORIZATION).is_none());
        assert!(h.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn retry_after_seconds() {
        let mut h = HeaderMap::new();
        assert_eq!(retry_after(&h), None);
        h.insert(RETRY_AFTER, HeaderValue::from_static("3"));
        assert_eq!(retry_after(&h), Some(Duration::from_secs(3)));
        h.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after(&h), None);
    }

    fn response(status: &str, extra_headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n{extra_headers}\r\n{body}",
            body.len()
        )
    }

    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let Ok(n) = socket.read(&mut chunk).await else {
                return;
            };
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + len {
                    return;
                }
            }
        }
    }

    /// Answers each connection with the next canned response, repeating the
    /// last one, and counts the requests served.
    async fn serve(responses: Vec<String>) -> (Url, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                read_request(&mut socket).await;
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let reply = &responses[n.min(responses.len() - 1)];
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        (url, hits)
    }

    fn retrying(url: Url, retry: RetryConfig) -> HttpTransport {
        HttpTransport::new(reqwest::Client::new(), url, Arc::new(NoAuth), retry)
    }

    fn fast_retries(n: u32) -> RetryConfig {
        RetryConfig::default()
            .max_retries(n)
            .backoff_factor(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn retries_unavailable_then_succeeds() {
        let (url, hits) = serve(vec![
            response("503 Service Unavailable", "", r#"{"errorMessage":"busy"}"#),
            response("200 OK", "", r#"{"approximateCount":1}"#),
        ])
        .await;
        let t = retrying(url, fast_retries(3));

        let body = t
            .execute(Method::POST, "/api/meta/search/indexsearch", Some(json!({"dsl": {}})))
            .await
            .unwrap();
        assert_eq!(body, json!({"approximateCount": 1}));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_retries_return_last_server_error() {
        let (url, hits) = serve(vec![response(
            "503 Service Unavailable",
            "",
            r#"{"errorCode":"ATLAS-503-00-001","errorMessage":"busy"}"#,
        )])
        .await;
        let t = retrying(url, fast_retries(2));

        let err = t
            .execute(Method::POST, "/api/meta/search/indexsearch", Some(json!({})))
            .await
            .unwrap_err();
        match err {
            Error::Server(e) => assert_eq!(e.status(), 503),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let (url, hits) = serve(vec![response(
            "400 Bad Request",
            "",
            r#"{"errorCode":"ATLAS-400-00-001","errorMessage":"bad dsl"}"#,
        )])
        .await;
        let t = retrying(url, fast_retries(3));

        let err = t
            .execute(Method::POST, "/api/meta/search/indexsearch", Some(json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.server_kind(), Some(ErrorKind::InvalidRequest));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_after_overrides_backoff() {
        let (url, hits) = serve(vec![
            response("429 Too Many Requests", "Retry-After: 0\r\n", "{}"),
            response("200 OK", "", "{}"),
        ])
        .await;
        let t = retrying(
            url,
            RetryConfig::default()
                .max_retries(1)
                .backoff_factor(Duration::from_secs(60)),
        );

        let started = Instant::now();
        let body = tokio::time::timeout(
            Duration::from_secs(10),
            t.execute(Method::POST, "/api/meta/entity/auditSearch", Some(json!({}))),
        )
        .await
        .expect("Retry-After: 0 should not wait for the 60s backoff")
        .unwrap();
        assert_eq!(body, json!({}));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn connection_errors_are_retried() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
        drop(listener);
        let t = retrying(
            url,
            RetryConfig::default()
                .max_retries(2)
                .backoff_factor(Duration::from_millis(40)),
        );

        let started = Instant::now();
        let err = t
            .execute(Method::POST, "/api/meta/search/searchlog", Some(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
        // two backoffs: 40ms then 80ms
        assert!(started.elapsed() >= Duration::from_millis(120));
    }
}
