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

//! Error definitions for catalog operations

use http::StatusCode;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Errors detected on the client before or after talking to the server.
#[derive(Error, Debug)]
pub enum ValidationErr {
    #[error(
        "bulk search cannot run with user-specified sorting; remove the sort criteria or search without bulk"
    )]
    BulkSearchWithSorts,

    #[error("invalid page size {0}; must be greater than zero")]
    InvalidPageSize(usize),

    #[error("invalid base URL '{url}': {cause}")]
    InvalidBaseUrl { url: String, cause: String },

    #[error("missing configuration value: {0}")]
    MissingConfig(String),

    #[error("invalid configuration value for {key}: '{value}'")]
    InvalidConfig { key: String, value: String },

    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Errors raised while moving bytes between the client and the server.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("network error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

/// Classification of a non-successful server response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    Authentication,
    Permission,
    NotFound,
    Conflict,
    RateLimit,
    Internal,
    Other,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::InvalidRequest,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Permission,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            429 => ErrorKind::RateLimit,
            500..=599 => ErrorKind::Internal,
            _ => ErrorKind::Other,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidRequest => "invalid request",
            ErrorKind::Authentication => "authentication failed",
            ErrorKind::Permission => "permission denied",
            ErrorKind::NotFound => "not found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::RateLimit => "rate limited",
            ErrorKind::Internal => "server error",
            ErrorKind::Other => "unexpected response",
        };
        f.write_str(s)
    }
}

/// Error body returned by the catalog service.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default, alias = "message")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_cause: Option<String>,
    #[serde(default)]
    pub causes: Vec<ErrorCause>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCause {
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl ErrorResponse {
    /// Parses an error body. Bodies that are not JSON keep their text as the message.
    pub fn parse(body: &[u8]) -> ErrorResponse {
        match serde_json::from_slice::<ErrorResponse>(body) {
            Ok(v) => v,
            Err(_) => ErrorResponse {
                error_message: Some(String::from_utf8_lossy(body).trim().to_string())
                    .filter(|m| !m.is_empty()),
                ..Default::default()
            },
        }
    }

    pub fn message(&self) -> &str {
        self.error_message.as_deref().unwrap_or("")
    }
}

/// Non-2xx responses from the catalog service.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{kind} (HTTP {status}): code: {}, message: {}", .response.error_code.as_deref().unwrap_or("-"), .response.message())]
    Api {
        status: u16,
        kind: ErrorKind,
        response: ErrorResponse,
    },
}

impl ServerError {
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        ServerError::Api {
            status: status.as_u16(),
            kind: ErrorKind::from_status(status.as_u16()),
            response: ErrorResponse::parse(body),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ServerError::Api { status, .. } => *status,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServerError::Api { kind, .. } => *kind,
        }
    }

    pub fn response(&self) -> &ErrorResponse {
        match self {
            ServerError::Api { response, .. } => response,
        }
    }
}

/// Top-level error returned by every client operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErr),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("server error: {0}")]
    Server(#[from] ServerError),

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Returns the server error kind, if this error came from the server.
    pub fn server_kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Server(e) => Some(e.kind()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_json_error_body() {
        let body = br#"{"errorCode":"ATLAS-400-00-029","errorMessage":"Invalid DSL","causes":[{"errorType":"parse","errorMessage":"bad term"}]}"#;
        let resp = ErrorResponse::parse(body);
        assert_eq!(resp.error_code.as_deref(), Some("ATLAS-400-00-029"));
        assert_eq!(resp.message(), "Invalid DSL");
        assert_eq!(resp.causes.len(), 1);
        assert_eq!(resp.causes[0].error_message.as_deref(), Some("bad term"));
    }

    #[test]
    fn parse_plain_text_error_body() {
        let resp = ErrorResponse::parse(b"  upstream connect error  ");
        assert_eq!(resp.error_code, None);
        assert_eq!(resp.message(), "upstream connect error");

        let empty = ErrorResponse::parse(b"");
        assert_eq!(empty.error_message, None);
    }

    #[test]
    fn classify_status_codes() {
        assert_eq!(ErrorKind::from_status(400), ErrorKind::InvalidRequest);
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Authentication);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Permission);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Conflict);
        assert_eq!(ErrorKind::from_status(429), ErrorKind::RateLimit);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::Internal);
        assert_eq!(ErrorKind::from_status(418), ErrorKind::Other);
    }

    #[test]
    fn server_error_display_and_accessors() {
        let err = ServerError::from_status(
            StatusCode::NOT_FOUND,
            br#"{"errorCode":"ATLAS-404-00-005","errorMessage":"Given instance guid abc is invalid/not found"}"#,
        );
        assert_eq!(err.status(), 404);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let text = err.to_string();
        assert!(text.contains("not found (HTTP 404)"));
        assert!(text.contains("ATLAS-404-00-005"));

        let top: Error = err.into();
        assert_eq!(top.server_kind(), Some(ErrorKind::NotFound));
    }
}
