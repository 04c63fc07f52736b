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

//! Authentication providers for catalog requests
//!
//! - **API key** (default): bearer token issued by the catalog tenant
//! - **NoAuth**: for local testing against open endpoints

use crate::error::ValidationErr;
use http::HeaderMap;
use http::header::{AUTHORIZATION, HeaderValue};
use std::fmt::Debug;
use std::sync::Arc;

/// Trait for authenticating catalog requests
///
/// Implementations add whatever headers their scheme needs. The trait is
/// object-safe so a provider can be stored in the client configuration.
pub trait CatalogAuth: Send + Sync + Debug {
    /// Adds authentication headers to an outgoing request.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be rendered as a header.
    fn authenticate(&self, headers: &mut HeaderMap) -> Result<(), ValidationErr>;

    /// Returns a human-readable name for this auth provider
    fn name(&self) -> &'static str;
}

/// API key authentication, sent as a bearer token.
///
/// # Example
///
/// ```
/// use catalog::auth::ApiKeyAuth;
///
/// let auth = ApiKeyAuth::new("eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9...");
/// assert_eq!(auth.token_type(), "Bearer");
/// ```
#[derive(Clone)]
pub struct ApiKeyAuth {
    api_key: String,
    token_type: String,
    /// `<token_type> <api_key>`, rendered once.
    auth_header: String,
}

impl Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview = if self.api_key.len() > 10 {
            format!("{}...", self.api_key.chars().take(6).collect::<String>())
        } else {
            "[REDACTED]".to_string()
        };
        f.debug_struct("ApiKeyAuth")
            .field("api_key", &preview)
            .field("token_type", &self.token_type)
            .finish()
    }
}

impl ApiKeyAuth {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_token_type(api_key, "Bearer")
    }

    /// Uses a custom authorization scheme instead of `Bearer`.
    pub fn with_token_type(api_key: impl Into<String>, token_type: impl Into<String>) -> Self {
        let api_key = api_key.into();
        let token_type = token_type.into();
        let auth_header = format!("{} {}", token_type, api_key);
        Self {
            api_key,
            token_type,
            auth_header,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }
}

impl CatalogAuth for ApiKeyAuth {
    fn authenticate(&self, headers: &mut HeaderMap) -> Result<(), ValidationErr> {
        let mut value = HeaderValue::from_str(&self.auth_header)?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ApiKeyAuth"
    }
}

/// No authentication
///
/// Adds no headers. Only useful against local or mock endpoints.
#[derive(Clone, Debug, Default)]
pub struct NoAuth;

impl NoAuth {
    pub fn new() -> Self {
        Self
    }
}

impl CatalogAuth for NoAuth {
    fn authenticate(&self, _headers: &mut HeaderMap) -> Result<(), ValidationErr> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "NoAuth"
    }
}

/// Type alias for a shared auth provider
pub type BoxedCatalogAuth = Arc<dyn CatalogAuth>;
