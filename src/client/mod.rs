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

//! Catalog client and its builder

use crate::auth::{ApiKeyAuth, BoxedCatalogAuth, NoAuth};
use crate::config::ClientConfig;
use crate::error::{Error, ValidationErr};
use crate::transport::{HttpTransport, Transport};
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

mod audit_search;
mod hooks;
mod index_search;
mod search_log;

pub use hooks::RequestHooks;

/// Configuration for the HTTP connection pool.
///
/// # Example
///
/// ```
/// use catalog::client::ConnectionPoolConfig;
/// use std::time::Duration;
///
/// // long-running bulk extraction
/// let config = ConnectionPoolConfig::default()
///     .max_idle_per_host(4)
///     .idle_timeout(Duration::from_secs(300));
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionPoolConfig {
    /// Maximum number of idle connections per host. Default: 8
    pub max_idle_per_host: usize,

    /// How long idle connections are kept in the pool. Default: 90 seconds
    pub idle_timeout: std::time::Duration,

    /// TCP keepalive interval. Default: 60 seconds
    pub tcp_keepalive: std::time::Duration,

    /// Enable TCP_NODELAY. Default: true
    pub tcp_nodelay: bool,
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 8,
            idle_timeout: std::time::Duration::from_secs(90),
            tcp_keepalive: std::time::Duration::from_secs(60),
            tcp_nodelay: true,
        }
    }
}

impl ConnectionPoolConfig {
    pub fn max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }

    pub fn idle_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn tcp_keepalive(mut self, interval: std::time::Duration) -> Self {
        self.tcp_keepalive = interval;
        self
    }

    pub fn tcp_nodelay(mut self, enable: bool) -> Self {
        self.tcp_nodelay = enable;
        self
    }
}

/// Builds a [`CatalogClient`] from a [`ClientConfig`].
#[derive(Debug)]
pub struct CatalogClientBuilder {
    config: ClientConfig,
    /// Overrides the API key of the config.
    auth: Option<BoxedCatalogAuth>,
    /// Replaces the HTTP transport, e.g. with an in-memory catalog.
    transport: Option<Arc<dyn Transport>>,
    client_hooks: Vec<Arc<dyn RequestHooks + Send + Sync + 'static>>,
    /// (app_name, app_version), appended to the user agent.
    app_info: Option<(String, String)>,
    connection_pool_config: ConnectionPoolConfig,
}

impl CatalogClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            auth: None,
            transport: None,
            client_hooks: Vec::new(),
            app_info: None,
            connection_pool_config: ConnectionPoolConfig::default(),
        }
    }

    /// Builder configured from `CATALOG_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationErr> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    /// Add a client hook to the builder. Hooks will be called after each other in
    /// order they were added.
    pub fn hook(mut self, hooks: Arc<dyn RequestHooks + Send + Sync + 'static>) -> Self {
        self.client_hooks.push(hooks);
        self
    }

    pub fn auth<A: crate::auth::CatalogAuth + 'static>(mut self, auth: A) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }

    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set the app info as an Option of (app_name, app_version) pair. This will
    /// show up in the client's user-agent.
    pub fn app_info(mut self, app_info: Option<(String, String)>) -> Self {
        self.app_info = app_info;
        self
    }

    pub fn connection_pool_config(mut self, config: ConnectionPoolConfig) -> Self {
        self.connection_pool_config = config;
        self
    }

    fn user_agent(&self) -> String {
        let mut user_agent = String::from("catalog-rs/")
            + env!("CARGO_PKG_VERSION")
            + " ("
            + std::env::consts::OS
            + "; "
            + std::env::consts::ARCH
            + ")";
        if let Some((app_name, app_version)) = &self.app_info {
            user_agent.push_str(format!(" {app_name}/{app_version}").as_str());
        }
        user_agent
    }

    /// Build the client.
    pub fn build(self) -> Result<CatalogClient, Error> {
        let transport = match self.transport.clone() {
            Some(t) => t,
            None => Arc::new(self.http_transport()?) as Arc<dyn Transport>,
        };
        Ok(CatalogClient {
            shared: Arc::new(SharedClientItems {
                base_url: self.config.base_url,
                transport,
                client_hooks: self.client_hooks,
            }),
        })
    }

    fn http_transport(&self) -> Result<HttpTransport, ValidationErr> {
        let pool_config = &self.connection_pool_config;
        let mut builder = reqwest::Client::builder()
            .tcp_nodelay(pool_config.tcp_nodelay)
            .tcp_keepalive(pool_config.tcp_keepalive)
            .pool_max_idle_per_host(pool_config.max_idle_per_host)
            .pool_idle_timeout(pool_config.idle_timeout)
            .connect_timeout(self.config.connect_timeout)
            .timeout(self.config.read_timeout)
            .user_agent(self.user_agent());

        #[cfg(feature = "http2")]
        {
            builder = builder.http2_adaptive_window(true);
        }

        let http_client = builder.build().map_err(ValidationErr::HttpClient)?;
        let auth: BoxedCatalogAuth = match (&self.auth, &self.config.api_key) {
            (Some(auth), _) => auth.clone(),
            (None, Some(key)) => Arc::new(ApiKeyAuth::new(key.clone())),
            (None, None) => Arc::new(NoAuth),
        };
        log::debug!(
            "catalog client for {} using {}",
            self.config.base_url,
            auth.name()
        );
        Ok(HttpTransport::new(
            http_client,
            self.config.base_url.clone(),
            auth,
            self.config.retry.clone(),
        ))
    }
}

/// Client for the catalog's search APIs.
///
/// Cheap to clone; clones share the transport and hooks.
#[derive(Clone, Debug)]
pub struct CatalogClient {
    pub(crate) shared: Arc<SharedClientItems>,
}

impl CatalogClient {
    /// Returns a client for the tenant at `base_url`, authenticating with `api_key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog::client::CatalogClient;
    ///
    /// let client = CatalogClient::new("https://tenant.example.com", Some("api-key")).unwrap();
    /// assert_eq!(client.base_url().host_str(), Some("tenant.example.com"));
    /// ```
    pub fn new(base_url: &str, api_key: Option<&str>) -> Result<Self, Error> {
        let mut config = ClientConfig::new(base_url)?;
        config.api_key = api_key.map(str::to_string);
        CatalogClientBuilder::new(config).build()
    }

    /// Returns a client configured from `CATALOG_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        CatalogClientBuilder::from_env()?.build()
    }

    pub fn builder(config: ClientConfig) -> CatalogClientBuilder {
        CatalogClientBuilder::new(config)
    }

    pub fn base_url(&self) -> &Url {
        &self.shared.base_url
    }

    /// Executes one API call through the hooks and the transport.
    pub async fn call_api(
        &self,
        method: Method,
        path: &str,
        mut body: Option<Value>,
    ) -> Result<Value, Error> {
        self.run_before_request_hooks(&method, path, &mut body)
            .await?;
        let resp = self
            .shared
            .transport
            .execute(method.clone(), path, body)
            .await;
        self.run_after_execute_hooks(&method, path, &resp).await;
        resp
    }

    async fn run_before_request_hooks(
        &self,
        method: &Method,
        path: &str,
        body: &mut Option<Value>,
    ) -> Result<(), Error> {
        for hook in self.shared.client_hooks.iter() {
            hook.before_request(method, path, body)
                .await
                .inspect_err(|e| log::warn!("Hook {} failed {e}", hook.name()))?;
        }
        Ok(())
    }

    async fn run_after_execute_hooks(&self, method: &Method, path: &str, resp: &Result<Value, Error>) {
        for hook in self.shared.client_hooks.iter() {
            hook.after_execute(method, path, resp).await;
        }
    }
}

#[derive(Debug)]
pub(crate) struct SharedClientItems {
    pub(crate) base_url: Url,
    transport: Arc<dyn Transport>,
    client_hooks: Vec<Arc<dyn RequestHooks + Send + Sync + 'static>>,
}
