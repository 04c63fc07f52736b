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

use crate::error::Error;
use http::Method;
use serde_json::Value;
use std::fmt::Debug;

/// Callbacks run around every API call made by a [`CatalogClient`](super::CatalogClient).
///
/// Hooks run in the order they were added to the builder.
#[async_trait::async_trait]
pub trait RequestHooks: Debug {
    fn name(&self) -> &'static str;

    /// Runs before the request is sent. May rewrite the body; an error aborts the call.
    async fn before_request(
        &self,
        _method: &Method,
        _path: &str,
        _body: &mut Option<Value>,
    ) -> Result<(), Error> {
        Ok(())
    }

    /// Runs after the call completed, successfully or not.
    async fn after_execute(&self, _method: &Method, _path: &str, _resp: &Result<Value, Error>) {}
}
