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

use crate::builders::{AuditSearch, AuditSearchBldr};
use crate::client::CatalogClient;
use crate::search::AuditSearchRequest;

impl CatalogClient {
    /// Creates an [`AuditSearch`] request builder.
    ///
    /// To execute the request, call [`AuditSearch::send()`](crate::types::SearchApi::send),
    /// which returns a [`Result`] containing the first page of
    /// [`AuditSearchResults`](crate::search::AuditSearchResults).
    pub fn audit_search(&self, request: AuditSearchRequest) -> AuditSearchBldr {
        AuditSearch::builder().client(self.clone()).request(request)
    }
}
