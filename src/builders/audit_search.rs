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

use crate::client::CatalogClient;
use crate::error::ValidationErr;
use crate::search::{AuditSearchKind, AuditSearchRequest};
use crate::types::{SearchApi, SearchRequest, ToSearchRequest};
use typed_builder::TypedBuilder;

/// Argument builder for the [`audit_search()`](crate::client::CatalogClient::audit_search) API.
#[derive(Clone, Debug, TypedBuilder)]
pub struct AuditSearch {
    #[builder(!default)]
    client: CatalogClient,
    #[builder(!default)]
    request: AuditSearchRequest,
    #[builder(default = false)]
    bulk: bool,
}

impl SearchApi for AuditSearch {}

pub type AuditSearchBldr = AuditSearchBuilder<((CatalogClient,), (AuditSearchRequest,), ())>;

impl ToSearchRequest for AuditSearch {
    type Kind = AuditSearchKind;

    fn to_search_request(self) -> Result<SearchRequest<AuditSearchKind>, ValidationErr> {
        Ok(SearchRequest {
            client: self.client,
            criteria: self.request,
            bulk: self.bulk,
        })
    }
}
