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

use crate::builders::{SearchLogSearch, SearchLogSearchBldr};
use crate::client::CatalogClient;
use crate::search::SearchLogRequest;

impl CatalogClient {
    /// Creates a [`SearchLogSearch`] request builder.
    ///
    /// To execute the request, call [`SearchLogSearch::send()`](crate::types::SearchApi::send).
    /// View statistics of the result are read with
    /// [`user_views()`](crate::search::SearchResults::user_views) and
    /// [`asset_views()`](crate::search::SearchResults::asset_views).
    pub fn search_log(&self, request: SearchLogRequest) -> SearchLogSearchBldr {
        SearchLogSearch::builder().client(self.clone()).request(request)
    }
}
