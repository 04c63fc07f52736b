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

use crate::builders::{IndexSearch, IndexSearchBldr};
use crate::client::CatalogClient;
use crate::search::IndexSearchRequest;

impl CatalogClient {
    /// Creates an [`IndexSearch`] request builder.
    ///
    /// To execute the request, call [`IndexSearch::send()`](crate::types::SearchApi::send),
    /// which returns a [`Result`] containing the first page of
    /// [`IndexSearchResults`](crate::search::IndexSearchResults).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use catalog::client::CatalogClient;
    /// use catalog::dsl::{Dsl, Query};
    /// use catalog::search::IndexSearchRequest;
    /// use catalog::types::{SearchApi, ToStream};
    /// use futures_util::StreamExt;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = CatalogClient::from_env().unwrap();
    ///     let request = IndexSearchRequest::new(Dsl::with_query(Query::term("__typeName.keyword", "Table")));
    ///     let results = client.index_search(request).bulk(true).build().send().await.unwrap();
    ///     let mut assets = results.to_stream().await;
    ///     while let Some(asset) = assets.next().await {
    ///         println!("{}", asset.unwrap().guid);
    ///     }
    /// }
    /// ```
    pub fn index_search(&self, request: IndexSearchRequest) -> IndexSearchBldr {
        IndexSearch::builder().client(self.clone()).request(request)
    }
}
