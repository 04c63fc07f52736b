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

//! Traits shared by the search request builders

use crate::client::CatalogClient;
use crate::error::{Error, ValidationErr};
use crate::search::{SearchKind, SearchResults};
use futures_util::Stream;

/// A validated search, ready to run.
#[derive(Clone, Debug)]
pub struct SearchRequest<K: SearchKind> {
    pub client: CatalogClient,
    pub criteria: K::Request,
    /// Page by timestamp from the first page on.
    pub bulk: bool,
}

impl<K: SearchKind> SearchRequest<K> {
    /// Runs the first page of the search.
    pub async fn execute(self) -> Result<SearchResults<K>, Error> {
        SearchResults::execute(self.client, self.criteria, self.bulk).await
    }

    /// Number of matching records, without fetching pages.
    pub async fn count(self) -> Result<u64, Error> {
        crate::search::results::count::<K>(&self.client, &self.criteria).await
    }
}

/// Convert builder to SearchRequest
pub trait ToSearchRequest {
    type Kind: SearchKind;

    /// # Errors
    ///
    /// Returns `ValidationErr` if the request parameters are invalid.
    fn to_search_request(self) -> Result<SearchRequest<Self::Kind>, ValidationErr>;
}

/// Execute a search
pub trait SearchApi: ToSearchRequest {
    /// Send the request and await the first page of results
    ///
    /// # Errors
    ///
    /// Returns `Error` if the request is invalid, fails, or the response cannot be parsed.
    fn send(
        self,
    ) -> impl std::future::Future<Output = Result<SearchResults<Self::Kind>, Error>> + Send
    where
        Self: Sized + Send,
    {
        async move { self.to_search_request()?.execute().await }
    }
}

#[async_trait::async_trait]
pub trait ToStream: Sized {
    type Item;
    async fn to_stream(self) -> Box<dyn Stream<Item = Result<Self::Item, Error>> + Unpin + Send>;
}
