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

//! # Catalog Rust SDK (`catalog-rs`)
//!
//! An async client for the search APIs of a metadata catalog: asset (index)
//! search, entity audit search and search-log search.
//!
//! Each search has a request builder on [`client::CatalogClient`]
//! ([`index_search`](client::CatalogClient::index_search),
//! [`audit_search`](client::CatalogClient::audit_search),
//! [`search_log`](client::CatalogClient::search_log)). All builders implement
//! [`types::SearchApi`], whose async [`send`](types::SearchApi::send) returns
//! the first page as a [`search::SearchResults`].
//!
//! ## Basic Usage
//!
//! ```no_run
//! use catalog::client::CatalogClient;
//! use catalog::search::AuditSearchRequest;
//! use catalog::types::{SearchApi, ToStream};
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = CatalogClient::from_env().unwrap(); // CATALOG_BASE_URL, CATALOG_API_KEY
//!
//!     let results = client
//!         .audit_search(AuditSearchRequest::by_user("jsmith", 100))
//!         .build()
//!         .send()
//!         .await
//!         .expect("request failed");
//!
//!     println!("{} audit entries", results.count());
//!     let mut entries = results.to_stream().await;
//!     while let Some(entry) = entries.next().await {
//!         println!("{:?}", entry.unwrap().action);
//!     }
//! }
//! ```
//!
//! ## Paging
//! - Small result sets page by offset (`from`/`size`)
//! - Bulk searches, and any search matching more records than the server's
//!   result window allows, page by creation timestamp and never return a
//!   record twice
//!
//! ## Design
//! - Each API method on the [`client::CatalogClient`] returns a builder struct
//! - Builders implement [`types::ToSearchRequest`] for request conversion and [`types::SearchApi`] for execution
//! - Requests go through a [`transport::Transport`], by default JSON over HTTP with retries

#![allow(clippy::result_large_err)]

pub mod auth;
pub mod builders;
pub mod client;
pub mod config;
pub mod dsl;
pub mod error;
pub mod model;
pub mod search;
pub mod transport;
pub mod types;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;
