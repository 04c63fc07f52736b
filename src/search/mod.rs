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

//! Paginated searches over assets, entity audits and search logs.
//!
//! All three searches share one results type, [`SearchResults`], which pages
//! either by offset (`from`/`size`) or, for bulk extraction, by creation
//! timestamp. Timestamp paging keeps working past the server's result window
//! and tolerates records being added while the search runs.

pub mod audit;
pub mod fluent;
pub mod index;
pub mod log;
pub(crate) mod paging;
pub mod results;

pub use audit::{AuditSearchKind, AuditSearchRequest, AuditSearchResults};
pub use fluent::FluentSearch;
pub use index::{IndexSearchKind, IndexSearchRequest, IndexSearchResults, RequestMetadata};
pub use log::{SearchLogKind, SearchLogRequest, SearchLogResults};
pub use results::SearchResults;

use crate::dsl::{Dsl, SortItem};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;

/// Request body of a search endpoint. Every request wraps a [`Dsl`].
pub trait SearchCriteria: Clone + Debug + Serialize + Send + Sync + 'static {
    fn dsl(&self) -> &Dsl;
    fn dsl_mut(&mut self) -> &mut Dsl;
}

/// Describes one search endpoint: where it lives, what it returns and how
/// its records are ordered and identified for timestamp paging.
pub trait SearchKind: Send + Sync + 'static {
    type Request: SearchCriteria;
    type Item: Clone + Debug + Send + Sync + 'static;

    /// Name used in log messages.
    const NAME: &'static str;
    const ENDPOINT: &'static str;
    /// Response field holding the page of records.
    const RESULTS_FIELD: &'static str;
    /// Response field holding the total number of matches.
    const COUNT_FIELD: &'static str;
    /// Creation timestamp field used for timestamp paging.
    const TIMESTAMP_FIELD: &'static str;
    /// Result counts above this switch the search to timestamp paging.
    const MASS_EXTRACT_THRESHOLD: u64;

    /// Sorts that make the timestamp ordering total. They never count as user sorts.
    fn tiebreakers() -> Vec<SortItem>;

    fn decode_item(raw: Value) -> Result<Self::Item, serde_json::Error>;

    /// Creation time of a record in epoch millis.
    fn timestamp(item: &Self::Item) -> Option<i64>;

    /// Identity used to drop records already returned by an earlier page.
    fn unique_key(item: &Self::Item) -> String;
}
