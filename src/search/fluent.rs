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

//! Composable asset search.
//!
//! ```no_run
//! use catalog::client::CatalogClient;
//! use catalog::search::fluent::{self, FluentSearch};
//! use catalog::dsl::SortItem;
//!
//! # async fn example(client: CatalogClient) -> Result<(), catalog::error::Error> {
//! let tables = FluentSearch::new()
//!     .where_(fluent::active_assets())
//!     .where_(fluent::asset_type("Table"))
//!     .sort(SortItem::asc("name.keyword"))
//!     .page_size(100)
//!     .include_on_results("description")
//!     .execute(&client, false)
//!     .await?;
//! println!("{} tables", tables.count());
//! # Ok(())
//! # }
//! ```

use super::{IndexSearchKind, IndexSearchRequest, IndexSearchResults};
use crate::client::CatalogClient;
use crate::dsl::{Aggregation, BoolQuery, DEFAULT_PAGE_SIZE, Dsl, Query, SortItem};
use crate::error::Error;
use crate::types::SearchRequest;
use std::collections::BTreeMap;

/// Matches assets that are not deleted or archived.
pub fn active_assets() -> Query {
    Query::term("__state", "ACTIVE")
}

pub fn asset_type(type_name: &str) -> Query {
    Query::term("__typeName.keyword", type_name)
}

pub fn asset_types<I, S>(type_names: I) -> Query
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Query::terms(
        "__typeName.keyword",
        type_names.into_iter().map(Into::into).collect::<Vec<String>>(),
    )
}

/// Matches assets whose type inherits from any of `type_names`.
pub fn super_types<I, S>(type_names: I) -> Query
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Query::terms(
        "__superTypeNames.keyword",
        type_names.into_iter().map(Into::into).collect::<Vec<String>>(),
    )
}

/// Builds an [`IndexSearchRequest`] from conditions, sorts and aggregations.
///
/// All `where_` conditions must match, no `where_not` condition may match, and
/// at least [`min_somes`](Self::min_somes) of the `where_some` conditions must
/// match.
#[derive(Clone, Debug, PartialEq)]
pub struct FluentSearch {
    wheres: Vec<Query>,
    where_nots: Vec<Query>,
    where_somes: Vec<Query>,
    min_somes: u32,
    sorts: Vec<SortItem>,
    aggregations: BTreeMap<String, Aggregation>,
    page_size: usize,
    includes_on_results: Vec<String>,
    includes_on_relations: Vec<String>,
}

impl Default for FluentSearch {
    fn default() -> Self {
        FluentSearch {
            wheres: Vec::new(),
            where_nots: Vec::new(),
            where_somes: Vec::new(),
            min_somes: 1,
            sorts: Vec::new(),
            aggregations: BTreeMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
            includes_on_results: Vec::new(),
            includes_on_relations: Vec::new(),
        }
    }
}

impl FluentSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition that results must match.
    pub fn where_(mut self, query: Query) -> Self {
        self.wheres.push(query);
        self
    }

    /// Adds a condition that results must not match.
    pub fn where_not(mut self, query: Query) -> Self {
        self.where_nots.push(query);
        self
    }

    /// Adds an optional condition; see [`min_somes`](Self::min_somes).
    pub fn where_some(mut self, query: Query) -> Self {
        self.where_somes.push(query);
        self
    }

    pub fn min_somes(mut self, min: u32) -> Self {
        self.min_somes = min;
        self
    }

    pub fn sort(mut self, sort: SortItem) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn aggregate(mut self, name: impl Into<String>, aggregation: Aggregation) -> Self {
        self.aggregations.insert(name.into(), aggregation);
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Loads an extra attribute on each result.
    pub fn include_on_results(mut self, attribute: impl Into<String>) -> Self {
        self.includes_on_results.push(attribute.into());
        self
    }

    /// Loads an extra attribute on each related asset of a result.
    pub fn include_on_relations(mut self, attribute: impl Into<String>) -> Self {
        self.includes_on_relations.push(attribute.into());
        self
    }

    /// The combined query; `None` when no condition was given.
    pub fn to_query(&self) -> Option<Query> {
        let mut query = BoolQuery {
            filter: self.wheres.clone(),
            must_not: self.where_nots.clone(),
            should: self.where_somes.clone(),
            ..Default::default()
        };
        if !self.where_somes.is_empty() {
            query.minimum_should_match = Some(self.min_somes);
        }
        (!query.is_empty()).then_some(Query::Bool(query))
    }

    pub fn to_request(&self) -> IndexSearchRequest {
        let dsl = Dsl {
            size: self.page_size,
            query: self.to_query(),
            sort: self.sorts.clone(),
            aggregations: self.aggregations.clone(),
            ..Default::default()
        };
        IndexSearchRequest::new(dsl)
            .attributes(self.includes_on_results.iter().cloned())
            .relation_attributes(self.includes_on_relations.iter().cloned())
    }

    /// Runs the search and returns its first page.
    pub async fn execute(&self, client: &CatalogClient, bulk: bool) -> Result<IndexSearchResults, Error> {
        SearchRequest::<IndexSearchKind> {
            client: client.clone(),
            criteria: self.to_request(),
            bulk,
        }
        .execute()
        .await
    }

    /// Number of assets matching the conditions.
    pub async fn count(&self, client: &CatalogClient) -> Result<u64, Error> {
        let mut criteria = self.to_request();
        criteria.dsl.size = 0;
        criteria.dsl.sort.clear();
        criteria.dsl.aggregations.clear();
        SearchRequest::<IndexSearchKind> {
            client: client.clone(),
            criteria,
            bulk: false,
        }
        .count()
        .await
    }
}
