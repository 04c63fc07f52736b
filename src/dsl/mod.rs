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

//! Search DSL shared by index, audit and search-log searches

pub mod aggregation;
pub mod query;
pub mod sort;

pub use aggregation::{Aggregation, AggregationBucket, AggregationResult, parse_aggregations};
pub use query::{BoolQuery, Query, Range};
pub use sort::{SortItem, SortOrder};

use serde::Serialize;
use std::collections::BTreeMap;

/// Default number of results per page.
pub const DEFAULT_PAGE_SIZE: usize = 300;

/// Paging, query, sorting and aggregations of a search request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dsl {
    pub from: usize,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Query>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortItem>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub aggregations: BTreeMap<String, Aggregation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_total_hits: Option<bool>,
}

impl Default for Dsl {
    fn default() -> Self {
        Dsl {
            from: 0,
            size: DEFAULT_PAGE_SIZE,
            query: None,
            sort: Vec::new(),
            aggregations: BTreeMap::new(),
            track_total_hits: None,
        }
    }
}

impl Dsl {
    pub fn with_query(query: impl Into<Query>) -> Self {
        Dsl {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn start(mut self, from: usize) -> Self {
        self.from = from;
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn sort(mut self, sort: SortItem) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn aggregation(mut self, name: impl Into<String>, agg: Aggregation) -> Self {
        self.aggregations.insert(name.into(), agg);
        self
    }

    pub fn track_total_hits(mut self, track: bool) -> Self {
        self.track_total_hits = Some(track);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_dsl_json() {
        assert_eq!(
            serde_json::to_value(Dsl::default()).unwrap(),
            json!({"from": 0, "size": 300})
        );
    }

    #[test]
    fn full_dsl_json() {
        let dsl = Dsl::with_query(Query::term("__state", "ACTIVE"))
            .size(20)
            .sort(SortItem::desc("__modificationTimestamp"))
            .aggregation("types", Aggregation::terms("__typeName.keyword", 10))
            .track_total_hits(true);
        assert_eq!(
            serde_json::to_value(dsl).unwrap(),
            json!({
                "from": 0,
                "size": 20,
                "query": {"term": {"__state": {"value": "ACTIVE"}}},
                "sort": [{"__modificationTimestamp": {"order": "desc"}}],
                "aggregations": {"types": {"terms": {"field": "__typeName.keyword", "size": 10}}},
                "track_total_hits": true
            })
        );
    }
}
