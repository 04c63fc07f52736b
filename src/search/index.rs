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

//! Asset (index) search

use super::{SearchCriteria, SearchKind, SearchResults};
use crate::dsl::{Dsl, SortItem};
use crate::model::Asset;
use serde::Serialize;
use serde_json::Value;

/// Tag identifying requests made by this library in the search log.
pub const UTM_TAG: &str = "project_sdk_rust";

/// Search-log bookkeeping sent along with an index search.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    pub save_search_log: bool,
    pub utm_tags: Vec<String>,
}

impl Default for RequestMetadata {
    fn default() -> Self {
        RequestMetadata {
            save_search_log: false,
            utm_tags: vec![UTM_TAG.to_string()],
        }
    }
}

/// Body of an index search.
///
/// `attributes` and `relation_attributes` name the extra attributes to load
/// on each result and on each related asset.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSearchRequest {
    pub dsl: Dsl,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relation_attributes: Vec<String>,
    pub suppress_logs: bool,
    pub show_search_score: bool,
    pub exclude_meanings: bool,
    pub exclude_classifications: bool,
    pub allow_deleted_relations: bool,
    pub request_metadata: RequestMetadata,
}

impl Default for IndexSearchRequest {
    fn default() -> Self {
        IndexSearchRequest::new(Dsl::default())
    }
}

impl IndexSearchRequest {
    pub fn new(dsl: Dsl) -> Self {
        IndexSearchRequest {
            dsl,
            attributes: Vec::new(),
            relation_attributes: Vec::new(),
            suppress_logs: true,
            show_search_score: false,
            exclude_meanings: false,
            exclude_classifications: false,
            allow_deleted_relations: false,
            request_metadata: RequestMetadata::default(),
        }
    }

    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn relation_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relation_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_meanings(mut self, exclude: bool) -> Self {
        self.exclude_meanings = exclude;
        self
    }

    pub fn exclude_classifications(mut self, exclude: bool) -> Self {
        self.exclude_classifications = exclude;
        self
    }

    pub fn allow_deleted_relations(mut self, allow: bool) -> Self {
        self.allow_deleted_relations = allow;
        self
    }

    pub fn show_search_score(mut self, show: bool) -> Self {
        self.show_search_score = show;
        self
    }

    /// Records the search in the search log, which also drops `suppress_logs`.
    pub fn save_search_log(mut self, save: bool) -> Self {
        self.request_metadata.save_search_log = save;
        self.suppress_logs = !save;
        self
    }
}

impl SearchCriteria for IndexSearchRequest {
    fn dsl(&self) -> &Dsl {
        &self.dsl
    }

    fn dsl_mut(&mut self) -> &mut Dsl {
        &mut self.dsl
    }
}

/// Searches assets through `/api/meta/search/indexsearch`.
#[derive(Clone, Copy, Debug)]
pub struct IndexSearchKind;

impl SearchKind for IndexSearchKind {
    type Request = IndexSearchRequest;
    type Item = Asset;

    const NAME: &'static str = "index search";
    const ENDPOINT: &'static str = "/api/meta/search/indexsearch";
    const RESULTS_FIELD: &'static str = "entities";
    const COUNT_FIELD: &'static str = "approximateCount";
    const TIMESTAMP_FIELD: &'static str = "__timestamp";
    const MASS_EXTRACT_THRESHOLD: u64 = 100_000 - crate::dsl::DEFAULT_PAGE_SIZE as u64;

    fn tiebreakers() -> Vec<SortItem> {
        vec![SortItem::asc("__guid")]
    }

    fn decode_item(raw: Value) -> Result<Asset, serde_json::Error> {
        Asset::from_entity(raw)
    }

    fn timestamp(item: &Asset) -> Option<i64> {
        item.create_time
    }

    fn unique_key(item: &Asset) -> String {
        item.guid.clone()
    }
}

pub type IndexSearchResults = SearchResults<IndexSearchKind>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::Query;
    use serde_json::json;

    #[test]
    fn default_request_json() {
        let request = IndexSearchRequest::new(Dsl::with_query(Query::term("__state", "ACTIVE")).size(50))
            .attributes(["name", "description"]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "dsl": {"from": 0, "size": 50, "query": {"term": {"__state": {"value": "ACTIVE"}}}},
                "attributes": ["name", "description"],
                "suppressLogs": true,
                "showSearchScore": false,
                "excludeMeanings": false,
                "excludeClassifications": false,
                "allowDeletedRelations": false,
                "requestMetadata": {"saveSearchLog": false, "utmTags": ["project_sdk_rust"]}
            })
        );
    }

    #[test]
    fn save_search_log_unsuppresses_logs() {
        let request = IndexSearchRequest::default().save_search_log(true);
        assert!(!request.suppress_logs);
        assert!(request.request_metadata.save_search_log);
    }
}
