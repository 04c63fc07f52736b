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

//! Search-log search: who searched for, and who viewed, which assets

use super::{SearchCriteria, SearchKind, SearchResults};
use crate::dsl::{Aggregation, BoolQuery, Dsl, Query, SortItem};
use crate::model::{AssetViews, SearchLogEntry, UserViews};
use serde::Serialize;
use serde_json::Value;

/// Aggregation of views per user.
pub const UNIQUE_USERS: &str = "uniqueUsers";
/// Aggregation of views per asset.
pub const UNIQUE_ASSETS: &str = "uniqueAssets";
const LATEST_TIMESTAMP: &str = "latestTimestamp";

/// Tags the UI puts on search-log entries that record an asset being opened.
const VIEW_TAGS: [&str; 2] = ["action_asset_viewed", "ui_profile"];
/// API-token users, which never count as viewers.
const SERVICE_ACCOUNT_PREFIX: &str = "service-account-apikey-";

/// Body of a search-log search.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLogRequest {
    pub dsl: Dsl,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

fn views_query(guid: Option<&str>, exclude_users: &[String]) -> BoolQuery {
    let mut view = BoolQuery::new().minimum_should_match(1);
    for tag in VIEW_TAGS {
        view = view.should(Query::term("utmTags", tag));
    }
    let mut query = BoolQuery::new();
    if let Some(guid) = guid {
        query = query.filter(Query::term("entityGuidsAll", guid));
    }
    query = query
        .filter(view.into())
        .must_not(Query::prefix("userName", SERVICE_ACCOUNT_PREFIX));
    if !exclude_users.is_empty() {
        query = query.must_not(Query::terms("userName", exclude_users.iter().cloned()));
    }
    query
}

impl SearchLogRequest {
    pub fn new(dsl: Dsl) -> Self {
        SearchLogRequest {
            dsl,
            attributes: Vec::new(),
        }
    }

    /// Individual view events of one asset, newest first.
    pub fn views_by_guid(guid: &str, size: usize, exclude_users: &[String]) -> Self {
        SearchLogRequest::new(
            Dsl::with_query(views_query(Some(guid), exclude_users))
                .size(size)
                .sort(SortItem::desc("timestamp")),
        )
    }

    /// Users who viewed one asset, most recent viewer first. Read the result
    /// with [`SearchResults::user_views`].
    pub fn most_recent_viewers(guid: &str, max_users: usize, exclude_users: &[String]) -> Self {
        let per_user = Aggregation::terms("userName", max_users)
            .sub_aggregation(LATEST_TIMESTAMP, Aggregation::max("timestamp"))
            .order_by(LATEST_TIMESTAMP, true);
        SearchLogRequest::new(
            Dsl::with_query(views_query(Some(guid), exclude_users))
                .size(0)
                .aggregation(UNIQUE_USERS, per_user),
        )
    }

    /// Most viewed assets, by total views or by number of distinct viewers.
    /// Read the result with [`SearchResults::asset_views`].
    pub fn most_viewed_assets(
        max_assets: usize,
        by_different_users: bool,
        exclude_users: &[String],
    ) -> Self {
        let mut per_asset = Aggregation::terms("entityGuidsAll", max_assets)
            .sub_aggregation(UNIQUE_USERS, Aggregation::cardinality("userName"));
        if by_different_users {
            per_asset = per_asset.order_by(UNIQUE_USERS, true);
        }
        SearchLogRequest::new(
            Dsl::with_query(views_query(None, exclude_users))
                .size(0)
                .aggregation(UNIQUE_ASSETS, per_asset),
        )
    }
}

impl SearchCriteria for SearchLogRequest {
    fn dsl(&self) -> &Dsl {
        &self.dsl
    }

    fn dsl_mut(&mut self) -> &mut Dsl {
        &mut self.dsl
    }
}

/// Searches the search log through `/api/meta/search/searchlog`.
#[derive(Clone, Copy, Debug)]
pub struct SearchLogKind;

impl SearchKind for SearchLogKind {
    type Request = SearchLogRequest;
    type Item = SearchLogEntry;

    const NAME: &'static str = "search log";
    const ENDPOINT: &'static str = "/api/meta/search/searchlog";
    const RESULTS_FIELD: &'static str = "logs";
    const COUNT_FIELD: &'static str = "approximateCount";
    const TIMESTAMP_FIELD: &'static str = "timestamp";
    const MASS_EXTRACT_THRESHOLD: u64 = 10_000 - crate::dsl::DEFAULT_PAGE_SIZE as u64;

    fn tiebreakers() -> Vec<SortItem> {
        Vec::new()
    }

    fn decode_item(raw: Value) -> Result<SearchLogEntry, serde_json::Error> {
        serde_json::from_value(raw)
    }

    fn timestamp(item: &SearchLogEntry) -> Option<i64> {
        item.timestamp
    }

    fn unique_key(item: &SearchLogEntry) -> String {
        item.unique_key()
    }
}

pub type SearchLogResults = SearchResults<SearchLogKind>;

impl SearchResults<SearchLogKind> {
    /// Per-user view counts from a [`SearchLogRequest::most_recent_viewers`] search.
    pub fn user_views(&self) -> Vec<UserViews> {
        self.aggregations()
            .get(UNIQUE_USERS)
            .map(|agg| {
                agg.buckets()
                    .iter()
                    .map(|b| UserViews {
                        username: b.key_str(),
                        view_count: b.doc_count,
                        most_recent_view: b.metric(LATEST_TIMESTAMP).map(|t| t as i64),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Per-asset view counts from a [`SearchLogRequest::most_viewed_assets`] search.
    pub fn asset_views(&self) -> Vec<AssetViews> {
        self.aggregations()
            .get(UNIQUE_ASSETS)
            .map(|agg| {
                agg.buckets()
                    .iter()
                    .map(|b| AssetViews {
                        guid: b.key_str(),
                        total_views: b.doc_count,
                        distinct_users: b.metric(UNIQUE_USERS).map(|n| n as u64).unwrap_or(0),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn views_by_guid_excludes_users() {
        let request = SearchLogRequest::views_by_guid("g-1", 20, &["admin".to_string()]);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["dsl"]["size"], json!(20));
        assert_eq!(body["dsl"]["sort"], json!([{"timestamp": {"order": "desc"}}]));
        let must_not = &body["dsl"]["query"]["bool"]["must_not"];
        assert_eq!(must_not[1], json!({"terms": {"userName": ["admin"]}}));
        assert_eq!(
            body["dsl"]["query"]["bool"]["filter"][0],
            json!({"term": {"entityGuidsAll": {"value": "g-1"}}})
        );
    }

    #[test]
    fn most_recent_viewers_aggregates_by_user() {
        let request = SearchLogRequest::most_recent_viewers("g-1", 5, &[]);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["dsl"]["size"], json!(0));
        assert_eq!(
            body["dsl"]["aggregations"][UNIQUE_USERS],
            json!({
                "terms": {"field": "userName", "size": 5, "order": [{"latestTimestamp": "desc"}]},
                "aggregations": {"latestTimestamp": {"max": {"field": "timestamp"}}}
            })
        );
        assert_eq!(
            body["dsl"]["query"]["bool"]["must_not"],
            json!([{"prefix": {"userName": {"value": "service-account-apikey-"}}}])
        );
    }

    #[test]
    fn most_viewed_assets_orders_by_distinct_users() {
        let by_users = SearchLogRequest::most_viewed_assets(10, true, &[]);
        let body = serde_json::to_value(&by_users).unwrap();
        assert_eq!(
            body["dsl"]["aggregations"][UNIQUE_ASSETS]["terms"]["order"],
            json!([{"uniqueUsers": "desc"}])
        );
        let by_views = SearchLogRequest::most_viewed_assets(10, false, &[]);
        let body = serde_json::to_value(&by_views).unwrap();
        assert!(body["dsl"]["aggregations"][UNIQUE_ASSETS]["terms"].get("order").is_none());
    }
}
