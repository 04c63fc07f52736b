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

use super::paging::{self, NO_TIMESTAMP};
use super::{SearchCriteria, SearchKind};
use crate::client::CatalogClient;
use crate::dsl::{AggregationResult, parse_aggregations};
use crate::error::{Error, ValidationErr};
use crate::types::ToStream;
use async_trait::async_trait;
use futures_util::{Stream, TryStreamExt};
use http::Method;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// One page of a raw search response.
struct Page {
    /// `None` when the response has no results field at all.
    items: Option<Vec<Value>>,
    count: u64,
    aggregations: Option<Value>,
}

impl Page {
    fn from_response(mut raw: Value, results_field: &str, count_field: &str) -> Page {
        let items = match raw.get_mut(results_field).map(Value::take) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        };
        let count = raw.get(count_field).and_then(Value::as_u64).unwrap_or(0);
        let aggregations = raw
            .get_mut("aggregations")
            .map(Value::take)
            .filter(|v| !v.is_null());
        Page {
            items,
            count,
            aggregations,
        }
    }
}

async fn fetch_page<K: SearchKind>(
    client: &CatalogClient,
    criteria: &K::Request,
) -> Result<Page, Error> {
    let body = serde_json::to_value(criteria).map_err(ValidationErr::from)?;
    let raw = client
        .call_api(Method::POST, K::ENDPOINT, Some(body))
        .await?;
    Ok(Page::from_response(raw, K::RESULTS_FIELD, K::COUNT_FIELD))
}

fn decode_items<K: SearchKind>(raw: Vec<Value>) -> Result<Vec<K::Item>, Error> {
    raw.into_iter()
        .map(K::decode_item)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| Error::Decode {
            what: K::NAME,
            source: e,
        })
}

/// Number of records matching `criteria`, without paging through them.
pub(crate) async fn count<K: SearchKind>(
    client: &CatalogClient,
    criteria: &K::Request,
) -> Result<u64, Error> {
    Ok(fetch_page::<K>(client, criteria).await?.count)
}

/// Results of a search, one page at a time.
///
/// Holds the current page and enough state to fetch the next one. In bulk
/// mode (requested, or forced because the result count exceeds
/// [`SearchKind::MASS_EXTRACT_THRESHOLD`]) pages are fetched by creation
/// timestamp, and records already returned are never returned again.
///
/// Use [`next_page`](Self::next_page) to page manually, or
/// [`to_stream`](ToStream::to_stream) to iterate over every record.
pub struct SearchResults<K: SearchKind> {
    client: CatalogClient,
    criteria: K::Request,
    start: usize,
    size: usize,
    count: u64,
    items: Vec<K::Item>,
    aggregations: Option<Value>,
    bulk: bool,
    first_record_time: i64,
    last_record_time: i64,
    processed_keys: HashSet<String>,
}

impl<K: SearchKind> fmt::Debug for SearchResults<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResults")
            .field("kind", &K::NAME)
            .field("start", &self.start)
            .field("size", &self.size)
            .field("count", &self.count)
            .field("page_len", &self.items.len())
            .field("bulk", &self.is_bulk())
            .field("processed", &self.processed_keys.len())
            .finish()
    }
}

impl<K: SearchKind> SearchResults<K> {
    /// Runs the first page of a search.
    ///
    /// In bulk mode the sorts are rewritten to ascending timestamp first. When
    /// a search not sorted that way matches more records than the threshold,
    /// its sorts are rewritten and the first page is fetched again.
    pub(crate) async fn execute(
        client: CatalogClient,
        mut criteria: K::Request,
        bulk: bool,
    ) -> Result<Self, Error> {
        let tiebreakers = K::tiebreakers();
        if bulk {
            let sorts = paging::prepare_sorts_for_bulk(
                &criteria.dsl().sort,
                K::TIMESTAMP_FIELD,
                &tiebreakers,
            )?;
            criteria.dsl_mut().sort = sorts;
            log::debug!(
                "{}: bulk search requested; running a timestamp-based paging search instead of default sorting",
                K::NAME
            );
        }
        paging::ensure_tiebreakers(&mut criteria.dsl_mut().sort, &tiebreakers);

        loop {
            let page = fetch_page::<K>(&client, &criteria).await?;
            if page.count > K::MASS_EXTRACT_THRESHOLD
                && !paging::presorted_by_timestamp(&criteria.dsl().sort, K::TIMESTAMP_FIELD)
            {
                let sorts = paging::prepare_sorts_for_bulk(
                    &criteria.dsl().sort,
                    K::TIMESTAMP_FIELD,
                    &tiebreakers,
                )?;
                criteria.dsl_mut().sort = sorts;
                paging::ensure_tiebreakers(&mut criteria.dsl_mut().sort, &tiebreakers);
                log::debug!(
                    "{}: result size ({}) exceeds threshold ({}); switching to timestamp-based paging",
                    K::NAME,
                    page.count,
                    K::MASS_EXTRACT_THRESHOLD
                );
                continue;
            }

            let items = decode_items::<K>(page.items.unwrap_or_default())?;
            let mut results = SearchResults {
                start: criteria.dsl().from,
                size: criteria.dsl().size,
                client,
                criteria,
                count: page.count,
                items,
                aggregations: page.aggregations,
                bulk,
                first_record_time: NO_TIMESTAMP,
                last_record_time: NO_TIMESTAMP,
                processed_keys: HashSet::new(),
            };
            if results.is_bulk() {
                results.update_first_last();
            }
            return Ok(results);
        }
    }

    /// Total number of matching records, as reported by the server.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Records of the current page.
    pub fn current_page(&self) -> &[K::Item] {
        &self.items
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn page_size(&self) -> usize {
        self.size
    }

    /// True when pages are fetched by timestamp rather than by offset.
    pub fn is_bulk(&self) -> bool {
        self.bulk || self.count > K::MASS_EXTRACT_THRESHOLD
    }

    /// The request as it will be sent for the next page.
    pub fn criteria(&self) -> &K::Request {
        &self.criteria
    }

    /// Aggregation results of the latest page, by name.
    pub fn aggregations(&self) -> BTreeMap<String, AggregationResult> {
        parse_aggregations(self.aggregations.as_ref())
    }

    pub fn raw_aggregations(&self) -> Option<&Value> {
        self.aggregations.as_ref()
    }

    /// Fetches the next page and makes it current.
    ///
    /// `start` defaults to the end of the current page, `size` to the current
    /// page size. Returns `Ok(false)` once there is nothing more to fetch.
    pub async fn next_page(
        &mut self,
        start: Option<usize>,
        size: Option<usize>,
    ) -> Result<bool, Error> {
        if size == Some(0) {
            return Err(ValidationErr::InvalidPageSize(0).into());
        }
        self.start = start.unwrap_or(self.start + self.size);
        if let Some(size) = size {
            self.size = size;
        }
        if self.is_bulk() {
            self.processed_keys
                .extend(self.items.iter().map(K::unique_key));
        }
        if self.items.is_empty() {
            return Ok(false);
        }
        self.get_next_page().await
    }

    async fn get_next_page(&mut self) -> Result<bool, Error> {
        let is_bulk = self.is_bulk();
        {
            let dsl = self.criteria.dsl_mut();
            dsl.from = self.start;
            dsl.size = self.size;
        }
        let mut offset_retry = false;
        loop {
            if is_bulk {
                log::debug!(
                    "{}: next page by timestamp (first {}, last {}, {} processed)",
                    K::NAME,
                    self.first_record_time,
                    self.last_record_time,
                    self.processed_keys.len()
                );
                paging::prepare_query_for_timestamp_paging(
                    self.criteria.dsl_mut(),
                    K::TIMESTAMP_FIELD,
                    self.first_record_time,
                    self.last_record_time,
                    self.processed_keys.len(),
                );
            }

            let page = fetch_page::<K>(&self.client, &self.criteria).await?;
            let Some(raw) = page.items else {
                self.items.clear();
                return Ok(false);
            };
            let mut items = decode_items::<K>(raw)?;
            self.count = page.count;
            self.aggregations = page.aggregations;
            if !is_bulk {
                self.items = items;
                return Ok(true);
            }

            let full_page = items.len() >= self.size;
            let last_seen = items.last().and_then(K::timestamp);
            let processed = &self.processed_keys;
            items.retain(|item| !processed.contains(&K::unique_key(item)));
            // A full page of records sharing the last timestamp: continue by offset.
            if items.is_empty()
                && full_page
                && !offset_retry
                && let Some(ts) = last_seen
            {
                offset_retry = true;
                self.first_record_time = ts;
                self.last_record_time = ts;
                continue;
            }
            self.items = items;
            self.update_first_last();
            return Ok(true);
        }
    }

    fn update_first_last(&mut self) {
        let (first, last) = paging::first_last_timestamps(self.items.iter().map(K::timestamp));
        self.first_record_time = first;
        self.last_record_time = last;
    }

    /// Pages through every remaining record and collects them, starting with
    /// the current page.
    pub async fn collect_all(self) -> Result<Vec<K::Item>, Error> {
        Box::pin(item_stream(self)).try_collect().await
    }
}

fn item_stream<K: SearchKind>(
    mut results: SearchResults<K>,
) -> impl Stream<Item = Result<K::Item, Error>> + Send {
    async_stream::try_stream! {
        loop {
            for item in results.items.clone() {
                yield item;
            }
            if !results.next_page(None, None).await? {
                break;
            }
        }
    }
}

#[async_trait]
impl<K: SearchKind> ToStream for SearchResults<K> {
    type Item = K::Item;

    async fn to_stream(self) -> Box<dyn Stream<Item = Result<K::Item, Error>> + Unpin + Send> {
        Box::new(Box::pin(item_stream(self)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_from_response() {
        let page = Page::from_response(
            json!({"approximateCount": 12, "entities": [{"guid": "a"}, {"guid": "b"}], "aggregations": {"t": {"value": 3}}}),
            "entities",
            "approximateCount",
        );
        assert_eq!(page.count, 12);
        assert_eq!(page.items.map(|v| v.len()), Some(2));
        assert_eq!(page.aggregations, Some(json!({"t": {"value": 3}})));
    }

    #[test]
    fn page_without_results_field() {
        let page = Page::from_response(json!({"approximateCount": 0}), "entities", "approximateCount");
        assert!(page.items.is_none());
        assert_eq!(page.count, 0);
        assert!(page.aggregations.is_none());

        let page = Page::from_response(json!({"entities": null}), "entities", "approximateCount");
        assert!(page.items.is_none());
    }
}
