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

//! In-memory catalog implementing the three search endpoints.
//!
//! Understands the subset of the query DSL the client produces (`bool`,
//! `term`, `terms`, `range`, `exists`, `prefix`, `match`, `match_all`),
//! multi-field sorts, `from`/`size` paging, and `terms`/`max`/`min`/
//! `cardinality` aggregations. Unsupported clauses panic so a test never
//! silently passes on a query the fake cannot evaluate.

use async_trait::async_trait;
use catalog::error::{Error, ServerError};
use catalog::transport::Transport;
use http::{Method, StatusCode};
use serde_json::{Map, Value, json};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

pub const INDEX_SEARCH: &str = "/api/meta/search/indexsearch";
pub const AUDIT_SEARCH: &str = "/api/meta/entity/auditSearch";
pub const SEARCH_LOG: &str = "/api/meta/search/searchlog";

/// A request received by the fake.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Value,
}

impl RecordedRequest {
    pub fn dsl(&self) -> &Value {
        &self.body["dsl"]
    }

    pub fn from(&self) -> u64 {
        self.dsl()["from"].as_u64().unwrap_or(0)
    }

    pub fn size(&self) -> u64 {
        self.dsl()["size"].as_u64().unwrap_or(0)
    }

    /// Sort fields and orders, e.g. `[("__timestamp", "asc")]`.
    pub fn sorts(&self) -> Vec<(String, String)> {
        parse_sorts(self.dsl())
    }

    /// True when the query carries a `gte` range on `field`.
    pub fn has_gte_range(&self, field: &str) -> bool {
        fn walk(q: &Value, field: &str) -> bool {
            if let Some(r) = q.get("range").and_then(|r| r.get(field)) {
                return r.get("gte").is_some();
            }
            if let Some(b) = q.get("bool") {
                return ["filter", "must"].iter().any(|k| {
                    b.get(*k)
                        .and_then(Value::as_array)
                        .is_some_and(|cs| cs.iter().any(|c| walk(c, field)))
                });
            }
            false
        }
        walk(&self.dsl()["query"], field)
    }
}

#[derive(Clone, Debug)]
struct Record {
    /// Field values the queries, sorts and aggregations look at.
    doc: Map<String, Value>,
    /// What the endpoint returns.
    source: Value,
}

#[derive(Debug, Default)]
struct State {
    collections: HashMap<&'static str, Vec<Record>>,
    max_result_window: Option<usize>,
    reported_counts: HashMap<&'static str, u64>,
    failures: VecDeque<(u16, Value)>,
    requests: Vec<RecordedRequest>,
}

/// Cheap to clone; clones share the same records and request log.
#[derive(Clone, Debug, Default)]
pub struct FakeCatalog {
    state: Arc<Mutex<State>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Adds asset entities as returned by index search.
    pub fn add_assets<I: IntoIterator<Item = Value>>(&self, assets: I) {
        let records = assets.into_iter().map(|a| Record {
            doc: asset_doc(&a),
            source: a,
        });
        self.state()
            .collections
            .entry(INDEX_SEARCH)
            .or_default()
            .extend(records);
    }

    pub fn add_audits<I: IntoIterator<Item = Value>>(&self, audits: I) {
        self.add_flat(AUDIT_SEARCH, audits);
    }

    pub fn add_search_logs<I: IntoIterator<Item = Value>>(&self, logs: I) {
        self.add_flat(SEARCH_LOG, logs);
    }

    fn add_flat<I: IntoIterator<Item = Value>>(&self, path: &'static str, records: I) {
        let records = records.into_iter().map(|r| Record {
            doc: r.as_object().cloned().unwrap_or_default(),
            source: r,
        });
        self.state()
            .collections
            .entry(path)
            .or_default()
            .extend(records);
    }

    /// Rejects requests whose `from + size` exceeds `window`, like the server does.
    pub fn set_max_result_window(&self, window: Option<usize>) {
        self.state().max_result_window = window;
    }

    /// Reports `count` as the total for `path` instead of the real match count.
    pub fn report_count(&self, path: &'static str, count: u64) {
        self.state().reported_counts.insert(path, count);
    }

    /// Makes the next call fail with `status` and `body`.
    pub fn fail_next(&self, status: u16, body: Value) {
        self.state().failures.push_back((status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    pub fn len(&self, path: &str) -> usize {
        self.state().collections.get(path).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.state().collections.values().all(Vec::is_empty)
    }
}

fn server_error(status: u16, body: Value) -> Error {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    ServerError::from_status(status, body.to_string().as_bytes()).into()
}

#[async_trait]
impl Transport for FakeCatalog {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, Error> {
        let body = body.unwrap_or(Value::Null);
        let mut state = self.state();
        state.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.to_string(),
            body: body.clone(),
        });
        log::trace!("fake catalog: {method} {path} {body}");

        if let Some((status, err)) = state.failures.pop_front() {
            return Err(server_error(status, err));
        }
        let (key, results_field, count_field) = match path {
            INDEX_SEARCH => (INDEX_SEARCH, "entities", "approximateCount"),
            AUDIT_SEARCH => (AUDIT_SEARCH, "entityAudits", "totalCount"),
            SEARCH_LOG => (SEARCH_LOG, "logs", "approximateCount"),
            _ => {
                return Err(server_error(
                    404,
                    json!({"errorCode": "ATLAS-404-00-001", "errorMessage": format!("no such endpoint {path}")}),
                ));
            }
        };
        if method != Method::POST {
            return Err(server_error(
                405,
                json!({"errorMessage": format!("{method} not allowed on {path}")}),
            ));
        }
        state.search(key, &body["dsl"], results_field, count_field)
    }
}

impl State {
    fn search(
        &self,
        key: &'static str,
        dsl: &Value,
        results_field: &str,
        count_field: &str,
    ) -> Result<Value, Error> {
        let from = dsl["from"].as_u64().unwrap_or(0) as usize;
        let size = dsl["size"].as_u64().unwrap_or(10) as usize;
        if let Some(window) = self.max_result_window
            && from + size > window
        {
            return Err(server_error(
                400,
                json!({
                    "errorCode": "ATLAS-400-00-0A0",
                    "errorMessage": format!(
                        "Result window is too large, from + size must be less than or equal to: [{window}] but was [{}]",
                        from + size
                    )
                }),
            ));
        }

        let records = self.collections.get(key).map(Vec::as_slice).unwrap_or(&[]);
        let query = dsl.get("query").filter(|q| !q.is_null());
        let mut matched: Vec<&Record> = records
            .iter()
            .filter(|r| query.is_none_or(|q| matches(q, &r.doc)))
            .collect();

        let sorts = parse_sorts(dsl);
        matched.sort_by(|a, b| {
            sorts
                .iter()
                .map(|(field, order)| {
                    let ord = compare(field_value(&a.doc, field), field_value(&b.doc, field));
                    match (order.as_str(), ord) {
                        // missing values sort last either way
                        ("desc", _) if field_value(&a.doc, field).is_some()
                            && field_value(&b.doc, field).is_some() =>
                        {
                            ord.reverse()
                        }
                        _ => ord,
                    }
                })
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let page: Vec<Value> = matched
            .iter()
            .skip(from)
            .take(size)
            .map(|r| r.source.clone())
            .collect();
        let count = self
            .reported_counts
            .get(key)
            .copied()
            .unwrap_or(matched.len() as u64);

        let mut resp = Map::new();
        resp.insert(results_field.to_string(), Value::Array(page));
        resp.insert(count_field.to_string(), json!(count));
        if let Some(aggs) = dsl.get("aggregations").and_then(Value::as_object) {
            let results: Map<String, Value> = aggs
                .iter()
                .map(|(name, spec)| (name.clone(), aggregate(spec, &matched)))
                .collect();
            resp.insert("aggregations".to_string(), Value::Object(results));
        }
        Ok(Value::Object(resp))
    }
}

fn asset_doc(entity: &Value) -> Map<String, Value> {
    let mut doc = entity
        .get("attributes")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    if let Some(top) = entity.as_object() {
        for (k, v) in top {
            if k != "attributes" {
                doc.insert(k.clone(), v.clone());
            }
        }
    }
    let get = |k: &str| entity.get(k).cloned().unwrap_or(Value::Null);
    doc.insert("__guid".into(), get("guid"));
    doc.insert("__typeName".into(), get("typeName"));
    doc.insert("__timestamp".into(), get("createTime"));
    doc.insert("__modificationTimestamp".into(), get("updateTime"));
    doc.insert("__superTypeNames".into(), get("superTypeNames"));
    doc.insert(
        "__state".into(),
        entity.get("status").cloned().unwrap_or_else(|| json!("ACTIVE")),
    );
    doc
}

fn field_value<'a>(doc: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    doc.get(field)
        .or_else(|| field.strip_suffix(".keyword").and_then(|f| doc.get(f)))
        .filter(|v| !v.is_null())
}

/// The doc value, or each element of it when it is an array.
fn field_values<'a>(doc: &'a Map<String, Value>, field: &str) -> Vec<&'a Value> {
    match field_value(doc, field) {
        Some(Value::Array(vs)) => vs.iter().collect(),
        Some(v) => vec![v],
        None => Vec::new(),
    }
}

fn single_field(clause: &Value) -> (&str, &Value) {
    let obj = clause
        .as_object()
        .filter(|o| o.len() == 1)
        .unwrap_or_else(|| panic!("expected single-field clause, got {clause}"));
    let (field, spec) = obj.iter().next().unwrap_or_else(|| unreachable!());
    (field.as_str(), spec)
}

fn same_value(doc_value: &Value, wanted: &Value, case_insensitive: bool) -> bool {
    match (doc_value, wanted) {
        (Value::String(a), Value::String(b)) if case_insensitive => a.eq_ignore_ascii_case(b),
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (a, b) => a == b,
    }
}

fn matches(query: &Value, doc: &Map<String, Value>) -> bool {
    let (kind, body) = single_field(query);
    match kind {
        "match_all" => true,
        "term" => {
            let (field, spec) = single_field(body);
            let (wanted, ci) = match spec.get("value") {
                Some(v) => (v, spec["case_insensitive"].as_bool().unwrap_or(false)),
                None => (spec, false),
            };
            field_values(doc, field)
                .iter()
                .any(|v| same_value(v, wanted, ci))
        }
        "terms" => {
            let (field, wanted) = single_field(body);
            let wanted = wanted.as_array().map(Vec::as_slice).unwrap_or(&[]);
            field_values(doc, field)
                .iter()
                .any(|v| wanted.iter().any(|w| same_value(v, w, false)))
        }
        "range" => {
            let (field, bounds) = single_field(body);
            let Some(v) = field_value(doc, field).and_then(Value::as_f64) else {
                return false;
            };
            let bound = |k: &str| bounds.get(k).and_then(Value::as_f64);
            bound("gt").is_none_or(|b| v > b)
                && bound("gte").is_none_or(|b| v >= b)
                && bound("lt").is_none_or(|b| v < b)
                && bound("lte").is_none_or(|b| v <= b)
        }
        "exists" => {
            let field = body["field"].as_str().unwrap_or_default();
            field_value(doc, field).is_some()
        }
        "prefix" => {
            let (field, spec) = single_field(body);
            let prefix = spec
                .get("value")
                .and_then(Value::as_str)
                .or(spec.as_str())
                .unwrap_or_default();
            field_values(doc, field)
                .iter()
                .any(|v| v.as_str().is_some_and(|s| s.starts_with(prefix)))
        }
        "match" => {
            let (field, spec) = single_field(body);
            let text = spec
                .get("query")
                .and_then(Value::as_str)
                .or(spec.as_str())
                .unwrap_or_default()
                .to_lowercase();
            field_values(doc, field).iter().any(|v| {
                v.as_str()
                    .is_some_and(|s| text.split_whitespace().any(|w| s.to_lowercase().contains(w)))
            })
        }
        "bool" => {
            let clauses = |k: &str| body.get(k).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);
            let (filter, must, must_not, should) = (
                clauses("filter"),
                clauses("must"),
                clauses("must_not"),
                clauses("should"),
            );
            let min_should = body
                .get("minimum_should_match")
                .and_then(Value::as_u64)
                .unwrap_or(if filter.is_empty() && must.is_empty() && !should.is_empty() {
                    1
                } else {
                    0
                }) as usize;
            filter.iter().chain(must).all(|q| matches(q, doc))
                && !must_not.iter().any(|q| matches(q, doc))
                && should.iter().filter(|q| matches(q, doc)).count() >= min_should
        }
        other => panic!("fake catalog does not support '{other}' queries"),
    }
}

fn parse_sorts(dsl: &Value) -> Vec<(String, String)> {
    dsl.get("sort")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let (field, spec) = single_field(item);
                    let order = spec
                        .get("order")
                        .and_then(Value::as_str)
                        .or(spec.as_str())
                        .unwrap_or("asc");
                    (field.to_string(), order.to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Ascending order with missing values last.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Number(x), Value::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (x, y) => x.to_string().cmp(&y.to_string()),
        },
    }
}

fn key_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn aggregate(spec: &Value, records: &[&Record]) -> Value {
    if let Some(terms) = spec.get("terms") {
        let field = terms["field"].as_str().unwrap_or_default();
        let size = terms["size"].as_u64().unwrap_or(10) as usize;

        let mut groups: BTreeMap<String, (Value, Vec<&Record>)> = BTreeMap::new();
        for &r in records {
            let mut seen = HashSet::new();
            for v in field_values(&r.doc, field) {
                let k = key_string(v);
                if seen.insert(k.clone()) {
                    groups.entry(k).or_insert_with(|| (v.clone(), Vec::new())).1.push(r);
                }
            }
        }

        let subs = spec.get("aggregations").and_then(Value::as_object);
        let mut buckets: Vec<(String, usize, Map<String, Value>)> = groups
            .into_iter()
            .map(|(k, (key, members))| {
                let mut bucket = Map::new();
                bucket.insert("key".into(), key);
                bucket.insert("doc_count".into(), json!(members.len()));
                if let Some(subs) = subs {
                    for (name, sub) in subs {
                        bucket.insert(name.clone(), aggregate(sub, &members));
                    }
                }
                (k, members.len(), bucket)
            })
            .collect();

        let order = terms
            .get("order")
            .and_then(|o| match o {
                Value::Array(items) => items.first().cloned(),
                other => Some(other.clone()),
            })
            .map(|o| {
                let (metric, dir) = single_field(&o);
                (metric.to_string(), dir.as_str().unwrap_or("desc").to_string())
            });
        buckets.sort_by(|(ka, ca, ba), (kb, cb, bb)| {
            let by_order = match &order {
                Some((metric, dir)) => {
                    let ord = match metric.as_str() {
                        "_count" => ca.cmp(cb),
                        "_key" => ka.cmp(kb),
                        m => compare(ba.get(m).map(|v| &v["value"]), bb.get(m).map(|v| &v["value"])),
                    };
                    if dir == "desc" { ord.reverse() } else { ord }
                }
                None => cb.cmp(ca),
            };
            by_order.then_with(|| cb.cmp(ca)).then_with(|| ka.cmp(kb))
        });
        buckets.truncate(size);
        let buckets: Vec<Value> = buckets.into_iter().map(|(_, _, b)| Value::Object(b)).collect();
        return json!({ "buckets": buckets });
    }

    let numeric = |field: &str| -> Vec<f64> {
        records
            .iter()
            .flat_map(|r| field_values(&r.doc, field))
            .filter_map(Value::as_f64)
            .collect()
    };
    if let Some(max) = spec.get("max") {
        let v = numeric(max["field"].as_str().unwrap_or_default())
            .into_iter()
            .reduce(f64::max);
        return json!({ "value": v });
    }
    if let Some(min) = spec.get("min") {
        let v = numeric(min["field"].as_str().unwrap_or_default())
            .into_iter()
            .reduce(f64::min);
        return json!({ "value": v });
    }
    if let Some(card) = spec.get("cardinality") {
        let field = card["field"].as_str().unwrap_or_default();
        let distinct: HashSet<String> = records
            .iter()
            .flat_map(|r| field_values(&r.doc, field))
            .map(key_string)
            .collect();
        return json!({ "value": distinct.len() });
    }
    panic!("fake catalog does not support aggregation {spec}");
}
