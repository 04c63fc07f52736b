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

//! Aggregation requests and the results the server returns for them.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// A named aggregation in a search request.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregation {
    body: Value,
    sub_aggregations: BTreeMap<String, Aggregation>,
}

impl Aggregation {
    /// `terms` bucket aggregation on `field` returning at most `size` buckets.
    pub fn terms(field: impl Into<String>, size: usize) -> Self {
        Self::from_body(json!({ "terms": { "field": field.into(), "size": size } }))
    }

    /// Orders the buckets of a `terms` aggregation by a metric sub-aggregation.
    pub fn order_by(mut self, metric: impl Into<String>, descending: bool) -> Self {
        let dir = if descending { "desc" } else { "asc" };
        if let Some(terms) = self.body.get_mut("terms").and_then(Value::as_object_mut) {
            let mut order = Map::new();
            order.insert(metric.into(), Value::String(dir.to_string()));
            terms.insert("order".into(), Value::Array(vec![Value::Object(order)]));
        }
        self
    }

    pub fn cardinality(field: impl Into<String>) -> Self {
        Self::from_body(
            json!({ "cardinality": { "field": field.into(), "precision_threshold": 1000 } }),
        )
    }

    pub fn max(field: impl Into<String>) -> Self {
        Self::from_body(json!({ "max": { "field": field.into() } }))
    }

    pub fn min(field: impl Into<String>) -> Self {
        Self::from_body(json!({ "min": { "field": field.into() } }))
    }

    pub fn from_body(body: Value) -> Self {
        Aggregation {
            body,
            sub_aggregations: BTreeMap::new(),
        }
    }

    pub fn sub_aggregation(mut self, name: impl Into<String>, agg: Aggregation) -> Self {
        self.sub_aggregations.insert(name.into(), agg);
        self
    }

    pub fn to_json(&self) -> Value {
        let mut out = match &self.body {
            Value::Object(m) => m.clone(),
            other => {
                let mut m = Map::new();
                m.insert("raw".into(), other.clone());
                m
            }
        };
        if !self.sub_aggregations.is_empty() {
            let subs: Map<String, Value> = self
                .sub_aggregations
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect();
            out.insert("aggregations".into(), Value::Object(subs));
        }
        Value::Object(out)
    }
}

impl Serialize for Aggregation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// One bucket of a bucket aggregation.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AggregationBucket {
    pub key: Value,
    #[serde(default)]
    pub doc_count: u64,
    #[serde(flatten)]
    pub nested: Map<String, Value>,
}

impl AggregationBucket {
    /// Key rendered as a string, whatever its JSON type.
    pub fn key_str(&self) -> String {
        match &self.key {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Value of a metric sub-aggregation of this bucket.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.nested
            .get(name)
            .and_then(|v| v.get("value"))
            .and_then(Value::as_f64)
    }
}

/// Result of one named aggregation.
#[derive(Clone, Debug, PartialEq)]
pub enum AggregationResult {
    Buckets(Vec<AggregationBucket>),
    Metric(Option<f64>),
    Other(Value),
}

impl AggregationResult {
    pub fn from_json(v: &Value) -> Self {
        if let Some(buckets) = v.get("buckets").and_then(Value::as_array) {
            let parsed: Result<Vec<AggregationBucket>, _> = buckets
                .iter()
                .map(|b| serde_json::from_value(b.clone()))
                .collect();
            if let Ok(parsed) = parsed {
                return AggregationResult::Buckets(parsed);
            }
        }
        if let Some(value) = v.as_object().and_then(|obj| obj.get("value")) {
            return AggregationResult::Metric(value.as_f64());
        }
        AggregationResult::Other(v.clone())
    }

    pub fn buckets(&self) -> &[AggregationBucket] {
        match self {
            AggregationResult::Buckets(b) => b,
            _ => &[],
        }
    }

    pub fn metric(&self) -> Option<f64> {
        match self {
            AggregationResult::Metric(v) => *v,
            _ => None,
        }
    }
}

/// Parses every named aggregation in a search response.
pub fn parse_aggregations(raw: Option<&Value>) -> BTreeMap<String, AggregationResult> {
    raw.and_then(Value::as_object)
        .map(|m| {
            m.iter()
                .map(|(k, v)| (k.clone(), AggregationResult::from_json(v)))
                .collect()
        })
        .unwrap_or_default()
}
