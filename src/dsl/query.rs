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

//! Query clauses of the search DSL.
//!
//! Every clause serializes to the Elasticsearch query JSON understood by the
//! catalog's search endpoints.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

/// A single query clause.
#[derive(Clone, Debug, PartialEq)]
pub enum Query {
    MatchAll,
    Term {
        field: String,
        value: Value,
        case_insensitive: bool,
    },
    Terms {
        field: String,
        values: Vec<Value>,
    },
    Range(Range),
    Exists {
        field: String,
    },
    Prefix {
        field: String,
        value: String,
    },
    Wildcard {
        field: String,
        value: String,
    },
    Match {
        field: String,
        query: String,
    },
    Bool(BoolQuery),
    /// Clause passed through to the server untouched.
    Raw(Value),
}

/// Range clause. Bounds are left as JSON so both epoch millis and date math work.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Range {
    pub field: String,
    pub gt: Option<Value>,
    pub gte: Option<Value>,
    pub lt: Option<Value>,
    pub lte: Option<Value>,
    pub format: Option<String>,
}

impl Range {
    pub fn new(field: impl Into<String>) -> Self {
        Range {
            field: field.into(),
            ..Default::default()
        }
    }

    pub fn gt(mut self, v: impl Into<Value>) -> Self {
        self.gt = Some(v.into());
        self
    }

    pub fn gte(mut self, v: impl Into<Value>) -> Self {
        self.gte = Some(v.into());
        self
    }

    pub fn lt(mut self, v: impl Into<Value>) -> Self {
        self.lt = Some(v.into());
        self
    }

    pub fn lte(mut self, v: impl Into<Value>) -> Self {
        self.lte = Some(v.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Compound `bool` clause.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoolQuery {
    pub filter: Vec<Query>,
    pub must: Vec<Query>,
    pub must_not: Vec<Query>,
    pub should: Vec<Query>,
    pub minimum_should_match: Option<u32>,
    pub boost: Option<f64>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, q: Query) -> Self {
        self.filter.push(q);
        self
    }

    pub fn must(mut self, q: Query) -> Self {
        self.must.push(q);
        self
    }

    pub fn must_not(mut self, q: Query) -> Self {
        self.must_not.push(q);
        self
    }

    pub fn should(mut self, q: Query) -> Self {
        self.should.push(q);
        self
    }

    pub fn minimum_should_match(mut self, n: u32) -> Self {
        self.minimum_should_match = Some(n);
        self
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filter.is_empty()
            && self.must.is_empty()
            && self.must_not.is_empty()
            && self.should.is_empty()
    }
}

impl From<BoolQuery> for Query {
    fn from(b: BoolQuery) -> Self {
        Query::Bool(b)
    }
}

impl From<Range> for Query {
    fn from(r: Range) -> Self {
        Query::Range(r)
    }
}

impl Query {
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
            case_insensitive: false,
        }
    }

    pub fn term_ci(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
            case_insensitive: true,
        }
    }

    pub fn terms<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Query::Terms {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Query::Exists {
            field: field.into(),
        }
    }

    pub fn prefix(field: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Prefix {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn wildcard(field: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Wildcard {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(field: impl Into<String>, query: impl Into<String>) -> Self {
        Query::Match {
            field: field.into(),
            query: query.into(),
        }
    }

    /// Renders the clause as server JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Query::MatchAll => json!({ "match_all": {} }),
            Query::Term {
                field,
                value,
                case_insensitive,
            } => {
                let mut inner = Map::new();
                inner.insert("value".into(), value.clone());
                if *case_insensitive {
                    inner.insert("case_insensitive".into(), Value::Bool(true));
                }
                json!({ "term": { field.as_str(): inner } })
            }
            Query::Terms { field, values } => json!({ "terms": { field.as_str(): values } }),
            Query::Range(r) => {
                let mut inner = Map::new();
                for (k, v) in [("gt", &r.gt), ("gte", &r.gte), ("lt", &r.lt), ("lte", &r.lte)] {
                    if let Some(v) = v {
                        inner.insert(k.into(), v.clone());
                    }
                }
                if let Some(f) = &r.format {
                    inner.insert("format".into(), Value::String(f.clone()));
                }
                json!({ "range": { r.field.as_str(): inner } })
            }
            Query::Exists { field } => json!({ "exists": { "field": field } }),
            Query::Prefix { field, value } => {
                json!({ "prefix": { field.as_str(): { "value": value } } })
            }
            Query::Wildcard { field, value } => {
                json!({ "wildcard": { field.as_str(): { "value": value } } })
            }
            Query::Match { field, query } => {
                json!({ "match": { field.as_str(): { "query": query } } })
            }
            Query::Bool(b) => {
                let mut inner = Map::new();
                for (k, clauses) in [
                    ("filter", &b.filter),
                    ("must", &b.must),
                    ("must_not", &b.must_not),
                    ("should", &b.should),
                ] {
                    if !clauses.is_empty() {
                        inner.insert(
                            k.into(),
                            Value::Array(clauses.iter().map(Query::to_json).collect()),
                        );
                    }
                }
                if let Some(n) = b.minimum_should_match {
                    inner.insert("minimum_should_match".into(), json!(n));
                }
                if let Some(boost) = b.boost {
                    inner.insert("boost".into(), json!(boost));
                }
                json!({ "bool": inner })
            }
            Query::Raw(v) => v.clone(),
        }
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_renders_value_object() {
        assert_eq!(
            Query::term("__typeName.keyword", "Table").to_json(),
            json!({"term": {"__typeName.keyword": {"value": "Table"}}})
        );
        assert_eq!(
            Query::term_ci("name.keyword", "orders").to_json(),
            json!({"term": {"name.keyword": {"value": "orders", "case_insensitive": true}}})
        );
    }

    #[test]
    fn range_renders_only_set_bounds() {
        let r: Query = Range::new("__timestamp").gte(1_700_000_000_000_i64).into();
        assert_eq!(
            r.to_json(),
            json!({"range": {"__timestamp": {"gte": 1_700_000_000_000_i64}}})
        );
    }

    #[test]
    fn bool_skips_empty_sections() {
        let q: Query = BoolQuery::new()
            .filter(Query::term("__state", "ACTIVE"))
            .should(Query::exists("description"))
            .should(Query::exists("userDescription"))
            .minimum_should_match(1)
            .into();
        assert_eq!(
            q.to_json(),
            json!({"bool": {
                "filter": [{"term": {"__state": {"value": "ACTIVE"}}}],
                "should": [
                    {"exists": {"field": "description"}},
                    {"exists": {"field": "userDescription"}}
                ],
                "minimum_should_match": 1
            }})
        );
    }

    #[test]
    fn raw_passes_through() {
        let raw = json!({"script": {"script": "doc['x'].value > 1"}});
        assert_eq!(Query::Raw(raw.clone()).to_json(), raw);
        assert_eq!(serde_json::to_value(Query::Raw(raw.clone())).unwrap(), raw);
    }
}
