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

//! Entity audit search

use super::{SearchCriteria, SearchKind, SearchResults};
use crate::dsl::{BoolQuery, Dsl, Query, SortItem};
use crate::model::EntityAudit;
use serde::Serialize;
use serde_json::Value;

/// Body of an entity audit search.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSearchRequest {
    pub dsl: Dsl,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

impl AuditSearchRequest {
    pub fn new(dsl: Dsl) -> Self {
        AuditSearchRequest {
            dsl,
            attributes: Vec::new(),
        }
    }

    /// Entity attributes to include in each entry's entity detail.
    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    fn newest_first(query: BoolQuery, size: usize) -> Self {
        AuditSearchRequest::new(
            Dsl::with_query(query)
                .size(size)
                .sort(SortItem::desc("created")),
        )
    }

    /// Audit entries of one asset, newest first.
    pub fn by_guid(guid: &str, size: usize) -> Self {
        Self::newest_first(BoolQuery::new().filter(Query::term("entityId", guid)), size)
    }

    /// Audit entries of changes made by one user, newest first.
    pub fn by_user(user: &str, size: usize) -> Self {
        Self::newest_first(BoolQuery::new().filter(Query::term("user", user)), size)
    }

    /// Audit entries of one asset identified by type and qualified name, newest first.
    pub fn by_qualified_name(type_name: &str, qualified_name: &str, size: usize) -> Self {
        Self::newest_first(
            BoolQuery::new()
                .filter(Query::term("entityQualifiedName", qualified_name))
                .filter(Query::term("typeName", type_name)),
            size,
        )
    }
}

impl SearchCriteria for AuditSearchRequest {
    fn dsl(&self) -> &Dsl {
        &self.dsl
    }

    fn dsl_mut(&mut self) -> &mut Dsl {
        &mut self.dsl
    }
}

/// Searches entity audits through `/api/meta/entity/auditSearch`.
#[derive(Clone, Copy, Debug)]
pub struct AuditSearchKind;

impl SearchKind for AuditSearchKind {
    type Request = AuditSearchRequest;
    type Item = EntityAudit;

    const NAME: &'static str = "audit search";
    const ENDPOINT: &'static str = "/api/meta/entity/auditSearch";
    const RESULTS_FIELD: &'static str = "entityAudits";
    const COUNT_FIELD: &'static str = "totalCount";
    const TIMESTAMP_FIELD: &'static str = "created";
    const MASS_EXTRACT_THRESHOLD: u64 = 10_000 - crate::dsl::DEFAULT_PAGE_SIZE as u64;

    fn tiebreakers() -> Vec<SortItem> {
        vec![SortItem::asc("entityId")]
    }

    fn decode_item(raw: Value) -> Result<EntityAudit, serde_json::Error> {
        serde_json::from_value(raw)
    }

    fn timestamp(item: &EntityAudit) -> Option<i64> {
        item.created
    }

    fn unique_key(item: &EntityAudit) -> String {
        item.unique_key()
    }
}

pub type AuditSearchResults = SearchResults<AuditSearchKind>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn by_guid_json() {
        assert_eq!(
            serde_json::to_value(AuditSearchRequest::by_guid("g-1", 25)).unwrap(),
            json!({
                "dsl": {
                    "from": 0,
                    "size": 25,
                    "query": {"bool": {"filter": [{"term": {"entityId": {"value": "g-1"}}}]}},
                    "sort": [{"created": {"order": "desc"}}]
                }
            })
        );
    }

    #[test]
    fn by_qualified_name_filters_type() {
        let request = AuditSearchRequest::by_qualified_name("Table", "default/pg/1/db/s/t", 10);
        let Some(Query::Bool(b)) = &request.dsl.query else {
            panic!("expected bool query");
        };
        assert_eq!(
            b.filter,
            vec![
                Query::term("entityQualifiedName", "default/pg/1/db/s/t"),
                Query::term("typeName", "Table"),
            ]
        );
    }
}
