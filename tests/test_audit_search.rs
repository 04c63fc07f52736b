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

use catalog::model::AuditAction;
use catalog::search::{AuditSearchRequest, AuditSearchResults};
use catalog::types::SearchApi;
use catalog_common::fake_catalog::AUDIT_SEARCH;
use catalog_common::generators::{BASE_TIME, audit};
use catalog_common::test_context::TestContext;
use std::collections::HashSet;

#[catalog_macros::test]
async fn audits_by_user_newest_first(ctx: TestContext) {
    ctx.catalog.add_audits(
        (0..40).map(|i| audit(&format!("guid-{i:03}"), BASE_TIME + i * 1000, "jsmith", "ENTITY_UPDATE")),
    );
    ctx.catalog
        .add_audits((0..5).map(|i| audit("guid-x", BASE_TIME + i, "admin", "ENTITY_CREATE")));

    let results: AuditSearchResults = ctx
        .client
        .audit_search(AuditSearchRequest::by_user("jsmith", 15))
        .build()
        .send()
        .await
        .unwrap();
    assert_eq!(results.count(), 40);
    assert!(!results.is_bulk());

    let entries = results.collect_all().await.unwrap();
    assert_eq!(entries.len(), 40);
    assert_eq!(entries[0].entity_id.as_deref(), Some("guid-039"));
    assert_eq!(entries[39].entity_id.as_deref(), Some("guid-000"));
    assert!(entries.iter().all(|e| e.action == Some(AuditAction::EntityUpdate)));
    assert!(entries.windows(2).all(|w| w[0].created >= w[1].created));

    let sorts = ctx.catalog.requests_to(AUDIT_SEARCH)[0].sorts();
    assert_eq!(
        sorts,
        vec![
            ("created".to_string(), "desc".to_string()),
            ("entityId".to_string(), "asc".to_string())
        ]
    );
}

#[catalog_macros::test]
async fn audits_by_qualified_name(ctx: TestContext) {
    ctx.catalog.add_audits([
        audit("guid-a", BASE_TIME, "jsmith", "ENTITY_CREATE"),
        audit("guid-a", BASE_TIME + 10, "jsmith", "CLASSIFICATION_ADD"),
        audit("guid-b", BASE_TIME + 20, "jsmith", "ENTITY_CREATE"),
    ]);

    let results = ctx
        .client
        .audit_search(AuditSearchRequest::by_qualified_name(
            "Table",
            "default/table/guid-a",
            10,
        ))
        .build()
        .send()
        .await
        .unwrap();
    let actions: Vec<Option<AuditAction>> =
        results.current_page().iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![Some(AuditAction::ClassificationAdd), Some(AuditAction::EntityCreate)]
    );
}

#[catalog_macros::test(max_result_window = 100)]
async fn large_audit_history_pages_by_creation_time(ctx: TestContext) {
    ctx.catalog.add_audits(
        (0..250).map(|i| audit("guid-hot", BASE_TIME + i * 10, "etl", "ENTITY_UPDATE")),
    );
    ctx.catalog.report_count(AUDIT_SEARCH, 20_000);

    let results = ctx
        .client
        .audit_search(AuditSearchRequest::by_guid("guid-hot", 40))
        .build()
        .send()
        .await
        .unwrap();
    assert!(results.is_bulk());

    let entries = results.collect_all().await.unwrap();
    let keys: HashSet<String> = entries.iter().map(|e| e.unique_key()).collect();
    assert_eq!(entries.len(), 250);
    assert_eq!(keys.len(), 250);
    assert!(entries.windows(2).all(|w| w[0].created <= w[1].created));

    let requests = ctx.catalog.requests_to(AUDIT_SEARCH);
    assert_eq!(
        requests[1].sorts(),
        vec![
            ("created".to_string(), "asc".to_string()),
            ("entityId".to_string(), "asc".to_string())
        ]
    );
    assert!(requests.iter().all(|r| r.from() + r.size() <= 100));
}
