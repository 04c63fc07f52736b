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

use catalog::dsl::{Aggregation, Query, SortItem};
use catalog::search::fluent::{self, FluentSearch};
use catalog_common::fake_catalog::INDEX_SEARCH;
use catalog_common::generators::{BASE_TIME, asset};
use catalog_common::test_context::TestContext;
use serde_json::{Value, json};

fn described(mut a: Value, description: &str) -> Value {
    a["attributes"]["description"] = json!(description);
    a
}

fn seed(ctx: &TestContext) {
    let mut archived = asset("t-archived", "Table", BASE_TIME + 5);
    archived["status"] = json!("DELETED");
    ctx.catalog.add_assets([
        described(asset("t-orders", "Table", BASE_TIME), "all orders"),
        asset("t-users", "Table", BASE_TIME + 1),
        described(asset("v-orders", "View", BASE_TIME + 2), "orders view"),
        asset("c-id", "Column", BASE_TIME + 3),
        archived,
    ]);
}

#[catalog_macros::test]
async fn conditions_filter_assets(ctx: TestContext) {
    seed(&ctx);

    let results = FluentSearch::new()
        .where_(fluent::active_assets())
        .where_(fluent::asset_types(["Table", "View"]))
        .sort(SortItem::asc("name.keyword"))
        .execute(&ctx.client, false)
        .await
        .unwrap();
    let names: Vec<&str> = results.current_page().iter().filter_map(|a| a.name()).collect();
    assert_eq!(names, vec!["t-orders", "t-users", "v-orders"]);

    let described_tables = FluentSearch::new()
        .where_(fluent::active_assets())
        .where_not(fluent::asset_type("View"))
        .where_some(Query::exists("description"))
        .where_some(Query::exists("userDescription"))
        .min_somes(1)
        .include_on_results("description")
        .execute(&ctx.client, false)
        .await
        .unwrap();
    let guids: Vec<&str> = described_tables
        .current_page()
        .iter()
        .map(|a| a.guid.as_str())
        .collect();
    assert_eq!(guids, vec!["t-orders"]);
    assert_eq!(
        described_tables.current_page()[0].attribute("description"),
        Some(&json!("all orders"))
    );
}

#[catalog_macros::test]
async fn count_sends_an_empty_page(ctx: TestContext) {
    seed(&ctx);

    let count = FluentSearch::new()
        .where_(fluent::active_assets())
        .where_(fluent::super_types(["Catalog"]))
        .sort(SortItem::asc("name.keyword"))
        .count(&ctx.client)
        .await
        .unwrap();
    assert_eq!(count, 4);

    let request = &ctx.catalog.requests_to(INDEX_SEARCH)[0];
    assert_eq!(request.size(), 0);
    assert!(request.sorts().is_empty());
}

#[catalog_macros::test]
async fn aggregations_are_returned(ctx: TestContext) {
    seed(&ctx);

    let results = FluentSearch::new()
        .where_(fluent::active_assets())
        .aggregate("types", Aggregation::terms("__typeName.keyword", 10))
        .page_size(0)
        .execute(&ctx.client, false)
        .await
        .unwrap();
    assert!(results.current_page().is_empty());

    let aggs = results.aggregations();
    let buckets: Vec<(String, u64)> = aggs["types"]
        .buckets()
        .iter()
        .map(|b| (b.key_str(), b.doc_count))
        .collect();
    assert_eq!(
        buckets,
        vec![
            ("Table".to_string(), 2),
            ("Column".to_string(), 1),
            ("View".to_string(), 1)
        ]
    );
}
