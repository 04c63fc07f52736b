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

use catalog::dsl::Dsl;
use catalog::search::IndexSearchRequest;
use catalog::types::SearchApi;
use catalog_common::generators::assets_with_shared_timestamps;
use catalog_common::test_context::TestContext;
use quickcheck::{QuickCheck, TestResult};
use std::collections::HashSet;

/// Pages through `n` assets by timestamp and checks each comes back exactly once.
fn bulk_returns_every_asset_once(n: u16, spread: u8, page: u8, seed: u64) -> TestResult {
    let n = usize::from(n % 400);
    let spread = i64::from(spread % 50) + 1;
    let page = usize::from(page % 120) + 1;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let found = rt.block_on(async {
        let ctx = TestContext::new();
        ctx.catalog
            .add_assets(assets_with_shared_timestamps("Table", n, spread, seed));
        ctx.client
            .index_search(IndexSearchRequest::new(Dsl::default().size(page)))
            .bulk(true)
            .build()
            .send()
            .await
            .unwrap()
            .collect_all()
            .await
            .unwrap()
    });

    let unique: HashSet<&str> = found.iter().map(|a| a.guid.as_str()).collect();
    TestResult::from_bool(found.len() == n && unique.len() == n)
}

#[test]
fn bulk_paging_returns_every_asset_once() {
    QuickCheck::new()
        .tests(50)
        .quickcheck(bulk_returns_every_asset_once as fn(u16, u8, u8, u64) -> TestResult);
}
