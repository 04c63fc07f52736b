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
use catalog_common::generators::{assets, assets_with_shared_timestamps};
use catalog_common::test_context::TestContext;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tokio::runtime::Runtime;

const N_ASSETS: usize = 5_000;

fn collect(rt: &Runtime, ctx: &TestContext, bulk: bool, page_size: usize) -> usize {
    rt.block_on(async {
        ctx.client
            .index_search(IndexSearchRequest::new(Dsl::default().size(page_size)))
            .bulk(bulk)
            .build()
            .send()
            .await
            .unwrap()
            .collect_all()
            .await
            .unwrap()
            .len()
    })
}

fn bench_paging(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let distinct = TestContext::new();
    distinct.catalog.add_assets(assets("Table", N_ASSETS));
    let shared = TestContext::new();
    shared
        .catalog
        .add_assets(assets_with_shared_timestamps("Table", N_ASSETS, 50, 42));

    let mut group = c.benchmark_group("search_paging");
    group.sample_size(10);
    for page_size in [100, 300, 1000] {
        group.bench_with_input(BenchmarkId::new("offset", page_size), &page_size, |b, &size| {
            b.iter(|| black_box(collect(&rt, &distinct, false, size)))
        });
        group.bench_with_input(BenchmarkId::new("bulk", page_size), &page_size, |b, &size| {
            b.iter(|| black_box(collect(&rt, &distinct, true, size)))
        });
        group.bench_with_input(
            BenchmarkId::new("bulk_shared_timestamps", page_size),
            &page_size,
            |b, &size| b.iter(|| black_box(collect(&rt, &shared, true, size))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_paging);
criterion_main!(benches);
