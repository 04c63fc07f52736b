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

use crate::fake_catalog::FakeCatalog;
use catalog::client::{CatalogClient, CatalogClientBuilder};
use catalog::config::ClientConfig;

pub const TEST_BASE_URL: &str = "http://catalog.test";

/// A client wired to an in-memory catalog.
#[derive(Clone, Debug)]
pub struct TestContext {
    pub client: CatalogClient,
    pub catalog: FakeCatalog,
}

impl TestContext {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let catalog = FakeCatalog::new();
        let config = ClientConfig::new(TEST_BASE_URL).unwrap();
        let client = CatalogClientBuilder::new(config)
            .transport(catalog.clone())
            .build()
            .unwrap();
        Self { client, catalog }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
