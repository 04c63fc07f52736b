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

//! Test helpers shared by the integration tests and benches: an in-memory
//! catalog speaking the search endpoints, record generators, and a test context.

pub mod fake_catalog;
pub mod generators;
pub mod test_context;
