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

//! Records in the shape the search endpoints return them.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};

/// 2024-01-01T00:00:00Z in epoch millis.
pub const BASE_TIME: i64 = 1_704_067_200_000;

pub fn asset(guid: &str, type_name: &str, create_time: i64) -> Value {
    json!({
        "typeName": type_name,
        "guid": guid,
        "status": "ACTIVE",
        "displayText": guid,
        "attributes": {
            "name": guid,
            "qualifiedName": format!("default/{}/{guid}", type_name.to_lowercase()),
        },
        "createTime": create_time,
        "updateTime": create_time,
        "createdBy": "tester",
        "superTypeNames": ["Asset", "Catalog"],
    })
}

/// `n` assets created one second apart from [`BASE_TIME`].
pub fn assets(type_name: &str, n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| asset(&format!("{type_name}-{i:06}"), type_name, BASE_TIME + i as i64 * 1000))
        .collect()
}

/// `n` assets whose creation times are drawn from `spread` distinct values,
/// so many of them share a timestamp.
pub fn assets_with_shared_timestamps(type_name: &str, n: usize, spread: i64, seed: u64) -> Vec<Value> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let ts = BASE_TIME + rng.random_range(0..spread.max(1)) * 1000;
            asset(&format!("{type_name}-{i:06}"), type_name, ts)
        })
        .collect()
}

pub fn audit(entity_id: &str, created: i64, user: &str, action: &str) -> Value {
    json!({
        "entityQualifiedName": format!("default/table/{entity_id}"),
        "typeName": "Table",
        "entityId": entity_id,
        "timestamp": created,
        "created": created,
        "user": user,
        "action": action,
        "details": "",
        "eventKey": format!("{entity_id}:{created}:{action}"),
    })
}

/// A search-log entry recording `user` opening the asset `guid`.
pub fn search_log_view(user: &str, guid: &str, timestamp: i64) -> Value {
    json!({
        "userName": user,
        "userAgent": "Mozilla/5.0",
        "host": "tenant.example.com",
        "timestamp": timestamp,
        "createdAt": timestamp,
        "searchInput": "",
        "entityGuidsAll": [guid],
        "entityTypeNamesAll": ["Table"],
        "utmTags": ["action_asset_viewed", "page_assets"],
        "hasResult": true,
        "resultsCount": 1,
    })
}

/// A search-log entry of a free-text search, which is not a view.
pub fn search_log_search(user: &str, text: &str, timestamp: i64) -> Value {
    json!({
        "userName": user,
        "timestamp": timestamp,
        "createdAt": timestamp,
        "searchInput": text,
        "entityGuidsAll": [],
        "utmTags": ["ui_main_list", "action_searched"],
        "hasResult": false,
        "resultsCount": 0,
    })
}
