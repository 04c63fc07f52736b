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

use super::{millis_to_utc, null_default};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One recorded search or asset view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLogEntry {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub search_input: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub entity_guids_all: Vec<String>,
    #[serde(default, deserialize_with = "null_default", rename = "entityQFNamesAll")]
    pub entity_qf_names_all: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub entity_type_names_all: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub utm_tags: Vec<String>,
    #[serde(default)]
    pub has_result: Option<bool>,
    #[serde(default)]
    pub results_count: Option<u64>,
    #[serde(default)]
    pub response_time: Option<u64>,
    #[serde(default)]
    pub request: Option<Value>,
}

impl SearchLogEntry {
    /// Identity of the entry: who, when and on what.
    pub fn unique_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.user_name.as_deref().unwrap_or(""),
            self.timestamp.unwrap_or_default(),
            self.entity_guids_all.join(",")
        )
    }

    pub fn logged_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(millis_to_utc)
    }
}

/// How often one user viewed an asset.
#[derive(Clone, Debug, PartialEq)]
pub struct UserViews {
    pub username: String,
    pub view_count: u64,
    pub most_recent_view: Option<i64>,
}

/// How often an asset was viewed.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetViews {
    pub guid: String,
    pub total_views: u64,
    pub distinct_users: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_log_entry() {
        let entry: SearchLogEntry = serde_json::from_value(json!({
            "userName": "jsmith",
            "timestamp": 1_700_000_000_000_i64,
            "entityGuidsAll": ["g-1", "g-2"],
            "entityQFNamesAll": ["qn1", "qn2"],
            "utmTags": null,
            "hasResult": true
        }))
        .unwrap();
        assert_eq!(entry.entity_qf_names_all, vec!["qn1", "qn2"]);
        assert!(entry.utm_tags.is_empty());
        assert_eq!(entry.unique_key(), "jsmith:1700000000000:g-1,g-2");
    }
}
