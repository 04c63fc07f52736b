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
use serde_json::{Map, Value};

/// A catalog asset as returned by index search.
///
/// Type-specific attributes stay in [`Asset::attributes`]; custom metadata is
/// grouped per set in [`Asset::business_attributes`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(default, deserialize_with = "null_default")]
    pub type_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub guid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub attributes: Map<String, Value>,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub business_attributes: Map<String, Value>,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub classification_names: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub meaning_names: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl Asset {
    /// Decodes a search entity and unflattens its custom metadata.
    ///
    /// Search returns custom metadata as flat `<setId>.<attributeId>` keys among
    /// the regular attributes.
    pub fn from_entity(entity: Value) -> Result<Asset, serde_json::Error> {
        let mut asset: Asset = serde_json::from_value(entity)?;
        asset.unflatten_custom_metadata();
        Ok(asset)
    }

    fn unflatten_custom_metadata(&mut self) {
        let dotted: Vec<String> = self
            .attributes
            .keys()
            .filter(|k| k.contains('.'))
            .cloned()
            .collect();
        for key in dotted {
            let Some((set_id, attr_id)) = key.split_once('.') else {
                continue;
            };
            if set_id.is_empty() || attr_id.is_empty() {
                continue;
            }
            let set = self
                .business_attributes
                .entry(set_id.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            // a set already holding a scalar keeps the attribute flattened
            let Value::Object(m) = set else {
                continue;
            };
            if let Some(value) = self.attributes.remove(&key) {
                m.insert(attr_id.to_string(), value);
            }
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn qualified_name(&self) -> Option<&str> {
        self.attribute("qualifiedName").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.attribute("name").and_then(Value::as_str)
    }

    pub fn is_active(&self) -> bool {
        self.status.as_deref().is_none_or(|s| s == "ACTIVE")
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.create_time.and_then(millis_to_utc)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.update_time.and_then(millis_to_utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_search_entity() {
        let asset = Asset::from_entity(json!({
            "typeName": "Table",
            "guid": "7a1f",
            "status": "ACTIVE",
            "displayText": "orders",
            "attributes": {"qualifiedName": "default/snowflake/1/db/sch/orders", "name": "orders"},
            "classificationNames": null,
            "createTime": 1_700_000_000_000_i64,
            "createdBy": "jsmith"
        }))
        .unwrap();
        assert_eq!(asset.type_name, "Table");
        assert_eq!(asset.qualified_name(), Some("default/snowflake/1/db/sch/orders"));
        assert_eq!(asset.name(), Some("orders"));
        assert!(asset.classification_names.is_empty());
        assert!(asset.is_active());
        assert_eq!(
            asset.created_at().map(|t| t.timestamp_millis()),
            Some(1_700_000_000_000)
        );
    }

    #[test]
    fn custom_metadata_is_grouped_by_set() {
        let asset = Asset::from_entity(json!({
            "typeName": "Column",
            "guid": "c-1",
            "attributes": {
                "name": "amount",
                "kLmN2o.pQ3r": "gold",
                "kLmN2o.sT4u": 7,
                "xYz9.aB1": true
            }
        }))
        .unwrap();
        assert_eq!(asset.attributes.len(), 1);
        assert_eq!(
            Value::Object(asset.business_attributes.clone()),
            json!({"kLmN2o": {"pQ3r": "gold", "sT4u": 7}, "xYz9": {"aB1": true}})
        );
    }

    #[test]
    fn scalar_business_attribute_keeps_flattened_value() {
        let asset = Asset::from_entity(json!({
            "typeName": "Column",
            "guid": "c-2",
            "attributes": {"kLmN2o.pQ3r": "gold", "xYz9.aB1": true},
            "businessAttributes": {"kLmN2o": "legacy"}
        }))
        .unwrap();
        assert_eq!(asset.attribute("kLmN2o.pQ3r"), Some(&json!("gold")));
        assert_eq!(
            Value::Object(asset.business_attributes.clone()),
            json!({"kLmN2o": "legacy", "xYz9": {"aB1": true}})
        );
    }

    #[test]
    fn deleted_asset_is_not_active() {
        let asset = Asset {
            status: Some("DELETED".into()),
            ..Default::default()
        };
        assert!(!asset.is_active());
    }
}
