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

use super::millis_to_utc;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of change recorded by an audit entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    EntityCreate,
    EntityUpdate,
    EntityDelete,
    EntityPurge,
    EntityImportCreate,
    EntityImportUpdate,
    EntityImportDelete,
    ClassificationAdd,
    ClassificationDelete,
    ClassificationUpdate,
    PropagatedClassificationAdd,
    PropagatedClassificationDelete,
    PropagatedClassificationUpdate,
    TermAdd,
    TermDelete,
    LabelAdd,
    LabelDelete,
    BusinessAttributeUpdate,
    #[serde(other)]
    Unknown,
}

/// One entry of the entity audit log.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityAudit {
    #[serde(default)]
    pub entity_qualified_name: Option<String>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub action: Option<AuditAction>,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub event_key: Option<String>,
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub headers: Option<Value>,
}

impl EntityAudit {
    /// Identity of the entry; the event key when the server provides one.
    pub fn unique_key(&self) -> String {
        match &self.event_key {
            Some(k) if !k.is_empty() => k.clone(),
            _ => format!(
                "{}:{}",
                self.entity_id.as_deref().unwrap_or(""),
                self.created.or(self.timestamp).unwrap_or_default()
            ),
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.and_then(millis_to_utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_audit_entry() {
        let audit: EntityAudit = serde_json::from_value(json!({
            "entityQualifiedName": "default/snowflake/1/db",
            "typeName": "Database",
            "entityId": "g-1",
            "timestamp": 1_700_000_000_001_i64,
            "created": 1_700_000_000_000_i64,
            "user": "jsmith",
            "action": "ENTITY_UPDATE",
            "eventKey": "g-1:1700000000000",
            "detail": {"guid": "g-1", "typeName": "Database"}
        }))
        .unwrap();
        assert_eq!(audit.action, Some(AuditAction::EntityUpdate));
        assert_eq!(
            audit.detail.as_ref().and_then(|d| d.get("typeName")),
            Some(&json!("Database"))
        );
        assert_eq!(audit.unique_key(), "g-1:1700000000000");
    }

    #[test]
    fn unknown_action_and_fallback_key() {
        let audit: EntityAudit = serde_json::from_value(json!({
            "entityId": "g-2",
            "created": 42,
            "action": "SOMETHING_NEW"
        }))
        .unwrap();
        assert_eq!(audit.action, Some(AuditAction::Unknown));
        assert_eq!(audit.unique_key(), "g-2:42");
    }
}
