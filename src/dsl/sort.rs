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

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// One sort criterion, rendered as `{"<field>": {"order": "asc"}}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortItem {
    pub field: String,
    pub order: SortOrder,
}

impl SortItem {
    pub fn asc(field: impl Into<String>) -> Self {
        SortItem {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        SortItem {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }
}

impl Serialize for SortItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Order(SortOrder);
        impl Serialize for Order {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut m = serializer.serialize_map(Some(1))?;
                m.serialize_entry("order", self.0.as_str())?;
                m.end()
            }
        }

        let mut m = serializer.serialize_map(Some(1))?;
        m.serialize_entry(&self.field, &Order(self.order))?;
        m.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sort_item_json() {
        assert_eq!(
            serde_json::to_value(SortItem::asc("__timestamp")).unwrap(),
            json!({"__timestamp": {"order": "asc"}})
        );
        assert_eq!(
            serde_json::to_value(SortItem::desc("created")).unwrap(),
            json!({"created": {"order": "desc"}})
        );
    }
}
