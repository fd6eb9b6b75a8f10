// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag metadata derived from a payload.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use understory_drop::data::{DataMap, DataValue};
use understory_drop::types::DragPayload;

/// What policies know about the dragged item.
///
/// Read from the payload data first, then from the payload's source node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DragMeta {
    /// Application-level id of the dragged item.
    pub id: String,
    /// Semantic tag of the dragged item; selects the source policy.
    pub tag_name: String,
    /// Logical levels of the item (several for multi-level components).
    pub level: Vec<i64>,
    /// True when the drag comes from a palette rather than an existing item.
    pub is_new: bool,
    /// True when the item must be inserted first in its destination.
    pub requires_first_index: bool,
    /// Container the item currently lives in.
    pub parent_canvas_id: Option<String>,
    /// Free-form subtype hint.
    pub variant: Option<String>,
}

impl DragMeta {
    /// Derive metadata from `payload`.
    ///
    /// | field                  | data key             | fallback                         |
    /// |------------------------|----------------------|----------------------------------|
    /// | `id`                   | `id`                 | source node id                   |
    /// | `tag_name`             | `tagName`            | source node tag, then type tag   |
    /// | `level`                | `level`              | source node `level` attribute    |
    /// | `is_new`               | `isNew`              | source node `isNew` attribute    |
    /// | `requires_first_index` | `requiresFirstIndex` | false                            |
    /// | `parent_canvas_id`     | `parentCanvasId`     | source node `parentId` attribute |
    /// | `variant`              | `variant`            | none                             |
    pub fn from_payload(payload: &DragPayload) -> Self {
        let data = &payload.data;
        let node = payload.source_node.as_ref();
        let attrs = node.map(|n| &n.attributes);

        let id = data
            .get_str("id")
            .map(ToString::to_string)
            .or_else(|| node.map(|n| n.id.clone()))
            .unwrap_or_default();
        let tag_name = data
            .get_str("tagName")
            .map(ToString::to_string)
            .or_else(|| node.map(|n| n.tag_name.clone()).filter(|t| !t.is_empty()))
            .unwrap_or_else(|| payload.type_tag.clone());
        let level = data
            .get("level")
            .map(levels)
            .filter(|l| !l.is_empty())
            .or_else(|| attrs.and_then(|a| a.get("level")).map(levels))
            .unwrap_or_default();
        let is_new =
            data.get_bool("isNew") == Some(true) || attrs.is_some_and(|a| flag(a, "isNew"));
        let requires_first_index = data.get_bool("requiresFirstIndex") == Some(true);
        let parent_canvas_id = data
            .get_str("parentCanvasId")
            .or_else(|| attrs.and_then(|a| a.get_str("parentId")))
            .map(ToString::to_string);
        let variant = data.get_str("variant").map(ToString::to_string);

        Self {
            id,
            tag_name,
            level,
            is_new,
            requires_first_index,
            parent_canvas_id,
            variant,
        }
    }

    /// Returns true if the item declares `level`.
    pub fn has_level(&self, level: i64) -> bool {
        self.level.contains(&level)
    }
}

// Accepts an int, a numeric string, or a list of either.
fn levels(value: &DataValue) -> Vec<i64> {
    match value {
        DataValue::List(items) => items.iter().filter_map(level).collect(),
        other => level(other).into_iter().collect(),
    }
}

fn level(value: &DataValue) -> Option<i64> {
    match value {
        DataValue::Int(i) => Some(*i),
        DataValue::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag(attrs: &DataMap, key: &str) -> bool {
    match attrs.get(key) {
        Some(DataValue::Bool(b)) => *b,
        Some(DataValue::Str(s)) => s == "true",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_drop::types::SourceNode;

    #[test]
    fn data_fields_win() {
        let payload = DragPayload::new("element")
            .with_data(
                DataMap::new()
                    .with("id", "card-1")
                    .with("tagName", "Card")
                    .with("level", vec![2_i64, 5])
                    .with("isNew", true)
                    .with("requiresFirstIndex", true)
                    .with("parentCanvasId", "list-a")
                    .with("variant", "palette"),
            )
            .with_source_node(SourceNode {
                id: "ignored".into(),
                tag_name: "Ignored".into(),
                attributes: DataMap::new(),
            });
        let meta = DragMeta::from_payload(&payload);
        assert_eq!(meta.id, "card-1");
        assert_eq!(meta.tag_name, "Card");
        assert_eq!(meta.level, vec![2, 5]);
        assert!(meta.is_new);
        assert!(meta.requires_first_index);
        assert_eq!(meta.parent_canvas_id.as_deref(), Some("list-a"));
        assert_eq!(meta.variant.as_deref(), Some("palette"));
    }

    #[test]
    fn falls_back_to_source_node() {
        let payload = DragPayload::new("element").with_source_node(SourceNode {
            id: "n7".into(),
            tag_name: "Branch".into(),
            attributes: DataMap::new()
                .with("level", "3")
                .with("isNew", "true")
                .with("parentId", "root"),
        });
        let meta = DragMeta::from_payload(&payload);
        assert_eq!(meta.id, "n7");
        assert_eq!(meta.tag_name, "Branch");
        assert!(meta.has_level(3));
        assert!(meta.is_new);
        assert!(!meta.requires_first_index);
        assert_eq!(meta.parent_canvas_id.as_deref(), Some("root"));
    }

    #[test]
    fn bare_payload_uses_type_tag() {
        let meta = DragMeta::from_payload(&DragPayload::new("file"));
        assert_eq!(meta.tag_name, "file");
        assert!(meta.id.is_empty());
        assert!(meta.level.is_empty());
        assert!(!meta.is_new);
    }
}
