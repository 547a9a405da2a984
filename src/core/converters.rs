//! 回應轉換器：在反序列化前為多型物件補上 `__typename`。

use crate::domain::model::ItemType;
use crate::domain::ports::ResponseConverter;
use serde_json::{Map, Value};

const TYPENAME: &str = "__typename";

/// 依數字 `itemType` 推斷 `Item` 的具體型別
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemConverter;

impl ResponseConverter for ItemConverter {
    fn convert(&self, object: &mut Map<String, Value>) {
        if object.contains_key(TYPENAME) {
            return;
        }
        let Some(id) = object.get("itemType").and_then(Value::as_i64) else {
            return;
        };
        let typename = ItemType::from_id(id).map(ItemType::name).unwrap_or("Unknown");
        object.insert(TYPENAME.to_string(), Value::String(typename.to_string()));
    }
}

/// 區分 sitemap 節點：`t` 開頭的 id 是分類節點，`p` 開頭的是頁面
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxonomyItemConverter;

impl TaxonomyItemConverter {
    const TAXONOMY: &'static str = "TaxonomySitemapItem";
    const PAGE: &'static str = "PageSitemapItem";
}

impl ResponseConverter for TaxonomyItemConverter {
    fn convert(&self, object: &mut Map<String, Value>) {
        if object.contains_key(TYPENAME) || !object.contains_key("title") {
            return;
        }
        let Some(id) = object.get("id").and_then(Value::as_str) else {
            return;
        };

        let typename = if id.starts_with('t') {
            Self::TAXONOMY
        } else if id.starts_with('p') {
            Self::PAGE
        } else if object.contains_key("items") || object.contains_key("hasChildNodes") {
            Self::TAXONOMY
        } else {
            Self::PAGE
        };
        object.insert(TYPENAME.to_string(), Value::String(typename.to_string()));
    }
}
