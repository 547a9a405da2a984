//! 回應端的內容模型。欄位名稱對應 GraphQL schema（camelCase）。

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge<T> {
    #[serde(default)]
    pub cursor: Option<String>,
    pub node: T,
}

/// Relay 風格的分頁連線
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

impl<T> Connection<T> {
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    /// 下一頁的 `after` 游標
    pub fn last_cursor(&self) -> Option<&str> {
        self.edges.last().and_then(|edge| edge.cursor.as_deref())
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMeta {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub value_type: Option<String>,
}

pub type CustomMetaConnection = Connection<CustomMeta>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub char_set: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub item_id: i32,
    pub publication_id: i32,
    #[serde(default)]
    pub namespace_id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub page_template_id: Option<i32>,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub initial_publish_date: Option<String>,
    #[serde(default)]
    pub last_publish_date: Option<String>,
    #[serde(default)]
    pub custom_metas: Option<CustomMetaConnection>,
    #[serde(default)]
    pub raw_content: Option<RawContent>,
    #[serde(default)]
    pub container_items: Option<Vec<Value>>,
}

pub type PageConnection = Connection<Page>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryVariant {
    #[serde(default)]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(rename = "type", default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryComponent {
    pub id: String,
    pub item_id: i32,
    pub publication_id: i32,
    #[serde(default)]
    pub namespace_id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub last_publish_date: Option<String>,
    #[serde(default)]
    pub custom_metas: Option<CustomMetaConnection>,
    #[serde(default)]
    pub variants: Option<Connection<BinaryVariant>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: String,
    pub publication_id: i32,
    #[serde(default)]
    pub item_id: Option<i32>,
    #[serde(default)]
    pub namespace_id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publication_key: Option<String>,
    #[serde(default)]
    pub publication_url: Option<String>,
    #[serde(default)]
    pub multimedia_url: Option<String>,
    #[serde(default)]
    pub custom_metas: Option<CustomMetaConnection>,
}

pub type PublicationConnection = Connection<Publication>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationMapping {
    pub publication_id: i32,
    #[serde(default)]
    pub namespace_id: Option<i32>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub publication_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureGroup {
    pub id: String,
    pub item_id: i32,
    pub publication_id: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub custom_metas: Option<CustomMetaConnection>,
}

pub type StructureGroupConnection = Connection<StructureGroup>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub item_id: i32,
    pub publication_id: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub schema_id: Option<i32>,
    #[serde(default)]
    pub multimedia: Option<bool>,
    #[serde(default)]
    pub custom_metas: Option<CustomMetaConnection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub id: String,
    pub item_id: i32,
    pub publication_id: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub taxonomy_id: Option<i32>,
}

pub type KeywordConnection = Connection<Keyword>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub item_id: i32,
    pub publication_id: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// items 查詢回傳的多型項目；`__typename` 由 `ItemConverter` 補上
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum Item {
    Publication(Publication),
    StructureGroup(StructureGroup),
    Page(Page),
    Component(Component),
    Keyword(Keyword),
    Category(Category),
    #[serde(other)]
    Unknown,
}

pub type ItemConnection = Connection<Item>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPresentation {
    #[serde(default)]
    pub id: Option<String>,
    pub item_id: i32,
    pub publication_id: i32,
    #[serde(default)]
    pub item_type: Option<i32>,
    #[serde(default)]
    pub template_id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub component: Option<Component>,
    #[serde(default)]
    pub raw_content: Option<RawContent>,
}

pub type ComponentPresentationConnection = Connection<ComponentPresentation>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomySitemapItem {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub has_child_nodes: Option<bool>,
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<SitemapItem>>,
}

impl TaxonomySitemapItem {
    pub fn children(&self) -> &[SitemapItem] {
        self.items.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSitemapItem {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub publication_date: Option<String>,
}

/// 導覽樹節點；`__typename` 由 `TaxonomyItemConverter` 補上
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum SitemapItem {
    TaxonomySitemapItem(TaxonomySitemapItem),
    PageSitemapItem(PageSitemapItem),
}

impl SitemapItem {
    pub fn id(&self) -> &str {
        match self {
            SitemapItem::TaxonomySitemapItem(item) => &item.id,
            SitemapItem::PageSitemapItem(item) => &item.id,
        }
    }
}
