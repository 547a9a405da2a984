//! 請求端的內容模型：命名空間、內容模式、context claims 與查詢輸入型別。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content Manager 命名空間
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ContentNamespace {
    Sites,
    Docs,
}

impl ContentNamespace {
    /// 傳給 GraphQL 的 `namespaceId`
    pub fn id(self) -> i32 {
        match self {
            ContentNamespace::Sites => 1,
            ContentNamespace::Docs => 2,
        }
    }

    /// CM URI 前綴
    pub fn prefix(self) -> &'static str {
        match self {
            ContentNamespace::Sites => "tcm",
            ContentNamespace::Docs => "ish",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "tcm" => Some(ContentNamespace::Sites),
            "ish" => Some(ContentNamespace::Docs),
            _ => None,
        }
    }
}

/// 是否在回應中包含 raw content，以及是否由伺服器端渲染
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ContentIncludeMode {
    Exclude,
    #[default]
    Include,
    IncludeAndRender,
}

impl ContentIncludeMode {
    pub fn include_content(self) -> bool {
        !matches!(self, ContentIncludeMode::Exclude)
    }

    pub fn render_content(self) -> bool {
        matches!(self, ContentIncludeMode::IncludeAndRender)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ContentType {
    Raw,
    #[default]
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DataModelType {
    #[default]
    R2,
    Dd4t,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PageInclusion {
    #[default]
    Include,
    Exclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DcpType {
    #[default]
    Default,
    Highlight,
}

/// Model service plugin 使用的 claim URI
pub mod claim_uris {
    pub const CONTENT_TYPE: &str = "dxa:modelservice:content:type";
    pub const MODEL_TYPE: &str = "dxa:modelservice:model:type";
    pub const PAGE_INCLUDE_REGIONS: &str = "dxa:modelservice:model:page:includes";
    pub const ENTITY_DCP_TYPE: &str = "dxa:modelservice:model:entity:dcptype";
}

/// 可以轉成 model service claim 的列舉
pub trait ModelServiceClaim {
    fn claim_uri(&self) -> &'static str;
    fn claim_name(&self) -> &'static str;

    fn to_claim(&self) -> ClaimValue {
        ClaimValue::string(self.claim_uri(), self.claim_name())
    }
}

impl ModelServiceClaim for ContentType {
    fn claim_uri(&self) -> &'static str {
        claim_uris::CONTENT_TYPE
    }

    fn claim_name(&self) -> &'static str {
        match self {
            ContentType::Raw => "RAW",
            ContentType::Model => "MODEL",
        }
    }
}

impl ModelServiceClaim for DataModelType {
    fn claim_uri(&self) -> &'static str {
        claim_uris::MODEL_TYPE
    }

    fn claim_name(&self) -> &'static str {
        match self {
            DataModelType::R2 => "R2",
            DataModelType::Dd4t => "DD4T",
        }
    }
}

impl ModelServiceClaim for PageInclusion {
    fn claim_uri(&self) -> &'static str {
        claim_uris::PAGE_INCLUDE_REGIONS
    }

    fn claim_name(&self) -> &'static str {
        match self {
            PageInclusion::Include => "INCLUDE",
            PageInclusion::Exclude => "EXCLUDE",
        }
    }
}

impl ModelServiceClaim for DcpType {
    fn claim_uri(&self) -> &'static str {
        claim_uris::ENTITY_DCP_TYPE
    }

    fn claim_name(&self) -> &'static str {
        match self {
            DcpType::Default => "DEFAULT",
            DcpType::Highlight => "HIGHLIGHT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimValueType {
    #[default]
    String,
    Int,
    Float,
    Boolean,
    Date,
}

/// 附加在請求上的 context claim，影響伺服器端的內容解析
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimValue {
    pub uri: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub value_type: ClaimValueType,
}

impl ClaimValue {
    pub fn new(uri: impl Into<String>, value: impl Into<String>, value_type: ClaimValueType) -> Self {
        Self {
            uri: uri.into(),
            value: value.into(),
            value_type,
        }
    }

    pub fn string(uri: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(uri, value, ClaimValueType::String)
    }
}

/// 一組 context claims；序列化成 GraphQL 的 `[InputClaimValue]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextData {
    claim_values: Vec<ClaimValue>,
}

impl ContextData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_claim(mut self, claim: ClaimValue) -> Self {
        self.claim_values.push(claim);
        self
    }

    pub fn add_claim(&mut self, claim: ClaimValue) {
        self.claim_values.push(claim);
    }

    /// 依序附加另一組 claims
    pub fn merge(&mut self, other: &ContextData) {
        self.claim_values.extend(other.claim_values.iter().cloned());
    }

    pub fn claim_values(&self) -> &[ClaimValue] {
        &self.claim_values
    }

    pub fn is_empty(&self) -> bool {
        self.claim_values.is_empty()
    }
}

impl IntoIterator for ContextData {
    type Item = ClaimValue;
    type IntoIter = std::vec::IntoIter<ClaimValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.claim_values.into_iter()
    }
}

impl From<Vec<ClaimValue>> for ContextData {
    fn from(claim_values: Vec<ClaimValue>) -> Self {
        Self { claim_values }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub first: i32,
    pub after: Option<String>,
}

impl Pagination {
    pub fn first(first: i32) -> Self {
        Self { first, after: None }
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }
}

/// CM 項目型別 id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Publication = 1,
    Folder = 2,
    StructureGroup = 4,
    Schema = 8,
    Component = 16,
    ComponentTemplate = 32,
    Page = 64,
    PageTemplate = 128,
    TargetGroup = 256,
    Category = 512,
    Keyword = 1024,
    TemplateBuildingBlock = 2048,
    BusinessProcessType = 4096,
    VirtualFolder = 8192,
}

impl ItemType {
    pub fn from_id(id: i64) -> Option<Self> {
        let item_type = match id {
            1 => ItemType::Publication,
            2 => ItemType::Folder,
            4 => ItemType::StructureGroup,
            8 => ItemType::Schema,
            16 => ItemType::Component,
            32 => ItemType::ComponentTemplate,
            64 => ItemType::Page,
            128 => ItemType::PageTemplate,
            256 => ItemType::TargetGroup,
            512 => ItemType::Category,
            1024 => ItemType::Keyword,
            2048 => ItemType::TemplateBuildingBlock,
            4096 => ItemType::BusinessProcessType,
            8192 => ItemType::VirtualFolder,
            _ => return None,
        };
        Some(item_type)
    }

    pub fn id(self) -> i32 {
        self as i32
    }

    /// GraphQL schema 中對應的型別名稱
    pub fn name(self) -> &'static str {
        match self {
            ItemType::Publication => "Publication",
            ItemType::Folder => "Folder",
            ItemType::StructureGroup => "StructureGroup",
            ItemType::Schema => "Schema",
            ItemType::Component => "Component",
            ItemType::ComponentTemplate => "ComponentTemplate",
            ItemType::Page => "Page",
            ItemType::PageTemplate => "PageTemplate",
            ItemType::TargetGroup => "TargetGroup",
            ItemType::Category => "Category",
            ItemType::Keyword => "Keyword",
            ItemType::TemplateBuildingBlock => "TemplateBuildingBlock",
            ItemType::BusinessProcessType => "BusinessProcessType",
            ItemType::VirtualFolder => "VirtualFolder",
        }
    }
}

/// 頁面 model data 請求的 claim 選項
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageModelOptions {
    pub content_type: ContentType,
    pub model_type: DataModelType,
    pub page_inclusion: PageInclusion,
    pub include_mode: ContentIncludeMode,
}

impl PageModelOptions {
    pub fn claims(&self) -> ContextData {
        ContextData::new()
            .with_claim(self.content_type.to_claim())
            .with_claim(self.model_type.to_claim())
            .with_claim(self.page_inclusion.to_claim())
    }
}

/// Entity model data 請求的 claim 選項
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntityModelOptions {
    pub content_type: ContentType,
    pub model_type: DataModelType,
    pub dcp_type: DcpType,
    pub include_mode: ContentIncludeMode,
}

impl EntityModelOptions {
    pub fn claims(&self) -> ContextData {
        ContextData::new()
            .with_claim(self.content_type.to_claim())
            .with_claim(self.model_type.to_claim())
            .with_claim(self.dcp_type.to_claim())
    }
}

/// items 查詢可過濾的項目型別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterItemType {
    Publication,
    StructureGroup,
    Page,
    Component,
    Keyword,
    Category,
}

impl FilterItemType {
    pub fn schema_name(self) -> &'static str {
        match self {
            FilterItemType::Publication => "PUBLICATION",
            FilterItemType::StructureGroup => "STRUCTURE_GROUP",
            FilterItemType::Page => "PAGE",
            FilterItemType::Component => "COMPONENT",
            FilterItemType::Keyword => "KEYWORD",
            FilterItemType::Category => "CATEGORY",
        }
    }

    /// `STRUCTURE_GROUP` -> `StructureGroupFields`
    pub fn fragment_name(self) -> String {
        let mut name: String = self
            .schema_name()
            .split('_')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect();
        name.push_str("Fields");
        name
    }
}

impl fmt::Display for FilterItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputCustomMetaCriteria {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSchemaCriteria {
    pub id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTemplateCriteria {
    pub id: i32,
}

/// componentPresentations 查詢的過濾條件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputComponentPresentationFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<InputSchemaCriteria>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<InputTemplateCriteria>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_meta: Option<InputCustomMetaCriteria>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputItemFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_types: Option<Vec<FilterItemType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_ids: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_ids: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<InputSchemaCriteria>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_meta: Option<InputCustomMetaCriteria>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrderType {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortFieldType {
    CreationDate,
    UpdatedDate,
    LastPublishDate,
    InitialPublishDate,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSortParam {
    pub order: SortOrderType,
    pub sort_by: SortFieldType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPublicationFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_meta: Option<InputCustomMetaCriteria>,
}

/// 子樹查詢是否包含祖先節點
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ancestor {
    #[default]
    None,
    Include,
    Only,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_names_from_item_types() {
        assert_eq!(FilterItemType::Page.fragment_name(), "PageFields");
        assert_eq!(
            FilterItemType::StructureGroup.fragment_name(),
            "StructureGroupFields"
        );
        assert_eq!(FilterItemType::Category.fragment_name(), "CategoryFields");
    }

    #[test]
    fn test_context_data_serializes_as_claim_list() {
        let context = ContextData::new()
            .with_claim(ContentType::Raw.to_claim())
            .with_claim(ClaimValue::new("taf:claim:int", "3", ClaimValueType::Int));

        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"uri": "dxa:modelservice:content:type", "value": "RAW", "type": "STRING"},
                {"uri": "taf:claim:int", "value": "3", "type": "INT"}
            ])
        );
    }

    #[test]
    fn test_context_data_merge_keeps_order() {
        let mut local = ContextData::new().with_claim(ClaimValue::string("a", "1"));
        let global = ContextData::new().with_claim(ClaimValue::string("b", "2"));
        local.merge(&global);

        let uris: Vec<&str> = local.claim_values().iter().map(|c| c.uri.as_str()).collect();
        assert_eq!(uris, vec!["a", "b"]);
    }

    #[test]
    fn test_item_filter_skips_unset_fields() {
        let filter = InputItemFilter {
            item_types: Some(vec![FilterItemType::StructureGroup]),
            publication_ids: Some(vec![5]),
            ..Default::default()
        };
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"itemTypes": ["STRUCTURE_GROUP"], "publicationIds": [5]})
        );
    }

    #[test]
    fn test_item_type_ids() {
        assert_eq!(ItemType::from_id(64), Some(ItemType::Page));
        assert_eq!(ItemType::from_id(3), None);
        assert_eq!(ItemType::Keyword.id(), 1024);
        assert_eq!(ItemType::StructureGroup.name(), "StructureGroup");
    }

    #[test]
    fn test_model_option_claims() {
        let options = PageModelOptions {
            content_type: ContentType::Raw,
            page_inclusion: PageInclusion::Exclude,
            ..Default::default()
        };
        let claims = options.claims();
        let values: Vec<(&str, &str)> = claims
            .claim_values()
            .iter()
            .map(|c| (c.uri.as_str(), c.value.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![
                (claim_uris::CONTENT_TYPE, "RAW"),
                (claim_uris::MODEL_TYPE, "R2"),
                (claim_uris::PAGE_INCLUDE_REGIONS, "EXCLUDE"),
            ]
        );

        let entity = EntityModelOptions {
            dcp_type: DcpType::Highlight,
            ..Default::default()
        };
        assert_eq!(entity.claims().claim_values()[2].value, "HIGHLIGHT");
    }
}
