//! 以模板組出 `GraphQLRequest` 的 fluent builder。
//!
//! 設定過程中的錯誤（找不到模板、變數序列化失敗）會被保留，統一在 `build()` 回報。

use crate::core::templates::{EmbeddedTemplates, TemplateKind, TemplateSource};
use crate::domain::cm_uri::CmUri;
use crate::domain::graphql::GraphQLRequest;
use crate::domain::model::{
    ClaimValue, ContentIncludeMode, ContentNamespace, ContextData,
    InputComponentPresentationFilter, InputItemFilter, InputPublicationFilter, InputSortParam,
    Pagination,
};
use crate::domain::ports::ResponseConverter;
use crate::utils::error::{PcaError, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

const RECURSE_TAG: &str = "{{recurse}}";
const RECURSE_SNIPPET: &str = "RecurseItems";

#[derive(Debug)]
pub struct QueryBuilder {
    templates: Arc<dyn TemplateSource>,
    query: Option<String>,
    template: Option<String>,
    load_fragments: bool,
    tags: BTreeMap<String, String>,
    regions: BTreeMap<String, bool>,
    variables: Map<String, Value>,
    context_data: Option<ContextData>,
    operation_name: Option<String>,
    timeout: Option<Duration>,
    converters: Vec<Arc<dyn ResponseConverter>>,
    error: Option<PcaError>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::with_templates(Arc::new(EmbeddedTemplates))
    }

    pub fn with_templates(templates: Arc<dyn TemplateSource>) -> Self {
        Self {
            templates,
            query: None,
            template: None,
            load_fragments: false,
            tags: BTreeMap::new(),
            regions: BTreeMap::new(),
            variables: Map::new(),
            context_data: None,
            operation_name: None,
            timeout: None,
            converters: Vec::new(),
            error: None,
        }
    }

    fn fail(&mut self, error: PcaError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// 直接指定查詢文字
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// 從模板來源載入具名查詢
    pub fn with_query_resource(mut self, name: &str, load_fragments: bool) -> Self {
        match self.templates.load(TemplateKind::Query, name) {
            Ok(query) => self.query = Some(query),
            Err(e) => self.fail(e),
        }
        self.template = Some(name.to_string());
        self.load_fragments |= load_fragments;
        self
    }

    /// 建置時補上查詢中引用但未定義的 fragments
    pub fn load_fragments(mut self) -> Self {
        self.load_fragments = true;
        self
    }

    /// `{{name}}` 替換成 `value`
    pub fn replace_tag(mut self, name: &str, value: impl Into<String>) -> Self {
        self.tags.insert(name.to_string(), value.into());
        self
    }

    /// 保留或移除 `{{#name}} ... {{/name}}` 區塊
    pub fn with_include_region(mut self, name: &str, include: bool) -> Self {
        self.regions.insert(name.to_string(), include);
        self
    }

    /// 把 snippet 自我嵌套 `levels` 層後填入 `{{name}}`；0 層等於移除
    pub fn with_recurse_fragment(mut self, name: &str, levels: u32) -> Self {
        if levels == 0 {
            return self.replace_tag(name, "");
        }
        let snippet = match self.templates.load(TemplateKind::Snippet, name) {
            Ok(snippet) => snippet,
            Err(e) => {
                self.fail(e);
                return self;
            }
        };

        let mut expanded = String::new();
        for _ in 0..levels {
            expanded = snippet.replace(RECURSE_TAG, expanded.trim_end());
        }
        self.replace_tag(name, expanded)
    }

    pub fn with_descendant_levels(self, levels: u32) -> Self {
        self.with_recurse_fragment(RECURSE_SNIPPET, levels)
    }

    pub fn with_variable<T: Serialize>(mut self, name: &str, value: T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.variables.insert(name.to_string(), value);
            }
            Err(e) => self.fail(PcaError::QueryBuildError {
                message: format!("variable '{}' could not be serialized: {}", name, e),
            }),
        }
        self
    }

    pub fn with_namespace(self, namespace: ContentNamespace) -> Self {
        self.with_variable("namespaceId", namespace.id())
    }

    pub fn with_publication_id(self, publication_id: i32) -> Self {
        self.with_variable("publicationId", publication_id)
    }

    pub fn with_page_id(self, page_id: i32) -> Self {
        self.with_variable("pageId", page_id)
    }

    pub fn with_binary_id(self, binary_id: i32) -> Self {
        self.with_variable("binaryId", binary_id)
    }

    pub fn with_url(self, url: &str) -> Self {
        self.with_variable("url", url)
    }

    pub fn with_cm_uri(self, cm_uri: &CmUri) -> Self {
        self.with_variable("namespaceId", cm_uri.namespace_id())
            .with_variable("publicationId", cm_uri.publication_id())
            .with_variable("cmUri", cm_uri.to_string())
    }

    pub fn with_render_content(self, render: bool) -> Self {
        self.with_variable("renderContent", render)
    }

    /// 排除內容時連同 `$renderContent` 的宣告與變數一起拿掉
    pub fn with_content_include_mode(self, mode: ContentIncludeMode) -> Self {
        let builder = self.with_include_region("includeContent", mode.include_content());
        if mode.include_content() {
            builder.with_render_content(mode.render_content())
        } else {
            builder
        }
    }

    pub fn with_render_relative_link(self, relative: bool) -> Self {
        self.with_variable("renderRelativeLink", relative)
    }

    pub fn with_pagination(self, pagination: &Pagination) -> Self {
        self.with_variable("first", pagination.first)
            .with_variable("after", pagination.after.as_deref())
    }

    pub fn with_input_item_filter(self, filter: &InputItemFilter) -> Self {
        self.with_variable("filter", filter)
    }

    pub fn with_input_component_presentation_filter(self, filter: &InputComponentPresentationFilter) -> Self {
        self.with_variable("filter", filter)
    }

    pub fn with_input_publication_filter(self, filter: Option<&InputPublicationFilter>) -> Self {
        self.with_variable("filter", filter)
    }

    pub fn with_input_sort_param(self, sort: Option<&InputSortParam>) -> Self {
        self.with_variable("sort", sort)
    }

    /// 依呼叫順序累積到 `contextData` 變數
    pub fn with_context_data(mut self, context_data: Option<&ContextData>) -> Self {
        if let Some(context_data) = context_data {
            self.context_data
                .get_or_insert_with(ContextData::new)
                .merge(context_data);
        }
        self
    }

    pub fn with_context_claim(mut self, claim: ClaimValue) -> Self {
        self.context_data
            .get_or_insert_with(ContextData::new)
            .add_claim(claim);
        self
    }

    pub fn with_context_claims(self, claims: impl IntoIterator<Item = ClaimValue>) -> Self {
        claims.into_iter().fold(self, Self::with_context_claim)
    }

    /// 在 `{{customMetaArgs}}` 放入 `(filter: "...")`；沒有過濾條件時清空
    pub fn with_custom_meta_filter(mut self, filter: Option<&str>) -> Self {
        let args = match filter.filter(|f| !f.trim().is_empty()) {
            Some(filter) => match serde_json::to_string(filter) {
                Ok(quoted) => format!("(filter: {})", quoted),
                Err(e) => {
                    self.fail(e.into());
                    return self;
                }
            },
            None => String::new(),
        };
        self.replace_tag("customMetaArgs", args)
    }

    pub fn with_operation_name(mut self, name: &str) -> Self {
        self.operation_name = Some(name.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_converter(self, converter: impl ResponseConverter + 'static) -> Self {
        self.with_converter_arc(Arc::new(converter))
    }

    pub fn with_converter_arc(mut self, converter: Arc<dyn ResponseConverter>) -> Self {
        self.converters.push(converter);
        self
    }

    pub fn build(mut self) -> Result<GraphQLRequest> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        let query = self.query.take().ok_or_else(|| PcaError::QueryBuildError {
            message: "no query set; call with_query or with_query_resource first".to_string(),
        })?;

        let mut document = self.render(&query)?;
        if self.load_fragments {
            document = self.append_fragments(document)?;
        }
        let document = strip_unresolved(&document)?;

        let mut variables = self.variables;
        if let Some(context_data) = self.context_data {
            variables.insert("contextData".to_string(), serde_json::to_value(context_data)?);
        }

        tracing::debug!(
            "Built GraphQL request from {} ({} variables)",
            self.template.as_deref().unwrap_or("inline query"),
            variables.len()
        );

        Ok(GraphQLRequest {
            query: document,
            variables,
            operation_name: self.operation_name,
            timeout: self.timeout,
            template: self.template,
            converters: self.converters,
        })
    }

    /// 套用已設定的區塊與標籤
    fn render(&self, text: &str) -> Result<String> {
        let mut output = text.to_string();
        for (name, include) in &self.regions {
            let re = region_regex(name)?;
            let replacement = if *include { "${body}" } else { "" };
            output = re.replace_all(&output, replacement).into_owned();
        }
        for (name, value) in &self.tags {
            output = output.replace(&format!("{{{{{}}}}}", name), value);
        }
        Ok(output)
    }

    /// 反覆補上被引用但尚未定義的 fragment，直到沒有缺漏
    fn append_fragments(&self, mut document: String) -> Result<String> {
        let definition_re = Regex::new(r"fragment\s+([_A-Za-z][_0-9A-Za-z]*)\s+on\b")?;
        let spread_re = Regex::new(r"\.\.\.\s*([_A-Za-z][_0-9A-Za-z]*)")?;

        let string_re = Regex::new(r#""(?:[^"\\]|\\.)*""#)?;

        let mut defined: HashSet<String> = definition_re
            .captures_iter(&string_re.replace_all(&document, "\"\""))
            .map(|caps| caps[1].to_string())
            .collect();

        loop {
            // 字串常值（例如 custom meta filter）裡的 `...` 不是 spread
            let scanned = string_re.replace_all(&document, "\"\"").into_owned();
            let mut missing: Vec<String> = Vec::new();
            for caps in spread_re.captures_iter(&scanned) {
                let name = &caps[1];
                // `... on Type` 是 inline fragment
                if name == "on" || defined.contains(name) || missing.iter().any(|m| m == name) {
                    continue;
                }
                missing.push(name.to_string());
            }
            if missing.is_empty() {
                break;
            }

            for name in missing {
                let fragment = self.templates.load(TemplateKind::Fragment, &name)?;
                let fragment = self.render(&fragment)?;
                document.push_str("\n\n");
                document.push_str(fragment.trim());
                tracing::trace!("Appended fragment {}", name);
                defined.insert(name);
            }
        }

        Ok(document)
    }
}

fn region_regex(name: &str) -> Result<Regex> {
    let name = regex::escape(name);
    Ok(Regex::new(&format!(
        r"(?s)\{{\{{#{name}\}}\}}(?P<body>.*?)\{{\{{/{name}\}}\}}"
    ))?)
}

/// 移除沒有被設定的區塊（連同內容）與標籤
fn strip_unresolved(text: &str) -> Result<String> {
    let opening_re = Regex::new(r"\{\{#([_0-9A-Za-z]+)\}\}")?;
    let names: Vec<String> = opening_re
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect();

    let mut output = text.to_string();
    for name in names {
        output = region_regex(&name)?.replace_all(&output, "").into_owned();
    }

    let leftover_re = Regex::new(r"\{\{[#/]?[_0-9A-Za-z]+\}\}")?;
    Ok(leftover_re.replace_all(&output, "").into_owned())
}
