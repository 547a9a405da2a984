//! 每個內容操作對應一個具名模板與一組變數。
//!
//! 這裡只負責產生 `GraphQLRequest`，不做任何網路呼叫；
//! 執行與回應解析在 `PublicContentApi`。

use crate::core::converters::{ItemConverter, TaxonomyItemConverter};
use crate::core::query_builder::QueryBuilder;
use crate::core::templates::{EmbeddedTemplates, TemplateSource};
use crate::domain::cm_uri::CmUri;
use crate::domain::graphql::GraphQLRequest;
use crate::domain::model::{
    Ancestor, ContentIncludeMode, ContentNamespace, ContextData, EntityModelOptions,
    InputComponentPresentationFilter, InputItemFilter, InputPublicationFilter, InputSortParam,
    PageModelOptions, Pagination,
};
use crate::utils::error::Result;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct GraphQLRequests {
    templates: Arc<dyn TemplateSource>,
}

impl Default for GraphQLRequests {
    fn default() -> Self {
        Self::new(Arc::new(EmbeddedTemplates))
    }
}

#[allow(clippy::too_many_arguments)]
impl GraphQLRequests {
    pub fn new(templates: Arc<dyn TemplateSource>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &Arc<dyn TemplateSource> {
        &self.templates
    }

    /// 使用同一模板來源的空白 builder
    pub fn builder(&self) -> QueryBuilder {
        QueryBuilder::with_templates(self.templates.clone())
    }

    fn query(&self, name: &str) -> QueryBuilder {
        self.builder().with_query_resource(name, true)
    }

    pub fn page_by_id(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        page_id: i32,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("PageById")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_page_id(page_id)
            .with_custom_meta_filter(custom_meta_filter)
            .with_content_include_mode(include_mode)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn page_by_url(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        url: &str,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("PageByUrl")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_url(url)
            .with_custom_meta_filter(custom_meta_filter)
            .with_content_include_mode(include_mode)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn page_by_cm_uri(
        &self,
        cm_uri: &CmUri,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("PageByCmUri")
            .with_cm_uri(cm_uri)
            .with_custom_meta_filter(custom_meta_filter)
            .with_content_include_mode(include_mode)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn pages(
        &self,
        namespace: ContentNamespace,
        pagination: &Pagination,
        url: &str,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("Pages")
            .with_namespace(namespace)
            .with_pagination(pagination)
            .with_url(url)
            .with_custom_meta_filter(custom_meta_filter)
            .with_content_include_mode(include_mode)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn binary_component_by_id(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        binary_id: i32,
        custom_meta_filter: Option<&str>,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("BinaryComponentById")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_binary_id(binary_id)
            .with_custom_meta_filter(custom_meta_filter)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn binary_component_by_url(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        url: &str,
        custom_meta_filter: Option<&str>,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("BinaryComponentByUrl")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_url(url)
            .with_custom_meta_filter(custom_meta_filter)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn binary_component_by_cm_uri(
        &self,
        cm_uri: &CmUri,
        custom_meta_filter: Option<&str>,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("BinaryComponentByCmUri")
            .with_cm_uri(cm_uri)
            .with_custom_meta_filter(custom_meta_filter)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    /// `fragmentList` 依過濾的項目型別產生對應的 `...XFields`
    pub fn item_query(
        &self,
        filter: &InputItemFilter,
        sort: Option<&InputSortParam>,
        pagination: &Pagination,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        include_container_items: bool,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        let mut fragment_names: Vec<String> = Vec::new();
        for item_type in filter.item_types.iter().flatten() {
            let name = item_type.fragment_name();
            if !fragment_names.contains(&name) {
                fragment_names.push(name);
            }
        }
        let fragment_list: String = fragment_names
            .iter()
            .map(|name| format!("...{}\n", name))
            .collect();

        // 內容只出現在 container items 底下
        let include_mode = if include_container_items {
            include_mode
        } else {
            ContentIncludeMode::Exclude
        };

        self.query("ItemQuery")
            .replace_tag("fragmentList", fragment_list)
            .with_include_region("includeContainerItems", include_container_items)
            .with_input_item_filter(filter)
            .with_input_sort_param(sort)
            .with_pagination(pagination)
            .with_custom_meta_filter(custom_meta_filter)
            .with_content_include_mode(include_mode)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .with_converter(ItemConverter)
            .build()
    }

    pub fn publication(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        custom_meta_filter: Option<&str>,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("Publication")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_custom_meta_filter(custom_meta_filter)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn publications(
        &self,
        namespace: ContentNamespace,
        pagination: &Pagination,
        filter: Option<&InputPublicationFilter>,
        custom_meta_filter: Option<&str>,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("Publications")
            .with_namespace(namespace)
            .with_pagination(pagination)
            .with_input_publication_filter(filter)
            .with_custom_meta_filter(custom_meta_filter)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn resolve_page_link(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        page_id: i32,
        render_relative_link: bool,
    ) -> Result<GraphQLRequest> {
        self.query("ResolvePageLink")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_page_id(page_id)
            .with_render_relative_link(render_relative_link)
            .build()
    }

    pub fn resolve_component_link(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        component_id: i32,
        source_page_id: Option<i32>,
        exclude_component_template_id: Option<i32>,
        render_relative_link: bool,
    ) -> Result<GraphQLRequest> {
        self.query("ResolveComponentLink")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_variable("targetComponentId", component_id)
            .with_variable("sourcePageId", source_page_id)
            .with_variable("excludeComponentTemplateId", exclude_component_template_id)
            .with_render_relative_link(render_relative_link)
            .build()
    }

    pub fn resolve_binary_link(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        binary_id: i32,
        variant_id: Option<&str>,
        render_relative_link: bool,
    ) -> Result<GraphQLRequest> {
        self.query("ResolveBinaryLink")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_binary_id(binary_id)
            .with_variable("variantId", variant_id)
            .with_render_relative_link(render_relative_link)
            .build()
    }

    pub fn resolve_dynamic_component_link(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        page_id: i32,
        component_id: i32,
        template_id: i32,
        render_relative_link: bool,
    ) -> Result<GraphQLRequest> {
        self.query("ResolveDynamicComponentLink")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_variable("targetPageId", page_id)
            .with_variable("targetComponentId", component_id)
            .with_variable("targetTemplateId", template_id)
            .with_render_relative_link(render_relative_link)
            .build()
    }

    pub fn publication_mapping(&self, namespace: ContentNamespace, site_url: &str) -> Result<GraphQLRequest> {
        self.query("PublicationMapping")
            .with_namespace(namespace)
            .with_variable("siteUrl", site_url)
            .build()
    }

    /// 依請求 claims、呼叫端 context、全域 context 的順序附加 claims
    pub fn page_model_by_id(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        page_id: i32,
        options: &PageModelOptions,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("PageModelById")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_page_id(page_id)
            .with_content_include_mode(options.include_mode)
            .with_context_claims(options.claims())
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn page_model_by_url(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        url: &str,
        options: &PageModelOptions,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("PageModelByUrl")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_url(url)
            .with_content_include_mode(options.include_mode)
            .with_context_claims(options.claims())
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .with_operation_name("page")
            .build()
    }

    pub fn entity_model_by_id(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        entity_id: i32,
        template_id: i32,
        options: &EntityModelOptions,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("EntityModelById")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_variable("componentId", entity_id)
            .with_variable("templateId", template_id)
            .with_content_include_mode(options.include_mode)
            .with_context_claims(options.claims())
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn component_presentation(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        component_id: i32,
        template_id: i32,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("ComponentPresentation")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_variable("componentId", component_id)
            .with_variable("templateId", template_id)
            .with_custom_meta_filter(custom_meta_filter)
            .with_content_include_mode(include_mode)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn component_presentations(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        filter: &InputComponentPresentationFilter,
        sort: Option<&InputSortParam>,
        pagination: &Pagination,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("ComponentPresentations")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_input_component_presentation_filter(filter)
            .with_input_sort_param(sort)
            .with_pagination(pagination)
            .with_custom_meta_filter(custom_meta_filter)
            .with_content_include_mode(include_mode)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn keywords(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        pagination: &Pagination,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("Keywords")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_pagination(pagination)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn keyword(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        category_id: i32,
        keyword_id: i32,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("Keyword")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_variable("categoryId", category_id)
            .with_variable("keywordId", keyword_id)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn structure_groups(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        pagination: &Pagination,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("StructureGroups")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_pagination(pagination)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn structure_group(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        structure_group_id: i32,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("StructureGroup")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_variable("structureGroupId", structure_group_id)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .build()
    }

    pub fn sitemap(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        descendant_levels: u32,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        self.query("Sitemap")
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_descendant_levels(descendant_levels)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .with_converter(TaxonomyItemConverter)
            .build()
    }

    /// `descendant_levels` 為 0 時只取節點本身
    pub fn sitemap_subtree(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        taxonomy_node_id: Option<&str>,
        descendant_levels: u32,
        ancestor: Ancestor,
        context_data: Option<&ContextData>,
        global_context_data: Option<&ContextData>,
    ) -> Result<GraphQLRequest> {
        let template = if descendant_levels == 0 {
            "SitemapSubtreeNoRecurse"
        } else {
            "SitemapSubtree"
        };
        self.query(template)
            .with_namespace(namespace)
            .with_publication_id(publication_id)
            .with_variable("taxonomyNodeId", taxonomy_node_id)
            .with_variable("ancestor", ancestor)
            .with_descendant_levels(descendant_levels)
            .with_context_data(context_data)
            .with_context_data(global_context_data)
            .with_converter(TaxonomyItemConverter)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ClaimValue, DataModelType, FilterItemType};
    use serde_json::json;

    fn requests() -> GraphQLRequests {
        GraphQLRequests::default()
    }

    #[test]
    fn test_page_by_id_variables() {
        let context = ContextData::new().with_claim(ClaimValue::string("local", "1"));
        let global = ContextData::new().with_claim(ClaimValue::string("global", "2"));
        let request = requests()
            .page_by_id(
                ContentNamespace::Sites,
                5,
                640,
                None,
                ContentIncludeMode::IncludeAndRender,
                Some(&context),
                Some(&global),
            )
            .unwrap();

        assert_eq!(request.template.as_deref(), Some("PageById"));
        assert_eq!(request.variables["namespaceId"], json!(1));
        assert_eq!(request.variables["publicationId"], json!(5));
        assert_eq!(request.variables["pageId"], json!(640));
        assert_eq!(request.variables["renderContent"], json!(true));
        assert_eq!(request.variables["contextData"][0]["uri"], "local");
        assert_eq!(request.variables["contextData"][1]["uri"], "global");
        assert!(request.query.contains("rawContent(renderContent: $renderContent)"));
    }

    #[test]
    fn test_item_query_fragment_list() {
        let filter = InputItemFilter {
            item_types: Some(vec![
                FilterItemType::Page,
                FilterItemType::StructureGroup,
                FilterItemType::Page,
            ]),
            ..Default::default()
        };
        let request = requests()
            .item_query(
                &filter,
                None,
                &Pagination::first(20),
                Some("KEY:\"dc.title\""),
                ContentIncludeMode::Exclude,
                false,
                None,
                None,
            )
            .unwrap();

        assert_eq!(request.query.matches("...PageFields").count(), 1);
        assert!(request.query.contains("...StructureGroupFields"));
        assert!(request.query.contains("fragment PageFields on Page"));
        assert!(request.query.contains("fragment StructureGroupFields on StructureGroup"));
        assert!(!request.query.contains("containerItems"));
        assert!(request.query.contains(r#"customMetas(filter: "KEY:\"dc.title\"")"#));
        assert_eq!(request.variables["filter"]["itemTypes"], json!(["PAGE", "STRUCTURE_GROUP", "PAGE"]));
        assert_eq!(request.converters.len(), 1);
    }

    #[test]
    fn test_item_query_without_item_types() {
        let request = requests()
            .item_query(
                &InputItemFilter::default(),
                None,
                &Pagination::first(5),
                None,
                ContentIncludeMode::Include,
                true,
                None,
                None,
            )
            .unwrap();
        assert!(!request.query.contains("fragment "));
        assert!(request.query.contains("containerItems"));
        assert!(!request.query.contains("{{"));
    }

    #[test]
    fn test_page_model_claims_precede_caller_context() {
        let options = PageModelOptions {
            model_type: DataModelType::Dd4t,
            ..Default::default()
        };
        let context = ContextData::new().with_claim(ClaimValue::string("local", "1"));
        let request = requests()
            .page_model_by_url(ContentNamespace::Sites, 5, "/index.html", &options, Some(&context), None)
            .unwrap();

        let values: Vec<&str> = request.variables["contextData"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["value"].as_str().unwrap())
            .collect();
        assert_eq!(values, vec!["MODEL", "DD4T", "INCLUDE", "1"]);
        assert_eq!(request.operation_name.as_deref(), Some("page"));
        assert_eq!(request.variables["url"], json!("/index.html"));
    }

    #[test]
    fn test_sitemap_subtree_template_selection() {
        let request = requests()
            .sitemap_subtree(ContentNamespace::Sites, 5, Some("t1-k4"), 0, Ancestor::Include, None, None)
            .unwrap();
        assert_eq!(request.template.as_deref(), Some("SitemapSubtreeNoRecurse"));
        assert_eq!(request.variables["ancestor"], json!("INCLUDE"));
        assert_eq!(request.variables["taxonomyNodeId"], json!("t1-k4"));

        let request = requests()
            .sitemap_subtree(ContentNamespace::Sites, 5, None, 2, Ancestor::None, None, None)
            .unwrap();
        assert_eq!(request.template.as_deref(), Some("SitemapSubtree"));
        assert_eq!(request.variables["taxonomyNodeId"], serde_json::Value::Null);
        assert_eq!(request.query.matches("items {").count(), 2);
        assert!(request.query.contains("fragment PageItemFields on PageSitemapItem"));
    }

    #[test]
    fn test_link_requests() {
        let request = requests()
            .resolve_component_link(ContentNamespace::Docs, 7, 100, Some(64), None, true)
            .unwrap();
        assert_eq!(request.variables["namespaceId"], json!(2));
        assert_eq!(request.variables["targetComponentId"], json!(100));
        assert_eq!(request.variables["sourcePageId"], json!(64));
        assert_eq!(request.variables["excludeComponentTemplateId"], serde_json::Value::Null);
        assert_eq!(request.variables["renderRelativeLink"], json!(true));

        let request = requests()
            .resolve_dynamic_component_link(ContentNamespace::Sites, 7, 1, 2, 3, false)
            .unwrap();
        assert_eq!(request.variables["targetPageId"], json!(1));
        assert_eq!(request.variables["targetTemplateId"], json!(3));
    }

    #[test]
    fn test_cm_uri_requests() {
        let cm_uri = CmUri::parse("tcm:5-123-64").unwrap();
        let request = requests()
            .page_by_cm_uri(&cm_uri, None, ContentIncludeMode::Exclude, None, None)
            .unwrap();
        assert_eq!(request.variables["cmUri"], json!("tcm:5-123-64"));
        assert_eq!(request.variables["publicationId"], json!(5));
        assert!(!request.query.contains("rawContent"));
    }

    #[test]
    fn test_excluded_content_drops_render_content_declaration() {
        let request = requests()
            .page_by_id(ContentNamespace::Sites, 5, 640, None, ContentIncludeMode::Exclude, None, None)
            .unwrap();
        assert!(!request.query.contains("$renderContent"));
        assert!(request.variable("renderContent").is_none());

        let request = requests()
            .page_model_by_id(
                ContentNamespace::Sites,
                5,
                640,
                &PageModelOptions {
                    include_mode: ContentIncludeMode::Exclude,
                    ..Default::default()
                },
                None,
                None,
            )
            .unwrap();
        assert!(!request.query.contains("$renderContent"));
        assert!(request.query.contains("itemId"));
    }

    #[test]
    fn test_item_query_content_only_with_container_items() {
        let request = requests()
            .item_query(
                &InputItemFilter::default(),
                None,
                &Pagination::first(5),
                None,
                ContentIncludeMode::IncludeAndRender,
                false,
                None,
                None,
            )
            .unwrap();
        assert!(!request.query.contains("$renderContent"));
        assert!(request.variable("renderContent").is_none());
    }

    #[test]
    fn test_component_presentations_request() {
        let filter = InputComponentPresentationFilter {
            template: Some(crate::domain::model::InputTemplateCriteria { id: 400 }),
            ..Default::default()
        };
        let request = requests()
            .component_presentations(
                ContentNamespace::Sites,
                5,
                &filter,
                None,
                &Pagination::first(10),
                Some("KEY:\"dc.title\""),
                ContentIncludeMode::Include,
                None,
                None,
            )
            .unwrap();
        assert_eq!(request.variables["filter"], json!({"template": {"id": 400}}));
        assert_eq!(request.variables["renderContent"], json!(false));
        assert!(request.query.contains("fragment ComponentPresentationFields on ComponentPresentation"));
        assert!(request.query.contains("fragment ComponentFields on Component"));
        assert!(request.query.contains(r#"customMetas(filter: "KEY:\"dc.title\"")"#));
    }

    #[test]
    fn test_keyword_and_structure_group_requests() {
        let request = requests()
            .keyword(ContentNamespace::Sites, 5, 12, 34, None, None)
            .unwrap();
        assert_eq!(request.variables["categoryId"], json!(12));
        assert_eq!(request.variables["keywordId"], json!(34));
        assert!(request.query.contains("fragment KeywordFields on Keyword"));

        let request = requests()
            .structure_groups(ContentNamespace::Docs, 5, &Pagination::first(3), None, None)
            .unwrap();
        assert_eq!(request.variables["namespaceId"], json!(2));
        assert_eq!(request.variables["first"], json!(3));
        assert!(request.query.contains("fragment StructureGroupFields on StructureGroup"));
        assert!(!request.query.contains("{{"));
    }

    #[test]
    fn test_entity_model_request() {
        let request = requests()
            .entity_model_by_id(ContentNamespace::Sites, 5, 300, 400, &EntityModelOptions::default(), None, None)
            .unwrap();
        assert_eq!(request.variables["componentId"], json!(300));
        assert_eq!(request.variables["templateId"], json!(400));
        assert_eq!(
            request.variables["contextData"].as_array().unwrap().len(),
            3
        );
    }
}
