//! 內容查詢的主要入口。
//!
//! `PublicContentApi` 透過 `GraphQLRequests` 產生請求，交給 `GraphQLClient` 執行，
//! 再從回應中取出對應欄位並轉成型別化的內容模型。欄位為 null 時回傳 `None`
//! （分頁連線與清單則回傳空集合）。

use crate::core::requests::GraphQLRequests;
use crate::core::templates::TemplateSource;
use crate::domain::cm_uri::CmUri;
use crate::domain::content::{
    BinaryComponent, ComponentPresentation, ComponentPresentationConnection, ItemConnection,
    Keyword, KeywordConnection, Page, PageConnection, Publication, PublicationConnection,
    PublicationMapping, StructureGroup, StructureGroupConnection, TaxonomySitemapItem,
};
use crate::domain::graphql::{GraphQLRequest, GraphQLResponse, GraphQLSchema};
use crate::domain::model::{
    Ancestor, ContentIncludeMode, ContentNamespace, ContextData, EntityModelOptions,
    InputComponentPresentationFilter, InputItemFilter, InputPublicationFilter, InputSortParam,
    PageModelOptions, Pagination,
};
use crate::domain::ports::{GraphQLClient, GraphQLClientExt};
use crate::utils::error::{PcaError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct PublicContentApi {
    client: Arc<dyn GraphQLClient>,
    requests: GraphQLRequests,
    global_context_data: ContextData,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

#[allow(clippy::too_many_arguments)]
impl PublicContentApi {
    pub fn new(client: Arc<dyn GraphQLClient>) -> Self {
        Self::with_requests(client, GraphQLRequests::default())
    }

    pub fn with_templates(client: Arc<dyn GraphQLClient>, templates: Arc<dyn TemplateSource>) -> Self {
        Self::with_requests(client, GraphQLRequests::new(templates))
    }

    pub fn with_requests(client: Arc<dyn GraphQLClient>, requests: GraphQLRequests) -> Self {
        Self {
            client,
            requests,
            global_context_data: ContextData::new(),
            timeout: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn client(&self) -> &Arc<dyn GraphQLClient> {
        &self.client
    }

    pub fn requests(&self) -> &GraphQLRequests {
        &self.requests
    }

    /// 附加在每個內容請求上的 claims（排在呼叫端 context 之後）
    pub fn global_context_data(&self) -> &ContextData {
        &self.global_context_data
    }

    pub fn set_global_context_data(&mut self, context_data: ContextData) {
        self.global_context_data = context_data;
    }

    /// 內容請求沒有自行指定逾時時使用的值；未設定時沿用 client 的預設
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or_else(|| self.client.timeout())
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// 取消所有進行中的內容請求；之後的內容請求也會立即失敗
    pub fn cancel(&self) {
        tracing::info!("🛑 Cancelling outstanding content requests");
        self.cancel.cancel();
    }

    pub async fn execute(&self, request: &GraphQLRequest, cancel: &CancellationToken) -> Result<GraphQLResponse> {
        self.client.execute(request, cancel).await
    }

    pub async fn execute_typed<T>(&self, request: &GraphQLRequest, cancel: &CancellationToken) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        self.client.execute_typed(request, cancel).await
    }

    pub async fn schema(&self, cancel: &CancellationToken) -> Result<GraphQLSchema> {
        self.client.schema(cancel).await
    }

    fn global(&self) -> Option<&ContextData> {
        if self.global_context_data.is_empty() {
            None
        } else {
            Some(&self.global_context_data)
        }
    }

    /// 執行請求並取出 `pointer` 指向的欄位（已套用 converters）
    async fn fetch_value(&self, mut request: GraphQLRequest, pointer: &str) -> Result<Option<Value>> {
        if request.timeout.is_none() {
            request.timeout = self.timeout;
        }
        let cancel = self.cancel.child_token();
        tracing::debug!(
            "Executing {} -> {}",
            request.template.as_deref().unwrap_or("inline query"),
            pointer
        );

        let mut data = self.client.execute(&request, &cancel).await?.into_data()?;
        let mut node = match data.pointer_mut(pointer) {
            Some(value) if !value.is_null() => value.take(),
            _ => {
                tracing::debug!("No content at {}", pointer);
                return Ok(None);
            }
        };
        request.convert(&mut node);
        Ok(Some(node))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: GraphQLRequest, pointer: &str) -> Result<Option<T>> {
        match self.fetch_value(request, pointer).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| PcaError::MappingError {
                    target: std::any::type_name::<T>().to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    async fn fetch_or_default<T: DeserializeOwned + Default>(
        &self,
        request: GraphQLRequest,
        pointer: &str,
    ) -> Result<T> {
        Ok(self.fetch(request, pointer).await?.unwrap_or_default())
    }

    pub async fn get_page(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        page_id: i32,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        context_data: Option<&ContextData>,
    ) -> Result<Option<Page>> {
        let request = self.requests.page_by_id(
            namespace,
            publication_id,
            page_id,
            custom_meta_filter,
            include_mode,
            context_data,
            self.global(),
        )?;
        self.fetch(request, "/page").await
    }

    pub async fn get_page_by_url(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        url: &str,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        context_data: Option<&ContextData>,
    ) -> Result<Option<Page>> {
        let request = self.requests.page_by_url(
            namespace,
            publication_id,
            url,
            custom_meta_filter,
            include_mode,
            context_data,
            self.global(),
        )?;
        self.fetch(request, "/page").await
    }

    pub async fn get_page_by_cm_uri(
        &self,
        cm_uri: &CmUri,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        context_data: Option<&ContextData>,
    ) -> Result<Option<Page>> {
        let request = self.requests.page_by_cm_uri(
            cm_uri,
            custom_meta_filter,
            include_mode,
            context_data,
            self.global(),
        )?;
        self.fetch(request, "/page").await
    }

    pub async fn get_pages(
        &self,
        namespace: ContentNamespace,
        pagination: &Pagination,
        url: &str,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        context_data: Option<&ContextData>,
    ) -> Result<PageConnection> {
        let request = self.requests.pages(
            namespace,
            pagination,
            url,
            custom_meta_filter,
            include_mode,
            context_data,
            self.global(),
        )?;
        self.fetch_or_default(request, "/pages").await
    }

    pub async fn get_binary_component(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        binary_id: i32,
        custom_meta_filter: Option<&str>,
        context_data: Option<&ContextData>,
    ) -> Result<Option<BinaryComponent>> {
        let request = self.requests.binary_component_by_id(
            namespace,
            publication_id,
            binary_id,
            custom_meta_filter,
            context_data,
            self.global(),
        )?;
        self.fetch(request, "/binaryComponent").await
    }

    pub async fn get_binary_component_by_url(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        url: &str,
        custom_meta_filter: Option<&str>,
        context_data: Option<&ContextData>,
    ) -> Result<Option<BinaryComponent>> {
        let request = self.requests.binary_component_by_url(
            namespace,
            publication_id,
            url,
            custom_meta_filter,
            context_data,
            self.global(),
        )?;
        self.fetch(request, "/binaryComponent").await
    }

    pub async fn get_binary_component_by_cm_uri(
        &self,
        cm_uri: &CmUri,
        custom_meta_filter: Option<&str>,
        context_data: Option<&ContextData>,
    ) -> Result<Option<BinaryComponent>> {
        let request = self.requests.binary_component_by_cm_uri(
            cm_uri,
            custom_meta_filter,
            context_data,
            self.global(),
        )?;
        self.fetch(request, "/binaryComponent").await
    }

    pub async fn execute_item_query(
        &self,
        filter: &InputItemFilter,
        sort: Option<&InputSortParam>,
        pagination: &Pagination,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        include_container_items: bool,
        context_data: Option<&ContextData>,
    ) -> Result<ItemConnection> {
        let request = self.requests.item_query(
            filter,
            sort,
            pagination,
            custom_meta_filter,
            include_mode,
            include_container_items,
            context_data,
            self.global(),
        )?;
        self.fetch_or_default(request, "/items").await
    }

    pub async fn get_publication(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        custom_meta_filter: Option<&str>,
        context_data: Option<&ContextData>,
    ) -> Result<Option<Publication>> {
        let request = self.requests.publication(
            namespace,
            publication_id,
            custom_meta_filter,
            context_data,
            self.global(),
        )?;
        self.fetch(request, "/publication").await
    }

    pub async fn get_publications(
        &self,
        namespace: ContentNamespace,
        pagination: &Pagination,
        filter: Option<&InputPublicationFilter>,
        custom_meta_filter: Option<&str>,
        context_data: Option<&ContextData>,
    ) -> Result<PublicationConnection> {
        let request = self.requests.publications(
            namespace,
            pagination,
            filter,
            custom_meta_filter,
            context_data,
            self.global(),
        )?;
        self.fetch_or_default(request, "/publications").await
    }

    pub async fn resolve_page_link(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        page_id: i32,
        render_relative_link: bool,
    ) -> Result<Option<String>> {
        let request =
            self.requests
                .resolve_page_link(namespace, publication_id, page_id, render_relative_link)?;
        self.fetch(request, "/pageLink/url").await
    }

    pub async fn resolve_component_link(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        component_id: i32,
        source_page_id: Option<i32>,
        exclude_component_template_id: Option<i32>,
        render_relative_link: bool,
    ) -> Result<Option<String>> {
        let request = self.requests.resolve_component_link(
            namespace,
            publication_id,
            component_id,
            source_page_id,
            exclude_component_template_id,
            render_relative_link,
        )?;
        self.fetch(request, "/componentLink/url").await
    }

    pub async fn resolve_binary_link(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        binary_id: i32,
        variant_id: Option<&str>,
        render_relative_link: bool,
    ) -> Result<Option<String>> {
        let request = self.requests.resolve_binary_link(
            namespace,
            publication_id,
            binary_id,
            variant_id,
            render_relative_link,
        )?;
        self.fetch(request, "/binaryLink/url").await
    }

    pub async fn resolve_dynamic_component_link(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        page_id: i32,
        component_id: i32,
        template_id: i32,
        render_relative_link: bool,
    ) -> Result<Option<String>> {
        let request = self.requests.resolve_dynamic_component_link(
            namespace,
            publication_id,
            page_id,
            component_id,
            template_id,
            render_relative_link,
        )?;
        self.fetch(request, "/dynamicComponentLink/url").await
    }

    pub async fn get_publication_mapping(
        &self,
        namespace: ContentNamespace,
        site_url: &str,
    ) -> Result<Option<PublicationMapping>> {
        let request = self.requests.publication_mapping(namespace, site_url)?;
        self.fetch(request, "/publicationMapping").await
    }

    /// 回傳 model service 產生的 JSON（`rawContent.data`）
    pub async fn get_page_model_data(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        page_id: i32,
        options: &PageModelOptions,
        context_data: Option<&ContextData>,
    ) -> Result<Option<Value>> {
        let request = self.requests.page_model_by_id(
            namespace,
            publication_id,
            page_id,
            options,
            context_data,
            self.global(),
        )?;
        self.fetch_value(request, "/page/rawContent/data").await
    }

    pub async fn get_page_model_data_by_url(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        url: &str,
        options: &PageModelOptions,
        context_data: Option<&ContextData>,
    ) -> Result<Option<Value>> {
        let request = self.requests.page_model_by_url(
            namespace,
            publication_id,
            url,
            options,
            context_data,
            self.global(),
        )?;
        self.fetch_value(request, "/page/rawContent/data").await
    }

    pub async fn get_entity_model_data(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        entity_id: i32,
        template_id: i32,
        options: &EntityModelOptions,
        context_data: Option<&ContextData>,
    ) -> Result<Option<Value>> {
        let request = self.requests.entity_model_by_id(
            namespace,
            publication_id,
            entity_id,
            template_id,
            options,
            context_data,
            self.global(),
        )?;
        self.fetch_value(request, "/componentPresentation/rawContent/data").await
    }

    pub async fn get_component_presentation(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        component_id: i32,
        template_id: i32,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        context_data: Option<&ContextData>,
    ) -> Result<Option<ComponentPresentation>> {
        let request = self.requests.component_presentation(
            namespace,
            publication_id,
            component_id,
            template_id,
            custom_meta_filter,
            include_mode,
            context_data,
            self.global(),
        )?;
        self.fetch(request, "/componentPresentation").await
    }

    pub async fn get_component_presentations(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        filter: &InputComponentPresentationFilter,
        sort: Option<&InputSortParam>,
        pagination: &Pagination,
        custom_meta_filter: Option<&str>,
        include_mode: ContentIncludeMode,
        context_data: Option<&ContextData>,
    ) -> Result<ComponentPresentationConnection> {
        let request = self.requests.component_presentations(
            namespace,
            publication_id,
            filter,
            sort,
            pagination,
            custom_meta_filter,
            include_mode,
            context_data,
            self.global(),
        )?;
        self.fetch_or_default(request, "/componentPresentations").await
    }

    pub async fn get_keywords(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        pagination: &Pagination,
        context_data: Option<&ContextData>,
    ) -> Result<KeywordConnection> {
        let request = self
            .requests
            .keywords(namespace, publication_id, pagination, context_data, self.global())?;
        self.fetch_or_default(request, "/keywords").await
    }

    pub async fn get_keyword(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        category_id: i32,
        keyword_id: i32,
        context_data: Option<&ContextData>,
    ) -> Result<Option<Keyword>> {
        let request = self.requests.keyword(
            namespace,
            publication_id,
            category_id,
            keyword_id,
            context_data,
            self.global(),
        )?;
        self.fetch(request, "/keyword").await
    }

    pub async fn get_structure_groups(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        pagination: &Pagination,
        context_data: Option<&ContextData>,
    ) -> Result<StructureGroupConnection> {
        let request = self
            .requests
            .structure_groups(namespace, publication_id, pagination, context_data, self.global())?;
        self.fetch_or_default(request, "/structureGroups").await
    }

    pub async fn get_structure_group(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        structure_group_id: i32,
        context_data: Option<&ContextData>,
    ) -> Result<Option<StructureGroup>> {
        let request = self.requests.structure_group(
            namespace,
            publication_id,
            structure_group_id,
            context_data,
            self.global(),
        )?;
        self.fetch(request, "/structureGroup").await
    }

    pub async fn get_sitemap(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        descendant_levels: u32,
        context_data: Option<&ContextData>,
    ) -> Result<Option<TaxonomySitemapItem>> {
        let request = self.requests.sitemap(
            namespace,
            publication_id,
            descendant_levels,
            context_data,
            self.global(),
        )?;
        self.fetch(request, "/sitemap").await
    }

    pub async fn get_sitemap_subtree(
        &self,
        namespace: ContentNamespace,
        publication_id: i32,
        taxonomy_node_id: Option<&str>,
        descendant_levels: u32,
        ancestor: Ancestor,
        context_data: Option<&ContextData>,
    ) -> Result<Vec<TaxonomySitemapItem>> {
        let request = self.requests.sitemap_subtree(
            namespace,
            publication_id,
            taxonomy_node_id,
            descendant_levels,
            ancestor,
            context_data,
            self.global(),
        )?;
        self.fetch_or_default(request, "/sitemapSubtree").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// 回傳固定回應並記錄收到的請求
    struct StubClient {
        response: GraphQLResponse,
        seen: Mutex<Vec<GraphQLRequest>>,
    }

    impl StubClient {
        fn new(data: Value) -> Arc<Self> {
            Arc::new(Self {
                response: GraphQLResponse {
                    data: Some(data),
                    ..Default::default()
                },
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl GraphQLClient for StubClient {
        async fn execute(&self, request: &GraphQLRequest, cancel: &CancellationToken) -> Result<GraphQLResponse> {
            if cancel.is_cancelled() {
                return Err(PcaError::Cancelled);
            }
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(30)
        }
    }

    #[tokio::test]
    async fn test_get_page_maps_response() {
        let client = StubClient::new(json!({
            "page": {"id": "5-640-64", "itemId": 640, "publicationId": 5, "url": "/index.html",
                     "rawContent": {"data": {"regions": []}}}
        }));
        let api = PublicContentApi::new(client.clone());

        let page = api
            .get_page(ContentNamespace::Sites, 5, 640, None, ContentIncludeMode::Include, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.item_id, 640);
        assert_eq!(page.url.as_deref(), Some("/index.html"));
        assert_eq!(client.seen.lock().unwrap()[0].template.as_deref(), Some("PageById"));
    }

    #[tokio::test]
    async fn test_null_field_is_none() {
        let api = PublicContentApi::new(StubClient::new(json!({"page": null})));
        let page = api
            .get_page_by_url(ContentNamespace::Sites, 5, "/missing", None, ContentIncludeMode::Exclude, None)
            .await
            .unwrap();
        assert!(page.is_none());

        let api = PublicContentApi::new(StubClient::new(json!({"items": null})));
        let items = api
            .execute_item_query(
                &InputItemFilter::default(),
                None,
                &Pagination::first(10),
                None,
                ContentIncludeMode::Exclude,
                false,
                None,
            )
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_global_context_and_timeout_are_applied() {
        let client = StubClient::new(json!({"pageLink": {"url": "/a.html"}}));
        let mut api = PublicContentApi::new(client.clone());
        api.set_global_context_data(ContextData::new().with_claim(crate::domain::model::ClaimValue::string("g", "1")));
        api.set_timeout(Duration::from_secs(3));
        assert_eq!(api.timeout(), Duration::from_secs(3));

        let publication = api
            .get_publication(ContentNamespace::Sites, 5, None, None)
            .await
            .unwrap();
        assert!(publication.is_none());

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].variables["contextData"][0]["uri"], "g");
        assert_eq!(seen[0].timeout, Some(Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn test_mapping_error_names_target() {
        let api = PublicContentApi::new(StubClient::new(json!({"page": {"id": 1}})));
        let err = api
            .get_page(ContentNamespace::Sites, 5, 1, None, ContentIncludeMode::Exclude, None)
            .await
            .unwrap_err();
        match err {
            PcaError::MappingError { target, .. } => assert!(target.ends_with("Page")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancel_stops_content_requests() {
        let api = PublicContentApi::new(StubClient::new(json!({})));
        api.cancel();
        let err = api
            .resolve_page_link(ContentNamespace::Sites, 5, 64, false)
            .await
            .unwrap_err();
        assert!(matches!(err, PcaError::Cancelled));
    }

    #[tokio::test]
    async fn test_model_data_returns_raw_json() {
        let api = PublicContentApi::new(StubClient::new(json!({
            "page": {"rawContent": {"data": {"Id": "640", "Regions": []}}}
        })));
        let data = api
            .get_page_model_data(ContentNamespace::Sites, 5, 640, &PageModelOptions::default(), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(data["Id"], "640");
    }
}
