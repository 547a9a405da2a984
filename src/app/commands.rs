//! 命令列子命令與 `PublicContentApi` 操作之間的對應。

use crate::config::cli::{Command, ContentArgs};
use crate::core::api::PublicContentApi;
use crate::domain::graphql::GraphQLRequest;
use crate::domain::model::{
    ContentNamespace, EntityModelOptions, InputComponentPresentationFilter, InputItemFilter,
    InputSchemaCriteria, InputTemplateCriteria, PageModelOptions, Pagination,
};
use crate::utils::error::{PcaError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

fn pagination(first: i32, after: &Option<String>) -> Pagination {
    let pagination = Pagination::first(first);
    match after {
        Some(cursor) => pagination.after(cursor.clone()),
        None => pagination,
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn missing_target(command: &str) -> PcaError {
    PcaError::QueryBuildError {
        message: format!("{} needs an id, a URL or a CM URI", command),
    }
}

/// 執行子命令並以 JSON 回傳結果；查無內容時為 `null`
pub async fn run(api: &PublicContentApi, namespace: ContentNamespace, command: &Command) -> Result<Value> {
    match command {
        Command::Page {
            publication_id,
            page_id,
            url,
            cm_uri,
            content: ContentArgs { custom_meta_filter, content },
        } => {
            let filter = custom_meta_filter.as_deref();
            let page = match (cm_uri, publication_id, page_id, url) {
                (Some(cm_uri), _, _, _) => api.get_page_by_cm_uri(cm_uri, filter, *content, None).await?,
                (None, Some(publication_id), Some(page_id), _) => {
                    api.get_page(namespace, *publication_id, *page_id, filter, *content, None)
                        .await?
                }
                (None, Some(publication_id), None, Some(url)) => {
                    api.get_page_by_url(namespace, *publication_id, url, filter, *content, None)
                        .await?
                }
                _ => return Err(missing_target("page")),
            };
            to_json(page)
        }
        Command::Pages {
            url,
            first,
            after,
            content: ContentArgs { custom_meta_filter, content },
        } => {
            let pages = api
                .get_pages(
                    namespace,
                    &pagination(*first, after),
                    url,
                    custom_meta_filter.as_deref(),
                    *content,
                    None,
                )
                .await?;
            to_json(pages)
        }
        Command::Binary {
            publication_id,
            binary_id,
            url,
            cm_uri,
            custom_meta_filter,
        } => {
            let filter = custom_meta_filter.as_deref();
            let binary = match (cm_uri, publication_id, binary_id, url) {
                (Some(cm_uri), _, _, _) => api.get_binary_component_by_cm_uri(cm_uri, filter, None).await?,
                (None, Some(publication_id), Some(binary_id), _) => {
                    api.get_binary_component(namespace, *publication_id, *binary_id, filter, None)
                        .await?
                }
                (None, Some(publication_id), None, Some(url)) => {
                    api.get_binary_component_by_url(namespace, *publication_id, url, filter, None)
                        .await?
                }
                _ => return Err(missing_target("binary")),
            };
            to_json(binary)
        }
        Command::Items {
            item_types,
            publication_ids,
            first,
            after,
            container_items,
            content: ContentArgs { custom_meta_filter, content },
        } => {
            let filter = InputItemFilter {
                item_types: (!item_types.is_empty()).then(|| item_types.clone()),
                namespace_ids: Some(vec![namespace.id()]),
                publication_ids: (!publication_ids.is_empty()).then(|| publication_ids.clone()),
                ..Default::default()
            };
            let items = api
                .execute_item_query(
                    &filter,
                    None,
                    &pagination(*first, after),
                    custom_meta_filter.as_deref(),
                    *content,
                    *container_items,
                    None,
                )
                .await?;
            to_json(items)
        }
        Command::Publication {
            publication_id,
            custom_meta_filter,
        } => to_json(
            api.get_publication(namespace, *publication_id, custom_meta_filter.as_deref(), None)
                .await?,
        ),
        Command::Publications {
            first,
            after,
            custom_meta_filter,
        } => to_json(
            api.get_publications(
                namespace,
                &pagination(*first, after),
                None,
                custom_meta_filter.as_deref(),
                None,
            )
            .await?,
        ),
        Command::PageLink {
            publication_id,
            page_id,
            relative,
        } => to_json(
            api.resolve_page_link(namespace, *publication_id, *page_id, *relative)
                .await?,
        ),
        Command::ComponentLink {
            publication_id,
            component_id,
            source_page_id,
            exclude_template_id,
            relative,
        } => to_json(
            api.resolve_component_link(
                namespace,
                *publication_id,
                *component_id,
                *source_page_id,
                *exclude_template_id,
                *relative,
            )
            .await?,
        ),
        Command::BinaryLink {
            publication_id,
            binary_id,
            variant_id,
            relative,
        } => to_json(
            api.resolve_binary_link(
                namespace,
                *publication_id,
                *binary_id,
                variant_id.as_deref(),
                *relative,
            )
            .await?,
        ),
        Command::DynamicComponentLink {
            publication_id,
            page_id,
            component_id,
            template_id,
            relative,
        } => to_json(
            api.resolve_dynamic_component_link(
                namespace,
                *publication_id,
                *page_id,
                *component_id,
                *template_id,
                *relative,
            )
            .await?,
        ),
        Command::Mapping { site_url } => {
            to_json(api.get_publication_mapping(namespace, site_url).await?)
        }
        Command::PageModel {
            publication_id,
            page_id,
            url,
            content_type,
            model_type,
            page_inclusion,
            content,
        } => {
            let options = PageModelOptions {
                content_type: *content_type,
                model_type: *model_type,
                page_inclusion: *page_inclusion,
                include_mode: *content,
            };
            let data = match (page_id, url) {
                (Some(page_id), _) => {
                    api.get_page_model_data(namespace, *publication_id, *page_id, &options, None)
                        .await?
                }
                (None, Some(url)) => {
                    api.get_page_model_data_by_url(namespace, *publication_id, url, &options, None)
                        .await?
                }
                (None, None) => return Err(missing_target("page-model")),
            };
            Ok(data.unwrap_or(Value::Null))
        }
        Command::EntityModel {
            publication_id,
            entity_id,
            template_id,
            content_type,
            model_type,
            dcp_type,
            content,
        } => {
            let options = EntityModelOptions {
                content_type: *content_type,
                model_type: *model_type,
                dcp_type: *dcp_type,
                include_mode: *content,
            };
            let data = api
                .get_entity_model_data(namespace, *publication_id, *entity_id, *template_id, &options, None)
                .await?;
            Ok(data.unwrap_or(Value::Null))
        }
        Command::ComponentPresentation {
            publication_id,
            component_id,
            template_id,
            content: ContentArgs { custom_meta_filter, content },
        } => to_json(
            api.get_component_presentation(
                namespace,
                *publication_id,
                *component_id,
                *template_id,
                custom_meta_filter.as_deref(),
                *content,
                None,
            )
            .await?,
        ),
        Command::ComponentPresentations {
            publication_id,
            schema_id,
            template_id,
            first,
            after,
            content: ContentArgs { custom_meta_filter, content },
        } => {
            let filter = InputComponentPresentationFilter {
                schema: schema_id.map(|id| InputSchemaCriteria { id }),
                template: template_id.map(|id| InputTemplateCriteria { id }),
                ..Default::default()
            };
            to_json(
                api.get_component_presentations(
                    namespace,
                    *publication_id,
                    &filter,
                    None,
                    &pagination(*first, after),
                    custom_meta_filter.as_deref(),
                    *content,
                    None,
                )
                .await?,
            )
        }
        Command::Keywords {
            publication_id,
            first,
            after,
        } => to_json(
            api.get_keywords(namespace, *publication_id, &pagination(*first, after), None)
                .await?,
        ),
        Command::Keyword {
            publication_id,
            category_id,
            keyword_id,
        } => to_json(
            api.get_keyword(namespace, *publication_id, *category_id, *keyword_id, None)
                .await?,
        ),
        Command::StructureGroups {
            publication_id,
            first,
            after,
        } => to_json(
            api.get_structure_groups(namespace, *publication_id, &pagination(*first, after), None)
                .await?,
        ),
        Command::StructureGroup {
            publication_id,
            structure_group_id,
        } => to_json(
            api.get_structure_group(namespace, *publication_id, *structure_group_id, None)
                .await?,
        ),
        Command::Sitemap {
            publication_id,
            levels,
        } => to_json(api.get_sitemap(namespace, *publication_id, *levels, None).await?),
        Command::SitemapSubtree {
            publication_id,
            node_id,
            levels,
            ancestor,
        } => to_json(
            api.get_sitemap_subtree(
                namespace,
                *publication_id,
                node_id.as_deref(),
                *levels,
                *ancestor,
                None,
            )
            .await?,
        ),
        Command::Schema => to_json(api.schema(api.cancellation_token()).await?),
        Command::Query {
            file,
            variables,
            operation_name,
        } => {
            let query = std::fs::read_to_string(file)?;
            let mut request = GraphQLRequest::new(query);
            if let Some(variables) = variables {
                request.variables = serde_json::from_str::<Map<String, Value>>(variables)?;
            }
            request.operation_name = operation_name.clone();
            request.timeout = Some(api.timeout());
            to_json(api.execute(&request, api.cancellation_token()).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graphql::GraphQLResponse;
    use crate::domain::ports::GraphQLClient;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    struct RecordingClient {
        data: Value,
        seen: Mutex<Vec<GraphQLRequest>>,
    }

    #[async_trait]
    impl GraphQLClient for RecordingClient {
        async fn execute(&self, request: &GraphQLRequest, _cancel: &CancellationToken) -> Result<GraphQLResponse> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(GraphQLResponse {
                data: Some(self.data.clone()),
                ..Default::default()
            })
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(5)
        }
    }

    #[tokio::test]
    async fn test_items_command_builds_filter() {
        let client = Arc::new(RecordingClient {
            data: json!({"items": {"edges": []}}),
            seen: Mutex::new(Vec::new()),
        });
        let api = PublicContentApi::new(client.clone());
        let command = Command::Items {
            item_types: vec![crate::domain::model::FilterItemType::Keyword],
            publication_ids: vec![],
            first: 3,
            after: Some("Mw==".to_string()),
            container_items: false,
            content: ContentArgs {
                custom_meta_filter: None,
                content: crate::domain::model::ContentIncludeMode::Exclude,
            },
        };

        let output = run(&api, ContentNamespace::Docs, &command).await.unwrap();
        assert_eq!(output, json!({"edges": []}));

        let seen = client.seen.lock().unwrap();
        assert_eq!(
            seen[0].variables["filter"],
            json!({"itemTypes": ["KEYWORD"], "namespaceIds": [2]})
        );
        assert_eq!(seen[0].variables["after"], json!("Mw=="));
    }

    #[tokio::test]
    async fn test_component_presentations_command_builds_filter() {
        let client = Arc::new(RecordingClient {
            data: json!({"componentPresentations": null}),
            seen: Mutex::new(Vec::new()),
        });
        let api = PublicContentApi::new(client.clone());
        let command = Command::ComponentPresentations {
            publication_id: 5,
            schema_id: Some(12),
            template_id: None,
            first: 10,
            after: None,
            content: ContentArgs {
                custom_meta_filter: None,
                content: crate::domain::model::ContentIncludeMode::Exclude,
            },
        };

        let output = run(&api, ContentNamespace::Sites, &command).await.unwrap();
        assert_eq!(output, json!({"edges": []}));

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].variables["filter"], json!({"schema": {"id": 12}}));
        assert_eq!(seen[0].template.as_deref(), Some("ComponentPresentations"));
    }

    #[tokio::test]
    async fn test_missing_link_prints_null() {
        let client = Arc::new(RecordingClient {
            data: json!({"pageLink": null}),
            seen: Mutex::new(Vec::new()),
        });
        let api = PublicContentApi::new(client);
        let command = Command::PageLink {
            publication_id: 5,
            page_id: 64,
            relative: true,
        };
        let output = run(&api, ContentNamespace::Sites, &command).await.unwrap();
        assert_eq!(output, Value::Null);
    }
}
