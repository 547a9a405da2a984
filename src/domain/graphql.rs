use crate::domain::ports::ResponseConverter;
use crate::utils::error::{PcaError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// 送往 GraphQL 端點的請求。序列化後為 `{query, variables, operationName}`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub query: String,
    pub variables: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    /// 覆寫 client 預設的逾時
    #[serde(skip)]
    pub timeout: Option<Duration>,
    /// 產生此請求的具名模板
    #[serde(skip)]
    pub template: Option<String>,
    #[serde(skip)]
    pub converters: Vec<Arc<dyn ResponseConverter>>,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// 依序對每個 JSON 物件套用 converters（深度優先，子節點先處理）
    pub fn convert(&self, value: &mut Value) {
        if self.converters.is_empty() {
            return;
        }
        apply_converters(&self.converters, value);
    }
}

fn apply_converters(converters: &[Arc<dyn ResponseConverter>], value: &mut Value) {
    match value {
        Value::Object(object) => {
            for child in object.values_mut() {
                apply_converters(converters, child);
            }
            for converter in converters {
                converter.convert(object);
            }
        }
        Value::Array(items) => {
            for item in items {
                apply_converters(converters, item);
            }
        }
        _ => {}
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQLLocation {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub locations: Vec<GraphQLLocation>,
    #[serde(default)]
    pub path: Option<Vec<Value>>,
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: None,
            extensions: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl GraphQLResponse {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 取出 `data`。沒有 data 時回傳 GraphQL 錯誤；部分錯誤只記錄警告
    pub fn into_data(self) -> Result<Value> {
        match self.data {
            Some(data) if !data.is_null() => {
                if !self.errors.is_empty() {
                    tracing::warn!(
                        "GraphQL response contains {} error(s) alongside data: {}",
                        self.errors.len(),
                        self.errors
                            .iter()
                            .map(|e| e.message.as_str())
                            .collect::<Vec<_>>()
                            .join("; ")
                    );
                }
                Ok(data)
            }
            _ if !self.errors.is_empty() => Err(PcaError::GraphQLErrors {
                errors: self.errors,
            }),
            _ => Ok(Value::Null),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedType {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaType {
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<SchemaField>>,
}

/// Introspection 結果的精簡版本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLSchema {
    #[serde(default)]
    pub query_type: Option<NamedType>,
    #[serde(default)]
    pub mutation_type: Option<NamedType>,
    #[serde(default)]
    pub types: Vec<SchemaType>,
}

impl GraphQLSchema {
    pub fn find_type(&self, name: &str) -> Option<&SchemaType> {
        self.types.iter().find(|t| t.name.as_deref() == Some(name))
    }
}

pub const INTROSPECTION_QUERY: &str = include_str!("../../queries/Introspection.graphql");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let mut request = GraphQLRequest::new("query { sitemap { id } }");
        request
            .variables
            .insert("publicationId".to_string(), json!(5));
        request.timeout = Some(Duration::from_secs(3));
        request.template = Some("Sitemap".to_string());

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"query": "query { sitemap { id } }", "variables": {"publicationId": 5}})
        );

        request.operation_name = Some("page".to_string());
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["operationName"], "page");
    }

    #[test]
    fn test_into_data_with_errors_only() {
        let response: GraphQLResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [{"message": "Field 'x' is undefined", "locations": [{"line": 1, "column": 3}]}]
        }))
        .unwrap();

        let err = response.into_data().unwrap_err();
        match err {
            PcaError::GraphQLErrors { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].locations[0].column, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_into_data_keeps_partial_data() {
        let response: GraphQLResponse = serde_json::from_value(json!({
            "data": {"page": {"id": "1"}},
            "errors": [{"message": "customMetas unavailable"}]
        }))
        .unwrap();

        let data = response.into_data().unwrap();
        assert_eq!(data["page"]["id"], "1");
    }

    #[test]
    fn test_into_data_empty_response() {
        let response = GraphQLResponse::default();
        assert_eq!(response.into_data().unwrap(), Value::Null);
    }
}
