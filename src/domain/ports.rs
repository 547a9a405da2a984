use crate::domain::graphql::{GraphQLRequest, GraphQLResponse, GraphQLSchema, INTROSPECTION_QUERY};
use crate::utils::error::{PcaError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 通用 GraphQL 執行端。傳輸、重試等都屬於實作者的責任
#[async_trait]
pub trait GraphQLClient: Send + Sync {
    async fn execute(
        &self,
        request: &GraphQLRequest,
        cancel: &CancellationToken,
    ) -> Result<GraphQLResponse>;

    /// 預設透過 introspection 查詢取得 schema
    async fn schema(&self, cancel: &CancellationToken) -> Result<GraphQLSchema> {
        let mut request = GraphQLRequest::new(INTROSPECTION_QUERY);
        request.operation_name = Some("IntrospectionQuery".to_string());

        let mut data = self.execute(&request, cancel).await?.into_data()?;
        let schema = data
            .get_mut("__schema")
            .map(Value::take)
            .ok_or_else(|| PcaError::MappingError {
                target: "GraphQLSchema".to_string(),
                message: "response has no __schema field".to_string(),
            })?;
        serde_json::from_value(schema).map_err(|e| PcaError::MappingError {
            target: "GraphQLSchema".to_string(),
            message: e.to_string(),
        })
    }

    /// 沒有指定請求逾時時使用的預設值
    fn timeout(&self) -> Duration;
}

/// 型別化執行：套用 converters 後把整個 `data` 反序列化成 `T`
#[async_trait]
pub trait GraphQLClientExt: GraphQLClient {
    async fn execute_typed<T>(&self, request: &GraphQLRequest, cancel: &CancellationToken) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let mut data = self.execute(request, cancel).await?.into_data()?;
        request.convert(&mut data);
        serde_json::from_value(data).map_err(|e| PcaError::MappingError {
            target: std::any::type_name::<T>().to_string(),
            message: e.to_string(),
        })
    }
}

impl<C: GraphQLClient + ?Sized> GraphQLClientExt for C {}

/// 反序列化前改寫回應中的 JSON 物件，例如補上多型判別欄位
pub trait ResponseConverter: Send + Sync + Debug {
    fn convert(&self, object: &mut Map<String, Value>);
}
