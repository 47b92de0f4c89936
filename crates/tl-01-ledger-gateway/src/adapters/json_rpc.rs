//! JSON-RPC full-node adapter.
//!
//! Implements `LedgerGateway` against a full node's HTTP JSON-RPC endpoint.
//! Paged reads follow `nextCursor` until `hasNextPage` is false.

use crate::domain::{GatewayError, RawObject};
use crate::ports::outbound::LedgerGateway;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::{Address, MarketplaceConfig, ObjectId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Objects per page requested from paged endpoints.
const PAGE_LIMIT: u64 = 50;

/// Native gas coin type.
const GAS_COIN_TYPE: &str = "0x2::sui::SUI";

#[derive(Debug, Serialize)]
struct JsonRpcRequest<P> {
    jsonrpc: &'static str,
    method: String,
    params: P,
    id: u64,
}

impl<P> JsonRpcRequest<P> {
    fn new(method: &str, params: P, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.to_string(),
            params,
            id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<R> {
    result: Option<R>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// One page of a paged object query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectPage {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    next_cursor: Option<Value>,
    #[serde(default)]
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceResponse {
    total_balance: Value,
}

fn object_options() -> Value {
    json!({ "showType": true, "showOwner": true, "showContent": true })
}

/// Full-node gateway over HTTP JSON-RPC.
pub struct JsonRpcLedgerGateway {
    client: Client,
    url: String,
    request_id: AtomicU64,
}

impl JsonRpcLedgerGateway {
    /// Create a gateway for `url` with default timeouts.
    pub fn new(url: impl Into<String>) -> Result<Self, GatewayError> {
        Self::with_timeout(url, Duration::from_secs(30))
    }

    /// Create a gateway with a custom request timeout.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            request_id: AtomicU64::new(1),
        })
    }

    /// Create a gateway for the configured network endpoint.
    pub fn from_config(config: &MarketplaceConfig) -> Result<Self, GatewayError> {
        Self::new(config.rpc_endpoint())
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn call<P: Serialize + Send, R: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, GatewayError> {
        let request = JsonRpcRequest::new(method, params, self.next_id());
        debug!("[tl-01] -> {} (id {})", method, request.id);

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    GatewayError::Transport(format!("Cannot connect to {}", self.url))
                } else if e.is_timeout() {
                    GatewayError::Transport(format!("Request to {} timed out", self.url))
                } else {
                    GatewayError::Transport(e.to_string())
                }
            })?;

        let rpc_response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        if let Some(error) = rpc_response.error {
            warn!("[tl-01] {} returned error {}: {}", method, error.code, error.message);
            return Err(GatewayError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        rpc_response
            .result
            .ok_or_else(|| GatewayError::Decode(format!("missing result for {}", method)))
    }

    /// Drain a paged endpoint. `params_for` builds the params for a cursor.
    async fn collect_pages<F>(
        &self,
        method: &str,
        params_for: F,
    ) -> Result<Vec<RawObject>, GatewayError>
    where
        F: Fn(&Value) -> Value,
    {
        let mut objects = Vec::new();
        let mut cursor = Value::Null;
        loop {
            let page: ObjectPage = self.call(method, params_for(&cursor)).await?;
            let (decoded, next) = decode_page(page)?;
            objects.extend(decoded);
            match next {
                Some(next) => cursor = next,
                None => break,
            }
        }
        Ok(objects)
    }
}

/// Decode a page into objects plus the cursor of the next page, if any.
/// Entries the node reports as missing are skipped.
fn decode_page(page: ObjectPage) -> Result<(Vec<RawObject>, Option<Value>), GatewayError> {
    let mut objects = Vec::with_capacity(page.data.len());
    for entry in &page.data {
        if let Some(raw) = RawObject::from_rpc_response(entry)? {
            objects.push(raw);
        }
    }
    let next = match page.next_cursor {
        Some(cursor) if page.has_next_page && !cursor.is_null() => Some(cursor),
        _ => None,
    };
    Ok((objects, next))
}

fn parse_balance(value: &Value) -> Result<u64, GatewayError> {
    match value {
        Value::String(s) => s
            .parse()
            .map_err(|_| GatewayError::field("totalBalance", format!("not a number: {}", s))),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| GatewayError::field("totalBalance", "not a u64")),
        other => Err(GatewayError::field("totalBalance", format!("unexpected {}", other))),
    }
}

#[async_trait]
impl LedgerGateway for JsonRpcLedgerGateway {
    async fn read_object(&self, id: &ObjectId) -> Result<Option<RawObject>, GatewayError> {
        let response: Value = self
            .call("sui_getObject", json!([id.as_str(), object_options()]))
            .await?;
        RawObject::from_rpc_response(&response)
    }

    async fn read_owned_objects(
        &self,
        owner: &Address,
        struct_type: &str,
    ) -> Result<Vec<RawObject>, GatewayError> {
        self.collect_pages("suix_getOwnedObjects", |cursor| {
            json!([
                owner.as_str(),
                { "filter": { "StructType": struct_type }, "options": object_options() },
                cursor,
                PAGE_LIMIT
            ])
        })
        .await
    }

    async fn query_objects(&self, struct_type: &str) -> Result<Vec<RawObject>, GatewayError> {
        self.collect_pages("suix_queryObjects", |cursor| {
            json!([
                { "filter": { "StructType": struct_type }, "options": object_options() },
                cursor,
                PAGE_LIMIT
            ])
        })
        .await
    }

    async fn get_balance(&self, owner: &Address) -> Result<u64, GatewayError> {
        let response: BalanceResponse = self
            .call("suix_getBalance", json!([owner.as_str(), GAS_COIN_TYPE]))
            .await?;
        parse_balance(&response.total_balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = JsonRpcRequest::new("sui_getObject", json!(["0x1"]), 7);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "sui_getObject");
        assert_eq!(value["id"], 7);
        assert_eq!(value["params"][0], "0x1");
    }

    #[test]
    fn test_error_response_deserializes() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"Insufficient gas"}}"#;
        let response: JsonRpcResponse<Value> = serde_json::from_str(raw).unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "Insufficient gas");
        assert!(response.result.is_none());
    }

    #[test]
    fn test_decode_page_follows_cursor() {
        let page: ObjectPage = serde_json::from_value(json!({
            "data": [
                { "data": {
                    "objectId": "0xa", "version": "1",
                    "type": "0xpkg::ticket::Listing",
                    "owner": { "AddressOwner": "0xs" },
                    "content": { "fields": { "price": "1" } }
                } },
                { "error": { "code": "deleted", "object_id": "0xb" } }
            ],
            "nextCursor": "0xa",
            "hasNextPage": true
        }))
        .unwrap();
        let (objects, next) = decode_page(page).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(next, Some(json!("0xa")));
    }

    #[test]
    fn test_decode_last_page() {
        let page: ObjectPage = serde_json::from_value(json!({
            "data": [], "nextCursor": "0xz", "hasNextPage": false
        }))
        .unwrap();
        let (objects, next) = decode_page(page).unwrap();
        assert!(objects.is_empty());
        assert!(next.is_none());
    }

    #[test]
    fn test_parse_balance() {
        assert_eq!(parse_balance(&json!("2500000000")).unwrap(), 2_500_000_000);
        assert_eq!(parse_balance(&json!(5)).unwrap(), 5);
        assert!(parse_balance(&json!("x")).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        let gateway =
            JsonRpcLedgerGateway::with_timeout("http://127.0.0.1:1", Duration::from_secs(2))
                .unwrap();
        let result = gateway.read_object(&ObjectId::new("0x1")).await;
        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }
}
