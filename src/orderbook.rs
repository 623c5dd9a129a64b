/// Orderbook backend: order listing and takeOrders calldata generation.
///
/// The trait is the seam between the swap core and the Raindex backend;
/// [`RaindexClient`] is the HTTP implementation, tests substitute mocks.
use crate::config::Config;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One side of an order's valid token set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIo {
    pub token: String,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub vault_id: Option<String>,
}

/// An open order as returned by the orderbook backend.
///
/// `valid_inputs`/`valid_outputs` may be absent when the backend returns an
/// order shape this client cannot inspect; matching then degrades to a
/// best-effort classification (see `quote::OrderMatch`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderbookOrder {
    pub id: String,
    #[serde(default)]
    pub active: bool,
    /// ABI-encoded order struct, required for calldata generation.
    #[serde(default)]
    pub order_bytes: Option<String>,
    #[serde(default)]
    pub valid_inputs: Option<Vec<OrderIo>>,
    #[serde(default)]
    pub valid_outputs: Option<Vec<OrderIo>>,
}

/// One order selected for taking, with its io slot indices and any signed
/// context the order requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeOrder {
    pub order: OrderbookOrder,
    #[serde(rename = "inputIOIndex")]
    pub input_io_index: u32,
    #[serde(rename = "outputIOIndex")]
    pub output_io_index: u32,
    pub signed_context: Vec<Value>,
}

/// Bounds and order list handed to the calldata encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeOrdersConfig {
    pub minimum_input: String,
    pub maximum_input: String,
    #[serde(rename = "maximumIORatio")]
    pub maximum_io_ratio: String,
    pub orders: Vec<TakeOrder>,
    pub data: String,
}

/// Backend failure with a human-readable message, mirroring the SDK's
/// `readableMsg` error shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderbookError {
    pub readable_msg: String,
}

impl OrderbookError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            readable_msg: msg.into(),
        }
    }
}

impl std::fmt::Display for OrderbookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.readable_msg)
    }
}

impl std::error::Error for OrderbookError {}

#[async_trait]
pub trait OrderbookApi: Send + Sync {
    /// Whether the client finished initializing against its chain.
    fn is_ready(&self) -> bool;

    /// Full list of open orders.
    async fn list_orders(&self) -> Result<Vec<OrderbookOrder>, OrderbookError>;

    /// Encodes a takeOrders call for the given configuration, returning hex
    /// calldata.
    async fn take_orders_calldata(
        &self,
        config: &TakeOrdersConfig,
    ) -> Result<String, OrderbookError>;
}

const ORDERS_QUERY: &str = r#"
query OpenOrders {
  orders(where: { active: true }, orderBy: timestampAdded, orderDirection: desc) {
    id
    active
    orderBytes
    validInputs { token decimals vaultId }
    validOutputs { token decimals vaultId }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<OrdersData>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct OrdersData {
    orders: Vec<OrderbookOrder>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CalldataResponse {
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    error: Option<CalldataError>,
}

#[derive(Debug, Deserialize)]
struct CalldataError {
    #[serde(rename = "readableMsg")]
    readable_msg: String,
}

/// HTTP client for the Raindex orderbook: orders come from the subgraph,
/// calldata from the Raindex API encoder.
pub struct RaindexClient {
    http: reqwest::Client,
    subgraph_url: String,
    calldata_url: String,
    ready: bool,
}

impl RaindexClient {
    pub fn new(config: &Config) -> Self {
        let client = Self {
            http: reqwest::Client::new(),
            subgraph_url: config.subgraph_url.clone(),
            calldata_url: format!(
                "{}/takeOrdersCalldata",
                config.orderbook_api_url.trim_end_matches('/')
            ),
            ready: !config.subgraph_url.is_empty(),
        };

        if client.ready {
            logger::info(
                LogTag::Orderbook,
                &format!("Raindex client initialized for chain {}", config.chain.chain_id),
            );
        }

        client
    }
}

#[async_trait]
impl OrderbookApi for RaindexClient {
    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn list_orders(&self) -> Result<Vec<OrderbookOrder>, OrderbookError> {
        let response = self
            .http
            .post(&self.subgraph_url)
            .json(&json!({ "query": ORDERS_QUERY }))
            .send()
            .await
            .map_err(|e| OrderbookError::new(format!("Order list request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(OrderbookError::new(format!(
                "Order list request failed: HTTP {}",
                response.status()
            )));
        }

        let body: GraphqlResponse = response
            .json()
            .await
            .map_err(|e| OrderbookError::new(format!("Invalid order list response: {}", e)))?;

        if let Some(errors) = body.errors {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(OrderbookError::new(message));
        }

        let orders = body.data.map(|d| d.orders).unwrap_or_default();
        logger::debug(
            LogTag::Orderbook,
            &format!("Fetched {} open orders", orders.len()),
        );
        Ok(orders)
    }

    async fn take_orders_calldata(
        &self,
        config: &TakeOrdersConfig,
    ) -> Result<String, OrderbookError> {
        let response = self
            .http
            .post(&self.calldata_url)
            .json(config)
            .send()
            .await
            .map_err(|e| OrderbookError::new(format!("Calldata request failed: {}", e)))?;

        let body: CalldataResponse = response
            .json()
            .await
            .map_err(|e| OrderbookError::new(format!("Invalid calldata response: {}", e)))?;

        if let Some(err) = body.error {
            return Err(OrderbookError::new(err.readable_msg));
        }

        body.value
            .ok_or_else(|| OrderbookError::new("Calldata response missing value"))
    }
}
