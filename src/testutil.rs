//! Shared mocks for unit tests: a scriptable wallet provider, an in-memory
//! orderbook backend, and progress/recorder capture helpers.
use crate::orchestrator::{AccountRecorder, ProgressSink, SwapProgress, SwapStep, TransactionRecord};
use crate::orderbook::{OrderIo, OrderbookApi, OrderbookError, OrderbookOrder, TakeOrdersConfig};
use crate::wallet::{ProviderError, ProviderEvent, WalletProvider};
use alloy_primitives::U256;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex as StdMutex;
use tokio::sync::mpsc;

pub const MOCK_TX_HASH: &str =
    "0x00000000000000000000000000000000000000000000000000000000000c0ffe";

/// Scriptable EIP-1193 provider. Every request is recorded; responses come
/// from per-method scripts when present, otherwise from sensible defaults
/// driven by the configured accounts/chain/allowance.
pub struct MockProvider {
    accounts: Vec<String>,
    chain: String,
    allowance: U256,
    scripts: StdMutex<HashMap<String, VecDeque<Result<Value, ProviderError>>>>,
    calls: StdMutex<Vec<(String, Value)>>,
    event_txs: StdMutex<Vec<mpsc::UnboundedSender<ProviderEvent>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            accounts: vec![],
            chain: "0x1".to_string(),
            allowance: U256::ZERO,
            scripts: StdMutex::new(HashMap::new()),
            calls: StdMutex::new(vec![]),
            event_txs: StdMutex::new(vec![]),
        }
    }

    pub fn with_accounts(mut self, accounts: &[&str]) -> Self {
        self.accounts = accounts.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_chain(mut self, chain: &str) -> Self {
        self.chain = chain.to_string();
        self
    }

    /// Value `eth_call` reports as the current ERC-20 allowance.
    pub fn with_allowance(mut self, allowance: U256) -> Self {
        self.allowance = allowance;
        self
    }

    /// Queues an error for the next call to `method`; later calls fall back
    /// to the default response.
    pub fn script_error(&self, method: &str, error: ProviderError) {
        self.scripts
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(Err(error));
    }

    pub fn script_result(&self, method: &str, result: Value) {
        self.scripts
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(Ok(result));
    }

    pub fn emit(&self, event: ProviderEvent) {
        for tx in self.event_txs.lock().unwrap().iter() {
            let _ = tx.send(event.clone());
        }
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }

    /// Params of every recorded call to `method`, in call order.
    pub fn calls_for(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub fn last_call(&self, method: &str) -> Option<(String, Value)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(m, _)| m == method)
            .cloned()
    }

    fn default_response(&self, method: &str) -> Result<Value, ProviderError> {
        match method {
            "eth_requestAccounts" | "eth_accounts" => Ok(json!(self.accounts)),
            "eth_chainId" => Ok(json!(self.chain)),
            "wallet_switchEthereumChain" | "wallet_addEthereumChain" => Ok(Value::Null),
            "eth_sendTransaction" => Ok(json!(MOCK_TX_HASH)),
            "eth_call" => Ok(json!(format!("0x{:0>64}", format!("{:x}", self.allowance)))),
            "personal_sign" => Ok(json!("0xsigned")),
            other => Err(ProviderError::new(
                None,
                format!("Unsupported method: {}", other),
            )),
        }
    }
}

#[async_trait]
impl WalletProvider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        // Let already-emitted provider events reach their subscribers
        // before the request is answered, mirroring how a real provider
        // delivers events between round-trips.
        tokio::task::yield_now().await;

        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));

        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(|queue| queue.pop_front());
        match scripted {
            Some(response) => response,
            None => self.default_response(method),
        }
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<ProviderEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.event_txs.lock().unwrap().push(tx);
        rx
    }
}

/// In-memory orderbook backend with fixed responses.
pub struct MockOrderbook {
    ready: bool,
    orders: Result<Vec<OrderbookOrder>, OrderbookError>,
    calldata: Result<String, OrderbookError>,
    calldata_calls: AtomicUsize,
    last_take_config: StdMutex<Option<TakeOrdersConfig>>,
}

impl MockOrderbook {
    pub fn new() -> Self {
        Self {
            ready: true,
            orders: Ok(vec![]),
            calldata: Ok("0xc0de".to_string()),
            calldata_calls: AtomicUsize::new(0),
            last_take_config: StdMutex::new(None),
        }
    }

    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn with_orders(mut self, orders: Vec<OrderbookOrder>) -> Self {
        self.orders = Ok(orders);
        self
    }

    pub fn fail_orders(mut self, msg: &str) -> Self {
        self.orders = Err(OrderbookError::new(msg));
        self
    }

    pub fn fail_calldata(mut self, msg: &str) -> Self {
        self.calldata = Err(OrderbookError::new(msg));
        self
    }

    pub fn calldata_calls(&self) -> usize {
        self.calldata_calls.load(Ordering::SeqCst)
    }

    pub fn last_take_config(&self) -> Option<TakeOrdersConfig> {
        self.last_take_config.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderbookApi for MockOrderbook {
    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn list_orders(&self) -> Result<Vec<OrderbookOrder>, OrderbookError> {
        self.orders.clone()
    }

    async fn take_orders_calldata(
        &self,
        config: &TakeOrdersConfig,
    ) -> Result<String, OrderbookError> {
        self.calldata_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_take_config.lock().unwrap() = Some(config.clone());
        self.calldata.clone()
    }
}

/// Order with inspectable io sets and populated order bytes.
pub fn order(id: &str, active: bool, inputs: &[&str], outputs: &[&str]) -> OrderbookOrder {
    let io = |tokens: &[&str]| {
        Some(
            tokens
                .iter()
                .map(|t| OrderIo {
                    token: t.to_string(),
                    decimals: None,
                    vault_id: None,
                })
                .collect::<Vec<_>>(),
        )
    };

    OrderbookOrder {
        id: id.to_string(),
        active,
        order_bytes: Some("0xdeadbeef".to_string()),
        valid_inputs: io(inputs),
        valid_outputs: io(outputs),
    }
}

/// Active order whose io sets cannot be inspected.
pub fn opaque_order(id: &str) -> OrderbookOrder {
    OrderbookOrder {
        id: id.to_string(),
        active: true,
        order_bytes: Some("0xdeadbeef".to_string()),
        valid_inputs: None,
        valid_outputs: None,
    }
}

/// Progress sink that captures every reported step with its detail payload.
#[derive(Default)]
pub struct CollectingSink {
    events: StdMutex<Vec<(SwapStep, Option<Value>)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> Vec<SwapStep> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(step, _)| *step)
            .collect()
    }

    pub fn events(&self) -> Vec<(SwapStep, Option<Value>)> {
        self.events.lock().unwrap().clone()
    }

    pub fn last_detail(&self) -> Option<Value> {
        self.events
            .lock()
            .unwrap()
            .last()
            .and_then(|(_, detail)| detail.clone())
    }
}

impl ProgressSink for CollectingSink {
    fn on_progress(&self, progress: &SwapProgress) {
        self.events
            .lock()
            .unwrap()
            .push((progress.step, progress.detail.clone()));
    }
}

/// Recorder that stores every record, optionally failing each call.
pub struct MockRecorder {
    records: StdMutex<Vec<TransactionRecord>>,
    fail: bool,
}

impl MockRecorder {
    pub fn new() -> Self {
        Self {
            records: StdMutex::new(vec![]),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            records: StdMutex::new(vec![]),
            fail: true,
        }
    }

    pub fn records(&self) -> Vec<TransactionRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountRecorder for MockRecorder {
    async fn record(&self, record: &TransactionRecord) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("recorder backend offline");
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
