use super::provider::{
    ProviderError, ProviderEvent, WalletProvider, WalletProviderLocator, ERR_UNRECOGNIZED_CHAIN,
};
use super::state::WalletState;
use crate::config::ChainDescriptor;
use crate::errors::SwapError;
use crate::logger::{self, LogTag};
use serde_json::{json, Value};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Owns the lifecycle of a wallet provider handle: connect/disconnect,
/// network verification and switching, transaction submission, and the
/// mirroring of provider-originated events into [`WalletState`].
///
/// The event subscription lives for the manager's lifetime and is released
/// on [`WalletManager::shutdown`] or drop.
pub struct WalletManager {
    provider: Arc<dyn WalletProvider>,
    chain: ChainDescriptor,
    state: Arc<RwLock<WalletState>>,
    event_task: StdMutex<Option<JoinHandle<()>>>,
}

impl WalletManager {
    pub fn new(provider: Arc<dyn WalletProvider>, chain: ChainDescriptor) -> Self {
        let state = Arc::new(RwLock::new(WalletState::default()));
        let event_task = spawn_event_pump(&provider, Arc::clone(&state));

        Self {
            provider,
            chain,
            state,
            event_task: StdMutex::new(Some(event_task)),
        }
    }

    /// Whether a compatible provider is present. Never errors.
    pub fn detect(locator: &dyn WalletProviderLocator) -> bool {
        locator.locate().is_some()
    }

    pub fn from_locator(
        locator: &dyn WalletProviderLocator,
        chain: ChainDescriptor,
    ) -> Result<Self, SwapError> {
        let provider = locator.locate().ok_or(SwapError::WalletNotFound)?;
        Ok(Self::new(provider, chain))
    }

    pub async fn state(&self) -> WalletState {
        self.state.read().await.clone()
    }

    pub async fn address(&self) -> Option<String> {
        self.state.read().await.address.clone()
    }

    /// Address of the connected account, or `SignerUnavailable`.
    pub async fn require_address(&self) -> Result<String, SwapError> {
        let state = self.state.read().await;
        if !state.connected {
            return Err(SwapError::SignerUnavailable);
        }
        state.address.clone().ok_or(SwapError::SignerUnavailable)
    }

    pub async fn is_on_target_chain(&self) -> bool {
        self.state.read().await.chain_id.as_deref() == Some(self.chain.chain_id.as_str())
    }

    /// Requests account access interactively and populates the wallet state.
    pub async fn connect(&self) -> Result<(String, String), SwapError> {
        let accounts = match self.provider.request("eth_requestAccounts", json!([])).await {
            Ok(value) => parse_accounts(&value),
            Err(err) => {
                self.record_error(&err.message).await;
                return Err(SwapError::ExecutionError(format!(
                    "Failed to connect wallet: {}",
                    err
                )));
            }
        };

        if accounts.is_empty() {
            self.record_error("No accounts found").await;
            return Err(SwapError::NoAccounts);
        }
        let address = accounts[0].clone();

        let chain_id = match self.provider.request("eth_chainId", json!([])).await {
            Ok(value) => value.as_str().unwrap_or_default().to_string(),
            Err(err) => {
                self.record_error(&err.message).await;
                return Err(SwapError::ExecutionError(format!(
                    "Failed to read chain id: {}",
                    err
                )));
            }
        };

        self.state
            .write()
            .await
            .set_connected(address.clone(), chain_id.clone());

        logger::info(
            LogTag::Wallet,
            &format!("Connected {} on chain {}", address, chain_id),
        );

        Ok((address, chain_id))
    }

    /// Silent reconnect: queries already-authorized accounts without
    /// prompting. Returns whether a session was restored. Provider errors
    /// are swallowed; this runs speculatively at startup.
    pub async fn try_reconnect(&self) -> bool {
        let accounts = match self.provider.request("eth_accounts", json!([])).await {
            Ok(value) => parse_accounts(&value),
            Err(err) => {
                logger::debug(LogTag::Wallet, &format!("Silent reconnect failed: {}", err));
                return false;
            }
        };

        if accounts.is_empty() {
            return false;
        }

        let chain_id = match self.provider.request("eth_chainId", json!([])).await {
            Ok(value) => value.as_str().unwrap_or_default().to_string(),
            Err(_) => return false,
        };

        self.state
            .write()
            .await
            .set_connected(accounts[0].clone(), chain_id);
        logger::info(LogTag::Wallet, "Restored existing wallet session");
        true
    }

    /// Switches the wallet to the target chain. If the wallet reports the
    /// chain as unregistered (code 4902), registers it with the full chain
    /// descriptor and retries once. Idempotent when already on the target.
    pub async fn switch_network(&self) -> Result<(), SwapError> {
        if self.is_on_target_chain().await {
            return Ok(());
        }

        let switch_params = json!([{ "chainId": self.chain.chain_id }]);

        if let Err(err) = self
            .provider
            .request("wallet_switchEthereumChain", switch_params.clone())
            .await
        {
            if err.code == Some(ERR_UNRECOGNIZED_CHAIN) {
                logger::info(
                    LogTag::Wallet,
                    &format!("Chain {} not registered, adding it", self.chain.chain_id),
                );
                self.provider
                    .request("wallet_addEthereumChain", json!([self.chain]))
                    .await
                    .map_err(|e| SwapError::NetworkSwitchFailed(e.to_string()))?;
                self.provider
                    .request("wallet_switchEthereumChain", switch_params)
                    .await
                    .map_err(|e| SwapError::NetworkSwitchFailed(e.to_string()))?;
            } else {
                self.record_error(&err.message).await;
                return Err(SwapError::NetworkSwitchFailed(err.to_string()));
            }
        }

        let mut state = self.state.write().await;
        state.chain_id = Some(self.chain.chain_id.clone());
        state.last_error = None;
        Ok(())
    }

    /// Clears local state. Wallet-extension protocols have no explicit
    /// disconnect call, so the provider is not notified.
    pub async fn disconnect(&self) {
        self.state.write().await.reset();
        logger::info(LogTag::Wallet, "Wallet disconnected");
    }

    /// Submits a transaction from the connected account. "Submitted" means
    /// accepted by the provider, not mined.
    pub async fn send_transaction(
        &self,
        to: &str,
        data: &str,
        value: &str,
    ) -> Result<String, ProviderError> {
        let from = self
            .state
            .read()
            .await
            .address
            .clone()
            .ok_or_else(|| ProviderError::new(None, "Wallet not connected"))?;

        let params = json!([{
            "from": from,
            "to": to,
            "value": value,
            "data": data,
        }]);

        let result = self.provider.request("eth_sendTransaction", params).await?;
        Ok(result.as_str().unwrap_or_default().to_string())
    }

    /// Read-only contract call through the provider.
    pub async fn call(&self, to: &str, data: &str) -> Result<String, ProviderError> {
        let params = json!([{ "to": to, "data": data }, "latest"]);
        let result = self.provider.request("eth_call", params).await?;
        Ok(result.as_str().unwrap_or_default().to_string())
    }

    /// Signs a UTF-8 message with the connected account via `personal_sign`.
    pub async fn sign_message(&self, message: &str) -> Result<String, SwapError> {
        let address = self.require_address().await?;
        let message_hex = format!("0x{}", hex::encode(message.as_bytes()));

        let result = self
            .provider
            .request("personal_sign", json!([message_hex, address]))
            .await
            .map_err(|e| SwapError::ExecutionError(format!("Message signing failed: {}", e)))?;

        Ok(result.as_str().unwrap_or_default().to_string())
    }

    /// Releases the provider event subscription.
    pub fn shutdown(&self) {
        if let Ok(mut guard) = self.event_task.lock() {
            if let Some(task) = guard.take() {
                task.abort();
            }
        }
    }
}

impl Drop for WalletManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn parse_accounts(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|accounts| {
            accounts
                .iter()
                .filter_map(|a| a.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Mirrors provider events into the shared wallet state for the lifetime of
/// the manager. An empty account list has the same effect as an explicit
/// disconnect.
fn spawn_event_pump(
    provider: &Arc<dyn WalletProvider>,
    state: Arc<RwLock<WalletState>>,
) -> JoinHandle<()> {
    let mut events = provider.subscribe();

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                ProviderEvent::AccountsChanged(accounts) => {
                    let mut state = state.write().await;
                    if accounts.is_empty() {
                        logger::warning(LogTag::Wallet, "Account access revoked by provider");
                        state.reset();
                    } else {
                        state.address = Some(accounts[0].clone());
                        state.last_error = None;
                    }
                }
                ProviderEvent::ChainChanged(chain_id) => {
                    let mut state = state.write().await;
                    state.chain_id = Some(chain_id);
                    state.last_error = None;
                }
                ProviderEvent::Disconnected => {
                    logger::warning(LogTag::Wallet, "Provider disconnected");
                    state.write().await.reset();
                }
            }
        }
    })
}

impl WalletManager {
    async fn record_error(&self, message: &str) {
        let mut state = self.state.write().await;
        state.connected = false;
        state.last_error = Some(message.to_string());
    }
}
