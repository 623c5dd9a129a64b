use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

/// EIP-1193 error code returned by `wallet_switchEthereumChain` when the
/// requested chain has not been registered with the wallet.
pub const ERR_UNRECOGNIZED_CHAIN: i64 = 4902;

/// Structured provider rejection. Wallets attach a numeric code to most
/// errors (user rejection, unrecognized chain, ...); transport-level
/// failures have no code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<Option<i64>>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Events a wallet provider pushes to the application at any time,
/// independently of in-flight requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The authorized account list changed. Empty means the user revoked
    /// access and is treated as a disconnect.
    AccountsChanged(Vec<String>),
    /// The wallet switched to a different chain (hex chain id).
    ChainChanged(String),
    /// The provider itself disconnected.
    Disconnected,
}

/// Capability handle for an injected wallet provider.
///
/// `request` maps directly onto the provider's `request({method, params})`
/// call; `subscribe` replaces the `on`/`removeListener` pair with a channel
/// whose receiver is dropped when the subscriber is torn down.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    fn subscribe(&self) -> mpsc::UnboundedReceiver<ProviderEvent>;
}

/// Locates a compatible wallet provider in the host environment.
///
/// In a browser this checks the well-known injected global; in tests it
/// hands out a mock. Detection never fails, it just finds nothing.
pub trait WalletProviderLocator: Send + Sync {
    fn locate(&self) -> Option<Arc<dyn WalletProvider>>;
}
