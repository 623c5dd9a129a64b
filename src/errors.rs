/// Structured error handling for the swap orchestration core.
///
/// Every failure is represented as a value with a human-readable message and
/// a stable string code, and is returned from the failing operation rather
/// than thrown across orchestration boundaries. The orchestrator attaches
/// failures directly to the `error` progress state without an exception
/// layer at each step.
use serde_json::json;
use thiserror::Error;

pub type SwapResult<T> = Result<T, SwapError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SwapError {
    #[error("Phantom wallet not found. Please install the Phantom extension.")]
    WalletNotFound,

    #[error("No accounts found. Please ensure the wallet is unlocked.")]
    NoAccounts,

    #[error("Failed to switch network: {0}")]
    NetworkSwitchFailed(String),

    #[error("Orderbook client not initialized")]
    ClientNotReady,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("No matching orders found for this token pair")]
    NoMatchingOrders,

    #[error("Failed to get quote: {0}")]
    QuoteError(String),

    #[error("Signer or user address not available")]
    SignerUnavailable,

    #[error("Failed to approve token: {0}")]
    ApprovalError(String),

    #[error("No valid order for execution")]
    NoValidOrder,

    #[error("Calldata generation failed: {0}")]
    CalldataGenerationFailed(String),

    #[error("Failed to execute real swap: {0}")]
    RealSwapFailed(String),

    #[error("Failed to execute swap: {0}")]
    ExecutionError(String),
}

impl SwapError {
    /// Stable machine-readable code, surfaced verbatim to the presentation
    /// layer alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            SwapError::WalletNotFound => "WALLET_NOT_FOUND",
            SwapError::NoAccounts => "NO_ACCOUNTS",
            SwapError::NetworkSwitchFailed(_) => "NETWORK_SWITCH_FAILED",
            SwapError::ClientNotReady => "CLIENT_NOT_READY",
            SwapError::NetworkError(_) => "NETWORK_ERROR",
            SwapError::NoMatchingOrders => "NO_MATCHING_ORDERS",
            SwapError::QuoteError(_) => "QUOTE_ERROR",
            SwapError::SignerUnavailable => "SIGNER_UNAVAILABLE",
            SwapError::ApprovalError(_) => "APPROVAL_ERROR",
            SwapError::NoValidOrder => "NO_VALID_ORDER",
            SwapError::CalldataGenerationFailed(_) => "CALLDATA_GENERATION_FAILED",
            SwapError::RealSwapFailed(_) => "REAL_SWAP_FAILED",
            SwapError::ExecutionError(_) => "EXECUTION_ERROR",
        }
    }

    /// JSON payload carried on the `error` progress state.
    pub fn to_payload(&self) -> serde_json::Value {
        json!({
            "message": self.to_string(),
            "code": self.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(SwapError::WalletNotFound.code(), "WALLET_NOT_FOUND");
        assert_eq!(SwapError::NoMatchingOrders.code(), "NO_MATCHING_ORDERS");
        assert_eq!(
            SwapError::RealSwapFailed("user rejected".into()).code(),
            "REAL_SWAP_FAILED"
        );
    }

    #[test]
    fn payload_carries_message_and_code() {
        let payload = SwapError::QuoteError("subgraph down".into()).to_payload();
        assert_eq!(payload["code"], "QUOTE_ERROR");
        assert!(payload["message"]
            .as_str()
            .unwrap()
            .contains("subgraph down"));
    }
}
