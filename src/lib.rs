//! Swap orchestration core for the Raindex orderbook on Base.
//!
//! The crate drives browser-wallet-backed token swaps end to end: wallet
//! connection and network switching, quote sourcing from the open order
//! list, ERC-20 allowance management, and takeOrders execution, all
//! coordinated by a progress-reporting state machine.
//!
//! Entry points:
//! - [`wallet::WalletManager`] for the wallet connection lifecycle
//! - [`orchestrator::SwapOrchestrator`] for running swap attempts
//! - [`orderbook::RaindexClient`] for the live orderbook backend

pub mod approval;
pub mod config;
pub mod errors;
pub mod executor;
pub mod logger;
pub mod orchestrator;
pub mod orderbook;
pub mod pricing;
pub mod quote;
pub mod tokens;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::{ChainDescriptor, Config};
pub use errors::{SwapError, SwapResult};
pub use orchestrator::{
    AccountRecorder, NoopSink, ProgressSink, SwapOrchestrator, SwapProgress, SwapStep,
    TransactionRecord,
};
pub use quote::{MatchConfidence, Quote};
pub use tokens::Token;
pub use wallet::WalletManager;
