//! Wallet connection management: abstracts a browser-injected EIP-1193
//! provider (Phantom's Ethereum provider in the reference deployment)
//! behind injectable capabilities so alternate wallet backends can be
//! substituted without simulating global browser state.

pub mod manager;
pub mod provider;
pub mod state;

pub use manager::WalletManager;
pub use provider::{
    ProviderError, ProviderEvent, WalletProvider, WalletProviderLocator, ERR_UNRECOGNIZED_CHAIN,
};
pub use state::WalletState;
