/// ERC-20 allowance checking and approval against the orderbook contract.
use crate::errors::SwapError;
use crate::logger::{self, LogTag};
use crate::wallet::WalletManager;
use alloy_primitives::{Address, U256};
use std::str::FromStr;
use std::sync::Arc;

// Function selectors: allowance(address,address) and approve(address,uint256).
const ALLOWANCE_SELECTOR: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];
const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];

pub struct AllowanceManager {
    wallet: Arc<WalletManager>,
}

impl AllowanceManager {
    pub fn new(wallet: Arc<WalletManager>) -> Self {
        Self { wallet }
    }

    /// Whether the current on-chain allowance for `spender` is below
    /// `amount_raw` (decimal string of raw units), i.e. whether an approval
    /// transaction is needed before the swap.
    pub async fn check_allowance(
        &self,
        token: &str,
        spender: &str,
        amount_raw: &str,
    ) -> Result<bool, SwapError> {
        let owner = self.wallet.require_address().await?;

        let owner = parse_address(&owner)?;
        let spender = parse_address(spender)?;
        let amount = U256::from_str_radix(amount_raw, 10)
            .map_err(|_| SwapError::ApprovalError(format!("Invalid amount: {}", amount_raw)))?;

        let data = encode_allowance_call(owner, spender);
        let result = self
            .wallet
            .call(token, &data)
            .await
            .map_err(|e| SwapError::ApprovalError(format!("Allowance check failed: {}", e)))?;

        let allowance = parse_hex_word(&result);
        let needs_approval = allowance < amount;

        logger::debug(
            LogTag::Approval,
            &format!(
                "Allowance for {} on {}: {} (required {}, approval needed: {})",
                token, spender, allowance, amount, needs_approval
            ),
        );

        Ok(needs_approval)
    }

    /// Submits an approval for `amount_raw` raw units, or an unlimited
    /// allowance when `None`. Returns the transaction hash once the
    /// provider accepts the submission; does not wait for confirmation.
    pub async fn approve(
        &self,
        token: &str,
        spender: &str,
        amount_raw: Option<&str>,
    ) -> Result<String, SwapError> {
        self.wallet.require_address().await?;

        let spender = parse_address(spender)?;
        let amount = match amount_raw {
            Some(raw) => U256::from_str_radix(raw, 10)
                .map_err(|_| SwapError::ApprovalError(format!("Invalid amount: {}", raw)))?,
            None => U256::MAX,
        };

        logger::info(
            LogTag::Approval,
            &format!("Approving {} to spend {} of {}", spender, amount, token),
        );

        let data = encode_approve_call(spender, amount);
        let tx_hash = self
            .wallet
            .send_transaction(token, &data, "0x0")
            .await
            .map_err(|e| SwapError::ApprovalError(e.message))?;

        logger::info(
            LogTag::Approval,
            &format!("Approval submitted: {}", tx_hash),
        );

        Ok(tx_hash)
    }
}

fn parse_address(address: &str) -> Result<Address, SwapError> {
    Address::from_str(address)
        .map_err(|_| SwapError::ApprovalError(format!("Invalid address: {}", address)))
}

fn pad_address(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}

fn encode_allowance_call(owner: Address, spender: Address) -> String {
    let mut data = Vec::with_capacity(4 + 64);
    data.extend_from_slice(&ALLOWANCE_SELECTOR);
    data.extend_from_slice(&pad_address(owner));
    data.extend_from_slice(&pad_address(spender));
    format!("0x{}", hex::encode(data))
}

fn encode_approve_call(spender: Address, amount: U256) -> String {
    let mut data = Vec::with_capacity(4 + 64);
    data.extend_from_slice(&APPROVE_SELECTOR);
    data.extend_from_slice(&pad_address(spender));
    data.extend_from_slice(&amount.to_be_bytes::<32>());
    format!("0x{}", hex::encode(data))
}

/// Parses a 32-byte hex return value; anything unparseable reads as zero,
/// matching how an empty eth_call result is treated.
fn parse_hex_word(result: &str) -> U256 {
    let trimmed = result.trim_start_matches("0x");
    if trimmed.is_empty() {
        return U256::ZERO;
    }
    U256::from_str_radix(trimmed, 16).unwrap_or(U256::ZERO)
}
