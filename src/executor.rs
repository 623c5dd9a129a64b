/// Swap execution: turns a [`Quote`] into a takeOrders transaction against
/// the orderbook contract.
use crate::config::Config;
use crate::errors::SwapError;
use crate::logger::{self, LogTag};
use crate::orderbook::{OrderbookApi, TakeOrder, TakeOrdersConfig};
use crate::quote::Quote;
use crate::wallet::WalletManager;
use std::sync::Arc;

// Effectively no ratio cap (1e18 in the contract's fixed-point encoding).
const MAX_IO_RATIO: &str = "1000000000000000000";

pub struct SwapExecutor {
    wallet: Arc<WalletManager>,
    client: Arc<dyn OrderbookApi>,
    orderbook_address: String,
}

impl SwapExecutor {
    pub fn new(wallet: Arc<WalletManager>, client: Arc<dyn OrderbookApi>, config: &Config) -> Self {
        Self {
            wallet,
            client,
            orderbook_address: config.orderbook_address.clone(),
        }
    }

    /// Executes the swap pinned in `quote` and returns the transaction hash
    /// once the wallet accepts the submission. The quote's full input amount
    /// is offered; partial fills below it are acceptable to the contract.
    pub async fn execute(&self, quote: &Quote) -> Result<String, SwapError> {
        self.wallet.require_address().await?;

        let order_bytes_present = quote
            .order
            .order_bytes
            .as_ref()
            .map(|b| !b.is_empty())
            .unwrap_or(false);
        if quote.order.id.is_empty() || !order_bytes_present {
            return Err(SwapError::NoValidOrder);
        }

        let take_config = TakeOrdersConfig {
            minimum_input: "1".to_string(),
            maximum_input: quote.amount_in.clone(),
            maximum_io_ratio: MAX_IO_RATIO.to_string(),
            orders: vec![TakeOrder {
                order: quote.order.clone(),
                input_io_index: quote.input_io_index,
                output_io_index: quote.output_io_index,
                signed_context: quote.signed_context.clone(),
            }],
            data: "0x".to_string(),
        };

        logger::info(
            LogTag::Swap,
            &format!(
                "Executing swap via order {} (max input {})",
                quote.order.id, quote.amount_in
            ),
        );

        let calldata = self
            .client
            .take_orders_calldata(&take_config)
            .await
            .map_err(|e| SwapError::CalldataGenerationFailed(e.readable_msg))?;

        let tx_hash = self
            .wallet
            .send_transaction(&self.orderbook_address, &calldata, "0x0")
            .await
            .map_err(|e| SwapError::RealSwapFailed(e.message))?;

        logger::info(LogTag::Swap, &format!("Swap submitted: {}", tx_hash));

        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainDescriptor;
    use crate::orderbook::OrderbookOrder;
    use crate::quote::MatchConfidence;
    use crate::testutil::{order, MockOrderbook, MockProvider};

    const USDC: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";
    const WETH: &str = "0x4200000000000000000000000000000000000006";

    fn quote_for(order: OrderbookOrder) -> Quote {
        Quote {
            token_in: USDC.to_string(),
            token_out: WETH.to_string(),
            amount_in: "10000000".to_string(),
            estimated_output: "9.500000".to_string(),
            price_impact: "0.1%".to_string(),
            fee: "0.3%".to_string(),
            order,
            input_io_index: 0,
            output_io_index: 0,
            signed_context: vec![],
            match_confidence: MatchConfidence::Verified,
        }
    }

    async fn connected_wallet(provider: Arc<MockProvider>) -> Arc<WalletManager> {
        let manager = Arc::new(WalletManager::new(provider, ChainDescriptor::base()));
        manager.connect().await.unwrap();
        manager
    }

    fn executor(
        wallet: Arc<WalletManager>,
        client: Arc<MockOrderbook>,
    ) -> SwapExecutor {
        SwapExecutor::new(wallet, client, &Config::default())
    }

    fn owner_provider() -> MockProvider {
        MockProvider::new()
            .with_accounts(&["0x1111111111111111111111111111111111111111"])
            .with_chain("0x2105")
    }

    #[tokio::test]
    async fn executes_swap_against_orderbook_contract() {
        let provider = Arc::new(owner_provider());
        let wallet = connected_wallet(Arc::clone(&provider)).await;
        let client = Arc::new(MockOrderbook::new());

        let quote = quote_for(order("0xA", true, &[USDC], &[WETH]));
        let tx_hash = executor(wallet, Arc::clone(&client)).execute(&quote).await.unwrap();
        assert!(tx_hash.starts_with("0x"));

        let (_, params) = provider.last_call("eth_sendTransaction").unwrap();
        assert_eq!(params[0]["to"], Config::default().orderbook_address);
        assert_eq!(params[0]["data"], "0xc0de");
        assert_eq!(params[0]["value"], "0x0");
    }

    #[tokio::test]
    async fn take_orders_config_offers_full_quote_amount() {
        let provider = Arc::new(owner_provider());
        let wallet = connected_wallet(provider).await;
        let client = Arc::new(MockOrderbook::new());

        let quote = quote_for(order("0xA", true, &[USDC], &[WETH]));
        executor(wallet, Arc::clone(&client)).execute(&quote).await.unwrap();

        let config = client.last_take_config().unwrap();
        assert_eq!(config.minimum_input, "1");
        assert_eq!(config.maximum_input, "10000000");
        assert_eq!(config.maximum_io_ratio, MAX_IO_RATIO);
        assert_eq!(config.orders.len(), 1);
        assert_eq!(config.orders[0].order.id, "0xA");
        assert_eq!(config.data, "0x");
    }

    #[tokio::test]
    async fn order_without_bytes_is_rejected_before_any_call() {
        let provider = Arc::new(owner_provider());
        let wallet = connected_wallet(provider).await;
        let client = Arc::new(MockOrderbook::new());

        let mut bare = order("0xA", true, &[USDC], &[WETH]);
        bare.order_bytes = None;

        let err = executor(wallet, Arc::clone(&client))
            .execute(&quote_for(bare))
            .await
            .unwrap_err();
        assert_eq!(err, SwapError::NoValidOrder);
        assert_eq!(client.calldata_calls(), 0);
    }

    #[tokio::test]
    async fn order_with_empty_id_is_rejected() {
        let provider = Arc::new(owner_provider());
        let wallet = connected_wallet(provider).await;
        let client = Arc::new(MockOrderbook::new());

        let err = executor(wallet, client)
            .execute(&quote_for(order("", true, &[USDC], &[WETH])))
            .await
            .unwrap_err();
        assert_eq!(err, SwapError::NoValidOrder);
    }

    #[tokio::test]
    async fn calldata_failure_maps_to_generation_error() {
        let provider = Arc::new(owner_provider());
        let wallet = connected_wallet(provider).await;
        let client = Arc::new(MockOrderbook::new().fail_calldata("Vault balance too low"));

        let err = executor(wallet, client)
            .execute(&quote_for(order("0xA", true, &[USDC], &[WETH])))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            SwapError::CalldataGenerationFailed("Vault balance too low".to_string())
        );
    }

    #[tokio::test]
    async fn wallet_rejection_maps_to_swap_failure() {
        let provider = Arc::new(owner_provider());
        provider.script_error(
            "eth_sendTransaction",
            crate::wallet::ProviderError::new(4001, "User rejected the request"),
        );
        let wallet = connected_wallet(Arc::clone(&provider)).await;
        let client = Arc::new(MockOrderbook::new());

        let err = executor(wallet, client)
            .execute(&quote_for(order("0xA", true, &[USDC], &[WETH])))
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::RealSwapFailed(_)));
    }

    #[tokio::test]
    async fn disconnected_wallet_cannot_execute() {
        let provider = Arc::new(MockProvider::new().with_chain("0x2105"));
        let wallet = Arc::new(WalletManager::new(provider, ChainDescriptor::base()));
        let client = Arc::new(MockOrderbook::new());

        let err = executor(wallet, client)
            .execute(&quote_for(order("0xA", true, &[USDC], &[WETH])))
            .await
            .unwrap_err();
        assert_eq!(err, SwapError::SignerUnavailable);
    }
}
