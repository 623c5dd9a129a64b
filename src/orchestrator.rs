/// Swap orchestration state machine.
///
/// Drives one swap attempt at a time through quote, allowance, approval and
/// execution, reporting each transition to a [`ProgressSink`]. Wallet state
/// is re-validated before every phase: the provider can change accounts or
/// chains at any moment, and a stale attempt must fail rather than submit
/// from the wrong account.
use crate::approval::AllowanceManager;
use crate::config::Config;
use crate::errors::SwapError;
use crate::executor::SwapExecutor;
use crate::logger::{self, LogTag};
use crate::orderbook::OrderbookApi;
use crate::pricing::PricingStrategy;
use crate::quote::{Quote, QuoteProvider};
use crate::tokens::Token;
use crate::wallet::WalletManager;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Phases of a swap attempt, in the order they occur. `Error` is a parallel
/// terminal state any phase can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStep {
    Idle,
    GettingQuote,
    QuoteReceived,
    CheckingAllowance,
    ApprovingToken,
    TokenApproved,
    ExecutingSwap,
    SwapCompleted,
    Error,
}

impl SwapStep {
    /// User-facing status line for this phase.
    pub fn message(&self) -> &'static str {
        match self {
            SwapStep::Idle => "Ready to swap",
            SwapStep::GettingQuote => "Getting best price...",
            SwapStep::QuoteReceived => "Quote received",
            SwapStep::CheckingAllowance => "Checking token allowance...",
            SwapStep::ApprovingToken => "Approving token spend...",
            SwapStep::TokenApproved => "Token approved",
            SwapStep::ExecutingSwap => "Executing swap...",
            SwapStep::SwapCompleted => "Swap completed!",
            SwapStep::Error => "Swap failed",
        }
    }
}

/// Current phase with its user-facing message and an optional structured
/// detail payload: the quote for `QuoteReceived`, transaction hashes for
/// approvals and completion, and the error payload for `Error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapProgress {
    pub step: SwapStep,
    pub message: &'static str,
    pub detail: Option<Value>,
}

impl SwapProgress {
    pub fn new(step: SwapStep, detail: Option<Value>) -> Self {
        Self {
            step,
            message: step.message(),
            detail,
        }
    }
}

impl Default for SwapProgress {
    fn default() -> Self {
        Self::new(SwapStep::Idle, None)
    }
}

/// Receives every progress transition of a swap attempt, synchronously and
/// in order.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, progress: &SwapProgress);
}

/// Sink for callers that do not track progress.
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn on_progress(&self, _progress: &SwapProgress) {}
}

/// A completed swap as reported to the accounting backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub wallet_address: String,
    pub tx_type: String,
    pub token: String,
    pub amount: f64,
    pub amount_usd: f64,
    pub payment_reference: String,
    pub status: String,
    pub tx_hash: String,
    pub timestamp: DateTime<Utc>,
}

/// Accounting backend for completed swaps. Recording is best-effort: a
/// failure here never fails the swap itself.
#[async_trait]
pub trait AccountRecorder: Send + Sync {
    async fn record(&self, record: &TransactionRecord) -> anyhow::Result<()>;
}

#[derive(Default)]
struct AttemptState {
    quote: Option<Quote>,
    progress: SwapProgress,
}

pub struct SwapOrchestrator {
    wallet: Arc<WalletManager>,
    quotes: QuoteProvider,
    allowance: AllowanceManager,
    executor: SwapExecutor,
    recorder: Option<Arc<dyn AccountRecorder>>,
    orderbook_address: String,
    completion_reset_secs: u64,
    state: Arc<RwLock<AttemptState>>,
    reset_task: StdMutex<Option<JoinHandle<()>>>,
}

impl SwapOrchestrator {
    pub fn new(
        wallet: Arc<WalletManager>,
        client: Arc<dyn OrderbookApi>,
        pricing: Arc<dyn PricingStrategy>,
        config: &Config,
        recorder: Option<Arc<dyn AccountRecorder>>,
    ) -> Self {
        Self {
            quotes: QuoteProvider::new(Arc::clone(&client), pricing),
            allowance: AllowanceManager::new(Arc::clone(&wallet)),
            executor: SwapExecutor::new(Arc::clone(&wallet), client, config),
            wallet,
            recorder,
            orderbook_address: config.orderbook_address.clone(),
            completion_reset_secs: config.completion_reset_secs,
            state: Arc::new(RwLock::new(AttemptState::default())),
            reset_task: StdMutex::new(None),
        }
    }

    /// Current progress. A disconnected wallet invalidates any attempt
    /// state, so this reads as idle after a disconnect.
    pub async fn progress(&self) -> SwapProgress {
        self.sync_with_wallet().await;
        self.state.read().await.progress.clone()
    }

    /// Quote of the current attempt, if one is held.
    pub async fn current_quote(&self) -> Option<Quote> {
        self.sync_with_wallet().await;
        self.state.read().await.quote.clone()
    }

    /// Runs one full swap attempt and returns the swap transaction hash.
    ///
    /// Starting a new attempt supersedes any previous one: the held quote is
    /// dropped, progress restarts, and a pending completion reset is
    /// cancelled.
    pub async fn perform_swap(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount: &str,
        sink: &dyn ProgressSink,
    ) -> Result<String, SwapError> {
        self.cancel_pending_reset();
        {
            let mut state = self.state.write().await;
            state.quote = None;
            state.progress = SwapProgress::default();
        }

        if let Err(e) = self.ensure_wallet_ready().await {
            return Err(self.fail(sink, e).await);
        }

        logger::info(
            LogTag::Swap,
            &format!(
                "Starting swap: {} {} -> {}",
                amount, token_in.symbol, token_out.symbol
            ),
        );

        self.set_progress(sink, SwapStep::GettingQuote, None).await;
        let quote = match self
            .quotes
            .get_quote(
                &token_in.address,
                &token_out.address,
                amount,
                token_in.decimals,
            )
            .await
        {
            Ok(quote) => quote,
            Err(e) => return Err(self.fail(sink, e).await),
        };

        self.state.write().await.quote = Some(quote.clone());
        let quote_payload = serde_json::to_value(&quote).ok();
        self.set_progress(sink, SwapStep::QuoteReceived, quote_payload)
            .await;

        if let Err(e) = self.ensure_wallet_ready().await {
            return Err(self.fail(sink, e).await);
        }

        self.set_progress(sink, SwapStep::CheckingAllowance, None)
            .await;
        let needs_approval = match self
            .allowance
            .check_allowance(&token_in.address, &self.orderbook_address, &quote.amount_in)
            .await
        {
            Ok(needs) => needs,
            Err(e) => return Err(self.fail(sink, e).await),
        };

        if needs_approval {
            if let Err(e) = self.ensure_wallet_ready().await {
                return Err(self.fail(sink, e).await);
            }

            self.set_progress(sink, SwapStep::ApprovingToken, None).await;
            // Approval covers exactly this attempt's input amount.
            let approval_tx = match self
                .allowance
                .approve(
                    &token_in.address,
                    &self.orderbook_address,
                    Some(&quote.amount_in),
                )
                .await
            {
                Ok(tx) => tx,
                Err(e) => return Err(self.fail(sink, e).await),
            };
            self.set_progress(
                sink,
                SwapStep::TokenApproved,
                Some(json!({ "txHash": approval_tx })),
            )
            .await;
        }

        if let Err(e) = self.ensure_wallet_ready().await {
            return Err(self.fail(sink, e).await);
        }

        self.set_progress(sink, SwapStep::ExecutingSwap, None).await;
        let tx_hash = match self.executor.execute(&quote).await {
            Ok(tx) => tx,
            Err(e) => return Err(self.fail(sink, e).await),
        };

        self.set_progress(
            sink,
            SwapStep::SwapCompleted,
            Some(json!({ "txHash": tx_hash.clone() })),
        )
        .await;

        self.record_completion(token_in, amount, &tx_hash).await;
        self.schedule_reset();

        Ok(tx_hash)
    }

    /// The wallet can lose its account or leave the target chain between
    /// phases; each phase starts by re-checking both.
    async fn ensure_wallet_ready(&self) -> Result<(), SwapError> {
        self.wallet.require_address().await?;
        if !self.wallet.is_on_target_chain().await {
            return Err(SwapError::NetworkSwitchFailed(
                "wallet left the target chain".to_string(),
            ));
        }
        Ok(())
    }

    async fn set_progress(&self, sink: &dyn ProgressSink, step: SwapStep, detail: Option<Value>) {
        let progress = SwapProgress::new(step, detail);
        self.state.write().await.progress = progress.clone();
        sink.on_progress(&progress);
    }

    async fn fail(&self, sink: &dyn ProgressSink, err: SwapError) -> SwapError {
        logger::error(LogTag::Swap, &format!("Swap failed: {}", err));
        self.set_progress(sink, SwapStep::Error, Some(err.to_payload()))
            .await;
        err
    }

    /// Reports the completed swap to the accounting backend, at most once
    /// per attempt. Failures are logged and swallowed.
    async fn record_completion(&self, token_in: &Token, amount: &str, tx_hash: &str) {
        let recorder = match &self.recorder {
            Some(recorder) => recorder,
            None => return,
        };

        let wallet_address = self.wallet.address().await.unwrap_or_default();
        let amount: f64 = amount.parse().unwrap_or(0.0);
        let record = TransactionRecord {
            wallet_address,
            tx_type: "swap".to_string(),
            token: token_in.symbol.clone(),
            amount,
            // USD value is only known directly for stablecoin inputs.
            amount_usd: if token_in.is_stablecoin { amount } else { 0.0 },
            payment_reference: format!("base_swap_{}", uuid::Uuid::new_v4()),
            status: "success".to_string(),
            tx_hash: tx_hash.to_string(),
            timestamp: Utc::now(),
        };

        if let Err(e) = recorder.record(&record).await {
            logger::warning(
                LogTag::Swap,
                &format!("Failed to record completed swap: {}", e),
            );
        }
    }

    /// Returns the attempt to idle after the completion display window.
    fn schedule_reset(&self) {
        let state = Arc::clone(&self.state);
        let delay = Duration::from_secs(self.completion_reset_secs);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.write().await;
            state.quote = None;
            state.progress = SwapProgress::default();
        });

        if let Ok(mut guard) = self.reset_task.lock() {
            if let Some(old) = guard.replace(task) {
                old.abort();
            }
        }
    }

    fn cancel_pending_reset(&self) {
        if let Ok(mut guard) = self.reset_task.lock() {
            if let Some(task) = guard.take() {
                task.abort();
            }
        }
    }

    async fn sync_with_wallet(&self) {
        if self.wallet.state().await.connected {
            return;
        }
        let mut state = self.state.write().await;
        if state.quote.is_some() || state.progress != SwapProgress::default() {
            state.quote = None;
            state.progress = SwapProgress::default();
        }
    }
}

impl Drop for SwapOrchestrator {
    fn drop(&mut self) {
        self.cancel_pending_reset();
    }
}
