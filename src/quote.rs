/// Swap quote provider: sources a priced quote for a token pair from the
/// live order list.
use crate::errors::SwapError;
use crate::logger::{self, LogTag};
use crate::orderbook::{OrderbookApi, OrderbookOrder};
use crate::pricing::PricingStrategy;
use crate::tokens;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Result of inspecting one order against the requested token pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderMatch {
    Matching,
    NonMatching,
    /// The order's io sets could not be inspected. Treated as a candidate
    /// (best-effort matching) but surfaced to the caller instead of being
    /// silently coerced to a verified match.
    Unknown,
}

/// Confidence the selected order actually trades the requested pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    Verified,
    Unknown,
}

/// A priced proposal to exchange `amount_in` of one token for an estimated
/// output of another, pinned to a specific backend order. Never mutated;
/// any later quote request supersedes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub token_in: String,
    pub token_out: String,
    /// Raw integer amount (human amount x 10^decimals).
    pub amount_in: String,
    /// Estimated output in human units.
    pub estimated_output: String,
    pub price_impact: String,
    pub fee: String,
    pub order: OrderbookOrder,
    pub input_io_index: u32,
    pub output_io_index: u32,
    pub signed_context: Vec<Value>,
    pub match_confidence: MatchConfidence,
}

/// Classifies an order for the requested pair. Token addresses compare
/// case-insensitively. Inactive orders never match.
pub fn classify_order(order: &OrderbookOrder, token_in: &str, token_out: &str) -> OrderMatch {
    if !order.active {
        return OrderMatch::NonMatching;
    }

    let (inputs, outputs) = match (&order.valid_inputs, &order.valid_outputs) {
        (Some(inputs), Some(outputs)) => (inputs, outputs),
        _ => return OrderMatch::Unknown,
    };

    let has_input = inputs
        .iter()
        .any(|io| io.token.eq_ignore_ascii_case(token_in));
    let has_output = outputs
        .iter()
        .any(|io| io.token.eq_ignore_ascii_case(token_out));

    if has_input && has_output {
        OrderMatch::Matching
    } else {
        OrderMatch::NonMatching
    }
}

pub struct QuoteProvider {
    client: Arc<dyn OrderbookApi>,
    pricing: Arc<dyn PricingStrategy>,
}

impl QuoteProvider {
    pub fn new(client: Arc<dyn OrderbookApi>, pricing: Arc<dyn PricingStrategy>) -> Self {
        Self { client, pricing }
    }

    /// Produces a quote for swapping `amount_in_human` of `token_in` into
    /// `token_out`.
    ///
    /// The first candidate order in list order is selected; candidates are
    /// not ranked by effective price. Failure cases: `ClientNotReady`,
    /// `NetworkError` (order list transport), `NoMatchingOrders` (empty
    /// candidate set), `QuoteError` (anything else).
    pub async fn get_quote(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in_human: &str,
        input_decimals: u8,
    ) -> Result<Quote, SwapError> {
        if !self.client.is_ready() {
            return Err(SwapError::ClientNotReady);
        }

        let amount_raw = tokens::parse_units(amount_in_human, input_decimals)
            .ok_or_else(|| SwapError::QuoteError(format!("Invalid amount: {}", amount_in_human)))?;
        let amount_f: f64 = amount_in_human
            .parse()
            .map_err(|_| SwapError::QuoteError(format!("Invalid amount: {}", amount_in_human)))?;

        logger::info(
            LogTag::Quote,
            &format!(
                "Getting quote: {} -> {} (amount {})",
                token_in, token_out, amount_raw
            ),
        );

        let orders = self
            .client
            .list_orders()
            .await
            .map_err(|e| SwapError::NetworkError(e.readable_msg))?;

        logger::debug(LogTag::Quote, &format!("Found {} orders", orders.len()));

        // First candidate in list order wins; candidates include orders
        // whose shape could not be inspected (best-effort matching).
        let selected = orders.iter().find_map(|order| {
            match classify_order(order, token_in, token_out) {
                OrderMatch::Matching => Some((order, MatchConfidence::Verified)),
                OrderMatch::Unknown => Some((order, MatchConfidence::Unknown)),
                OrderMatch::NonMatching => None,
            }
        });

        let (order, match_confidence) = selected.ok_or(SwapError::NoMatchingOrders)?;

        let estimate = self.pricing.estimate(amount_f).await;

        let quote = Quote {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            amount_in: amount_raw.to_string(),
            estimated_output: format!("{:.6}", estimate.output),
            price_impact: estimate.price_impact,
            fee: estimate.fee,
            order: order.clone(),
            // Default slot indices; a ranked selector would derive these
            // from the matched io entries.
            input_io_index: 0,
            output_io_index: 0,
            signed_context: vec![],
            match_confidence,
        };

        logger::info(
            LogTag::Quote,
            &format!(
                "Quote via order {}: {} in -> ~{} out",
                quote.order.id, quote.amount_in, quote.estimated_output
            ),
        );

        Ok(quote)
    }
}
