/// Pricing is isolated behind a strategy trait so the placeholder
/// fixed-ratio model can be replaced with a genuine on-chain quote call
/// without touching orchestration logic.
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceEstimate {
    /// Estimated output in human units.
    pub output: f64,
    /// e.g. "0.1%"
    pub price_impact: String,
    /// e.g. "0.3%"
    pub fee: String,
}

#[async_trait]
pub trait PricingStrategy: Send + Sync {
    async fn estimate(&self, amount_in: f64) -> PriceEstimate;
}

/// Placeholder pricing model: output is a fixed ratio of input. Does not
/// consult the order's actual io ratio or any on-chain pricing function.
pub struct FixedRatioPricing {
    pub ratio: f64,
    pub price_impact: String,
    pub fee: String,
}

impl Default for FixedRatioPricing {
    fn default() -> Self {
        Self {
            ratio: 0.95,
            price_impact: "0.1%".to_string(),
            fee: "0.3%".to_string(),
        }
    }
}

#[async_trait]
impl PricingStrategy for FixedRatioPricing {
    async fn estimate(&self, amount_in: f64) -> PriceEstimate {
        PriceEstimate {
            output: amount_in * self.ratio,
            price_impact: self.price_impact.clone(),
            fee: self.fee.clone(),
        }
    }
}
