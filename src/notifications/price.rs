/// Price lookup used only for display amounts
use async_trait::async_trait;

#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// USD price of one SOL
    async fn native_usd_price(&self) -> Result<f64, String>;
}

/// Oracle answering with a configured constant; 0 means no price
pub struct FixedPriceOracle {
    usd: f64,
}

impl FixedPriceOracle {
    pub fn new(usd: f64) -> Self {
        Self { usd }
    }
}

#[async_trait]
impl PriceOracle for FixedPriceOracle {
    async fn native_usd_price(&self) -> Result<f64, String> {
        if self.usd.is_finite() && self.usd > 0.0 {
            Ok(self.usd)
        } else {
            Err("no SOL price configured".to_string())
        }
    }
}
