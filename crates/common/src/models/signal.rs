use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    /// Close crossed above the EMA on the latest bar.
    StrongBuy,
    /// Close crossed below the EMA on the latest bar.
    StrongSell,
    /// Close between the band center and the upper band.
    WeakBuy,
    /// Close between the lower band and the band center.
    WeakSell,
    Neutral,
    NoData,
}

impl Signal {
    pub fn description(&self) -> &'static str {
        match self {
            Self::StrongBuy => "📈 BUY (UP) — Price crossed above EMA50",
            Self::StrongSell => "📉 SELL (DOWN) — Price crossed below EMA50",
            Self::WeakBuy => "📈 Weak BUY (Near upper band)",
            Self::WeakSell => "📉 Weak SELL (Near lower band)",
            Self::Neutral => "⚠️ No clear signal",
            Self::NoData => "⚠️ No data available",
        }
    }

    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::Neutral | Self::NoData)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
