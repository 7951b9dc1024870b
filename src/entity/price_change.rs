use serde::{Deserialize, Serialize};

/// Direction of a price move since the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Increase,
    Decrease,
    Unchanged,
}

impl Direction {
    pub fn indicator(&self) -> &'static str {
        match self {
            Direction::Increase => "🟢 ⬆️",
            Direction::Decrease => "🔴 ⬇️",
            Direction::Unchanged => "⚪️",
        }
    }
}

/// Percentage change between a baseline price and a fresh quote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub percent: f64,
    pub direction: Direction,
}

impl PriceChange {
    /// A zero baseline yields 0% instead of an infinite change
    pub fn between(last_price: f64, new_price: f64) -> Self {
        let percent = if last_price == 0.0 {
            0.0
        } else {
            (new_price - last_price) / last_price * 100.0
        };

        let direction = if percent > 0.0 {
            Direction::Increase
        } else if percent < 0.0 {
            Direction::Decrease
        } else {
            Direction::Unchanged
        };

        Self { percent, direction }
    }

    /// Signed percentage with two decimals, e.g. "+10.00%"
    pub fn format_percent(&self) -> String {
        format!("{:+.2}%", self.percent)
    }
}
