use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PriceChange;

/// One asset line of a consolidated report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    pub symbol: String,
    pub price: f64,
    pub change: PriceChange,
}

/// Everything a user receives in a single tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceReport {
    pub user_id: i64,
    pub date: NaiveDate,
    pub lines: Vec<ReportLine>,
}

impl PriceReport {
    pub fn new(user_id: i64, date: NaiveDate) -> Self {
        Self {
            user_id,
            date,
            lines: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
