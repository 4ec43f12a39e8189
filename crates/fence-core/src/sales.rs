//! 銷售價格模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cost::{CostUnit, Currency};

/// 銷售等級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalesTier {
    Bronze,
    Silver,
    Gold,
}

impl SalesTier {
    pub const ALL: [SalesTier; 3] = [SalesTier::Bronze, SalesTier::Silver, SalesTier::Gold];
}

/// 各等級加成百分比
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierMargins {
    pub bronze: Decimal,
    pub silver: Decimal,
    pub gold: Decimal,
}

impl TierMargins {
    pub fn new(bronze: Decimal, silver: Decimal, gold: Decimal) -> Self {
        Self { bronze, silver, gold }
    }

    pub fn margin(&self, tier: SalesTier) -> Decimal {
        match tier {
            SalesTier::Bronze => self.bronze,
            SalesTier::Silver => self.silver,
            SalesTier::Gold => self.gold,
        }
    }
}

impl Default for TierMargins {
    /// 10% / 20% / 30%
    fn default() -> Self {
        Self::new(Decimal::from(10), Decimal::from(20), Decimal::from(30))
    }
}

/// 銷售價格結果（以塗裝成本為基礎）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPriceResult {
    /// 規格代碼
    pub spec_code: String,

    pub unit: CostUnit,

    pub currency: Currency,

    /// 塗裝成本
    pub painted_cost: Decimal,

    /// 使用的加成百分比
    pub margins: TierMargins,

    pub bronze: Decimal,
    pub silver: Decimal,
    pub gold: Decimal,
}

impl SalesPriceResult {
    pub fn price(&self, tier: SalesTier) -> Decimal {
        match tier {
            SalesTier::Bronze => self.bronze,
            SalesTier::Silver => self.silver,
            SalesTier::Gold => self.gold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_margins() {
        let margins = TierMargins::default();
        assert_eq!(margins.margin(SalesTier::Bronze), Decimal::from(10));
        assert_eq!(margins.margin(SalesTier::Silver), Decimal::from(20));
        assert_eq!(margins.margin(SalesTier::Gold), Decimal::from(30));
    }
}
