//! 幣別換算與銷售加成
//!
//! 加成只套用在塗裝成本上：等級價 = 塗裝成本 × (1 + 加成 / 100)。
//! 此階段不做任何進位，格式化由呼叫端處理。

use fence_core::numeric::{checked_add, checked_mul};
use fence_core::{
    CostBasis, CostResult, CostUnit, Currency, CurrencyAmount, ExchangeRates, Result,
    SalesPriceResult, SalesTier, TierMargins,
};
use rust_decimal::Decimal;

/// 價格計算器
pub struct PriceCalculator;

impl PriceCalculator {
    /// 美元換算三幣別
    pub fn convert(usd: Decimal, rates: &ExchangeRates) -> Result<CurrencyAmount> {
        CurrencyAmount::from_usd(usd, rates)
    }

    /// 套用加成百分比
    pub fn apply_margin(cost: Decimal, margin_percent: Decimal) -> Result<Decimal> {
        let factor = checked_add(
            Decimal::ONE,
            margin_percent / Decimal::ONE_HUNDRED,
            "margin",
        )?;
        checked_mul(cost, factor, "margin")
    }

    /// 指定單位與幣別的銷售價格
    pub fn sales_price(
        result: &CostResult,
        unit: CostUnit,
        currency: Currency,
        margins: &TierMargins,
    ) -> Result<SalesPriceResult> {
        let painted_cost = result.value(CostBasis::Painted, unit, currency);

        Ok(SalesPriceResult {
            spec_code: result.spec_code.clone(),
            unit,
            currency,
            painted_cost,
            margins: *margins,
            bronze: Self::apply_margin(painted_cost, margins.margin(SalesTier::Bronze))?,
            silver: Self::apply_margin(painted_cost, margins.margin(SalesTier::Silver))?,
            gold: Self::apply_margin(painted_cost, margins.margin(SalesTier::Gold))?,
        })
    }

    /// 展開所有單位 × 幣別的價格表
    pub fn price_sheet(
        result: &CostResult,
        margins: &TierMargins,
    ) -> Result<Vec<SalesPriceResult>> {
        CostUnit::ALL
            .into_iter()
            .flat_map(|unit| Currency::ALL.into_iter().map(move |currency| (unit, currency)))
            .map(|(unit, currency)| Self::sales_price(result, unit, currency, margins))
            .collect()
    }

    /// 批次計算銷售價格
    pub fn sales_prices<'a>(
        results: impl IntoIterator<Item = &'a CostResult>,
        unit: CostUnit,
        currency: Currency,
        margins: &TierMargins,
    ) -> Result<Vec<SalesPriceResult>> {
        results
            .into_iter()
            .map(|result| Self::sales_price(result, unit, currency, margins))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fence_core::{CostBreakdown, CostMatrix, ItemKind};
    use proptest::prelude::*;

    fn rates() -> ExchangeRates {
        ExchangeRates::new(Decimal::from(30), Decimal::new(108, 2))
    }

    fn result_with_painted_piece(painted: Decimal) -> CostResult {
        let mut usd = [[Decimal::ZERO; 3]; 4];
        usd[1][0] = painted;
        usd[1][1] = painted / Decimal::from(2);

        CostResult {
            spec_code: "TEST".to_string(),
            kind: ItemKind::Panel,
            matrix: CostMatrix::from_usd(usd, &rates()).unwrap(),
            breakdown: CostBreakdown::default(),
            paint_component_usd: Decimal::ZERO,
            set_component_unpainted_usd: Decimal::ZERO,
            set_component_painted_usd: Decimal::ZERO,
            rates: rates(),
        }
    }

    #[test]
    fn test_bronze_margin_exact() {
        let result = result_with_painted_piece(Decimal::from(100));
        let price = PriceCalculator::sales_price(
            &result,
            CostUnit::Piece,
            Currency::Usd,
            &TierMargins::default(),
        )
        .unwrap();

        assert_eq!(price.bronze, Decimal::new(11000, 2));
        assert_eq!(price.silver, Decimal::from(120));
        assert_eq!(price.gold, Decimal::from(130));
        assert_eq!(price.price(SalesTier::Bronze), price.bronze);
    }

    #[test]
    fn test_margin_in_local_currency() {
        let result = result_with_painted_piece(Decimal::from(100));
        let price = PriceCalculator::sales_price(
            &result,
            CostUnit::Piece,
            Currency::Try,
            &TierMargins::default(),
        )
        .unwrap();

        assert_eq!(price.painted_cost, Decimal::from(3000));
        assert_eq!(price.bronze, Decimal::from(3300));
    }

    #[test]
    fn test_convert_scenario() {
        let amount = PriceCalculator::convert(Decimal::from(10), &rates()).unwrap();

        assert_eq!(amount.tl, Decimal::from(300));
        assert_eq!(amount.eur.round_dp(3), Decimal::new(9259, 3));
    }

    #[test]
    fn test_price_sheet_covers_all_units_and_currencies() {
        let result = result_with_painted_piece(Decimal::from(100));
        let sheet = PriceCalculator::price_sheet(&result, &TierMargins::default()).unwrap();

        assert_eq!(sheet.len(), 9);
        let per_m2_usd = sheet
            .iter()
            .find(|p| p.unit == CostUnit::SquareMeter && p.currency == Currency::Usd)
            .unwrap();
        assert_eq!(per_m2_usd.bronze, Decimal::from(55));
    }

    #[test]
    fn test_margin_overflow_is_an_error() {
        let mut result = result_with_painted_piece(Decimal::ONE);
        let parity = ExchangeRates::new(Decimal::ONE, Decimal::ONE);
        result.matrix = CostMatrix::from_usd([[Decimal::MAX; 3]; 4], &parity).unwrap();

        assert!(PriceCalculator::apply_margin(Decimal::MAX, Decimal::from(10)).is_err());
        assert!(PriceCalculator::price_sheet(&result, &TierMargins::default()).is_err());
        assert_eq!(
            PriceCalculator::apply_margin(Decimal::MAX, Decimal::ZERO).unwrap(),
            Decimal::MAX
        );
    }

    proptest! {
        #[test]
        fn prop_currency_roundtrip(cents in 0i64..100_000_000, rate_milli in 500i64..2_000) {
            let usd = Decimal::new(cents, 2);
            let rates = ExchangeRates::new(Decimal::from(30), Decimal::new(rate_milli, 3));
            let amount = PriceCalculator::convert(usd, &rates).unwrap();

            let tolerance = Decimal::new(1, 6);
            prop_assert!((amount.eur * rates.eur_usd - usd).abs() < tolerance);
            prop_assert_eq!(amount.tl, usd * Decimal::from(30));
        }
    }
}
