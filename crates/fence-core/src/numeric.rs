//! 數值轉換工具
//!
//! 物理量（cm、mm、kg、m²）使用 `f64`，金額一律使用 `Decimal`。
//! 兩者之間只經由此模組轉換。

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::{CostError, Result};

/// 將 `f64` 轉為 `Decimal`，NaN 與無限值回傳錯誤
pub fn to_decimal(value: f64, what: &str) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(CostError::NonFiniteValue(format!("{what} = {value}")));
    }
    Decimal::try_from(value)
        .map_err(|e| CostError::NonFiniteValue(format!("{what} = {value}: {e}")))
}

/// 將 `Decimal` 轉為 `f64`（用於幾何計算）
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn overflow(op: &str, what: &str) -> CostError {
    CostError::CalculationError(format!("{what} {op}溢位"))
}

/// 乘法，溢位時回傳 `CalculationError`
pub fn checked_mul(lhs: Decimal, rhs: Decimal, what: &str) -> Result<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| overflow("乘法", what))
}

/// 加法，溢位時回傳 `CalculationError`
pub fn checked_add(lhs: Decimal, rhs: Decimal, what: &str) -> Result<Decimal> {
    lhs.checked_add(rhs).ok_or_else(|| overflow("加法", what))
}

/// 依序加總
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>, what: &str) -> Result<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| checked_add(acc, value, what))
}

/// 除法，分母為零時回傳 0，溢位時回傳 `CalculationError`
pub fn checked_div(numerator: Decimal, denominator: Decimal, what: &str) -> Result<Decimal> {
    if denominator.is_zero() {
        return Ok(Decimal::ZERO);
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| overflow("除法", what))
}

/// 浮點除法，分母為零或結果非有限值時回傳 0
pub fn safe_div_f64(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_rejects_nan() {
        assert!(to_decimal(f64::NAN, "area").is_err());
        assert!(to_decimal(f64::INFINITY, "area").is_err());
        assert_eq!(to_decimal(2.5, "area").unwrap(), Decimal::new(25, 1));
    }

    #[test]
    fn test_checked_div_zero() {
        assert_eq!(checked_div(Decimal::from(10), Decimal::ZERO, "x").unwrap(), Decimal::ZERO);
        assert_eq!(
            checked_div(Decimal::from(10), Decimal::from(4), "x").unwrap(),
            Decimal::new(25, 1)
        );
        assert_eq!(safe_div_f64(1.0, 0.0), 0.0);
        assert_eq!(safe_div_f64(9.0, 3.0), 3.0);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let result = checked_mul(Decimal::MAX, Decimal::from(2), "labor");
        assert!(matches!(result, Err(CostError::CalculationError(_))));
        assert!(checked_add(Decimal::MAX, Decimal::ONE, "sum").is_err());
        assert!(checked_div(Decimal::MAX, Decimal::new(1, 10), "rate").is_err());
        assert_eq!(
            checked_sum([Decimal::ONE, Decimal::from(2)], "sum").unwrap(),
            Decimal::from(3)
        );
        assert!(checked_sum([Decimal::MAX, Decimal::MAX], "sum").is_err());
    }
}
