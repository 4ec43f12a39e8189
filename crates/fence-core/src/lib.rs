//! # Fence Core
//!
//! 網片與立柱成本引擎的核心資料模型與類型定義

pub mod config;
pub mod cost;
pub mod numeric;
pub mod panel;
pub mod profile;
pub mod resolution;
pub mod sales;
pub mod variables;

// Re-export 主要類型
pub use config::{CalculatorConfig, MissingVariablePolicy};
pub use cost::{
    CostBasis, CostBreakdown, CostMatrix, CostResult, CostUnit, Currency, CurrencyAmount,
    ExchangeRates, ItemKind,
};
pub use panel::{PanelFamily, PanelSpec};
pub use profile::{ProfilePriceBasis, ProfileSpec};
pub use resolution::{
    parse_locale_number, resolve_bundle, DefaultReason, DefaultedField, RawBundle, Resolution,
    ResolvedBundle,
};
pub use sales::{SalesPriceResult, SalesTier, TierMargins};
pub use variables::{GeneralVariables, PanelVariables, ProfileVariables, VariableBundle};

/// 成本引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum CostError {
    #[error("無效的尺寸參數 {field}: {value}")]
    InvalidDimension { field: &'static str, value: f64 },

    #[error("數值無法轉換為十進位: {0}")]
    NonFiniteValue(String),

    #[error("缺少必要變數: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error("計算錯誤: {0}")]
    CalculationError(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CostError>;
