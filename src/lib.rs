//! # Fence Cost
//!
//! 網片圍籬成本引擎：資料模型在 `fence_core`，計算在 `fence_calc`。

pub use fence_calc;
pub use fence_core;

pub use fence_calc::{
    BatchReport, BatchRequest, BatchSummary, CostCalculator, CostWarning, ItemFailure,
    PriceCalculator, WarningSeverity,
};
pub use fence_core::{
    CalculatorConfig, CostBasis, CostError, CostResult, CostUnit, Currency, GeneralVariables,
    MissingVariablePolicy, PanelFamily, PanelSpec, PanelVariables, ProfilePriceBasis, ProfileSpec,
    ProfileVariables, RawBundle, Result, SalesPriceResult, SalesTier, TierMargins,
};
