//! 計算器配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::sales::TierMargins;

/// 變數缺值時的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingVariablePolicy {
    /// 以預設值繼續計算，缺值欄位列入警告
    Proceed,
    /// 有任何缺值即中止
    Abort,
}

/// 成本計算器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// 變數缺值處理方式
    pub missing_variable_policy: MissingVariablePolicy,

    /// 缺值或無法解析時使用的預設值
    pub missing_default: Decimal,

    /// 是否並行計算批次中的各規格
    /// - true: 使用 rayon 分散到工作執行緒（預設）
    /// - false: 單執行緒依序計算
    ///
    /// 兩者結果相同，且輸出順序都與輸入一致。
    pub parallel: bool,

    /// 銷售等級加成
    pub tier_margins: TierMargins,
}

impl CalculatorConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            missing_variable_policy: MissingVariablePolicy::Proceed,
            missing_default: Decimal::ZERO,
            parallel: true,
            tier_margins: TierMargins::default(),
        }
    }

    /// 建構器模式：設置缺值處理方式
    pub fn with_missing_variable_policy(mut self, policy: MissingVariablePolicy) -> Self {
        self.missing_variable_policy = policy;
        self
    }

    /// 建構器模式：設置缺值預設值
    pub fn with_missing_default(mut self, default: Decimal) -> Self {
        self.missing_default = default;
        self
    }

    /// 建構器模式：設置是否並行
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 建構器模式：設置銷售等級加成
    pub fn with_tier_margins(mut self, margins: TierMargins) -> Self {
        self.tier_margins = margins;
        self
    }

    /// 缺值時是否中止
    pub fn aborts_on_missing(&self) -> bool {
        self.missing_variable_policy == MissingVariablePolicy::Abort
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
