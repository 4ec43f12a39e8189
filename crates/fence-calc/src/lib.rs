//! # Fence Cost Calculation Engine
//!
//! 網片與立柱的尺寸推導、成本組合與銷售定價

pub mod calculator;
pub mod costing;
pub mod derivation;
pub mod lookup;
pub mod pricing;
pub mod profile_metrics;

// Re-export 主要類型
pub use calculator::{BatchRequest, CostCalculator, PanelCalculation, ProfileCalculation};
pub use costing::{CostComposer, SetContribution};
pub use derivation::{derive_panel, DerivedPanelMetrics};
pub use pricing::PriceCalculator;
pub use profile_metrics::{derive_profile, ProfileMetrics};

use chrono::{DateTime, Utc};
use fence_core::{CostResult, ItemKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 批次計算結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// 計算批次編號
    pub run_id: Uuid,

    /// 開始時間
    pub started_at: DateTime<Utc>,

    /// 網片結果（依輸入順序，不含失敗項目）
    pub panels: Vec<PanelCalculation>,

    /// 立柱結果（依輸入順序，不含失敗項目）
    pub profiles: Vec<ProfileCalculation>,

    /// 失敗項目
    pub failures: Vec<ItemFailure>,

    /// 警告信息
    pub warnings: Vec<CostWarning>,

    /// 彙總
    pub summary: BatchSummary,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl BatchReport {
    /// 創建空的計算結果
    pub fn empty() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            panels: Vec::new(),
            profiles: Vec::new(),
            failures: Vec::new(),
            warnings: Vec::new(),
            summary: BatchSummary::default(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: CostWarning) {
        self.warnings.push(warning);
    }

    /// 所有成本結果（網片在前，立柱在後）
    pub fn cost_results(&self) -> impl Iterator<Item = &CostResult> + '_ {
        self.panels
            .iter()
            .map(|p| &p.cost)
            .chain(self.profiles.iter().map(|p| &p.cost))
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// 匯出 JSON
    pub fn to_json(&self) -> fence_core::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| fence_core::CostError::Other(e.to_string()))
    }
}

/// 批次彙總
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub panel_count: usize,
    pub profile_count: usize,
    pub failure_count: usize,

    /// 網片總面積（m²）
    pub total_area_m2: f64,

    /// 網片塗裝後總重（kg）
    pub total_painted_weight_kg: f64,

    /// 未塗裝總成本（USD/片 加總）
    pub total_bare_usd: Decimal,

    /// 塗裝總成本（USD/片 加總）
    pub total_painted_usd: Decimal,
}

impl BatchSummary {
    pub fn from_results(
        panels: &[PanelCalculation],
        profiles: &[ProfileCalculation],
        failure_count: usize,
    ) -> Self {
        let costs = panels
            .iter()
            .map(|p| &p.cost)
            .chain(profiles.iter().map(|p| &p.cost));

        // 單筆結果已確認不溢位，加總達上限時停在 Decimal::MAX
        let (total_bare_usd, total_painted_usd) =
            costs.fold((Decimal::ZERO, Decimal::ZERO), |(bare, painted), cost| {
                (
                    bare.saturating_add(cost.piece_usd(fence_core::CostBasis::Bare)),
                    painted.saturating_add(cost.piece_usd(fence_core::CostBasis::Painted)),
                )
            });

        Self {
            panel_count: panels.len(),
            profile_count: profiles.len(),
            failure_count,
            total_area_m2: panels.iter().map(|p| p.metrics.area_m2()).sum(),
            total_painted_weight_kg: panels.iter().map(|p| p.metrics.painted_weight_kg()).sum(),
            total_bare_usd,
            total_painted_usd,
        }
    }
}

/// 無法計算的項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFailure {
    /// 在輸入清單中的位置
    pub index: usize,
    pub kind: ItemKind,
    pub spec_code: String,
    pub error_message: String,
}

/// 成本計算警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostWarning {
    pub spec_code: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl CostWarning {
    pub fn new(spec_code: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            spec_code,
            message,
            severity,
        }
    }

    pub fn info(spec_code: String, message: String) -> Self {
        Self::new(spec_code, message, WarningSeverity::Info)
    }

    pub fn warning(spec_code: String, message: String) -> Self {
        Self::new(spec_code, message, WarningSeverity::Warning)
    }

    pub fn error(spec_code: String, message: String) -> Self {
        Self::new(spec_code, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
