//! 成本主計算器

use fence_core::{
    CalculatorConfig, CostError, CostResult, CostUnit, Currency, GeneralVariables, ItemKind,
    PanelSpec, PanelVariables, ProfilePriceBasis, ProfileSpec, ProfileVariables, RawBundle,
    Resolution, SalesPriceResult, VariableBundle,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::costing::{CostComposer, SetContribution};
use crate::derivation::{bend_count, bend_rod_count, derive_panel, DerivedPanelMetrics};
use crate::lookup::is_supported_pallet_width;
use crate::pricing::PriceCalculator;
use crate::profile_metrics::{derive_profile, ProfileMetrics};
use crate::{BatchReport, BatchSummary, CostWarning, ItemFailure};

/// 單一網片計算結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelCalculation {
    pub metrics: DerivedPanelMetrics,
    pub cost: CostResult,
    pub warnings: Vec<CostWarning>,
}

/// 單一立柱計算結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCalculation {
    pub metrics: ProfileMetrics,
    pub cost: CostResult,
    pub warnings: Vec<CostWarning>,
}

/// 批次計算請求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    pub panels: Vec<PanelSpec>,
    pub profiles: Vec<ProfileSpec>,

    /// 立柱單價基礎（鍍鋅/黑鐵），由呼叫端決定
    pub price_basis: ProfilePriceBasis,
}

impl BatchRequest {
    pub fn new(price_basis: ProfilePriceBasis) -> Self {
        Self {
            panels: Vec::new(),
            profiles: Vec::new(),
            price_basis,
        }
    }

    pub fn with_panel(mut self, spec: PanelSpec) -> Self {
        self.panels.push(spec);
        self
    }

    pub fn with_panels(mut self, specs: impl IntoIterator<Item = PanelSpec>) -> Self {
        self.panels.extend(specs);
        self
    }

    pub fn with_profile(mut self, spec: ProfileSpec) -> Self {
        self.profiles.push(spec);
        self
    }

    pub fn with_profiles(mut self, specs: impl IntoIterator<Item = ProfileSpec>) -> Self {
        self.profiles.extend(specs);
        self
    }

    pub fn len(&self) -> usize {
        self.panels.len() + self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 成本計算器
///
/// 三組變數在建立後即固定；要改變數需建立新的計算器。
pub struct CostCalculator {
    general: GeneralVariables,
    panel: PanelVariables,
    profile: ProfileVariables,
    config: CalculatorConfig,

    /// 變數解析時產生的警告，併入每次批次結果
    variable_warnings: Vec<CostWarning>,
}

impl CostCalculator {
    /// 創建新的成本計算器
    pub fn new(
        general: GeneralVariables,
        panel: PanelVariables,
        profile: ProfileVariables,
        config: CalculatorConfig,
    ) -> Self {
        Self {
            general,
            panel,
            profile,
            config,
            variable_warnings: Vec::new(),
        }
    }

    /// 由原始鍵值建立
    ///
    /// 無效欄位套用 `config.missing_default`；策略為 `Abort` 時回傳
    /// `MissingVariables`，否則每個欄位產生一筆警告。
    pub fn from_raw(
        general: &RawBundle,
        panel: &RawBundle,
        profile: &RawBundle,
        config: CalculatorConfig,
    ) -> fence_core::Result<Self> {
        let default = config.missing_default;
        let general = GeneralVariables::resolve(general, default);
        let panel = PanelVariables::resolve(panel, default);
        let profile = ProfileVariables::resolve(profile, default);

        let mut missing = general.defaulted_fields();
        missing.extend(panel.defaulted_fields());
        missing.extend(profile.defaulted_fields());

        if !missing.is_empty() && config.aborts_on_missing() {
            return Err(CostError::MissingVariables(missing));
        }

        let variable_warnings = collect_defaulted(&general)
            .chain(collect_defaulted(&panel))
            .chain(collect_defaulted(&profile))
            .collect();

        Ok(Self {
            general: general.values,
            panel: panel.values,
            profile: profile.values,
            config,
            variable_warnings,
        })
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn general_variables(&self) -> &GeneralVariables {
        &self.general
    }

    /// 變數解析警告
    pub fn variable_warnings(&self) -> &[CostWarning] {
        &self.variable_warnings
    }

    fn composer(&self) -> CostComposer<'_> {
        CostComposer::new(&self.general, &self.panel, &self.profile)
    }

    /// 計算單一網片
    pub fn calculate_panel(
        &self,
        spec: &PanelSpec,
        price_basis: ProfilePriceBasis,
    ) -> fence_core::Result<PanelCalculation> {
        spec.validate()?;

        let spec_code = spec.code();
        tracing::debug!("計算網片: {}", spec_code);

        let metrics = derive_panel(spec, &self.panel)?;

        let mut warnings = supplied_bend_notes(spec, &spec_code);
        if !is_supported_pallet_width(spec.width_cm) {
            tracing::warn!("網片 {} 寬度 {} cm 無棧板重量資料", spec_code, spec.width_cm);
            warnings.push(CostWarning::warning(
                spec_code.clone(),
                format!("寬度 {} cm 無棧板重量資料，空棧板重量以 0 計", spec.width_cm),
            ));
        }

        let set = match &spec.set_profile {
            Some(profile) => {
                let profile_calc = self.calculate_profile(profile, price_basis)?;
                warnings.extend(profile_calc.warnings.iter().cloned());
                Some(SetContribution::from_profile(
                    &profile_calc.cost,
                    &profile_calc.metrics,
                    profile.unit_count,
                )?)
            }
            None => None,
        };

        let cost = self.composer().compose_panel(spec, &metrics, set)?;

        Ok(PanelCalculation {
            metrics,
            cost,
            warnings,
        })
    }

    /// 計算單一立柱
    pub fn calculate_profile(
        &self,
        spec: &ProfileSpec,
        price_basis: ProfilePriceBasis,
    ) -> fence_core::Result<ProfileCalculation> {
        spec.validate()?;

        let spec_code = spec.code();
        tracing::debug!("計算立柱: {} ({:?})", spec_code, price_basis);

        // 鍍層重量依規格，管材單價依批次的價格基礎
        let mut warnings = Vec::new();
        if ProfilePriceBasis::from(spec.galvanized) != price_basis {
            tracing::warn!("立柱 {} 鍍鋅設定與價格基礎 {:?} 不一致", spec_code, price_basis);
            warnings.push(CostWarning::warning(
                spec_code.clone(),
                format!("規格鍍鋅={}，但管材單價採用 {:?}", spec.galvanized, price_basis),
            ));
        }

        let metrics = derive_profile(spec, &self.profile, spec.galvanized);
        let cost = self.composer().compose_profile(spec, &metrics, price_basis)?;

        Ok(ProfileCalculation {
            metrics,
            cost,
            warnings,
        })
    }

    /// 批次計算入口
    ///
    /// 單一項目失敗只記錄於 `failures`，不影響其他項目；結果維持輸入順序。
    pub fn calculate(&self, request: &BatchRequest) -> BatchReport {
        tracing::info!(
            "開始成本計算：網片 {} 筆，立柱 {} 筆",
            request.panels.len(),
            request.profiles.len()
        );

        let start_time = std::time::Instant::now();
        let mut report = BatchReport::empty();
        for warning in &self.variable_warnings {
            report.add_warning(warning.clone());
        }

        let price_basis = request.price_basis;

        // Step 1: 網片
        tracing::debug!("Step 1: 網片計算");
        let panel_results: Vec<_> = if self.config.parallel {
            request
                .panels
                .par_iter()
                .map(|spec| self.calculate_panel(spec, price_basis))
                .collect()
        } else {
            request
                .panels
                .iter()
                .map(|spec| self.calculate_panel(spec, price_basis))
                .collect()
        };

        for (index, (spec, result)) in request.panels.iter().zip(panel_results).enumerate() {
            match result {
                Ok(calc) => {
                    for warning in &calc.warnings {
                        report.add_warning(warning.clone());
                    }
                    report.panels.push(calc);
                }
                Err(e) => {
                    report
                        .failures
                        .push(record_failure(index, ItemKind::Panel, spec.code(), e))
                }
            }
        }

        // Step 2: 立柱
        tracing::debug!("Step 2: 立柱計算");
        let profile_results: Vec<_> = if self.config.parallel {
            request
                .profiles
                .par_iter()
                .map(|spec| self.calculate_profile(spec, price_basis))
                .collect()
        } else {
            request
                .profiles
                .iter()
                .map(|spec| self.calculate_profile(spec, price_basis))
                .collect()
        };

        for (index, (spec, result)) in request.profiles.iter().zip(profile_results).enumerate() {
            match result {
                Ok(calc) => {
                    for warning in &calc.warnings {
                        report.add_warning(warning.clone());
                    }
                    report.profiles.push(calc);
                }
                Err(e) => {
                    report
                        .failures
                        .push(record_failure(index, ItemKind::Profile, spec.code(), e))
                }
            }
        }

        // Step 3: 彙總
        report.summary =
            BatchSummary::from_results(&report.panels, &report.profiles, report.failures.len());
        report.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!("成本計算完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "成功 {} 筆，失敗 {} 筆，警告 {} 筆",
            report.summary.panel_count + report.summary.profile_count,
            report.summary.failure_count,
            report.warnings.len()
        );

        report
    }

    /// 依設定的等級加成計算銷售價格
    pub fn sales_prices(
        &self,
        report: &BatchReport,
        unit: CostUnit,
        currency: Currency,
    ) -> fence_core::Result<Vec<SalesPriceResult>> {
        let margins = &self.config.tier_margins;
        PriceCalculator::sales_prices(report.cost_results(), unit, currency, margins)
    }
}

/// 匯率欄位套用預設值時，所有換算幣別的金額都不可信
const EXCHANGE_RATE_FIELDS: [&str; 2] = ["usd_local_rate", "eur_usd_rate"];

fn collect_defaulted<T>(resolution: &Resolution<T>) -> impl Iterator<Item = CostWarning> + '_ {
    resolution.defaulted.iter().map(|d| {
        let code = format!("{}.{}", d.bundle, d.field);
        let message = format!("變數無有效值（{:?}），已套用預設值", d.reason);
        if d.bundle == "general" && EXCHANGE_RATE_FIELDS.contains(&d.field.as_str()) {
            CostWarning::error(code, message)
        } else {
            CostWarning::warning(code, message)
        }
    })
}

/// 外部提供的折彎數、折彎筋數與推導值不同時留下提示
fn supplied_bend_notes(spec: &PanelSpec, spec_code: &str) -> Vec<CostWarning> {
    let mut notes = Vec::new();
    if let (Some(supplied), Ok(derived)) =
        (spec.bend_count, bend_count(spec.family, spec.height_cm))
    {
        if supplied != derived {
            notes.push(CostWarning::info(
                spec_code.to_string(),
                format!("折彎數採用外部值 {supplied}，推導值為 {derived}"),
            ));
        }
    }
    if let Some(supplied) = spec.bend_rod_count {
        let derived = bend_rod_count(spec.family, spec.height_cm);
        if supplied != derived {
            notes.push(CostWarning::info(
                spec_code.to_string(),
                format!("折彎筋數採用外部值 {supplied}，推導值為 {derived}"),
            ));
        }
    }
    notes
}

fn record_failure(
    index: usize,
    kind: ItemKind,
    spec_code: String,
    error: CostError,
) -> ItemFailure {
    tracing::warn!("項目 {} 計算失敗: {}", spec_code, error);
    ItemFailure {
        index,
        kind,
        spec_code,
        error_message: error.to_string(),
    }
}
