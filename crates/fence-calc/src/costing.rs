//! 成本組合
//!
//! 由推導指標與變數組計算美元成本，再換算為三種幣別。
//!
//! 網片：
//! - 未塗裝 = 面積 × (人工 + 焊接電費 + 裁切電費 + 管銷)/m² + 線重 × 線材單價
//! - 塗裝附加 = 面積 × (油漆 + 塗裝電費 + 天然氣 + 塗裝人工)/m²
//! - 成套 = 基礎成本 + 立柱支數 × 立柱成套成本
//!
//! 立柱：
//! - 未塗裝 = 管材 + 裁切電費 + 焊接電費 + 人工
//! - 塗裝附加 = 油漆 + 塗裝電費 + 天然氣
//! - 成套 = 基礎成本 + 配件

use fence_core::numeric::{checked_add, checked_div, checked_mul, checked_sum, to_decimal};
use fence_core::{
    CostBasis, CostBreakdown, CostMatrix, CostResult, GeneralVariables, ItemKind, PanelSpec,
    PanelVariables, ProfilePriceBasis, ProfileSpec, ProfileVariables, Result,
};
use rust_decimal::Decimal;

use crate::derivation::DerivedPanelMetrics;
use crate::lookup::{HOURS_PER_SHIFT_DAY, WORKING_DAYS_PER_MONTH};
use crate::profile_metrics::ProfileMetrics;

/// 成套立柱對網片成本的貢獻
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SetContribution {
    /// 未塗裝成套附加（USD/片）
    pub unpainted_usd: Decimal,
    /// 已塗裝成套附加（USD/片）
    pub painted_usd: Decimal,
    /// 立柱成本重量合計（kg，不含法蘭）
    pub weight_kg: Decimal,
}

impl SetContribution {
    /// 由立柱成本結果建立：每片網片搭配 `unit_count` 支立柱
    pub fn from_profile(
        profile_cost: &CostResult,
        metrics: &ProfileMetrics,
        unit_count: u32,
    ) -> Result<Self> {
        let units = Decimal::from(unit_count);
        let weight = to_decimal(metrics.costing_weight_kg, "profile.costing_weight_kg")?;
        Ok(Self {
            unpainted_usd: checked_mul(
                profile_cost.piece_usd(CostBasis::SettedUnpainted),
                units,
                "set.unpainted",
            )?,
            painted_usd: checked_mul(
                profile_cost.piece_usd(CostBasis::SettedPainted),
                units,
                "set.painted",
            )?,
            weight_kg: checked_mul(weight, units, "set.weight")?,
        })
    }
}

/// 成本組合器
///
/// 持有三組唯讀變數，本身不含可變狀態。金額運算溢位時回傳
/// `CostError::CalculationError`，不會 panic。
pub struct CostComposer<'a> {
    general: &'a GeneralVariables,
    panel: &'a PanelVariables,
    profile: &'a ProfileVariables,
}

impl<'a> CostComposer<'a> {
    pub fn new(
        general: &'a GeneralVariables,
        panel: &'a PanelVariables,
        profile: &'a ProfileVariables,
    ) -> Self {
        Self {
            general,
            panel,
            profile,
        }
    }

    /// 單站人工成本 / m²：人數 × 班次 × 月薪 ÷ (月產量 m²)
    fn station_labor_per_m2(
        &self,
        workers: Decimal,
        shifts: Decimal,
        m2_per_hour: Decimal,
    ) -> Result<Decimal> {
        let monthly_m2 = checked_mul(
            checked_mul(m2_per_hour, hours_per_month(), "monthly_m2")?,
            shifts,
            "monthly_m2",
        )?;
        let payroll = checked_mul(
            checked_mul(workers, shifts, "payroll")?,
            self.general.wage_usd()?,
            "payroll",
        )?;
        checked_div(payroll, monthly_m2, "labor_per_m2")
    }

    /// 每小時產量分攤的能耗成本：用量 × 單價 ÷ 時產量
    fn hourly_share(
        usage: Decimal,
        unit_price: Decimal,
        per_hour: Decimal,
        what: &str,
    ) -> Result<Decimal> {
        checked_div(checked_mul(usage, unit_price, what)?, per_hour, what)
    }

    /// 網片成本明細（USD/片）
    pub fn panel_breakdown(&self, metrics: &DerivedPanelMetrics) -> Result<CostBreakdown> {
        let area = to_decimal(metrics.area_m2(), "area_m2")?;
        let base_weight = to_decimal(metrics.base_weight_kg(), "base_weight_kg")?;
        let units_per_hour = to_decimal(metrics.capacity.units_per_hour, "units_per_hour")?;
        let m2_per_hour = checked_mul(units_per_hour, area, "m2_per_hour")?;

        let vars = self.panel;
        let electricity = self.general.electricity_usd()?;

        let labor_per_m2 = checked_add(
            self.station_labor_per_m2(vars.cutting_workers, vars.cutting_shifts, m2_per_hour)?,
            self.station_labor_per_m2(vars.welding_workers, vars.welding_shifts, m2_per_hour)?,
            "labor_per_m2",
        )?;
        let welding_per_m2 =
            Self::hourly_share(vars.welding_kwh, electricity, m2_per_hour, "welding")?;
        let cutting_per_m2 =
            Self::hourly_share(vars.cutting_kwh, electricity, m2_per_hour, "cutting")?;

        let paint_material_per_m2 = checked_mul(
            vars.paint_per_m2(metrics.family),
            self.general.paint_price_per_kg,
            "paint_material",
        )?;
        let paint_electricity_per_m2 =
            Self::hourly_share(vars.painting_kwh, electricity, m2_per_hour, "painting")?;
        let gas_per_m2 =
            Self::hourly_share(vars.gas_m3, self.general.gas_usd()?, m2_per_hour, "gas")?;
        let paint_labor_per_m2 =
            self.station_labor_per_m2(vars.painting_workers, vars.painting_shifts, m2_per_hour)?;

        Ok(CostBreakdown {
            labor: checked_mul(area, labor_per_m2, "labor")?,
            welding_electricity: checked_mul(area, welding_per_m2, "welding_electricity")?,
            cutting_electricity: checked_mul(area, cutting_per_m2, "cutting_electricity")?,
            overhead: checked_mul(area, self.general.fixed_overhead_per_unit, "overhead")?,
            material: checked_mul(base_weight, vars.wire_price_per_kg(), "material")?,
            paint_material: checked_mul(area, paint_material_per_m2, "paint_material")?,
            paint_electricity: checked_mul(area, paint_electricity_per_m2, "paint_electricity")?,
            gas: checked_mul(area, gas_per_m2, "gas")?,
            paint_labor: checked_mul(area, paint_labor_per_m2, "paint_labor")?,
            accessories: Decimal::ZERO,
        })
    }

    /// 立柱成本明細（USD/支）
    ///
    /// 管材單價依 `price_basis` 選擇。
    pub fn profile_breakdown(
        &self,
        spec: &ProfileSpec,
        metrics: &ProfileMetrics,
        price_basis: ProfilePriceBasis,
    ) -> Result<CostBreakdown> {
        let vars = self.profile;
        let surface = to_decimal(metrics.surface_area_m2, "surface_area_m2")?;
        let weight = to_decimal(metrics.costing_weight_kg, "costing_weight_kg")?;
        let electricity = self.general.electricity_usd()?;

        let pieces_per_hour = checked_div(vars.capacity_m2_per_hour, surface, "pieces_per_hour")?;
        let monthly_pieces = checked_mul(
            checked_mul(pieces_per_hour, hours_per_month(), "monthly_pieces")?,
            vars.shift_count,
            "monthly_pieces",
        )?;
        let payroll = checked_mul(
            checked_mul(vars.worker_count, vars.shift_count, "payroll")?,
            self.general.wage_usd()?,
            "payroll",
        )?;
        let paint_material = checked_mul(
            checked_mul(surface, vars.paint_per_m2, "paint_material")?,
            self.general.paint_price_per_kg,
            "paint_material",
        )?;

        Ok(CostBreakdown {
            labor: checked_div(payroll, monthly_pieces, "labor")?,
            welding_electricity: Self::hourly_share(
                vars.welding_kwh,
                electricity,
                pieces_per_hour,
                "welding",
            )?,
            cutting_electricity: Self::hourly_share(
                vars.cutting_kwh,
                electricity,
                pieces_per_hour,
                "cutting",
            )?,
            overhead: Decimal::ZERO,
            material: checked_mul(vars.price_per_kg(price_basis), weight, "material")?,
            paint_material,
            paint_electricity: Self::hourly_share(
                vars.painting_kwh,
                electricity,
                pieces_per_hour,
                "painting",
            )?,
            gas: Self::hourly_share(vars.gas_m3, self.general.gas_usd()?, pieces_per_hour, "gas")?,
            paint_labor: Decimal::ZERO,
            accessories: self.accessory_cost(spec)?,
        })
    }

    /// 配件成本（USD/支）
    pub fn accessory_cost(&self, spec: &ProfileSpec) -> Result<Decimal> {
        let vars = self.profile;
        let flange = if spec.flanged {
            vars.flange_price
        } else {
            Decimal::ZERO
        };

        let counted = [
            (vars.screw_price, spec.screw_count),
            (vars.clip_price, spec.clip_count),
            (vars.anchor_price, spec.anchor_count),
            (vars.cap_price, spec.cap_count),
        ]
        .into_iter()
        .map(|(price, count)| checked_mul(price, Decimal::from(count), "accessories"))
        .collect::<Result<Vec<_>>>()?;

        checked_sum(std::iter::once(flange).chain(counted), "accessories")
    }

    /// 網片成本結果
    pub fn compose_panel(
        &self,
        spec: &PanelSpec,
        metrics: &DerivedPanelMetrics,
        set: Option<SetContribution>,
    ) -> Result<CostResult> {
        let breakdown = self.panel_breakdown(metrics)?;
        let set = set.unwrap_or_default();

        let area = to_decimal(metrics.area_m2(), "area_m2")?;
        let base_weight = to_decimal(metrics.base_weight_kg(), "base_weight_kg")?;
        let painted_weight = to_decimal(metrics.painted_weight_kg(), "painted_weight_kg")?;

        let rates = self.general.exchange_rates();
        let pieces = BasisPieces::new(&breakdown, set.unpainted_usd, set.painted_usd)?;
        let weights = [
            base_weight,
            painted_weight,
            checked_add(base_weight, set.weight_kg, "setted_weight")?,
            checked_add(painted_weight, set.weight_kg, "setted_weight")?,
        ];

        Ok(CostResult {
            spec_code: spec.code(),
            kind: ItemKind::Panel,
            matrix: CostMatrix::from_usd(pieces.per_unit([area; 4], weights)?, &rates)?,
            paint_component_usd: breakdown.paint_component()?,
            set_component_unpainted_usd: set.unpainted_usd,
            set_component_painted_usd: set.painted_usd,
            breakdown,
            rates,
        })
    }

    /// 立柱成本結果
    ///
    /// 每 m² 以立柱表面積計，每 kg 以成本重量（不含法蘭）計。
    pub fn compose_profile(
        &self,
        spec: &ProfileSpec,
        metrics: &ProfileMetrics,
        price_basis: ProfilePriceBasis,
    ) -> Result<CostResult> {
        let breakdown = self.profile_breakdown(spec, metrics, price_basis)?;

        let surface = to_decimal(metrics.surface_area_m2, "surface_area_m2")?;
        let weight = to_decimal(metrics.costing_weight_kg, "costing_weight_kg")?;

        let set_component = breakdown.accessories;
        let rates = self.general.exchange_rates();
        let pieces = BasisPieces::new(&breakdown, set_component, set_component)?;

        Ok(CostResult {
            spec_code: spec.code(),
            kind: ItemKind::Profile,
            matrix: CostMatrix::from_usd(pieces.per_unit([surface; 4], [weight; 4])?, &rates)?,
            paint_component_usd: breakdown.paint_component()?,
            set_component_unpainted_usd: set_component,
            set_component_painted_usd: set_component,
            breakdown,
            rates,
        })
    }
}

/// 每月工時 = 26 天 × 7 小時
fn hours_per_month() -> Decimal {
    Decimal::from((WORKING_DAYS_PER_MONTH * HOURS_PER_SHIFT_DAY) as i64)
}

/// 四種成本基礎的每片成本（索引依 `CostBasis::ALL`）
struct BasisPieces([Decimal; 4]);

impl BasisPieces {
    fn new(
        breakdown: &CostBreakdown,
        set_unpainted: Decimal,
        set_painted: Decimal,
    ) -> Result<Self> {
        let bare = breakdown.bare()?;
        let painted = checked_add(bare, breakdown.paint_component()?, "painted")?;
        Ok(Self([
            bare,
            painted,
            checked_add(bare, set_unpainted, "setted_unpainted")?,
            checked_add(painted, set_painted, "setted_painted")?,
        ]))
    }

    /// 展開為每片、每 m²、每 kg
    fn per_unit(&self, areas: [Decimal; 4], weights: [Decimal; 4]) -> Result<[[Decimal; 3]; 4]> {
        let mut usd = [[Decimal::ZERO; 3]; 4];
        for (i, row) in usd.iter_mut().enumerate() {
            let piece = self.0[i];
            row[0] = piece;
            row[1] = checked_div(piece, areas[i], "per_m2")?;
            row[2] = checked_div(piece, weights[i], "per_kg")?;
        }
        Ok(usd)
    }
}
