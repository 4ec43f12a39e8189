//! 網片尺寸推導
//!
//! 由網片規格依序推導：幾何 → 重量 → 包裝 → 產能。
//! 每一步只讀取前一步的結果並回傳新的記錄，不修改既有欄位。
//!
//! 所有公式對任意數值輸入皆有定義：分母為零時結果為 0。
//! 線數或折彎數超出 `u32` 範圍時回傳 `CostError::InvalidDimension`。

use std::f64::consts::PI;

use fence_core::numeric::{safe_div_f64, to_f64};
use fence_core::{CostError, PanelFamily, PanelSpec, PanelVariables, Result};
use serde::{Deserialize, Serialize};

use crate::lookup;

/// 鋼材密度（g/cm³）
pub const STEEL_DENSITY: f64 = 7.85;

/// 橫線長度補償（cm）
pub const HORIZONTAL_WIRE_ALLOWANCE_CM: f64 = 0.6;

/// 每個折彎的直線長度補償（cm），網孔 20 / 15
pub const BEND_ALLOWANCE_20_CM: f64 = 2.1;
pub const BEND_ALLOWANCE_15_CM: f64 = 2.6;

/// 單位面積塗層重量（kg/m²）
pub const PAINT_WEIGHT_SINGLE: f64 = 0.03;
pub const PAINT_WEIGHT_DOUBLE: f64 = 0.06;

/// 每棧板片數
pub const PALLET_UNITS_SINGLE: u32 = 100;
pub const PALLET_UNITS_DOUBLE_HEAVY: u32 = 25;
pub const PALLET_UNITS_DOUBLE: u32 = 30;
pub const PALLET_UNITS_SECURITY: u32 = 40;

/// 雙線網片改用重型棧板的線徑門檻（mm）
pub const HEAVY_WIRE_MM: f64 = 7.0;

/// 單線網片「奇數」高度系列（cm），使用 1 支折彎筋
pub const ODD_HEIGHT_SERIES: [f64; 8] = [63.0, 83.0, 103.0, 123.0, 153.0, 173.0, 203.0, 243.0];

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// 將推導出的支數轉為 `u32`；負值與 NaN 視為 0
fn to_count(count: f64, field: &'static str, dimension: f64) -> Result<u32> {
    if count > f64::from(u32::MAX) {
        return Err(CostError::InvalidDimension {
            field,
            value: dimension,
        });
    }
    Ok(count.max(0.0) as u32)
}

/// 幾何推導結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelGeometry {
    /// 面積（m²）
    pub area_m2: f64,
    /// 直線支數
    pub vertical_bar_count: u32,
    /// 橫線支數
    pub horizontal_bar_count: u32,
    /// 折彎數
    pub bend_count: u32,
    /// 折彎筋數
    pub bend_rod_count: u32,
}

/// 重量推導結果（kg）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelWeights {
    pub base_weight_kg: f64,
    pub paint_weight_kg: f64,
    pub painted_weight_kg: f64,
    /// 塗裝後每 m² 重量
    pub weight_per_m2: f64,
}

/// 包裝推導結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelPacking {
    /// 每棧板片數
    pub pallet_unit_count: u32,
    /// 空棧板重量（kg），不支援的寬度為 0
    pub empty_pallet_weight_kg: f64,
    /// 滿載棧板重量（kg）
    pub loaded_pallet_weight_kg: f64,
    /// 每片堆疊高度（cm）
    pub unit_stack_height_cm: f64,
    /// 整板堆疊高度（cm，含底座）
    pub stack_height_cm: f64,
}

/// 產能推導結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelCapacity {
    /// 每小時產量（片/h）
    pub units_per_hour: f64,
    /// 月產能（片，以焊接班次計）
    pub monthly_capacity: f64,
}

/// 網片推導指標
///
/// 每次計算重新建立，建立後不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedPanelMetrics {
    pub family: PanelFamily,
    pub geometry: PanelGeometry,
    pub weights: PanelWeights,
    pub packing: PanelPacking,
    pub capacity: PanelCapacity,
}

impl DerivedPanelMetrics {
    pub fn area_m2(&self) -> f64 {
        self.geometry.area_m2
    }

    pub fn base_weight_kg(&self) -> f64 {
        self.weights.base_weight_kg
    }

    pub fn painted_weight_kg(&self) -> f64 {
        self.weights.painted_weight_kg
    }
}

/// 推導網片指標
pub fn derive_panel(spec: &PanelSpec, variables: &PanelVariables) -> Result<DerivedPanelMetrics> {
    let geometry = derive_geometry(spec)?;
    let weights = derive_weights(spec, &geometry);
    let packing = derive_packing(spec, &weights);
    let capacity = derive_capacity(spec, variables);

    tracing::debug!(
        "網片 {} 推導: 面積 {:.4} m², 直線 {}, 橫線 {}, 重量 {:.3} kg",
        spec.code(),
        geometry.area_m2,
        geometry.vertical_bar_count,
        geometry.horizontal_bar_count,
        weights.base_weight_kg
    );

    Ok(DerivedPanelMetrics {
        family: spec.family,
        geometry,
        weights,
        packing,
        capacity,
    })
}

/// 幾何：面積、線數、折彎
pub fn derive_geometry(spec: &PanelSpec) -> Result<PanelGeometry> {
    let bends = match spec.bend_count {
        Some(count) => count,
        None => bend_count(spec.family, spec.height_cm)?,
    };

    Ok(PanelGeometry {
        area_m2: area_m2(spec.height_cm, spec.width_cm),
        vertical_bar_count: vertical_bar_count(spec.width_cm, spec.horizontal_spacing)?,
        horizontal_bar_count: horizontal_bar_count(
            spec.family,
            spec.height_cm,
            spec.vertical_spacing,
        )?,
        bend_count: bends,
        bend_rod_count: spec
            .bend_rod_count
            .unwrap_or_else(|| bend_rod_count(spec.family, spec.height_cm)),
    })
}

/// 重量：線材重、塗層重
pub fn derive_weights(spec: &PanelSpec, geometry: &PanelGeometry) -> PanelWeights {
    let base_weight_kg = base_weight(spec, geometry);
    let paint_weight_kg = paint_weight(spec.family, geometry.area_m2);
    let painted_weight_kg = base_weight_kg + paint_weight_kg;

    PanelWeights {
        base_weight_kg,
        paint_weight_kg,
        painted_weight_kg,
        weight_per_m2: safe_div_f64(painted_weight_kg, geometry.area_m2),
    }
}

/// 包裝：棧板片數、棧板重量、堆疊高度
pub fn derive_packing(spec: &PanelSpec, weights: &PanelWeights) -> PanelPacking {
    let pallet_unit_count = pallet_unit_count(spec);
    let empty_pallet_weight_kg =
        lookup::empty_pallet_weight(spec.family, spec.width_cm, spec.height_cm);
    let unit_stack_height_cm = lookup::packing_range(spec.family).coefficient(spec.height_cm);

    PanelPacking {
        pallet_unit_count,
        empty_pallet_weight_kg,
        loaded_pallet_weight_kg: empty_pallet_weight_kg
            + f64::from(pallet_unit_count) * weights.painted_weight_kg,
        unit_stack_height_cm,
        stack_height_cm: lookup::PALLET_BASE_HEIGHT_CM
            + f64::from(pallet_unit_count) * unit_stack_height_cm,
    }
}

/// 產能：時產量、月產能
pub fn derive_capacity(spec: &PanelSpec, variables: &PanelVariables) -> PanelCapacity {
    PanelCapacity {
        units_per_hour: lookup::units_per_hour(spec.family, spec.height_cm),
        monthly_capacity: lookup::monthly_capacity(
            spec.family,
            spec.height_cm,
            to_f64(variables.welding_shifts),
        ),
    }
}

/// 面積 = 高 × 寬 / 10000（cm² → m²）
pub fn area_m2(height_cm: f64, width_cm: f64) -> f64 {
    height_cm * width_cm / 10_000.0
}

/// 折彎數，只有單線網片有折彎
///
/// - 高度 ≥ 100：round(高度 / 50)
/// - 高度 < 100：floor(高度 / 50 + 1)
pub fn bend_count(family: PanelFamily, height_cm: f64) -> Result<u32> {
    if family != PanelFamily::Single {
        return Ok(0);
    }
    let count = if height_cm >= 100.0 {
        (height_cm / 50.0).round()
    } else {
        (height_cm / 50.0 + 1.0).floor()
    };
    to_count(count, "height_cm", height_cm)
}

/// 折彎筋數：單線網片奇數高度系列為 1，其餘為 2；其他類型為 0
pub fn bend_rod_count(family: PanelFamily, height_cm: f64) -> u32 {
    if family != PanelFamily::Single {
        return 0;
    }
    if ODD_HEIGHT_SERIES.iter().any(|&h| approx_eq(h, height_cm)) {
        1
    } else {
        2
    }
}

/// 直線支數，由寬度與「橫向」網孔間距決定
///
/// - 間距 < 5.5：ceil(寬 / 間距) + 1
/// - 間距 < 6：round(寬 / 間距) + 1
/// - 間距 ≥ 6：floor(寬 / 間距) + 1
pub fn vertical_bar_count(width_cm: f64, horizontal_spacing: f64) -> Result<u32> {
    if horizontal_spacing <= 0.0 || !horizontal_spacing.is_finite() {
        return Ok(0);
    }
    let ratio = width_cm / horizontal_spacing;
    let spans = if horizontal_spacing < 5.5 {
        ratio.ceil()
    } else if horizontal_spacing < 6.0 {
        ratio.round()
    } else {
        ratio.floor()
    };
    to_count(spans.max(0.0) + 1.0, "width_cm", width_cm)
}

/// 橫線支數，由高度與「直向」網孔間距決定
pub fn horizontal_bar_count(
    family: PanelFamily,
    height_cm: f64,
    vertical_spacing: f64,
) -> Result<u32> {
    if vertical_spacing <= 0.0 || !vertical_spacing.is_finite() {
        return Ok(0);
    }
    let ratio = height_cm / vertical_spacing;

    let count = match family {
        // 雙線網片每層兩支
        PanelFamily::Double => {
            let rows = ((height_cm - 3.0) / vertical_spacing).floor().max(0.0) + 1.0;
            rows * 2.0
        }
        PanelFamily::Single => {
            if approx_eq(vertical_spacing, 20.0) {
                ratio.round() + 1.0
            } else if approx_eq(vertical_spacing, 15.0) && height_cm < 200.0 {
                ratio.ceil()
            } else if height_cm >= 200.0 {
                ratio.ceil() + 1.0
            } else {
                ratio.round() + 1.0
            }
        }
        PanelFamily::Security => ratio.ceil() + 1.0,
    };

    to_count(count, "height_cm", height_cm)
}

/// 每公尺線重（kg/m）= π·d²·7.85 / 4000
pub fn wire_mass_per_meter(diameter_mm: f64) -> f64 {
    PI * diameter_mm * diameter_mm * STEEL_DENSITY / 4000.0
}

/// 單線網片每個折彎增加的直線長度（cm）
fn bend_allowance(spec: &PanelSpec) -> f64 {
    if spec.family != PanelFamily::Single {
        return 0.0;
    }
    if approx_eq(spec.vertical_spacing, 20.0) {
        BEND_ALLOWANCE_20_CM
    } else if approx_eq(spec.vertical_spacing, 15.0) {
        BEND_ALLOWANCE_15_CM
    } else {
        0.0
    }
}

/// 線材重量（kg）
///
/// 直線：線重 × (高度 + 折彎補償) × 直線支數
/// 橫線：線重 × (寬度 + 0.6) × 橫線支數
pub fn base_weight(spec: &PanelSpec, geometry: &PanelGeometry) -> f64 {
    let vertical_length_cm =
        spec.height_cm + bend_allowance(spec) * f64::from(geometry.bend_count);
    let horizontal_length_cm = spec.width_cm + HORIZONTAL_WIRE_ALLOWANCE_CM;

    let vertical = wire_mass_per_meter(spec.vertical_wire_mm)
        * (vertical_length_cm / 100.0)
        * f64::from(geometry.vertical_bar_count);
    let horizontal = wire_mass_per_meter(spec.horizontal_wire_mm)
        * (horizontal_length_cm / 100.0)
        * f64::from(geometry.horizontal_bar_count);

    vertical + horizontal
}

/// 塗層重量（kg）
pub fn paint_weight(family: PanelFamily, area_m2: f64) -> f64 {
    match family {
        PanelFamily::Single => area_m2 * PAINT_WEIGHT_SINGLE,
        PanelFamily::Double | PanelFamily::Security => area_m2 * PAINT_WEIGHT_DOUBLE,
    }
}

/// 每棧板片數
pub fn pallet_unit_count(spec: &PanelSpec) -> u32 {
    match spec.family {
        PanelFamily::Single => PALLET_UNITS_SINGLE,
        PanelFamily::Double => {
            if spec.vertical_wire_mm.max(spec.horizontal_wire_mm) >= HEAVY_WIRE_MM {
                PALLET_UNITS_DOUBLE_HEAVY
            } else {
                PALLET_UNITS_DOUBLE
            }
        }
        PanelFamily::Security => PALLET_UNITS_SECURITY,
    }
}
