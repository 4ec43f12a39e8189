//! 立柱重量與表面積推導
//!
//! 成本計算使用的重量不含法蘭；顯示與運輸使用的重量含法蘭。

use fence_core::numeric::to_f64;
use fence_core::{ProfileSpec, ProfileVariables};
use serde::{Deserialize, Serialize};

/// 方管轉角修正係數
pub const CORNER_CORRECTION: f64 = 0.988;

/// 鋼材密度（kg/cm³）
pub const STEEL_DENSITY_KG_PER_CM3: f64 = 0.00785;

/// 熱浸鍍鋅層重量（kg/m²）
pub const ZINC_COATING_KG_PER_M2: f64 = 0.400;

/// 法蘭重量（kg）
pub const FLANGE_WEIGHT_KG: f64 = 0.385;

/// 立柱推導指標
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetrics {
    /// 長度（mm）
    pub length_mm: f64,
    /// 斷面周長（mm）
    pub perimeter_mm: f64,
    /// 表面積（m²）
    pub surface_area_m2: f64,
    /// 鋼材重量（kg）
    pub steel_weight_kg: f64,
    /// 鍍鋅層重量（kg），未鍍鋅為 0
    pub coating_weight_kg: f64,
    /// 成本計算用重量（不含法蘭）
    pub costing_weight_kg: f64,
    /// 顯示與運輸用重量（含法蘭）
    pub shipping_weight_kg: f64,
}

/// 推導立柱指標
///
/// `galvanized` 由呼叫端明確傳入，決定是否計入鍍鋅層重量。
pub fn derive_profile(
    spec: &ProfileSpec,
    variables: &ProfileVariables,
    galvanized: bool,
) -> ProfileMetrics {
    let width = to_f64(variables.outer_width_mm);
    let height = to_f64(variables.outer_height_mm);
    let wall = to_f64(variables.wall_thickness_mm);

    let length_mm = spec.height_cm * 10.0;
    let perimeter_mm = 2.0 * (width + height);
    let steel_weight_kg = cross_section_weight(width, height, wall, length_mm);
    let coating_weight_kg = if galvanized {
        coating_weight(perimeter_mm, length_mm)
    } else {
        0.0
    };
    let costing_weight_kg = steel_weight_kg + coating_weight_kg;
    let shipping_weight_kg = if spec.flanged {
        costing_weight_kg + FLANGE_WEIGHT_KG
    } else {
        costing_weight_kg
    };

    ProfileMetrics {
        length_mm,
        perimeter_mm,
        surface_area_m2: perimeter_mm * length_mm / 1_000_000.0,
        steel_weight_kg,
        coating_weight_kg,
        costing_weight_kg,
        shipping_weight_kg,
    }
}

/// 方管鋼材重量（kg）
///
/// (外斷面 − 內斷面) mm² × 0.988 × 長度 mm × 0.00785 kg/cm³ / 1000
pub fn cross_section_weight(width_mm: f64, height_mm: f64, wall_mm: f64, length_mm: f64) -> f64 {
    let outer = width_mm.max(0.0) * height_mm.max(0.0);
    let inner = (width_mm - 2.0 * wall_mm).max(0.0) * (height_mm - 2.0 * wall_mm).max(0.0);
    let section = (outer - inner).max(0.0);

    section * CORNER_CORRECTION * length_mm * STEEL_DENSITY_KG_PER_CM3 / 1000.0
}

/// 鍍鋅層重量（kg）= 周長 × 長度 / 1e6（m²）× 0.400
pub fn coating_weight(perimeter_mm: f64, length_mm: f64) -> f64 {
    perimeter_mm * length_mm / 1_000_000.0 * ZINC_COATING_KG_PER_M2
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn variables_60x40x2() -> ProfileVariables {
        ProfileVariables {
            outer_width_mm: Decimal::from(60),
            outer_height_mm: Decimal::from(40),
            wall_thickness_mm: Decimal::from(2),
            ..Default::default()
        }
    }

    #[test]
    fn test_cross_section_weight() {
        // (2400 − 2016) × 0.988 × 2000 × 0.00785 / 1000
        let expected = 384.0 * 0.988 * 2000.0 * 0.00785 / 1000.0;
        assert!((cross_section_weight(60.0, 40.0, 2.0, 2000.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_galvanized_flanged_weights() {
        let spec = ProfileSpec::new(200.0, true, true);
        let metrics = derive_profile(&spec, &variables_60x40x2(), spec.galvanized);

        assert_eq!(metrics.length_mm, 2000.0);
        assert!(metrics.coating_weight_kg > 0.0);
        assert!((metrics.coating_weight_kg - 200.0 * 2000.0 / 1e6 * 0.4).abs() < 1e-12);
        assert_eq!(
            metrics.costing_weight_kg,
            metrics.steel_weight_kg + metrics.coating_weight_kg
        );
        let flange = metrics.shipping_weight_kg - metrics.costing_weight_kg;
        assert!((flange - FLANGE_WEIGHT_KG).abs() < 1e-12);
    }

    #[test]
    fn test_coating_scales_with_perimeter_and_length() {
        let base = coating_weight(200.0, 2000.0);
        assert!((coating_weight(400.0, 2000.0) - 2.0 * base).abs() < 1e-12);
        assert!((coating_weight(200.0, 4000.0) - 2.0 * base).abs() < 1e-12);
    }

    #[test]
    fn test_black_profile_has_no_coating() {
        let spec = ProfileSpec::new(200.0, false, false);
        let metrics = derive_profile(&spec, &variables_60x40x2(), false);

        assert_eq!(metrics.coating_weight_kg, 0.0);
        assert_eq!(metrics.costing_weight_kg, metrics.shipping_weight_kg);
    }

    #[test]
    fn test_solid_section_when_wall_exceeds_half_width() {
        let weight = cross_section_weight(10.0, 10.0, 6.0, 1000.0);
        let expected = 100.0 * 0.988 * 1000.0 * 0.00785 / 1000.0;
        assert!((weight - expected).abs() < 1e-12);
    }
}
