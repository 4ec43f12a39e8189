//! 網片規格模型

use serde::{Deserialize, Serialize};

use crate::profile::ProfileSpec;
use crate::{CostError, Result};

/// 網片類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelFamily {
    /// 單線折彎網片
    Single,
    /// 雙線網片
    Double,
    /// 防爬網片
    Security,
}

impl PanelFamily {
    /// 規格代碼前綴
    pub fn code(&self) -> &'static str {
        match self {
            PanelFamily::Single => "SGL",
            PanelFamily::Double => "DBL",
            PanelFamily::Security => "SEC",
        }
    }

    /// 由名稱解析（不分大小寫），未知類型回傳 `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "single" | "sgl" => Some(PanelFamily::Single),
            "double" | "dbl" => Some(PanelFamily::Double),
            "security" | "sec" => Some(PanelFamily::Security),
            _ => None,
        }
    }
}

/// 網片規格
///
/// 網孔間距與面板尺寸使用相同長度單位（cm），
/// 例如 20 × 5 表示 200 mm × 50 mm 的網孔。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    /// 網片類型
    pub family: PanelFamily,

    /// 高度（cm）
    pub height_cm: f64,

    /// 寬度（cm）
    pub width_cm: f64,

    /// 直線線徑（mm）
    pub vertical_wire_mm: f64,

    /// 橫線線徑（mm）
    pub horizontal_wire_mm: f64,

    /// 直向網孔間距
    pub vertical_spacing: f64,

    /// 橫向網孔間距
    pub horizontal_spacing: f64,

    /// 外部指定的折彎數（未指定時由高度推導）
    pub bend_count: Option<u32>,

    /// 外部指定的折彎筋數（未指定時由高度推導）
    pub bend_rod_count: Option<u32>,

    /// 成套銷售時搭配的立柱
    pub set_profile: Option<ProfileSpec>,
}

impl PanelSpec {
    /// 創建新的網片規格
    pub fn new(
        family: PanelFamily,
        height_cm: f64,
        width_cm: f64,
        vertical_wire_mm: f64,
        horizontal_wire_mm: f64,
    ) -> Self {
        Self {
            family,
            height_cm,
            width_cm,
            vertical_wire_mm,
            horizontal_wire_mm,
            vertical_spacing: 20.0,
            horizontal_spacing: 5.0,
            bend_count: None,
            bend_rod_count: None,
            set_profile: None,
        }
    }

    /// 建構器模式：設置網孔間距
    pub fn with_mesh(mut self, vertical_spacing: f64, horizontal_spacing: f64) -> Self {
        self.vertical_spacing = vertical_spacing;
        self.horizontal_spacing = horizontal_spacing;
        self
    }

    /// 建構器模式：指定折彎數與折彎筋數
    pub fn with_bends(mut self, bend_count: u32, bend_rod_count: u32) -> Self {
        self.bend_count = Some(bend_count);
        self.bend_rod_count = Some(bend_rod_count);
        self
    }

    /// 建構器模式：設置成套立柱
    pub fn with_set_profile(mut self, profile: ProfileSpec) -> Self {
        self.set_profile = Some(profile);
        self
    }

    /// 規格代碼（僅供顯示與追溯，不保證唯一）
    ///
    /// 格式：`類型-直徑x橫徑-高x寬-直距x橫距[-B折彎R筋]`
    pub fn code(&self) -> String {
        let mut code = format!(
            "{}-{}x{}-{}x{}-{}x{}",
            self.family.code(),
            format_number(self.vertical_wire_mm),
            format_number(self.horizontal_wire_mm),
            format_number(self.height_cm),
            format_number(self.width_cm),
            format_number(self.vertical_spacing),
            format_number(self.horizontal_spacing),
        );
        if let (Some(bends), Some(rods)) = (self.bend_count, self.bend_rod_count) {
            code.push_str(&format!("-B{bends}R{rods}"));
        }
        code
    }

    /// 檢查尺寸是否為非負有限值
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("height_cm", self.height_cm),
            ("width_cm", self.width_cm),
            ("vertical_wire_mm", self.vertical_wire_mm),
            ("horizontal_wire_mm", self.horizontal_wire_mm),
            ("vertical_spacing", self.vertical_spacing),
            ("horizontal_spacing", self.horizontal_spacing),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CostError::InvalidDimension { field, value });
            }
        }

        if let Some(profile) = &self.set_profile {
            profile.validate()?;
        }

        Ok(())
    }
}

/// 整數不帶小數，其餘去除尾端的 0
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{value:.3}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_code() {
        let panel =
            PanelSpec::new(PanelFamily::Single, 100.0, 250.0, 4.0, 4.0).with_mesh(20.0, 5.0);
        assert_eq!(panel.code(), "SGL-4x4-100x250-20x5");

        let panel = panel.with_bends(2, 2);
        assert_eq!(panel.code(), "SGL-4x4-100x250-20x5-B2R2");

        let double =
            PanelSpec::new(PanelFamily::Double, 183.0, 250.0, 4.5, 6.0).with_mesh(20.0, 5.0);
        assert_eq!(double.code(), "DBL-4.5x6-183x250-20x5");
    }

    #[test]
    fn test_validate_rejects_negative_dimension() {
        let panel = PanelSpec::new(PanelFamily::Double, -10.0, 250.0, 5.0, 6.0);
        match panel.validate() {
            Err(CostError::InvalidDimension { field, .. }) => assert_eq!(field, "height_cm"),
            other => panic!("unexpected: {other:?}"),
        }

        let panel = PanelSpec::new(PanelFamily::Double, 100.0, f64::NAN, 5.0, 6.0);
        assert!(panel.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_zero() {
        let panel = PanelSpec::new(PanelFamily::Single, 0.0, 0.0, 0.0, 0.0).with_mesh(0.0, 0.0);
        assert!(panel.validate().is_ok());
    }

    #[test]
    fn test_parse_family() {
        assert_eq!(PanelFamily::parse("Double"), Some(PanelFamily::Double));
        assert_eq!(PanelFamily::parse(" sec "), Some(PanelFamily::Security));
        assert_eq!(PanelFamily::parse("triple"), None);
    }
}
