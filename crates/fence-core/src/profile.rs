//! 立柱規格模型

use serde::{Deserialize, Serialize};

use crate::panel::format_number;
use crate::{CostError, Result};

/// 立柱材料單價的選擇（鍍鋅管 / 黑鐵管）
///
/// 由呼叫端在計算前決定，並明確傳入成本組合。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfilePriceBasis {
    #[default]
    Galvanized,
    NonGalvanized,
}

impl From<bool> for ProfilePriceBasis {
    fn from(galvanized: bool) -> Self {
        if galvanized {
            ProfilePriceBasis::Galvanized
        } else {
            ProfilePriceBasis::NonGalvanized
        }
    }
}

/// 立柱規格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    /// 高度（cm）
    pub height_cm: f64,

    /// 是否鍍鋅（影響鍍層重量）
    pub galvanized: bool,

    /// 是否帶法蘭
    pub flanged: bool,

    /// 每套支數
    pub unit_count: u32,

    pub screw_count: u32,
    pub clip_count: u32,
    pub anchor_count: u32,
    pub cap_count: u32,
}

impl ProfileSpec {
    /// 創建新的立柱規格（每套 1 支，無配件）
    pub fn new(height_cm: f64, galvanized: bool, flanged: bool) -> Self {
        Self {
            height_cm,
            galvanized,
            flanged,
            unit_count: 1,
            screw_count: 0,
            clip_count: 0,
            anchor_count: 0,
            cap_count: 0,
        }
    }

    /// 建構器模式：設置每套支數
    pub fn with_unit_count(mut self, unit_count: u32) -> Self {
        self.unit_count = unit_count;
        self
    }

    /// 建構器模式：設置配件數量
    pub fn with_accessories(mut self, screws: u32, clips: u32, anchors: u32, caps: u32) -> Self {
        self.screw_count = screws;
        self.clip_count = clips;
        self.anchor_count = anchors;
        self.cap_count = caps;
        self
    }

    /// 規格代碼，例如 `PRF-200-G-F`
    pub fn code(&self) -> String {
        let mut code = format!(
            "PRF-{}-{}",
            format_number(self.height_cm),
            if self.galvanized { "G" } else { "B" }
        );
        if self.flanged {
            code.push_str("-F");
        }
        code
    }

    pub fn validate(&self) -> Result<()> {
        if !self.height_cm.is_finite() || self.height_cm < 0.0 {
            return Err(CostError::InvalidDimension {
                field: "profile.height_cm",
                value: self.height_cm,
            });
        }
        Ok(())
    }
}
