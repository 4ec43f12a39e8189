//! 計算變數組
//!
//! 三組變數（一般、網片、立柱）在一次計算中保持不變。
//! 工資、電價、天然氣價為當地貨幣，其餘金額為美元。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cost::ExchangeRates;
use crate::numeric::checked_div;
use crate::panel::PanelFamily;
use crate::profile::ProfilePriceBasis;
use crate::resolution::{resolve_bundle, RawBundle, Resolution, ResolvedBundle};
use crate::Result;

/// 可從原始鍵值解析的變數組
pub trait VariableBundle: Sized {
    /// 變數組名稱（用於警告訊息）
    const NAME: &'static str;

    /// 必要欄位
    const REQUIRED_FIELDS: &'static [&'static str];

    /// 由已解析的值建立
    fn from_resolved(bundle: &ResolvedBundle) -> Self;

    /// 解析原始鍵值，無效欄位使用 `default`
    fn resolve(raw: &RawBundle, default: Decimal) -> Resolution<Self> {
        let resolution = resolve_bundle(Self::NAME, raw, Self::REQUIRED_FIELDS, default);
        Resolution {
            values: Self::from_resolved(&resolution.values),
            defaulted: resolution.defaulted,
        }
    }
}

/// 一般變數
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralVariables {
    /// 油漆單價（USD/kg）
    pub paint_price_per_kg: Decimal,

    /// 電價（當地貨幣/kWh）
    pub electricity_price_per_kwh: Decimal,

    /// 天然氣價（當地貨幣/Sm³）
    pub gas_price_per_m3: Decimal,

    /// 固定管銷費用（USD/m² 網片）
    pub fixed_overhead_per_unit: Decimal,

    /// 平均月薪（當地貨幣）
    pub average_wage: Decimal,

    /// 美元兌當地貨幣匯率（1 USD = ? TRY）
    pub usd_local_rate: Decimal,

    /// 歐元兌美元匯率（1 EUR = ? USD）
    pub eur_usd_rate: Decimal,
}

impl GeneralVariables {
    pub fn exchange_rates(&self) -> ExchangeRates {
        ExchangeRates::new(self.usd_local_rate, self.eur_usd_rate)
    }

    /// 當地貨幣換算為美元，匯率為 0 時回傳 0
    pub fn local_to_usd(&self, amount: Decimal) -> Result<Decimal> {
        checked_div(amount, self.usd_local_rate, "local_to_usd")
    }

    pub fn wage_usd(&self) -> Result<Decimal> {
        self.local_to_usd(self.average_wage)
    }

    pub fn electricity_usd(&self) -> Result<Decimal> {
        self.local_to_usd(self.electricity_price_per_kwh)
    }

    pub fn gas_usd(&self) -> Result<Decimal> {
        self.local_to_usd(self.gas_price_per_m3)
    }
}

impl VariableBundle for GeneralVariables {
    const NAME: &'static str = "general";

    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "paint_price_per_kg",
        "electricity_price_per_kwh",
        "gas_price_per_m3",
        "fixed_overhead_per_unit",
        "average_wage",
        "usd_local_rate",
        "eur_usd_rate",
    ];

    fn from_resolved(bundle: &ResolvedBundle) -> Self {
        Self {
            paint_price_per_kg: bundle.get("paint_price_per_kg"),
            electricity_price_per_kwh: bundle.get("electricity_price_per_kwh"),
            gas_price_per_m3: bundle.get("gas_price_per_m3"),
            fixed_overhead_per_unit: bundle.get("fixed_overhead_per_unit"),
            average_wage: bundle.get("average_wage"),
            usd_local_rate: bundle.get("usd_local_rate"),
            eur_usd_rate: bundle.get("eur_usd_rate"),
        }
    }
}

/// 網片產線變數
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelVariables {
    /// 裁切站人數
    pub cutting_workers: Decimal,
    /// 焊接站人數
    pub welding_workers: Decimal,
    /// 塗裝站人數
    pub painting_workers: Decimal,

    /// 裁切站班次
    pub cutting_shifts: Decimal,
    /// 焊接站班次
    pub welding_shifts: Decimal,
    /// 塗裝站班次
    pub painting_shifts: Decimal,

    /// 焊接機耗電（kWh/h）
    pub welding_kwh: Decimal,
    /// 裁切機耗電（kWh/h）
    pub cutting_kwh: Decimal,
    /// 塗裝線耗電（kWh/h）
    pub painting_kwh: Decimal,
    /// 烤爐天然氣用量（Sm³/h）
    pub gas_m3: Decimal,

    /// 單層網片油漆用量（kg/m²）
    pub paint_per_m2_single: Decimal,
    /// 雙線網片油漆用量（kg/m²）
    pub paint_per_m2_double: Decimal,
    /// 防爬網片油漆用量（kg/m²）
    pub paint_per_m2_security: Decimal,

    /// 線材單價（USD/ton）
    pub wire_price_per_ton: Decimal,
}

impl PanelVariables {
    /// 依網片類型取得油漆用量
    pub fn paint_per_m2(&self, family: PanelFamily) -> Decimal {
        match family {
            PanelFamily::Single => self.paint_per_m2_single,
            PanelFamily::Double => self.paint_per_m2_double,
            PanelFamily::Security => self.paint_per_m2_security,
        }
    }

    /// 線材單價（USD/kg）
    pub fn wire_price_per_kg(&self) -> Decimal {
        self.wire_price_per_ton / Decimal::ONE_THOUSAND
    }
}

impl VariableBundle for PanelVariables {
    const NAME: &'static str = "panel";

    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "cutting_workers",
        "welding_workers",
        "painting_workers",
        "cutting_shifts",
        "welding_shifts",
        "painting_shifts",
        "welding_kwh",
        "cutting_kwh",
        "painting_kwh",
        "gas_m3",
        "paint_per_m2_single",
        "paint_per_m2_double",
        "paint_per_m2_security",
        "wire_price_per_ton",
    ];

    fn from_resolved(bundle: &ResolvedBundle) -> Self {
        Self {
            cutting_workers: bundle.get("cutting_workers"),
            welding_workers: bundle.get("welding_workers"),
            painting_workers: bundle.get("painting_workers"),
            cutting_shifts: bundle.get("cutting_shifts"),
            welding_shifts: bundle.get("welding_shifts"),
            painting_shifts: bundle.get("painting_shifts"),
            welding_kwh: bundle.get("welding_kwh"),
            cutting_kwh: bundle.get("cutting_kwh"),
            painting_kwh: bundle.get("painting_kwh"),
            gas_m3: bundle.get("gas_m3"),
            paint_per_m2_single: bundle.get("paint_per_m2_single"),
            paint_per_m2_double: bundle.get("paint_per_m2_double"),
            paint_per_m2_security: bundle.get("paint_per_m2_security"),
            wire_price_per_ton: bundle.get("wire_price_per_ton"),
        }
    }
}

/// 立柱產線變數
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileVariables {
    /// 鍍鋅管單價（USD/kg）
    pub galvanized_price_per_kg: Decimal,
    /// 黑鐵管單價（USD/kg）
    pub black_price_per_kg: Decimal,

    /// 每小時產能（m²/h，以立柱表面積計）
    pub capacity_m2_per_hour: Decimal,
    /// 人數
    pub worker_count: Decimal,
    /// 班次
    pub shift_count: Decimal,

    pub welding_kwh: Decimal,
    pub cutting_kwh: Decimal,
    pub painting_kwh: Decimal,
    pub gas_m3: Decimal,

    /// 油漆用量（kg/m²）
    pub paint_per_m2: Decimal,

    // 配件單價（USD/個）
    pub flange_price: Decimal,
    pub screw_price: Decimal,
    pub clip_price: Decimal,
    pub anchor_price: Decimal,
    pub cap_price: Decimal,

    /// 斷面外寬（mm）
    pub outer_width_mm: Decimal,
    /// 斷面外高（mm）
    pub outer_height_mm: Decimal,
    /// 壁厚（mm）
    pub wall_thickness_mm: Decimal,
}

impl ProfileVariables {
    /// 依呼叫端指定的鍍鋅/黑鐵選擇單價
    pub fn price_per_kg(&self, basis: ProfilePriceBasis) -> Decimal {
        match basis {
            ProfilePriceBasis::Galvanized => self.galvanized_price_per_kg,
            ProfilePriceBasis::NonGalvanized => self.black_price_per_kg,
        }
    }
}

impl VariableBundle for ProfileVariables {
    const NAME: &'static str = "profile";

    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "galvanized_price_per_kg",
        "black_price_per_kg",
        "capacity_m2_per_hour",
        "worker_count",
        "shift_count",
        "welding_kwh",
        "cutting_kwh",
        "painting_kwh",
        "gas_m3",
        "paint_per_m2",
        "flange_price",
        "screw_price",
        "clip_price",
        "anchor_price",
        "cap_price",
        "outer_width_mm",
        "outer_height_mm",
        "wall_thickness_mm",
    ];

    fn from_resolved(bundle: &ResolvedBundle) -> Self {
        Self {
            galvanized_price_per_kg: bundle.get("galvanized_price_per_kg"),
            black_price_per_kg: bundle.get("black_price_per_kg"),
            capacity_m2_per_hour: bundle.get("capacity_m2_per_hour"),
            worker_count: bundle.get("worker_count"),
            shift_count: bundle.get("shift_count"),
            welding_kwh: bundle.get("welding_kwh"),
            cutting_kwh: bundle.get("cutting_kwh"),
            painting_kwh: bundle.get("painting_kwh"),
            gas_m3: bundle.get("gas_m3"),
            paint_per_m2: bundle.get("paint_per_m2"),
            flange_price: bundle.get("flange_price"),
            screw_price: bundle.get("screw_price"),
            clip_price: bundle.get("clip_price"),
            anchor_price: bundle.get("anchor_price"),
            cap_price: bundle.get("cap_price"),
            outer_width_mm: bundle.get("outer_width_mm"),
            outer_height_mm: bundle.get("outer_height_mm"),
            wall_thickness_mm: bundle.get("wall_thickness_mm"),
        }
    }
}
