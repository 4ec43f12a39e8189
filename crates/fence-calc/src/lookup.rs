//! 產能與棧板查表
//!
//! 所有表格皆為內建常數，不可由外部配置。

use fence_core::PanelFamily;

/// 每月工作天數
pub const WORKING_DAYS_PER_MONTH: f64 = 26.0;

/// 每班有效工時
pub const HOURS_PER_SHIFT_DAY: f64 = 7.0;

/// 級距：`key <= threshold` 時取 `value`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub threshold: f64,
    pub value: f64,
}

const fn band(threshold: f64, value: f64) -> Band {
    Band { threshold, value }
}

/// 依序尋找第一個 `key <= threshold` 的級距，超出範圍時取最後一級
///
/// 空表回傳 0。
pub fn find_band(bands: &[Band], key: f64) -> f64 {
    bands
        .iter()
        .find(|b| key <= b.threshold)
        .or_else(|| bands.last())
        .map(|b| b.value)
        .unwrap_or(0.0)
}

// 每小時產量（片/h），依高度（cm）分級
const SINGLE_CAPACITY: &[Band] = &[
    band(83.0, 60.0),
    band(123.0, 50.0),
    band(173.0, 42.0),
    band(203.0, 36.0),
    band(250.0, 30.0),
];

const DOUBLE_CAPACITY: &[Band] = &[
    band(83.0, 40.0),
    band(123.0, 34.0),
    band(163.0, 28.0),
    band(203.0, 24.0),
    band(243.0, 20.0),
];

const SECURITY_CAPACITY: &[Band] = &[
    band(150.0, 24.0),
    band(200.0, 20.0),
    band(250.0, 16.0),
    band(300.0, 12.0),
];

/// 產能曲線
pub fn capacity_bands(family: PanelFamily) -> &'static [Band] {
    match family {
        PanelFamily::Single => SINGLE_CAPACITY,
        PanelFamily::Double => DOUBLE_CAPACITY,
        PanelFamily::Security => SECURITY_CAPACITY,
    }
}

/// 每小時產量（片/h）
pub fn units_per_hour(family: PanelFamily, height_cm: f64) -> f64 {
    find_band(capacity_bands(family), height_cm)
}

/// 月產能 = 時產量 × 26 天 × 7 小時 × 班次
pub fn monthly_capacity(family: PanelFamily, height_cm: f64, shift_count: f64) -> f64 {
    units_per_hour(family, height_cm) * WORKING_DAYS_PER_MONTH * HOURS_PER_SHIFT_DAY * shift_count
}

/// 支援的棧板寬度（cm）
pub const PALLET_WIDTHS: [&str; 2] = ["200", "250"];

struct PalletWidthRow {
    width: &'static str,
    heights: &'static [(&'static str, f64)],
}

struct PalletFamilyTable {
    family: PanelFamily,
    widths: &'static [PalletWidthRow],
}

// 空棧板重量（kg）：類型 → 寬度 → 高度
static PALLET_WEIGHTS: &[PalletFamilyTable] = &[
    PalletFamilyTable {
        family: PanelFamily::Single,
        widths: &[
            PalletWidthRow {
                width: "200",
                heights: &[
                    ("63", 18.0),
                    ("83", 19.0),
                    ("103", 21.0),
                    ("123", 23.0),
                    ("153", 26.0),
                    ("173", 28.0),
                    ("203", 31.0),
                ],
            },
            PalletWidthRow {
                width: "250",
                heights: &[
                    ("63", 20.0),
                    ("83", 22.0),
                    ("103", 24.0),
                    ("123", 26.0),
                    ("153", 29.0),
                    ("173", 31.0),
                    ("203", 35.0),
                ],
            },
        ],
    },
    PalletFamilyTable {
        family: PanelFamily::Double,
        widths: &[
            PalletWidthRow {
                width: "200",
                heights: &[
                    ("63", 22.0),
                    ("83", 24.0),
                    ("103", 26.0),
                    ("123", 28.0),
                    ("143", 30.0),
                    ("163", 32.0),
                    ("183", 34.0),
                    ("203", 36.0),
                ],
            },
            PalletWidthRow {
                width: "250",
                heights: &[
                    ("63", 25.0),
                    ("83", 27.0),
                    ("103", 29.0),
                    ("123", 31.0),
                    ("143", 33.0),
                    ("163", 35.0),
                    ("183", 37.0),
                    ("203", 39.0),
                ],
            },
        ],
    },
    PalletFamilyTable {
        family: PanelFamily::Security,
        widths: &[
            PalletWidthRow {
                width: "200",
                heights: &[
                    ("100", 30.0),
                    ("150", 34.0),
                    ("200", 38.0),
                    ("250", 42.0),
                    ("300", 46.0),
                ],
            },
            PalletWidthRow {
                width: "250",
                heights: &[
                    ("100", 34.0),
                    ("150", 38.0),
                    ("200", 42.0),
                    ("250", 46.0),
                    ("300", 50.0),
                ],
            },
        ],
    },
];

/// 數值轉為表格鍵（整數不帶小數點）
fn table_key(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// 尋找鍵值：先比對字串完全相同，否則取數值最接近者（距離相同時取先出現者）
pub fn nearest_key(entries: &[(&str, f64)], target: f64) -> Option<f64> {
    let key = table_key(target);
    if let Some((_, value)) = entries.iter().find(|(k, _)| *k == key) {
        return Some(*value);
    }

    let mut best: Option<(f64, f64)> = None;
    for (k, value) in entries {
        let Ok(numeric) = k.parse::<f64>() else {
            continue;
        };
        let distance = (numeric - target).abs();
        match best {
            Some((best_distance, _)) if best_distance <= distance => {}
            _ => best = Some((distance, *value)),
        }
    }
    best.map(|(_, value)| value)
}

/// 棧板寬度是否在表格內
pub fn is_supported_pallet_width(width_cm: f64) -> bool {
    PALLET_WIDTHS.contains(&table_key(width_cm).as_str())
}

/// 空棧板重量（kg）
///
/// 只支援寬度 200 與 250，其他寬度回傳 0。
pub fn empty_pallet_weight(family: PanelFamily, width_cm: f64, height_cm: f64) -> f64 {
    let width = table_key(width_cm);

    PALLET_WEIGHTS
        .iter()
        .find(|t| t.family == family)
        .and_then(|t| t.widths.iter().find(|row| row.width == width))
        .and_then(|row| nearest_key(row.heights, height_cm))
        .unwrap_or(0.0)
}

/// 棧板底座高度（cm）
pub const PALLET_BASE_HEIGHT_CM: f64 = 15.0;

/// 每片堆疊高度係數的插值區間
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackingRange {
    pub low_height_cm: f64,
    pub high_height_cm: f64,
    pub low_coefficient: f64,
    pub high_coefficient: f64,
}

impl PackingRange {
    /// 線性插值，區間外夾在端點
    pub fn coefficient(&self, height_cm: f64) -> f64 {
        if height_cm <= self.low_height_cm {
            return self.low_coefficient;
        }
        if height_cm >= self.high_height_cm {
            return self.high_coefficient;
        }
        let span = self.high_height_cm - self.low_height_cm;
        if span <= 0.0 {
            return self.low_coefficient;
        }
        let t = (height_cm - self.low_height_cm) / span;
        self.low_coefficient + t * (self.high_coefficient - self.low_coefficient)
    }
}

/// 各類型的堆疊係數區間（cm/片）
pub fn packing_range(family: PanelFamily) -> PackingRange {
    match family {
        PanelFamily::Single => PackingRange {
            low_height_cm: 63.0,
            high_height_cm: 203.0,
            low_coefficient: 0.45,
            high_coefficient: 0.60,
        },
        PanelFamily::Double => PackingRange {
            low_height_cm: 63.0,
            high_height_cm: 203.0,
            low_coefficient: 1.60,
            high_coefficient: 1.90,
        },
        PanelFamily::Security => PackingRange {
            low_height_cm: 100.0,
            high_height_cm: 300.0,
            low_coefficient: 1.10,
            high_coefficient: 1.40,
        },
    }
}
