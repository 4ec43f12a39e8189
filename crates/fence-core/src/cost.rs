//! 成本結果模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::{checked_div, checked_mul, checked_sum};
use crate::Result;

/// 成本基礎
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostBasis {
    /// 未塗裝
    Bare,
    /// 已塗裝
    Painted,
    /// 成套（未塗裝）
    SettedUnpainted,
    /// 成套（已塗裝）
    SettedPainted,
}

impl CostBasis {
    pub const ALL: [CostBasis; 4] = [
        CostBasis::Bare,
        CostBasis::Painted,
        CostBasis::SettedUnpainted,
        CostBasis::SettedPainted,
    ];

    fn index(self) -> usize {
        match self {
            CostBasis::Bare => 0,
            CostBasis::Painted => 1,
            CostBasis::SettedUnpainted => 2,
            CostBasis::SettedPainted => 3,
        }
    }
}

/// 計量單位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostUnit {
    /// 每片 / 每支
    Piece,
    /// 每平方公尺
    SquareMeter,
    /// 每公斤
    Kilogram,
}

impl CostUnit {
    pub const ALL: [CostUnit; 3] = [CostUnit::Piece, CostUnit::SquareMeter, CostUnit::Kilogram];

    fn index(self) -> usize {
        match self {
            CostUnit::Piece => 0,
            CostUnit::SquareMeter => 1,
            CostUnit::Kilogram => 2,
        }
    }
}

/// 幣別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Usd,
    Eur,
    /// 當地貨幣（土耳其里拉）
    Try,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Try];
}

/// 匯率快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRates {
    /// 1 USD = ? 當地貨幣
    pub usd_local: Decimal,
    /// 1 EUR = ? USD
    pub eur_usd: Decimal,
}

impl ExchangeRates {
    pub fn new(usd_local: Decimal, eur_usd: Decimal) -> Self {
        Self { usd_local, eur_usd }
    }

    /// EUR = USD / (EUR/USD)，匯率為 0 時為 0
    pub fn usd_to_eur(&self, usd: Decimal) -> Result<Decimal> {
        checked_div(usd, self.eur_usd, "usd_to_eur")
    }

    /// TRY = USD × (USD/TRY)
    pub fn usd_to_local(&self, usd: Decimal) -> Result<Decimal> {
        checked_mul(usd, self.usd_local, "usd_to_local")
    }
}

/// 同一金額的三種幣別表示
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub usd: Decimal,
    pub eur: Decimal,
    /// 當地貨幣
    pub tl: Decimal,
}

impl CurrencyAmount {
    /// 由美元金額換算
    pub fn from_usd(usd: Decimal, rates: &ExchangeRates) -> Result<Self> {
        Ok(Self {
            usd,
            eur: rates.usd_to_eur(usd)?,
            tl: rates.usd_to_local(usd)?,
        })
    }

    pub fn get(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Usd => self.usd,
            Currency::Eur => self.eur,
            Currency::Try => self.tl,
        }
    }
}

/// 成本矩陣：成本基礎 × 計量單位 → 三幣別金額
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostMatrix {
    cells: [[CurrencyAmount; 3]; 4],
}

impl CostMatrix {
    /// 由美元矩陣（索引依 `CostBasis::ALL` × `CostUnit::ALL`）換算建立
    pub fn from_usd(usd: [[Decimal; 3]; 4], rates: &ExchangeRates) -> Result<Self> {
        let mut cells = [[CurrencyAmount::default(); 3]; 4];
        for (row, usd_row) in cells.iter_mut().zip(usd.iter()) {
            for (cell, value) in row.iter_mut().zip(usd_row.iter()) {
                *cell = CurrencyAmount::from_usd(*value, rates)?;
            }
        }
        Ok(Self { cells })
    }

    pub fn get(&self, basis: CostBasis, unit: CostUnit) -> CurrencyAmount {
        self.cells[basis.index()][unit.index()]
    }

    pub fn value(&self, basis: CostBasis, unit: CostUnit, currency: Currency) -> Decimal {
        self.get(basis, unit).get(currency)
    }

    /// 依序列出所有格（基礎、單位、金額）
    pub fn entries(&self) -> impl Iterator<Item = (CostBasis, CostUnit, CurrencyAmount)> + '_ {
        CostBasis::ALL.into_iter().flat_map(move |basis| {
            CostUnit::ALL
                .into_iter()
                .map(move |unit| (basis, unit, self.get(basis, unit)))
        })
    }
}

/// 成本明細（美元，每片 / 每支）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// 裁切、焊接人工
    pub labor: Decimal,
    pub welding_electricity: Decimal,
    pub cutting_electricity: Decimal,
    pub overhead: Decimal,
    /// 線材或管材
    pub material: Decimal,

    pub paint_material: Decimal,
    pub paint_electricity: Decimal,
    pub gas: Decimal,
    pub paint_labor: Decimal,

    /// 立柱配件（法蘭、螺絲、夾片、膨脹螺栓、蓋帽）
    pub accessories: Decimal,
}

impl CostBreakdown {
    /// 未塗裝成本
    pub fn bare(&self) -> Result<Decimal> {
        checked_sum(
            [
                self.labor,
                self.welding_electricity,
                self.cutting_electricity,
                self.overhead,
                self.material,
            ],
            "bare",
        )
    }

    /// 塗裝附加成本
    pub fn paint_component(&self) -> Result<Decimal> {
        checked_sum(
            [self.paint_material, self.paint_electricity, self.gas, self.paint_labor],
            "paint_component",
        )
    }
}

/// 計算對象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Panel,
    Profile,
}

/// 單一規格的成本結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    /// 規格代碼
    pub spec_code: String,

    pub kind: ItemKind,

    /// 成本矩陣
    pub matrix: CostMatrix,

    /// 成本明細
    pub breakdown: CostBreakdown,

    /// 塗裝附加成本（USD/片）
    pub paint_component_usd: Decimal,

    /// 成套附加成本，未塗裝（USD/片）
    pub set_component_unpainted_usd: Decimal,

    /// 成套附加成本，已塗裝（USD/片）
    pub set_component_painted_usd: Decimal,

    /// 使用的匯率
    pub rates: ExchangeRates,
}

impl CostResult {
    pub fn value(&self, basis: CostBasis, unit: CostUnit, currency: Currency) -> Decimal {
        self.matrix.value(basis, unit, currency)
    }

    pub fn amount(&self, basis: CostBasis, unit: CostUnit) -> CurrencyAmount {
        self.matrix.get(basis, unit)
    }

    /// 每片美元成本
    pub fn piece_usd(&self, basis: CostBasis) -> Decimal {
        self.matrix.value(basis, CostUnit::Piece, Currency::Usd)
    }
}
