//! 變數解析
//!
//! 將宿主提供的扁平鍵值（數字或字串）轉為 `Decimal`。
//!
//! 數字字串的規則：
//! - 逗號一律視為小數點，不視為千分位（`"1,5"` → 1.5，`"1.234,5"` → 1234.5）
//! - 無逗號且出現多個點時，點視為千分位（`"1.234.567"` → 1234567）
//! - 空白、`'` 與 `_` 會被移除
//! - 空值、缺值或無法解析時使用呼叫端提供的預設值，並記錄於警告清單

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 原始變數組（欄位名稱 → 數字或字串）
pub type RawBundle = BTreeMap<String, Value>;

/// 解析地區格式的數字字串，失敗時回傳 `default`
pub fn parse_locale_number(raw: &str, default: Decimal) -> Decimal {
    parse_locale(raw).unwrap_or(default)
}

fn parse_locale(raw: &str) -> Option<Decimal> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'' && *c != '_')
        .collect();

    if compact.is_empty() {
        return None;
    }

    let normalized = if compact.contains(',') {
        if compact.matches(',').count() > 1 {
            return None;
        }
        compact.replace('.', "").replace(',', ".")
    } else if compact.matches('.').count() > 1 {
        compact.replace('.', "")
    } else {
        compact
    };

    Decimal::from_str(&normalized)
        .ok()
        .or_else(|| Decimal::from_scientific(&normalized).ok())
}

/// 欄位被套用預設值的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultReason {
    /// 欄位不存在
    Missing,
    /// 欄位為空字串或 null
    Empty,
    /// 欄位無法解析為數字
    Unparseable,
}

/// 被套用預設值的欄位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultedField {
    /// 變數組名稱（general / panel / profile）
    pub bundle: String,
    /// 欄位名稱
    pub field: String,
    /// 原因
    pub reason: DefaultReason,
}

/// 解析結果：值與被套用預設值的欄位
#[derive(Debug, Clone)]
pub struct Resolution<T> {
    pub values: T,
    pub defaulted: Vec<DefaultedField>,
}

impl<T> Resolution<T> {
    /// 是否所有必要欄位都有有效值
    pub fn is_complete(&self) -> bool {
        self.defaulted.is_empty()
    }

    /// 被套用預設值的欄位名稱
    pub fn defaulted_fields(&self) -> Vec<String> {
        self.defaulted
            .iter()
            .map(|d| format!("{}.{}", d.bundle, d.field))
            .collect()
    }
}

/// 已解析的變數組
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBundle {
    values: BTreeMap<String, Decimal>,
}

impl ResolvedBundle {
    /// 取得欄位值，不存在時為 0
    pub fn get(&self, field: &str) -> Decimal {
        self.values.get(field).copied().unwrap_or(Decimal::ZERO)
    }

    /// 欄位是否存在
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 解析單一變數組
///
/// 必要欄位一定會出現在結果中（無效時為 `default`），
/// 其餘欄位只在可解析時保留。
pub fn resolve_bundle(
    bundle_name: &str,
    raw: &RawBundle,
    required: &[&str],
    default: Decimal,
) -> Resolution<ResolvedBundle> {
    let mut values = BTreeMap::new();
    let mut defaulted = Vec::new();

    for (field, value) in raw {
        if let Some(parsed) = value_to_decimal(value) {
            values.insert(field.clone(), parsed);
        }
    }

    for &field in required {
        if values.contains_key(field) {
            continue;
        }

        let reason = match raw.get(field) {
            None => DefaultReason::Missing,
            Some(Value::Null) => DefaultReason::Empty,
            Some(Value::String(s)) if s.trim().is_empty() => DefaultReason::Empty,
            Some(_) => DefaultReason::Unparseable,
        };

        tracing::warn!(
            "變數 {}.{} 無有效值（{:?}），使用預設值 {}",
            bundle_name,
            field,
            reason,
            default
        );

        values.insert(field.to_string(), default);
        defaulted.push(DefaultedField {
            bundle: bundle_name.to_string(),
            field: field.to_string(),
            reason,
        });
    }

    Resolution {
        values: ResolvedBundle { values },
        defaulted,
    }
}

fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_locale(&n.to_string()),
        Value::String(s) => parse_locale(s),
        _ => None,
    }
}
