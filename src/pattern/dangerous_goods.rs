// ==========================================
// 集装箱单证核对系统 - 危险品校验器
// ==========================================
// 依据: Column_Role_Spec_v0.4.md - 3.4 危险品列识别
// 职责: UN 编号 (4 位数字,可带 UN 前缀) + IMDG 等级 (1-9,可带一位小数)
// ==========================================

use crate::domain::CellValue;
use once_cell::sync::Lazy;
use regex::Regex;

// "1203" / "UN1203" / "UN 1203"
static UN_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:UN\s*)?(\d{4})$").expect("UN 编号正则非法"));

// "3" / "4.3" / "1.4"
static DG_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9](?:\.\d)?$").expect("DG 等级正则非法"));

/// 解析 UN 编号,返回 4 位数字串
pub fn parse_un_number(cell: &CellValue) -> Option<String> {
    let text = cell.canonical_string()?;
    let caps = UN_NUMBER_RE.captures(text.trim())?;
    Some(caps.get(1)?.as_str().to_string())
}

/// 解析 DG 等级（1-9,可带一位小数）
pub fn parse_dg_class(cell: &CellValue) -> Option<String> {
    let text = cell.canonical_string()?;
    let trimmed = text.trim();
    if DG_CLASS_RE.is_match(trimmed) {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// UN 编号匹配权重
pub fn un_match_weight(cell: &CellValue) -> f64 {
    if parse_un_number(cell).is_some() {
        1.0
    } else {
        0.0
    }
}

/// DG 等级匹配权重
pub fn class_match_weight(cell: &CellValue) -> f64 {
    if parse_dg_class(cell).is_some() {
        1.0
    } else {
        0.0
    }
}
