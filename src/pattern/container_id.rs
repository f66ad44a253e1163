// ==========================================
// 集装箱单证核对系统 - 箱号校验器
// ==========================================
// 依据: ISO 6346 - 箱主代码 + 序号 + 校验位
// 职责: 形态匹配与校验位验证两级判定
// ==========================================
// 红线: "检测到箱号形态" 与 "箱号有效" 必须区分,
// 模糊/部分识别场景允许仅形态匹配
// ==========================================

use crate::config::thresholds::{SHAPE_MATCH_WEIGHT, VALID_MATCH_WEIGHT};
use crate::domain::CellValue;
use once_cell::sync::Lazy;
use regex::Regex;

static CONTAINER_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{4}\d{7}$").expect("箱号正则非法"));

// ISO 6346 字母数值表: A=10 起,跳过 11 的倍数 (11/22/33),至 Z=38
const LETTER_VALUES: [u32; 26] = [
    10, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 34, 35,
    36, 37, 38,
];

// ==========================================
// 匹配等级
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdMatch {
    /// 不是箱号
    None,
    /// 正则过、校验位未过（部分识别）
    ShapeOnly,
    /// 正则 + 校验位均通过
    Valid,
}

/// 字母的 ISO 6346 数值
pub fn letter_value(c: char) -> Option<u32> {
    if c.is_ascii_uppercase() {
        Some(LETTER_VALUES[(c as usize) - ('A' as usize)])
    } else {
        None
    }
}

/// 计算校验位
///
/// # 参数
/// - `owner_serial`: 前 10 位（4 字母箱主代码 + 6 位序号）
///
/// # 算法
/// 位置 i (0 起) 权重 2^i,字母按数值表取值,求和 mod 11,10 映射为 0
pub fn check_digit(owner_serial: &str) -> Option<u32> {
    let chars: Vec<char> = owner_serial.chars().collect();
    if chars.len() != 10 {
        return None;
    }

    let mut sum: u64 = 0;
    for (i, c) in chars.iter().enumerate() {
        let value = if i < 4 {
            letter_value(*c)?
        } else {
            c.to_digit(10)?
        };
        sum += (value as u64) << i;
    }

    Some(((sum % 11) % 10) as u32)
}

/// 形态匹配（大小写归一后比对正则）
pub fn is_shape(raw: &str) -> bool {
    CONTAINER_ID_RE.is_match(&raw.trim().to_uppercase())
}

/// 完整有效性（形态 + 校验位）
pub fn validate(raw: &str) -> bool {
    let normalized = raw.trim().to_uppercase();
    if !CONTAINER_ID_RE.is_match(&normalized) {
        return false;
    }

    let expected = match check_digit(&normalized[..10]) {
        Some(d) => d,
        None => return false,
    };
    let actual = normalized
        .chars()
        .nth(10)
        .and_then(|c| c.to_digit(10));

    actual == Some(expected)
}

/// 单元格检测;非文本单元格一律不命中
pub fn detect(cell: &CellValue) -> IdMatch {
    let text = match cell.trimmed_text() {
        Some(t) => t,
        None => return IdMatch::None,
    };

    if !is_shape(text) {
        return IdMatch::None;
    }

    if validate(text) {
        IdMatch::Valid
    } else {
        IdMatch::ShapeOnly
    }
}

/// 列画像使用的匹配权重
pub fn match_weight(cell: &CellValue) -> f64 {
    match detect(cell) {
        IdMatch::None => 0.0,
        IdMatch::ShapeOnly => SHAPE_MATCH_WEIGHT,
        IdMatch::Valid => VALID_MATCH_WEIGHT,
    }
}
