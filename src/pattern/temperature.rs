// ==========================================
// 集装箱单证核对系统 - 温度校验器
// ==========================================
// 依据: Column_Role_Spec_v0.4.md - 3.2 温度列识别
// 职责: 数值区间 + 单位标记 + 冷藏常用区间加权
// ==========================================

use crate::config::thresholds::{TEMP_BASE_WEIGHT, TEMP_BONUS_WEIGHT};
use crate::domain::CellValue;
use once_cell::sync::Lazy;
use regex::Regex;

/// 物理上可信的温度区间（摄氏度）
pub const TEMP_MIN: f64 = -50.0;
pub const TEMP_MAX: f64 = 60.0;

/// 冷藏箱常用设定区间
pub const REEFER_BAND_MIN: f64 = -30.0;
pub const REEFER_BAND_MAX: f64 = 25.0;

// 带可选单位标记的温度文本: "-18", "-18.5°C", "4 C", "-20 deg"
static TEMP_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([+-]?\d+(?:\.\d+)?)\s*(°\s*C|℃|C|DEG(?:REES)?\s*C?)?$")
        .expect("温度正则非法")
});

/// 解析温度值,返回 (数值, 是否带单位标记)
pub fn parse(cell: &CellValue) -> Option<(f64, bool)> {
    match cell {
        CellValue::Number(n) => Some((*n, false)),
        CellValue::Text(s) => {
            let caps = TEMP_TEXT_RE.captures(s.trim())?;
            let value: f64 = caps.get(1)?.as_str().parse().ok()?;
            Some((value, caps.get(2).is_some()))
        }
        _ => None,
    }
}

/// 列画像使用的匹配权重
///
/// 区间外 → 0;区间内基础权重;带单位或落在冷藏区间 → 加成权重
pub fn match_weight(cell: &CellValue) -> f64 {
    let (value, has_unit) = match parse(cell) {
        Some(v) => v,
        None => return 0.0,
    };

    if !(TEMP_MIN..=TEMP_MAX).contains(&value) {
        return 0.0;
    }

    if has_unit || (REEFER_BAND_MIN..=REEFER_BAND_MAX).contains(&value) {
        TEMP_BONUS_WEIGHT
    } else {
        TEMP_BASE_WEIGHT
    }
}
