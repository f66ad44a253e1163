// ==========================================
// 集装箱单证核对系统 - 积载位置校验器
// ==========================================
// 依据: Reorder_Engine_Spec_v0.2.md - 2. BBRRTT 位置键
// 职责: 数字形态 (BBRRTT) 与口语形态 (Hold/Bay/Tier) 解析
// 规范化: 去分隔符,左侧补零/截断为恰好 6 位
// ==========================================

use crate::domain::CellValue;
use once_cell::sync::Lazy;
use regex::Regex;

pub const BAY_MIN: u32 = 1;
pub const BAY_MAX: u32 = 999;
pub const ROW_MIN: u32 = 1;
pub const ROW_MAX: u32 = 99;
pub const TIER_MIN: u32 = 1;
pub const TIER_MAX: u32 = 99;

// 口语形态: "Hold 2 Bay 14 Row 3 Tier 82",Hold/Row 可缺省
static VERBAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:HOLD\s*\w+\s+)?BAY\s*(\d{1,3})\s+(?:ROW\s*(\d{1,2})\s+)?TIER\s*(\d{1,2})$",
    )
    .expect("积载口语正则非法")
});

// ==========================================
// 积载位置 (Bay-Row-Tier)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StowagePosition {
    pub bay: u32,
    pub row: u32,
    pub tier: u32,
}

impl StowagePosition {
    fn checked(bay: u32, row: u32, tier: u32) -> Option<Self> {
        if !(BAY_MIN..=BAY_MAX).contains(&bay) {
            return None;
        }
        if !(ROW_MIN..=ROW_MAX).contains(&row) {
            return None;
        }
        if !(TIER_MIN..=TIER_MAX).contains(&tier) {
            return None;
        }
        Some(Self { bay, row, tier })
    }

    /// 口语形态缺省 Row 时 row 取 0（Hold 舱内位置由 Bay 承载）
    fn checked_verbal(bay: u32, row: Option<u32>, tier: u32) -> Option<Self> {
        if !(BAY_MIN..=BAY_MAX).contains(&bay) {
            return None;
        }
        if let Some(r) = row {
            if !(ROW_MIN..=ROW_MAX).contains(&r) {
                return None;
            }
        }
        if !(TIER_MIN..=TIER_MAX).contains(&tier) {
            return None;
        }
        Some(Self {
            bay,
            row: row.unwrap_or(0),
            tier,
        })
    }

    /// 规范显示形态,Bay 两位（≥100 时三位）
    pub fn display_key(&self) -> String {
        format!("{:02}{:02}{:02}", self.bay, self.row, self.tier)
    }
}

/// 剥离分隔符（`.` 空格 `-`）后的纯数字串
fn strip_separators(raw: &str) -> Option<String> {
    let mut digits = String::new();
    for c in raw.trim().chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if c == '.' || c == ' ' || c == '-' {
            continue;
        } else {
            return None;
        }
    }
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// 解析积载位置（数字形态或口语形态）
pub fn parse_str(raw: &str) -> Option<StowagePosition> {
    let trimmed = raw.trim();

    // 数字形态: 去分隔符后 5-7 位,从右侧拆 Tier/Row,余下为 Bay
    if let Some(digits) = strip_separators(trimmed) {
        if (5..=7).contains(&digits.len()) {
            let split_tier = digits.len() - 2;
            let split_row = digits.len() - 4;
            let bay: u32 = digits[..split_row].parse().ok()?;
            let row: u32 = digits[split_row..split_tier].parse().ok()?;
            let tier: u32 = digits[split_tier..].parse().ok()?;
            return StowagePosition::checked(bay, row, tier);
        }
        return None;
    }

    // 口语形态
    let caps = VERBAL_RE.captures(trimmed)?;
    let bay: u32 = caps.get(1)?.as_str().parse().ok()?;
    let row: Option<u32> = caps.get(2).and_then(|m| m.as_str().parse().ok());
    let tier: u32 = caps.get(3)?.as_str().parse().ok()?;
    StowagePosition::checked_verbal(bay, row, tier)
}

/// 单元格解析（数值单元格走规范字符串视图）
pub fn parse(cell: &CellValue) -> Option<StowagePosition> {
    let text = cell.canonical_string()?;
    parse_str(&text)
}

/// 列画像使用的匹配权重
pub fn match_weight(cell: &CellValue) -> f64 {
    if parse(cell).is_some() {
        1.0
    } else {
        0.0
    }
}

/// 原始积载值 → 规范 6 位键
///
/// 去除所有非数字字符;不足 6 位左侧补零,超过 6 位保留右侧 6 位
/// （Row/Tier 永不丢失,Bay 百位在超长时舍弃）
pub fn normalize_key(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let key = if digits.len() > 6 {
        digits[digits.len() - 6..].to_string()
    } else {
        format!("{:0>6}", digits)
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted() {
        let pos = parse_str("12.34.56").unwrap();
        assert_eq!((pos.bay, pos.row, pos.tier), (12, 34, 56));
    }

    #[test]
    fn test_parse_three_digit_bay() {
        let pos = parse_str("102 03 82").unwrap();
        assert_eq!((pos.bay, pos.row, pos.tier), (102, 3, 82));
    }

    #[test]
    fn test_parse_bare_digits() {
        let pos = parse_str("020105").unwrap();
        assert_eq!((pos.bay, pos.row, pos.tier), (2, 1, 5));
    }

    #[test]
    fn test_parse_number_cell() {
        // Excel 常把积载位读成数值
        let pos = parse(&CellValue::Number(120382.0)).unwrap();
        assert_eq!((pos.bay, pos.row, pos.tier), (12, 3, 82));
    }

    #[test]
    fn test_parse_verbal_form() {
        let pos = parse_str("Hold 2 Bay 14 Row 3 Tier 82").unwrap();
        assert_eq!((pos.bay, pos.row, pos.tier), (14, 3, 82));

        let pos = parse_str("bay 7 tier 4").unwrap();
        assert_eq!((pos.bay, pos.row, pos.tier), (7, 0, 4));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        // row 0 数字形态非法
        assert!(parse_str("120082").is_none());
        // tier 0 非法
        assert!(parse_str("120300").is_none());
        assert!(parse_str("position").is_none());
    }

    #[test]
    fn test_normalize_key_pads_and_truncates() {
        assert_eq!(normalize_key("12.34.56"), Some("123456".to_string()));
        assert_eq!(normalize_key("20105"), Some("020105".to_string()));
        // 7 位保留右侧 6 位
        assert_eq!(normalize_key("1020382"), Some("020382".to_string()));
        assert_eq!(normalize_key("no digits"), None);
    }

    #[test]
    fn test_normalize_idempotent() {
        // 性质: 规范化结果再次规范化不变
        let key = normalize_key("12.34.56").unwrap();
        assert_eq!(normalize_key(&key), Some(key.clone()));
    }
}
