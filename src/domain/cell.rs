// ==========================================
// 集装箱单证核对系统 - 单元格与网格类型
// ==========================================
// 依据: Manifest_Structure_Spec_v0.2.md - 1. 数据模型
// 职责: 带标签的单元格值 + 网格访问(允许不等长行)
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CellValue - 带标签的单元格值
// ==========================================
// 红线: 校验器对变体做模式匹配,禁止隐式字符串强转
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl CellValue {
    /// 从原始字符串构造（空白 → Empty,其余 → Text）
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 文本变体的去空白内容
    pub fn trimmed_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t)
                }
            }
            _ => None,
        }
    }

    /// 数值视图（Number 直接取值,Text 尝试解析）
    pub fn numeric(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// 规范字符串视图,供模式库匹配使用
    ///
    /// - Text: 去空白
    /// - Number: 整数值不带小数点（123456.0 → "123456"）
    /// - Date/Empty: 无字符串视图
    pub fn canonical_string(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t.to_string())
                }
            }
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(format!("{}", n))
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Date(d) => write!(f, "{}", d),
            CellValue::Empty => Ok(()),
        }
    }
}

// ==========================================
// Grid - 网格(有序行序列)
// ==========================================
// 缺失单元格视为 Empty;分类阶段只读,注入阶段写副本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl Grid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// 从原始字符串行构造（文档加载器适配入口）
    pub fn from_text_rows(rows: &[Vec<&str>]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| CellValue::from_raw(c)).collect())
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 列数 = 最长行的长度
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// 读取单元格;越界返回 Empty,不报错
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// 写入单元格;必要时补齐该行（注入器专用）
    pub fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        if row >= self.rows.len() {
            return;
        }
        let r = &mut self.rows[row];
        while r.len() <= col {
            r.push(CellValue::Empty);
        }
        r[col] = value;
    }

    pub fn is_row_empty(&self, row: usize) -> bool {
        match self.rows.get(row) {
            None => true,
            Some(r) => r.iter().all(|c| match c {
                CellValue::Empty => true,
                CellValue::Text(s) => s.trim().is_empty(),
                _ => false,
            }),
        }
    }

    /// 行内非空单元格数
    pub fn non_empty_in_row(&self, row: usize) -> usize {
        match self.rows.get(row) {
            None => 0,
            Some(r) => r.iter().filter(|c| !matches!(c, CellValue::Empty)).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_blank_is_empty() {
        assert_eq!(CellValue::from_raw("   "), CellValue::Empty);
        assert_eq!(CellValue::from_raw(""), CellValue::Empty);
        assert_eq!(
            CellValue::from_raw("  ABCD  "),
            CellValue::Text("ABCD".to_string())
        );
    }

    #[test]
    fn test_canonical_string_number() {
        assert_eq!(
            CellValue::Number(123456.0).canonical_string(),
            Some("123456".to_string())
        );
        assert_eq!(
            CellValue::Number(-18.5).canonical_string(),
            Some("-18.5".to_string())
        );
    }

    #[test]
    fn test_numeric_from_text() {
        assert_eq!(CellValue::Text(" -18 ".to_string()).numeric(), Some(-18.0));
        assert_eq!(CellValue::Text("abc".to_string()).numeric(), None);
        assert_eq!(CellValue::Empty.numeric(), None);
    }

    #[test]
    fn test_grid_ragged_access() {
        let grid = Grid::from_text_rows(&[vec!["a", "b"], vec!["c"]]);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.cell(1, 1), &CellValue::Empty);
        assert_eq!(grid.cell(9, 9), &CellValue::Empty);
    }

    #[test]
    fn test_set_cell_pads_row() {
        let mut grid = Grid::from_text_rows(&[vec!["a"]]);
        grid.set_cell(0, 3, CellValue::Text("x".to_string()));
        assert_eq!(grid.cell(0, 3), &CellValue::Text("x".to_string()));
        assert_eq!(grid.cell(0, 1), &CellValue::Empty);
    }
}
