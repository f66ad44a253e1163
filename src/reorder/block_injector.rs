// ==========================================
// 集装箱单证核对系统 - 块内注入器
// ==========================================
// 依据: Reorder_Engine_Spec_v0.2.md - 5. 取值注入
// 职责: 把派生积载值写入块内合适单元格,不改变块形状
// ==========================================
// 策略顺序:
//   1. 覆写块内首个已是积载形态的单元格
//   2. 锚点标签单元格的右邻单元格
//   3. 块前缀行内首个空单元格（避免污染块尾备注行）
// 红线: 每块恰好写一个单元格;同值重复注入幂等
// ==========================================

use crate::domain::{Block, CellValue, Grid};
use crate::pattern::stowage;
use tracing::debug;

// 锚点标签词表(中英文),命中后写其右邻单元格
const ANCHOR_LABELS: &[&str] = &["position", "stowage", "stow", "pos", "积载", "箱位", "贝位"];

pub struct BlockInjector {
    inject_prefix_rows: usize,
}

impl BlockInjector {
    pub fn new(inject_prefix_rows: usize) -> Self {
        Self { inject_prefix_rows }
    }

    /// 向块内注入显示值(6 位积载键)
    ///
    /// # 返回
    /// - `true`: 已写入恰好一个单元格
    /// - `false`: 三种策略均无落点,块保持原样
    pub fn inject(&self, grid: &mut Grid, block: &Block, value: &str) -> bool {
        // 策略 1: 覆写首个积载形态单元格
        for row in block.start_row..block.end_row {
            let cols = grid.row(row).map(|r| r.len()).unwrap_or(0);
            for col in 0..cols {
                if stowage::parse(grid.cell(row, col)).is_some() {
                    grid.set_cell(row, col, CellValue::Text(value.to_string()));
                    debug!(container = %block.container_id, row, col, "注入: 覆写积载形态单元格");
                    return true;
                }
            }
        }

        // 策略 2: 锚点标签右邻
        for row in block.start_row..block.end_row {
            let cols = grid.row(row).map(|r| r.len()).unwrap_or(0);
            for col in 0..cols {
                if is_anchor_label(grid.cell(row, col)) {
                    grid.set_cell(row, col + 1, CellValue::Text(value.to_string()));
                    debug!(container = %block.container_id, row, col, "注入: 锚点标签右邻");
                    return true;
                }
            }
        }

        // 策略 3: 块前缀行内首个空单元格
        let prefix_end = block.end_row.min(block.start_row + self.inject_prefix_rows);
        for row in block.start_row..prefix_end {
            let cols = grid.row(row).map(|r| r.len()).unwrap_or(0);
            for col in 0..cols {
                if grid.cell(row, col).is_empty() {
                    grid.set_cell(row, col, CellValue::Text(value.to_string()));
                    debug!(container = %block.container_id, row, col, "注入: 前缀空单元格");
                    return true;
                }
            }
        }

        debug!(container = %block.container_id, "注入: 无可用落点");
        false
    }
}

fn is_anchor_label(cell: &CellValue) -> bool {
    let text = match cell.trimmed_text() {
        Some(t) => t.to_lowercase(),
        None => return false,
    };
    ANCHOR_LABELS.iter().any(|label| text == *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(start: usize, end: usize) -> Block {
        Block {
            container_id: "CSQU3054383".to_string(),
            start_row: start,
            end_row: end,
        }
    }

    fn injector() -> BlockInjector {
        BlockInjector::new(3)
    }

    #[test]
    fn test_strategy1_overwrite_stowage_shaped() {
        let mut grid = Grid::from_text_rows(&[
            vec!["CSQU3054383", "12.03.82"],
            vec!["", "remark"],
        ]);
        assert!(injector().inject(&mut grid, &block(0, 2), "140382"));
        assert_eq!(grid.cell(0, 1), &CellValue::Text("140382".to_string()));
        // 其余单元格不受影响
        assert_eq!(grid.cell(1, 1), &CellValue::Text("remark".to_string()));
    }

    #[test]
    fn test_strategy2_anchor_adjacent() {
        let mut grid = Grid::from_text_rows(&[
            vec!["CSQU3054383", "cargo"],
            vec!["Position", "tbd"],
        ]);
        assert!(injector().inject(&mut grid, &block(0, 2), "140382"));
        assert_eq!(grid.cell(1, 1), &CellValue::Text("140382".to_string()));
    }

    #[test]
    fn test_strategy3_first_empty_in_prefix() {
        let mut grid = Grid::from_text_rows(&[
            vec!["CSQU3054383", "cargo", ""],
            vec!["x", "y", "z"],
        ]);
        assert!(injector().inject(&mut grid, &block(0, 2), "140382"));
        assert_eq!(grid.cell(0, 2), &CellValue::Text("140382".to_string()));
    }

    #[test]
    fn test_strategy3_respects_prefix_bound() {
        // 空单元格只在块前 3 行内寻找,块尾备注行不写
        let mut grid = Grid::from_text_rows(&[
            vec!["CSQU3054383", "a"],
            vec!["b", "c"],
            vec!["d", "e"],
            vec!["footer", ""],
        ]);
        assert!(!injector().inject(&mut grid, &block(0, 4), "140382"));
        assert_eq!(grid.cell(3, 1), &CellValue::Empty);
    }

    #[test]
    fn test_inject_idempotent() {
        // 幂等: 相同值注入两次,网格状态一致
        let mut grid = Grid::from_text_rows(&[vec!["CSQU3054383", "12.03.82"]]);
        injector().inject(&mut grid, &block(0, 1), "140382");
        let after_first = grid.clone();
        injector().inject(&mut grid, &block(0, 1), "140382");
        assert_eq!(grid, after_first);
    }

    #[test]
    fn test_exactly_one_cell_written() {
        let mut grid = Grid::from_text_rows(&[
            vec!["CSQU3054383", "12.03.82", "14.05.84"],
        ]);
        let before = grid.clone();
        injector().inject(&mut grid, &block(0, 1), "999999");

        let mut diffs = 0;
        for r in 0..grid.row_count() {
            for c in 0..grid.column_count() {
                if grid.cell(r, c) != before.cell(r, c) {
                    diffs += 1;
                }
            }
        }
        assert_eq!(diffs, 1);
    }
}
