// ==========================================
// 集装箱单证核对系统 - 块提取器
// ==========================================
// 依据: Reorder_Engine_Spec_v0.2.md - 3. 块划分
// 职责: 以箱号行为锚点,把数据区划分为 头部行 ++ 重复块 ++ 尾部行
// ==========================================
// 不变量: 头部行 ++ 各块拼接 ++ 尾部行 == 原网格,逐行不重不漏
// 红线: 不变量破坏属程序级内部错误,必须显式抛出
// ==========================================

use crate::domain::{Block, Grid};
use crate::error::{CoreError, CoreResult};
use crate::pattern::container_id;
use crate::pattern::IdMatch;
use tracing::debug;

/// 块划分结果
///
/// 头部行为 `0..header_end`,尾部行为 `tail_start..行数`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPartition {
    pub header_end: usize,
    pub blocks: Vec<Block>,
    pub tail_start: usize,
}

pub struct BlockExtractor;

impl BlockExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 提取块划分
    ///
    /// # 参数
    /// - `container_col`: 角色分配器给出的箱号列
    ///
    /// 块起点为含箱号的行,延伸到下一个(任意列)出现箱号的行为止;
    /// 末块之后的连续全空行归入尾部
    pub fn extract(&self, grid: &Grid, container_col: usize) -> CoreResult<BlockPartition> {
        let row_count = grid.row_count();

        // 头部行: 首个箱号行之前的所有行
        let first_anchor = (0..row_count).find(|&r| row_has_container_id(grid, r));
        let header_end = match first_anchor {
            Some(r) => r,
            None => {
                // 无任何块: 整表即头部
                return Ok(BlockPartition {
                    header_end: row_count,
                    blocks: vec![],
                    tail_start: row_count,
                });
            }
        };

        // 尾部行: 末尾连续全空行
        let mut tail_start = row_count;
        while tail_start > header_end && grid.is_row_empty(tail_start - 1) {
            tail_start -= 1;
        }

        // 锚点行集合
        let anchors: Vec<usize> = (header_end..tail_start)
            .filter(|&r| row_has_container_id(grid, r))
            .collect();

        let mut blocks = Vec::with_capacity(anchors.len());
        for (i, &start) in anchors.iter().enumerate() {
            let end = anchors.get(i + 1).copied().unwrap_or(tail_start);
            let container_id = anchor_id(grid, start, container_col).ok_or_else(|| {
                CoreError::BlockIntegrity(format!("锚点行 {} 未能提取箱号", start))
            })?;
            blocks.push(Block {
                container_id,
                start_row: start,
                end_row: end,
            });
        }

        let partition = BlockPartition {
            header_end,
            blocks,
            tail_start,
        };
        verify_partition(&partition, row_count)?;

        debug!(
            header_rows = partition.header_end,
            blocks = partition.blocks.len(),
            tail_rows = row_count - partition.tail_start,
            "块划分完成"
        );
        Ok(partition)
    }
}

impl Default for BlockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// 划分不变量自检: 区段衔接、逐行不重不漏
fn verify_partition(partition: &BlockPartition, row_count: usize) -> CoreResult<()> {
    let mut cursor = partition.header_end;
    for block in &partition.blocks {
        if block.start_row != cursor {
            return Err(CoreError::BlockIntegrity(format!(
                "块 {} 起始行 {} 与游标 {} 不衔接",
                block.container_id, block.start_row, cursor
            )));
        }
        if block.end_row <= block.start_row {
            return Err(CoreError::BlockIntegrity(format!(
                "块 {} 为空区间 [{}, {})",
                block.container_id, block.start_row, block.end_row
            )));
        }
        cursor = block.end_row;
    }
    if cursor != partition.tail_start {
        return Err(CoreError::BlockIntegrity(format!(
            "末块终点 {} 与尾部起点 {} 不衔接",
            cursor, partition.tail_start
        )));
    }
    if partition.tail_start > row_count {
        return Err(CoreError::BlockIntegrity(format!(
            "尾部起点 {} 超出行数 {}",
            partition.tail_start, row_count
        )));
    }
    Ok(())
}

/// 行内任意列是否出现箱号形态
fn row_has_container_id(grid: &Grid, row: usize) -> bool {
    match grid.row(row) {
        None => false,
        Some(cells) => cells.iter().any(|c| container_id::detect(c) != IdMatch::None),
    }
}

/// 锚点行的箱号: 优先取箱号列,缺失时取行内首个箱号形态单元格
fn anchor_id(grid: &Grid, row: usize, container_col: usize) -> Option<String> {
    let primary = grid.cell(row, container_col);
    if container_id::detect(primary) != IdMatch::None {
        return primary.trimmed_text().map(|t| t.to_uppercase());
    }
    grid.row(row)?
        .iter()
        .find(|c| container_id::detect(c) != IdMatch::None)
        .and_then(|c| c.trimmed_text().map(|t| t.to_uppercase()))
}
