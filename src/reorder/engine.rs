// ==========================================
// 集装箱单证核对系统 - 重排引擎编排
// ==========================================
// 依据: Reorder_Engine_Spec_v0.2.md - 6. 主流程
// 职责: 块提取 → 键派生 → 注入 → 稳定重排 → 重组网格
// ==========================================
// 输出契约: 重排后的网格 + 逐块审计清单
// 所有写操作发生在输入网格的副本上,调用方原件不动
// ==========================================

use crate::config::ClassifyConfig;
use crate::domain::{Block, BlockAudit, CellValue, Grid};
use crate::error::CoreResult;
use crate::reorder::block_extractor::BlockExtractor;
use crate::reorder::block_injector::BlockInjector;
use crate::reorder::key_deriver::{self, KeyedBlock};
use std::collections::HashMap;
use tracing::info;

/// 重排结果
#[derive(Debug, Clone)]
pub struct ReorderResult {
    pub grid: Grid,
    /// 按重排后顺序的逐块审计
    pub audits: Vec<BlockAudit>,
}

pub struct ReorderEngine<'a> {
    config: &'a ClassifyConfig,
}

impl<'a> ReorderEngine<'a> {
    pub fn new(config: &'a ClassifyConfig) -> Self {
        Self { config }
    }

    /// 执行块重排
    ///
    /// # 参数
    /// - `container_col`: 箱号列(来自角色分配)
    /// - `stowage_map`: 外部提供的 箱号 → 积载值 映射
    pub fn reorder(
        &self,
        grid: &Grid,
        container_col: usize,
        stowage_map: &HashMap<String, CellValue>,
    ) -> CoreResult<ReorderResult> {
        let partition = BlockExtractor::new().extract(grid, container_col)?;

        // 键派生
        let keyed = key_deriver::key_blocks(&partition.blocks, stowage_map);

        // 注入发生在副本上,行号仍指原网格
        let mut working = grid.clone();
        let injector = BlockInjector::new(self.config.limits.inject_prefix_rows);
        let mut injected_flags: HashMap<usize, bool> = HashMap::new();
        for kb in &keyed {
            let injected = if kb.key.is_missing() {
                false
            } else {
                injector.inject(&mut working, &kb.block, kb.key.as_str())
            };
            injected_flags.insert(kb.block.start_row, injected);
        }

        // 稳定重排 + 网格重组
        let sorted = key_deriver::sort_keyed(keyed);
        let grid_out = reassemble(&working, partition.header_end, &sorted, partition.tail_start);

        let audits: Vec<BlockAudit> = sorted
            .iter()
            .map(|kb| BlockAudit {
                container_id: kb.block.container_id.clone(),
                resolved_key: kb.key.clone(),
                injected: injected_flags
                    .get(&kb.block.start_row)
                    .copied()
                    .unwrap_or(false),
            })
            .collect();

        info!(
            blocks = audits.len(),
            missing_keys = audits.iter().filter(|a| a.resolved_key.is_missing()).count(),
            "块重排完成"
        );

        Ok(ReorderResult {
            grid: grid_out,
            audits,
        })
    }
}

/// 头部行 + 排序后块行 + 尾部行 重组为新网格,块内部行序不变
fn reassemble(
    working: &Grid,
    header_end: usize,
    sorted: &[KeyedBlock],
    tail_start: usize,
) -> Grid {
    let mut rows: Vec<Vec<CellValue>> = Vec::with_capacity(working.row_count());

    for row in 0..header_end {
        rows.push(working.row(row).unwrap_or(&[]).to_vec());
    }
    for kb in sorted {
        push_block_rows(&mut rows, working, &kb.block);
    }
    for row in tail_start..working.row_count() {
        rows.push(working.row(row).unwrap_or(&[]).to_vec());
    }

    Grid::new(rows)
}

fn push_block_rows(rows: &mut Vec<Vec<CellValue>>, working: &Grid, block: &Block) {
    for row in block.start_row..block.end_row {
        rows.push(working.row(row).unwrap_or(&[]).to_vec());
    }
}
