// ==========================================
// 集装箱单证核对系统 - 列画像器
// ==========================================
// 依据: Column_Role_Spec_v0.4.md - 4. 数据内容画像
// 职责: 扫描数据区,按列按角色统计加权匹配密度
// ==========================================
// 纯函数: 不修改网格,无副作用;扫描窗口封顶控制成本
// ==========================================

use crate::config::ClassifyConfig;
use crate::domain::{ColumnProfile, Grid, SemanticRole};
use crate::pattern;
use crate::pattern::container_id::{self, IdMatch};
use std::collections::HashMap;

pub struct ColumnProfiler {
    scan_rows: usize,
}

impl ColumnProfiler {
    pub fn new(config: &ClassifyConfig) -> Self {
        Self {
            scan_rows: config.limits.profile_rows,
        }
    }

    /// 生成每列画像
    ///
    /// # 参数
    /// - `grid`: 待扫描网格
    /// - `data_start`: 数据区起始行
    /// - `header_row`: 表头行号（合成表头模式下为 None）
    pub fn profile(
        &self,
        grid: &Grid,
        data_start: usize,
        header_row: Option<usize>,
    ) -> Vec<ColumnProfile> {
        let row_end = grid.row_count().min(data_start + self.scan_rows);
        let column_count = grid.column_count();

        let mut profiles: Vec<ColumnProfile> = (0..column_count)
            .map(|col| ColumnProfile {
                column_index: col,
                non_empty: 0,
                role_weights: HashMap::new(),
                valid_container_count: 0,
                header_text: header_row.and_then(|h| {
                    grid.cell(h, col).canonical_string()
                }),
            })
            .collect();

        for row in data_start..row_end {
            for (col, profile) in profiles.iter_mut().enumerate() {
                let cell = grid.cell(row, col);
                if cell.is_empty() {
                    continue;
                }
                profile.non_empty += 1;

                for role in SemanticRole::ALL {
                    let w = pattern::match_weight(role, cell);
                    if w > 0.0 {
                        *profile.role_weights.entry(role).or_insert(0.0) += w;
                    }
                }

                if container_id::detect(cell) == IdMatch::Valid {
                    profile.valid_container_count += 1;
                }
            }
        }

        profiles
    }
}
