// ==========================================
// 集装箱单证核对系统 - 单角色取值提取
// ==========================================
// 依据: Column_Role_Spec_v0.4.md - 9. 输出契约
// 职责: 箱号 → 取值映射提取;多表合并(最大覆盖模式)
// ==========================================
// 合并规则: 重复箱号首见者胜,后续出现不覆盖
// ==========================================

use crate::domain::{CellValue, Grid, SemanticRole, SheetCandidate};
use crate::pattern::container_id;
use std::collections::HashMap;
use tracing::debug;

/// 从单个已分类工作表提取 箱号 → 角色列取值
///
/// 箱号形态不匹配的行跳过;角色列为空的行跳过
pub fn extract_role_map(
    grid: &Grid,
    candidate: &SheetCandidate,
    role: SemanticRole,
) -> HashMap<String, CellValue> {
    let mut map = HashMap::new();

    let container_col = match candidate.assignment.column_of(SemanticRole::ContainerId) {
        Some(c) => c,
        None => return map,
    };
    let value_col = match candidate.assignment.column_of(role) {
        Some(c) => c,
        None => return map,
    };

    for row in candidate.data_start_row..grid.row_count() {
        let id_cell = grid.cell(row, container_col);
        let id = match id_cell.trimmed_text() {
            Some(t) if container_id::is_shape(t) => t.trim().to_uppercase(),
            _ => continue,
        };

        let value = grid.cell(row, value_col);
        if value.is_empty() {
            continue;
        }

        // 同表内重复箱号同样首见者胜
        map.entry(id).or_insert_with(|| value.clone());
    }

    map
}

/// 多表合并提取（最大覆盖模式）
///
/// MANIFEST 数据常分散于多个工作表;合并所有有效候选的映射
/// 而非只取最优表,重复箱号按候选顺序首见者胜
pub fn merge_role_maps(
    sheets: &[(String, Grid)],
    candidates: &[SheetCandidate],
    role: SemanticRole,
) -> HashMap<String, CellValue> {
    let mut merged: HashMap<String, CellValue> = HashMap::new();

    for candidate in candidates.iter().filter(|c| c.is_valid) {
        let grid = match sheets.iter().find(|(id, _)| *id == candidate.sheet_id) {
            Some((_, g)) => g,
            None => continue,
        };
        let map = extract_role_map(grid, candidate, role);
        let before = merged.len();
        for (id, value) in map {
            merged.entry(id).or_insert(value);
        }
        debug!(
            sheet = %candidate.sheet_id,
            added = merged.len() - before,
            "合并角色取值映射"
        );
    }

    merged
}
