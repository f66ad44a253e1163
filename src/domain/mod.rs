// ==========================================
// 集装箱单证核对系统 - 领域层
// ==========================================
// 依据: Manifest_Structure_Spec_v0.2.md - 1. 数据模型
// ==========================================
// 职责: 实体与类型定义,不含业务规则
// ==========================================

pub mod cell;
pub mod types;

pub use cell::{CellValue, Grid};
pub use types::{
    Block, BlockAudit, ClassifyReport, ColumnProfile, RoleAssignment, RoleMatch, RoleWarning,
    SemanticRole, SheetCandidate, StowageKey, WarnLevel,
};
