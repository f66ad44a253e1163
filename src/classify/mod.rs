// ==========================================
// 集装箱单证核对系统 - 分类引擎层
// ==========================================
// 依据: Column_Role_Spec_v0.4.md - 2. 引擎拆分
// ==========================================
// 职责: 自适应列角色分类;数据流:
// 网格 → 列画像 + 表头分析 → 角色分配 → 工作表选择
// ==========================================

pub mod column_profiler;
pub mod extraction;
pub mod header_analyzer;
pub mod role_assigner;
pub mod semantic_classifier;
pub mod sheet_selector;

// 重导出核心引擎
pub use column_profiler::ColumnProfiler;
pub use extraction::{extract_role_map, merge_role_maps};
pub use header_analyzer::HeaderAnalyzer;
pub use role_assigner::{AssignOutcome, RoleAssigner};
pub use semantic_classifier::{NoOpClassifier, SemanticClassifier};
pub use sheet_selector::SheetSelector;
