// ==========================================
// 集装箱单证核对系统 - 重排引擎层
// ==========================================
// 依据: Reorder_Engine_Spec_v0.2.md - 1. 模块拆分
// ==========================================
// 职责: 块结构化记录重排;数据流:
// 网格 + 箱号列 → 块提取 → 键派生 + 注入 → 稳定重排
// ==========================================

pub mod block_extractor;
pub mod block_injector;
pub mod engine;
pub mod key_deriver;

// 重导出核心引擎
pub use block_extractor::{BlockExtractor, BlockPartition};
pub use block_injector::BlockInjector;
pub use engine::{ReorderEngine, ReorderResult};
pub use key_deriver::{derive_key, key_blocks, sort_keyed, KeyedBlock};
