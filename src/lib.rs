// ==========================================
// 集装箱单证核对系统 - 核心库
// ==========================================
// 依据: Manifest_Structure_Spec_v0.2.md
// 技术栈: Rust 库 crate (无外层运行时)
// 系统定位: 表格推断核心 - 列角色分类 + 块结构重排
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 网格与语义类型
pub mod domain;

// 配置层 - 阈值与角色策略
pub mod config;

// 模式层 - 单元格级形态识别
pub mod pattern;

// 分类层 - 列角色分类引擎
pub mod classify;

// 重排层 - 块结构化记录重排引擎
pub mod reorder;

// 运行级编排器
pub mod pipeline;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    Block, BlockAudit, CellValue, ClassifyReport, ColumnProfile, Grid, RoleAssignment,
    RoleWarning, SemanticRole, SheetCandidate, StowageKey, WarnLevel,
};

// 配置
pub use config::{ClassifyConfig, RolePolicy, ScanLimits};

// 引擎
pub use classify::{
    ColumnProfiler, HeaderAnalyzer, NoOpClassifier, RoleAssigner, SemanticClassifier,
    SheetSelector,
};
pub use reorder::{BlockExtractor, BlockInjector, ReorderEngine, ReorderResult};

// 编排器
pub use pipeline::ManifestPipeline;

// 错误
pub use error::{CoreError, CoreResult};

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 系统名称
pub const APP_NAME: &str = "集装箱单证核对系统";
