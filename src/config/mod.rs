// ==========================================
// 集装箱单证核对系统 - 配置层
// ==========================================
// 依据: Column_Role_Spec_v0.4.md - 7. 决策策略参数全集
// ==========================================

pub mod thresholds;

pub use thresholds::{ClassifyConfig, RolePolicy, ScanLimits};
