// ==========================================
// 集装箱单证核对系统 - 核心错误类型
// ==========================================
// 依据: Rust 错误处理最佳实践
// 工具: thiserror 派生宏
// ==========================================
// 传播策略: 工作表级结构失败收集而不中断多表扫描;
// 运行级失败汇总所有逐表原因为单条可读诊断
// ==========================================

use thiserror::Error;

/// 核心错误类型
#[derive(Error, Debug)]
pub enum CoreError {
    // ===== 结构识别错误 =====
    // 单表结构失败不走错误通道,由 SheetCandidate.reason 承载;
    // 只有整册无可用表才升级为运行级错误
    #[error("无可用工作表:\n{0}")]
    NoValidSheet(String),

    // ===== 重排引擎错误 =====
    // 块划分不变量被破坏属于程序级内部错误,绝不静默吞掉
    #[error("块完整性违规: {0}")]
    BlockIntegrity(String),

    #[error("重排输入缺少箱号列 ({sheet})")]
    MissingContainerColumn { sheet: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type CoreResult<T> = Result<T, CoreError>;
