// ==========================================
// 集装箱单证核对系统 - 可插拔语义分类器接口
// ==========================================
// 依据: Column_Role_Spec_v0.4.md - 6. 外部语义信号
// ==========================================
// 能力接口: 外部分类器(如 AI 服务)给出 {角色, 置信度},
// 角色分配器视其为一路附加信号;不可用时必须优雅降级
// 红线: 绝不构成硬依赖
// ==========================================

use crate::domain::{CellValue, SemanticRole};

/// 外部语义分类器能力接口
pub trait SemanticClassifier: Send + Sync {
    /// 根据表头文本与样本单元格推断列角色
    ///
    /// # 返回
    /// - `Some((role, confidence))`: 推断结果,confidence ∈ [0, 1]
    /// - `None`: 无法判断（等价于信号缺失）
    fn classify(
        &self,
        header: Option<&str>,
        samples: &[CellValue],
    ) -> Option<(SemanticRole, f64)>;
}

/// 空实现: 永远返回无信号
pub struct NoOpClassifier;

impl SemanticClassifier for NoOpClassifier {
    fn classify(
        &self,
        _header: Option<&str>,
        _samples: &[CellValue],
    ) -> Option<(SemanticRole, f64)> {
        None
    }
}
