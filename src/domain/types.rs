// ==========================================
// 集装箱单证核对系统 - 领域类型定义
// ==========================================
// 依据: Column_Role_Spec_v0.4.md - 语义角色体系
// 依据: Reorder_Engine_Spec_v0.2.md - 块与积载键
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

// ==========================================
// 语义角色 (Semantic Role)
// ==========================================
// 红线: 同一分类轮次内,一列最多承担一个角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemanticRole {
    ContainerId,       // 箱号
    Stowage,           // 积载位置 (BBRRTT)
    TemperatureSet,    // 设定温度
    TemperatureActual, // 实测温度
    UnNumber,          // UN 编号
    DgClass,           // 危险品等级
}

impl SemanticRole {
    /// 全部角色,按分配优先级排序（箱号最先）
    pub const ALL: [SemanticRole; 6] = [
        SemanticRole::ContainerId,
        SemanticRole::Stowage,
        SemanticRole::TemperatureSet,
        SemanticRole::TemperatureActual,
        SemanticRole::UnNumber,
        SemanticRole::DgClass,
    ];

    /// 分配优先级序号（greedy 平手时使用）
    pub fn priority(&self) -> usize {
        Self::ALL.iter().position(|r| r == self).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticRole::ContainerId => write!(f, "CONTAINER_ID"),
            SemanticRole::Stowage => write!(f, "STOWAGE"),
            SemanticRole::TemperatureSet => write!(f, "TEMPERATURE_SET"),
            SemanticRole::TemperatureActual => write!(f, "TEMPERATURE_ACTUAL"),
            SemanticRole::UnNumber => write!(f, "UN_NUMBER"),
            SemanticRole::DgClass => write!(f, "DG_CLASS"),
        }
    }
}

// ==========================================
// 列画像 (Column Profile)
// ==========================================
// 每次分类运行重新计算,之后不再变更
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub column_index: usize,
    /// 扫描窗口内非空单元格数
    pub non_empty: usize,
    /// 角色 → 加权匹配数之和
    pub role_weights: HashMap<SemanticRole, f64>,
    /// 校验位通过的箱号数（区别于仅形态匹配）
    pub valid_container_count: usize,
    pub header_text: Option<String>,
}

impl ColumnProfile {
    /// 匹配密度 = 加权匹配数 / 非空数,封顶 1.0
    pub fn density(&self, role: SemanticRole) -> f64 {
        if self.non_empty == 0 {
            return 0.0;
        }
        let matched = self.role_weights.get(&role).copied().unwrap_or(0.0);
        (matched / self.non_empty as f64).min(1.0)
    }
}

// ==========================================
// 角色分配 (Role Assignment)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleMatch {
    pub column: usize,
    /// 置信度 ∈ [0, 1]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleAssignment {
    assignments: HashMap<SemanticRole, RoleMatch>,
}

impl RoleAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: SemanticRole, column: usize, confidence: f64) {
        self.assignments.insert(
            role,
            RoleMatch {
                column,
                confidence: confidence.clamp(0.0, 1.0),
            },
        );
    }

    pub fn get(&self, role: SemanticRole) -> Option<RoleMatch> {
        self.assignments.get(&role).copied()
    }

    pub fn column_of(&self, role: SemanticRole) -> Option<usize> {
        self.get(role).map(|m| m.column)
    }

    pub fn is_assigned(&self, role: SemanticRole) -> bool {
        self.assignments.contains_key(&role)
    }

    /// 已占用的列集合
    pub fn used_columns(&self) -> Vec<usize> {
        let mut cols: Vec<usize> = self.assignments.values().map(|m| m.column).collect();
        cols.sort_unstable();
        cols
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// 已分配角色的平均置信度（空分配 → 0）
    ///
    /// 按固定角色顺序求和,浮点结果逐位可复现
    pub fn mean_confidence(&self) -> f64 {
        if self.assignments.is_empty() {
            return 0.0;
        }
        let sum: f64 = SemanticRole::ALL
            .iter()
            .filter_map(|r| self.assignments.get(r))
            .map(|m| m.confidence)
            .sum();
        sum / self.assignments.len() as f64
    }
}

// ==========================================
// 工作表候选 (Sheet Candidate)
// ==========================================
// 无效候选保留 reason,供运行级诊断汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetCandidate {
    pub sheet_id: String,
    pub assignment: RoleAssignment,
    pub overall_confidence: f64,
    /// 数据区内箱号形态匹配数
    pub container_count: usize,
    /// 其中校验位通过的数量
    pub valid_container_count: usize,
    pub header_row: usize,
    pub data_start_row: usize,
    /// 未找到真实表头,采用合成表头模式
    pub synthetic_header: bool,
    pub is_valid: bool,
    pub reason: Option<String>,
}

// ==========================================
// 告警 (Role Warning)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarnLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleWarning {
    pub sheet_id: String,
    pub level: WarnLevel,
    pub role: Option<SemanticRole>,
    pub message: String,
}

// ==========================================
// 分类运行报告 (Classify Report)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyReport {
    pub run_id: Uuid,
    /// 全部候选（含无效,按输入工作表顺序）
    pub candidates: Vec<SheetCandidate>,
    /// 选中工作表 id（无可用工作表时为 None）
    pub selected: Option<String>,
    pub warnings: Vec<RoleWarning>,
}

impl ClassifyReport {
    pub fn selected_candidate(&self) -> Option<&SheetCandidate> {
        let id = self.selected.as_deref()?;
        self.candidates.iter().find(|c| c.sheet_id == id)
    }

    pub fn valid_candidates(&self) -> impl Iterator<Item = &SheetCandidate> {
        self.candidates.iter().filter(|c| c.is_valid)
    }

    /// 逐工作表失败原因汇总（运行级诊断文本）
    pub fn failure_summary(&self) -> String {
        self.candidates
            .iter()
            .filter(|c| !c.is_valid)
            .map(|c| {
                format!(
                    "  - {}: {}",
                    c.sheet_id,
                    c.reason.as_deref().unwrap_or("原因未记录")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ==========================================
// 块 (Block)
// ==========================================
// 不变量: 块之间不重叠,与头部/尾部行共同精确划分网格
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub container_id: String,
    pub start_row: usize,
    /// 排他上界
    pub end_row: usize,
}

impl Block {
    pub fn len(&self) -> usize {
        self.end_row.saturating_sub(self.start_row)
    }

    pub fn is_empty(&self) -> bool {
        self.end_row <= self.start_row
    }
}

// ==========================================
// 积载键 (Stowage Key)
// ==========================================
// 6 位数字串 BBRRTT;缺失键 "ZZZZZZ" 按字典序排在所有数字键之后
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StowageKey(String);

impl StowageKey {
    pub const MISSING: &'static str = "ZZZZZZ";

    /// 从已规范化的 6 位数字串构造
    pub fn from_digits(digits: String) -> Self {
        debug_assert_eq!(digits.len(), 6);
        Self(digits)
    }

    pub fn missing() -> Self {
        Self(Self::MISSING.to_string())
    }

    pub fn is_missing(&self) -> bool {
        self.0 == Self::MISSING
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StowageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// 块审计记录 (Block Audit)
// ==========================================
// 重排引擎输出契约的一部分
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockAudit {
    pub container_id: String,
    pub resolved_key: StowageKey,
    pub injected: bool,
}
