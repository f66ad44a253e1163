// ==========================================
// 集装箱单证核对系统 - 分类阈值与权重配置
// ==========================================
// 依据: Column_Role_Spec_v0.4.md - 7. 决策策略参数全集
// 职责: 集中管理启发式魔法数,使分配策略可审计、可独立测试
// ==========================================

use crate::domain::SemanticRole;
use serde::{Deserialize, Serialize};

// ==========================================
// 模式匹配权重常量
// ==========================================

/// 箱号仅形态匹配（正则过、校验位未过）的权重
pub const SHAPE_MATCH_WEIGHT: f64 = 0.55;

/// 箱号完整有效（形态 + 校验位）的权重
pub const VALID_MATCH_WEIGHT: f64 = 1.0;

/// 温度裸数值落在 [-50, 60] 的基础权重
pub const TEMP_BASE_WEIGHT: f64 = 0.5;

/// 温度带单位标记或落在冷藏常用区间 [-30, 25] 的权重
pub const TEMP_BONUS_WEIGHT: f64 = 1.0;

/// 表头关键词完整命中得分
pub const HEADER_EXACT_SCORE: f64 = 1.0;

/// 表头关键词部分命中（弱词/子串）得分
pub const HEADER_PARTIAL_SCORE: f64 = 0.6;

/// 温度通用词（temp/温度 等,无法区分设定/实测）得分
pub const HEADER_GENERIC_TEMP_SCORE: f64 = 0.5;

// ==========================================
// 扫描范围限制
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanLimits {
    /// 列画像扫描窗口上限（成本控制）
    pub profile_rows: usize,
    /// 表头搜索的行数前缀上限
    pub header_search_rows: usize,
    /// 合成表头模式下箱号形态扫描上限
    pub fallback_scan_rows: usize,
    /// 表头判定的向下探查窗口
    pub header_lookahead_rows: usize,
    /// 注入策略 3 允许写入的块内行数前缀
    pub inject_prefix_rows: usize,
    /// 语义分类器采样单元格数
    pub classifier_sample_cells: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            profile_rows: 200,
            header_search_rows: 30,
            fallback_scan_rows: 50,
            header_lookahead_rows: 5,
            inject_prefix_rows: 3,
            classifier_sample_cells: 5,
        }
    }
}

// ==========================================
// 单角色决策策略
// ==========================================
// 数据密度/表头得分/外部分类器信号的融合权重 + 分配阈值
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RolePolicy {
    pub data_weight: f64,
    pub header_weight: f64,
    pub classifier_weight: f64,
    /// 低于此综合得分则该角色不分配
    pub min_score: f64,
}

impl RolePolicy {
    /// 融合综合得分（权重之和为 1,结果 ∈ [0, 1]）
    pub fn combine(&self, density: f64, header_score: f64, classifier_score: f64) -> f64 {
        (self.data_weight * density
            + self.header_weight * header_score
            + self.classifier_weight * classifier_score)
            .clamp(0.0, 1.0)
    }
}

// ==========================================
// 分类配置全集
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyConfig {
    pub limits: ScanLimits,
    pub container_id: RolePolicy,
    pub stowage: RolePolicy,
    pub temperature_set: RolePolicy,
    pub temperature_actual: RolePolicy,
    pub un_number: RolePolicy,
    pub dg_class: RolePolicy,
    /// 工作表有效性的整体置信度下限
    pub sheet_confidence_floor: f64,
    /// 低于此带宽的已分配角色记 LowConfidence 告警
    pub low_confidence_band: f64,
    /// 候选排名近似平手的置信度差值
    pub near_tie_margin: f64,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            limits: ScanLimits::default(),
            // 箱号: 数据内容权重最高,阈值最宽松
            // （即便只有少量有效箱号,该列也有意义）
            container_id: RolePolicy {
                data_weight: 0.7,
                header_weight: 0.2,
                classifier_weight: 0.1,
                min_score: 0.2,
            },
            // 积载: 数据形态强（BBRRTT 可识别）
            stowage: RolePolicy {
                data_weight: 0.6,
                header_weight: 0.3,
                classifier_weight: 0.1,
                min_score: 0.35,
            },
            // 设定/实测温度数值上不可区分,只能靠表头语境区分,
            // 表头权重显著更高
            temperature_set: RolePolicy {
                data_weight: 0.3,
                header_weight: 0.55,
                classifier_weight: 0.15,
                min_score: 0.4,
            },
            temperature_actual: RolePolicy {
                data_weight: 0.3,
                header_weight: 0.55,
                classifier_weight: 0.15,
                min_score: 0.4,
            },
            un_number: RolePolicy {
                data_weight: 0.55,
                header_weight: 0.35,
                classifier_weight: 0.1,
                min_score: 0.35,
            },
            // 任意 1-9 数字都能形态命中 DG 等级,数据信号弱,表头并重
            dg_class: RolePolicy {
                data_weight: 0.45,
                header_weight: 0.45,
                classifier_weight: 0.1,
                min_score: 0.4,
            },
            sheet_confidence_floor: 0.3,
            low_confidence_band: 0.5,
            near_tie_margin: 0.1,
        }
    }
}

impl ClassifyConfig {
    pub fn policy(&self, role: SemanticRole) -> &RolePolicy {
        match role {
            SemanticRole::ContainerId => &self.container_id,
            SemanticRole::Stowage => &self.stowage,
            SemanticRole::TemperatureSet => &self.temperature_set,
            SemanticRole::TemperatureActual => &self.temperature_actual,
            SemanticRole::UnNumber => &self.un_number,
            SemanticRole::DgClass => &self.dg_class,
        }
    }
}
