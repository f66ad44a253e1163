// ==========================================
// 集装箱单证核对系统 - 表头分析器
// ==========================================
// 依据: Column_Role_Spec_v0.4.md - 5. 表头关键词词表
// 职责: 独立于数据内容的表头关键词打分
// ==========================================
// 词表含中英文别名（现场单证大量使用中文表头）
// 缺失/乱码表头 → 0 分,绝不报错
// ==========================================

use crate::config::thresholds::{
    HEADER_EXACT_SCORE, HEADER_GENERIC_TEMP_SCORE, HEADER_PARTIAL_SCORE,
};
use crate::domain::{CellValue, SemanticRole};
use std::collections::HashMap;

// ==========================================
// 角色关键词词表
// ==========================================
// strong: 完整命中记满分;weak: 命中记部分分

const CONTAINER_STRONG: &[&str] = &["container", "cntr", "箱号", "柜号", "集装箱"];
const CONTAINER_WEAK: &[&str] = &["id", "number", "no", "unit"];

const STOWAGE_STRONG: &[&str] = &["stowage", "stow", "position", "积载", "箱位", "贝位"];
const STOWAGE_WEAK: &[&str] = &["bay", "row", "tier", "pos", "cell", "slot", "location"];

const TEMP_SET_STRONG: &[&str] = &["set", "setpoint", "setting", "target", "设定", "设置"];
const TEMP_ACTUAL_STRONG: &[&str] = &[
    "actual", "measured", "probe", "supply", "return", "manifest", "实测", "实际",
];
// 通用温度词,无法区分设定/实测,两个温度角色均记通用分
const TEMP_GENERIC: &[&str] = &["temp", "temperature", "温度", "reefer", "冷藏"];

const UN_STRONG: &[&str] = &["un", "unno", "un编号", "联合国编号"];
const UN_WEAK: &[&str] = &["undg"];

const DG_CLASS_STRONG: &[&str] = &["class", "imo", "imdg", "等级", "类别", "危险品"];
const DG_CLASS_WEAK: &[&str] = &["dg", "hazard"];

pub struct HeaderAnalyzer;

impl HeaderAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// 对表头行逐列打分
    pub fn analyze(&self, header_row: &[CellValue]) -> Vec<HashMap<SemanticRole, f64>> {
        header_row
            .iter()
            .map(|cell| {
                let mut scores = HashMap::new();
                let header = match cell.canonical_string() {
                    Some(h) => h,
                    None => return scores,
                };
                for role in SemanticRole::ALL {
                    let s = self.score(&header, role);
                    if s > 0.0 {
                        scores.insert(role, s);
                    }
                }
                scores
            })
            .collect()
    }

    /// 单个表头对单个角色的关键词得分
    pub fn score(&self, header: &str, role: SemanticRole) -> f64 {
        let normalized = header.to_lowercase();
        let tokens: Vec<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        match role {
            SemanticRole::ContainerId => {
                keyword_score(&normalized, &tokens, CONTAINER_STRONG, CONTAINER_WEAK)
            }
            SemanticRole::Stowage => {
                keyword_score(&normalized, &tokens, STOWAGE_STRONG, STOWAGE_WEAK)
            }
            SemanticRole::TemperatureSet => {
                temp_score(&normalized, &tokens, TEMP_SET_STRONG)
            }
            SemanticRole::TemperatureActual => {
                temp_score(&normalized, &tokens, TEMP_ACTUAL_STRONG)
            }
            SemanticRole::UnNumber => keyword_score(&normalized, &tokens, UN_STRONG, UN_WEAK),
            SemanticRole::DgClass => {
                keyword_score(&normalized, &tokens, DG_CLASS_STRONG, DG_CLASS_WEAK)
            }
        }
    }
}

impl Default for HeaderAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_cjk_keyword(keyword: &str) -> bool {
    keyword.chars().any(|c| !c.is_ascii())
}

/// strong 词表完整命中 → 满分;长词子串 / weak 词命中 → 部分分
fn keyword_score(header: &str, tokens: &[&str], strong: &[&str], weak: &[&str]) -> f64 {
    let mut best: f64 = 0.0;

    for k in strong {
        if is_cjk_keyword(k) {
            if header.contains(k) {
                return HEADER_EXACT_SCORE;
            }
            continue;
        }
        if tokens.contains(k) {
            return HEADER_EXACT_SCORE;
        }
        // 较长的英文词允许子串命中（"stowagepos" 之类的粘连表头）
        if k.len() >= 4 && header.contains(k) {
            best = best.max(HEADER_PARTIAL_SCORE);
        }
    }

    for k in weak {
        let hit = if is_cjk_keyword(k) {
            header.contains(k)
        } else {
            tokens.contains(k)
        };
        if hit {
            best = best.max(HEADER_PARTIAL_SCORE);
        }
    }

    best
}

/// 温度角色: 专用词满分,仅通用温度词 → 通用分
fn temp_score(header: &str, tokens: &[&str], strong: &[&str]) -> f64 {
    let specific = keyword_score(header, tokens, strong, &[]);
    let generic_hit = TEMP_GENERIC.iter().any(|k| {
        if is_cjk_keyword(k) {
            header.contains(k)
        } else {
            tokens.contains(k) || (k.len() >= 4 && header.contains(k))
        }
    });

    if generic_hit {
        specific.max(HEADER_GENERIC_TEMP_SCORE)
    } else {
        specific
    }
}
