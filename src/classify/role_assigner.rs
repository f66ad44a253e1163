// ==========================================
// 集装箱单证核对系统 - 角色分配器
// ==========================================
// 依据: Column_Role_Spec_v0.4.md - 6. 信号融合与分配策略
// 职责: 融合数据密度 + 表头得分 + 可选语义分类器信号,
//       按角色专属权重产出列分配与置信度
// ==========================================
// 红线: 确定性纯函数,同一输入两次运行结果必须一致
// 红线: 一列最多一个角色,歧义必须消解,绝不静默重复
// 平手规则: 综合分高者胜;完全平手时列号小者(最左)胜
// ==========================================

use crate::classify::semantic_classifier::SemanticClassifier;
use crate::config::ClassifyConfig;
use crate::domain::{
    ColumnProfile, Grid, RoleAssignment, RoleWarning, SemanticRole, WarnLevel,
};
use std::collections::HashMap;
use tracing::debug;

pub struct RoleAssigner<'a> {
    config: &'a ClassifyConfig,
}

/// 分配结果 + 过程告警
#[derive(Debug)]
pub struct AssignOutcome {
    pub assignment: RoleAssignment,
    pub warnings: Vec<RoleWarning>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    role: SemanticRole,
    column: usize,
    score: f64,
    /// 表头或分类器给出的语境信号强度（温度歧义判定用）
    context_signal: f64,
}

impl<'a> RoleAssigner<'a> {
    pub fn new(config: &'a ClassifyConfig) -> Self {
        Self { config }
    }

    /// 执行角色分配
    ///
    /// # 参数
    /// - `header_scores`: 表头分析器逐列输出（与 profiles 对齐,可短于列数）
    /// - `classifier`: 可选外部语义分类器,缺失时视为无信号
    pub fn assign(
        &self,
        sheet_id: &str,
        grid: &Grid,
        data_start: usize,
        profiles: &[ColumnProfile],
        header_scores: &[HashMap<SemanticRole, f64>],
        classifier: Option<&dyn SemanticClassifier>,
    ) -> AssignOutcome {
        let classifier_signals = self.query_classifier(grid, data_start, profiles, classifier);

        // 1. 生成全部过阈值候选
        let mut candidates: Vec<Candidate> = Vec::new();
        for profile in profiles {
            let col = profile.column_index;
            for role in SemanticRole::ALL {
                let policy = self.config.policy(role);
                let density = profile.density(role);
                let header = header_scores
                    .get(col)
                    .and_then(|m| m.get(&role).copied())
                    .unwrap_or(0.0);
                let cls = match classifier_signals.get(col).copied().flatten() {
                    Some((r, c)) if r == role => c,
                    _ => 0.0,
                };

                let score = policy.combine(density, header, cls);
                if score >= policy.min_score {
                    candidates.push(Candidate {
                        role,
                        column: col,
                        score,
                        context_signal: header.max(cls),
                    });
                }
            }
        }

        // 2. 确定性排序: 分数降序 → 角色优先级 → 最左列
        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.role.priority().cmp(&b.role.priority()))
                .then_with(|| a.column.cmp(&b.column))
        });

        // 3. 贪心分配,角色与列均不复用
        let mut assignment = RoleAssignment::new();
        let mut used_columns: Vec<usize> = Vec::new();
        for c in &candidates {
            if assignment.is_assigned(c.role) || used_columns.contains(&c.column) {
                continue;
            }
            debug!(
                sheet = sheet_id,
                role = %c.role,
                column = c.column,
                score = c.score,
                "角色分配"
            );
            assignment.insert(c.role, c.column, c.score);
            used_columns.push(c.column);
        }

        // 4. 告警收集
        let mut warnings = Vec::new();
        self.warn_low_confidence(sheet_id, &assignment, &mut warnings);
        self.warn_ambiguous_temperature(sheet_id, profiles, &assignment, &mut warnings);

        AssignOutcome {
            assignment,
            warnings,
        }
    }

    /// 逐列查询外部分类器（缺失时全列无信号）
    fn query_classifier(
        &self,
        grid: &Grid,
        data_start: usize,
        profiles: &[ColumnProfile],
        classifier: Option<&dyn SemanticClassifier>,
    ) -> Vec<Option<(SemanticRole, f64)>> {
        let classifier = match classifier {
            Some(c) => c,
            None => return vec![None; profiles.len()],
        };

        let sample_cap = self.config.limits.classifier_sample_cells;
        profiles
            .iter()
            .map(|profile| {
                let col = profile.column_index;
                let mut samples = Vec::with_capacity(sample_cap);
                let mut row = data_start;
                while samples.len() < sample_cap && row < grid.row_count() {
                    let cell = grid.cell(row, col);
                    if !cell.is_empty() {
                        samples.push(cell.clone());
                    }
                    row += 1;
                }
                classifier
                    .classify(profile.header_text.as_deref(), &samples)
                    .map(|(role, conf)| (role, conf.clamp(0.0, 1.0)))
            })
            .collect()
    }

    fn warn_low_confidence(
        &self,
        sheet_id: &str,
        assignment: &RoleAssignment,
        warnings: &mut Vec<RoleWarning>,
    ) {
        for role in SemanticRole::ALL {
            if let Some(m) = assignment.get(role) {
                if m.confidence < self.config.low_confidence_band {
                    warnings.push(RoleWarning {
                        sheet_id: sheet_id.to_string(),
                        level: WarnLevel::Warning,
                        role: Some(role),
                        message: format!(
                            "角色 {} 分配到列 {} 但置信度偏低 ({:.2})",
                            role, m.column, m.confidence
                        ),
                    });
                }
            }
        }
    }

    /// 记录温度歧义失败模式
    ///
    /// 设定/实测在数据上不可区分;表头缺失时两角色均不分配,
    /// 这是信息论上的固有极限而非缺陷,但必须显式告警
    fn warn_ambiguous_temperature(
        &self,
        sheet_id: &str,
        profiles: &[ColumnProfile],
        assignment: &RoleAssignment,
        warnings: &mut Vec<RoleWarning>,
    ) {
        if assignment.is_assigned(SemanticRole::TemperatureSet)
            || assignment.is_assigned(SemanticRole::TemperatureActual)
        {
            return;
        }

        let temp_like_columns = profiles
            .iter()
            .filter(|p| p.density(SemanticRole::TemperatureSet) >= 0.6)
            .count();
        if temp_like_columns > 0 {
            warnings.push(RoleWarning {
                sheet_id: sheet_id.to_string(),
                level: WarnLevel::Warning,
                role: None,
                message: format!(
                    "检测到 {} 个温度形态列,但缺少表头语境,无法区分设定/实测,两角色均不分配",
                    temp_like_columns
                ),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::column_profiler::ColumnProfiler;
    use crate::classify::header_analyzer::HeaderAnalyzer;
    use crate::classify::semantic_classifier::NoOpClassifier;

    fn run_assign(grid: &Grid, header_row: Option<usize>, data_start: usize) -> AssignOutcome {
        let config = ClassifyConfig::default();
        let profiles = ColumnProfiler::new(&config).profile(grid, data_start, header_row);
        let header_scores = match header_row.and_then(|h| grid.row(h)) {
            Some(row) => HeaderAnalyzer::new().analyze(row),
            None => vec![],
        };
        RoleAssigner::new(&config).assign(
            "测试表",
            grid,
            data_start,
            &profiles,
            &header_scores,
            None,
        )
    }

    #[test]
    fn test_container_and_temp_set_assigned() {
        let grid = Grid::from_text_rows(&[
            vec!["Container", "Temp Set"],
            vec!["CSQU3054383", "-18"],
            vec!["TEMU1234565", "-20"],
        ]);

        let outcome = run_assign(&grid, Some(0), 1);
        let container = outcome.assignment.get(SemanticRole::ContainerId).unwrap();
        assert_eq!(container.column, 0);
        assert!(container.confidence > 0.8);

        let set = outcome.assignment.get(SemanticRole::TemperatureSet).unwrap();
        assert_eq!(set.column, 1);
        // 设定列已占用,实测不得重复占用同列
        assert!(!outcome.assignment.is_assigned(SemanticRole::TemperatureActual));
    }

    #[test]
    fn test_set_and_actual_disambiguated_by_header() {
        let grid = Grid::from_text_rows(&[
            vec!["Container", "Set Temp", "Actual Temp"],
            vec!["CSQU3054383", "-18", "-17.8"],
            vec!["TEMU1234565", "-20", "-19.5"],
        ]);

        let outcome = run_assign(&grid, Some(0), 1);
        assert_eq!(
            outcome.assignment.column_of(SemanticRole::TemperatureSet),
            Some(1)
        );
        assert_eq!(
            outcome.assignment.column_of(SemanticRole::TemperatureActual),
            Some(2)
        );
    }

    #[test]
    fn test_headerless_temperature_left_unassigned() {
        // 无表头语境时温度角色均不分配并产生告警
        let grid = Grid::from_text_rows(&[
            vec!["CSQU3054383", "-18"],
            vec!["TEMU1234565", "-20"],
            vec!["MSCU1234566", "-22"],
        ]);

        let outcome = run_assign(&grid, None, 0);
        assert!(outcome.assignment.is_assigned(SemanticRole::ContainerId));
        assert!(!outcome.assignment.is_assigned(SemanticRole::TemperatureSet));
        assert!(!outcome.assignment.is_assigned(SemanticRole::TemperatureActual));
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.message.contains("无法区分")));
    }

    #[test]
    fn test_deterministic() {
        let grid = Grid::from_text_rows(&[
            vec!["Container", "Stowage", "Temp Set"],
            vec!["CSQU3054383", "12.03.82", "-18"],
            vec!["TEMU1234565", "14.05.84", "-20"],
        ]);

        let a = run_assign(&grid, Some(0), 1);
        let b = run_assign(&grid, Some(0), 1);
        for role in SemanticRole::ALL {
            assert_eq!(a.assignment.get(role), b.assignment.get(role));
        }
    }

    #[test]
    fn test_classifier_signal_contributes() {
        struct StowageHint;
        impl SemanticClassifier for StowageHint {
            fn classify(
                &self,
                _header: Option<&str>,
                samples: &[crate::domain::CellValue],
            ) -> Option<(SemanticRole, f64)> {
                if samples
                    .iter()
                    .all(|c| crate::pattern::stowage::parse(c).is_some())
                {
                    Some((SemanticRole::Stowage, 0.9))
                } else {
                    None
                }
            }
        }

        let grid = Grid::from_text_rows(&[
            vec!["CSQU3054383", "12.03.82"],
            vec!["TEMU1234565", "14.05.84"],
        ]);

        let config = ClassifyConfig::default();
        let profiles = ColumnProfiler::new(&config).profile(&grid, 0, None);
        let assigner = RoleAssigner::new(&config);

        let without = assigner.assign("测试表", &grid, 0, &profiles, &[], Some(&NoOpClassifier));
        let with = assigner.assign("测试表", &grid, 0, &profiles, &[], Some(&StowageHint));

        let w0 = without.assignment.get(SemanticRole::Stowage).unwrap();
        let w1 = with.assignment.get(SemanticRole::Stowage).unwrap();
        assert!(w1.confidence > w0.confidence);
    }

    #[test]
    fn test_low_confidence_assignment_warned() {
        // 无表头、校验位全错的箱号列: 分配成立但置信度落入告警带
        let grid = Grid::from_text_rows(&[
            vec!["ABCD1234565"],
            vec!["WXYZ7654321"],
            vec!["QQQQ1111111"],
        ]);

        let outcome = run_assign(&grid, None, 0);
        let m = outcome.assignment.get(SemanticRole::ContainerId).unwrap();
        assert!(m.confidence < 0.5, "置信度 {} 应落入告警带", m.confidence);

        assert!(outcome.warnings.iter().any(|w| {
            w.level == WarnLevel::Warning
                && w.role == Some(SemanticRole::ContainerId)
                && w.message.contains("置信度偏低")
        }));
    }

    #[test]
    fn test_leftmost_wins_on_exact_tie() {
        // 两列内容完全相同 → 综合分相同 → 最左列胜出
        let grid = Grid::from_text_rows(&[
            vec!["CSQU3054383", "CSQU3054383"],
            vec!["TEMU1234565", "TEMU1234565"],
        ]);

        let outcome = run_assign(&grid, None, 0);
        assert_eq!(
            outcome.assignment.column_of(SemanticRole::ContainerId),
            Some(0)
        );
    }
}
