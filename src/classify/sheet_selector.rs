// ==========================================
// 集装箱单证核对系统 - 工作表选择器
// ==========================================
// 依据: Column_Role_Spec_v0.4.md - 8. 工作表状态机
// 职责: 逐工作表评估(跳过/定位表头/分类/定级),
//       候选排名与无效原因记录
// ==========================================
// 状态机: 汇总表跳过 → 表头定位(横幅/页眉页脚剔除) →
//         分类 → 候选定级;表头定位失败回退合成表头模式
// ==========================================

use crate::classify::column_profiler::ColumnProfiler;
use crate::classify::header_analyzer::HeaderAnalyzer;
use crate::classify::role_assigner::RoleAssigner;
use crate::classify::semantic_classifier::SemanticClassifier;
use crate::config::ClassifyConfig;
use crate::domain::{Grid, RoleWarning, SemanticRole, SheetCandidate};
use crate::pattern::container_id;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

// 汇总/索引类工作表名,整表跳过
static SUMMARY_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(summary|index|toc|cover|statistic|汇总|总表|目录|封面|统计)")
        .expect("汇总表名正则非法")
});

// 页眉页脚特征: "Page X of Y" / 日期戳 / 时区串
static PAGE_FURNITURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(page\s+\d+\s+(of|/)\s+\d+|第\s*\d+\s*页|\d{4}[-/]\d{1,2}[-/]\d{1,2}|\d{1,2}[-/]\d{1,2}[-/]\d{2,4}|\b(utc|gmt)\s*[+-]?\d*\b)",
    )
    .expect("页眉页脚正则非法")
});

/// 表头定位结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeaderRegion {
    header_row: usize,
    data_start: usize,
    synthetic: bool,
}

pub struct SheetSelector<'a> {
    config: &'a ClassifyConfig,
    classifier: Option<&'a dyn SemanticClassifier>,
}

impl<'a> SheetSelector<'a> {
    pub fn new(config: &'a ClassifyConfig) -> Self {
        Self {
            config,
            classifier: None,
        }
    }

    pub fn with_classifier(
        config: &'a ClassifyConfig,
        classifier: &'a dyn SemanticClassifier,
    ) -> Self {
        Self {
            config,
            classifier: Some(classifier),
        }
    }

    // ==========================================
    // 单表评估
    // ==========================================

    /// 评估一个工作表,产出候选（无效候选带原因保留）
    pub fn evaluate(&self, sheet_id: &str, grid: &Grid) -> (SheetCandidate, Vec<RoleWarning>) {
        // 状态 1: 名称/行数直接跳过
        if SUMMARY_NAME_RE.is_match(sheet_id) {
            debug!(sheet = sheet_id, "汇总类表名,跳过");
            return (
                self.invalid_candidate(sheet_id, "汇总/索引类工作表,按名称跳过"),
                vec![],
            );
        }
        if grid.row_count() < 3 {
            return (
                self.invalid_candidate(sheet_id, "行数不足 3 行,不含可用数据区"),
                vec![],
            );
        }

        // 状态 2: 表头定位（含合成表头回退）
        let region = match self.locate_header_region(grid) {
            Some(r) => r,
            None => {
                return (
                    self.invalid_candidate(
                        sheet_id,
                        "未检测到箱号,亦无表头关键词,无可用表头/数据区",
                    ),
                    vec![],
                );
            }
        };

        // 状态 3: 分类
        let profiler = ColumnProfiler::new(self.config);
        let header_row_opt = if region.synthetic {
            None
        } else {
            Some(region.header_row)
        };
        let profiles = profiler.profile(grid, region.data_start, header_row_opt);

        let header_scores = if region.synthetic {
            vec![]
        } else {
            match grid.row(region.header_row) {
                Some(row) => HeaderAnalyzer::new().analyze(row),
                None => vec![],
            }
        };

        let outcome = RoleAssigner::new(self.config).assign(
            sheet_id,
            grid,
            region.data_start,
            &profiles,
            &header_scores,
            self.classifier,
        );

        // 状态 4: 定级
        let (container_count, valid_container_count) =
            self.count_containers(grid, region.data_start, &outcome.assignment);

        let overall_confidence = outcome.assignment.mean_confidence();
        let has_container = outcome.assignment.is_assigned(SemanticRole::ContainerId);

        let (is_valid, reason) = if !has_container || container_count == 0 {
            (false, Some("未检测到箱号列".to_string()))
        } else if overall_confidence < self.config.sheet_confidence_floor {
            (
                false,
                Some(format!(
                    "整体置信度 {:.2} 低于下限 {:.2}",
                    overall_confidence, self.config.sheet_confidence_floor
                )),
            )
        } else {
            (true, None)
        };

        info!(
            sheet = sheet_id,
            valid = is_valid,
            confidence = overall_confidence,
            containers = container_count,
            synthetic = region.synthetic,
            "工作表评估完成"
        );

        (
            SheetCandidate {
                sheet_id: sheet_id.to_string(),
                assignment: outcome.assignment,
                overall_confidence,
                container_count,
                valid_container_count,
                header_row: region.header_row,
                data_start_row: region.data_start,
                synthetic_header: region.synthetic,
                is_valid,
                reason,
            },
            outcome.warnings,
        )
    }

    // ==========================================
    // 候选排名
    // ==========================================

    /// 从有效候选中选优: 置信度最高;近似平手(差值 ≤ margin)时箱数多者胜
    pub fn rank<'c>(&self, candidates: &'c [SheetCandidate]) -> Option<&'c SheetCandidate> {
        let mut best: Option<&SheetCandidate> = None;
        for c in candidates.iter().filter(|c| c.is_valid) {
            best = match best {
                None => Some(c),
                Some(b) => {
                    let near_tie =
                        (c.overall_confidence - b.overall_confidence).abs()
                            <= self.config.near_tie_margin;
                    let wins = if near_tie {
                        c.container_count > b.container_count
                    } else {
                        c.overall_confidence > b.overall_confidence
                    };
                    if wins {
                        Some(c)
                    } else {
                        Some(b)
                    }
                }
            };
        }
        best
    }

    // ==========================================
    // 表头区定位
    // ==========================================

    fn locate_header_region(&self, grid: &Grid) -> Option<HeaderRegion> {
        let limits = &self.config.limits;
        let search_end = grid.row_count().min(limits.header_search_rows);
        let analyzer = HeaderAnalyzer::new();

        for row in 0..search_end {
            if grid.is_row_empty(row) {
                continue;
            }
            if self.is_banner_row(grid, row) {
                debug!(row, "横幅行(合并单元格),跳过");
                continue;
            }
            // 本行已是数据(含箱号)→ 没有真实表头,以此行锚定数据区
            if row_has_container_id(grid, row) {
                return Some(HeaderRegion {
                    header_row: row,
                    data_start: row,
                    synthetic: true,
                });
            }
            if self.is_page_furniture_row(grid, row) {
                debug!(row, "页眉/页脚行,跳过");
                continue;
            }

            // (b) 本行含 ≥1 表头关键词 → 表头行
            if let Some(cells) = grid.row(row) {
                let hits = analyzer.analyze(cells);
                if hits.iter().any(|m| !m.is_empty()) {
                    return Some(HeaderRegion {
                        header_row: row,
                        data_start: row + 1,
                        synthetic: false,
                    });
                }
            }

            // (a) 向下探查窗口内出现箱号 → 本行为表头行
            let lookahead_end = grid
                .row_count()
                .min(row + 1 + limits.header_lookahead_rows);
            if (row + 1..lookahead_end).any(|r| row_has_container_id(grid, r)) {
                return Some(HeaderRegion {
                    header_row: row,
                    data_start: row + 1,
                    synthetic: false,
                });
            }
        }

        // 回退: 合成表头模式,放宽扫描任意箱号形态单元格
        let fallback_end = grid.row_count().min(limits.fallback_scan_rows);
        for row in 0..fallback_end {
            if row_has_container_id(grid, row) {
                debug!(row, "合成表头模式,以首个箱号行锚定数据区");
                return Some(HeaderRegion {
                    header_row: row,
                    data_start: row,
                    synthetic: true,
                });
            }
        }

        None
    }

    /// 横幅行: 非空单元格 >3 且内容全部相同（合并单元格展开的典型形态）
    fn is_banner_row(&self, grid: &Grid, row: usize) -> bool {
        let cells = match grid.row(row) {
            Some(c) => c,
            None => return false,
        };
        let texts: Vec<String> = cells
            .iter()
            .filter_map(|c| c.canonical_string())
            .collect();
        texts.len() > 3 && texts.windows(2).all(|w| w[0] == w[1])
    }

    /// 页眉/页脚行: 非空单元格稀少且命中日期戳/页码/时区特征
    fn is_page_furniture_row(&self, grid: &Grid, row: usize) -> bool {
        if grid.non_empty_in_row(row) > 2 {
            return false;
        }
        let cells = match grid.row(row) {
            Some(c) => c,
            None => return false,
        };
        cells.iter().any(|c| {
            c.canonical_string()
                .map(|t| PAGE_FURNITURE_RE.is_match(&t))
                .unwrap_or(false)
        })
    }

    fn count_containers(
        &self,
        grid: &Grid,
        data_start: usize,
        assignment: &crate::domain::RoleAssignment,
    ) -> (usize, usize) {
        let col = match assignment.column_of(SemanticRole::ContainerId) {
            Some(c) => c,
            None => return (0, 0),
        };
        let mut shape = 0;
        let mut valid = 0;
        for row in data_start..grid.row_count() {
            match container_id::detect(grid.cell(row, col)) {
                crate::pattern::IdMatch::Valid => {
                    shape += 1;
                    valid += 1;
                }
                crate::pattern::IdMatch::ShapeOnly => shape += 1,
                crate::pattern::IdMatch::None => {}
            }
        }
        (shape, valid)
    }

    fn invalid_candidate(&self, sheet_id: &str, reason: &str) -> SheetCandidate {
        SheetCandidate {
            sheet_id: sheet_id.to_string(),
            assignment: Default::default(),
            overall_confidence: 0.0,
            container_count: 0,
            valid_container_count: 0,
            header_row: 0,
            data_start_row: 0,
            synthetic_header: false,
            is_valid: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// 行内任意单元格是否为箱号形态
fn row_has_container_id(grid: &Grid, row: usize) -> bool {
    match grid.row(row) {
        None => false,
        Some(cells) => cells
            .iter()
            .any(|c| container_id::detect(c) != crate::pattern::IdMatch::None),
    }
}
