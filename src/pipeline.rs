// ==========================================
// 集装箱单证核对系统 - 运行级编排器
// ==========================================
// 依据: Manifest_Structure_Spec_v0.2.md - 2. 主流程
// 职责: {工作表 id → 网格} 输入的整册分类、提取与重排入口
// ==========================================
// 传播策略: 单表结构失败只记录不中断;
// 必需输入整册无可用表时,汇总逐表原因为单条运行级错误
// ==========================================

use crate::classify::{extraction, SemanticClassifier, SheetSelector};
use crate::config::ClassifyConfig;
use crate::domain::{
    CellValue, ClassifyReport, Grid, SemanticRole, SheetCandidate,
};
use crate::error::{CoreError, CoreResult};
use crate::reorder::{ReorderEngine, ReorderResult};
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

pub struct ManifestPipeline<'a> {
    config: ClassifyConfig,
    classifier: Option<&'a dyn SemanticClassifier>,
}

impl<'a> ManifestPipeline<'a> {
    pub fn new() -> Self {
        Self {
            config: ClassifyConfig::default(),
            classifier: None,
        }
    }

    pub fn with_config(config: ClassifyConfig) -> Self {
        Self {
            config,
            classifier: None,
        }
    }

    /// 挂接可选语义分类器（缺失时全程无该路信号）
    pub fn classifier(mut self, classifier: &'a dyn SemanticClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn config(&self) -> &ClassifyConfig {
        &self.config
    }

    // ==========================================
    // 整册分类
    // ==========================================

    /// 逐表评估并选优
    ///
    /// 工作表按输入顺序处理(顺序影响重复箱号的首见判定);
    /// 全部无效不构成错误,由调用方决定是否致命
    pub fn classify_workbook(&self, sheets: &[(String, Grid)]) -> ClassifyReport {
        let run_id = Uuid::new_v4();
        info!(%run_id, sheets = sheets.len(), "整册分类开始");

        let selector = match self.classifier {
            Some(c) => SheetSelector::with_classifier(&self.config, c),
            None => SheetSelector::new(&self.config),
        };

        let mut candidates = Vec::with_capacity(sheets.len());
        let mut warnings = Vec::new();
        for (sheet_id, grid) in sheets {
            let (candidate, mut sheet_warnings) = selector.evaluate(sheet_id, grid);
            if !candidate.is_valid {
                warn!(
                    sheet = %sheet_id,
                    reason = candidate.reason.as_deref().unwrap_or(""),
                    "工作表无效"
                );
            }
            candidates.push(candidate);
            warnings.append(&mut sheet_warnings);
        }

        let selected = selector.rank(&candidates).map(|c| c.sheet_id.clone());
        info!(
            %run_id,
            valid = candidates.iter().filter(|c| c.is_valid).count(),
            selected = selected.as_deref().unwrap_or("无"),
            "整册分类完成"
        );

        ClassifyReport {
            run_id,
            candidates,
            selected,
            warnings,
        }
    }

    /// 取选中候选;整册无可用表时汇总逐表原因为运行级错误
    pub fn require_selected<'r>(
        &self,
        report: &'r ClassifyReport,
    ) -> CoreResult<&'r SheetCandidate> {
        report
            .selected_candidate()
            .ok_or_else(|| CoreError::NoValidSheet(report.failure_summary()))
    }

    // ==========================================
    // 单角色提取(最大覆盖模式)
    // ==========================================

    /// 合并所有有效候选的 箱号 → 角色取值 映射
    ///
    /// MANIFEST 数据常跨多表分布,取并集而非单表;重复箱号首见者胜
    pub fn extract_merged(
        &self,
        sheets: &[(String, Grid)],
        report: &ClassifyReport,
        role: SemanticRole,
    ) -> HashMap<String, CellValue> {
        extraction::merge_role_maps(sheets, &report.candidates, role)
    }

    // ==========================================
    // 选中表重排
    // ==========================================

    /// 对选中工作表执行块重排
    pub fn reorder_selected(
        &self,
        sheets: &[(String, Grid)],
        report: &ClassifyReport,
        stowage_map: &HashMap<String, CellValue>,
    ) -> CoreResult<ReorderResult> {
        let candidate = self.require_selected(report)?;
        let grid = sheets
            .iter()
            .find(|(id, _)| *id == candidate.sheet_id)
            .map(|(_, g)| g)
            .ok_or_else(|| CoreError::Internal(format!(
                "选中工作表 {} 不在输入中",
                candidate.sheet_id
            )))?;

        let container_col = candidate
            .assignment
            .column_of(SemanticRole::ContainerId)
            .ok_or_else(|| CoreError::MissingContainerColumn {
                sheet: candidate.sheet_id.clone(),
            })?;

        ReorderEngine::new(&self.config).reorder(grid, container_col, stowage_map)
    }
}

impl Default for ManifestPipeline<'_> {
    fn default() -> Self {
        Self::new()
    }
}
