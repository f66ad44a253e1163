// ==========================================
// 列角色分类引擎集成测试
// ==========================================
// 目标: 表头 + 数据双通道打分、贪心独占分配、
// 温度角色歧义消解的端到端验证
// ==========================================


use cntr_manifest::{ManifestPipeline, SemanticRole, WarnLevel};
use test_helpers::*;

/// 标准带表头 MANIFEST: 六个角色全部命中
#[test]
fn test_standard_headered_manifest() {
    let sheets = vec![(
        "MANIFEST".to_string(),
        grid(&[
            vec!["箱号", "积载位置", "设定温度", "实测温度", "UN No.", "Class"],
            vec![ID_CSQU, "02.01.05", "-18", "-17.5", "UN 1993", "3"],
            vec![ID_TEMU, "02.01.82", "-20", "-19.8", "UN 3082", "9"],
            vec![ID_MSCU, "14.03.82", "-25", "-24.6", "UN 1263", "3"],
            vec![ID_HLXU, "01.02.03", "-18", "-18.2", "UN 2814", "6.1"],
        ]),
    )];

    let pipeline = ManifestPipeline::new();
    let report = pipeline.classify_workbook(&sheets);

    let candidate = report.selected_candidate().unwrap();
    assert!(candidate.is_valid);
    assert_eq!(candidate.sheet_id, "MANIFEST");
    assert!(!candidate.synthetic_header);
    assert_eq!(candidate.header_row, 0);
    assert_eq!(candidate.data_start_row, 1);
    assert_eq!(candidate.valid_container_count, 4);

    let a = &candidate.assignment;
    assert_eq!(a.column_of(SemanticRole::ContainerId), Some(0));
    assert_eq!(a.column_of(SemanticRole::Stowage), Some(1));
    assert_eq!(a.column_of(SemanticRole::TemperatureSet), Some(2));
    assert_eq!(a.column_of(SemanticRole::TemperatureActual), Some(3));
    assert_eq!(a.column_of(SemanticRole::UnNumber), Some(4));
    assert_eq!(a.column_of(SemanticRole::DgClass), Some(5));
}

/// 同一输入多次分类,分配结果完全一致
#[test]
fn test_classification_deterministic() {
    let sheets = vec![(
        "S1".to_string(),
        grid(&[
            vec!["Container", "Position", "Temp"],
            vec![ID_CSQU, "02.01.05", "-18"],
            vec![ID_TEMU, "14.03.82", "-20"],
            vec![ID_GESU, "01.02.03", "-22"],
        ]),
    )];

    let pipeline = ManifestPipeline::new();
    let first = pipeline.classify_workbook(&sheets);
    for _ in 0..5 {
        let again = pipeline.classify_workbook(&sheets);
        let a = &first.selected_candidate().unwrap().assignment;
        let b = &again.selected_candidate().unwrap().assignment;
        for role in SemanticRole::ALL {
            assert_eq!(a.column_of(role), b.column_of(role));
        }
    }
}

/// 设定/实测温度靠表头区分: 数据形态完全同质
#[test]
fn test_temperature_roles_split_by_header() {
    let sheets = vec![(
        "REEFER".to_string(),
        grid(&[
            vec!["Container No", "Set Temp", "Actual Temp"],
            vec![ID_CSQU, "-18", "-17.9"],
            vec![ID_TEMU, "-20", "-20.1"],
            vec![ID_MSCU, "-25", "-24.8"],
        ]),
    )];

    let report = ManifestPipeline::new().classify_workbook(&sheets);
    let a = &report.selected_candidate().unwrap().assignment;
    assert_eq!(a.column_of(SemanticRole::TemperatureSet), Some(1));
    assert_eq!(a.column_of(SemanticRole::TemperatureActual), Some(2));
}

/// 无表头时温度列不可区分: 两角色均弃配并产生告警
#[test]
fn test_headerless_temperature_abstains() {
    let sheets = vec![(
        "RAW".to_string(),
        grid(&[
            vec![ID_CSQU, "-18", "-17.9"],
            vec![ID_TEMU, "-20", "-20.1"],
            vec![ID_MSCU, "-25", "-24.8"],
        ]),
    )];

    let report = ManifestPipeline::new().classify_workbook(&sheets);
    let candidate = report.selected_candidate().unwrap();
    assert!(candidate.synthetic_header);
    assert!(candidate
        .assignment
        .column_of(SemanticRole::ContainerId)
        .is_some());
    assert!(!candidate.assignment.is_assigned(SemanticRole::TemperatureSet));
    assert!(!candidate.assignment.is_assigned(SemanticRole::TemperatureActual));

    assert!(report.warnings.iter().any(|w| {
        w.level == WarnLevel::Warning && w.message.contains("温度")
    }));
}

/// 角色独占: 单箱号列不会同时领两个角色
#[test]
fn test_roles_are_exclusive() {
    let sheets = vec![(
        "S".to_string(),
        grid(&[
            vec!["箱号", "备注"],
            vec![ID_CSQU, "ok"],
            vec![ID_TEMU, "ok"],
            vec![ID_MSCU, "ok"],
        ]),
    )];

    let report = ManifestPipeline::new().classify_workbook(&sheets);
    let a = &report.selected_candidate().unwrap().assignment;
    let cols = a.used_columns();
    let mut dedup = cols.clone();
    dedup.sort_unstable();
    dedup.dedup();
    assert_eq!(cols.len(), dedup.len());
    assert_eq!(a.column_of(SemanticRole::ContainerId), Some(0));
}

/// 校验位合法箱号比仅形态匹配权重高:
/// 两列同为箱号形态时,合法列胜出
#[test]
fn test_valid_check_digit_outranks_shape_only() {
    // 第 0 列形态匹配但校验位全错,第 1 列全部合法
    let sheets = vec![(
        "S".to_string(),
        grid(&[
            vec!["Ref", "Container"],
            vec!["ABCD1234565", ID_CSQU],
            vec!["WXYZ7654321", ID_TEMU],
            vec!["QQQQ1111111", ID_MSCU],
        ]),
    )];

    let report = ManifestPipeline::new().classify_workbook(&sheets);
    let candidate = report.selected_candidate().unwrap();
    assert_eq!(
        candidate.assignment.column_of(SemanticRole::ContainerId),
        Some(1)
    );
    assert_eq!(candidate.valid_container_count, 3);
}

/// 分类报告可序列化为 JSON(审计存档用),角色名为稳定大写形态
#[test]
fn test_report_serializes_to_json() {
    let sheets = vec![(
        "MANIFEST".to_string(),
        grid(&[
            vec!["Container", "Stowage"],
            vec![ID_CSQU, "02.01.05"],
            vec![ID_TEMU, "14.03.82"],
        ]),
    )];

    let report = ManifestPipeline::new().classify_workbook(&sheets);
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"CONTAINER_ID\""));
    assert!(json.contains("\"selected\":\"MANIFEST\""));

    let back: cntr_manifest::ClassifyReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.run_id, report.run_id);
    assert_eq!(back.candidates.len(), 1);
}

/// 提取: 箱号统一大写,形态匹配即可参与键控
#[test]
fn test_extract_role_map_uppercases_ids() {
    let lower = ID_CSQU.to_lowercase();
    let sheets = vec![(
        "S".to_string(),
        grid(&[
            vec!["Container", "Position"],
            vec![&lower, "02.01.05"],
            vec![ID_TEMU, "14.03.82"],
        ]),
    )];

    let pipeline = ManifestPipeline::new();
    let report = pipeline.classify_workbook(&sheets);
    let map = pipeline.extract_merged(&sheets, &report, SemanticRole::Stowage);

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(ID_CSQU), Some(&text("02.01.05")));
}
