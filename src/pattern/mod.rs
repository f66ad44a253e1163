// ==========================================
// 集装箱单证核对系统 - 模式库
// ==========================================
// 依据: Column_Role_Spec_v0.4.md - 3. 角色识别模式全集
// ==========================================
// 职责: 各语义角色的纯谓词/校验函数,全部无状态
// 红线: 共享单一模式库,禁止各消费方复制检测逻辑
// 红线: 对 null/空白/畸形值一律判不匹配,绝不报错
// ==========================================

pub mod container_id;
pub mod dangerous_goods;
pub mod stowage;
pub mod temperature;

use crate::domain::{CellValue, SemanticRole};

pub use container_id::IdMatch;
pub use stowage::StowagePosition;

/// 按角色分发的匹配权重（列画像统一入口）
///
/// 设定/实测温度在数据层共享同一模式,仅表头语境可区分
pub fn match_weight(role: SemanticRole, cell: &CellValue) -> f64 {
    match role {
        SemanticRole::ContainerId => container_id::match_weight(cell),
        SemanticRole::Stowage => stowage::match_weight(cell),
        SemanticRole::TemperatureSet | SemanticRole::TemperatureActual => {
            temperature::match_weight(cell)
        }
        SemanticRole::UnNumber => dangerous_goods::un_match_weight(cell),
        SemanticRole::DgClass => dangerous_goods::class_match_weight(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_never_errors_on_malformed() {
        let cells = [
            CellValue::Empty,
            CellValue::Text("   ".to_string()),
            CellValue::Text("???".to_string()),
            CellValue::Number(f64::NAN),
        ];
        for role in SemanticRole::ALL {
            for cell in &cells {
                assert_eq!(match_weight(role, cell), 0.0);
            }
        }
    }

    #[test]
    fn test_temperature_roles_share_pattern() {
        let cell = CellValue::Number(-18.0);
        assert_eq!(
            match_weight(SemanticRole::TemperatureSet, &cell),
            match_weight(SemanticRole::TemperatureActual, &cell)
        );
    }
}
