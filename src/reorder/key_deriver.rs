// ==========================================
// 集装箱单证核对系统 - 积载键派生与排序
// ==========================================
// 依据: Reorder_Engine_Spec_v0.2.md - 4. 键派生与稳定排序
// 职责: 外部积载映射 → 规范 6 位键;块按键稳定排序
// ==========================================
// 红线: 必须稳定排序 —— 同键块保持原相对顺序
// (两箱合法共享同一位置待人工修正的场景真实存在)
// 红线: 排序不得改动块内部行序
// ==========================================

use crate::domain::{Block, CellValue, StowageKey};
use crate::pattern::stowage;
use std::collections::HashMap;

/// 键化块: 块 + 派生积载键
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedBlock {
    pub block: Block,
    pub key: StowageKey,
}

/// 从原始积载值派生规范键
///
/// 去除非数字字符,左侧补零/截断为恰好 6 位;
/// 无法解析 → 缺失键(排在所有数字键之后)
pub fn derive_key(raw: Option<&CellValue>) -> StowageKey {
    let text = match raw.and_then(|c| c.canonical_string()) {
        Some(t) => t,
        None => return StowageKey::missing(),
    };

    // 口语形态先转数字形态
    if let Some(pos) = stowage::parse_str(&text) {
        return match stowage::normalize_key(&pos.display_key()) {
            Some(k) => StowageKey::from_digits(k),
            None => StowageKey::missing(),
        };
    }

    match stowage::normalize_key(&text) {
        Some(k) => StowageKey::from_digits(k),
        None => StowageKey::missing(),
    }
}

/// 按外部积载映射为各块派生键
pub fn key_blocks(
    blocks: &[Block],
    stowage_map: &HashMap<String, CellValue>,
) -> Vec<KeyedBlock> {
    blocks
        .iter()
        .map(|block| KeyedBlock {
            block: block.clone(),
            key: derive_key(stowage_map.get(&block.container_id)),
        })
        .collect()
}

/// 按键字典序稳定排序（缺失键 "ZZZZZZ" 天然排最后）
pub fn sort_keyed(mut keyed: Vec<KeyedBlock>) -> Vec<KeyedBlock> {
    keyed.sort_by(|a, b| a.key.cmp(&b.key));
    keyed
}
