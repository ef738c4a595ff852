//! # 数据库记录模型
//!
//! 从材料数据库中检索到的石榴石化合物记录及其计算输入文件。
//!
//! ## 依赖关系
//! - 被 `db/query.rs` 构造
//! - 被 `garnet/`, `commands/` 使用

use super::Composition;

use serde::{Deserialize, Serialize};

/// 化合物记录（一条形成能记录及其条目、计算信息）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarnetRecord {
    /// 条目 ID
    pub entry_id: i64,

    /// 条目名称（化学式，如 Li3Nd3Te2O12）
    pub name: String,

    /// 条目路径（用于按 "garnet" 筛选）
    pub path: String,

    /// 化学组成
    pub composition: Composition,

    /// 形成能 (eV/atom)
    pub delta_e: f64,

    /// 带隙 (eV)
    pub band_gap: Option<f64>,

    /// 显示名称（为空时使用下标化学式）
    pub latex: Option<String>,
}

impl GarnetRecord {
    /// 化学空间（元素列表）
    pub fn space(&self) -> Vec<String> {
        self.composition
            .elements()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// 图中显示名称
    pub fn display_name(&self) -> String {
        self.latex
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.composition.subscripted())
    }

    /// 带隙文本（整数值保留一位小数，如 `4.0`）
    pub fn band_gap_text(&self) -> String {
        self.band_gap
            .map(|g| format!("{:?}", g))
            .unwrap_or_else(|| "None".to_string())
    }
}

/// 计算输入文件（POSCAR / INCAR 原始文本）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculationInputs {
    pub poscar: Option<String>,
    pub incar: Option<String>,
}
