//! # 相数据模型
//!
//! 相 = 化学组成 + 形成能（eV/atom）。能量可以来自数据库，
//! 也可以是手动注入的参考能量（如 O2 气体）。
//!
//! ## 依赖关系
//! - 被 `db/query.rs`, `thermo/` 使用
//! - 使用 `models/composition.rs`

use super::Composition;

use serde::{Deserialize, Serialize};

/// 热力学相
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// 相名称（通常为化学式）
    pub name: String,

    /// 化学组成（一个化学式单元）
    pub composition: Composition,

    /// 形成能 (eV/atom)
    pub energy: f64,
}

impl Phase {
    pub fn new(name: impl Into<String>, composition: Composition, energy: f64) -> Self {
        Phase {
            name: name.into(),
            composition,
            energy,
        }
    }

    /// 从化学式创建，名称即化学式
    pub fn from_formula(formula: &str, energy: f64) -> crate::error::Result<Self> {
        let composition = Composition::parse(formula)?;
        Ok(Phase::new(formula, composition, energy))
    }

    /// 单质参考相（形成能为 0）
    pub fn elemental(element: &str) -> Self {
        Phase::new(element, Composition::from_pairs([(element, 1.0)]), 0.0)
    }

    /// 一个化学式单元的总形成能 (eV)
    pub fn total_energy(&self) -> f64 {
        self.energy * self.composition.num_atoms()
    }

    /// 单质相的元素符号
    pub fn element(&self) -> Option<&str> {
        if self.composition.is_elemental() {
            self.composition.elements().first().copied()
        } else {
            None
        }
    }
}
