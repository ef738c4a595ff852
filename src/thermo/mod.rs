//! # 热力学计算模块
//!
//! 提供相稳定性计算所需的数值工具。
//!
//! ## 子模块
//! - `lp`: 两阶段单纯形线性规划求解器
//! - `phase_space`: 相空间、GCLP 分解与凸包切片
//!
//! ## 依赖关系
//! - 被 `garnet/` 使用
//! - 使用 `models/` 的 Composition, Phase

pub mod lp;
pub mod phase_space;

pub use phase_space::{Decomposition, HullSlice, PhaseSpace};
