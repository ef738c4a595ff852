//! # 数据模型模块
//!
//! 定义化学组成、相以及数据库记录的数据模型。
//!
//! ## 依赖关系
//! - 被 `db/`, `thermo/`, `garnet/` 和 `commands/` 使用
//! - 子模块: composition, phase, record

pub mod composition;
pub mod phase;
pub mod record;

pub use composition::Composition;
pub use phase::Phase;
pub use record::{CalculationInputs, GarnetRecord};
