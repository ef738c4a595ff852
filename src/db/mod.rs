//! # 材料数据库模块
//!
//! 基于 SQLite 的材料数据库：条目（entries）、计算（calculations）、
//! 形成能（formations）三张表。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/` 构造记录与相
//! - 使用 `rusqlite`
//! - 子模块: schema, query

pub mod query;
pub mod schema;

use crate::error::{GarnetError, Result};

use rusqlite::Connection;
use std::path::Path;

pub use query::{calculation_inputs, garnet_records, load_phases, Loaded};
pub use schema::{init_schema, insert_calculation, insert_entry, insert_formation};

/// 打开已存在的数据库
pub fn open_existing(path: &Path) -> Result<Connection> {
    if !path.is_file() {
        return Err(GarnetError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(Connection::open(path)?)
}
