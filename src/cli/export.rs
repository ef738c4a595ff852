//! # export 子命令 CLI 定义
//!
//! 打印某化合物计算的结构（POSCAR）与输入（INCAR）原始文本。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/export.rs`

use clap::Args;
use std::path::PathBuf;

/// export 子命令参数
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Entry name of the compound
    #[arg(default_value = "Li3Nd3Te2O12")]
    pub name: String,

    /// Path to the SQLite materials database
    #[arg(long, env = "GARNET_DB", default_value = "oqmd.sqlite")]
    pub database: PathBuf,
}
