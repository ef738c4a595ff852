//! # import 子命令 CLI 定义
//!
//! 从 CSV 导入形成能记录。CSV 列：
//! `name,path,delta_e,band_gap,poscar,incar,latex`（后四列可省略；
//! `poscar`/`incar` 为相对 CSV 所在目录的文件路径）。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/import.rs`

use clap::Args;
use std::path::PathBuf;

/// import 子命令参数
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV file with formation-energy records
    pub csv_file: PathBuf,

    /// Path to the SQLite materials database (created if missing)
    #[arg(long, env = "GARNET_DB", default_value = "oqmd.sqlite")]
    pub database: PathBuf,
}
