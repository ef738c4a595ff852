//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `screen`: 石榴石稳定性与电压筛选
//! - `export`: 导出某化合物的 POSCAR / INCAR 原始文本
//! - `import`: 从 CSV 导入形成能记录，建立数据库
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: screen, export, import

pub mod export;
pub mod import;
pub mod screen;

use clap::{Parser, Subcommand};

/// garnetscreen - 石榴石锂化合物热力学与电压筛选
#[derive(Parser)]
#[command(name = "garnetscreen")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Stability, voltage profile and oxygen evolution screening of Li-garnets",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Screen garnet compounds: stability, voltage window, O2 evolution, plots
    Screen(screen::ScreenArgs),

    /// Print the stored POSCAR and INCAR text of a compound
    Export(export::ExportArgs),

    /// Import formation-energy records from a CSV file into the database
    Import(import::ImportArgs),
}
