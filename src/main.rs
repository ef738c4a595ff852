//! # garnetscreen - 石榴石锂化合物筛选工具
//!
//! 从材料数据库中检索石榴石化合物，计算热力学稳定性、嵌锂电压曲线、
//! 参考锂含量处的电压窗口和最低析氧电压，并输出曲线图与汇总。
//!
//! ## 子命令
//! - `screen` - 稳定性与电压筛选
//! - `export` - 打印某化合物的 POSCAR / INCAR
//! - `import` - 从 CSV 建立数据库
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── db/        (SQLite 材料数据库)
//!   │     ├── garnet/    (筛选、电压、绘图、汇总)
//!   │     ├── thermo/    (线性规划、相空间、凸包切片)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod db;
mod error;
mod garnet;
mod models;
mod thermo;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&e);
        std::process::exit(1);
    }
}
