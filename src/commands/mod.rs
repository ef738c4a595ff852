//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `db/`, `garnet/`, `utils/`
//! - 子模块: screen, export, import

pub mod export;
pub mod import;
pub mod screen;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Screen(args) => screen::execute(args),
        Commands::Export(args) => export::execute(args),
        Commands::Import(args) => import::execute(args),
    }
}
