//! # 美化输出工具
//!
//! 提供统一的终端状态输出样式。所有状态信息写到 stderr；
//! stdout 只留给汇总表头、化合物汇总行和导出的原始文本。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::Colorize;
use std::fmt::Display;

/// 打印成功消息
pub fn print_success(msg: impl Display) {
    eprintln!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: impl Display) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: impl Display) {
    eprintln!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: impl Display) {
    eprintln!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印跳过消息
pub fn print_skip(msg: impl Display) {
    eprintln!("{} {}", "[SKIP]".dimmed(), msg);
}

/// 打印键值对（对齐）
pub fn print_setting(key: &str, value: impl Display) {
    eprintln!("    {:<20} {}", key.dimmed(), value);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    eprintln!("\n{}", line.dimmed());
    eprintln!("  {}", title.bold());
    eprintln!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    eprintln!("{}", "─".repeat(60).dimmed());
}
