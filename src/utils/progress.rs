//! # 进度条工具
//!
//! 封装 `indicatif`，为逐个化合物的筛选循环提供进度显示。
//!
//! ## 依赖关系
//! - 被 `commands/screen.rs` 使用
//! - 使用 `indicatif` crate

use indicatif::{ProgressBar, ProgressStyle};

/// 创建化合物筛选进度条
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .map(|s| s.progress_chars("#>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());

    let pb = ProgressBar::new(len);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// 进度条暂停期间执行输出，避免与进度条交错
pub fn with_suspended<F: FnOnce()>(pb: &ProgressBar, f: F) {
    pb.suspend(f);
}
