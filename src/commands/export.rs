//! # export 命令实现
//!
//! 打印某化合物所有计算的 POSCAR 与 INCAR 原始文本。
//!
//! ## 依赖关系
//! - 使用 `cli/export.rs` 定义的参数
//! - 使用 `db/query.rs` 读取计算输入

use crate::cli::export::ExportArgs;
use crate::db;
use crate::error::{GarnetError, Result};
use crate::models::CalculationInputs;
use crate::utils::output;

/// 执行 export 命令
pub fn execute(args: ExportArgs) -> Result<()> {
    let conn = db::open_existing(&args.database)?;
    let inputs = db::calculation_inputs(&conn, &args.name)?;

    if inputs.is_empty() {
        return Err(GarnetError::EntryNotFound { name: args.name });
    }

    for (i, calc) in inputs.iter().enumerate() {
        if inputs.len() > 1 {
            output::print_header(&format!("{} (calculation {})", args.name, i + 1));
        }
        print!("{}", render_inputs(calc));
    }

    Ok(())
}

/// POSCAR 在前，INCAR 在后；缺失部分输出空行
fn render_inputs(calc: &CalculationInputs) -> String {
    let mut text = String::new();
    for part in [&calc.poscar, &calc.incar] {
        let body = part.as_deref().unwrap_or("");
        text.push_str(body);
        if !body.ends_with('\n') {
            text.push('\n');
        }
    }
    text
}
