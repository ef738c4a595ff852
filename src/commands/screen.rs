//! # screen 命令实现
//!
//! 逐个处理数据库中的石榴石化合物：稳定性筛选、电压曲线、
//! 析氧电压、绘图与单行汇总。
//!
//! ## 功能
//! - 顺序处理，每个化合物独立完成（含图像写出）后再处理下一个
//! - 单个化合物失败时报告并继续
//! - 终端汇总表格与可选 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/screen.rs` 定义的参数
//! - 使用 `db/` 读取记录与相
//! - 使用 `garnet/` 进行筛选、绘图与汇总
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::screen::ScreenArgs;
use crate::db::{self, Loaded};
use crate::error::{GarnetError, Result};
use crate::garnet::plot::{self, PlotSize};
use crate::garnet::report;
use crate::garnet::{GarnetScreener, ScreeningOutcome, ScreeningResult};
use crate::models::{GarnetRecord, Phase};
use crate::utils::{format::format_sig, output, progress};

use rusqlite::Connection;
use std::fs;

/// 一次筛选运行的结果
#[derive(Debug, Default)]
pub struct ScreenSummary {
    /// 通过筛选的化合物
    pub results: Vec<ScreeningResult>,
    /// 被稳定性阈值过滤的化合物名称
    pub filtered: Vec<String>,
    /// (名称, 错误信息)
    pub failures: Vec<(String, String)>,
}

/// 执行 screen 命令
pub fn execute(args: ScreenArgs) -> Result<()> {
    output::print_header("Li-Garnet Stability & Voltage Screening");

    validate_args(&args)?;

    let conn = db::open_existing(&args.database)?;
    let summary = run_screening(&conn, &args)?;

    // 汇总
    output::print_separator();
    output::print_success(format!(
        "Screening complete: {} screened, {} above stability cutoff, {} failed",
        summary.results.len(),
        summary.filtered.len(),
        summary.failures.len()
    ));

    if !summary.results.is_empty() {
        output::print_header(&format!("{} Screened Garnets", summary.results.len()));
        eprintln!("{}", report::summary_table(&summary.results));
    }

    if let Some(ref csv_path) = args.summary_csv {
        report::save_summary_csv(&summary.results, csv_path)?;
        output::print_success(format!("Summary saved to '{}'", csv_path.display()));
    }

    if !summary.failures.is_empty() {
        output::print_warning("Failed compounds:");
        for (name, err) in summary.failures.iter().take(10) {
            output::print_error(format!("  {}: {}", name, err));
        }
        if summary.failures.len() > 10 {
            output::print_warning(format!("  ... and {} more", summary.failures.len() - 10));
        }
    }

    Ok(())
}

/// 逐个筛选数据库中的化合物
///
/// 汇总表头与每个通过筛选的化合物的汇总行写到 stdout，
/// 其余状态信息写到 stderr。单个化合物出错时记入 `failures` 并继续。
pub fn run_screening(conn: &Connection, args: &ScreenArgs) -> Result<ScreenSummary> {
    let mut summary = ScreenSummary::default();

    let records = db::garnet_records(conn, &args.path_filter)?;
    for name in &records.skipped {
        summary
            .failures
            .push((name.clone(), "unparsable chemical formula".to_string()));
    }

    if records.items.is_empty() {
        output::print_warning(format!(
            "No screenable formation records with entry path containing '{}'",
            args.path_filter
        ));
        return Ok(summary);
    }

    let phases = db::load_phases(conn)?;
    if !phases.skipped.is_empty() {
        output::print_warning(format!(
            "Ignoring {} formation record(s) with unparsable formulas (first: '{}')",
            phases.skipped.len(),
            phases.skipped[0]
        ));
    }

    output::print_info(format!(
        "Found {} candidate compounds in '{}'",
        records.items.len(),
        args.database.display()
    ));
    output::print_setting("O2 reference (eV)", args.oxygen_energy);
    output::print_setting("stability cutoff", args.stability_cutoff);
    output::print_setting("lithiation slice", format!("+Li{}", args.max_lithium));
    output::print_setting("reference x", args.reference_x);

    if !args.no_plot {
        fs::create_dir_all(&args.output_dir).map_err(|e| GarnetError::FileWriteError {
            path: args.output_dir.display().to_string(),
            source: e,
        })?;
    }

    let screener = GarnetScreener::new(args.screening_config());

    println!("{}", report::SUMMARY_HEADER);

    let pb = progress::create_progress_bar(records.items.len() as u64, "Screening");

    for record in &records.items {
        pb.set_message(record.name.clone());

        match screen_record(&phases, &screener, record, args) {
            Ok(ScreeningOutcome::Screened(result)) => {
                let line = report::summary_line(&result);
                progress::with_suspended(&pb, || {
                    println!("{}", line);
                    if result.profile.degenerate_segments > 0 {
                        output::print_warning(format!(
                            "{}: skipped {} hull segment(s) with zero lithium change",
                            record.name, result.profile.degenerate_segments
                        ));
                    }
                });
                summary.results.push(*result);
            }
            Ok(ScreeningOutcome::Unstable { name, stability }) => {
                if args.verbose {
                    progress::with_suspended(&pb, || {
                        output::print_skip(format!(
                            "{}: stability {} eV/atom above cutoff",
                            name,
                            format_sig(stability, 4)
                        ));
                    });
                }
                summary.filtered.push(name);
            }
            Err(e) => {
                summary.failures.push((record.name.clone(), e.to_string()));
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    Ok(summary)
}

/// 筛选单个化合物，通过筛选时写出电压曲线图
fn screen_record(
    phases: &Loaded<Phase>,
    screener: &GarnetScreener,
    record: &GarnetRecord,
    args: &ScreenArgs,
) -> Result<ScreeningOutcome> {
    let mut elements = record.space();
    if !elements.iter().any(|el| el == "Li") {
        elements.push("Li".to_string());
    }

    let outcome = screener.screen(record, &phases.within(&elements))?;

    if let ScreeningOutcome::Screened(ref result) = outcome {
        if !args.no_plot {
            let ext = if args.svg { "svg" } else { "png" };
            let path = args.output_dir.join(result.plot_file_name(ext));
            plot::generate_voltage_plot(
                result,
                screener.config().reference_x,
                &path,
                PlotSize::default(),
                args.svg,
            )?;
        }
    }

    Ok(outcome)
}

/// 参数检查
fn validate_args(args: &ScreenArgs) -> Result<()> {
    if args.formula_atoms <= 0.0 {
        return Err(GarnetError::InvalidArgument(format!(
            "--formula-atoms must be positive, got {}",
            args.formula_atoms
        )));
    }
    if args.max_lithium <= 0.0 {
        return Err(GarnetError::InvalidArgument(format!(
            "--max-lithium must be positive, got {}",
            args.max_lithium
        )));
    }
    if args.reference_x < 0.0 {
        return Err(GarnetError::InvalidArgument(format!(
            "--reference-x must be non-negative, got {}",
            args.reference_x
        )));
    }
    Ok(())
}
