//! # 筛选结果汇总
//!
//! - 每个化合物一行的纯文本汇总
//! - 终端汇总表格（tabled）
//! - 汇总 CSV 导出
//!
//! ## 依赖关系
//! - 被 `commands/screen.rs` 调用
//! - 使用 `garnet/` 的 ScreeningResult
//! - 使用 `utils/format.rs` 的有效数字格式化

use super::ScreeningResult;
use crate::error::{GarnetError, Result};
use crate::utils::format::format_sig;

use serde::Serialize;
use std::path::Path;
use tabled::{Table, Tabled};

/// 汇总表头
pub const SUMMARY_HEADER: &str =
    "Garnet, formation_energy stability band_gap V_max V_min stable_phases";

/// 单行汇总：名称、形成能、稳定性、带隙、窗口最大/最小电压、平衡相
pub fn summary_line(result: &ScreeningResult) -> String {
    format!(
        "{} {} {} {} {} {} [{}]",
        result.record.name,
        format_sig(result.record.delta_e, 4),
        format_sig(result.stability, 4),
        result.record.band_gap_text(),
        format_sig(result.v_max(), 4),
        format_sig(result.v_min(), 4),
        result.stable_phases.join(", ")
    )
}

/// 终端表格行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Garnet")]
    name: String,
    #[tabled(rename = "ΔHf (eV/atom)")]
    formation_energy: String,
    #[tabled(rename = "Stability (eV/atom)")]
    stability: String,
    #[tabled(rename = "Eg (eV)")]
    band_gap: String,
    #[tabled(rename = "V_max (V)")]
    v_max: String,
    #[tabled(rename = "V_min (V)")]
    v_min: String,
    #[tabled(rename = "O2 release (V)")]
    oxygen_release: String,
}

/// 渲染汇总表格
pub fn summary_table(results: &[ScreeningResult]) -> String {
    let rows: Vec<SummaryRow> = results
        .iter()
        .map(|r| SummaryRow {
            name: r.record.name.clone(),
            formation_energy: format_sig(r.record.delta_e, 4),
            stability: format_sig(r.stability, 4),
            band_gap: r.record.band_gap_text(),
            v_max: format!("{:.3}", r.v_max()),
            v_min: format!("{:.3}", r.v_min()),
            oxygen_release: r
                .oxygen_release
                .map(|p| format!("{:.3}", p.voltage))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    Table::new(&rows).to_string()
}

/// CSV 记录
#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    garnet: &'a str,
    formation_energy: f64,
    stability: f64,
    band_gap: Option<f64>,
    v_max: f64,
    v_min: f64,
    oxygen_release_x: Option<f64>,
    oxygen_release_v: Option<f64>,
    stable_phases: String,
}

/// 保存汇总到 CSV
pub fn save_summary_csv(results: &[ScreeningResult], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for r in results {
        wtr.serialize(SummaryRecord {
            garnet: &r.record.name,
            formation_energy: r.record.delta_e,
            stability: r.stability,
            band_gap: r.record.band_gap,
            v_max: r.v_max(),
            v_min: r.v_min(),
            oxygen_release_x: r.oxygen_release.map(|p| p.x),
            oxygen_release_v: r.oxygen_release.map(|p| p.voltage),
            stable_phases: r.stable_phases.join(" "),
        })?;
    }

    wtr.flush().map_err(|e| GarnetError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
