//! # screen 子命令 CLI 定义
//!
//! 默认值即固定的筛选常数（O2 参考能、20 原子化学式单元、
//! 0.05 eV/atom 阈值、Li15 终点、x = 3 参考点）。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/screen.rs`

use crate::garnet::{
    ScreeningConfig, FORMULA_UNIT_ATOMS, MAX_LITHIUM, OXYGEN_REFERENCE_ENERGY, REFERENCE_X,
    STABILITY_CUTOFF,
};

use clap::Args;
use std::path::PathBuf;

/// screen 子命令参数
#[derive(Args, Debug)]
pub struct ScreenArgs {
    /// Path to the SQLite materials database
    #[arg(long, env = "GARNET_DB", default_value = "oqmd.sqlite")]
    pub database: PathBuf,

    /// Select formation records whose entry path contains this text
    #[arg(long, default_value = "garnet")]
    pub path_filter: String,

    /// Directory for the voltage-profile images
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Discard compounds whose stability exceeds this value (eV/atom)
    #[arg(long, default_value_t = STABILITY_CUTOFF)]
    pub stability_cutoff: f64,

    /// Reference energy injected for elemental oxygen (eV/atom)
    #[arg(long, default_value_t = OXYGEN_REFERENCE_ENERGY, allow_negative_numbers = true)]
    pub oxygen_energy: f64,

    /// Atoms per formula unit used to normalize the decomposition energy
    #[arg(long, default_value_t = FORMULA_UNIT_ATOMS)]
    pub formula_atoms: f64,

    /// Lithium added to the backbone at the end of the lithiation slice
    #[arg(long, default_value_t = MAX_LITHIUM)]
    pub max_lithium: f64,

    /// Lithium content (per 12 O) at which the voltage window is taken
    #[arg(long, default_value_t = REFERENCE_X)]
    pub reference_x: f64,

    /// Write SVG instead of PNG images
    #[arg(long, default_value_t = false)]
    pub svg: bool,

    /// Skip plot generation
    #[arg(long, default_value_t = false)]
    pub no_plot: bool,

    /// Also write the screening summary to this CSV file
    #[arg(long)]
    pub summary_csv: Option<PathBuf>,

    /// Report compounds removed by the stability filter
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl ScreenArgs {
    /// 转换为筛选参数
    pub fn screening_config(&self) -> ScreeningConfig {
        ScreeningConfig {
            oxygen_energy: self.oxygen_energy,
            formula_atoms: self.formula_atoms,
            stability_cutoff: self.stability_cutoff,
            max_lithium: self.max_lithium,
            reference_x: self.reference_x,
        }
    }
}
