//! # 石榴石筛选模块
//!
//! 对每个石榴石化合物：
//! 1. 全化学空间 GCLP 分解，计算热力学稳定性
//! 2. 过滤高度不稳定的化合物
//! 3. 沿嵌锂路径切片凸包，计算电压曲线
//! 4. 提取参考锂含量处的电压窗口与最低析氧电压
//!
//! 绘图与汇总输出分别在 `plot` 和 `report` 子模块中。
//!
//! ## 依赖关系
//! - 被 `commands/screen.rs` 调用
//! - 使用 `thermo/` 的 PhaseSpace
//! - 使用 `models/` 的 GarnetRecord, Phase
//! - 子模块: voltage, plot, report

pub mod plot;
pub mod report;
pub mod voltage;

use crate::error::{GarnetError, Result};
use crate::models::{Composition, GarnetRecord, Phase};
use crate::thermo::{Decomposition, PhaseSpace};

use voltage::{VoltagePoint, VoltageProfile};

/// O2 气体参考能 (eV/atom)，298 K、1 atm 下的 -TS
pub const OXYGEN_REFERENCE_ENERGY: f64 = -0.31695794;

/// 石榴石化学式单元原子数 (Li3A3B2O12)
pub const FORMULA_UNIT_ATOMS: f64 = 20.0;

/// 稳定性筛选阈值 (eV/atom)
pub const STABILITY_CUTOFF: f64 = 0.05;

/// 嵌锂终点额外的锂原子数
pub const MAX_LITHIUM: f64 = 15.0;

/// 电压窗口的参考锂含量
pub const REFERENCE_X: f64 = 3.0;

/// 筛选参数
#[derive(Debug, Clone)]
pub struct ScreeningConfig {
    pub oxygen_energy: f64,
    pub formula_atoms: f64,
    pub stability_cutoff: f64,
    pub max_lithium: f64,
    pub reference_x: f64,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        ScreeningConfig {
            oxygen_energy: OXYGEN_REFERENCE_ENERGY,
            formula_atoms: FORMULA_UNIT_ATOMS,
            stability_cutoff: STABILITY_CUTOFF,
            max_lithium: MAX_LITHIUM,
            reference_x: REFERENCE_X,
        }
    }
}

/// 单个化合物的筛选结果
#[derive(Debug, Clone)]
pub struct ScreeningResult {
    pub record: GarnetRecord,
    /// 去锂骨架组成
    pub backbone: Composition,
    /// 稳定性 = 形成能 - 每原子分解能 (eV/atom)
    pub stability: f64,
    /// 全空间分解的平衡相
    pub stable_phases: Vec<String>,
    pub profile: VoltageProfile,
    /// 参考锂含量处的电压窗口（非空）
    pub window: Vec<f64>,
    /// 最低析氧电压点
    pub oxygen_release: Option<VoltagePoint>,
}

impl ScreeningResult {
    pub fn v_max(&self) -> f64 {
        self.window.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn v_min(&self) -> f64 {
        self.window.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// 输出图像文件名 `Li3<骨架>.<ext>`
    pub fn plot_file_name(&self, ext: &str) -> String {
        format!("Li3{}.{}", self.backbone.formula(), ext)
    }
}

/// 筛选结论
#[derive(Debug, Clone)]
pub enum ScreeningOutcome {
    /// 通过稳定性筛选并完成电压分析
    Screened(Box<ScreeningResult>),
    /// 稳定性超过阈值，未做后续计算
    Unstable { name: String, stability: f64 },
}

/// 稳定性筛选：stability 不超过阈值即保留
pub fn passes_stability_filter(stability: f64, cutoff: f64) -> bool {
    stability <= cutoff
}

/// 计算化合物相对其化学空间内其他相的稳定性
pub fn compute_stability(
    space: &mut PhaseSpace,
    record: &GarnetRecord,
    formula_atoms: f64,
) -> Result<(f64, Decomposition)> {
    let decomposition = space.gclp(&record.composition)?;
    let energy = decomposition.energy / formula_atoms;
    Ok((record.delta_e - energy, decomposition))
}

/// 石榴石筛选器
pub struct GarnetScreener {
    config: ScreeningConfig,
}

impl GarnetScreener {
    pub fn new(config: ScreeningConfig) -> Self {
        GarnetScreener { config }
    }

    pub fn config(&self) -> &ScreeningConfig {
        &self.config
    }

    /// 对单个化合物执行完整筛选
    ///
    /// `phases` 为化合物化学空间内的候选相（通常来自数据库）。
    pub fn screen(&self, record: &GarnetRecord, phases: &[Phase]) -> Result<ScreeningOutcome> {
        let cfg = &self.config;

        // 全空间稳定性
        let mut space = PhaseSpace::new(record.space(), phases.iter().cloned());
        space.set_reference_energy("O", cfg.oxygen_energy);
        let (stability, decomposition) =
            compute_stability(&mut space, record, cfg.formula_atoms)?;
        space.clear();

        if !passes_stability_filter(stability, cfg.stability_cutoff) {
            return Ok(ScreeningOutcome::Unstable {
                name: record.name.clone(),
                stability,
            });
        }

        // 沿 骨架 -> Li{max}骨架 切片
        let backbone = record.composition.without("Li");
        let lithiated = Composition::from_pairs([("Li", cfg.max_lithium)]).plus(&backbone);
        let slice_elements: Vec<String> =
            lithiated.elements().into_iter().map(String::from).collect();

        let mut slice_space = PhaseSpace::new(slice_elements, phases.iter().cloned());
        slice_space.set_reference_energy("O", cfg.oxygen_energy);
        let slice = slice_space.slice(&backbone, &lithiated);
        slice_space.clear();
        let slice = slice?;

        let profile = voltage::build_profile(&slice)?;
        let window = voltage::voltage_window(&profile.points, stability, cfg.reference_x);
        if window.is_empty() {
            return Err(GarnetError::UnbracketedWindow {
                compound: record.name.clone(),
                reference_x: cfg.reference_x,
            });
        }
        let oxygen_release = voltage::lowest_oxygen_release(&profile.oxygen_events);

        Ok(ScreeningOutcome::Screened(Box::new(ScreeningResult {
            record: record.clone(),
            backbone,
            stability,
            stable_phases: decomposition.phase_names(),
            profile,
            window,
            oxygen_release,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, delta_e: f64) -> GarnetRecord {
        GarnetRecord {
            entry_id: 1,
            name: name.to_string(),
            path: format!("/garnets/{}", name),
            composition: Composition::parse(name).unwrap(),
            delta_e,
            band_gap: Some(4.0),
            latex: None,
        }
    }

    /// Li-X-O 模型体系：XO, Li2O 以及石榴石 Li3X5O12
    fn phases(garnet_energy: f64) -> Vec<Phase> {
        vec![
            Phase::from_formula("Li3X5O12", garnet_energy).unwrap(),
            Phase::from_formula("XO", -1.5).unwrap(),
            Phase::from_formula("Li2O", -2.0).unwrap(),
        ]
    }

    fn screened(outcome: ScreeningOutcome) -> ScreeningResult {
        match outcome {
            ScreeningOutcome::Screened(result) => *result,
            ScreeningOutcome::Unstable { name, stability } => {
                panic!("{} unexpectedly unstable ({})", name, stability)
            }
        }
    }

    #[test]
    fn test_stability_filter_boundary() {
        assert!(passes_stability_filter(0.0, 0.05));
        assert!(passes_stability_filter(0.05, 0.05));
        assert!(!passes_stability_filter(0.0500001, 0.05));
    }

    #[test]
    fn test_unstable_compound_is_skipped() {
        let screener = GarnetScreener::new(ScreeningConfig::default());
        let rec = record("Li3X5O12", -1.0);

        match screener.screen(&rec, &phases(-1.0)).unwrap() {
            ScreeningOutcome::Unstable { stability, .. } => assert!(stability > 0.05),
            ScreeningOutcome::Screened(_) => panic!("should be filtered"),
        }
    }

    #[test]
    fn test_stable_garnet_profile_and_window() {
        let screener = GarnetScreener::new(ScreeningConfig::default());
        let rec = record("Li3X5O12", -1.4);
        let result = screened(screener.screen(&rec, &phases(-1.4)).unwrap());

        assert!(result.stability.abs() < 1e-9);
        assert_eq!(result.stable_phases, vec!["Li3X5O12".to_string()]);
        assert_eq!(result.backbone.formula(), "X5O12");
        assert_eq!(result.plot_file_name("png"), "Li3X5O12.png");

        // 骨架 -> 石榴石 (x=3) -> Li2O + XO (x=14) -> + X (x=15)
        let xs: Vec<f64> = result.profile.points.iter().map(|p| p.x).collect();
        let expected_x = [0.0, 3.0, 3.0, 14.0, 14.0, 15.0];
        assert_eq!(xs.len(), expected_x.len());
        for (x, e) in xs.iter().zip(expected_x) {
            assert!((x - e).abs() < 1e-6, "x = {}, expected {}", x, e);
        }

        let v1 = (28.0 - 15.0 + 7.0 * OXYGEN_REFERENCE_ENERGY) / 3.0;
        let v2 = 29.0 / 11.0;
        assert_eq!(result.window.len(), 2);
        assert!((result.v_max() - v1).abs() < 1e-6);
        assert!((result.v_min() - v2).abs() < 1e-6);

        let o2 = result.oxygen_release.unwrap();
        assert!(o2.x.abs() < 1e-9);
        assert!((o2.voltage - v1).abs() < 1e-6);
    }

    #[test]
    fn test_metastable_garnet_window_jumps_past_reference() {
        let screener = GarnetScreener::new(ScreeningConfig::default());
        let rec = record("Li3X5O12", -1.28);
        let result = screened(screener.screen(&rec, &phases(-1.28)).unwrap());

        assert!(result.stability > 1e-4 && result.stability < 0.05);
        assert!(!result.stable_phases.contains(&"Li3X5O12".to_string()));

        // 2 Li + O -> Li2O 一直持续到 x = 14
        let v = (6.0 + OXYGEN_REFERENCE_ENERGY) / 2.0;
        assert_eq!(result.window.len(), 1);
        assert!((result.window[0] - v).abs() < 1e-6);
    }

    #[test]
    fn test_unbracketed_window_is_reported() {
        let config = ScreeningConfig {
            reference_x: 20.0,
            ..ScreeningConfig::default()
        };
        let screener = GarnetScreener::new(config);
        let rec = record("Li3X5O12", -1.4);

        assert!(matches!(
            screener.screen(&rec, &phases(-1.4)),
            Err(GarnetError::UnbracketedWindow { .. })
        ));
    }
}
