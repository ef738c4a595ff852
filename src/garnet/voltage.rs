//! # 电压曲线计算
//!
//! 由凸包切片上的两相平衡段计算嵌锂电压曲线。
//!
//! ## 约定
//! - 能量与锂含量均归一化到每 12 个氧原子（石榴石化学式单元）
//! - 电压 V = -ΔE/Δx（相对 Li/Li+）
//! - 电压点按 x 升序、同 x 时按 V 降序排列
//!
//! ## 依赖关系
//! - 被 `garnet/mod.rs`, `garnet/plot.rs` 使用
//! - 使用 `thermo/` 的 HullSlice

use crate::error::{GarnetError, Result};
use crate::models::Composition;
use crate::thermo::HullSlice;

use std::cmp::Ordering;

/// 石榴石化学式单元中的氧原子数
pub const OXYGEN_PER_FORMULA: f64 = 12.0;

/// 锂含量与稳定性比较容差
pub const WINDOW_TOL: f64 = 1e-4;

/// Δx 小于该值的平衡段无法定义电压
const DX_EPS: f64 = 1e-12;

/// 电压点 (x, V)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltagePoint {
    /// 每 12 个氧的锂含量
    pub x: f64,
    /// 电压 (V vs Li/Li+)
    pub voltage: f64,
}

impl VoltagePoint {
    pub fn new(x: f64, voltage: f64) -> Self {
        VoltagePoint { x, voltage }
    }
}

/// 电压曲线
#[derive(Debug, Clone, Default)]
pub struct VoltageProfile {
    /// 排序后的电压点
    pub points: Vec<VoltagePoint>,
    /// 析氧事件 (x, V)
    pub oxygen_events: Vec<VoltagePoint>,
    /// 因 Δx = 0 被跳过的平衡段数
    pub degenerate_segments: usize,
}

/// 两点间电压 -(E2-E1)/(x2-x1)；Δx 为零时返回 None
pub fn voltage_between(x1: f64, e1: f64, x2: f64, e2: f64) -> Option<f64> {
    let dx = x2 - x1;
    if dx.abs() < DX_EPS {
        None
    } else {
        Some(-(e2 - e1) / dx)
    }
}

/// 每 12 个氧的锂含量；不含锂时为 0
pub fn lithium_content(comp: &Composition) -> Result<f64> {
    let oxygen = oxygen_amount(comp)?;
    if comp.contains("Li") {
        Ok(comp.get("Li") / oxygen * OXYGEN_PER_FORMULA)
    } else {
        Ok(0.0)
    }
}

/// 每 12 个氧的能量
pub fn normalized_energy(energy: f64, comp: &Composition) -> Result<f64> {
    Ok(energy / oxygen_amount(comp)? * OXYGEN_PER_FORMULA)
}

fn oxygen_amount(comp: &Composition) -> Result<f64> {
    let oxygen = comp.get("O");
    if oxygen > 0.0 {
        Ok(oxygen)
    } else {
        Err(GarnetError::InvalidArgument(format!(
            "cannot normalize {} per oxygen: no oxygen",
            comp.formula()
        )))
    }
}

/// 扫描凸包切片上的所有两相平衡段，生成排序后的电压曲线
pub fn build_profile(slice: &HullSlice) -> Result<VoltageProfile> {
    let mut profile = VoltageProfile::default();

    for (a, b) in slice.segments() {
        let x1 = lithium_content(&a.composition)?;
        let x2 = lithium_content(&b.composition)?;
        let e1 = normalized_energy(a.energy, &a.composition)?;
        let e2 = normalized_energy(b.energy, &b.composition)?;

        let voltage = match voltage_between(x1, e1, x2, e2) {
            Some(v) => v,
            None => {
                profile.degenerate_segments += 1;
                continue;
            }
        };

        profile.points.push(VoltagePoint::new(x1, voltage));
        profile.points.push(VoltagePoint::new(x2, voltage));

        // 平衡相中出现单质氧即为析氧
        if a.decomposition.has_elemental("O") {
            profile.oxygen_events.push(VoltagePoint::new(x1, voltage));
        }
        if b.decomposition.has_elemental("O") {
            profile.oxygen_events.push(VoltagePoint::new(x2, voltage));
        }
    }

    sort_points(&mut profile.points);
    Ok(profile)
}

/// x 升序，同 x 时 V 降序
pub fn sort_points(points: &mut [VoltagePoint]) {
    points.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(Ordering::Equal)
            .then(b.voltage.partial_cmp(&a.voltage).unwrap_or(Ordering::Equal))
    });
}

/// 参考锂含量处的电压窗口
///
/// - 稳定化合物（|stability| <= 1e-4）：x = reference_x 处记录的所有电压
/// - 亚稳化合物：首个 x >= reference_x 的点；恰好相等时与下一点取平均，
///   越过时直接取该点电压
///
/// 参考点未被曲线覆盖时返回空列表。
pub fn voltage_window(points: &[VoltagePoint], stability: f64, reference_x: f64) -> Vec<f64> {
    let at_reference = |p: &VoltagePoint| (p.x - reference_x).abs() <= WINDOW_TOL;

    if stability.abs() <= WINDOW_TOL {
        return points
            .iter()
            .filter(|p| at_reference(p))
            .map(|p| p.voltage)
            .collect();
    }

    for (i, p) in points.iter().enumerate() {
        if at_reference(p) {
            let v = match points.get(i + 1) {
                Some(next) => (p.voltage + next.voltage) / 2.0,
                None => p.voltage,
            };
            return vec![v];
        } else if p.x > reference_x {
            return vec![p.voltage];
        }
    }

    Vec::new()
}

/// 最低析氧电压点
pub fn lowest_oxygen_release(events: &[VoltagePoint]) -> Option<VoltagePoint> {
    events
        .iter()
        .copied()
        .min_by(|a, b| a.voltage.partial_cmp(&b.voltage).unwrap_or(Ordering::Equal))
}

/// 组成标注箭头的纵坐标：参考 x 处的最后一个电压，缺省为 3.0
pub fn annotation_height(points: &[VoltagePoint], reference_x: f64) -> f64 {
    points
        .iter()
        .filter(|p| (p.x - reference_x).abs() <= WINDOW_TOL)
        .last()
        .map(|p| p.voltage)
        .unwrap_or(3.0)
}
