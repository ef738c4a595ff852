//! # 相空间与凸包计算
//!
//! 一组元素张成的相空间，包含该空间内所有已知相。
//!
//! ## 功能
//! - GCLP（巨正则线性规划）：目标组成的最低能量分解
//! - 凸包切片：沿两个组成之间的一维路径构造下凸包
//! - GCLP 结果缓存，显式 `clear` 释放
//!
//! ## 依赖关系
//! - 被 `garnet/` 使用
//! - 使用 `thermo/lp.rs` 求解线性规划
//! - 使用 `models/` 的 Composition, Phase

use super::lp::LinearProgram;
use crate::error::{GarnetError, Result};
use crate::models::{Composition, Phase};

use std::collections::HashMap;

/// 相含量小于该值视为不存在
const AMOUNT_EPS: f64 = 1e-9;

/// 新凸包顶点需低于弦的最小能量 (eV)
const HULL_TOL: f64 = 1e-6;

/// 切片参数 t 的分辨率
const T_EPS: f64 = 1e-9;

/// 凸包递归深度上限
const MAX_DEPTH: usize = 64;

/// 平衡相分解
#[derive(Debug, Clone, Default)]
pub struct Decomposition {
    /// 分解总能量 (eV)
    pub energy: f64,
    /// (相, 化学式单元数)
    pub phases: Vec<(Phase, f64)>,
}

impl Decomposition {
    /// 平衡相名称
    pub fn phase_names(&self) -> Vec<String> {
        self.phases.iter().map(|(p, _)| p.name.clone()).collect()
    }

    /// 分解中是否包含某元素的单质相
    pub fn has_elemental(&self, element: &str) -> bool {
        self.phases
            .iter()
            .any(|(p, amount)| *amount > AMOUNT_EPS && p.element() == Some(element))
    }
}

/// 凸包切片上的一个点
#[derive(Debug, Clone)]
pub struct HullPoint {
    /// 路径参数 t ∈ [0, 1]
    pub t: f64,
    /// 该点的组成
    pub composition: Composition,
    /// 总能量 (eV)
    pub energy: f64,
    /// 平衡分解
    pub decomposition: Decomposition,
}

/// 凸包切片（沿路径 t 严格递增）
#[derive(Debug, Clone)]
pub struct HullSlice {
    pub points: Vec<HullPoint>,
}

impl HullSlice {
    /// 相邻凸包点组成的两相平衡段
    pub fn segments(&self) -> impl Iterator<Item = (&HullPoint, &HullPoint)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }
}

/// 相空间
#[derive(Debug, Clone)]
pub struct PhaseSpace {
    elements: Vec<String>,
    phases: Vec<Phase>,
    gclp_cache: HashMap<String, Decomposition>,
}

impl PhaseSpace {
    /// 由元素集合和候选相构造
    ///
    /// 只保留落在元素集合内的相；同一约化组成只保留每原子能量最低者；
    /// 缺失的单质相以形成能 0 补齐。
    pub fn new(elements: Vec<String>, candidates: impl IntoIterator<Item = Phase>) -> Self {
        let mut best: HashMap<String, Phase> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for phase in candidates {
            if phase.composition.is_empty() || !phase.composition.is_within(&elements) {
                continue;
            }
            let key = phase.composition.reduced_key();
            match best.get(&key) {
                Some(existing) if existing.energy <= phase.energy => {}
                Some(_) => {
                    best.insert(key, phase);
                }
                None => {
                    order.push(key.clone());
                    best.insert(key, phase);
                }
            }
        }

        for el in &elements {
            let key = Composition::from_pairs([(el.as_str(), 1.0)]).reduced_key();
            if !best.contains_key(&key) {
                order.push(key.clone());
                best.insert(key, Phase::elemental(el));
            }
        }

        let phases = order.into_iter().filter_map(|k| best.remove(&k)).collect();

        PhaseSpace {
            elements,
            phases,
            gclp_cache: HashMap::new(),
        }
    }

    /// 相空间名称，如 `Li-Nd-Te-O`
    pub fn name(&self) -> String {
        self.elements.join("-")
    }

    #[cfg(test)]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// 覆盖某元素单质相的能量（如 O2 气体参考能）；元素不在空间内时忽略
    pub fn set_reference_energy(&mut self, element: &str, energy: f64) {
        if !self.elements.iter().any(|el| el == element) {
            return;
        }
        let reference = Phase::new(
            element,
            Composition::from_pairs([(element, 1.0)]),
            energy,
        );
        match self
            .phases
            .iter_mut()
            .find(|p| p.element() == Some(element))
        {
            Some(slot) => *slot = reference,
            None => self.phases.push(reference),
        }
        self.gclp_cache.clear();
    }

    /// 缓存的 GCLP 结果数量
    #[cfg(test)]
    pub fn cache_len(&self) -> usize {
        self.gclp_cache.len()
    }

    /// 释放缓存
    pub fn clear(&mut self) {
        self.gclp_cache.clear();
        self.gclp_cache.shrink_to_fit();
    }

    /// GCLP：目标组成的最低能量相分解
    pub fn gclp(&mut self, target: &Composition) -> Result<Decomposition> {
        self.ensure_within(target)?;

        let key = target.formula();
        if let Some(cached) = self.gclp_cache.get(&key) {
            return Ok(cached.clone());
        }

        let objective: Vec<f64> = self.phases.iter().map(|p| p.total_energy()).collect();
        let mut lp = LinearProgram::new(objective);
        for el in &self.elements {
            let row = self.phases.iter().map(|p| p.composition.get(el)).collect();
            lp.add_equality(row, target.get(el));
        }

        let solution = lp.solve()?;
        let decomposition = self.collect_decomposition(&solution.x);
        self.gclp_cache.insert(key, decomposition.clone());

        Ok(decomposition)
    }

    /// 沿 `from -> to` 构造下凸包切片
    pub fn slice(&mut self, from: &Composition, to: &Composition) -> Result<HullSlice> {
        self.ensure_within(from)?;
        self.ensure_within(to)?;

        let direction = to.minus(from);
        let start = self.hull_point(0.0, from, &direction)?;
        let end = self.hull_point(1.0, from, &direction)?;

        let mut interior = Vec::new();
        self.refine(&start, &end, from, &direction, 0, &mut interior)?;

        let mut points = Vec::with_capacity(interior.len() + 2);
        points.push(start);
        points.extend(interior);
        points.push(end);

        Ok(HullSlice { points })
    }

    fn hull_point(&mut self, t: f64, from: &Composition, direction: &Composition) -> Result<HullPoint> {
        let composition = from.plus(&direction.scaled(t));
        let decomposition = self.gclp(&composition)?;
        Ok(HullPoint {
            t,
            composition,
            energy: decomposition.energy,
            decomposition,
        })
    }

    /// 在 (lo, hi) 内寻找低于弦的凸包顶点，按 t 顺序写入 `out`
    fn refine(
        &self,
        lo: &HullPoint,
        hi: &HullPoint,
        from: &Composition,
        direction: &Composition,
        depth: usize,
        out: &mut Vec<HullPoint>,
    ) -> Result<()> {
        let span = hi.t - lo.t;
        if span < T_EPS || depth >= MAX_DEPTH {
            return Ok(());
        }
        let slope = (hi.energy - lo.energy) / span;

        // 变量: 各相含量 n_i, 偏移 u = t - t_lo, 松弛 w (u + w = span)
        let k = self.phases.len();
        let mut objective: Vec<f64> = self.phases.iter().map(|p| p.total_energy()).collect();
        objective.push(-slope);
        objective.push(0.0);

        let mut lp = LinearProgram::new(objective);
        for el in &self.elements {
            let mut row: Vec<f64> = self.phases.iter().map(|p| p.composition.get(el)).collect();
            row.push(-direction.get(el));
            row.push(0.0);
            lp.add_equality(row, lo.composition.get(el));
        }
        let mut bound = vec![0.0; k + 2];
        bound[k] = 1.0;
        bound[k + 1] = 1.0;
        lp.add_equality(bound, span);

        let solution = lp.solve()?;
        let u = solution.x[k];

        if solution.value < lo.energy - HULL_TOL && u > T_EPS && u < span - T_EPS {
            let decomposition = self.collect_decomposition(&solution.x[..k]);
            let t = lo.t + u;
            let mid = HullPoint {
                t,
                composition: from.plus(&direction.scaled(t)),
                energy: decomposition.energy,
                decomposition,
            };
            self.refine(lo, &mid, from, direction, depth + 1, out)?;
            self.refine(&mid, hi, from, direction, depth + 1, out)?;
            // 子区间先写入左半部分，再插入中点
            let split = out.iter().position(|p| p.t > mid.t).unwrap_or(out.len());
            out.insert(split, mid);
        }

        Ok(())
    }

    fn collect_decomposition(&self, amounts: &[f64]) -> Decomposition {
        let mut energy = 0.0;
        let mut phases = Vec::new();
        for (phase, &n) in self.phases.iter().zip(amounts) {
            if n > AMOUNT_EPS {
                energy += n * phase.total_energy();
                phases.push((phase.clone(), n));
            }
        }
        Decomposition { energy, phases }
    }

    fn ensure_within(&self, comp: &Composition) -> Result<()> {
        if comp.is_within(&self.elements) {
            Ok(())
        } else {
            Err(GarnetError::OutsidePhaseSpace {
                composition: comp.formula(),
                space: self.name(),
            })
        }
    }
}
