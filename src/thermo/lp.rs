//! # 线性规划求解器
//!
//! 稠密单纯形表上的两阶段单纯形法，求解标准形式：
//!
//! ```text
//! minimize    c · z
//! subject to  A z = b
//!             z >= 0
//! ```
//!
//! - 第一阶段：人工变量求可行基
//! - 第二阶段：原目标函数优化
//! - Bland 规则防止退化循环
//!
//! ## 依赖关系
//! - 被 `thermo/phase_space.rs` 使用（GCLP 与凸包切片）
//! - 无外部 crate 依赖

use crate::error::{GarnetError, Result};

/// 主元与判优容差
const PIVOT_EPS: f64 = 1e-9;

/// 第一阶段残差容差（判定不可行）
const FEASIBILITY_TOL: f64 = 1e-7;

/// 迭代上限
const MAX_ITERATIONS: usize = 50_000;

/// 标准形式线性规划
#[derive(Debug, Clone)]
pub struct LinearProgram {
    /// 目标系数 c（长度 n）
    pub objective: Vec<f64>,
    /// 约束矩阵 A（m 行，每行长度 n）
    pub rows: Vec<Vec<f64>>,
    /// 右端项 b（长度 m）
    pub rhs: Vec<f64>,
}

/// 最优解
#[derive(Debug, Clone)]
pub struct LpSolution {
    /// 最优目标值
    pub value: f64,
    /// 最优解向量 z
    pub x: Vec<f64>,
}

impl LinearProgram {
    pub fn new(objective: Vec<f64>) -> Self {
        LinearProgram {
            objective,
            rows: Vec::new(),
            rhs: Vec::new(),
        }
    }

    /// 添加等式约束 `row · z = rhs`
    pub fn add_equality(&mut self, row: Vec<f64>, rhs: f64) {
        self.rows.push(row);
        self.rhs.push(rhs);
    }

    /// 求解
    pub fn solve(&self) -> Result<LpSolution> {
        let n = self.objective.len();
        let m = self.rows.len();

        if self.rhs.len() != m {
            return Err(GarnetError::DimensionMismatch(format!(
                "{} rows but {} right-hand sides",
                m,
                self.rhs.len()
            )));
        }
        if let Some(bad) = self.rows.iter().position(|r| r.len() != n) {
            return Err(GarnetError::DimensionMismatch(format!(
                "row {} has {} coefficients, expected {}",
                bad,
                self.rows[bad].len(),
                n
            )));
        }

        let mut tableau = Tableau::new(self);
        tableau.phase_one()?;
        tableau.phase_two(&self.objective)?;

        let mut x = vec![0.0; n];
        for (i, &var) in tableau.basis.iter().enumerate() {
            if var < n {
                x[var] = tableau.cells[i][tableau.rhs_col()];
            }
        }
        let value = self.objective.iter().zip(&x).map(|(c, v)| c * v).sum();

        Ok(LpSolution { value, x })
    }
}

/// 单纯形表：n 个原变量 + m 个人工变量 + 右端列
struct Tableau {
    n: usize,
    m: usize,
    cells: Vec<Vec<f64>>,
    /// 约化代价行（最后一列为 -目标值）
    cost: Vec<f64>,
    basis: Vec<usize>,
}

impl Tableau {
    fn new(lp: &LinearProgram) -> Self {
        let n = lp.objective.len();
        let m = lp.rows.len();
        let width = n + m + 1;

        let mut cells = Vec::with_capacity(m);
        for (i, (row, &b)) in lp.rows.iter().zip(&lp.rhs).enumerate() {
            // 保证右端项非负
            let sign = if b < 0.0 { -1.0 } else { 1.0 };
            let mut line = vec![0.0; width];
            for (j, &a) in row.iter().enumerate() {
                line[j] = sign * a;
            }
            line[n + i] = 1.0;
            line[width - 1] = sign * b;
            cells.push(line);
        }

        Tableau {
            n,
            m,
            cells,
            cost: vec![0.0; width],
            basis: (n..n + m).collect(),
        }
    }

    fn rhs_col(&self) -> usize {
        self.n + self.m
    }

    fn phase_one(&mut self) -> Result<()> {
        // 人工变量代价为 1，基内人工变量消去后得到约化代价
        let width = self.rhs_col() + 1;
        self.cost = vec![0.0; width];
        for j in self.n..self.n + self.m {
            self.cost[j] = 1.0;
        }
        for i in 0..self.m {
            for j in 0..width {
                self.cost[j] -= self.cells[i][j];
            }
        }

        self.iterate(self.n + self.m)?;

        let residual = -self.cost[self.rhs_col()];
        if residual > FEASIBILITY_TOL {
            return Err(GarnetError::Infeasible(format!(
                "phase-one residual {:.3e}",
                residual
            )));
        }

        // 将零水平的人工变量换出基；换不出的行为冗余约束
        for i in 0..self.m {
            if self.basis[i] >= self.n {
                if let Some(j) = (0..self.n).find(|&j| self.cells[i][j].abs() > PIVOT_EPS) {
                    self.pivot(i, j);
                }
            }
        }

        Ok(())
    }

    fn phase_two(&mut self, objective: &[f64]) -> Result<()> {
        let width = self.rhs_col() + 1;
        self.cost = vec![0.0; width];
        self.cost[..self.n].copy_from_slice(objective);

        for i in 0..self.m {
            let var = self.basis[i];
            if var < self.n {
                let c = objective[var];
                if c != 0.0 {
                    for j in 0..width {
                        self.cost[j] -= c * self.cells[i][j];
                    }
                }
            }
        }

        // 第二阶段人工变量不得入基
        self.iterate(self.n)
    }

    /// 迭代直至最优；仅 `0..allowed` 列可入基
    fn iterate(&mut self, allowed: usize) -> Result<()> {
        let rhs = self.rhs_col();

        for _ in 0..MAX_ITERATIONS {
            // Bland 规则：最小下标的负约化代价列
            let entering = match (0..allowed).find(|&j| self.cost[j] < -PIVOT_EPS) {
                Some(j) => j,
                None => return Ok(()),
            };

            let mut leaving: Option<(usize, f64)> = None;
            for i in 0..self.m {
                let a = self.cells[i][entering];
                if a > PIVOT_EPS {
                    let ratio = self.cells[i][rhs] / a;
                    leaving = match leaving {
                        None => Some((i, ratio)),
                        Some((best, best_ratio)) => {
                            if ratio < best_ratio - PIVOT_EPS
                                || (ratio <= best_ratio + PIVOT_EPS
                                    && self.basis[i] < self.basis[best])
                            {
                                Some((i, ratio))
                            } else {
                                Some((best, best_ratio))
                            }
                        }
                    };
                }
            }

            match leaving {
                Some((row, _)) => self.pivot(row, entering),
                None => return Err(GarnetError::Unbounded),
            }
        }

        Err(GarnetError::Infeasible(format!(
            "simplex did not converge within {} iterations",
            MAX_ITERATIONS
        )))
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let width = self.rhs_col() + 1;
        let p = self.cells[row][col];
        for j in 0..width {
            self.cells[row][j] /= p;
        }

        let pivot_row = self.cells[row].clone();
        for (i, line) in self.cells.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = line[col];
            if factor != 0.0 {
                for j in 0..width {
                    line[j] -= factor * pivot_row[j];
                }
            }
        }

        let factor = self.cost[col];
        if factor != 0.0 {
            for j in 0..width {
                self.cost[j] -= factor * pivot_row[j];
            }
        }

        self.basis[row] = col;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_minimum() {
        // min -x - y  s.t. x + s1 = 2, y + s2 = 3
        let mut lp = LinearProgram::new(vec![-1.0, -1.0, 0.0, 0.0]);
        lp.add_equality(vec![1.0, 0.0, 1.0, 0.0], 2.0);
        lp.add_equality(vec![0.0, 1.0, 0.0, 1.0], 3.0);

        let sol = lp.solve().unwrap();
        assert!((sol.value - (-5.0)).abs() < 1e-9);
        assert!((sol.x[0] - 2.0).abs() < 1e-9);
        assert!((sol.x[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_cheapest_combination() {
        // 两种方式凑出 1 单位 A：a 直接 (代价 2)，或 2b (每个代价 0.8)
        let mut lp = LinearProgram::new(vec![2.0, 0.8]);
        lp.add_equality(vec![1.0, 0.5], 1.0);

        let sol = lp.solve().unwrap();
        assert!((sol.value - 1.6).abs() < 1e-9);
        assert!(sol.x[0].abs() < 1e-9);
        assert!((sol.x[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_rhs_is_normalized() {
        let mut lp = LinearProgram::new(vec![1.0]);
        lp.add_equality(vec![-1.0], -4.0);

        let sol = lp.solve().unwrap();
        assert!((sol.x[0] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_infeasible() {
        // x = 1 且 x = 2
        let mut lp = LinearProgram::new(vec![1.0]);
        lp.add_equality(vec![1.0], 1.0);
        lp.add_equality(vec![1.0], 2.0);

        assert!(matches!(lp.solve(), Err(GarnetError::Infeasible(_))));
    }

    #[test]
    fn test_unbounded() {
        // min -x  s.t. x - y = 0
        let mut lp = LinearProgram::new(vec![-1.0, 0.0]);
        lp.add_equality(vec![1.0, -1.0], 0.0);

        assert!(matches!(lp.solve(), Err(GarnetError::Unbounded)));
    }

    #[test]
    fn test_redundant_rows() {
        let mut lp = LinearProgram::new(vec![1.0, 2.0]);
        lp.add_equality(vec![1.0, 1.0], 1.0);
        lp.add_equality(vec![2.0, 2.0], 2.0);

        let sol = lp.solve().unwrap();
        assert!((sol.value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut lp = LinearProgram::new(vec![1.0, 2.0]);
        lp.add_equality(vec![1.0], 1.0);
        assert!(matches!(lp.solve(), Err(GarnetError::DimensionMismatch(_))));
    }
}
