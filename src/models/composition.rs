//! # 化学组成数据模型
//!
//! 解析化学式（如 `Li3Nd3Te2O12`, `Li0.5CoO2`）并提供组成运算。
//!
//! 元素顺序按化学式中出现的顺序保存，渲染时保持不变；
//! 去重比较使用与顺序无关的约化键 [`Composition::reduced_key`]。
//!
//! ## 依赖关系
//! - 被 `thermo/`, `db/`, `garnet/` 使用
//! - 使用 `regex` 解析化学式

use crate::error::{GarnetError, Result};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// 小于该值的元素含量视为零
const AMOUNT_EPS: f64 = 1e-10;

fn formula_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Z][a-z]?)(\d+(?:\.\d+)?|\.\d+)?").unwrap())
}

/// 化学组成（有序的 元素 -> 含量 列表）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    amounts: Vec<(String, f64)>,
}

impl Composition {
    /// 解析化学式
    pub fn parse(formula: &str) -> Result<Self> {
        let formula = formula.trim();
        if formula.is_empty() {
            return Err(GarnetError::InvalidFormula {
                formula: formula.to_string(),
                reason: "empty formula".to_string(),
            });
        }

        let mut comp = Composition::default();
        let mut cursor = 0;

        for caps in formula_regex().captures_iter(formula) {
            let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
            if whole.0 != cursor {
                return Err(GarnetError::InvalidFormula {
                    formula: formula.to_string(),
                    reason: format!("unexpected text '{}'", &formula[cursor..whole.0]),
                });
            }
            cursor = whole.1;

            let element = &caps[1];
            let amount = match caps.get(2) {
                Some(m) => m.as_str().parse::<f64>().map_err(|_| GarnetError::InvalidFormula {
                    formula: formula.to_string(),
                    reason: format!("bad amount '{}'", m.as_str()),
                })?,
                None => 1.0,
            };
            comp.add_amount(element, amount);
        }

        if cursor != formula.len() {
            return Err(GarnetError::InvalidFormula {
                formula: formula.to_string(),
                reason: format!("unexpected text '{}'", &formula[cursor..]),
            });
        }

        Ok(comp)
    }

    /// 从 (元素, 含量) 对构造
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        let mut comp = Composition::default();
        for (el, amount) in pairs {
            comp.add_amount(&el.into(), amount);
        }
        comp
    }

    fn add_amount(&mut self, element: &str, amount: f64) {
        if let Some(slot) = self.amounts.iter_mut().find(|(el, _)| el == element) {
            slot.1 += amount;
        } else {
            self.amounts.push((element.to_string(), amount));
        }
    }

    /// 元素含量（不存在时为 0）
    pub fn get(&self, element: &str) -> f64 {
        self.amounts
            .iter()
            .find(|(el, _)| el == element)
            .map(|(_, a)| *a)
            .unwrap_or(0.0)
    }

    /// 是否含有该元素（含量为正）
    pub fn contains(&self, element: &str) -> bool {
        self.get(element) > AMOUNT_EPS
    }

    /// 含量为正的元素列表
    pub fn elements(&self) -> Vec<&str> {
        self.amounts
            .iter()
            .filter(|(_, a)| *a > AMOUNT_EPS)
            .map(|(el, _)| el.as_str())
            .collect()
    }

    /// 原子总数
    pub fn num_atoms(&self) -> f64 {
        self.amounts.iter().map(|(_, a)| a.max(0.0)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }

    /// 是否为单质
    pub fn is_elemental(&self) -> bool {
        self.elements().len() == 1
    }

    /// 所有元素都在给定元素集合内
    pub fn is_within(&self, space: &[String]) -> bool {
        self.elements().iter().all(|el| space.iter().any(|s| s == el))
    }


    /// 去掉某元素后的组成
    pub fn without(&self, element: &str) -> Self {
        Composition {
            amounts: self
                .amounts
                .iter()
                .filter(|(el, _)| el != element)
                .cloned()
                .collect(),
        }
    }

    /// 组成相加，保留 `self` 的元素顺序
    pub fn plus(&self, other: &Composition) -> Self {
        let mut comp = self.clone();
        for (el, a) in &other.amounts {
            comp.add_amount(el, *a);
        }
        comp
    }

    /// 组成相减（可能产生负含量，用于方向向量）
    pub fn minus(&self, other: &Composition) -> Self {
        let mut comp = self.clone();
        for (el, a) in &other.amounts {
            comp.add_amount(el, -*a);
        }
        comp
    }

    /// 按比例缩放
    pub fn scaled(&self, factor: f64) -> Self {
        Composition {
            amounts: self
                .amounts
                .iter()
                .map(|(el, a)| (el.clone(), a * factor))
                .collect(),
        }
    }

    /// 渲染化学式（保持元素顺序，略去含量 1）
    pub fn formula(&self) -> String {
        self.amounts
            .iter()
            .filter(|(_, a)| *a > AMOUNT_EPS)
            .map(|(el, a)| format!("{}{}", el, format_amount(*a)))
            .collect()
    }

    /// 使用 Unicode 下标渲染（用于图中标注）
    pub fn subscripted(&self) -> String {
        self.formula()
            .chars()
            .map(|c| match c {
                '0'..='9' => char::from_u32(0x2080 + c as u32 - '0' as u32).unwrap_or(c),
                _ => c,
            })
            .collect()
    }

    /// 与元素顺序和总量无关的约化键
    pub fn reduced_key(&self) -> String {
        let total = self.num_atoms();
        let mut parts: Vec<(&str, f64)> = self
            .amounts
            .iter()
            .filter(|(_, a)| *a > AMOUNT_EPS)
            .map(|(el, a)| (el.as_str(), a / total))
            .collect();
        parts.sort_by(|a, b| a.0.cmp(b.0));
        parts
            .iter()
            .map(|(el, f)| format!("{}{:.6}", el, f))
            .collect::<Vec<_>>()
            .join("")
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formula())
    }
}

/// 格式化含量：整数不带小数点，1 省略
fn format_amount(amount: f64) -> String {
    let rounded = amount.round();
    if (amount - rounded).abs() < 1e-8 {
        if rounded as i64 == 1 {
            String::new()
        } else {
            format!("{}", rounded as i64)
        }
    } else {
        let s = format!("{:.6}", amount);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_garnet_formula() {
        let comp = Composition::parse("Li3Nd3Te2O12").unwrap();
        assert_eq!(comp.elements(), vec!["Li", "Nd", "Te", "O"]);
        assert!((comp.get("Li") - 3.0).abs() < 1e-12);
        assert!((comp.get("O") - 12.0).abs() < 1e-12);
        assert!((comp.num_atoms() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_fractional_and_implicit_one() {
        let comp = Composition::parse("Li0.5CoO2").unwrap();
        assert!((comp.get("Li") - 0.5).abs() < 1e-12);
        assert!((comp.get("Co") - 1.0).abs() < 1e-12);
        assert_eq!(comp.formula(), "Li0.5CoO2");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Composition::parse("").is_err());
        assert!(Composition::parse("li3O").is_err());
        assert!(Composition::parse("Li3-O").is_err());
    }

    #[test]
    fn test_repeated_element_is_merged() {
        let comp = Composition::parse("OLi2O").unwrap();
        assert!((comp.get("O") - 2.0).abs() < 1e-12);
        assert_eq!(comp.elements().len(), 2);
    }

    #[test]
    fn test_without_lithium_keeps_order() {
        let comp = Composition::parse("Li3Nd3Te2O12").unwrap();
        assert_eq!(comp.without("Li").formula(), "Nd3Te2O12");
    }

    #[test]
    fn test_plus_minus_scaled() {
        let backbone = Composition::parse("Nd3Te2O12").unwrap();
        let li = Composition::from_pairs([("Li", 15.0)]);
        let lithiated = backbone.plus(&li);
        assert!((lithiated.get("Li") - 15.0).abs() < 1e-12);

        let direction = lithiated.minus(&backbone);
        assert_eq!(direction.elements(), vec!["Li"]);

        let half = lithiated.scaled(0.5);
        assert!((half.get("O") - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_reduced_key_ignores_order_and_scale() {
        let a = Composition::parse("Li2O").unwrap();
        let b = Composition::parse("O2Li4").unwrap();
        assert_eq!(a.reduced_key(), b.reduced_key());
        assert_ne!(a.reduced_key(), Composition::parse("Li2O2").unwrap().reduced_key());
    }

    #[test]
    fn test_is_within() {
        let comp = Composition::parse("Li2O").unwrap();
        let space = vec!["Li".to_string(), "O".to_string(), "Nd".to_string()];
        assert!(comp.is_within(&space));
        assert!(!Composition::parse("TeO2").unwrap().is_within(&space));
    }

    #[test]
    fn test_subscripted() {
        let comp = Composition::parse("Li3Nd3Te2O12").unwrap();
        assert_eq!(comp.subscripted(), "Li₃Nd₃Te₂O₁₂");
    }
}
