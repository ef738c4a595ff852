//! # 数值格式化工具
//!
//! 提供 `%g` 风格的有效数字格式化。
//!
//! ## 依赖关系
//! - 被 `garnet/report.rs` 使用
//! - 无外部模块依赖

/// 按有效数字格式化（等价于 C/Python 的 `%.{digits}g`）
pub fn format_sig(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return format!("{}", value);
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let digits = digits.max(1);

    // 先按科学计数法舍入，得到舍入后的指数
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };

    if exponent < -4 || exponent >= digits as i32 {
        let mantissa = trim_fraction(&mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value))
    }
}

/// 去掉小数部分末尾的 0 和多余的小数点
fn trim_fraction(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}
