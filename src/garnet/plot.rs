//! # 电压曲线图生成
//!
//! 使用 `plotters` 绘制嵌锂电压曲线。
//!
//! ## 功能
//! - 电压曲线（x: 0-16, V: 0-5.5）
//! - 化合物名称与带隙标注（参考锂含量附近，带箭头）
//! - 最低析氧电压标注（带箭头）
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/screen.rs` 调用
//! - 使用 `garnet/` 的 ScreeningResult
//! - 使用 `plotters` 渲染图表

use super::voltage;
use super::ScreeningResult;
use crate::error::{GarnetError, Result};

use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use std::path::Path;

const X_RANGE: std::ops::Range<f64> = 0.0..16.0;
const Y_RANGE: std::ops::Range<f64> = 0.0..5.5;

/// 箭头头部长度与半宽（像素）
const ARROW_HEAD_LEN: f64 = 12.0;
const ARROW_HEAD_HALF_WIDTH: f64 = 5.0;

/// 图像尺寸
#[derive(Debug, Clone, Copy)]
pub struct PlotSize {
    pub width: u32,
    pub height: u32,
}

impl Default for PlotSize {
    fn default() -> Self {
        PlotSize {
            width: 800,
            height: 600,
        }
    }
}

/// 生成电压曲线图
pub fn generate_voltage_plot(
    result: &ScreeningResult,
    reference_x: f64,
    output_path: &Path,
    size: PlotSize,
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, (size.width, size.height)).into_drawing_area();
        draw_voltage_chart(&root, result, reference_x)?;
        root.present()
            .map_err(|e| GarnetError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (size.width, size.height)).into_drawing_area();
        draw_voltage_chart(&root, result, reference_x)?;
        root.present()
            .map_err(|e| GarnetError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 绘制电压曲线的核心逻辑
fn draw_voltage_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    result: &ScreeningResult,
    reference_x: f64,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| GarnetError::PlotError(format!("{:?}", e)))?;

    let backbone = result.backbone.formula();

    let mut chart = ChartBuilder::on(root)
        .caption(
            format!("Lix{}", backbone),
            ("sans-serif", 24).into_font().style(FontStyle::Bold),
        )
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(X_RANGE, Y_RANGE)
        .map_err(|e| GarnetError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(format!("x in Lix{}", backbone))
        .y_desc("Voltage vs Li/Li+ (V)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 20))
        .draw()
        .map_err(|e| GarnetError::PlotError(format!("{:?}", e)))?;

    // 电压曲线
    chart
        .draw_series(LineSeries::new(
            result.profile.points.iter().map(|p| (p.x, p.voltage)),
            RED.stroke_width(2),
        ))
        .map_err(|e| GarnetError::PlotError(format!("{:?}", e)))?;

    // 组成与带隙标注
    let arrow_y = voltage::annotation_height(&result.profile.points, reference_x);
    let label = format!(
        "{}  Eg = {} eV",
        result.record.display_name(),
        result.record.band_gap_text()
    );
    annotate(
        root,
        &chart,
        &label,
        (reference_x + 0.25, arrow_y + 0.1),
        (reference_x + 0.6, arrow_y + 0.6),
    )?;

    // 最低析氧电压标注
    if let Some(o2) = result.oxygen_release {
        annotate(
            root,
            &chart,
            "O₂-released",
            (o2.x + 0.25, o2.voltage + 0.1),
            (o2.x + 0.6, o2.voltage + 0.6),
        )?;
    }

    Ok(())
}

/// 在 `text_at` 写标注文字，并画一个指向 `point_at` 的箭头
fn annotate<DB, CT>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartContext<'_, DB, CT>,
    text: &str,
    point_at: (f64, f64),
    text_at: (f64, f64),
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let head = chart.as_coord_spec().translate(&point_at);
    let tail = chart.as_coord_spec().translate(&text_at);

    root.draw(&Text::new(
        text.to_string(),
        (tail.0, tail.1 - 20),
        ("sans-serif", 20).into_font().color(&BLACK),
    ))
    .map_err(|e| GarnetError::PlotError(format!("{:?}", e)))?;

    draw_arrow(root, tail, head)
}

/// 像素坐标下的实心箭头
fn draw_arrow<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    tail: (i32, i32),
    head: (i32, i32),
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let dx = (head.0 - tail.0) as f64;
    let dy = (head.1 - tail.1) as f64;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1.0 {
        return Ok(());
    }
    let (ux, uy) = (dx / len, dy / len);

    let base = (
        head.0 as f64 - ux * ARROW_HEAD_LEN,
        head.1 as f64 - uy * ARROW_HEAD_LEN,
    );
    let left = (
        (base.0 - uy * ARROW_HEAD_HALF_WIDTH).round() as i32,
        (base.1 + ux * ARROW_HEAD_HALF_WIDTH).round() as i32,
    );
    let right = (
        (base.0 + uy * ARROW_HEAD_HALF_WIDTH).round() as i32,
        (base.1 - ux * ARROW_HEAD_HALF_WIDTH).round() as i32,
    );

    root.draw(&PathElement::new(vec![tail, head], BLACK.stroke_width(1)))
        .map_err(|e| GarnetError::PlotError(format!("{:?}", e)))?;
    root.draw(&Polygon::new(vec![head, left, right], BLUE.filled()))
        .map_err(|e| GarnetError::PlotError(format!("{:?}", e)))?;

    Ok(())
}
