//! Chart rendering for the markdown report
//!
//! Charts are an optional capability: the report generator receives an
//! `Option<&dyn ChartRenderer>` and degrades to a textual notice when it is
//! absent or when rendering fails. PNG is the default format; SVG is
//! available for text-only pipelines.

use std::fmt::Write as _;
use std::path::Path;

use image::{Rgb, RgbImage};

use crate::pipeline::error::{IvError, IvResult};
use crate::pipeline::woe::FeatureIv;

/// Data for one bar chart: feature names against IV
#[derive(Debug, Clone)]
pub struct BarChart<'a> {
    pub title: String,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub bars: &'a [FeatureIv],
}

impl<'a> BarChart<'a> {
    /// Top-IV chart for one segment
    pub fn top_iv(segment: &str, bars: &'a [FeatureIv]) -> Self {
        Self {
            title: format!("Top IV Features - {}", segment),
            x_label: "Feature",
            y_label: "IV",
            bars,
        }
    }
}

/// Something that can turn a [`BarChart`] into an image file
pub trait ChartRenderer {
    /// Extension (without dot) of the files this renderer produces
    fn file_extension(&self) -> &str;

    /// Render `chart` to `path`, replacing any existing file
    fn render(&self, chart: &BarChart<'_>, path: &Path) -> IvResult<()>;
}

/// Image format of the per-segment charts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartFormat {
    #[default]
    Png,
    Svg,
}

impl ChartFormat {
    /// Renderer producing this format with default styling
    pub fn renderer(self) -> Box<dyn ChartRenderer> {
        match self {
            ChartFormat::Png => Box::new(PngChartRenderer::default()),
            ChartFormat::Svg => Box::new(SvgChartRenderer::default()),
        }
    }
}

impl std::fmt::Display for ChartFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartFormat::Png => write!(f, "png"),
            ChartFormat::Svg => write!(f, "svg"),
        }
    }
}

impl std::str::FromStr for ChartFormat {
    type Err = IvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(ChartFormat::Png),
            "svg" => Ok(ChartFormat::Svg),
            _ => Err(IvError::invalid_config(format!(
                "Unsupported chart format: '{}'. Use 'png' or 'svg'.",
                s
            ))),
        }
    }
}

/// Positive, finite bar heights; anything else draws as zero
fn bar_value(iv: f64) -> f64 {
    if iv.is_finite() {
        iv.max(0.0)
    } else {
        0.0
    }
}

fn max_bar_value(bars: &[FeatureIv]) -> f64 {
    bars.iter().map(|b| bar_value(b.iv)).fold(0.0f64, f64::max)
}

// ============================================================================
// PNG
// ============================================================================

const AXIS_COLOR: Rgb<u8> = Rgb([51, 51, 51]);
const GRID_COLOR: Rgb<u8> = Rgb([221, 221, 221]);
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Renders vertical bar charts as PNG bitmaps.
///
/// Only geometry is drawn (bars, axes, quarter gridlines); feature names and
/// values are listed next to the chart in the report.
#[derive(Debug, Clone)]
pub struct PngChartRenderer {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub bar_color: Rgb<u8>,
}

impl Default for PngChartRenderer {
    fn default() -> Self {
        Self {
            width: 900,
            height: 450,
            margin: 40,
            bar_color: Rgb([0x4B, 0x8B, 0xBE]),
        }
    }
}

/// Fill a rectangle, clipped to the image bounds
fn fill_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(width).min(img.width());
    let y_end = y.saturating_add(height).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

impl PngChartRenderer {
    /// Rasterize a chart into an RGB image
    pub fn to_image(&self, chart: &BarChart<'_>) -> RgbImage {
        let mut img = RgbImage::from_pixel(self.width.max(1), self.height.max(1), BACKGROUND);

        let left = self.margin;
        let top = self.margin / 2;
        let plot_w = self.width.saturating_sub(left + self.margin / 2).max(1);
        let plot_h = self.height.saturating_sub(top + self.margin).max(1);
        let baseline = top + plot_h;

        for quarter in 1..=4 {
            let y = baseline - plot_h * quarter / 4;
            fill_rect(&mut img, left, y, plot_w, 1, GRID_COLOR);
        }

        let max_iv = max_bar_value(chart.bars);
        if !chart.bars.is_empty() {
            let slot = plot_w as f64 / chart.bars.len() as f64;
            let bar_w = ((slot * 0.7) as u32).max(1);
            for (i, bar) in chart.bars.iter().enumerate() {
                let h = if max_iv > 0.0 {
                    (bar_value(bar.iv) / max_iv * plot_h as f64).round() as u32
                } else {
                    0
                };
                let x = left + (slot * i as f64 + (slot - bar_w as f64) / 2.0) as u32;
                fill_rect(&mut img, x, baseline - h, bar_w, h, self.bar_color);
            }
        }

        fill_rect(&mut img, left, baseline, plot_w, 1, AXIS_COLOR);
        fill_rect(&mut img, left, top, 1, plot_h + 1, AXIS_COLOR);
        img
    }
}

impl ChartRenderer for PngChartRenderer {
    fn file_extension(&self) -> &str {
        "png"
    }

    fn render(&self, chart: &BarChart<'_>, path: &Path) -> IvResult<()> {
        self.to_image(chart).save(path)?;
        Ok(())
    }
}

// ============================================================================
// SVG
// ============================================================================

/// Renders vertical bar charts as standalone SVG documents
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    pub width: u32,
    pub height: u32,
    pub bar_color: String,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self {
            width: 720,
            height: 360,
            bar_color: "#4B8BBE".to_string(),
        }
    }
}

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 90.0;

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

impl SvgChartRenderer {
    /// Build the SVG document for a chart
    pub fn to_svg(&self, chart: &BarChart<'_>) -> String {
        let width = self.width as f64;
        let height = self.height as f64;
        let plot_w = (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
        let plot_h = (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
        let baseline = MARGIN_TOP + plot_h;

        let max_iv = max_bar_value(chart.bars);
        let scale = if max_iv > 0.0 { plot_h / max_iv } else { 0.0 };
        let slot = plot_w / chart.bars.len().max(1) as f64;
        let bar_w = slot * 0.7;

        let mut svg = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="24" text-anchor="middle" font-family="sans-serif" font-size="16">{}</text>"#,
            width / 2.0,
            escape_xml(&chart.title)
        );
        let _ = writeln!(
            svg,
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#333"/>"##,
            MARGIN_LEFT,
            baseline,
            MARGIN_LEFT + plot_w,
            baseline
        );
        let _ = writeln!(
            svg,
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#333"/>"##,
            MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, baseline
        );

        for (i, bar) in chart.bars.iter().enumerate() {
            let h = bar_value(bar.iv) * scale;
            let x = MARGIN_LEFT + slot * i as f64 + (slot - bar_w) / 2.0;
            let center = x + bar_w / 2.0;
            let _ = writeln!(
                svg,
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {:.4}</title></rect>"#,
                x,
                baseline - h,
                bar_w,
                h,
                escape_xml(&self.bar_color),
                escape_xml(&bar.feature),
                bar.iv
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-family="sans-serif" font-size="11" transform="rotate(-45 {:.1} {:.1})">{}</text>"#,
                center,
                baseline + 14.0,
                center,
                baseline + 14.0,
                escape_xml(&bar.feature)
            );
        }

        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="12">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            height - 8.0,
            escape_xml(chart.x_label)
        );
        let _ = writeln!(
            svg,
            r#"<text x="16" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="12" transform="rotate(-90 16 {:.1})">{}</text>"#,
            MARGIN_TOP + plot_h / 2.0,
            MARGIN_TOP + plot_h / 2.0,
            escape_xml(chart.y_label)
        );
        svg.push_str("</svg>\n");
        svg
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn file_extension(&self) -> &str {
        "svg"
    }

    fn render(&self, chart: &BarChart<'_>, path: &Path) -> IvResult<()> {
        std::fs::write(path, self.to_svg(chart))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_contains_bars_and_escaped_labels() {
        let bars = vec![
            FeatureIv { feature: "a<b".into(), iv: 0.5 },
            FeatureIv { feature: "c".into(), iv: 0.25 },
        ];
        let svg = SvgChartRenderer::default().to_svg(&BarChart::top_iv("MTB", &bars));

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Top IV Features - MTB"));
        assert!(svg.contains("a&lt;b"));
        assert_eq!(svg.matches("<rect x=").count(), 2);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_png_draws_scaled_bars() {
        let bars = vec![
            FeatureIv { feature: "strong".into(), iv: 0.4 },
            FeatureIv { feature: "weak".into(), iv: 0.1 },
        ];
        let renderer = PngChartRenderer::default();
        let img = renderer.to_image(&BarChart::top_iv("MTB", &bars));
        assert_eq!(img.dimensions(), (900, 450));

        // Plot area is 840 px wide, 2 slots of 420 px; baseline at y = 410
        let bar_pixels = |x: u32| (20..410).filter(|&y| *img.get_pixel(x, y) == renderer.bar_color).count();
        let tall = bar_pixels(40 + 210);
        let short = bar_pixels(40 + 630);
        assert_eq!(tall, 390);
        assert!((short as i64 - 98).abs() <= 1, "short bar was {} px", short);
    }

    #[test]
    fn test_png_zero_iv_has_no_bars() {
        let bars = vec![FeatureIv { feature: "flat".into(), iv: 0.0 }];
        let renderer = PngChartRenderer::default();
        let img = renderer.to_image(&BarChart::top_iv("S", &bars));
        assert!(img.pixels().all(|p| *p != renderer.bar_color));
    }

    #[test]
    fn test_chart_format_parsing() {
        assert_eq!("PNG".parse::<ChartFormat>().unwrap(), ChartFormat::Png);
        assert_eq!("svg".parse::<ChartFormat>().unwrap(), ChartFormat::Svg);
        assert!("gif".parse::<ChartFormat>().is_err());
        assert_eq!(ChartFormat::default().renderer().file_extension(), "png");
        assert_eq!(ChartFormat::Svg.renderer().file_extension(), "svg");
    }

    #[test]
    fn test_svg_handles_zero_iv() {
        let bars = vec![FeatureIv { feature: "flat".into(), iv: 0.0 }];
        let svg = SvgChartRenderer::default().to_svg(&BarChart::top_iv("S", &bars));
        assert!(svg.contains(r#"height="0.0""#));
    }
}
