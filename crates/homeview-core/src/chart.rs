//! Bar charts rendered to standalone SVG

use crate::axis::{format_number, LinearAxis};
use crate::colormap::categorical_color;
use serde::Serialize;

const TICK_TARGET: usize = 5;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 48.0;

/// One bar: a category label and its value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

impl Bar {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A categorical bar chart, one color per category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            bars: Vec::new(),
        }
    }

    /// Replace the bars
    pub fn with_bars(mut self, bars: Vec<Bar>) -> Self {
        self.bars = bars;
        self
    }

    /// Value of the bar with the given label
    pub fn value(&self, label: &str) -> Option<f64> {
        self.bars.iter().find(|b| b.label == label).map(|b| b.value)
    }

    /// Render as an SVG document of the given size
    pub fn to_svg(&self, width: u32, height: u32) -> String {
        let (w, h) = (f64::from(width), f64::from(height));
        let plot_w = (w - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
        let plot_h = (h - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
        let baseline = MARGIN_TOP + plot_h;

        let max_value = self
            .bars
            .iter()
            .map(|b| b.value)
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);
        let axis = LinearAxis::from_zero(max_value, TICK_TARGET);

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-family="sans-serif" font-size="11">"#,
        ));
        svg.push_str(&format!(
            r#"<text x="{}" y="20" text-anchor="middle" font-size="14">{}</text>"#,
            w / 2.0,
            escape_xml(&self.title),
        ));

        for tick in &axis.ticks {
            let y = baseline - tick.normalized * plot_h;
            svg.push_str(&format!(
                r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#E5ECF6"/><text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"##,
                MARGIN_LEFT + plot_w,
                MARGIN_LEFT - 6.0,
                y + 4.0,
                escape_xml(&tick.label),
            ));
        }

        let slot = plot_w / self.bars.len().max(1) as f64;
        for (i, bar) in self.bars.iter().enumerate() {
            let value = if bar.value.is_finite() { bar.value } else { 0.0 };
            let bar_h = axis.normalize(value) * plot_h;
            let x = MARGIN_LEFT + slot * i as f64 + slot * 0.1;
            svg.push_str(&format!(
                r#"<rect x="{x:.1}" y="{:.1}" width="{:.1}" height="{bar_h:.1}" fill="{}"><title>{}: {}</title></rect>"#,
                baseline - bar_h,
                slot * 0.8,
                categorical_color(i),
                escape_xml(&bar.label),
                format_number(value),
            ));
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
                x + slot * 0.4,
                baseline + 16.0,
                escape_xml(&bar.label),
            ));
        }

        svg.push_str(&format!(
            r#"<line x1="{MARGIN_LEFT}" y1="{baseline:.1}" x2="{:.1}" y2="{baseline:.1}" stroke="black"/>"#,
            MARGIN_LEFT + plot_w,
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            h - 10.0,
            escape_xml(&self.x_label),
        ));
        svg.push_str(&format!(
            r#"<text transform="translate(14 {:.1}) rotate(-90)" text-anchor="middle">{}</text>"#,
            MARGIN_TOP + plot_h / 2.0,
            escape_xml(&self.y_label),
        ));
        svg.push_str("</svg>");
        svg
    }
}

/// Escape text for XML/HTML content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> BarChart {
        BarChart::new("Houses per age", "age_house", "price")
            .with_bars(vec![Bar::new("new", 540_000.0), Bar::new("old", 535_000.0)])
    }

    #[test]
    fn test_svg_structure() {
        let svg = chart().to_svg(480, 320);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("Houses per age"));
        assert!(svg.contains(categorical_color(0)));
        assert!(svg.contains(categorical_color(1)));
    }

    #[test]
    fn test_svg_carries_every_part() {
        let svg = chart().to_svg(480, 320);
        assert!(svg.contains("<title>new: 540k</title>"));
        assert!(svg.contains(">age_house</text>"));
        assert!(svg.contains("rotate(-90)\" text-anchor=\"middle\">price</text>"));
        assert!(svg.matches("stroke=\"#E5ECF6\"").count() >= 2);
    }

    #[test]
    fn test_value_lookup() {
        assert_eq!(chart().value("old"), Some(535_000.0));
        assert_eq!(chart().value("ancient"), None);
    }

    #[test]
    fn test_escape_labels() {
        let svg = BarChart::new("<b>&</b>", "x", "y").to_svg(200, 100);
        assert!(svg.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
        assert!(!svg.contains("<b>"));
    }

    #[test]
    fn test_empty_chart() {
        let svg = BarChart::new("empty", "x", "y").to_svg(200, 100);
        assert_eq!(svg.matches("<rect").count(), 0);
    }
}
