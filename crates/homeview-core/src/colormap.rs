//! Colors for charts and maps
//!
//! - Sequential: YlOrRd, used by the price choropleth
//! - Categorical: the palette used for bar chart categories

use serde::{Deserialize, Serialize};

/// A color in RGBA format (0.0 to 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a color from RGB (alpha = 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from hex string (e.g., "#FF5733" or "FF5733")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()? as f32 / 255.0;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()? as f32 / 255.0;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()? as f32 / 255.0;

        Some(Self::rgb(r, g, b))
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0.5, 0.5, 0.5)
    }
}

/// A colormap for mapping scalar values to colors
#[derive(Clone, Debug)]
pub struct Colormap {
    /// Name of the colormap
    pub name: String,
    /// Evenly spaced color stops
    colors: Vec<Color>,
}

impl Colormap {
    /// Create a colormap from evenly spaced colors
    pub fn from_colors(name: impl Into<String>, colors: Vec<Color>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Create a colormap from hex color strings; invalid entries are skipped
    pub fn from_hex(name: impl Into<String>, hex: &[&str]) -> Self {
        Self::from_colors(name, hex.iter().filter_map(|h| Color::from_hex(h)).collect())
    }

    /// Sample the colormap at a position (0.0 to 1.0)
    pub fn sample(&self, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        match self.colors.len() {
            0 => Color::default(),
            1 => self.colors[0],
            n => {
                let scaled = t * (n - 1) as f32;
                let index = (scaled.floor() as usize).min(n - 2);
                Color::lerp(&self.colors[index], &self.colors[index + 1], scaled - index as f32)
            }
        }
    }

    /// Sample `value` within `[min, max]`; a degenerate range samples the middle
    pub fn sample_range(&self, value: f64, min: f64, max: f64) -> Color {
        let t = if max > min { (value - min) / (max - min) } else { 0.5 };
        self.sample(t as f32)
    }

    /// Number of stops
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// The ColorBrewer YlOrRd sequential colormap (yellow to dark red)
pub fn ylorrd() -> Colormap {
    Colormap::from_hex(
        "YlOrRd",
        &[
            "#FFFFCC", "#FFEDA0", "#FED976", "#FEB24C", "#FD8D3C", "#FC4E2A", "#E31A1C",
            "#BD0026", "#800026",
        ],
    )
}

/// Categorical palette for bar chart categories
pub const CATEGORICAL_PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Color for the `index`-th category, cycling through the palette
pub fn categorical_color(index: usize) -> &'static str {
    CATEGORICAL_PALETTE[index % CATEGORICAL_PALETTE.len()]
}

/// Get a colormap by name
pub fn get_colormap(name: &str) -> Option<Colormap> {
    match name.to_lowercase().as_str() {
        "ylorrd" => Some(ylorrd()),
        "categorical" => Some(Colormap::from_hex("categorical", &CATEGORICAL_PALETTE)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_round_trip() {
        let color = Color::from_hex("#FD8D3C").unwrap();
        assert_eq!(color.to_hex(), "#FD8D3C");
        assert!(Color::from_hex("#FFF").is_none());
    }

    #[test]
    fn test_ylorrd_endpoints() {
        let cmap = ylorrd();
        assert_eq!(cmap.len(), 9);
        assert_eq!(cmap.sample(0.0).to_hex(), "#FFFFCC");
        assert_eq!(cmap.sample(1.0).to_hex(), "#800026");
        assert_eq!(cmap.sample(0.5).to_hex(), "#FD8D3C");
    }

    #[test]
    fn test_sample_range() {
        let cmap = ylorrd();
        assert_eq!(cmap.sample_range(10.0, 10.0, 20.0).to_hex(), "#FFFFCC");
        assert_eq!(cmap.sample_range(99.0, 10.0, 20.0).to_hex(), "#800026");
        // Degenerate range
        assert_eq!(cmap.sample_range(5.0, 5.0, 5.0).to_hex(), "#FD8D3C");
    }

    #[test]
    fn test_categorical_cycles() {
        assert_eq!(categorical_color(0), "#636EFA");
        assert_eq!(categorical_color(10), "#636EFA");
        assert!(get_colormap("YlOrRd").is_some());
        assert!(get_colormap("jet").is_none());
    }
}
