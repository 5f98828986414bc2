use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// SVG user units per inch. Layouts are computed in points, so a 3.5 in figure is 252 units
/// wide and rasterizing at `dpi / 72` yields the requested pixel density.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Per-algorithm colors used by the upstream plots.
pub const DEFAULT_COLORS: [(&str, &str); 6] = [
    ("FGO", "#4C72B0"),
    ("TM", "#DD8452"),
    ("EKF", "#55A868"),
    ("UKF", "#C44E52"),
    ("IEKF", "#8172B2"),
    ("DVL", "#FFC107"),
];

/// Fallback cycle for labels without a configured color (seaborn "deep").
const DEEP_PALETTE: [&str; 10] = [
    "#4C72B0", "#DD8452", "#55A868", "#C44E52", "#8172B3", "#937860", "#DA8BC3", "#8C8C8C",
    "#CCB974", "#64B5CD",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    #[serde(rename = "serif")]
    Serif,
    #[serde(rename = "sans-serif")]
    SansSerif,
    #[serde(rename = "monospace")]
    Monospace,
}

impl FontFamily {
    /// CSS `font-family` list.
    pub fn css(self) -> &'static str {
        match self {
            Self::Serif => "\"Times New Roman\",\"DejaVu Serif\",serif",
            Self::SansSerif => "\"DejaVu Sans\",Arial,sans-serif",
            Self::Monospace => "\"DejaVu Sans Mono\",monospace",
        }
    }
}

impl FromStr for FontFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serif" => Ok(Self::Serif),
            "sans-serif" | "sans" => Ok(Self::SansSerif),
            "monospace" | "mono" => Ok(Self::Monospace),
            other => Err(Error::invalid_option(
                "font-family",
                format!("unknown font family `{other}`"),
            )),
        }
    }
}

/// Chart styling presets, named after the seaborn styles the upstream plots use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    WhiteGrid,
    DarkGrid,
    White,
    Ticks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub plot_background: &'static str,
    pub grid: Option<&'static str>,
    pub spine: Option<&'static str>,
    pub tick_marks: bool,
    pub text: &'static str,
}

impl Theme {
    pub fn colors(self) -> ThemeColors {
        match self {
            Self::WhiteGrid => ThemeColors {
                plot_background: "white",
                grid: Some("#cccccc"),
                spine: Some("#cccccc"),
                tick_marks: false,
                text: "#262626",
            },
            Self::DarkGrid => ThemeColors {
                plot_background: "#EAEAF2",
                grid: Some("white"),
                spine: None,
                tick_marks: false,
                text: "#262626",
            },
            Self::White => ThemeColors {
                plot_background: "white",
                grid: None,
                spine: Some("#262626"),
                tick_marks: false,
                text: "#262626",
            },
            Self::Ticks => ThemeColors {
                plot_background: "white",
                grid: None,
                spine: Some("#262626"),
                tick_marks: true,
                text: "#262626",
            },
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whitegrid" => Ok(Self::WhiteGrid),
            "darkgrid" => Ok(Self::DarkGrid),
            "white" => Ok(Self::White),
            "ticks" => Ok(Self::Ticks),
            other => Err(Error::invalid_option("theme", format!("unknown theme `{other}`"))),
        }
    }
}

/// How `$...$` spans in labels are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// Math spans are set in italics, delimiters removed.
    Tex,
    /// Delimiters removed, no styling.
    Plain,
}

impl FromStr for LabelMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tex" => Ok(Self::Tex),
            "plain" => Ok(Self::Plain),
            other => Err(Error::invalid_option(
                "label-mode",
                format!("unknown label mode `{other}`"),
            )),
        }
    }
}

/// Explicit styling passed to every layout call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// `[width, height]` in inches.
    pub figure_size: [f64; 2],
    pub dpi: f64,
    pub font_family: FontFamily,
    pub theme: Theme,
    pub label_mode: LabelMode,
    /// Axis label size in points; tick and legend text is drawn slightly smaller.
    pub font_size: f64,
    pub background: String,
    pub colors: IndexMap<String, String>,
    pub ground_truth_color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            figure_size: [3.5, 3.0],
            dpi: 300.0,
            font_family: FontFamily::Serif,
            theme: Theme::WhiteGrid,
            label_mode: LabelMode::Tex,
            font_size: 9.6,
            background: "white".to_string(),
            colors: DEFAULT_COLORS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ground_truth_color: "black".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        let [w, h] = self.figure_size;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(Error::invalid_option(
                "figure_size",
                "width and height must be positive",
            ));
        }
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(Error::invalid_option("dpi", "must be positive"));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(Error::invalid_option("font_size", "must be positive"));
        }
        Ok(())
    }

    /// Canvas size in SVG user units (points).
    pub fn canvas_size(&self) -> (f64, f64) {
        (
            self.figure_size[0] * POINTS_PER_INCH,
            self.figure_size[1] * POINTS_PER_INCH,
        )
    }

    /// Raster scale factor that turns the point-sized canvas into `dpi` pixels per inch.
    pub fn raster_scale(&self) -> f64 {
        self.dpi / POINTS_PER_INCH
    }

    pub fn tick_font_size(&self) -> f64 {
        self.font_size * 11.0 / 12.0
    }

    /// Configured color for `label`, else the `index`-th palette color.
    pub fn color_for(&self, label: &str, index: usize) -> &str {
        self.colors
            .get(label)
            .map(String::as_str)
            .unwrap_or(DEEP_PALETTE[index % DEEP_PALETTE.len()])
    }
}

/// Parses `3.5x3.0` (also `3.5,3.0`) into a figure size.
pub fn parse_figure_size(s: &str) -> Result<[f64; 2]> {
    let err = || Error::invalid_option("figsize", format!("expected `<w>x<h>`, got `{s}`"));
    let (w, h) = s
        .split_once(['x', 'X', ','])
        .ok_or_else(err)?;
    let w: f64 = w.trim().parse().map_err(|_| err())?;
    let h: f64 = h.trim().parse().map_err(|_| err())?;
    Ok([w, h])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_paper_figure_settings() {
        let cfg = RenderConfig::default();
        assert_eq!(cfg.canvas_size(), (252.0, 216.0));
        assert!((cfg.raster_scale() - 300.0 / 72.0).abs() < 1e-12);
        assert_eq!(cfg.color_for("EKF", 0), "#55A868");
        assert_eq!(cfg.color_for("other", 1), "#DD8452");
        cfg.validate().unwrap();
    }

    #[test]
    fn options_parse_from_cli_spellings() {
        assert_eq!("sans-serif".parse::<FontFamily>().unwrap(), FontFamily::SansSerif);
        assert_eq!("DarkGrid".parse::<Theme>().unwrap(), Theme::DarkGrid);
        assert_eq!("plain".parse::<LabelMode>().unwrap(), LabelMode::Plain);
        assert!("fancy".parse::<Theme>().is_err());
        assert_eq!(parse_figure_size("7x4.5").unwrap(), [7.0, 4.5]);
        assert!(parse_figure_size("7").is_err());
    }

    #[test]
    fn config_section_deserializes_with_defaults() {
        let cfg: RenderConfig = serde_json::from_str(
            r#"{"theme": "ticks", "font_family": "monospace", "colors": {"FGO": "red"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.theme, Theme::Ticks);
        assert_eq!(cfg.font_family, FontFamily::Monospace);
        assert_eq!(cfg.color_for("FGO", 0), "red");
        assert_eq!(cfg.figure_size, [3.5, 3.0]);
    }
}
