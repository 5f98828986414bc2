use crate::LabelMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Fill and stroke of a drawable. `None` means "not painted".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
    /// SVG `stroke-dasharray`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

impl Paint {
    pub fn fill(color: &str) -> Self {
        Self {
            fill: Some(color.to_string()),
            ..Self::default()
        }
    }

    pub fn stroke(color: &str, width: f64) -> Self {
        Self {
            stroke: Some(color.to_string()),
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn with_stroke(mut self, color: &str, width: f64) -> Self {
        self.stroke = Some(color.to_string());
        self.stroke_width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = Some(opacity);
        self
    }

    pub fn dashed(mut self, pattern: &str) -> Self {
        self.dash = Some(pattern.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    /// `y` is the top of the text.
    Hanging,
    /// `y` is the vertical center of the text.
    Central,
    Alphabetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub x: f64,
    pub y: f64,
    /// Raw label; `$...$` spans are interpreted at SVG time per [`LabelMode`].
    pub text: String,
    pub font_size: f64,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
    /// Degrees, clockwise, around `(x, y)`.
    #[serde(default)]
    pub rotation: f64,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Drawable {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(flatten)]
        paint: Paint,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        #[serde(flatten)]
        paint: Paint,
    },
    Path {
        d: String,
        #[serde(flatten)]
        paint: Paint,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        #[serde(flatten)]
        paint: Paint,
    },
    Text(TextData),
}

/// Drawables of one data series (one algorithm, or the ground truth).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesLayout {
    pub label: String,
    pub color: String,
    pub drawables: Vec<Drawable>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Violin,
    Box,
    Trajectory,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Violin => "violin",
            Self::Box => "box",
            Self::Trajectory => "trajectory",
        }
    }
}

/// A positioned chart in SVG user units (points), y pointing down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub kind: ChartKind,
    /// Accessible title; not drawn.
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub background: String,
    /// CSS font-family list.
    pub font_family: String,
    pub label_mode: LabelMode,
    pub plot_area: Bounds,
    /// Background, grid, spines, ticks and axis labels.
    pub frame: Vec<Drawable>,
    /// One entry per drawn label, in the order handed to the layout.
    pub series: Vec<SeriesLayout>,
    #[serde(default)]
    pub legend: Vec<Drawable>,
}

impl ChartLayout {
    pub fn series_labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.iter().map(|s| s.label.as_str())
    }

    pub fn series(&self, label: &str) -> Option<&SeriesLayout> {
        self.series.iter().find(|s| s.label == label)
    }

    /// Every text drawable, frame and legend included.
    pub fn texts(&self) -> impl Iterator<Item = &TextData> + '_ {
        self.frame
            .iter()
            .chain(self.series.iter().flat_map(|s| s.drawables.iter()))
            .chain(self.legend.iter())
            .filter_map(|d| match d {
                Drawable::Text(t) => Some(t),
                _ => None,
            })
    }
}
