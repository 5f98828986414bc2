use crate::model::{Bounds, Drawable, Paint, TextAnchor, TextBaseline, TextData};
use crate::text::{TextMeasurer, TextStyle, display_text};
use crate::RenderConfig;

const OUTER_PAD: f64 = 4.0;
const TICK_LEN: f64 = 3.5;
const TICK_GAP: f64 = 3.0;
const LABEL_GAP: f64 = 4.0;

#[derive(Debug, Clone)]
pub(crate) struct Tick {
    /// Position along the axis, in canvas units.
    pub pos: f64,
    pub label: String,
}

#[derive(Debug, Clone)]
pub(crate) struct AxisSpec<'a> {
    pub ticks: Vec<Tick>,
    pub label: Option<&'a str>,
    pub grid: bool,
}

/// Axis decoration shared by every chart: plot background, grid, spines, ticks, labels.
pub(crate) struct Frame<'a> {
    config: &'a RenderConfig,
    measurer: &'a dyn TextMeasurer,
}

impl<'a> Frame<'a> {
    pub fn new(config: &'a RenderConfig, measurer: &'a dyn TextMeasurer) -> Self {
        Self { config, measurer }
    }

    fn tick_len(&self) -> f64 {
        if self.config.theme.colors().tick_marks {
            TICK_LEN
        } else {
            0.0
        }
    }

    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        self.measurer
            .measure(&display_text(text), &TextStyle::sized(font_size))
            .width
    }

    fn line_height(&self, font_size: f64) -> f64 {
        self.measurer.measure("0", &TextStyle::sized(font_size)).height
    }

    /// Plot area left after reserving room for tick labels and axis labels.
    ///
    /// Tick positions are not known yet at this point, so only their label texts are measured.
    pub fn plot_area(
        &self,
        x_labels: &[String],
        y_labels: &[String],
        x_title: bool,
        y_title: bool,
    ) -> Bounds {
        let (width, height) = self.config.canvas_size();
        let tick_fs = self.config.tick_font_size();
        let label_fs = self.config.font_size;

        let y_tick_w = y_labels
            .iter()
            .map(|l| self.text_width(l, tick_fs))
            .fold(0.0, f64::max);
        let x_tick_w = x_labels
            .iter()
            .map(|l| self.text_width(l, tick_fs))
            .fold(0.0, f64::max);
        let title_h = self.line_height(label_fs) + LABEL_GAP;

        let left = OUTER_PAD
            + if y_title { title_h } else { 0.0 }
            + y_tick_w
            + TICK_GAP
            + self.tick_len();
        let bottom = OUTER_PAD
            + self.line_height(tick_fs)
            + TICK_GAP
            + self.tick_len()
            + if x_title { title_h } else { 0.0 };
        let top = OUTER_PAD + self.line_height(tick_fs) / 2.0;
        let right = OUTER_PAD + x_tick_w / 2.0;

        Bounds {
            min_x: left,
            min_y: top,
            max_x: (width - right).max(left + 1.0),
            max_y: (height - bottom).max(top + 1.0),
        }
    }

    pub fn draw(&self, plot: &Bounds, x: &AxisSpec<'_>, y: &AxisSpec<'_>) -> Vec<Drawable> {
        let theme = self.config.theme.colors();
        let tick_fs = self.config.tick_font_size();
        let label_fs = self.config.font_size;
        let tick_len = self.tick_len();
        let mut out = Vec::new();

        out.push(Drawable::Rect {
            x: plot.min_x,
            y: plot.min_y,
            width: plot.width(),
            height: plot.height(),
            paint: Paint::fill(theme.plot_background),
        });

        if let Some(grid) = theme.grid {
            if x.grid {
                for t in &x.ticks {
                    out.push(Drawable::Line {
                        x1: t.pos,
                        y1: plot.min_y,
                        x2: t.pos,
                        y2: plot.max_y,
                        paint: Paint::stroke(grid, 0.8),
                    });
                }
            }
            if y.grid {
                for t in &y.ticks {
                    out.push(Drawable::Line {
                        x1: plot.min_x,
                        y1: t.pos,
                        x2: plot.max_x,
                        y2: t.pos,
                        paint: Paint::stroke(grid, 0.8),
                    });
                }
            }
        }

        if let Some(spine) = theme.spine {
            out.push(Drawable::Rect {
                x: plot.min_x,
                y: plot.min_y,
                width: plot.width(),
                height: plot.height(),
                paint: Paint::stroke(spine, 1.0),
            });
        }

        if tick_len > 0.0 {
            for t in &x.ticks {
                out.push(Drawable::Line {
                    x1: t.pos,
                    y1: plot.max_y,
                    x2: t.pos,
                    y2: plot.max_y + tick_len,
                    paint: Paint::stroke(theme.text, 0.8),
                });
            }
            for t in &y.ticks {
                out.push(Drawable::Line {
                    x1: plot.min_x - tick_len,
                    y1: t.pos,
                    x2: plot.min_x,
                    y2: t.pos,
                    paint: Paint::stroke(theme.text, 0.8),
                });
            }
        }

        let x_tick_y = plot.max_y + tick_len + TICK_GAP;
        for t in &x.ticks {
            out.push(self.text(
                t.pos,
                x_tick_y,
                &t.label,
                tick_fs,
                TextAnchor::Middle,
                TextBaseline::Hanging,
            ));
        }
        for t in &y.ticks {
            out.push(self.text(
                plot.min_x - tick_len - TICK_GAP,
                t.pos,
                &t.label,
                tick_fs,
                TextAnchor::End,
                TextBaseline::Central,
            ));
        }

        if let Some(label) = x.label {
            let y_pos = x_tick_y + self.line_height(tick_fs) + LABEL_GAP;
            let cx = (plot.min_x + plot.max_x) / 2.0;
            out.push(self.text(
                cx,
                y_pos,
                label,
                label_fs,
                TextAnchor::Middle,
                TextBaseline::Hanging,
            ));
        }
        if let Some(label) = y.label {
            let x_pos = OUTER_PAD + self.line_height(label_fs) / 2.0;
            let cy = (plot.min_y + plot.max_y) / 2.0;
            let mut text = self.text_data(
                x_pos,
                cy,
                label,
                label_fs,
                TextAnchor::Middle,
                TextBaseline::Central,
            );
            text.rotation = -90.0;
            out.push(Drawable::Text(text));
        }

        out
    }

    pub fn text(
        &self,
        x: f64,
        y: f64,
        text: &str,
        font_size: f64,
        anchor: TextAnchor,
        baseline: TextBaseline,
    ) -> Drawable {
        Drawable::Text(self.text_data(x, y, text, font_size, anchor, baseline))
    }

    fn text_data(
        &self,
        x: f64,
        y: f64,
        text: &str,
        font_size: f64,
        anchor: TextAnchor,
        baseline: TextBaseline,
    ) -> TextData {
        TextData {
            x,
            y,
            text: text.to_string(),
            font_size,
            anchor,
            baseline,
            rotation: 0.0,
            fill: self.config.theme.colors().text.to_string(),
        }
    }

    pub fn measure_width(&self, text: &str, font_size: f64) -> f64 {
        self.text_width(text, font_size)
    }

    pub fn measure_line(&self, font_size: f64) -> f64 {
        self.line_height(font_size)
    }
}
