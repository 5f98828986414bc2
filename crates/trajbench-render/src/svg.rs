use crate::model::{ChartLayout, Drawable, Paint, TextAnchor, TextBaseline, TextData};
use crate::text::math_spans;
use crate::LabelMode;
use std::fmt::Write as _;

#[derive(Debug, Clone, Default)]
pub struct SvgRenderOptions {
    /// Root element id; also scopes the embedded stylesheet.
    pub diagram_id: Option<String>,
}

/// Number formatting for SVG attributes: no `-0`, no float noise from layout arithmetic.
pub(crate) fn fmt(v: f64) -> String {
    let mut out = String::new();
    fmt_into(&mut out, v);
    out
}

pub(crate) fn fmt_into(out: &mut String, v: f64) {
    if !v.is_finite() {
        out.push('0');
        return;
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == -0.0 {
        v = 0.0;
    }
    let _ = write!(out, "{v}");
}

/// Path coordinates are rounded to 3 decimals, as d3-path does.
fn fmt_path_into(out: &mut String, v: f64) {
    fmt_into(out, (v * 1000.0).round() / 1000.0);
}

/// `M x,y L x,y ...` through `points`, closed with `Z` when `close` is set.
pub(crate) fn path_through(points: impl IntoIterator<Item = (f64, f64)>, close: bool) -> String {
    let mut d = String::new();
    for (i, (x, y)) in points.into_iter().enumerate() {
        d.push(if i == 0 { 'M' } else { 'L' });
        fmt_path_into(&mut d, x);
        d.push(',');
        fmt_path_into(&mut d, y);
    }
    if close && !d.is_empty() {
        d.push('Z');
    }
    d
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
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

fn paint_attrs(out: &mut String, paint: &Paint) {
    match &paint.fill {
        Some(fill) => {
            let _ = write!(out, r#" fill="{}""#, escape_xml(fill));
        }
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(opacity) = paint.fill_opacity {
        let _ = write!(out, r#" fill-opacity="{}""#, fmt(opacity));
    }
    if let Some(stroke) = &paint.stroke {
        let _ = write!(
            out,
            r#" stroke="{}" stroke-width="{}""#,
            escape_xml(stroke),
            fmt(paint.stroke_width)
        );
    }
    if let Some(dash) = &paint.dash {
        let _ = write!(out, r#" stroke-dasharray="{}""#, escape_xml(dash));
    }
}

fn text_element(out: &mut String, t: &TextData, mode: LabelMode) {
    let anchor = match t.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    let baseline = match t.baseline {
        TextBaseline::Hanging => "hanging",
        TextBaseline::Central => "central",
        TextBaseline::Alphabetic => "alphabetic",
    };
    let _ = write!(
        out,
        r#"<text x="{x}" y="{y}" font-size="{fs}" text-anchor="{anchor}" dominant-baseline="{baseline}" fill="{fill}""#,
        x = fmt(t.x),
        y = fmt(t.y),
        fs = fmt(t.font_size),
        fill = escape_xml(&t.fill),
    );
    if t.rotation != 0.0 {
        let _ = write!(
            out,
            r#" transform="rotate({} {} {})""#,
            fmt(t.rotation),
            fmt(t.x),
            fmt(t.y)
        );
    }
    out.push('>');
    for (span, math) in math_spans(&t.text) {
        if math && mode == LabelMode::Tex {
            let _ = write!(out, r#"<tspan font-style="italic">{}</tspan>"#, escape_xml(&span));
        } else {
            out.push_str(&escape_xml(&span));
        }
    }
    out.push_str("</text>");
}

fn drawable_element(out: &mut String, d: &Drawable, mode: LabelMode) {
    match d {
        Drawable::Rect {
            x,
            y,
            width,
            height,
            paint,
        } => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                fmt(*x),
                fmt(*y),
                fmt(*width),
                fmt(*height)
            );
            paint_attrs(out, paint);
            out.push_str("/>");
        }
        Drawable::Line {
            x1,
            y1,
            x2,
            y2,
            paint,
        } => {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                fmt(*x1),
                fmt(*y1),
                fmt(*x2),
                fmt(*y2)
            );
            paint_attrs(out, paint);
            out.push_str("/>");
        }
        Drawable::Path { d, paint } => {
            let _ = write!(out, r#"<path d="{}""#, escape_xml(d));
            paint_attrs(out, paint);
            out.push_str(r#" stroke-linejoin="round"/>"#);
        }
        Drawable::Circle { cx, cy, r, paint } => {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}""#,
                fmt(*cx),
                fmt(*cy),
                fmt(*r)
            );
            paint_attrs(out, paint);
            out.push_str("/>");
        }
        Drawable::Text(t) => text_element(out, t, mode),
    }
}

/// Renders a chart layout to a standalone SVG document.
///
/// Groups: `frame`, then one `series` group per layout series (carrying `data-label`), then
/// `legend` when the layout has one.
pub fn render_chart_svg(layout: &ChartLayout, options: &SvgRenderOptions) -> String {
    let id = escape_xml(options.diagram_id.as_deref().unwrap_or("trajbench"));
    let mode = layout.label_mode;

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}" role="graphics-document document" aria-roledescription="{kind}">"#,
        w = fmt(layout.width),
        h = fmt(layout.height),
        font = escape_xml(&layout.font_family),
        kind = layout.kind.as_str(),
    );
    if !layout.title.is_empty() {
        let _ = write!(&mut out, "<title>{}</title>", escape_xml(&layout.title));
    }
    let _ = write!(
        &mut out,
        "<style>#{id} text{{font-family:{};}}</style>",
        escape_xml(&layout.font_family)
    );
    let _ = write!(
        &mut out,
        r#"<rect class="background" x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        fmt(layout.width),
        fmt(layout.height),
        escape_xml(&layout.background)
    );

    out.push_str(r#"<g class="frame">"#);
    for d in &layout.frame {
        drawable_element(&mut out, d, mode);
    }
    out.push_str("</g>");

    for series in &layout.series {
        let _ = write!(
            &mut out,
            r#"<g class="series" data-label="{}">"#,
            escape_xml(&series.label)
        );
        for d in &series.drawables {
            drawable_element(&mut out, d, mode);
        }
        out.push_str("</g>");
    }

    if !layout.legend.is_empty() {
        out.push_str(r#"<g class="legend">"#);
        for d in &layout.legend {
            drawable_element(&mut out, d, mode);
        }
        out.push_str("</g>");
    }

    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_stable() {
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(1.0000000001), "1");
        assert_eq!(fmt(12.5), "12.5");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn paths_round_to_three_decimals() {
        assert_eq!(
            path_through([(0.0, 1.23456), (2.5, -0.0001)], true),
            "M0,1.235L2.5,0Z"
        );
        assert_eq!(path_through(Vec::new(), true), "");
    }

    #[test]
    fn xml_text_is_escaped() {
        assert_eq!(escape_xml(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }
}
