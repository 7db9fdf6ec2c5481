//! Built-in layout engine emitting SVG
//!
//! Interprets the style subset the card template uses (column/row flex
//! with optional space-between distribution, gap, padding, wrapping text
//! blocks, solid and two-stop gradient fills) and emits SVG markup.
//! Output is deterministic for a given tree and font set: text measurement
//! uses the registered faces' horizontal advances, falling back to a
//! per-weight width estimate when no face matches.

use super::fonts::fallback_width;
use super::{EngineError, FontFace, LayoutEngine};
use crate::helpers::escape_html;
use crate::template::{Align, Background, Direction, Element, Justify, Node};

/// Layout engine rendering document trees to SVG
pub struct SvgLayoutEngine {
    width: f32,
    height: f32,
    faces: Vec<FontFace>,
}

/// Text properties inherited down the tree
#[derive(Debug, Clone)]
struct TextStyle {
    family: String,
    weight: u16,
    size: f32,
    line_height: f32,
    letter_spacing: f32,
    color: String,
    uppercase: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            weight: 400,
            size: 16.0,
            line_height: 1.2,
            letter_spacing: 0.0,
            color: "#000000".to_string(),
            uppercase: false,
        }
    }
}

impl TextStyle {
    fn merge(&self, element: &Element) -> Self {
        let style = &element.style;
        Self {
            family: style.font_family.clone().unwrap_or_else(|| self.family.clone()),
            weight: style.font_weight.unwrap_or(self.weight),
            size: style.font_size.unwrap_or(self.size),
            line_height: style.line_height.unwrap_or(self.line_height),
            letter_spacing: style.letter_spacing.unwrap_or(self.letter_spacing),
            color: style.color.clone().unwrap_or_else(|| self.color.clone()),
            uppercase: style.uppercase || self.uppercase,
        }
    }
}

impl LayoutEngine for SvgLayoutEngine {
    fn layout(&self, tree: &Node) -> Result<Vec<u8>, EngineError> {
        let Node::Element(root) = tree else {
            return Err(EngineError::Layout(
                "document root must be an element".to_string(),
            ));
        };

        let width = root.style.width.unwrap_or(self.width);
        let height = root.style.height.unwrap_or(self.height);

        let mut out = String::new();
        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            fmt(width),
            fmt(height),
            fmt(width),
            fmt(height)
        ));
        out.push('\n');

        let mut gradients = Vec::new();
        collect_gradients(tree, &mut gradients);
        if !gradients.is_empty() {
            out.push_str("<defs>\n");
            for (index, (angle, from, to)) in gradients.iter().enumerate() {
                out.push_str(&gradient_def(index, *angle, from, to));
            }
            out.push_str("</defs>\n");
        }

        self.emit(&mut out, root, 0.0, 0.0, width, height, &TextStyle::default(), &gradients);
        out.push_str("</svg>\n");
        Ok(out.into_bytes())
    }
}

impl SvgLayoutEngine {
    /// Create an engine for the given canvas with the available faces
    pub fn new(width: u32, height: u32, faces: Vec<FontFace>) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            faces,
        }
    }

    fn face(&self, family: &str, weight: u16) -> Option<&FontFace> {
        self.faces
            .iter()
            .find(|f| f.family == family && f.weight == weight)
            .or_else(|| self.faces.iter().find(|f| f.family == family))
    }

    fn measure_text(&self, text: &str, ts: &TextStyle) -> f32 {
        match self.face(&ts.family, ts.weight) {
            Some(face) => face.measure(text, ts.size, ts.letter_spacing),
            None => fallback_width(text, ts.size, ts.weight, ts.letter_spacing),
        }
    }

    fn ascent(&self, ts: &TextStyle) -> f32 {
        match self.face(&ts.family, ts.weight) {
            Some(face) => face.ascent(ts.size),
            None => ts.size * 0.8,
        }
    }

    /// Greedy wrap by measured width; an over-wide word gets its own line
    fn wrap(&self, text: &str, ts: &TextStyle, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut line = String::new();

        for word in text.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if self.measure_text(&candidate, ts) <= max_width || line.is_empty() {
                line = candidate;
            } else {
                lines.push(line);
                line = word.to_string();
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }

    fn text_content(element: &Element, ts: &TextStyle) -> Option<String> {
        let mut parts = Vec::new();
        for child in &element.children {
            match child {
                Node::Text(t) => parts.push(t.as_str()),
                Node::Element(_) => return None,
            }
        }
        if parts.is_empty() {
            return None;
        }
        let joined = parts.join(" ");
        Some(if ts.uppercase {
            joined.to_uppercase()
        } else {
            joined
        })
    }

    fn measure_height(&self, element: &Element, avail_w: f32, parent: &TextStyle) -> f32 {
        let ts = parent.merge(element);
        if let Some(h) = element.style.height {
            return h;
        }

        let (pad_v, pad_h) = element.style.padding.unwrap_or((0.0, 0.0));
        let inner_w = bounded_width(element, avail_w) - 2.0 * pad_h;

        let content = if let Some(text) = Self::text_content(element, &ts) {
            self.wrap(&text, &ts, inner_w).len() as f32 * ts.size * ts.line_height
        } else {
            let children: Vec<&Element> = element_children(element);
            match element.style.direction.unwrap_or(Direction::Column) {
                Direction::Column => {
                    let gap = element.style.gap.unwrap_or(0.0);
                    let total: f32 = children
                        .iter()
                        .map(|c| self.measure_height(c, inner_w, &ts))
                        .sum();
                    total + gap * children.len().saturating_sub(1) as f32
                }
                Direction::Row => children
                    .iter()
                    .map(|c| self.measure_height(c, inner_w, &ts))
                    .fold(0.0, f32::max),
            }
        };

        content + 2.0 * pad_v
    }

    fn measure_width(&self, element: &Element, avail_w: f32, parent: &TextStyle) -> f32 {
        let ts = parent.merge(element);
        if let Some(w) = element.style.width {
            return w;
        }

        let (_, pad_h) = element.style.padding.unwrap_or((0.0, 0.0));
        let inner_w = bounded_width(element, avail_w) - 2.0 * pad_h;

        let content = if let Some(text) = Self::text_content(element, &ts) {
            self.wrap(&text, &ts, inner_w)
                .iter()
                .map(|line| self.measure_text(line, &ts))
                .fold(0.0, f32::max)
        } else {
            let children: Vec<&Element> = element_children(element);
            match element.style.direction.unwrap_or(Direction::Column) {
                Direction::Row => {
                    let gap = element.style.gap.unwrap_or(0.0);
                    let total: f32 = children
                        .iter()
                        .map(|c| self.measure_width(c, inner_w, &ts))
                        .sum();
                    total + gap * children.len().saturating_sub(1) as f32
                }
                Direction::Column => children
                    .iter()
                    .map(|c| self.measure_width(c, inner_w, &ts))
                    .fold(0.0, f32::max),
            }
        };

        content + 2.0 * pad_h
    }

    #[allow(clippy::too_many_arguments)]
    fn emit(
        &self,
        out: &mut String,
        element: &Element,
        x: f32,
        y: f32,
        avail_w: f32,
        avail_h: f32,
        parent: &TextStyle,
        gradients: &[(f32, String, String)],
    ) {
        let ts = parent.merge(element);
        let w = element.style.width.unwrap_or_else(|| bounded_width(element, avail_w));
        let h = element.style.height.unwrap_or(avail_h);

        if let Some(background) = &element.style.background {
            let fill = match background {
                Background::Solid(color) => color.clone(),
                Background::LinearGradient { angle, from, to } => {
                    let id = gradients
                        .iter()
                        .position(|g| g.0 == *angle && g.1 == *from && g.2 == *to)
                        .unwrap_or(0);
                    format!("url(#grad{})", id)
                }
            };
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
                fmt(x),
                fmt(y),
                fmt(w),
                fmt(h),
                fill
            ));
            if let Some(radius) = element.style.border_radius {
                // SVG clamps rx internally, but a pill radius larger than
                // half the box renders wrong in some rasterizers
                let rx = radius.min(w / 2.0).min(h / 2.0);
                out.push_str(&format!(r#" rx="{}""#, fmt(rx)));
            }
            out.push_str("/>\n");
        }

        let (pad_v, pad_h) = element.style.padding.unwrap_or((0.0, 0.0));
        let ix = x + pad_h;
        let iy = y + pad_v;
        let iw = w - 2.0 * pad_h;
        let ih = h - 2.0 * pad_v;

        if let Some(text) = Self::text_content(element, &ts) {
            self.emit_text(out, &text, ix, iy, iw, &ts);
            return;
        }

        let children = element_children(element);
        if children.is_empty() {
            return;
        }

        match element.style.direction.unwrap_or(Direction::Column) {
            Direction::Column => {
                let heights: Vec<f32> = children
                    .iter()
                    .map(|c| self.measure_height(c, iw, &ts))
                    .collect();
                let gap = effective_gap(&element.style.justify, element.style.gap, ih, &heights);
                let mut cy = iy;
                for (child, ch) in children.iter().zip(&heights) {
                    self.emit(out, child, ix, cy, iw, *ch, &ts, gradients);
                    cy += ch + gap;
                }
            }
            Direction::Row => {
                let widths: Vec<f32> = children
                    .iter()
                    .map(|c| self.measure_width(c, iw, &ts))
                    .collect();
                let heights: Vec<f32> = children
                    .iter()
                    .map(|c| self.measure_height(c, iw, &ts))
                    .collect();
                let gap = effective_gap(&element.style.justify, element.style.gap, iw, &widths);
                let mut cx = ix;
                for ((child, cw), ch) in children.iter().zip(&widths).zip(&heights) {
                    let cy = match element.style.align {
                        Some(Align::Center) => iy + (ih - ch) / 2.0,
                        _ => iy,
                    };
                    self.emit(out, child, cx, cy, *cw, *ch, &ts, gradients);
                    cx += cw + gap;
                }
            }
        }
    }

    fn emit_text(&self, out: &mut String, text: &str, x: f32, y: f32, max_width: f32, ts: &TextStyle) {
        let line_box = ts.size * ts.line_height;
        let ascent = self.ascent(ts);
        for (index, line) in self.wrap(text, ts, max_width).iter().enumerate() {
            let baseline = y + index as f32 * line_box + (line_box - ts.size) / 2.0 + ascent;
            out.push_str(&format!(
                r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" fill="{}""#,
                fmt(x),
                fmt(baseline),
                ts.family,
                fmt(ts.size),
                ts.weight,
                ts.color
            ));
            if ts.letter_spacing != 0.0 {
                out.push_str(&format!(r#" letter-spacing="{}""#, fmt(ts.letter_spacing)));
            }
            out.push('>');
            out.push_str(&escape_html(line));
            out.push_str("</text>\n");
        }
    }
}

fn element_children(element: &Element) -> Vec<&Element> {
    element
        .children
        .iter()
        .filter_map(|child| match child {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
        .collect()
}

fn bounded_width(element: &Element, avail_w: f32) -> f32 {
    match element.style.max_width {
        Some(max) => avail_w.min(max),
        None => avail_w,
    }
}

/// Space-between pads the configured gap with the leftover main-axis space
fn effective_gap(justify: &Option<Justify>, gap: Option<f32>, avail: f32, sizes: &[f32]) -> f32 {
    let base = gap.unwrap_or(0.0);
    if !matches!(justify, Some(Justify::SpaceBetween)) || sizes.len() < 2 {
        return base;
    }
    let used: f32 = sizes.iter().sum::<f32>() + base * (sizes.len() - 1) as f32;
    let leftover = (avail - used).max(0.0);
    base + leftover / (sizes.len() - 1) as f32
}

fn collect_gradients(node: &Node, gradients: &mut Vec<(f32, String, String)>) {
    if let Node::Element(element) = node {
        if let Some(Background::LinearGradient { angle, from, to }) = &element.style.background {
            let entry = (*angle, from.clone(), to.clone());
            if !gradients.contains(&entry) {
                gradients.push(entry);
            }
        }
        for child in &element.children {
            collect_gradients(child, gradients);
        }
    }
}

fn gradient_def(index: usize, angle: f32, from: &str, to: &str) -> String {
    // CSS angles point up at 0deg and rotate clockwise; SVG y grows down
    let radians = angle.to_radians();
    let dx = radians.sin() / 2.0;
    let dy = -radians.cos() / 2.0;
    format!(
        concat!(
            r#"<linearGradient id="grad{}" x1="{}" y1="{}" x2="{}" y2="{}">"#,
            r#"<stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/>"#,
            "</linearGradient>\n"
        ),
        index,
        fmt(0.5 - dx),
        fmt(0.5 - dy),
        fmt(0.5 + dx),
        fmt(0.5 + dy),
        from,
        to
    )
}

fn fmt(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}
