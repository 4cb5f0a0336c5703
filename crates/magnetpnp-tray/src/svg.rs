//! SVG surface
//! Collects paint calls as SVG elements, in paint order, so later calls
//! cover earlier ones the same way they would on a canvas.

use crate::surface::{Color, Point, Rect, Surface, SurfaceSize, TextStyle};
use magnetpnp_core::TrayError;
use std::fmt::Write as _;
use std::path::Path;

pub struct SvgSurface {
    size: SurfaceSize,
    elements: Vec<String>,
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            elements: Vec::new(),
        }
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn to_svg_string(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.size.width,
            h = self.size.height
        );
        for element in &self.elements {
            svg.push_str("  ");
            svg.push_str(element);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    pub fn save(&self, path: &Path) -> Result<(), TrayError> {
        std::fs::write(path, self.to_svg_string()).map_err(|e| TrayError::SurfaceUnavailable {
            reason: format!("{}: {}", path.display(), e),
        })
    }
}

impl Surface for SvgSurface {
    fn size(&self) -> Result<SurfaceSize, TrayError> {
        Ok(self.size)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.elements.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            rect.x, rect.y, rect.width, rect.height, color
        ));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        self.elements.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            rect.x, rect.y, rect.width, rect.height, color, line_width
        ));
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.elements.push(format!(
            r#"<polygon points="{}" fill="{}"/>"#,
            points_attr(points),
            color
        ));
    }

    fn stroke_polygon(&mut self, points: &[Point], color: Color, line_width: f64) {
        self.elements.push(format!(
            r#"<polygon points="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            points_attr(points),
            color,
            line_width
        ));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.elements.push(format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
            center.x, center.y, radius, color
        ));
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        self.elements.push(format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}px" dominant-baseline="text-before-edge" fill="{}">{}</text>"#,
            origin.x,
            origin.y,
            escape(&style.family),
            style.size_px,
            style.color,
            escape(text)
        ));
    }
}
