//! Raster surface backed by tiny-skia
//! Renders the tray into an in-memory RGBA pixmap that can be written as PNG.
//!
//! Labels are rasterized with rusttype from a system font; when none is
//! installed labels are left out and everything else is still drawn.

use crate::fonts;
use crate::surface::{Color, Point, Rect, Surface, SurfaceSize, TextStyle};
use magnetpnp_core::TrayError;
use rusttype::{point as rt_point, Scale};
use std::path::Path;
use tiny_skia::{FillRule, Paint, Path as SkPath, PathBuilder, Pixmap, Stroke, Transform};

fn to_skia(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255)
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia(color));
    paint.anti_alias = true;
    paint
}

fn rect_path(rect: Rect) -> Option<SkPath> {
    let r = tiny_skia::Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    )?;
    Some(PathBuilder::from_rect(r))
}

fn polygon_path(points: &[Point]) -> Option<SkPath> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for point in rest {
        pb.line_to(point.x as f32, point.y as f32);
    }
    pb.close();
    pb.finish()
}

/// A raster drawing surface.
pub struct PixmapSurface {
    pixmap: Pixmap,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, TrayError> {
        let pixmap = Pixmap::new(width, height).ok_or(TrayError::SurfaceUnavailable {
            reason: format!("cannot allocate {}x{} pixmap", width, height),
        })?;
        Ok(Self { pixmap })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Opaque color of a pixel, `None` outside the pixmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let pixel = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgb(pixel.red(), pixel.green(), pixel.blue()))
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, TrayError> {
        self.pixmap
            .encode_png()
            .map_err(|e| TrayError::SurfaceUnavailable {
                reason: format!("PNG encoding failed: {}", e),
            })
    }

    pub fn save_png(&self, path: &Path) -> Result<(), TrayError> {
        self.pixmap
            .save_png(path)
            .map_err(|e| TrayError::SurfaceUnavailable {
                reason: format!("{}: {}", path.display(), e),
            })
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        let (width, height) = (self.pixmap.width() as i32, self.pixmap.height() as i32);
        if x < 0 || y < 0 || x >= width || y >= height || coverage <= 0.0 {
            return;
        }
        let idx = ((y * width + x) * 4) as usize;
        let pixel = &mut self.pixmap.data_mut()[idx..idx + 4];

        // Source over, destination is opaque
        let alpha = coverage.clamp(0.0, 1.0);
        let mix = |src: u8, dst: u8| -> u8 {
            (f32::from(src) * alpha + f32::from(dst) * (1.0 - alpha)).round() as u8
        };
        pixel[0] = mix(color.r, pixel[0]);
        pixel[1] = mix(color.g, pixel[1]);
        pixel[2] = mix(color.b, pixel[2]);
        pixel[3] = 255;
    }
}

impl Surface for PixmapSurface {
    fn size(&self) -> Result<SurfaceSize, TrayError> {
        Ok(SurfaceSize::new(self.pixmap.width(), self.pixmap.height()))
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if let Some(path) = rect_path(rect) {
            let mut paint = solid(color);
            paint.anti_alias = false;
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        if let Some(path) = rect_path(rect) {
            let stroke = Stroke {
                width: line_width as f32,
                ..Default::default()
            };
            self.pixmap
                .stroke_path(&path, &solid(color), &stroke, Transform::identity(), None);
        }
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if let Some(path) = polygon_path(points) {
            self.pixmap.fill_path(
                &path,
                &solid(color),
                FillRule::EvenOdd,
                Transform::identity(),
                None,
            );
        }
    }

    fn stroke_polygon(&mut self, points: &[Point], color: Color, line_width: f64) {
        if let Some(path) = polygon_path(points) {
            let stroke = Stroke {
                width: line_width as f32,
                ..Default::default()
            };
            self.pixmap
                .stroke_path(&path, &solid(color), &stroke, Transform::identity(), None);
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        if let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
        {
            self.pixmap.fill_path(
                &path,
                &solid(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        let Some(font) = fonts::font_for(&style.family) else {
            return;
        };
        let scale = Scale::uniform(style.size_px as f32);
        let v_metrics = font.v_metrics(scale);
        // Top baseline: the em box starts at origin.y
        let start = rt_point(origin.x as f32, origin.y as f32 + v_metrics.ascent);

        let glyphs: Vec<_> = font.layout(text, scale, start).collect();
        for glyph in glyphs {
            if let Some(bounding_box) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    self.blend_pixel(
                        gx as i32 + bounding_box.min.x,
                        gy as i32 + bounding_box.min.y,
                        style.color,
                        v,
                    );
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sized_pixmap_rejected() {
        assert!(PixmapSurface::new(0, 10).is_err());
    }

    #[test]
    fn test_fills_are_visible() {
        let mut surface = PixmapSurface::new(40, 40).unwrap();
        surface.fill_rect(Rect::new(0.0, 0.0, 40.0, 40.0), Color::WHITE);
        surface.fill_rect(Rect::new(10.0, 10.0, 10.0, 10.0), Color::HIGHLIGHT);
        assert_eq!(surface.pixel(15, 15), Some(Color::HIGHLIGHT));
        assert_eq!(surface.pixel(30, 30), Some(Color::WHITE));
        assert_eq!(surface.pixel(40, 0), None);
    }

    #[test]
    fn test_circle_punches_hole() {
        let mut surface = PixmapSurface::new(40, 40).unwrap();
        surface.fill_rect(Rect::new(0.0, 0.0, 40.0, 40.0), Color::PART);
        surface.fill_circle(Point::new(20.0, 20.0), 5.0, Color::WHITE);
        assert_eq!(surface.pixel(20, 20), Some(Color::WHITE));
        assert_eq!(surface.pixel(5, 5), Some(Color::PART));
    }

    #[test]
    fn test_png_encoding() {
        let surface = PixmapSurface::new(8, 8).unwrap();
        let png = surface.encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
