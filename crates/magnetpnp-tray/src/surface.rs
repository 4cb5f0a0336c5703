//! Drawing surface abstraction.
//!
//! The tray engine paints through the [`Surface`] trait in immediate mode:
//! every call paints on top of what is already there and nothing is
//! retained. A surface reports its live pixel size through
//! [`Surface::size`], which is the one place where "cannot draw" is
//! signalled; the paint calls themselves are infallible.

use magnetpnp_core::TrayError;
use std::fmt;

/// A point in surface pixel space, origin top-left, Y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `point` lies inside the rectangle (edges included).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Fill of a part glyph that is not selected (`#aaa`)
    pub const PART: Color = Color::rgb(0xaa, 0xaa, 0xaa);
    /// Fill of the selected part glyph
    pub const HIGHLIGHT: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex notation, e.g. `#aaaaaa`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Live pixel size of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Font and color of a text label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub size_px: f64,
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: "Verdana".to_string(),
            size_px: 10.0,
            color: Color::BLACK,
        }
    }
}

/// An immediate-mode 2D drawing target.
pub trait Surface {
    /// Current size in pixels, or why the surface cannot be drawn on.
    fn size(&self) -> Result<SurfaceSize, TrayError>;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Strokes the rectangle outline centered on its edges.
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64);

    fn fill_polygon(&mut self, points: &[Point], color: Color);

    fn stroke_polygon(&mut self, points: &[Point], color: Color, line_width: f64);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);

    /// Draws `text` with the top of the em box at `origin.y`.
    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle);
}

/// One recorded paint call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        line_width: f64,
    },
    FillPolygon {
        points: Vec<Point>,
        color: Color,
    },
    StrokePolygon {
        points: Vec<Point>,
        color: Color,
        line_width: f64,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Color,
    },
    FillText {
        text: String,
        origin: Point,
        style: TextStyle,
    },
}

impl DrawCommand {
    /// Fill color this command leaves at `point`, if it paints there.
    ///
    /// Strokes and text are ignored.
    pub fn fill_at(&self, point: Point) -> Option<Color> {
        match self {
            DrawCommand::FillRect { rect, color } if rect.contains(point) => Some(*color),
            DrawCommand::FillPolygon { points, color } if polygon_contains(points, point) => {
                Some(*color)
            }
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } if (point.x - center.x).hypot(point.y - center.y) <= *radius => Some(*color),
            _ => None,
        }
    }
}

/// Even-odd ray casting test.
fn polygon_contains(points: &[Point], point: Point) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// A surface that records paint calls instead of rasterizing them.
///
/// Used to verify what the engine paints, and as a headless stand-in for
/// a real canvas. The reported size can be changed and the surface can be
/// detached to simulate a canvas that is not in the page.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: SurfaceSize,
    attached: bool,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            attached: true,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = SurfaceSize::new(width, height);
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Color visible at `point` after replaying every recorded fill.
    pub fn color_at(&self, point: Point) -> Option<Color> {
        self.commands
            .iter()
            .rev()
            .find_map(|command| command.fill_at(point))
    }

    /// Every label drawn so far, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Result<SurfaceSize, TrayError> {
        if self.attached {
            Ok(self.size)
        } else {
            Err(TrayError::SurfaceUnavailable {
                reason: "recording surface detached".to_string(),
            })
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color,
            line_width,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_polygon(&mut self, points: &[Point], color: Color, line_width: f64) {
        self.commands.push(DrawCommand::StrokePolygon {
            points: points.to_vec(),
            color,
            line_width,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            origin,
            style: style.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::PART.to_hex(), "#aaaaaa");
        assert_eq!(Color::HIGHLIGHT.to_string(), "#ff0000");
    }

    #[test]
    fn test_detached_surface_reports_unavailable() {
        let mut surface = RecordingSurface::new(100, 100);
        assert_eq!(surface.size().unwrap(), SurfaceSize::new(100, 100));

        surface.detach();
        let err = surface.size().unwrap_err();
        assert!(err.is_transient());

        surface.attach();
        assert!(surface.size().is_ok());
    }

    #[test]
    fn test_take_commands_empties_the_log() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        surface.fill_circle(Point::new(5.0, 5.0), 1.0, Color::BLACK);

        let taken = surface.take_commands();
        assert_eq!(taken.len(), 2);
        assert!(matches!(taken[0], DrawCommand::FillRect { .. }));
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_color_at_uses_last_fill() {
        let mut surface = RecordingSurface::new(100, 100);
        surface.fill_rect(Rect::new(0.0, 0.0, 100.0, 100.0), Color::WHITE);
        let triangle = [
            Point::new(10.0, 10.0),
            Point::new(50.0, 10.0),
            Point::new(10.0, 50.0),
        ];
        surface.fill_polygon(&triangle, Color::PART);

        assert_eq!(surface.color_at(Point::new(15.0, 15.0)), Some(Color::PART));
        assert_eq!(surface.color_at(Point::new(45.0, 45.0)), Some(Color::WHITE));

        surface.fill_circle(Point::new(15.0, 15.0), 3.0, Color::WHITE);
        assert_eq!(surface.color_at(Point::new(15.0, 15.0)), Some(Color::WHITE));
        assert_eq!(surface.color_at(Point::new(200.0, 200.0)), None);
    }
}
