use crate::common::{engine, nut};
use magnetpnp_core::{CellPosition, PartId};
use magnetpnp_tray::{Color, DrawCommand, Point, RecordingSurface, Surface, TrayEngine};

/// A point inside a hex glyph of thread 3 but clear of its hole
fn glyph_point(engine: &TrayEngine<RecordingSurface>, cell: CellPosition) -> Point {
    let center = engine.layout().unwrap().cell_center(cell);
    Point::new(center.x + 4.0, center.y)
}

#[test]
fn test_highlight_is_exclusive() {
    let mut engine = engine(3, 2);
    engine.erase();
    engine.add_part(nut(1, 1)).unwrap();
    engine.add_part(nut(2, 6)).unwrap();

    let first = CellPosition::new(1, 1);
    let second = CellPosition::new(3, 2);
    let layout = engine.layout().unwrap();

    let c = layout.cell_center(first);
    assert_eq!(engine.select_part(c.x, c.y), Some(PartId(1)));
    assert_eq!(
        engine.surface().color_at(glyph_point(&engine, first)),
        Some(Color::HIGHLIGHT)
    );

    let c = layout.cell_center(second);
    assert_eq!(engine.select_part(c.x, c.y), Some(PartId(2)));
    assert_eq!(
        engine.surface().color_at(glyph_point(&engine, first)),
        Some(Color::PART)
    );
    assert_eq!(
        engine.surface().color_at(glyph_point(&engine, second)),
        Some(Color::HIGHLIGHT)
    );
}

#[test]
fn test_miss_clears_highlight() {
    let mut engine = engine(2, 1);
    engine.add_part(nut(1, 1)).unwrap();
    let cell = CellPosition::new(1, 1);

    let c = engine.layout().unwrap().cell_center(cell);
    engine.select_part(c.x, c.y);
    engine.select_part(500.0, 500.0);
    assert_eq!(
        engine.surface().color_at(glyph_point(&engine, cell)),
        Some(Color::PART)
    );
}

#[test]
fn test_erase_leaves_no_glyphs() {
    let mut engine = engine(2, 2);
    engine.add_part(nut(1, 1)).unwrap();
    engine.add_part(nut(2, 4)).unwrap();
    engine.erase();

    for cell in [CellPosition::new(1, 1), CellPosition::new(2, 2)] {
        assert_eq!(
            engine.surface().color_at(glyph_point(&engine, cell)),
            Some(Color::WHITE)
        );
    }
}

#[test]
fn test_add_part_redraws_only_its_box() {
    let mut engine = engine(3, 2);
    engine.erase();
    engine.surface_mut().clear();

    engine.add_part(nut(1, 2)).unwrap();
    let commands = engine.surface().commands();
    let boxes = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::StrokeRect { line_width, .. } if *line_width == 4.0))
        .count();
    assert_eq!(boxes, 1);
    assert_eq!(engine.surface().texts(), vec!["M3 #1"]);
}

#[test]
fn test_repaint_keeps_highlight() {
    let mut engine = engine(2, 2);
    engine.add_part(nut(5, 3)).unwrap();
    let cell = CellPosition::new(1, 2);
    let c = engine.layout().unwrap().cell_center(cell);
    engine.select_part(c.x, c.y);

    engine.surface_mut().clear();
    engine.repaint();
    assert_eq!(
        engine.surface().color_at(glyph_point(&engine, cell)),
        Some(Color::HIGHLIGHT)
    );
}

#[test]
fn test_too_small_surface_is_a_no_op() {
    let mut engine = TrayEngine::new(
        3,
        2,
        10.0,
        RecordingSurface::new(5, 5),
        &crate::common::hex_layout(3, 2),
    )
    .unwrap();
    engine.erase();
    engine.add_part(nut(1, 1)).unwrap();

    assert!(engine.surface().commands().is_empty());
    assert!(engine.layout().is_err());
    assert_eq!(engine.surface().size().unwrap().width, 5);
}

#[test]
fn test_svg_surface_renders_labels() {
    let mut engine = TrayEngine::new(
        2,
        1,
        10.0,
        magnetpnp_tray::SvgSurface::new(104, 54),
        &crate::common::hex_layout(2, 1),
    )
    .unwrap();
    engine.erase();
    engine.add_part(nut(3, 2)).unwrap();

    let svg = engine.surface().to_svg_string();
    assert!(svg.contains("M3 #3"));
    assert!(svg.contains("#aaaaaa"));
}

#[test]
fn test_pixmap_surface_renders_highlight() {
    let surface = magnetpnp_tray::PixmapSurface::new(104, 54).unwrap();
    let mut engine = TrayEngine::new(2, 1, 10.0, surface, &crate::common::hex_layout(2, 1)).unwrap();
    engine.erase();
    engine.add_part(nut(3, 2)).unwrap();

    let cell = CellPosition::new(2, 1);
    let c = engine.layout().unwrap().cell_center(cell);
    engine.select_part(c.x, c.y);

    let pixel = engine
        .surface()
        .pixel((c.x + 4.0) as u32, c.y as u32)
        .unwrap();
    assert_eq!(pixel, Color::HIGHLIGHT);

    let empty = engine.layout().unwrap().cell_center(CellPosition::new(1, 1));
    assert_eq!(
        engine.surface().pixel(empty.x as u32, empty.y as u32),
        Some(Color::WHITE)
    );
}

#[test]
fn test_rendered_tray_saves_to_disk() {
    let dir = tempfile::tempdir().unwrap();

    let surface = magnetpnp_tray::PixmapSurface::new(104, 54).unwrap();
    let mut engine = TrayEngine::new(2, 1, 10.0, surface, &crate::common::hex_layout(2, 1)).unwrap();
    engine.erase();
    engine.add_part(nut(1, 1)).unwrap();
    let png = dir.path().join("tray.png");
    engine.surface().save_png(&png).unwrap();
    let bytes = std::fs::read(&png).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");

    let mut engine = TrayEngine::new(
        2,
        1,
        10.0,
        magnetpnp_tray::SvgSurface::new(104, 54),
        &crate::common::hex_layout(2, 1),
    )
    .unwrap();
    engine.erase();
    let svg = dir.path().join("tray.svg");
    engine.surface().save(&svg).unwrap();
    assert!(std::fs::read_to_string(&svg).unwrap().starts_with("<svg"));
}
