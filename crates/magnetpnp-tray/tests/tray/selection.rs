use crate::common::{engine, nut};
use magnetpnp_core::{CellPosition, PartId};
use proptest::prelude::*;

#[test]
fn test_position_four_on_three_by_two() {
    let mut engine = engine(3, 2);
    let cell = engine.add_part(nut(1, 4)).unwrap();
    assert_eq!(cell, CellPosition::new(1, 2));
}

#[test]
fn test_click_top_left_pixel_misses() {
    let mut engine = engine(3, 2);
    engine.erase();
    for position in 1..=6 {
        engine.add_part(nut(position, position)).unwrap();
    }
    assert_eq!(engine.layout().unwrap().cell_size(), 50.0);
    assert_eq!(engine.select_part(0.0, 0.0), None);
}

#[test]
fn test_select_on_empty_cell() {
    let mut engine = engine(3, 2);
    engine.erase();
    engine.add_part(nut(1, 1)).unwrap();

    let layout = engine.layout().unwrap();
    let empty = layout.cell_center(CellPosition::new(3, 2));
    assert_eq!(engine.select_part(empty.x, empty.y), None);
}

#[test]
fn test_erase_resets_registry() {
    let mut engine = engine(3, 2);
    engine.erase();
    for position in 1..=6 {
        engine.add_part(nut(10 + position, position)).unwrap();
    }
    assert_eq!(engine.parts().len(), 6);

    engine.erase();
    assert!(engine.parts().is_empty());
    assert_eq!(engine.highlighted(), None);

    engine.erase();
    assert!(engine.parts().is_empty());
}

#[test]
fn test_parts_in_the_same_cell_resolve_to_first_registered() {
    let mut engine = engine(2, 2);
    engine.add_part(nut(1, 3)).unwrap();
    engine.add_part(nut(2, 3)).unwrap();

    let center = engine
        .layout()
        .unwrap()
        .cell_center(CellPosition::new(1, 2));
    assert_eq!(engine.select_part(center.x, center.y), Some(PartId(1)));
}

proptest! {
    #[test]
    fn selecting_a_cell_center_finds_its_part(
        columns in 1u32..7,
        rows in 1u32..7,
        seed in 0u32..49,
    ) {
        let mut engine = engine(columns, rows);
        let position = seed % (columns * rows) + 1;
        let cell = engine.add_part(nut(42, position)).unwrap();

        let center = engine.layout().unwrap().cell_center(cell);
        prop_assert_eq!(engine.select_part(center.x, center.y), Some(PartId(42)));
    }

    #[test]
    fn erased_tray_never_selects(
        x in -50.0f64..400.0,
        y in -50.0f64..400.0,
    ) {
        let mut engine = engine(4, 3);
        engine.add_part(nut(1, 1)).unwrap();
        engine.add_part(nut(2, 12)).unwrap();
        engine.erase();
        prop_assert_eq!(engine.select_part(x, y), None);
    }

    #[test]
    fn hit_test_stays_inside_the_grid(
        columns in 1u32..10,
        rows in 1u32..10,
        x in -100.0f64..600.0,
        y in -100.0f64..600.0,
    ) {
        let engine = engine(columns, rows);
        if let Some(cell) = engine.layout().unwrap().hit_test(x, y) {
            prop_assert!(cell.is_within(columns, rows));
        }
    }
}
