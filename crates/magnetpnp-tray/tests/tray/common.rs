use magnetpnp_core::{NutType, PartDescriptor};
use magnetpnp_tray::{RecordingSurface, TrayEngine};

/// Surface size giving a cell size of 50 px for the given grid
pub fn surface_for(columns: u32, rows: u32) -> RecordingSurface {
    RecordingSurface::new(columns * 50 + 4, rows * 50 + 4)
}

pub fn hex_layout(columns: u32, rows: u32) -> String {
    let entries = vec![r#"{"thread":3,"nut":"hex"}"#; (columns * rows) as usize];
    format!("[{}]", entries.join(","))
}

pub fn engine(columns: u32, rows: u32) -> TrayEngine<RecordingSurface> {
    TrayEngine::new(
        columns,
        rows,
        10.0,
        surface_for(columns, rows),
        &hex_layout(columns, rows),
    )
    .unwrap()
}

pub fn nut(id: u32, position: u32) -> PartDescriptor {
    PartDescriptor::new(id, format!("M3 #{}", id), 3.0, NutType::HexNut, position)
}
