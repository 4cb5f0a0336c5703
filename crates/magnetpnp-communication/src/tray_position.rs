//! Machine coordinates of tray boxes.

use magnetpnp_core::{CellPosition, PartId, SequencerError};
use magnetpnp_settings::{MachinePosition, TraySettings};

/// Center of the box holding tray position `position`, in machine
/// coordinates.
///
/// Boxes are `boxsize` wide with a `rimsize` wall before each one, so the
/// center of column `c` sits at `(c-1)*boxsize + boxsize/2 + c*rimsize`
/// from the tray corner (rows likewise). The Z coordinate is the tray floor.
pub fn box_center(
    tray: &TraySettings,
    part: PartId,
    position: u32,
) -> Result<MachinePosition, SequencerError> {
    let cell = CellPosition::from_position_index(position, tray.columns)
        .filter(|cell| cell.is_within(tray.columns, tray.rows))
        .ok_or(SequencerError::InvalidTrayPosition {
            part_id: part.value(),
            position,
            columns: tray.columns,
        })?;

    let column = f64::from(cell.column);
    let row = f64::from(cell.row);
    let x = (column - 1.0) * tray.boxsize + tray.boxsize / 2.0 + column * tray.rimsize + tray.x;
    let y = (row - 1.0) * tray.boxsize + tray.boxsize / 2.0 + row * tray.rimsize + tray.y;

    tracing::debug!(
        "Part {} at tray position {} ({}) -> X{} Y{}",
        part,
        position,
        cell,
        x,
        y
    );
    Ok(MachinePosition { x, y, z: tray.z })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tray() -> TraySettings {
        TraySettings {
            x: 100.0,
            y: 50.0,
            z: 2.0,
            ..TraySettings::default()
        }
    }

    #[test]
    fn test_first_box() {
        let center = box_center(&tray(), PartId(1), 1).unwrap();
        // 0 * 10 + 5 + 1 * 1 + 100
        assert_eq!(center.x, 106.0);
        assert_eq!(center.y, 56.0);
        assert_eq!(center.z, 2.0);
    }

    #[test]
    fn test_last_box() {
        let center = box_center(&tray(), PartId(1), 25).unwrap();
        // 4 * 10 + 5 + 5 * 1 + 100
        assert_eq!(center.x, 150.0);
        assert_eq!(center.y, 100.0);
    }

    #[test]
    fn test_row_major_positions() {
        let center = box_center(&tray(), PartId(1), 6).unwrap();
        assert_eq!(center.x, 106.0);
        assert_eq!(center.y, 67.0);
    }

    #[test]
    fn test_position_outside_tray() {
        let err = box_center(&tray(), PartId(3), 26).unwrap_err();
        assert_eq!(
            err,
            SequencerError::InvalidTrayPosition {
                part_id: 3,
                position: 26,
                columns: 5
            }
        );
        assert!(box_center(&tray(), PartId(3), 0).is_err());
    }
}
