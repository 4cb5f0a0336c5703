use crate::common::{engine, nut};
use magnetpnp_communication::QueuedCommandChannel;
use magnetpnp_core::{CellPosition, CommandError, HostMessage, PartId, PrinterState};
use magnetpnp_tray::TrayController;

fn loaded_controller(
) -> (TrayController<magnetpnp_tray::RecordingSurface, QueuedCommandChannel>, QueuedCommandChannel) {
    let channel = QueuedCommandChannel::new();
    let mut controller = TrayController::new(engine(3, 2), channel.clone());
    controller.handle_message(&HostMessage::file(vec![nut(7, 4), nut(8, 2)]));
    (controller, channel)
}

fn center_of(
    controller: &TrayController<magnetpnp_tray::RecordingSurface, QueuedCommandChannel>,
    cell: CellPosition,
) -> (f64, f64) {
    let point = controller.engine().layout().unwrap().cell_center(cell);
    (point.x, point.y)
}

#[test]
fn test_double_click_while_operational_sends_one_command() {
    let (mut controller, channel) = loaded_controller();
    controller.set_printer_state(PrinterState::Operational);

    let (x, y) = center_of(&controller, CellPosition::new(1, 2));
    assert_eq!(controller.double_click(x, y), Ok(Some(PartId(7))));
    assert_eq!(channel.drain(), vec!["M361 P7".to_string()]);
}

#[test]
fn test_double_click_while_disconnected_sends_nothing() {
    let (mut controller, channel) = loaded_controller();
    controller.set_printer_state(PrinterState::Offline);

    let (x, y) = center_of(&controller, CellPosition::new(1, 2));
    assert_eq!(controller.double_click(x, y), Ok(None));
    assert!(channel.drain().is_empty());
    assert_eq!(controller.engine().highlighted(), Some(PartId(7)));
}

#[test]
fn test_double_click_on_empty_cell_sends_nothing() {
    let (mut controller, channel) = loaded_controller();
    controller.set_printer_state(PrinterState::Printing);

    let (x, y) = center_of(&controller, CellPosition::new(3, 1));
    assert_eq!(controller.double_click(x, y), Ok(None));
    assert!(channel.is_empty());
}

#[test]
fn test_closed_channel_reports_error() {
    let (mut controller, channel) = loaded_controller();
    controller.set_printer_state(PrinterState::Operational);
    channel.close();

    let (x, y) = center_of(&controller, CellPosition::new(2, 1));
    assert_eq!(
        controller.double_click(x, y),
        Err(CommandError::ChannelClosed)
    );
}

#[test]
fn test_click_floors_pointer_coordinates() {
    let (mut controller, _channel) = loaded_controller();
    let (x, y) = center_of(&controller, CellPosition::new(2, 1));
    assert_eq!(controller.click(x + 0.9, y + 0.9), Some(PartId(8)));
}

#[test]
fn test_new_file_replaces_parts() {
    let (mut controller, _channel) = loaded_controller();
    controller.handle_message(&HostMessage::file(vec![nut(20, 6)]));

    assert_eq!(controller.status(), "Loaded file with 1 nuts");
    let ids: Vec<_> = controller.engine().parts().iter().map(|p| p.id()).collect();
    assert_eq!(ids, vec![PartId(20)]);
}
