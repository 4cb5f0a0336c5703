#[path = "tray/common.rs"]
mod common;
#[path = "tray/controller.rs"]
mod controller;
#[path = "tray/rendering.rs"]
mod rendering;
#[path = "tray/selection.rs"]
mod selection;
