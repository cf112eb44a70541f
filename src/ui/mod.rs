//! # User Interface
//!
//! Dear ImGui overlay drawn after the scene: [`UiManager`] wires imgui into
//! winit and wgpu, [`panel`] builds the control panel itself.
//!
//! Pointer and keyboard input is offered to imgui first. While the UI wants
//! the pointer, clicks and drags do not reach picking or the orbit camera.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{control_panel, PanelRequest, PanelStatus};
