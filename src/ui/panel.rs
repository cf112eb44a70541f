// src/ui/panel.rs
//! The scene control panel.
//!
//! Mirrors the keyboard controls: flag checkboxes, a dance button and a scene
//! switch, plus a read-out of the selection and asset loading.

use crate::scene::{
    figure::FigureRole,
    flags::{SceneFlags, SceneKind},
};

/// Read-only facts shown in the panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelStatus {
    pub kind: SceneKind,
    pub generation: u64,
    pub fps: f32,
    pub family_size: usize,
    pub selected: Option<FigureRole>,
    /// Settled asset loads in percent
    pub loading: f32,
}

/// Actions the panel asks the app to take this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelRequest {
    pub switch_scene: bool,
    pub dance_burst: bool,
}

/// Lines of the status block, loading first while anything is in flight
pub fn status_lines(status: &PanelStatus) -> Vec<String> {
    let mut lines = Vec::with_capacity(4);
    if status.loading < 100.0 {
        lines.push(format!("Loading: {:.0}%", status.loading));
    }
    lines.push(format!(
        "Scene: {} (#{})",
        status.kind.label(),
        status.generation
    ));
    if status.kind == SceneKind::Family {
        lines.push(format!("Family members: {}", status.family_size));
    }
    lines.push(match status.selected {
        Some(role) => format!("Selected: {}", role.label()),
        None => "Click a figure to fly to it".to_string(),
    });
    lines.push(format!("{:.0} fps", status.fps));
    lines
}

pub fn control_panel(ui: &imgui::Ui, flags: &mut SceneFlags, status: &PanelStatus) -> PanelRequest {
    let mut request = PanelRequest::default();

    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return request;
    }

    ui.window("Scene")
        .size([300.0, 0.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .always_auto_resize(true)
        .collapsible(true)
        .build(|| {
            for line in status_lines(status) {
                ui.text(line);
            }
            ui.separator();

            if status.kind == SceneKind::Family {
                ui.text("Family");
                ui.checkbox("Wife [1]", &mut flags.has_wife);
                ui.checkbox("Son [2]", &mut flags.has_son);
                ui.checkbox("Daughter [3]", &mut flags.has_daughter);
                ui.separator();
            }

            ui.text("Animation");
            ui.checkbox("Walking [W/S]", &mut flags.is_walking);
            ui.checkbox("Dancing", &mut flags.is_dancing);
            ui.checkbox("Hovering [H]", &mut flags.is_hovering);
            if ui.button("Dance burst [D]") {
                request.dance_burst = true;
            }
            ui.separator();

            let label = format!("Show {} scene [Tab]", status.kind.other().label());
            if ui.button(label) {
                request.switch_scene = true;
            }
        });

    request
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status() -> PanelStatus {
        PanelStatus {
            kind: SceneKind::Family,
            generation: 2,
            fps: 59.6,
            family_size: 3,
            selected: None,
            loading: 100.0,
        }
    }

    #[test]
    fn loading_line_only_while_loading() {
        assert!(!status_lines(&status())[0].starts_with("Loading"));

        let loading = PanelStatus {
            loading: 50.0,
            ..status()
        };
        assert_eq!(status_lines(&loading)[0], "Loading: 50%");
    }

    #[test]
    fn robot_status_omits_family_size() {
        let robot = PanelStatus {
            kind: SceneKind::Robot,
            selected: Some(FigureRole::Robot),
            ..status()
        };
        let lines = status_lines(&robot);
        assert!(lines.iter().all(|l| !l.starts_with("Family")));
        assert!(lines.contains(&"Selected: robot".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("60 fps"));
    }
}
