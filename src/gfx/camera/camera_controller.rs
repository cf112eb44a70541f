use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, MouseScrollDelta},
};

use super::orbit_camera::OrbitCamera;

/// Orbit controls with inertial damping.
///
/// Drag deltas feed an angular velocity that decays by `damping` every
/// frame, so the camera glides to a stop after the pointer is released.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    /// Fraction of the remaining velocity dropped per frame, in (0, 1]
    pub damping: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    is_mouse_pressed: bool,
    enabled: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            damping: 0.05,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            is_mouse_pressed: false,
            enabled: true,
        }
    }

    /// Set from window mouse-button events; raw motion only orbits while pressed
    pub fn set_mouse_pressed(&mut self, pressed: bool) {
        self.is_mouse_pressed = pressed;
    }

    /// Suspends user control, e.g. while the camera is flying to a selection
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.stop();
        }
    }

    /// Drops any remaining orbit velocity
    pub fn stop(&mut self) {
        self.yaw_velocity = 0.0;
        self.pitch_velocity = 0.0;
    }

    /// Handles raw mouse motion and wheel events
    ///
    /// # Arguments
    /// * `event` - Device event from winit
    /// * `camera` - Camera zoomed directly by the wheel
    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) {
        if !self.enabled {
            return;
        }

        match event {
            DeviceEvent::MouseWheel { delta } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32 * 0.1
                    }
                };
                camera.add_distance(scroll_amount * self.zoom_speed);
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    self.on_drag(delta.0 as f32, delta.1 as f32);
                }
            }
            _ => (),
        }
    }

    /// Feeds a pointer drag of `(dx, dy)` pixels into the angular velocity
    pub fn on_drag(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity += -dx * self.rotate_speed * self.damping;
        self.pitch_velocity += dy * self.rotate_speed * self.damping;
    }

    /// Applies and decays the current velocity; call once per frame
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        if self.yaw_velocity.abs() < 1e-6 && self.pitch_velocity.abs() < 1e-6 {
            self.stop();
            return;
        }

        camera.add_yaw(self.yaw_velocity);
        camera.add_pitch(self.pitch_velocity);

        let keep = 1.0 - self.damping;
        self.yaw_velocity *= keep;
        self.pitch_velocity *= keep;
    }

    pub fn is_moving(&self) -> bool {
        self.yaw_velocity != 0.0 || self.pitch_velocity != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    #[test]
    fn drag_glides_to_a_stop() {
        let mut camera = OrbitCamera::new(10.0, 0.2, 0.0, Vector3::zero(), 1.0);
        let mut controller = CameraController::new(0.005, 0.1);

        controller.on_drag(-100.0, 0.0);
        let mut last_yaw = camera.yaw;
        for _ in 0..1000 {
            controller.update(&mut camera);
            assert!(camera.yaw >= last_yaw);
            last_yaw = camera.yaw;
        }

        assert!(!controller.is_moving());
        // Geometric series: total = velocity / damping = rotate_speed * 100
        assert!((camera.yaw - 0.5).abs() < 1e-2);
    }

    #[test]
    fn disabled_controller_ignores_input() {
        let mut camera = OrbitCamera::new(10.0, 0.2, 0.0, Vector3::zero(), 1.0);
        let mut controller = CameraController::new(0.005, 0.1);
        controller.set_enabled(false);
        controller.set_mouse_pressed(true);
        controller.process_events(&DeviceEvent::MouseMotion { delta: (50.0, 0.0) }, &mut camera);
        controller.update(&mut camera);
        assert_eq!(camera.yaw, 0.0);
    }
}
