use cgmath::{Deg, Vector3};

use super::graph::rgb;

/// Per-frame light and camera setup shared with the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    /// Directional light position; the light shines from here towards the origin
    pub sun_position: [f32; 3],
    pub sun_color: [f32; 3],
    pub sun_intensity: f32,
    pub clear_color: [f32; 3],
}

impl Lighting {
    pub fn family() -> Self {
        Self {
            ambient: 0.5,
            sun_position: [5.0, 10.0, 5.0],
            sun_color: [1.0, 1.0, 1.0],
            sun_intensity: 0.8,
            clear_color: rgb(0x87ceeb),
        }
    }

    pub fn robot() -> Self {
        Self {
            ambient: 0.5,
            sun_position: [10.0, 0.0, 0.0],
            sun_color: [1.0, 1.0, 1.0],
            sun_intensity: 1.0,
            clear_color: rgb(0x101018),
        }
    }
}

/// Initial camera placement for a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPreset {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub fovy: Deg<f32>,
}

impl CameraPreset {
    pub fn family() -> Self {
        Self {
            eye: Vector3::new(0.0, 10.0, 20.0),
            target: Vector3::new(0.0, 0.0, 0.0),
            fovy: Deg(75.0),
        }
    }

    pub fn robot() -> Self {
        Self {
            eye: Vector3::new(0.0, 0.0, 10.0),
            target: Vector3::new(0.0, 0.0, 0.0),
            fovy: Deg(50.0),
        }
    }
}
