//! Hashable primitive descriptors.
//!
//! Builders describe the shape they want; the scene graph turns each distinct
//! descriptor into one shared mesh, so 2000 grass blades share one plane.

use super::{primitives::*, GeometryData};
use std::f32::consts::FRAC_PI_2;

/// A parameterised primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere {
        radius: f32,
        segments: u32,
    },
    /// Upper half of a sphere
    Hemisphere {
        radius: f32,
        segments: u32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        segments: u32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Plane {
        width: f32,
        height: f32,
        segments: u32,
    },
    Circle {
        radius: f32,
        segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
    },
}

/// Bit-exact key for mesh deduplication
pub type ShapeKey = (u8, [u32; 4]);

impl Shape {
    pub fn generate(&self) -> GeometryData {
        match *self {
            Shape::Sphere { radius, segments } => {
                generate_sphere(radius, segments, (segments / 2).max(2))
            }
            Shape::Hemisphere { radius, segments } => {
                generate_sphere_cap(radius, segments, (segments / 4).max(2), FRAC_PI_2)
            }
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => generate_cylinder(radius_top, radius_bottom, height, segments),
            Shape::Cone {
                radius,
                height,
                segments,
            } => generate_cone(radius, height, segments),
            Shape::Box {
                width,
                height,
                depth,
            } => generate_box(width, height, depth),
            Shape::Plane {
                width,
                height,
                segments,
            } => generate_plane(width, height, segments, segments),
            Shape::Circle { radius, segments } => generate_circle(radius, segments),
            Shape::Torus { radius, tube } => generate_torus(radius, tube, 12, 48),
        }
    }

    pub fn key(&self) -> ShapeKey {
        match *self {
            Shape::Sphere { radius, segments } => (0, [radius.to_bits(), segments, 0, 0]),
            Shape::Hemisphere { radius, segments } => (1, [radius.to_bits(), segments, 0, 0]),
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => (
                2,
                [
                    radius_top.to_bits(),
                    radius_bottom.to_bits(),
                    height.to_bits(),
                    segments,
                ],
            ),
            Shape::Cone {
                radius,
                height,
                segments,
            } => (3, [radius.to_bits(), height.to_bits(), segments, 0]),
            Shape::Box {
                width,
                height,
                depth,
            } => (4, [width.to_bits(), height.to_bits(), depth.to_bits(), 0]),
            Shape::Plane {
                width,
                height,
                segments,
            } => (5, [width.to_bits(), height.to_bits(), segments, 0]),
            Shape::Circle { radius, segments } => (6, [radius.to_bits(), segments, 0, 0]),
            Shape::Torus { radius, tube } => (7, [radius.to_bits(), tube.to_bits(), 0, 0]),
        }
    }

    /// Shorthand for a sphere with the default resolution
    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere {
            radius,
            segments: 32,
        }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32) -> Self {
        Shape::Cylinder {
            radius_top,
            radius_bottom,
            height,
            segments: 32,
        }
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Shape::Box {
            width,
            height,
            depth,
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Shape::Plane {
            width,
            height,
            segments: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_shapes_share_a_key() {
        assert_eq!(Shape::sphere(0.06).key(), Shape::sphere(0.06).key());
        assert_ne!(Shape::sphere(0.06).key(), Shape::sphere(0.05).key());
        assert_ne!(
            Shape::cylinder(0.1, 0.1, 1.0).key(),
            Shape::Cone {
                radius: 0.1,
                height: 1.0,
                segments: 32
            }
            .key()
        );
    }

    #[test]
    fn hemisphere_generates_upper_half() {
        let data = Shape::Hemisphere {
            radius: 0.26,
            segments: 32,
        }
        .generate();
        assert!(data.vertices.iter().all(|v| v[1] >= -1e-6));
    }
}
