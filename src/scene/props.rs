//! Static and drifting scenery.
//!
//! Each builder attaches its prop under `parent`. Randomized placement draws
//! from the caller's seeded generator, so a seed always yields the same layout.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use cgmath::Vector3;
use rand::{rngs::StdRng, Rng};

use super::graph::{rgb, Material, NodeId, ParticleField, SceneGraph, Transform};
use crate::gfx::geometry::{generate_plane, Shape};

pub const CLOUD_SPAN: (f32, f32) = (-50.0, 50.0);
pub const CAR_SPAN: (f32, f32) = (-30.0, 30.0);
pub const RAIN_SPAN: (f32, f32) = (-250.0, 250.0);
pub const ROAD_Z: f32 = 10.0;

const CAR_COLORS: [u32; 5] = [0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff];

const CLOUD_ANCHORS: [[f32; 3]; 7] = [
    [5.0, 10.0, -10.0],
    [-8.0, 12.0, -5.0],
    [10.0, 11.0, -8.0],
    [-12.0, 13.0, 0.0],
    [15.0, 11.0, 5.0],
    [-5.0, 12.0, 10.0],
    [0.0, 14.0, -15.0],
];

/// A cloud and its spawn position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub node: NodeId,
    pub base: Vector3<f32>,
}

/// A car and the lane direction it drives in (+1 or -1 along x)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Car {
    pub node: NodeId,
    pub base_x: f32,
    pub direction: f32,
}

fn lane_z(lane: usize) -> f32 {
    ROAD_Z + (lane as f32 * 3.0 - 1.5)
}

/// Flat XZ plane lying on the ground
fn lying(x: f32, y: f32, z: f32) -> Transform {
    Transform::at(x, y, z).rotated(-FRAC_PI_2, 0.0, 0.0)
}

pub fn ground(graph: &mut SceneGraph, parent: NodeId, rng: &mut StdRng) -> NodeId {
    let mut data = generate_plane(100.0, 100.0, 200, 200);
    let tint = (0..data.vertex_count())
        .map(|_| {
            if rng.random::<f32>() > 0.6 {
                [0.0, 0.5 + rng.random::<f32>() * 0.5, 0.0]
            } else {
                [0.6, 0.4, 0.2]
            }
        })
        .collect();
    data = data.with_vertex_colors(tint);
    let mesh = graph.add_mesh(data);
    graph.add_mesh_node(Some(parent), mesh, Material::lit(0xffffff), lying(0.0, -0.5, 0.0))
}

pub fn grass(graph: &mut SceneGraph, parent: NodeId, rng: &mut StdRng, count: usize) {
    let group = graph.add_group(Some(parent), Transform::IDENTITY);
    for _ in 0..count {
        let x = rng.random_range(-50.0..50.0);
        let z = rng.random_range(-50.0..50.0);
        let turn = rng.random_range(0.0..PI);
        graph.add_shape(
            Some(group),
            Shape::plane(0.1, 0.3),
            Material::lit(0x00ff00),
            Transform::at(x, 0.0, z).rotated(0.0, turn, 0.0),
        );
    }
}

pub fn house(graph: &mut SceneGraph, parent: NodeId) -> NodeId {
    let house = graph.add_group(Some(parent), Transform::at(-10.0, 0.0, -5.0));
    graph.add_shape(Some(house), Shape::cuboid(6.0, 4.0, 4.0), Material::lit(0xcccccc), Transform::IDENTITY);
    graph.add_shape(
        Some(house),
        Shape::Cone {
            radius: 5.0,
            height: 2.0,
            segments: 4,
        },
        Material::lit(0x8b4513),
        Transform::at(0.0, 3.0, 0.0).rotated(0.0, FRAC_PI_4, 0.0),
    );
    graph.add_shape(Some(house), Shape::plane(1.6, 3.0), Material::lit(0x8b4513), Transform::at(0.0, -0.5, 2.01));
    for x in [-2.0, 2.0] {
        graph.add_shape(Some(house), Shape::plane(1.0, 1.0), Material::lit(0x87ceeb), Transform::at(x, 0.5, 2.01));
    }
    house
}

pub fn trees(graph: &mut SceneGraph, parent: NodeId) {
    for (x, z) in [(8.0, -8.0), (-8.0, 8.0), (12.0, 5.0), (-12.0, -5.0)] {
        let tree = graph.add_group(Some(parent), Transform::at(x, 0.0, z));
        graph.add_shape(
            Some(tree),
            Shape::Cylinder {
                radius_top: 0.2,
                radius_bottom: 0.2,
                height: 2.0,
                segments: 8,
            },
            Material::lit(0x8b4513),
            Transform::IDENTITY,
        );
        graph.add_shape(Some(tree), Shape::sphere(1.0), Material::lit(0x228b22), Transform::at(0.0, 1.5, 0.0));
    }
}

pub fn clouds(graph: &mut SceneGraph, parent: NodeId, rng: &mut StdRng) -> Vec<Cloud> {
    CLOUD_ANCHORS
        .iter()
        .map(|anchor| {
            let base = Vector3::from(*anchor);
            let node = graph.add_group(Some(parent), Transform::at(base.x, base.y, base.z));
            for _ in 0..10 {
                let radius = 0.8 + rng.random::<f32>() * 0.3;
                let offset = Transform::at(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-0.5..0.5),
                    rng.random_range(-1.0..1.0),
                )
                .scaled(radius);
                graph.add_shape(Some(node), Shape::sphere(1.0), Material::lit(0xffffff), offset);
            }
            Cloud { node, base }
        })
        .collect()
}

pub fn mountains(graph: &mut SceneGraph, parent: NodeId) {
    for (x, z, height) in [(-25.0, -25.0, 15.0), (25.0, -20.0, 12.0), (-20.0, 25.0, 18.0)] {
        graph.add_shape(
            Some(parent),
            Shape::Cone {
                radius: 8.0,
                height,
                segments: 32,
            },
            Material::lit(0x808080),
            Transform::at(x, height / 2.0, z),
        );
    }
}

pub fn flowers(graph: &mut SceneGraph, parent: NodeId, rng: &mut StdRng, count: usize) {
    for _ in 0..count {
        let x = rng.random_range(-20.0..20.0);
        let z = rng.random_range(-20.0..20.0);
        let flower = graph.add_group(Some(parent), Transform::at(x, 0.0, z));
        graph.add_shape(
            Some(flower),
            Shape::cylinder(0.05, 0.05, 0.5),
            Material::lit(0x00ff00),
            Transform::IDENTITY,
        );
        let petal_color = rng.random_range(0..0x1000000u32);
        for i in 0..5 {
            let turn = i as f32 / 5.0 * TAU;
            graph.add_shape(
                Some(flower),
                Shape::Circle {
                    radius: 0.2,
                    segments: 5,
                },
                Material::lit(petal_color),
                Transform::at(0.0, 0.25, 0.0).rotated(-FRAC_PI_2, turn, 0.0),
            );
        }
    }
}

pub fn road(graph: &mut SceneGraph, parent: NodeId) {
    for lane in 0..2 {
        let z = lane_z(lane);
        graph.add_shape(Some(parent), Shape::plane(60.0, 2.0), Material::lit(0x111111), lying(0.0, 0.1, z));
        let mut x = -29;
        while x < 30 {
            graph.add_shape(Some(parent), Shape::plane(1.0, 0.1), Material::lit(0xffffff), lying(x as f32, 0.11, z));
            x += 4;
        }
    }
}

pub fn cars(graph: &mut SceneGraph, parent: NodeId, rng: &mut StdRng) -> Vec<Car> {
    CAR_COLORS
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let lane = i % 2;
            let base_x = rng.random_range(-25.0..25.0);
            let heading = if lane == 1 { PI } else { 0.0 };
            let node = graph.add_group(
                Some(parent),
                Transform::at(base_x, 0.3, lane_z(lane)).rotated(0.0, heading, 0.0),
            );
            graph.add_shape(Some(node), Shape::cuboid(2.0, 0.5, 1.0), Material::lit(*color), Transform::IDENTITY);
            graph.add_shape(
                Some(node),
                Shape::cuboid(1.5, 0.4, 0.9),
                Material::lit(*color),
                Transform::at(-0.1, 0.45, 0.0),
            );
            for (wx, wz) in [(-0.7, -0.5), (0.7, -0.5), (-0.7, 0.5), (0.7, 0.5)] {
                graph.add_shape(
                    Some(node),
                    Shape::cylinder(0.2, 0.2, 0.1),
                    Material::lit(0x333333),
                    Transform::at(wx, -0.25, wz).rotated(0.0, 0.0, FRAC_PI_2),
                );
            }
            let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
            Car {
                node,
                base_x,
                direction,
            }
        })
        .collect()
}

pub fn fence(graph: &mut SceneGraph, parent: NodeId) {
    for i in 0..8 {
        graph.add_shape(
            Some(parent),
            Shape::cuboid(0.1, 1.0, 0.1),
            Material::lit(0x8b4513),
            Transform::at(-7.0 + i as f32 * 2.0, 0.5, -3.0),
        );
    }
    for i in 0..7 {
        graph.add_shape(
            Some(parent),
            Shape::cuboid(2.0, 0.1, 0.05),
            Material::lit(0xa0522d),
            Transform::at(-6.0 + i as f32 * 2.0, 0.8, -3.0),
        );
    }
}

pub fn sky(graph: &mut SceneGraph, parent: NodeId) -> NodeId {
    graph.add_shape(
        Some(parent),
        Shape::sphere(500.0),
        Material::sky(0x0077ff, 0xffffff),
        Transform::IDENTITY,
    )
}

/// Uniform points in `[-x/2, x/2) x [0, y) x [-z/2, z/2)`
fn scatter(rng: &mut StdRng, count: usize, area: [f32; 3]) -> Vec<[f32; 3]> {
    (0..count)
        .map(|_| {
            [
                rng.random::<f32>() * area[0] - area[0] / 2.0,
                rng.random::<f32>() * area[1],
                rng.random::<f32>() * area[2] - area[2] / 2.0,
            ]
        })
        .collect()
}

pub fn fireflies(graph: &mut SceneGraph, anchor: NodeId, rng: &mut StdRng) -> usize {
    let points = scatter(rng, 100, [40.0, 10.0, 40.0]);
    graph.add_particles(ParticleField::new(anchor, rgb(0xffff66), points))
}

/// Rain drops fall at a fixed per-drop speed in [6, 12) units per second
pub fn rain(graph: &mut SceneGraph, anchor: NodeId, rng: &mut StdRng, count: usize) -> usize {
    let points = (0..count)
        .map(|_| {
            [
                rng.random_range(-200.0..200.0),
                rng.random_range(RAIN_SPAN.0..RAIN_SPAN.1),
                rng.random_range(-200.0..200.0),
            ]
        })
        .collect();
    let speeds = (0..count).map(|_| rng.random_range(6.0..12.0)).collect();
    graph.add_particles(ParticleField::new(anchor, rgb(0xaaaaaa), points).with_fall_speed(speeds))
}

pub fn robot_ground(graph: &mut SceneGraph, parent: NodeId) -> NodeId {
    graph.add_shape(Some(parent), Shape::plane(20.0, 20.0), Material::lit(0x444444), lying(0.0, -3.0, 0.0))
}

/// Dust cloud around the robot; returns the anchor node and the field index
pub fn dust(graph: &mut SceneGraph, parent: NodeId, rng: &mut StdRng) -> (NodeId, usize) {
    let anchor = graph.add_group(Some(parent), Transform::IDENTITY);
    let points = (0..1000)
        .map(|_| {
            [
                rng.random_range(-5.0..5.0),
                rng.random_range(-5.0..5.0),
                rng.random_range(-5.0..5.0),
            ]
        })
        .collect();
    let field = graph.add_particles(ParticleField::new(anchor, rgb(0xffffff), points));
    (anchor, field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn setup() -> (SceneGraph, NodeId, StdRng) {
        let mut graph = SceneGraph::new();
        let root = graph.add_group(None, Transform::IDENTITY);
        (graph, root, StdRng::seed_from_u64(42))
    }

    #[test]
    fn cars_alternate_direction_and_start_on_road() {
        let (mut graph, root, mut rng) = setup();
        let cars = cars(&mut graph, root, &mut rng);
        assert_eq!(cars.len(), 5);
        for (i, car) in cars.iter().enumerate() {
            assert_eq!(car.direction, if i % 2 == 0 { 1.0 } else { -1.0 });
            assert!((-25.0..25.0).contains(&car.base_x));
        }
    }

    #[test]
    fn clouds_start_at_fixed_anchors() {
        let (mut graph, root, mut rng) = setup();
        let clouds = clouds(&mut graph, root, &mut rng);
        assert_eq!(clouds.len(), CLOUD_ANCHORS.len());
        assert_eq!(clouds[0].base, Vector3::new(5.0, 10.0, -10.0));
        // Every puff shares one unit sphere
        assert_eq!(graph.meshes().len(), 1);
    }

    #[test]
    fn rain_has_a_speed_per_drop() {
        let (mut graph, root, mut rng) = setup();
        let field = rain(&mut graph, root, &mut rng, 500);
        let rain = &graph.particles()[field];
        assert_eq!(rain.len(), 500);
        assert_eq!(rain.fall_speed.len(), 500);
        assert!(rain.fall_speed.iter().all(|v| (6.0..12.0).contains(v)));
        assert!(rain.base.iter().all(|p| (RAIN_SPAN.0..RAIN_SPAN.1).contains(&p[1])));
    }

    #[test]
    fn ground_is_tinted_per_vertex() {
        let (mut graph, root, mut rng) = setup();
        let ground = ground(&mut graph, root, &mut rng);
        let mesh = graph.node(ground).drawable.map(|d| d.mesh).expect("ground is drawable");
        let data = graph.mesh(mesh);
        assert_eq!(data.colors.len(), data.vertex_count());
    }
}
