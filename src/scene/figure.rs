//! Figure construction.
//!
//! Humans and the robot share one builder: a [`FigureSpec`] names the role,
//! home position and body plan, and [`build_figure`] returns a [`Figure`]
//! holding direct handles to the parts the frame updater animates.

use std::f32::consts::{FRAC_PI_2, PI};

use cgmath::Vector3;

use super::graph::{Material, NodeId, SceneGraph, Transform};
use crate::gfx::geometry::Shape;

/// Height a family member drops in from
pub const SPAWN_HEIGHT: f32 = 10.0;

mod palette {
    pub const SKIN_LIGHT: u32 = 0xffe0bd;
    pub const SKIN_MEDIUM: u32 = 0xd8a77b;
    pub const SKIN_DARK: u32 = 0x8d5524;
    pub const HAIR_BROWN: u32 = 0x8b4513;
    pub const HAIR_BLACK: u32 = 0x000000;
    pub const HAIR_GOLD: u32 = 0xffd700;
    pub const DRESS: u32 = 0xff6699;
    pub const SHIRT: u32 = 0x3366cc;
    pub const PANTS: u32 = 0x333333;
    pub const IRIS: u32 = 0x4b0082;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FigureRole {
    Father,
    Mother,
    Son,
    Daughter,
    Robot,
}

impl FigureRole {
    pub fn label(self) -> &'static str {
        match self {
            FigureRole::Father => "father",
            FigureRole::Mother => "mother",
            FigureRole::Son => "son",
            FigureRole::Daughter => "daughter",
            FigureRole::Robot => "robot",
        }
    }

    /// Fixed placement and look for each role
    pub fn spec(self) -> FigureSpec {
        use palette::*;
        let human = |home: [f32; 3], scale, look| FigureSpec {
            role: self,
            home: home.into(),
            scale,
            plan: BodyPlan::Human(look),
        };
        match self {
            FigureRole::Mother => human(
                [-3.0, 0.0, 0.0],
                0.9,
                HumanLook {
                    skin: SKIN_MEDIUM,
                    hair: HAIR_BROWN,
                    hairstyle: Hairstyle::Long,
                    accessory: Accessory::Glasses,
                    clothing: DRESS,
                    male: false,
                },
            ),
            FigureRole::Father => human(
                [3.0, 0.0, 0.0],
                1.0,
                HumanLook {
                    skin: SKIN_DARK,
                    hair: HAIR_BLACK,
                    hairstyle: Hairstyle::Short,
                    accessory: Accessory::Hat,
                    clothing: SHIRT,
                    male: true,
                },
            ),
            FigureRole::Son => human(
                [-1.0, 0.0, 2.0],
                0.7,
                HumanLook {
                    skin: SKIN_MEDIUM,
                    hair: HAIR_BROWN,
                    hairstyle: Hairstyle::Short,
                    accessory: Accessory::None,
                    clothing: 0x00ff00,
                    male: true,
                },
            ),
            FigureRole::Daughter => human(
                [1.0, 0.0, 2.0],
                0.6,
                HumanLook {
                    skin: SKIN_LIGHT,
                    hair: HAIR_GOLD,
                    hairstyle: Hairstyle::Long,
                    accessory: Accessory::None,
                    clothing: 0xff00ff,
                    male: false,
                },
            ),
            FigureRole::Robot => FigureSpec {
                role: self,
                home: Vector3::new(0.0, 0.0, 0.0),
                scale: 1.0,
                plan: BodyPlan::Robot,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hairstyle {
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessory {
    None,
    Glasses,
    Hat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanLook {
    pub skin: u32,
    pub hair: u32,
    pub hairstyle: Hairstyle,
    pub accessory: Accessory,
    pub clothing: u32,
    pub male: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPlan {
    Human(HumanLook),
    Robot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSpec {
    pub role: FigureRole,
    pub home: Vector3<f32>,
    pub scale: f32,
    pub plan: BodyPlan,
}

/// A built figure: the root node plus handles to its animated parts
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub role: FigureRole,
    pub root: NodeId,
    pub head: NodeId,
    pub body: NodeId,
    pub eyes: [NodeId; 2],
    pub left_arm: NodeId,
    pub right_arm: NodeId,
    pub left_leg: NodeId,
    pub right_leg: NodeId,
    /// Only robots carry a jetpack
    pub jetpack: Option<NodeId>,
    pub home: Vector3<f32>,
}

impl Figure {
    pub fn is_robot(&self) -> bool {
        self.role == FigureRole::Robot
    }
}

pub fn build_figure(graph: &mut SceneGraph, spec: &FigureSpec, parent: Option<NodeId>) -> Figure {
    match spec.plan {
        BodyPlan::Human(look) => build_human(graph, spec, &look, parent),
        BodyPlan::Robot => build_robot(graph, spec, parent),
    }
}

fn build_human(
    graph: &mut SceneGraph,
    spec: &FigureSpec,
    look: &HumanLook,
    parent: Option<NodeId>,
) -> Figure {
    let s = spec.scale;
    let skin = Material::lit(look.skin);
    let clothing = Material::lit(look.clothing);

    let mut root_transform = Transform::at(spec.home.x, spec.home.y + SPAWN_HEIGHT, spec.home.z);
    root_transform = root_transform.scaled(2.0 * s);
    let root = graph.add_group(parent, root_transform);

    let head = graph.add_shape(Some(root), Shape::sphere(0.25), skin, Transform::at(0.0, 1.5 * s, 0.0));

    let hair = Material::lit(look.hair);
    match look.hairstyle {
        Hairstyle::Short => graph.add_shape(
            Some(root),
            Shape::Hemisphere {
                radius: 0.26,
                segments: 32,
            },
            hair,
            Transform::at(0.0, 1.63 * s, 0.0),
        ),
        Hairstyle::Long => {
            graph.add_shape(Some(root), Shape::sphere(0.28), hair, Transform::at(0.0, 1.58 * s, 0.0))
        }
    };

    let eyes = [-0.1, 0.1].map(|x| {
        let eye = graph.add_group(Some(root), Transform::at(x, 1.55 * s, 0.18));
        graph.add_shape(Some(eye), Shape::sphere(0.05), Material::lit(0xffffff), Transform::IDENTITY);
        graph.add_shape(
            Some(eye),
            Shape::sphere(0.03),
            Material::lit(palette::IRIS),
            Transform::at(0.0, 0.0, 0.02),
        );
        eye
    });

    graph.add_shape(
        Some(root),
        Shape::cylinder(0.1, 0.15, 0.2),
        skin,
        Transform::at(0.0, 1.35 * s, 0.0),
    );
    let body = graph.add_shape(
        Some(root),
        Shape::cylinder(0.3, if look.male { 0.4 } else { 0.45 }, 0.8),
        clothing,
        Transform::at(0.0, 0.9 * s, 0.0),
    );

    let mut arm = |side: f32| {
        // Left arm sits at -x and tilts outward
        let pivot = graph.add_group(
            Some(root),
            Transform::at(0.4 * side, 1.3 * s, 0.0).rotated(0.0, 0.0, -side * PI / 16.0),
        );
        graph.add_shape(Some(pivot), Shape::cylinder(0.08, 0.06, 0.4), clothing, Transform::at(0.0, -0.2, 0.0));
        graph.add_shape(Some(pivot), Shape::sphere(0.06), clothing, Transform::at(0.0, -0.4, 0.0));
        graph.add_shape(Some(pivot), Shape::cylinder(0.06, 0.04, 0.4), clothing, Transform::at(0.0, -0.6, 0.0));
        graph.add_shape(Some(pivot), Shape::sphere(0.06), skin, Transform::at(0.0, -0.8, 0.0));
        pivot
    };
    let left_arm = arm(-1.0);
    let right_arm = arm(1.0);

    let pants = if look.male {
        Material::lit(palette::PANTS)
    } else {
        clothing
    };
    let mut leg = |side: f32| {
        let pivot = graph.add_group(Some(root), Transform::at(0.2 * side, 0.5 * s, 0.0));
        graph.add_shape(Some(pivot), Shape::cylinder(0.12, 0.1, 1.0), pants, Transform::at(0.0, -0.5, 0.0));
        graph.add_shape(
            Some(pivot),
            Shape::cuboid(0.15, 0.1, 0.25),
            Material::lit(0x000000),
            Transform::at(0.0, -1.05, 0.05),
        );
        pivot
    };
    let left_leg = leg(-1.0);
    let right_leg = leg(1.0);

    match look.accessory {
        Accessory::Glasses => {
            for x in [-0.1, 0.1] {
                graph.add_shape(
                    Some(root),
                    Shape::Torus {
                        radius: 0.1,
                        tube: 0.02,
                    },
                    Material::lit(0x000000),
                    Transform::at(x, 1.55 * s, 0.2).rotated(0.0, FRAC_PI_2, 0.0),
                );
            }
        }
        Accessory::Hat => {
            graph.add_shape(
                Some(root),
                Shape::Cone {
                    radius: 0.3,
                    height: 0.3,
                    segments: 32,
                },
                Material::lit(palette::PANTS),
                Transform::at(0.0, 1.8 * s, 0.0),
            );
        }
        Accessory::None => {}
    }

    Figure {
        role: spec.role,
        root,
        head,
        body,
        eyes,
        left_arm,
        right_arm,
        left_leg,
        right_leg,
        jetpack: None,
        home: spec.home,
    }
}

fn build_robot(graph: &mut SceneGraph, spec: &FigureSpec, parent: Option<NodeId>) -> Figure {
    let metal = Material::lit(0xa9a9a9);
    let root = graph.add_group(parent, Transform::at(spec.home.x, spec.home.y, spec.home.z));

    let head = graph.add_group(Some(root), Transform::at(0.0, 3.5, 0.0));
    graph.add_shape(Some(head), Shape::sphere(0.8), Material::lit(0xc0c0c0), Transform::IDENTITY);
    let eyes = [-0.3, 0.3].map(|x| {
        graph.add_shape(
            Some(head),
            Shape::sphere(0.2),
            Material::glowing(0x0000ff, 0.5),
            Transform::at(x, 0.2, 0.6),
        )
    });
    for (x, tilt) in [(-0.3, 0.2), (0.3, -0.2)] {
        graph.add_shape(
            Some(head),
            Shape::cylinder(0.05, 0.05, 0.5),
            Material::lit(0xff0000),
            Transform::at(x, 0.7, 0.0).rotated(0.0, 0.0, tilt),
        );
    }
    graph.add_shape(
        Some(head),
        Shape::cuboid(0.5, 0.1, 0.1),
        Material::lit(0x000000),
        Transform::at(0.0, -0.3, 0.7),
    );

    let body = graph.add_shape(
        Some(root),
        Shape::cuboid(2.0, 3.0, 1.5),
        Material::lit(0xffff00),
        Transform::at(0.0, 1.0, 0.0),
    );
    graph.add_shape(
        Some(root),
        Shape::cuboid(1.0, 1.0, 1.6),
        Material::lit(0x800080),
        Transform::at(0.0, 1.5, 0.0),
    );
    graph.add_shape(
        Some(root),
        Shape::cuboid(0.8, 0.8, 0.1),
        Material::lit(0xffd700),
        Transform::at(0.0, 1.5, 0.8),
    );

    let [left_arm, right_arm] = [-1.3, 1.3].map(|x| {
        graph.add_shape(
            Some(root),
            Shape::cylinder(0.3, 0.3, 2.0),
            metal,
            Transform::at(x, 1.5, 0.0).rotated(0.0, 0.0, FRAC_PI_2),
        )
    });
    for x in [-2.3, 2.3] {
        graph.add_shape(Some(root), Shape::sphere(0.3), Material::lit(0x008000), Transform::at(x, 1.5, 0.0));
    }

    let [left_leg, right_leg] = [-0.6, 0.6].map(|x| {
        graph.add_shape(Some(root), Shape::cylinder(0.4, 0.4, 2.5), metal, Transform::at(x, -1.5, 0.0))
    });
    for x in [-0.6, 0.6] {
        graph.add_shape(
            Some(root),
            Shape::cuboid(0.6, 0.2, 0.8),
            Material::lit(0xffa500),
            Transform::at(x, -2.9, 0.2),
        );
    }

    let jetpack = graph.add_group(Some(root), Transform::at(0.0, -1.5, -0.5));
    graph.add_shape(
        Some(jetpack),
        Shape::cylinder(0.1, 0.3, 0.5),
        Material::glowing(0xffa500, 0.5),
        Transform::IDENTITY.rotated(FRAC_PI_2, 0.0, 0.0),
    );
    graph.set_visible(jetpack, false);

    Figure {
        role: spec.role,
        root,
        head,
        body,
        eyes,
        left_arm,
        right_arm,
        left_leg,
        right_leg,
        jetpack: Some(jetpack),
        home: spec.home,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_handles_point_at_distinct_nodes() {
        let mut graph = SceneGraph::new();
        let figure = build_figure(&mut graph, &FigureRole::Father.spec(), None);
        let handles = [
            figure.head,
            figure.body,
            figure.left_arm,
            figure.right_arm,
            figure.left_leg,
            figure.right_leg,
            figure.eyes[0],
            figure.eyes[1],
        ];
        for (i, a) in handles.iter().enumerate() {
            assert!(graph.is_descendant_of(*a, figure.root));
            for b in &handles[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(figure.jetpack.is_none());
    }

    #[test]
    fn glasses_lenses_face_sideways() {
        let mut graph = SceneGraph::new();
        let mother = build_figure(&mut graph, &FigureRole::Mother.spec(), None);
        let lens = graph.shape_mesh(Shape::Torus {
            radius: 0.1,
            tube: 0.02,
        });
        let lenses: Vec<_> = graph
            .nodes()
            .iter()
            .filter(|node| node.parent == Some(mother.root))
            .filter(|node| node.drawable.as_ref().is_some_and(|d| d.mesh == lens))
            .collect();
        assert_eq!(lenses.len(), 2);
        for node in lenses {
            assert_eq!(node.transform.rotation.y, FRAC_PI_2);
        }
    }

    #[test]
    fn humans_spawn_above_home_scaled_by_role() {
        let mut graph = SceneGraph::new();
        let figure = build_figure(&mut graph, &FigureRole::Daughter.spec(), None);
        let root = graph.transform(figure.root);
        assert_eq!(root.position, Vector3::new(1.0, SPAWN_HEIGHT, 2.0));
        assert!((root.scale.x - 1.2).abs() < 1e-6);
    }

    #[test]
    fn robot_jetpack_starts_hidden() {
        let mut graph = SceneGraph::new();
        let robot = build_figure(&mut graph, &FigureRole::Robot.spec(), None);
        let jetpack = robot.jetpack.expect("robot has a jetpack");
        assert!(!graph.node(jetpack).visible);
        assert!(graph.is_descendant_of(robot.eyes[0], robot.head));
        assert!(robot.is_robot());
    }

    #[test]
    fn accessories_follow_the_role() {
        let mut plain = SceneGraph::new();
        build_figure(&mut plain, &FigureRole::Son.spec(), None);
        let mut hatted = SceneGraph::new();
        build_figure(&mut hatted, &FigureRole::Father.spec(), None);
        assert_eq!(hatted.len(), plain.len() + 1);
    }
}
