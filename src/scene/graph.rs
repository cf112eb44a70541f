//! Arena scene graph.
//!
//! Nodes live in one `Vec` and refer to their parent by index. A parent is
//! always inserted before its children, so world matrices and effective
//! visibility resolve in a single forward pass.

use std::collections::HashMap;

use cgmath::{Matrix4, Rad, Vector3};

use crate::gfx::geometry::{GeometryData, Shape, ShapeKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

impl MeshId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Converts a `0xRRGGBB` literal to linear-ish RGB in [0, 1]
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Position, Euler rotation (XYZ order, radians) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vector3 { x: 0.0, y: 0.0, z: 0.0 },
        rotation: Vector3 { x: 0.0, y: 0.0, z: 0.0 },
        scale: Vector3 { x: 1.0, y: 1.0, z: 1.0 },
    };

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::IDENTITY
        }
    }

    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn scaled(mut self, s: f32) -> Self {
        self.scale = Vector3::new(s, s, s);
        self
    }

    /// Local matrix `T * Rx * Ry * Rz * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Ambient plus one directional light
    Lit,
    /// Flat colour, ignores lights
    Unlit,
    /// Vertical gradient from `secondary` (bottom) to `color` (top)
    Sky,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub secondary: [f32; 3],
    pub shading: Shading,
    /// Added on top of the lit colour, in [0, 1]
    pub emissive: f32,
}

impl Material {
    pub fn lit(hex: u32) -> Self {
        Self {
            color: rgb(hex),
            secondary: [0.0; 3],
            shading: Shading::Lit,
            emissive: 0.0,
        }
    }

    pub fn unlit(hex: u32) -> Self {
        Self {
            shading: Shading::Unlit,
            ..Self::lit(hex)
        }
    }

    pub fn glowing(hex: u32, emissive: f32) -> Self {
        Self {
            emissive,
            ..Self::lit(hex)
        }
    }

    pub fn sky(top: u32, bottom: u32) -> Self {
        Self {
            color: rgb(top),
            secondary: rgb(bottom),
            shading: Shading::Sky,
            emissive: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    pub mesh: MeshId,
    pub material: Material,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub transform: Transform,
    pub visible: bool,
    pub drawable: Option<Drawable>,
}

/// A cloud of points drawn in one call, positioned relative to `anchor`
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub anchor: NodeId,
    pub color: [f32; 3],
    /// Spawn positions; the frame updater derives `positions` from these
    pub base: Vec<[f32; 3]>,
    /// Per-point fall speed; empty for static fields
    pub fall_speed: Vec<f32>,
    pub positions: Vec<[f32; 3]>,
}

impl ParticleField {
    pub fn new(anchor: NodeId, color: [f32; 3], base: Vec<[f32; 3]>) -> Self {
        Self {
            anchor,
            color,
            positions: base.clone(),
            base,
            fall_speed: Vec::new(),
        }
    }

    pub fn with_fall_speed(mut self, fall_speed: Vec<f32>) -> Self {
        self.fall_speed = fall_speed;
        self
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// World-space state of one node after resolving the hierarchy
#[derive(Debug, Clone, Copy)]
pub struct WorldNode {
    pub matrix: Matrix4<f32>,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    meshes: Vec<GeometryData>,
    shape_cache: HashMap<ShapeKey, MeshId>,
    particles: Vec<ParticleField>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds geometry that is not shared with any other node
    pub fn add_mesh(&mut self, data: GeometryData) -> MeshId {
        self.meshes.push(data);
        MeshId(self.meshes.len() - 1)
    }

    /// Returns the shared mesh for `shape`, generating it on first use
    pub fn shape_mesh(&mut self, shape: Shape) -> MeshId {
        if let Some(id) = self.shape_cache.get(&shape.key()) {
            return *id;
        }
        let id = self.add_mesh(shape.generate());
        self.shape_cache.insert(shape.key(), id);
        id
    }

    pub fn mesh(&self, id: MeshId) -> &GeometryData {
        &self.meshes[id.0]
    }

    pub fn meshes(&self) -> &[GeometryData] {
        &self.meshes
    }

    pub fn add_group(&mut self, parent: Option<NodeId>, transform: Transform) -> NodeId {
        self.push(Node {
            parent,
            transform,
            visible: true,
            drawable: None,
        })
    }

    pub fn add_shape(
        &mut self,
        parent: Option<NodeId>,
        shape: Shape,
        material: Material,
        transform: Transform,
    ) -> NodeId {
        let mesh = self.shape_mesh(shape);
        self.add_mesh_node(parent, mesh, material, transform)
    }

    pub fn add_mesh_node(
        &mut self,
        parent: Option<NodeId>,
        mesh: MeshId,
        material: Material,
        transform: Transform,
    ) -> NodeId {
        self.push(Node {
            parent,
            transform,
            visible: true,
            drawable: Some(Drawable { mesh, material }),
        })
    }

    fn push(&mut self, node: Node) -> NodeId {
        debug_assert!(node.parent.map_or(true, |p| p.0 < self.nodes.len()));
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn add_particles(&mut self, field: ParticleField) -> usize {
        self.particles.push(field);
        self.particles.len() - 1
    }

    pub fn particles(&self) -> &[ParticleField] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [ParticleField] {
        &mut self.particles
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn transform(&self, id: NodeId) -> &Transform {
        &self.nodes[id.0].transform
    }

    pub fn transform_mut(&mut self, id: NodeId) -> &mut Transform {
        &mut self.nodes[id.0].transform
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id.0].visible = visible;
    }

    pub fn set_color(&mut self, id: NodeId, color: [f32; 3]) {
        if let Some(drawable) = self.nodes[id.0].drawable.as_mut() {
            drawable.material.color = color;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn drawable_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.drawable.is_some()).count()
    }

    /// True if `node` is `ancestor` or lies below it
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if id.0 < ancestor.0 {
                return false;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    /// `root` and every node below it
    pub fn subtree(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        (root.0..self.nodes.len())
            .map(NodeId)
            .filter(move |id| self.is_descendant_of(*id, root))
    }

    /// Resolves world matrices and inherited visibility for every node
    pub fn world_nodes(&self) -> Vec<WorldNode> {
        let mut out: Vec<WorldNode> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.transform.matrix();
            let resolved = match node.parent {
                Some(parent) => {
                    let p = out[parent.0];
                    WorldNode {
                        matrix: p.matrix * local,
                        visible: p.visible && node.visible,
                    }
                }
                None => WorldNode {
                    matrix: local,
                    visible: node.visible,
                },
            };
            out.push(resolved);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn rgb_splits_channels() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(rgb(0x0000ff), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn shapes_are_shared() {
        let mut graph = SceneGraph::new();
        let a = graph.add_shape(None, Shape::sphere(1.0), Material::lit(0xffffff), Transform::IDENTITY);
        let b = graph.add_shape(None, Shape::sphere(1.0), Material::lit(0x000000), Transform::IDENTITY);
        assert_eq!(graph.meshes().len(), 1);
        assert_eq!(
            graph.node(a).drawable.map(|d| d.mesh),
            graph.node(b).drawable.map(|d| d.mesh)
        );
    }

    #[test]
    fn world_matrix_composes_parent_first() {
        let mut graph = SceneGraph::new();
        let root = graph.add_group(None, Transform::at(1.0, 0.0, 0.0).rotated(0.0, FRAC_PI_2, 0.0));
        let child = graph.add_group(Some(root), Transform::at(0.0, 0.0, 1.0));
        let world = graph.world_nodes();
        let p = world[child.index()].matrix * Vector4::new(0.0, 0.0, 0.0, 1.0);
        // +Z rotated a quarter turn about Y becomes +X
        assert!((p.truncate() - Vector3::new(2.0, 0.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn hidden_parent_hides_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.add_group(None, Transform::IDENTITY);
        let child = graph.add_group(Some(root), Transform::IDENTITY);
        let other = graph.add_group(None, Transform::IDENTITY);
        graph.set_visible(root, false);
        let world = graph.world_nodes();
        assert!(!world[child.index()].visible);
        assert!(world[other.index()].visible);
        assert_eq!(graph.subtree(root).collect::<Vec<_>>(), vec![root, child]);
    }
}
