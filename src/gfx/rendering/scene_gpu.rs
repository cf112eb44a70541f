//! GPU mirror of one [`SceneGraph`].
//!
//! Mesh buffers are uploaded once and only appended to (an imported model
//! arrives after the scene is built). Node uniforms and particle points are
//! rewritten every frame from the resolved hierarchy.

use log::debug;
use wgpu::util::DeviceExt;

use crate::{
    gfx::{
        resources::{NodeBindings, NodeUniform},
        vertex::Vertex3D,
    },
    scene::graph::SceneGraph,
};

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuPoints {
    buffer: wgpu::Buffer,
    capacity: usize,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MeshDraw {
    mesh: usize,
    slot: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PointDraw {
    field: usize,
    slot: usize,
}

/// Uniform slots and draw lists for one frame
#[derive(Debug, Default)]
struct FramePlan {
    uniforms: Vec<NodeUniform>,
    meshes: Vec<MeshDraw>,
    points: Vec<PointDraw>,
}

impl FramePlan {
    /// Visible drawables first, then visible particle fields
    fn build(graph: &SceneGraph) -> Self {
        let world = graph.world_nodes();
        let mut plan = FramePlan::default();

        for (node, resolved) in graph.nodes().iter().zip(&world) {
            let Some(drawable) = &node.drawable else {
                continue;
            };
            if !resolved.visible {
                continue;
            }
            plan.meshes.push(MeshDraw {
                mesh: drawable.mesh.index(),
                slot: plan.uniforms.len(),
            });
            plan.uniforms
                .push(NodeUniform::new(resolved.matrix, &drawable.material));
        }

        for (field_index, field) in graph.particles().iter().enumerate() {
            let anchor = &world[field.anchor.index()];
            if !anchor.visible || field.is_empty() {
                continue;
            }
            plan.points.push(PointDraw {
                field: field_index,
                slot: plan.uniforms.len(),
            });
            plan.uniforms
                .push(NodeUniform::points(anchor.matrix, field.color));
        }

        plan
    }
}

pub struct SceneGpu {
    meshes: Vec<GpuMesh>,
    points: Vec<Option<GpuPoints>>,
    nodes: NodeBindings,
    plan: FramePlan,
}

impl SceneGpu {
    pub fn new(device: &wgpu::Device, node_layout: &wgpu::BindGroupLayout, graph: &SceneGraph) -> Self {
        let capacity = (graph.drawable_count() + graph.particles().len()).next_power_of_two();
        let mut gpu = Self {
            meshes: Vec::with_capacity(graph.meshes().len()),
            points: Vec::new(),
            nodes: NodeBindings::new(device, node_layout, capacity),
            plan: FramePlan::default(),
        };
        gpu.upload_new_meshes(device, graph);
        gpu
    }

    fn upload_new_meshes(&mut self, device: &wgpu::Device, graph: &SceneGraph) {
        for (index, geometry) in graph.meshes().iter().enumerate().skip(self.meshes.len()) {
            let vertices = geometry.to_vertices();
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Mesh {index} Vertices")),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Mesh {index} Indices")),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            self.meshes.push(GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: geometry.indices.len() as u32,
            });
        }
    }

    fn upload_points(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, graph: &SceneGraph) {
        let fields = graph.particles();
        self.points.resize_with(fields.len(), || None);

        for draw in &self.plan.points {
            let field = &fields[draw.field];
            let vertices: Vec<Vertex3D> = field.positions.iter().copied().map(Vertex3D::point).collect();

            let slot = &mut self.points[draw.field];
            let fits = slot.as_ref().is_some_and(|p| p.capacity >= vertices.len());
            if !fits {
                if let Some(old) = slot.take() {
                    old.buffer.destroy();
                }
                let capacity = vertices.len().next_power_of_two();
                *slot = Some(GpuPoints {
                    buffer: device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some(&format!("Particle Field {}", draw.field)),
                        size: (capacity * std::mem::size_of::<Vertex3D>()) as u64,
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    }),
                    capacity,
                    count: 0,
                });
            }

            if let Some(points) = slot {
                queue.write_buffer(&points.buffer, 0, bytemuck::cast_slice(&vertices));
                points.count = vertices.len() as u32;
            }
        }
    }

    /// Brings buffers up to date with `graph` for the coming frame
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        node_layout: &wgpu::BindGroupLayout,
        graph: &SceneGraph,
    ) {
        self.upload_new_meshes(device, graph);
        self.plan = FramePlan::build(graph);

        if self.plan.uniforms.len() > self.nodes.capacity() {
            let capacity = self.plan.uniforms.len().next_power_of_two();
            debug!("Growing node uniforms to {capacity} slots");
            self.nodes.destroy();
            self.nodes = NodeBindings::new(device, node_layout, capacity);
        }
        self.nodes.write(queue, &self.plan.uniforms);
        self.upload_points(device, queue, graph);
    }

    pub fn draw_meshes(&self, pass: &mut wgpu::RenderPass<'_>) {
        for draw in &self.plan.meshes {
            let Some(mesh) = self.meshes.get(draw.mesh) else {
                continue;
            };
            if mesh.index_count == 0 {
                continue;
            }
            pass.set_bind_group(1, self.nodes.bind_group(), &[self.nodes.offset(draw.slot)]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    pub fn draw_points(&self, pass: &mut wgpu::RenderPass<'_>) {
        for draw in &self.plan.points {
            let Some(Some(points)) = self.points.get(draw.field) else {
                continue;
            };
            if points.count == 0 {
                continue;
            }
            pass.set_bind_group(1, self.nodes.bind_group(), &[self.nodes.offset(draw.slot)]);
            pass.set_vertex_buffer(0, points.buffer.slice(..));
            pass.draw(0..points.count, 0..1);
        }
    }

    /// Frees every GPU buffer owned by this scene
    pub fn destroy(self) {
        for mesh in &self.meshes {
            mesh.vertex_buffer.destroy();
            mesh.index_buffer.destroy();
        }
        for points in self.points.iter().flatten() {
            points.buffer.destroy();
        }
        self.nodes.destroy();
        debug!("Released {} meshes", self.meshes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gfx::geometry::Shape,
        scene::graph::{rgb, Material, ParticleField, Transform},
    };

    #[test]
    fn plan_skips_hidden_subtrees() {
        let mut graph = SceneGraph::new();
        let root = graph.add_group(None, Transform::IDENTITY);
        let hidden = graph.add_group(Some(root), Transform::IDENTITY);
        graph.add_shape(Some(root), Shape::sphere(1.0), Material::lit(0xff0000), Transform::IDENTITY);
        graph.add_shape(Some(hidden), Shape::sphere(1.0), Material::lit(0x00ff00), Transform::IDENTITY);
        graph.set_visible(hidden, false);

        let plan = FramePlan::build(&graph);
        assert_eq!(plan.meshes.len(), 1);
        assert_eq!(plan.uniforms.len(), 1);
    }

    #[test]
    fn points_follow_meshes_in_slot_order() {
        let mut graph = SceneGraph::new();
        let root = graph.add_group(None, Transform::IDENTITY);
        graph.add_shape(Some(root), Shape::cuboid(1.0, 1.0, 1.0), Material::unlit(0xffffff), Transform::IDENTITY);
        graph.add_particles(ParticleField::new(root, rgb(0xaaaaaa), vec![[0.0; 3]; 4]));
        graph.add_particles(ParticleField::new(root, rgb(0xaaaaaa), Vec::new()));

        let plan = FramePlan::build(&graph);
        assert_eq!(plan.meshes, vec![MeshDraw { mesh: 0, slot: 0 }]);
        assert_eq!(plan.points, vec![PointDraw { field: 0, slot: 1 }]);
    }
}
