//! Uniform bindings shared across pipelines.
//!
//! Slot 0 holds per-frame globals (camera and sun). Slot 1 holds one
//! [`NodeUniform`] per draw, selected with a dynamic offset.
//! Both layouts MUST match the structs in `scene.wgsl` exactly.

use crate::{
    gfx::camera::CameraUniform,
    scene::{
        graph::{Material, Shading},
        lighting::Lighting,
    },
    wgpu_utils::{
        binding_types::{self, single_entry_layout},
        SlotBuffer, UniformBuffer,
    },
};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    view_proj: [[f32; 4]; 4],
    view_position: [f32; 4],
    /// xyz: sun position, w: sun intensity
    sun_position: [f32; 4],
    /// rgb: sun colour, w: ambient intensity
    sun_color: [f32; 4],
}

impl GlobalUniform {
    pub fn new(camera: &CameraUniform, lighting: &Lighting) -> Self {
        let [x, y, z] = lighting.sun_position;
        let [r, g, b] = lighting.sun_color;
        Self {
            view_proj: camera.view_proj,
            view_position: camera.view_position,
            sun_position: [x, y, z, lighting.sun_intensity],
            sun_color: [r, g, b, lighting.ambient],
        }
    }
}

/// Per-draw transform and material
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    secondary: [f32; 4],
    /// x: shading kind, y: emissive
    params: [f32; 4],
}

impl NodeUniform {
    pub fn new(model: cgmath::Matrix4<f32>, material: &Material) -> Self {
        let [r, g, b] = material.color;
        let [sr, sg, sb] = material.secondary;
        let shading = match material.shading {
            Shading::Lit => 0.0,
            Shading::Unlit => 1.0,
            Shading::Sky => 2.0,
        };
        Self {
            model: model.into(),
            color: [r, g, b, 1.0],
            secondary: [sr, sg, sb, 1.0],
            params: [shading, material.emissive, 0.0, 0.0],
        }
    }

    /// Flat colour used for particle points
    pub fn points(model: cgmath::Matrix4<f32>, color: [f32; 3]) -> Self {
        let [r, g, b] = color;
        Self {
            model: model.into(),
            color: [r, g, b, 1.0],
            secondary: [0.0; 4],
            params: [1.0, 0.0, 0.0, 0.0],
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Camera and light data bound at slot 0 of every pipeline
pub struct GlobalBindings {
    ubo: GlobalUBO,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let ubo = GlobalUBO::new(device);
        let layout = single_entry_layout(device, "Globals Bind Group Layout", binding_types::uniform());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self {
            ubo,
            layout,
            bind_group,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, camera: &CameraUniform, lighting: &Lighting) {
        self.ubo
            .update_content(queue, GlobalUniform::new(camera, lighting));
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Per-node uniforms bound at slot 1 with a dynamic offset
pub struct NodeBindings {
    slots: SlotBuffer<NodeUniform>,
    bind_group: wgpu::BindGroup,
}

impl NodeBindings {
    pub fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        single_entry_layout(
            device,
            "Node Bind Group Layout",
            binding_types::uniform_dynamic(std::mem::size_of::<NodeUniform>() as u64),
        )
    }

    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, capacity: usize) -> Self {
        let slots = SlotBuffer::new(device, capacity);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Node Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: slots.binding_resource(),
            }],
        });
        Self { slots, bind_group }
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub fn write(&mut self, queue: &wgpu::Queue, uniforms: &[NodeUniform]) {
        self.slots.write(queue, uniforms);
    }

    pub fn offset(&self, slot: usize) -> u32 {
        self.slots.offset(slot)
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn destroy(&self) {
        self.slots.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Matrix4, SquareMatrix};

    #[test]
    fn layouts_have_shader_friendly_sizes() {
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 112);
        assert_eq!(std::mem::size_of::<NodeUniform>(), 112);
    }

    #[test]
    fn node_uniform_encodes_shading_kind() {
        let sky = NodeUniform::new(Matrix4::identity(), &Material::sky(0x0077ff, 0xffffff));
        assert_eq!(sky.params[0], 2.0);
        assert_eq!(sky.secondary, [1.0, 1.0, 1.0, 1.0]);

        let glow = NodeUniform::new(Matrix4::identity(), &Material::glowing(0xff0000, 0.5));
        assert_eq!(glow.params, [0.0, 0.5, 0.0, 0.0]);
        assert_eq!(glow.color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn globals_pack_light_scalars_into_w() {
        let lighting = Lighting::family();
        let globals = GlobalUniform::new(&CameraUniform::default(), &lighting);
        assert_eq!(globals.sun_position, [5.0, 10.0, 5.0, 0.8]);
        assert_eq!(globals.sun_color[3], 0.5);
    }
}
