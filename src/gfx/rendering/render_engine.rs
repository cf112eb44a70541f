//! WGPU-based rendering engine
//!
//! Owns the surface, device and the two scene pipelines: filled meshes and
//! particle points. Per-scene buffers live in [`SceneGpu`] so they can be
//! released when a scene is torn down while the engine lives on.

use std::sync::Arc;

use log::{info, warn};
use wgpu::{Device, TextureFormat};

use crate::{
    error::{HearthError, Result},
    gfx::{
        camera::CameraUniform,
        resources::{GlobalBindings, NodeBindings, TextureResource},
    },
    scene::{graph::SceneGraph, lighting::Lighting},
};

use super::{
    pipeline_manager::{PipelineConfig, PipelineManager},
    scene_gpu::SceneGpu,
};

const MESH_PIPELINE: &str = "Mesh";
const POINTS_PIPELINE: &str = "Points";
const SCENE_SHADER: &str = include_str!("scene.wgsl");

/// What happened to a requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// The surface was lost or outdated and has been reconfigured
    Reconfigured,
    /// Acquiring the surface texture timed out
    Skipped,
}

/// Core rendering engine managing GPU resources and draw calls
///
/// The RenderEngine handles the low-level graphics work:
/// - Surface and device management
/// - The mesh and particle pipelines
/// - Depth buffer handling
/// - Camera and sun uniform updates
/// - UI overlay rendering
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    node_layout: wgpu::BindGroupLayout,
    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Initializes wgpu, configures the surface and depth buffer, and builds
    /// the mesh and particle pipelines from `scene.wgsl`.
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `vsync` - Whether presentation waits for vertical blank
    ///
    /// # Errors
    /// Fails if no surface, adapter or device can be created, or if the
    /// surface reports no usable format.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(HearthError::UnsupportedSurface)?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .ok_or(HearthError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_bindings = GlobalBindings::new(&device);
        let node_layout = NodeBindings::create_layout(&device);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());
        pipeline_manager.load_shader("scene", SCENE_SHADER);

        let layouts = vec![global_bindings.layout().clone(), node_layout.clone()];

        // Planes, hair caps and the sky sphere are all seen from both sides
        pipeline_manager.register_pipeline(
            MESH_PIPELINE,
            PipelineConfig::default()
                .with_label("MESH")
                .with_cull_mode(None)
                .with_depth(TextureResource::DEPTH_FORMAT, true)
                .with_color_format(format, false)
                .with_bind_group_layouts(layouts.clone()),
        );
        pipeline_manager.register_pipeline(
            POINTS_PIPELINE,
            PipelineConfig::default()
                .with_label("POINTS")
                .with_primitive_topology(wgpu::PrimitiveTopology::PointList)
                .with_cull_mode(None)
                .with_depth(TextureResource::DEPTH_FORMAT, false)
                .with_color_format(format, true)
                .with_bind_group_layouts(layouts),
        );
        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            warn!("{} pipeline(s) failed to build", errors.len());
        }

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_bindings,
            node_layout,
            clear_color: wgpu::Color::BLACK,
        })
    }

    /// Creates the GPU mirror for a freshly built scene
    ///
    /// The returned [`SceneGpu`] belongs to one scene context and must be
    /// destroyed with it.
    pub fn create_scene_gpu(&self, graph: &SceneGraph) -> SceneGpu {
        SceneGpu::new(&self.device, &self.node_layout, graph)
    }

    /// Updates camera and light uniform buffers
    ///
    /// Should be called each frame before rendering. Also picks up the
    /// scene's clear colour from `lighting`.
    ///
    /// # Arguments
    /// * `camera_uniform` - View projection and eye position
    /// * `lighting` - Sun position, colour, intensity and ambient level
    pub fn update(&mut self, camera_uniform: &CameraUniform, lighting: &Lighting) {
        self.global_bindings
            .update(&self.queue, camera_uniform, lighting);
        self.clear_color = to_wgpu_color(lighting.clear_color);
    }

    /// Renders the scene and then lets `ui_callback` draw on top.
    ///
    /// Meshes are drawn first, then particle points without depth writes.
    /// Lost and outdated surfaces are reconfigured and the frame skipped.
    ///
    /// # Arguments
    /// * `gpu` - Buffers of the current scene, refreshed from `graph`
    /// * `graph` - Scene graph to draw
    /// * `ui_callback` - Records UI draw commands into the same encoder
    ///
    /// # Errors
    /// Any other surface error, such as running out of memory.
    pub fn render_frame_with_ui<F>(
        &mut self,
        gpu: &mut SceneGpu,
        graph: &SceneGraph,
        ui_callback: F,
    ) -> Result<FrameOutcome>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(FrameOutcome::Reconfigured);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface timed out, skipping frame");
                return Ok(FrameOutcome::Skipped);
            }
            Err(err) => return Err(err.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.prepare(&self.device, &self.queue, &self.node_layout, graph);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(MESH_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                gpu.draw_meshes(&mut render_pass);
            }
            if let Some(pipeline) = self.pipeline_manager.get_pipeline(POINTS_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                gpu.draw_points(&mut render_pass);
            }
        }

        ui_callback(
            &self.device,
            &self.queue,
            &mut encoder,
            &surface_texture_view,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(FrameOutcome::Presented)
    }

    /// Resizes the surface and depth buffer; zero sizes (minimised) are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Device used to create every GPU resource
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Colour format the UI renderer must target
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

fn to_wgpu_color([r, g, b]: [f32; 3]) -> wgpu::Color {
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_color_is_opaque() {
        let color = to_wgpu_color(Lighting::robot().clear_color);
        assert_eq!(color.a, 1.0);
        assert!(color.b > color.r);
    }

    #[test]
    fn vsync_maps_to_auto_modes() {
        assert_eq!(present_mode(true), wgpu::PresentMode::AutoVsync);
        assert_eq!(present_mode(false), wgpu::PresentMode::AutoNoVsync);
    }

    #[test]
    fn sky_gradient_offsets_every_axis() {
        let line = SCENE_SHADER
            .lines()
            .find(|line| line.contains("let h = normalize("))
            .expect("sky gradient height");
        assert!(line.contains("vec3<f32>(SKY_OFFSET)"), "{line}");
        assert!(SCENE_SHADER.contains("const SKY_OFFSET: f32 = 33.0;"));
        assert!(SCENE_SHADER.contains("const SKY_EXPONENT: f32 = 0.6;"));
    }
}
