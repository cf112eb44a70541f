//! # Graphics
//!
//! Everything between the scene graph and the screen.
//!
//! - **Camera** ([`camera`]): orbit camera with damped drag controls
//! - **Geometry** ([`geometry`]): procedural meshes for every prop and figure
//! - **Picking** ([`picking`]): ray casts from the cursor against figure bounds
//! - **Rendering** ([`rendering`]): surface, pipelines and per-scene GPU buffers
//! - **Resources** ([`resources`]): shared uniforms and the depth buffer

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod vertex;

pub use camera::OrbitCamera;
pub use rendering::{RenderEngine, SceneGpu};
