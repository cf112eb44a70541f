// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, per-scene GPU buffers, and frame rendering.

pub mod pipeline_manager;
pub mod render_engine;
pub mod scene_gpu;

pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{FrameOutcome, RenderEngine};
pub use scene_gpu::SceneGpu;
