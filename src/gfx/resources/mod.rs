// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Uniform layouts shared by every pipeline and the depth buffer.

pub mod global_bindings;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUniform, NodeBindings, NodeUniform};
pub use texture_resource::TextureResource;
