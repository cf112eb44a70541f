// src/wgpu_utils/mod.rs
//! Small wrappers over raw wgpu buffers and binding types.

pub mod binding_types;
pub mod uniform_buffer;

pub use uniform_buffer::{aligned_stride, SlotBuffer, UniformBuffer};
