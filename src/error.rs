use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the library. The binary wraps these in `anyhow`.
#[derive(Debug, Error)]
pub enum HearthError {
    #[error("failed to create window surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface does not support the selected adapter")]
    UnsupportedSurface,

    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to read asset {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load model {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("asset load for {0} was abandoned")]
    Cancelled(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = HearthError> = std::result::Result<T, E>;
