// src/lib.rs
//! Hearth
//!
//! Two decorative 3D scenes, a cartoon family outside their house and a
//! dancing robot, built from primitive meshes and driven by a handful of
//! boolean flags. Rendering uses wgpu and winit with a Dear ImGui panel.
//!
//! ```no_run
//! use hearth::{AppConfig, HearthApp};
//!
//! let config = AppConfig::default();
//! HearthApp::new(config)?.run()?;
//! # Ok::<(), hearth::HearthError>(())
//! ```

pub mod animation;
pub mod app;
pub mod assets;
pub mod config;
pub mod error;
pub mod gfx;
pub mod scene;
pub mod time;
pub mod ui;
pub mod wgpu_utils;

pub use app::HearthApp;
pub use config::{AppConfig, Cli};
pub use error::HearthError;
pub use scene::{SceneFlags, SceneKind};
