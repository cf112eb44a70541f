//! # Scenes
//!
//! The family scene (house, garden, road, weather and one to four figures)
//! and the robot scene (one robot on a dusty plain) are both plain
//! [`SceneGraph`]s built once per [`SceneContext`] and animated in place by
//! the frame updater.

pub mod context;
pub mod family;
pub mod figure;
pub mod flags;
pub mod graph;
pub mod lighting;
pub mod props;
pub mod robot;

pub use context::{ContextOptions, SceneContext};
pub use figure::FigureRole;
pub use flags::{InputAction, SceneFlags, SceneKind};
pub use graph::SceneGraph;
