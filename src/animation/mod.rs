//! Scene animation: easing curves, tweens, closed-form motion and the
//! per-frame updater that applies them to a scene graph.

pub mod easing;
pub mod flight;
pub mod motion;
pub mod tween;
pub mod updater;

pub use easing::Easing;
pub use flight::CameraFlight;
pub use tween::{Repeat, Tween};
pub use updater::{FrameState, FrameUpdater};
