//! Time-sampled tweens.
//!
//! A tween is a pure function of elapsed scene time, so it has no state to
//! advance and can be sampled in any order.

use super::easing::Easing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    /// Play once and hold the end value
    #[default]
    Once,
    /// Play forward then backward forever
    YoyoForever,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    /// Seconds for one forward pass; must be positive
    pub duration: f32,
    pub delay: f32,
    pub easing: Easing,
    pub repeat: Repeat,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(f32::EPSILON),
            delay: 0.0,
            easing: Easing::Linear,
            repeat: Repeat::Once,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn yoyo(mut self) -> Self {
        self.repeat = Repeat::YoyoForever;
        self
    }

    /// Value at `t` seconds since the tween was created
    pub fn sample(&self, t: f32) -> f32 {
        let eased = self.easing.apply(self.progress(t));
        self.from * (1.0 - eased) + self.to * eased
    }

    /// Linear progress through the current pass in [0, 1]
    pub fn progress(&self, t: f32) -> f32 {
        let local = (t - self.delay).max(0.0) / self.duration;
        match self.repeat {
            Repeat::Once => local.min(1.0),
            Repeat::YoyoForever => {
                let phase = local.rem_euclid(2.0);
                if phase <= 1.0 {
                    phase
                } else {
                    2.0 - phase
                }
            }
        }
    }

    pub fn is_finished(&self, t: f32) -> bool {
        self.repeat == Repeat::Once && t >= self.delay + self.duration
    }
}
