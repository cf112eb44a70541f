use cgmath::Vector3;

use super::{easing::Easing, tween::Tween};

/// Where the camera parks relative to a selected figure
pub const VIEW_OFFSET: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 2.0,
    z: 5.0,
};

/// Eased camera move towards a selected subject.
///
/// The look-at target snaps to the subject at once; only the eye travels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFlight {
    pub from: Vector3<f32>,
    pub to: Vector3<f32>,
    pub target: Vector3<f32>,
    progress: Tween,
}

impl CameraFlight {
    pub fn toward(eye: Vector3<f32>, subject: Vector3<f32>, now: f32) -> Self {
        Self {
            from: eye,
            to: subject + VIEW_OFFSET,
            target: subject,
            progress: Tween::new(0.0, 1.0, 2.0)
                .with_delay(now)
                .with_easing(Easing::Power1Out),
        }
    }

    /// Eye position at scene time `now`
    pub fn eye_at(&self, now: f32) -> Vector3<f32> {
        let k = self.progress.sample(now);
        self.from * (1.0 - k) + self.to * k
    }

    pub fn is_finished(&self, now: f32) -> bool {
        self.progress.is_finished(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flies_from_eye_to_offset_over_two_seconds() {
        let eye = Vector3::new(0.0, 10.0, 20.0);
        let subject = Vector3::new(3.0, 0.0, 0.0);
        let flight = CameraFlight::toward(eye, subject, 4.0);

        assert_eq!(flight.eye_at(4.0), eye);
        assert!(!flight.is_finished(5.0));
        assert!(flight.is_finished(6.0));
        assert_eq!(flight.eye_at(6.0), Vector3::new(3.0, 2.0, 5.0));
        assert_eq!(flight.target, subject);
    }
}
