//! Closed-form motion helpers.
//!
//! Every function here maps scene time to a value without carrying state
//! between frames.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Wraps `value` into `[min, max)`
pub fn wrap(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span <= 0.0 {
        return min;
    }
    let wrapped = min + (value - min).rem_euclid(span);
    // rem_euclid may round up to `span` for tiny negative inputs
    if wrapped >= max {
        min
    } else {
        wrapped
    }
}

/// `sin(rate * t + phase) * amplitude`
pub fn oscillate(t: f32, rate: f32, amplitude: f32, phase: f32) -> f32 {
    (rate * t + phase).sin() * amplitude
}

/// Day/night blend factor in [0, 1]; 0.5 at t = 0, night at 1
pub fn day_night_mix(t: f32) -> f32 {
    ((0.06 * t).sin() * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// Family sun intensity in [0, 1]
pub fn family_sun_intensity(t: f32) -> f32 {
    ((0.06 * t).cos() * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// Eye squash used for blinking
pub fn blink_scale(t: f32) -> f32 {
    if (2.0 * t).sin() + 1.0 < 0.1 {
        0.1
    } else {
        1.0
    }
}

pub fn lerp_color(a: [f32; 3], b: [f32; 3], mix: f32) -> [f32; 3] {
    let mix = mix.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * mix,
        a[1] + (b[1] - a[1]) * mix,
        a[2] + (b[2] - a[2]) * mix,
    ]
}

/// Fully saturated colour for hue `h` in [0, 1)
pub fn hue_to_rgb(h: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0) * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    match h as u32 {
        0 => [1.0, x, 0.0],
        1 => [x, 1.0, 0.0],
        2 => [0.0, 1.0, x],
        3 => [0.0, x, 1.0],
        4 => [x, 0.0, 1.0],
        _ => [1.0, 0.0, x],
    }
}

/// Body colour for the robot; changes every `period` seconds and is
/// reproducible for a given seed
pub fn stepped_hue(seed: u64, t: f32, period: f32) -> [f32; 3] {
    let step = (t.max(0.0) / period).floor() as u64;
    let mut rng = StdRng::seed_from_u64(seed ^ step.wrapping_mul(0x9e37_79b9_7f4a_7c15));
    hue_to_rgb(rng.random::<f32>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_stays_in_bounds() {
        let mut t = -500.0;
        while t < 500.0 {
            let x = wrap(20.0 + 6.0 * t, -30.0, 30.0);
            assert!((-30.0..30.0).contains(&x), "t={t} x={x}");
            t += 0.37;
        }
        assert_eq!(wrap(30.0, -30.0, 30.0), -30.0);
        assert_eq!(wrap(-30.0, -30.0, 30.0), -30.0);
        assert!(wrap(-1e-8, 0.0, 60.0) < 60.0);
    }

    #[test]
    fn wrap_is_identity_inside_range() {
        assert_eq!(wrap(12.5, -50.0, 50.0), 12.5);
    }

    #[test]
    fn day_night_mix_is_bounded() {
        for i in 0..10_000 {
            let t = i as f32 * 0.731;
            let mix = day_night_mix(t);
            assert!((0.0..=1.0).contains(&mix));
            assert!((0.0..=1.0).contains(&family_sun_intensity(t)));
        }
    }

    #[test]
    fn phase_zero_at_start() {
        assert_eq!(oscillate(0.0, 5.0, 0.5, 0.0), 0.0);
        assert_eq!(day_night_mix(0.0), 0.5);
        assert_eq!(family_sun_intensity(0.0), 1.0);
        assert_eq!(blink_scale(0.0), 1.0);
    }

    #[test]
    fn blink_happens_near_trough() {
        // sin(2t) = -1 at t = 3π/4
        assert_eq!(blink_scale(3.0 * std::f32::consts::FRAC_PI_4), 0.1);
    }

    #[test]
    fn hue_is_stable_within_a_period() {
        assert_eq!(stepped_hue(7, 0.1, 3.0), stepped_hue(7, 2.9, 3.0));
        assert_eq!(stepped_hue(7, 4.0, 3.0), stepped_hue(7, 4.0, 3.0));
    }

    #[test]
    fn lerp_color_endpoints() {
        let a = [1.0, 0.0, 0.0];
        let b = [0.0, 0.0, 1.0];
        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
    }
}
