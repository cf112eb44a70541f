//! Per-frame scene animation.
//!
//! Every transform written here is a function of the scene clock and the
//! current flags. Nothing accumulates between frames, so the result for a
//! given `t` does not depend on the frame rate or on earlier frames.

use std::f32::consts::FRAC_PI_2;

use super::{
    easing::Easing,
    motion::{
        blink_scale, day_night_mix, family_sun_intensity, lerp_color, oscillate, stepped_hue, wrap,
    },
    tween::Tween,
};
use crate::scene::{
    family::FamilyScene,
    figure::Figure,
    flags::SceneFlags,
    graph::{rgb, SceneGraph},
    lighting::Lighting,
    props::{CAR_SPAN, CLOUD_SPAN, RAIN_SPAN},
    robot::RobotScene,
};

const DAY_SKY: u32 = 0x87ceeb;
const NIGHT_SKY: u32 = 0x000033;
const ROBOT_START_COLOR: u32 = 0xffff00;

/// Inputs read by the updater each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Seconds since the scene was built
    pub t: f32,
    pub flags: SceneFlags,
    /// Pointer in normalized device coordinates, both axes in [-1, 1]
    pub pointer: [f32; 2],
    pub seed: u64,
}

pub struct FrameUpdater {
    head_sway: Tween,
    left_arm_swing: Tween,
    right_arm_swing: Tween,
}

impl Default for FrameUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameUpdater {
    pub fn new() -> Self {
        let swing = |to, duration| {
            Tween::new(0.0, to, duration)
                .with_easing(Easing::Power1InOut)
                .yoyo()
        };
        Self {
            head_sway: swing(std::f32::consts::FRAC_PI_6, 2.0),
            left_arm_swing: swing(std::f32::consts::FRAC_PI_4, 1.5),
            right_arm_swing: swing(-std::f32::consts::FRAC_PI_4, 1.5),
        }
    }

    pub fn update_family(
        &self,
        graph: &mut SceneGraph,
        scene: &FamilyScene,
        state: &FrameState,
        lighting: &mut Lighting,
    ) {
        let t = state.t;
        let flags = &state.flags;

        for (figure, landing) in scene.figures.iter().zip(&scene.landings) {
            let mut y = landing.sample(t);
            if flags.is_hovering {
                y += oscillate(t, 2.0, 0.1, 0.0) + 1.0;
            }
            let root = graph.transform_mut(figure.root);
            root.position.x = figure.home.x;
            root.position.y = y;
            root.position.z = figure.home.z;
            root.rotation.z = if flags.is_dancing {
                oscillate(t, 10.0, 0.1, 0.0)
            } else {
                0.0
            };

            graph.transform_mut(figure.head).rotation.y = self.head_sway.sample(t);
            graph.transform_mut(figure.left_arm).rotation.x = self.left_arm_swing.sample(t);
            graph.transform_mut(figure.right_arm).rotation.x = self.right_arm_swing.sample(t);
            swing_legs(graph, figure, flags, t);
        }

        for (i, cloud) in scene.clouds.iter().enumerate() {
            let phase = i as f32;
            let position = &mut graph.transform_mut(cloud.node).position;
            position.x = wrap(
                cloud.base.x + 0.6 * t + oscillate(t, 1.0, 1.2, phase),
                CLOUD_SPAN.0,
                CLOUD_SPAN.1,
            );
            position.y = cloud.base.y + oscillate(t, 2.0, 0.5, phase);
        }

        for car in &scene.cars {
            graph.transform_mut(car.node).position.x =
                wrap(car.base_x + car.direction * 6.0 * t, CAR_SPAN.0, CAR_SPAN.1);
        }

        if let Some(rain) = graph.particles_mut().get_mut(scene.rain) {
            for ((position, base), speed) in rain
                .positions
                .iter_mut()
                .zip(&rain.base)
                .zip(&rain.fall_speed)
            {
                position[1] = wrap(base[1] - speed * t, RAIN_SPAN.0, RAIN_SPAN.1);
            }
        }

        let mix = day_night_mix(t);
        graph.set_color(scene.sky, lerp_color(rgb(DAY_SKY), rgb(NIGHT_SKY), mix));
        lighting.sun_intensity = family_sun_intensity(t);
    }

    pub fn update_robot(
        &self,
        graph: &mut SceneGraph,
        scene: &RobotScene,
        state: &FrameState,
        lighting: &mut Lighting,
    ) {
        let t = state.t;
        let flags = &state.flags;
        let robot = &scene.robot;

        let root = graph.transform_mut(robot.root);
        root.rotation.y = 0.6 * t;
        root.rotation.z = if flags.is_dancing {
            oscillate(t, 10.0, 0.1, 0.0)
        } else {
            0.0
        };
        root.position.y = robot.home.y
            + oscillate(t, 2.0, 0.1, 0.0)
            + if flags.is_hovering { 1.0 } else { 0.0 };

        let [px, py] = state.pointer;
        graph.transform_mut(robot.head).rotation.y = px.atan2(py) * 0.5;

        let arm = if flags.is_dancing {
            oscillate(t, 10.0, 0.5, 0.0)
        } else {
            oscillate(t, 1.0, 0.2, 0.0)
        };
        graph.transform_mut(robot.left_arm).rotation.z = FRAC_PI_2 + arm;
        graph.transform_mut(robot.right_arm).rotation.z = FRAC_PI_2 - arm;

        let blink = blink_scale(t);
        for eye in robot.eyes {
            graph.transform_mut(eye).scale.y = blink;
        }

        swing_legs(graph, robot, flags, t);

        if let Some(jetpack) = robot.jetpack {
            graph.set_visible(jetpack, flags.is_hovering);
        }

        let body_color = if t < 3.0 {
            rgb(ROBOT_START_COLOR)
        } else {
            stepped_hue(state.seed, t, 3.0)
        };
        graph.set_color(robot.body, body_color);

        let dust = graph.transform_mut(scene.dust_anchor);
        dust.rotation.y = 0.06 * t;
        dust.position.y = oscillate(t, 0.5, 0.2, 0.0);

        let orbit = 0.1 * t;
        lighting.sun_position = [orbit.cos() * 10.0, orbit.sin() * 10.0, 0.0];
        lighting.sun_intensity = orbit.sin().max(0.1);
    }
}

fn swing_legs(graph: &mut SceneGraph, figure: &Figure, flags: &SceneFlags, t: f32) {
    let swing = if flags.is_walking {
        oscillate(t, 5.0, 0.5, 0.0)
    } else {
        0.0
    };
    graph.transform_mut(figure.left_leg).rotation.x = swing;
    graph.transform_mut(figure.right_leg).rotation.x = -swing;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{
        family::{build_family, FamilyOptions},
        robot::build_robot,
    };

    fn options() -> FamilyOptions {
        FamilyOptions {
            rain_drops: 200,
            grass_blades: 10,
            flowers: 3,
        }
    }

    fn all_on() -> SceneFlags {
        SceneFlags {
            has_son: true,
            has_daughter: true,
            has_wife: true,
            is_walking: true,
            is_dancing: true,
            is_hovering: false,
        }
    }

    fn state(t: f32, flags: SceneFlags) -> FrameState {
        FrameState {
            t,
            flags,
            pointer: [0.0, 0.0],
            seed: 5,
        }
    }

    #[test]
    fn family_props_stay_inside_wrap_bounds() {
        let mut graph = SceneGraph::new();
        let scene = build_family(&mut graph, &all_on(), 5, &options());
        let updater = FrameUpdater::new();
        let mut lighting = Lighting::family();

        let mut t = 0.0;
        while t < 600.0 {
            updater.update_family(&mut graph, &scene, &state(t, all_on()), &mut lighting);
            for cloud in &scene.clouds {
                let x = graph.transform(cloud.node).position.x;
                assert!((CLOUD_SPAN.0..CLOUD_SPAN.1).contains(&x), "cloud x={x} t={t}");
            }
            for car in &scene.cars {
                let x = graph.transform(car.node).position.x;
                assert!((CAR_SPAN.0..CAR_SPAN.1).contains(&x), "car x={x} t={t}");
            }
            let rain = &graph.particles()[scene.rain];
            assert!(rain
                .positions
                .iter()
                .all(|p| (RAIN_SPAN.0..RAIN_SPAN.1).contains(&p[1])));
            assert!((0.0..=1.0).contains(&lighting.sun_intensity));
            t += 1.7;
        }
    }

    #[test]
    fn family_phase_zero_at_start() {
        let mut graph = SceneGraph::new();
        let scene = build_family(&mut graph, &all_on(), 5, &options());
        let updater = FrameUpdater::new();
        let mut lighting = Lighting::family();
        updater.update_family(&mut graph, &scene, &state(0.0, all_on()), &mut lighting);

        for figure in &scene.figures {
            assert_eq!(graph.transform(figure.root).rotation.z, 0.0);
            assert_eq!(graph.transform(figure.head).rotation.y, 0.0);
            assert_eq!(graph.transform(figure.left_arm).rotation.x, 0.0);
            assert_eq!(graph.transform(figure.left_leg).rotation.x, 0.0);
        }
        for (i, cloud) in scene.clouds.iter().enumerate() {
            let y = graph.transform(cloud.node).position.y;
            assert_eq!(y, cloud.base.y + (i as f32).sin() * 0.5);
        }
        assert_eq!(lighting.sun_intensity, 1.0);
    }

    #[test]
    fn figures_land_on_their_homes() {
        let mut graph = SceneGraph::new();
        let flags = SceneFlags::default();
        let scene = build_family(&mut graph, &flags, 5, &options());
        let updater = FrameUpdater::new();
        let mut lighting = Lighting::family();
        updater.update_family(&mut graph, &scene, &state(10.0, flags), &mut lighting);
        let father = &scene.figures[0];
        assert_eq!(graph.transform(father.root).position, father.home);
    }

    #[test]
    fn family_flags_drive_figures_after_landing() {
        let mut graph = SceneGraph::new();
        let idle = SceneFlags::default();
        let scene = build_family(&mut graph, &idle, 5, &options());
        let updater = FrameUpdater::new();
        let mut lighting = Lighting::family();
        let t = 10.0;
        let father = &scene.figures[0];

        updater.update_family(&mut graph, &scene, &state(t, idle), &mut lighting);
        assert_eq!(graph.transform(father.root).position.y, father.home.y);
        assert_eq!(graph.transform(father.root).rotation.z, 0.0);
        assert_eq!(graph.transform(father.left_leg).rotation.x, 0.0);

        let walking = SceneFlags {
            is_walking: true,
            ..idle
        };
        updater.update_family(&mut graph, &scene, &state(t, walking), &mut lighting);
        let swing = oscillate(t, 5.0, 0.5, 0.0);
        assert_ne!(swing, 0.0);
        assert_eq!(graph.transform(father.left_leg).rotation.x, swing);
        assert_eq!(graph.transform(father.right_leg).rotation.x, -swing);

        let dancing = SceneFlags {
            is_dancing: true,
            ..idle
        };
        updater.update_family(&mut graph, &scene, &state(t, dancing), &mut lighting);
        let sway = oscillate(t, 10.0, 0.1, 0.0);
        assert_ne!(sway, 0.0);
        assert_eq!(graph.transform(father.root).rotation.z, sway);
        assert_eq!(graph.transform(father.left_leg).rotation.x, 0.0);

        let hovering = SceneFlags {
            is_hovering: true,
            ..idle
        };
        updater.update_family(&mut graph, &scene, &state(t, hovering), &mut lighting);
        let lift = oscillate(t, 2.0, 0.1, 0.0) + 1.0;
        let y = graph.transform(father.root).position.y;
        assert!((y - (father.home.y + lift)).abs() < 1e-5, "hover y={y}");
        assert_eq!(graph.transform(father.root).rotation.z, 0.0);
    }

    #[test]
    fn fireflies_keep_their_positions() {
        let mut graph = SceneGraph::new();
        let scene = build_family(&mut graph, &all_on(), 5, &options());
        let updater = FrameUpdater::new();
        let mut lighting = Lighting::family();
        let before = graph.particles()[scene.fireflies].positions.clone();
        assert!(!before.is_empty());

        for t in [0.5, 12.0, 300.0] {
            updater.update_family(&mut graph, &scene, &state(t, all_on()), &mut lighting);
        }
        assert_eq!(graph.particles()[scene.fireflies].positions, before);
    }

    #[test]
    fn sky_blends_from_day_to_night() {
        let mut graph = SceneGraph::new();
        let flags = SceneFlags::default();
        let scene = build_family(&mut graph, &flags, 5, &options());
        let updater = FrameUpdater::new();
        let mut lighting = Lighting::family();
        let sky_color = |graph: &SceneGraph| {
            graph
                .node(scene.sky)
                .drawable
                .as_ref()
                .map(|d| d.material.color)
                .expect("sky is drawable")
        };

        for t in [0.0, 5.0, 40.0, 90.0] {
            updater.update_family(&mut graph, &scene, &state(t, flags), &mut lighting);
            let expected = lerp_color(rgb(DAY_SKY), rgb(NIGHT_SKY), day_night_mix(t));
            assert_eq!(sky_color(&graph), expected, "t={t}");
        }

        // sin(0.06 t) = -1 gives full day, +1 full night
        let day = 1.5 * std::f32::consts::PI / 0.06;
        updater.update_family(&mut graph, &scene, &state(day, flags), &mut lighting);
        let close = |a: [f32; 3], b: [f32; 3]| a.iter().zip(&b).all(|(x, y)| (x - y).abs() < 1e-4);
        assert!(close(sky_color(&graph), rgb(DAY_SKY)));

        let night = 0.5 * std::f32::consts::PI / 0.06;
        updater.update_family(&mut graph, &scene, &state(night, flags), &mut lighting);
        assert!(close(sky_color(&graph), rgb(NIGHT_SKY)));
    }

    #[test]
    fn robot_dance_swings_arms_wider_than_idle() {
        let mut graph = SceneGraph::new();
        let scene = build_robot(&mut graph, 5);
        let updater = FrameUpdater::new();
        let mut lighting = Lighting::robot();
        let robot = &scene.robot;
        let t = 4.2;

        let dancing = SceneFlags {
            is_dancing: true,
            ..Default::default()
        };
        updater.update_robot(&mut graph, &scene, &state(t, dancing), &mut lighting);
        let arm = oscillate(t, 10.0, 0.5, 0.0);
        assert_eq!(graph.transform(robot.root).rotation.z, oscillate(t, 10.0, 0.1, 0.0));
        assert_eq!(graph.transform(robot.left_arm).rotation.z, FRAC_PI_2 + arm);
        assert_eq!(graph.transform(robot.right_arm).rotation.z, FRAC_PI_2 - arm);
        assert_eq!(graph.transform(robot.root).rotation.y, 0.6 * t);

        updater.update_robot(&mut graph, &scene, &state(t, SceneFlags::default()), &mut lighting);
        assert_eq!(graph.transform(robot.root).rotation.z, 0.0);
        let idle_arm = oscillate(t, 1.0, 0.2, 0.0);
        assert_eq!(graph.transform(robot.left_arm).rotation.z, FRAC_PI_2 + idle_arm);
        let jetpack = robot.jetpack.expect("robot has a jetpack");
        assert!(!graph.node(jetpack).visible);
    }

    #[test]
    fn robot_phase_zero_and_hover() {
        let mut graph = SceneGraph::new();
        let scene = build_robot(&mut graph, 5);
        let updater = FrameUpdater::new();
        let mut lighting = Lighting::robot();

        updater.update_robot(&mut graph, &scene, &state(0.0, all_on()), &mut lighting);
        let robot = &scene.robot;
        assert_eq!(graph.transform(robot.root).rotation.y, 0.0);
        assert_eq!(graph.transform(robot.root).position.y, 0.0);
        assert_eq!(graph.transform(robot.left_arm).rotation.z, FRAC_PI_2);
        assert_eq!(graph.transform(robot.eyes[0]).scale.y, 1.0);
        assert_eq!(graph.transform(robot.head).rotation.y, 0.0);
        assert_eq!(lighting.sun_intensity, 0.1);

        let hovering = SceneFlags {
            is_hovering: true,
            ..Default::default()
        };
        updater.update_robot(&mut graph, &scene, &state(0.0, hovering), &mut lighting);
        assert_eq!(graph.transform(robot.root).position.y, 1.0);
        let jetpack = robot.jetpack.expect("robot has a jetpack");
        assert!(graph.node(jetpack).visible);
    }

    #[test]
    fn robot_legs_rest_when_not_walking() {
        let mut graph = SceneGraph::new();
        let scene = build_robot(&mut graph, 5);
        let updater = FrameUpdater::new();
        let mut lighting = Lighting::robot();
        let walking = SceneFlags {
            is_walking: true,
            ..Default::default()
        };
        updater.update_robot(&mut graph, &scene, &state(0.3, walking), &mut lighting);
        assert_ne!(graph.transform(scene.robot.left_leg).rotation.x, 0.0);
        updater.update_robot(&mut graph, &scene, &state(0.3, SceneFlags::default()), &mut lighting);
        assert_eq!(graph.transform(scene.robot.left_leg).rotation.x, 0.0);
    }
}
