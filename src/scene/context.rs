//! Scene lifecycle.
//!
//! A [`SceneContext`] owns everything built for one scene: the graph, the
//! GPU buffers mirroring it, pending asset loads, the scene clock and the
//! current selection. Changing the figure set destroys the context and
//! builds a new one; animation flags are read each frame instead.

use std::{path::PathBuf, time::Instant};

use cgmath::Vector3;
use log::{debug, info};

use super::{
    family::{build_family, FamilyOptions, FamilyScene},
    figure::{Figure, FigureRole},
    flags::{FigureSet, SceneFlags, SceneKind},
    graph::{Material, NodeId, SceneGraph, Transform},
    lighting::{CameraPreset, Lighting},
    robot::{build_robot, RobotScene},
};
use crate::{
    animation::{CameraFlight, FrameState, FrameUpdater},
    assets::{Asset, AssetLoader, AudioCue, AudioSink, AMBIENT_CUES, INTERACTION},
    config::AppConfig,
    gfx::{camera::OrbitCamera, picking::ObjectPicker, rendering::SceneGpu},
    time::{FrameClock, FrameTime},
};

/// Length of a dance burst triggered from the keyboard
pub const DANCE_BURST: f32 = 5.0;

/// Where an imported model is placed in the family scene
const MODEL_POSITION: [f32; 3] = [-5.0, 0.0, -8.0];

/// Build parameters that survive rebuilds
#[derive(Debug, Clone, PartialEq)]
pub struct ContextOptions {
    pub kind: SceneKind,
    pub seed: u64,
    pub family: FamilyOptions,
    pub audio_dir: PathBuf,
    pub model: Option<PathBuf>,
}

impl From<&AppConfig> for ContextOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            kind: config.scene,
            seed: config.seed,
            family: FamilyOptions {
                rain_drops: config.rain_drops,
                ..FamilyOptions::default()
            },
            audio_dir: config.audio_dir.clone(),
            model: config.model.clone(),
        }
    }
}

#[derive(Debug)]
pub enum SceneContent {
    Family(FamilyScene),
    Robot(RobotScene),
}

pub struct SceneContext {
    options: ContextOptions,
    generation: u64,
    figure_set: FigureSet,
    graph: SceneGraph,
    content: SceneContent,
    lighting: Lighting,
    clock: FrameClock,
    time: FrameTime,
    loader: AssetLoader,
    gpu: Option<SceneGpu>,
    picker: ObjectPicker,
    interaction_cue: Option<(AudioCue, Vec<u8>)>,
    dance_until: Option<f32>,
    selected: Option<usize>,
    flight: Option<CameraFlight>,
}

impl SceneContext {
    pub fn create(options: ContextOptions, flags: &SceneFlags, generation: u64) -> Self {
        Self::create_at(options, flags, generation, Instant::now())
    }

    /// Builds a scene whose clock starts at `start`
    pub fn create_at(
        options: ContextOptions,
        flags: &SceneFlags,
        generation: u64,
        start: Instant,
    ) -> Self {
        let mut graph = SceneGraph::new();
        let mut loader = AssetLoader::new();

        let (content, lighting) = match options.kind {
            SceneKind::Family => {
                let scene = build_family(&mut graph, flags, options.seed, &options.family);
                for cue in AMBIENT_CUES {
                    loader.request_audio(&options.audio_dir, cue);
                }
                if let Some(model) = &options.model {
                    loader.request_model(model);
                }
                (SceneContent::Family(scene), Lighting::family())
            }
            SceneKind::Robot => (
                SceneContent::Robot(build_robot(&mut graph, options.seed)),
                Lighting::robot(),
            ),
        };

        info!(
            "Created {} scene (generation {generation}): {} nodes, {} meshes",
            options.kind.label(),
            graph.len(),
            graph.meshes().len()
        );

        Self {
            options,
            generation,
            figure_set: flags.figure_set(),
            graph,
            content,
            lighting,
            clock: FrameClock::starting_at(start),
            time: FrameTime::default(),
            loader,
            gpu: None,
            picker: ObjectPicker::new(),
            interaction_cue: None,
            dance_until: None,
            selected: None,
            flight: None,
        }
    }

    /// Releases GPU buffers and abandons pending loads; returns the generation
    pub fn destroy(mut self) -> u64 {
        self.loader.cancel_all();
        if let Some(gpu) = self.gpu.take() {
            gpu.destroy();
        }
        debug!(
            "Destroyed {} scene (generation {})",
            self.options.kind.label(),
            self.generation
        );
        self.generation
    }

    /// Destroys this context and builds its replacement
    pub fn rebuild(self, flags: &SceneFlags) -> Self {
        let options = self.options.clone();
        let generation = self.destroy();
        Self::create(options, flags, generation + 1)
    }

    /// Same as [`rebuild`](Self::rebuild) with another scene kind
    pub fn switch_to(self, kind: SceneKind, flags: &SceneFlags) -> Self {
        let mut options = self.options.clone();
        options.kind = kind;
        let generation = self.destroy();
        Self::create(options, flags, generation + 1)
    }

    /// True when `flags` select a different set of figures than were built
    pub fn needs_rebuild(&self, flags: &SceneFlags) -> bool {
        self.options.kind == SceneKind::Family && flags.figure_set() != self.figure_set
    }

    pub fn kind(&self) -> SceneKind {
        self.options.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn content(&self) -> &SceneContent {
        &self.content
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    /// Seconds since this context was created, as of the last tick
    pub fn elapsed(&self) -> f32 {
        self.time.elapsed
    }

    pub fn camera_preset(&self) -> CameraPreset {
        match self.options.kind {
            SceneKind::Family => CameraPreset::family(),
            SceneKind::Robot => CameraPreset::robot(),
        }
    }

    pub fn figures(&self) -> &[Figure] {
        match &self.content {
            SceneContent::Family(scene) => &scene.figures,
            SceneContent::Robot(scene) => std::slice::from_ref(&scene.robot),
        }
    }

    pub fn selected_role(&self) -> Option<FigureRole> {
        self.selected
            .and_then(|i| self.figures().get(i))
            .map(|f| f.role)
    }

    pub fn loading_progress(&self) -> f32 {
        self.loader.progress()
    }

    pub fn tick(&mut self) -> FrameTime {
        self.time = self.clock.tick();
        self.time
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        self.time = self.clock.tick_at(now);
        self.time
    }

    pub fn start_dance_burst(&mut self) {
        self.dance_until = Some(self.time.elapsed + DANCE_BURST);
    }

    /// Flags as the updater should see them, with any running dance burst applied
    pub fn effective_flags(&self, flags: &SceneFlags) -> SceneFlags {
        let bursting = self.dance_until.is_some_and(|end| self.time.elapsed < end);
        SceneFlags {
            is_dancing: flags.is_dancing || bursting,
            ..*flags
        }
    }

    /// Runs the frame updater for the current clock
    pub fn animate(&mut self, updater: &FrameUpdater, flags: &SceneFlags, pointer: [f32; 2]) {
        let state = FrameState {
            t: self.time.elapsed,
            flags: self.effective_flags(flags),
            pointer,
            seed: self.options.seed,
        };
        match &self.content {
            SceneContent::Family(scene) => {
                updater.update_family(&mut self.graph, scene, &state, &mut self.lighting)
            }
            SceneContent::Robot(scene) => {
                updater.update_robot(&mut self.graph, scene, &state, &mut self.lighting)
            }
        }
    }

    /// Drains finished asset loads into the scene and the audio sink
    pub fn poll_assets(&mut self, sink: &mut dyn AudioSink) {
        for asset in self.loader.poll() {
            match asset {
                Asset::Audio { cue, bytes } if cue == INTERACTION => {
                    self.interaction_cue = Some((cue, bytes));
                }
                Asset::Audio { cue, bytes } => sink.play(&cue, &bytes),
                Asset::Model(model) => {
                    let root = self.content_root();
                    let mesh = self.graph.add_mesh(model.geometry);
                    let [x, y, z] = MODEL_POSITION;
                    let material = Material {
                        color: model.base_color,
                        ..Material::lit(0xffffff)
                    };
                    self.graph
                        .add_mesh_node(Some(root), mesh, material, Transform::at(x, y, z));
                    info!("Placed model {} in the scene", model.name);
                }
            }
        }
    }

    fn content_root(&self) -> NodeId {
        match &self.content {
            SceneContent::Family(scene) => scene.root,
            SceneContent::Robot(scene) => scene.root,
        }
    }

    /// Casts a ray under the cursor and starts a camera flight to the figure hit
    pub fn select_at(
        &mut self,
        cursor: (f32, f32),
        screen: (f32, f32),
        camera: &OrbitCamera,
    ) -> Option<FigureRole> {
        let roots: Vec<NodeId> = self.figures().iter().map(|f| f.root).collect();
        let hit = self
            .picker
            .pick(cursor, screen, camera, &self.graph, &roots)?;

        let figure = &self.figures()[hit.index];
        let role = figure.role;
        let world = self.graph.world_nodes();
        let subject = world[figure.root.index()].matrix.w.truncate();

        info!("Selected {} at {:?}", role.label(), subject);
        self.selected = Some(hit.index);
        self.flight = Some(CameraFlight::toward(camera.eye, subject, self.time.elapsed));
        Some(role)
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    /// Moves the camera along the active flight. The interaction cue plays on arrival.
    pub fn steer_camera(&mut self, camera: &mut OrbitCamera, sink: &mut dyn AudioSink) {
        let Some(flight) = self.flight else {
            return;
        };
        let now = self.time.elapsed;
        camera.look_from(flight.eye_at(now), flight.target);

        if flight.is_finished(now) {
            self.flight = None;
            match &self.interaction_cue {
                Some((cue, bytes)) => sink.play(cue, bytes),
                None => debug!("Interaction cue not loaded yet"),
            }
        }
    }

    pub fn attach_gpu(&mut self, gpu: SceneGpu) {
        if let Some(old) = self.gpu.replace(gpu) {
            old.destroy();
        }
    }

    /// Split borrow of the GPU mirror alongside the data it renders
    pub fn render_parts(&mut self) -> Option<(&mut SceneGpu, &SceneGraph, &Lighting)> {
        let gpu = self.gpu.as_mut()?;
        Some((gpu, &self.graph, &self.lighting))
    }

    /// World position of a figure's root
    pub fn figure_position(&self, index: usize) -> Option<Vector3<f32>> {
        let figure = self.figures().get(index)?;
        let world = self.graph.world_nodes();
        Some(world[figure.root.index()].matrix.w.truncate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::OrbitCamera;
    use cgmath::InnerSpace;
    use std::time::Duration;

    fn options(kind: SceneKind) -> ContextOptions {
        ContextOptions {
            kind,
            seed: 11,
            family: FamilyOptions {
                rain_drops: 50,
                grass_blades: 10,
                flowers: 2,
            },
            audio_dir: PathBuf::from("/no/such/audio"),
            model: None,
        }
    }

    #[derive(Default)]
    struct RecordingSink(Vec<&'static str>);

    impl AudioSink for RecordingSink {
        fn play(&mut self, cue: &AudioCue, _bytes: &[u8]) {
            self.0.push(cue.file);
        }
    }

    #[test]
    fn rebuild_bumps_generation_and_resets_clock() {
        let start = Instant::now();
        let flags = SceneFlags::default();
        let mut context = SceneContext::create_at(options(SceneKind::Family), &flags, 0, start);
        context.tick_at(start + Duration::from_secs(30));
        assert!(context.elapsed() > 29.0);

        let with_son = SceneFlags {
            has_son: true,
            ..flags
        };
        assert!(context.needs_rebuild(&with_son));
        let context = context.rebuild(&with_son);
        assert_eq!(context.generation(), 1);
        assert_eq!(context.elapsed(), 0.0);
        assert_eq!(context.figures().len(), 2);
        assert!(!context.needs_rebuild(&with_son));
    }

    #[test]
    fn animation_flags_never_rebuild() {
        let flags = SceneFlags::default();
        let context = SceneContext::create(options(SceneKind::Family), &flags, 0);
        let moving = SceneFlags {
            is_walking: true,
            is_dancing: true,
            is_hovering: true,
            ..flags
        };
        assert!(!context.needs_rebuild(&moving));
    }

    #[test]
    fn dance_burst_expires() {
        let start = Instant::now();
        let flags = SceneFlags::default();
        let mut context = SceneContext::create_at(options(SceneKind::Robot), &flags, 0, start);
        context.tick_at(start + Duration::from_secs(1));
        context.start_dance_burst();
        assert!(context.effective_flags(&flags).is_dancing);
        context.tick_at(start + Duration::from_secs(7));
        assert!(!context.effective_flags(&flags).is_dancing);
    }

    #[test]
    fn switching_scene_changes_kind() {
        let flags = SceneFlags::default();
        let context = SceneContext::create(options(SceneKind::Family), &flags, 4);
        let context = context.switch_to(SceneKind::Robot, &flags);
        assert_eq!(context.kind(), SceneKind::Robot);
        assert_eq!(context.generation(), 5);
        assert_eq!(context.figures().len(), 1);
    }

    #[test]
    fn clicking_a_figure_flies_the_camera_there() {
        let start = Instant::now();
        let flags = SceneFlags::default();
        let mut context = SceneContext::create_at(options(SceneKind::Family), &flags, 0, start);
        let updater = FrameUpdater::new();
        // Let the father land
        context.tick_at(start + Duration::from_secs(3));
        context.animate(&updater, &flags, [0.0, 0.0]);

        let preset = context.camera_preset();
        let father = context.figure_position(0).expect("father exists");
        let mut camera = OrbitCamera::looking_at(preset.eye, father + Vector3::new(0.0, 2.0, 0.0), preset.fovy, 1.0);

        let role = context.select_at((400.0, 400.0), (800.0, 800.0), &camera);
        assert_eq!(role, Some(FigureRole::Father));
        assert!(context.is_flying());

        let mut sink = RecordingSink::default();
        context.tick_at(start + Duration::from_secs(6));
        context.steer_camera(&mut camera, &mut sink);
        assert!(!context.is_flying());
        assert!((camera.eye - (father + Vector3::new(0.0, 2.0, 5.0))).magnitude() < 1e-2);
        // The cue file does not exist, so nothing plays
        assert!(sink.0.is_empty());
    }

    #[test]
    fn clicking_empty_sky_selects_nothing() {
        let flags = SceneFlags::default();
        let mut context = SceneContext::create(options(SceneKind::Robot), &flags, 0);
        let camera = OrbitCamera::looking_at(
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::new(0.0, 0.0, 0.0),
            cgmath::Deg(50.0),
            1.0,
        );
        assert_eq!(context.select_at((0.0, 0.0), (800.0, 800.0), &camera), None);
        assert!(!context.is_flying());
    }
}
