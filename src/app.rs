//! Window and event loop.
//!
//! [`HearthApp`] owns the winit event loop; [`AppState`] reacts to events.
//! Keys map to [`InputAction`]s, a left click without drag picks a figure,
//! and a left drag orbits the camera. Each redraw ticks the active scene,
//! rebuilds it if the figure set changed, animates it and renders it with
//! the control panel on top.

use std::sync::Arc;

use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    animation::FrameUpdater,
    assets::{AudioSink, LogSink},
    config::AppConfig,
    error::{HearthError, Result},
    gfx::{
        camera::{CameraController, CameraManager, OrbitCamera},
        rendering::{FrameOutcome, RenderEngine},
    },
    scene::{
        context::{ContextOptions, SceneContext},
        flags::{InputAction, SceneFlags},
    },
    ui::{control_panel, PanelRequest, PanelStatus, UiManager},
};

/// Pointer travel in pixels below which a press and release count as a click
const CLICK_SLOP: f64 = 4.0;

pub struct HearthApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

/// Left-button state used to tell clicks from drags
#[derive(Debug, Default, Clone, Copy)]
struct Pointer {
    position: Option<PhysicalPosition<f64>>,
    pressed_at: Option<PhysicalPosition<f64>>,
}

impl Pointer {
    /// Pointer in normalised device coordinates, origin when unknown
    fn ndc(&self, size: PhysicalSize<u32>) -> [f32; 2] {
        match self.position {
            Some(p) if size.width > 0 && size.height > 0 => [
                (p.x / size.width as f64 * 2.0 - 1.0) as f32,
                (1.0 - p.y / size.height as f64 * 2.0) as f32,
            ],
            _ => [0.0, 0.0],
        }
    }

    /// Ends a press; returns the release position if it was a click
    fn release(&mut self) -> Option<PhysicalPosition<f64>> {
        let start = self.pressed_at.take()?;
        let end = self.position?;
        let travel = ((end.x - start.x).powi(2) + (end.y - start.y).powi(2)).sqrt();
        (travel < CLICK_SLOP).then_some(end)
    }
}

struct AppState {
    config: AppConfig,
    flags: SceneFlags,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    camera_manager: CameraManager,
    scene: Option<SceneContext>,
    updater: FrameUpdater,
    audio: Box<dyn AudioSink>,
    pointer: Pointer,
    error: Option<HearthError>,
}

impl HearthApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let event_loop = EventLoop::new()?;

        let flags = config.flags;
        let scene = SceneContext::create(ContextOptions::from(&config), &flags, 0);

        let aspect = config.width as f32 / config.height as f32;
        let preset = scene.camera_preset();
        let camera = OrbitCamera::looking_at(preset.eye, preset.target, preset.fovy, aspect);
        let controller = CameraController::new(0.005, 0.1);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                flags,
                window: None,
                render_engine: None,
                ui_manager: None,
                camera_manager: CameraManager::new(camera, controller),
                scene: Some(scene),
                updater: FrameUpdater::new(),
                audio: Box::new(LogSink),
                pointer: Pointer::default(),
                error: None,
            },
        })
    }

    /// Replaces the logging audio sink
    pub fn with_audio_sink(mut self, sink: impl AudioSink + 'static) -> Self {
        self.app_state.audio = Box::new(sink);
        self
    }

    /// Runs until the window closes; errors raised inside the loop are returned here
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        if let Some(scene) = self.app_state.scene.take() {
            scene.destroy();
        }
        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: HearthError) {
        error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop.create_window(
            WindowAttributes::default()
                .with_title("Hearth")
                .with_inner_size(LogicalSize::new(self.config.width, self.config.height)),
        )?;
        let window_handle = Arc::new(window);
        let (width, height) = window_handle.inner_size().into();

        let renderer = pollster::block_on(RenderEngine::new(
            window_handle.clone(),
            width,
            height,
            self.config.vsync,
        ))?;

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
        );

        self.camera_manager.camera.resize_projection(width, height);
        if let Some(scene) = self.scene.as_mut() {
            scene.attach_gpu(renderer.create_scene_gpu(scene.graph()));
        }

        self.window = Some(window_handle);
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        Ok(())
    }

    /// Swaps the active scene through `replace` and resets the camera to its preset
    fn replace_scene(&mut self, replace: impl FnOnce(SceneContext, &SceneFlags) -> SceneContext) {
        let Some(old) = self.scene.take() else {
            return;
        };
        let mut scene = replace(old, &self.flags);

        if let Some(render_engine) = self.render_engine.as_ref() {
            scene.attach_gpu(render_engine.create_scene_gpu(scene.graph()));
        }

        let preset = scene.camera_preset();
        let camera = &mut self.camera_manager.camera;
        camera.fovy = preset.fovy.into();
        camera.look_from(preset.eye, preset.target);
        self.camera_manager.controller.stop();
        self.camera_manager.controller.set_enabled(true);

        info!("Active scene: {} (generation {})", scene.kind().label(), scene.generation());
        self.scene = Some(scene);
    }

    fn switch_scene(&mut self) {
        self.replace_scene(|scene, flags| {
            let kind = scene.kind().other();
            scene.switch_to(kind, flags)
        });
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: InputAction) {
        match action {
            InputAction::Quit => event_loop.exit(),
            InputAction::SwitchScene => self.switch_scene(),
            InputAction::DanceBurst => {
                if let Some(scene) = self.scene.as_mut() {
                    scene.start_dance_burst();
                }
            }
            flag_action => {
                // Figure changes are picked up by the next redraw
                flag_action.apply(&mut self.flags);
            }
        }
    }

    fn click(&mut self, position: PhysicalPosition<f64>) {
        let (Some(window), Some(scene)) = (self.window.as_ref(), self.scene.as_mut()) else {
            return;
        };
        let size = window.inner_size();
        let hit = scene.select_at(
            (position.x as f32, position.y as f32),
            (size.width as f32, size.height as f32),
            &self.camera_manager.camera,
        );
        if hit.is_some() {
            self.camera_manager.controller.set_enabled(false);
        }
    }

    fn redraw(&mut self) -> Result<()> {
        if self
            .scene
            .as_ref()
            .is_some_and(|scene| scene.needs_rebuild(&self.flags))
        {
            self.replace_scene(SceneContext::rebuild);
        }

        let (Some(window), Some(render_engine), Some(scene)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.scene.as_mut(),
        ) else {
            return Ok(());
        };

        let time = scene.tick();
        scene.poll_assets(self.audio.as_mut());

        let was_flying = scene.is_flying();
        scene.steer_camera(&mut self.camera_manager.camera, self.audio.as_mut());
        if was_flying && !scene.is_flying() {
            self.camera_manager.controller.set_enabled(true);
        }

        let pointer = self.pointer.ndc(window.inner_size());
        scene.animate(&self.updater, &self.flags, pointer);

        self.camera_manager.update();
        render_engine.update(&self.camera_manager.camera.uniform, scene.lighting());

        let status = PanelStatus {
            kind: scene.kind(),
            generation: scene.generation(),
            fps: time.fps,
            family_size: scene.figures().len(),
            selected: scene.selected_role(),
            loading: scene.loading_progress(),
        };

        let Some((gpu, graph, _)) = scene.render_parts() else {
            return Ok(());
        };

        let mut request = PanelRequest::default();
        let flags = &mut self.flags;
        let ui_manager = self.ui_manager.as_mut();
        let outcome = render_engine.render_frame_with_ui(
            gpu,
            graph,
            |device, queue, encoder, color_attachment| {
                if let Some(ui_manager) = ui_manager {
                    ui_manager.draw(device, queue, encoder, window, color_attachment, |ui| {
                        request = control_panel(ui, flags, &status);
                    });
                }
            },
        )?;
        if outcome == FrameOutcome::Reconfigured {
            info!("Surface reconfigured");
        }

        if request.dance_burst {
            scene.start_dance_burst();
        }
        if request.switch_scene {
            self.switch_scene();
        }
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let ui_captured = match self.ui_manager.as_mut() {
            Some(ui_manager) => {
                let ui_event: Event<()> = Event::WindowEvent {
                    window_id,
                    event: event.clone(),
                };
                ui_manager.handle_input(&window, &ui_event)
            }
            None => false,
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } if !ui_captured => {
                if let Some(action) = InputAction::from_key(key_code) {
                    self.handle_action(event_loop, action);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer.position = Some(position);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed if !ui_captured => {
                    self.pointer.pressed_at = self.pointer.position;
                    self.camera_manager.controller.set_mouse_pressed(true);
                }
                ElementState::Pressed => {}
                ElementState::Released => {
                    self.camera_manager.controller.set_mouse_pressed(false);
                    if let Some(position) = self.pointer.release() {
                        if !ui_captured {
                            self.click(position);
                        }
                    }
                }
            },
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if self
            .ui_manager
            .as_ref()
            .is_some_and(|ui_manager| ui_manager.wants_pointer())
        {
            return;
        }
        self.camera_manager.process_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::flags::SceneKind;
    use cgmath::Vector3;

    #[test]
    fn pointer_ndc_maps_corners() {
        let size = PhysicalSize::new(200, 100);
        let mut pointer = Pointer::default();
        assert_eq!(pointer.ndc(size), [0.0, 0.0]);

        pointer.position = Some(PhysicalPosition::new(0.0, 0.0));
        assert_eq!(pointer.ndc(size), [-1.0, 1.0]);
        pointer.position = Some(PhysicalPosition::new(200.0, 100.0));
        assert_eq!(pointer.ndc(size), [1.0, -1.0]);
        pointer.position = Some(PhysicalPosition::new(100.0, 50.0));
        assert_eq!(pointer.ndc(size), [0.0, 0.0]);
    }

    #[test]
    fn small_travel_is_a_click_and_large_is_a_drag() {
        let mut pointer = Pointer {
            position: Some(PhysicalPosition::new(10.0, 10.0)),
            pressed_at: Some(PhysicalPosition::new(8.0, 9.0)),
        };
        assert!(pointer.release().is_some());
        assert!(pointer.pressed_at.is_none());

        pointer.pressed_at = Some(PhysicalPosition::new(50.0, 10.0));
        assert!(pointer.release().is_none());

        // Release without a press
        assert!(pointer.release().is_none());
    }

    #[test]
    fn scene_presets_differ_per_kind() {
        let config = AppConfig::default().with_rain_drops(10);
        let family = SceneContext::create(ContextOptions::from(&config), &config.flags, 0);
        let robot = family.switch_to(SceneKind::Robot, &config.flags);
        assert_eq!(robot.camera_preset().eye, Vector3::new(0.0, 0.0, 10.0));
        robot.destroy();
    }
}
