use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use glam::Vec3;
use log::{debug, error, info, warn};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{EventLoopBuilder, EventLoopWindowTarget},
    window::{Window, WindowBuilder},
};

mod core;
mod engine;
mod stage;

use crate::core::ShowcaseConfig;
use engine::assets::{LoadedModel, ModelLoader};
use engine::controls::OrbitControls;
use engine::frame_clock::Clock;
use engine::input::{Action, InputCommand, InputManager};
use engine::renderer::{Camera, Renderer};
use engine::scroll::{PageLayout, VisibilityObserver};
use stage::dispatcher::{SectionAnimationMap, VisibilityDispatcher};
use stage::follow::CameraFollow;
use stage::render_loop::RenderLoop;
use stage::Stage;

/// Frames between FPS log lines while stats are on
const STATS_LOG_INTERVAL: u64 = 120;

/// Events delivered to the event loop from other threads
#[derive(Debug)]
enum StageEvent {
    ModelLoaded(Result<LoadedModel>),
}

/// Everything the event loop owns
struct App {
    config: ShowcaseConfig,
    window: Arc<Window>,
    renderer: Renderer,
    stage: Stage,
    controls: OrbitControls,
    clock: Clock,
    render_loop: RenderLoop,
    input: InputManager,
    layout: PageLayout,
    observer: VisibilityObserver,
    dispatcher: VisibilityDispatcher,
    show_stats: bool,
}

impl App {
    fn new(config: ShowcaseConfig, window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let renderer = pollster::block_on(Renderer::new(
            window.clone(),
            &config.camera,
            &config.ground,
        ))?;

        let camera = Camera::new(
            Vec3::from_array(config.camera.position),
            config.camera.fov_degrees,
            size.width as f32 / size.height.max(1) as f32,
            config.camera.near,
            config.camera.far,
        );
        let stage = Stage::new(camera, config.animation.fallback);
        let controls = OrbitControls::new(&config.controls);
        let render_loop =
            RenderLoop::new(CameraFollow::new(Vec3::from_array(config.camera.follow_offset)));

        let layout = PageLayout::new(&config.page, size.height as f32);
        let observer = VisibilityObserver::new(&config.observer);
        let dispatcher =
            VisibilityDispatcher::new(SectionAnimationMap::new(config.section_animations.clone()));

        let mut app = Self {
            config,
            window,
            renderer,
            stage,
            controls,
            clock: Clock::new(),
            render_loop,
            input: InputManager::new(),
            layout,
            observer,
            dispatcher,
            show_stats: false,
        };

        if !app.config.observer.observe_after_load {
            app.start_observing();
        }

        Ok(app)
    }

    fn start_observing(&mut self) {
        self.observer.observe(&self.layout);
        self.sync_visibility();
    }

    /// Forward section visibility changes to the stage
    fn sync_visibility(&mut self) {
        let events = self.observer.poll(&self.layout);
        self.dispatcher.dispatch_all(&events, &mut self.stage);
    }

    fn on_model_loaded(&mut self, result: Result<LoadedModel>) {
        let model = match result {
            Ok(model) => model,
            Err(e) => {
                error!("Failed to load model: {:#}", e);
                return;
            }
        };

        let outcome = self.stage.install_model(
            model,
            &self.config.model,
            &self.config.animation.initial,
        );
        debug!("Initial animation request: {:?}", outcome);

        self.controls
            .set_target(Vec3::from_array(self.config.controls.target_on_load));
        self.controls.update(self.stage.camera_mut());

        if self.config.observer.observe_after_load {
            self.start_observing();
        }
    }

    fn handle_command(&mut self, command: InputCommand) {
        match command {
            InputCommand::Rotate { dx, dy } => self.controls.rotate(dx, dy),
            InputCommand::Zoom(notches) => self.controls.zoom(notches),
            InputCommand::Action(Action::ToggleStats) => {
                self.show_stats = !self.show_stats;
                self.log_stats();
            }
            _ => {
                if command.apply_scroll(&mut self.layout) {
                    debug!("Scrolled to {:.0}px", self.layout.scroll());
                    self.sync_visibility();
                }
            }
        }
    }

    fn log_stats(&self) {
        info!(
            "FPS: {:.1} | frames: {} | animation: {}",
            self.clock.fps(),
            self.render_loop.frame_count(),
            self.stage.controller().current_animation().unwrap_or("none")
        );
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.renderer.resize(size);
        self.stage
            .camera_mut()
            .resize(size.width as f32, size.height as f32);
        if size.height > 0 {
            self.layout.set_viewport_height(size.height as f32);
            self.sync_visibility();
        }
    }

    fn redraw(&mut self, elwt: &EventLoopWindowTarget<StageEvent>) {
        let result = self.render_loop.run_frame(
            &mut self.stage,
            self.window.as_ref(),
            &mut self.clock,
            Some(&mut self.controls),
            &mut self.renderer,
        );

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                self.renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Surface out of memory, shutting down");
                elwt.exit();
            }
            Err(e) => warn!("Frame skipped: {:?}", e),
        }

        if self.show_stats && self.render_loop.frame_count() % STATS_LOG_INTERVAL == 0 {
            self.log_stats();
        }
    }

    fn handle_window_event(&mut self, event: WindowEvent, elwt: &EventLoopWindowTarget<StageEvent>) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            WindowEvent::Resized(physical_size) => self.resize(physical_size),
            WindowEvent::ModifiersChanged(modifiers) => self.input.set_modifiers(modifiers.state()),
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(command) = self.input.process_keyboard_event(&event) {
                    self.handle_command(command);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(command) = self.input.process_cursor_moved(position.x, position.y) {
                    self.handle_command(command);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let command = self.input.process_wheel(delta);
                self.handle_command(command);
            }
            WindowEvent::RedrawRequested => self.redraw(elwt),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Scroll Stage...");

    let config_path = ShowcaseConfig::resolve_path(std::env::args().nth(1));
    let config = ShowcaseConfig::load_or_default(&config_path)?;

    let event_loop = EventLoopBuilder::<StageEvent>::with_user_event().build()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Scroll Stage")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    // Single attempt; the stage stays empty if this fails
    let proxy = event_loop.create_proxy();
    let loader = ModelLoader::new(PathBuf::from("."));
    loader.spawn(config.model.path.clone(), move |result| {
        if proxy.send_event(StageEvent::ModelLoaded(result)).is_err() {
            warn!("Event loop closed before the model finished loading");
        }
    })?;

    let mut app = App::new(config, window)?;
    app.window.request_redraw();

    event_loop
        .run(move |event, elwt| match event {
            Event::UserEvent(StageEvent::ModelLoaded(result)) => app.on_model_loaded(result),
            Event::WindowEvent { event, window_id } if window_id == app.window.id() => {
                app.handle_window_event(event, elwt);
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
