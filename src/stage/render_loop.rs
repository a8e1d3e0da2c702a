// Per-frame ordering: schedule, advance, follow, controls, draw

use glam::Vec3;
use winit::window::Window;

use super::animation::Target;
use super::follow::CameraFollow;
use super::Stage;
use crate::engine::frame_clock::FrameClock;
use crate::engine::renderer::{Camera, Renderer};

/// Asks the platform for the next frame
pub trait FrameScheduler {
    fn schedule_next(&self);
}

impl FrameScheduler for Window {
    fn schedule_next(&self) {
        self.request_redraw();
    }
}

/// Anything that adjusts the camera after follow (orbit controls)
pub trait CameraControls {
    /// Move the point the controls orbit around
    fn set_pivot(&mut self, pivot: Vec3);

    fn update(&mut self, camera: &mut Camera);
}

/// Issues the frame's single draw
pub trait FrameRenderer {
    type Error;

    fn draw(&mut self, camera: &Camera, target: Option<&Target>) -> Result<(), Self::Error>;
}

impl FrameRenderer for Renderer {
    type Error = wgpu::SurfaceError;

    fn draw(&mut self, camera: &Camera, target: Option<&Target>) -> Result<(), Self::Error> {
        self.render(camera, target)
    }
}

/// Drives one iteration of the stage per display refresh
#[derive(Debug, Default)]
pub struct RenderLoop {
    follow: CameraFollow,
    frame_count: u64,
}

impl RenderLoop {
    pub fn new(follow: CameraFollow) -> Self {
        Self {
            follow,
            frame_count: 0,
        }
    }

    /// Frames started so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Run one frame
    ///
    /// The camera is written by follow first and controls second, and only then
    /// drawn. While following, the controls pivot on the character so they only
    /// add pending orbit input on top of the follow pose. Missing mixer, target
    /// or controls skip their step.
    pub fn run_frame<S, C, R>(
        &mut self,
        stage: &mut Stage,
        scheduler: &S,
        clock: &mut C,
        controls: Option<&mut dyn CameraControls>,
        renderer: &mut R,
    ) -> Result<(), R::Error>
    where
        S: FrameScheduler + ?Sized,
        C: FrameClock + ?Sized,
        R: FrameRenderer + ?Sized,
    {
        scheduler.schedule_next();
        self.frame_count += 1;

        let dt = clock.delta();
        stage.advance_animation(dt);

        let mut pivot = None;
        if stage.controller().is_walking() {
            if let Some(position) = stage.target().map(Target::position) {
                let pose = self.follow.follow(position);
                stage.camera_mut().apply_pose(pose);
                pivot = Some(pose.look_at);
            }
        }

        if let Some(controls) = controls {
            if let Some(pivot) = pivot {
                controls.set_pivot(pivot);
            }
            controls.update(stage.camera_mut());
        }

        renderer.draw(stage.camera(), stage.target())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ControlsConfig, ModelConfig};
    use crate::core::FallbackPolicy;
    use crate::engine::assets::{AnimationClip, LoadedModel, TranslationTrack};
    use crate::engine::controls::OrbitControls;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Step {
        Schedule,
        Delta,
        Controls { camera: Vec3 },
        Draw { camera: Vec3, target: Option<Vec3> },
    }

    type Log = RefCell<Vec<Step>>;

    struct MockScheduler<'a>(&'a Log);

    impl FrameScheduler for MockScheduler<'_> {
        fn schedule_next(&self) {
            self.0.borrow_mut().push(Step::Schedule);
        }
    }

    struct MockClock<'a>(&'a Log, f32);

    impl FrameClock for MockClock<'_> {
        fn delta(&mut self) -> f32 {
            self.0.borrow_mut().push(Step::Delta);
            self.1
        }
    }

    struct MockControls<'a>(&'a Log);

    impl CameraControls for MockControls<'_> {
        fn set_pivot(&mut self, _: Vec3) {}

        fn update(&mut self, camera: &mut Camera) {
            self.0.borrow_mut().push(Step::Controls {
                camera: camera.position,
            });
        }
    }

    struct MockRenderer<'a>(&'a Log);

    impl FrameRenderer for MockRenderer<'_> {
        type Error = String;

        fn draw(&mut self, camera: &Camera, target: Option<&Target>) -> Result<(), String> {
            self.0.borrow_mut().push(Step::Draw {
                camera: camera.position,
                target: target.map(Target::position),
            });
            Ok(())
        }
    }

    struct FailingRenderer;

    impl FrameRenderer for FailingRenderer {
        type Error = String;

        fn draw(&mut self, _: &Camera, _: Option<&Target>) -> Result<(), String> {
            Err("surface lost".to_string())
        }
    }

    const START: Vec3 = Vec3::new(0.0, -1.0, 5.0);

    fn stage() -> Stage {
        Stage::new(
            Camera::new(START, 45.0, 1.0, 0.1, 1000.0),
            FallbackPolicy::Idle,
        )
    }

    fn loaded_stage(initial: &str) -> Stage {
        stage_with_walk(initial, 1.0, Vec3::new(0.0, 0.0, -1.0))
    }

    /// Stage whose walk clip moves the root from the origin to `end` over `duration`
    fn stage_with_walk(initial: &str, duration: f32, end: Vec3) -> Stage {
        let mut stage = stage();
        let walk_track = TranslationTrack::new(vec![0.0, duration], vec![Vec3::ZERO, end]);
        let model = LoadedModel {
            clips: vec![
                AnimationClip::new("idle", duration),
                AnimationClip::new("walk", duration).with_root_motion(walk_track),
            ],
            bounds: None,
        };
        stage.install_model(model, &ModelConfig::default(), initial);
        stage
    }

    fn run(stage: &mut Stage, render_loop: &mut RenderLoop, log: &Log, with_controls: bool) {
        let scheduler = MockScheduler(log);
        let mut clock = MockClock(log, 0.5);
        let mut controls = MockControls(log);
        let mut renderer = MockRenderer(log);
        let controls: Option<&mut dyn CameraControls> = if with_controls {
            Some(&mut controls)
        } else {
            None
        };
        let result = render_loop.run_frame(stage, &scheduler, &mut clock, controls, &mut renderer);
        assert!(result.is_ok());
    }

    #[test]
    fn test_steps_run_in_order() {
        let log = Log::default();
        let mut stage = loaded_stage("idle");
        let mut render_loop = RenderLoop::default();

        run(&mut stage, &mut render_loop, &log, true);

        let steps = log.borrow();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], Step::Schedule);
        assert_eq!(steps[1], Step::Delta);
        assert!(matches!(steps[2], Step::Controls { .. }));
        assert!(matches!(steps[3], Step::Draw { .. }));
    }

    #[test]
    fn test_frame_before_load_skips_missing_parts() {
        let log = Log::default();
        let mut stage = stage();
        let mut render_loop = RenderLoop::default();

        run(&mut stage, &mut render_loop, &log, false);

        let steps = log.borrow();
        assert_eq!(
            *steps,
            vec![
                Step::Schedule,
                Step::Delta,
                Step::Draw {
                    camera: START,
                    target: None
                },
            ]
        );
    }

    #[test]
    fn test_camera_stays_put_while_idle() {
        let log = Log::default();
        let mut stage = loaded_stage("idle");
        let mut render_loop = RenderLoop::default();

        run(&mut stage, &mut render_loop, &log, true);

        assert_eq!(stage.camera().position, START);
        assert_eq!(stage.camera().look_at, Vec3::ZERO);
    }

    #[test]
    fn test_camera_follows_walking_target_before_controls() {
        let log = Log::default();
        let mut stage = loaded_stage("walk");
        let mut render_loop = RenderLoop::default();

        run(&mut stage, &mut render_loop, &log, true);

        // Root motion at t=0.5 moves the character 0.5 * 1.5 along -Z
        let target = Vec3::new(0.0, 0.02, -0.75);
        let expected_camera = target + Vec3::new(0.0, 1.0, 5.0);

        let steps = log.borrow();
        let Step::Controls { camera } = steps[2].clone() else {
            panic!("expected controls step, got {:?}", steps[2]);
        };
        assert!(camera.abs_diff_eq(expected_camera, 1e-5));

        let Step::Draw { camera, target: drawn } = steps[3].clone() else {
            panic!("expected draw step, got {:?}", steps[3]);
        };
        assert!(camera.abs_diff_eq(expected_camera, 1e-5));
        assert!(drawn.is_some_and(|p| p.abs_diff_eq(target, 1e-5)));
        assert!(stage.camera().look_at.abs_diff_eq(target, 1e-5));
    }

    #[test]
    fn test_orbit_controls_keep_walking_character_in_view() {
        let log = Log::default();
        let mut stage = stage_with_walk("walk", 10.0, Vec3::new(0.0, 0.0, -20.0));
        let mut render_loop = RenderLoop::default();
        let mut controls = OrbitControls::new(&ControlsConfig::default());
        controls.set_target(Vec3::new(0.0, 1.5, 0.0));
        let scheduler = MockScheduler(&log);
        let mut renderer = MockRenderer(&log);

        // Frames landing at t = 0, 5 and 9 seconds into the walk
        for dt in [0.0, 5.0, 4.0] {
            let mut clock = MockClock(&log, dt);
            let result = render_loop.run_frame(
                &mut stage,
                &scheduler,
                &mut clock,
                Some(&mut controls),
                &mut renderer,
            );
            assert!(result.is_ok());

            let target = stage.target().map(Target::position).unwrap_or_default();
            let camera = stage.camera();
            assert!(camera.position.abs_diff_eq(target + Vec3::new(0.0, 1.0, 5.0), 1e-4));
            assert!(camera.look_at.abs_diff_eq(target, 1e-4));
            assert!(controls.target().abs_diff_eq(target, 1e-4));
        }

        let target = stage.target().map(Target::position).unwrap_or_default();
        assert!(target.abs_diff_eq(Vec3::new(0.0, 0.02, -27.0), 1e-3));

        let last_draw = log
            .borrow()
            .iter()
            .rev()
            .find_map(|step| match step {
                Step::Draw { camera, .. } => Some(*camera),
                _ => None,
            });
        let expected = target + Vec3::new(0.0, 1.0, 5.0);
        assert!(last_draw.is_some_and(|camera| camera.abs_diff_eq(expected, 1e-4)));
    }

    #[test]
    fn test_orbit_input_still_applies_while_following() {
        let log = Log::default();
        let mut stage = loaded_stage("walk");
        let mut render_loop = RenderLoop::default();
        let mut controls = OrbitControls::new(&ControlsConfig::default());
        let scheduler = MockScheduler(&log);
        let mut clock = MockClock(&log, 0.5);
        let mut renderer = MockRenderer(&log);

        controls.rotate(-100.0, 0.0);
        let result = render_loop.run_frame(
            &mut stage,
            &scheduler,
            &mut clock,
            Some(&mut controls),
            &mut renderer,
        );
        assert!(result.is_ok());

        let target = stage.target().map(Target::position).unwrap_or_default();
        let camera = stage.camera();
        assert!(camera.look_at.abs_diff_eq(target, 1e-5));
        assert!(camera.position.x > 1e-3);
        let distance = (camera.position - target).length();
        assert!((distance - 26.0f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_follow_stops_after_switching_away_from_walk() {
        let log = Log::default();
        let mut stage = loaded_stage("walk");
        let mut render_loop = RenderLoop::default();

        run(&mut stage, &mut render_loop, &log, false);
        let followed = stage.camera().position;

        stage.request_animation("idle");
        run(&mut stage, &mut render_loop, &log, false);

        assert_eq!(stage.camera().position, followed);
    }

    #[test]
    fn test_frame_count_is_monotonic() {
        let log = Log::default();
        let mut stage = stage();
        let mut render_loop = RenderLoop::default();

        let mut last = render_loop.frame_count();
        for _ in 0..5 {
            run(&mut stage, &mut render_loop, &log, true);
            assert!(render_loop.frame_count() > last);
            last = render_loop.frame_count();
        }
        assert_eq!(last, 5);

        // Every frame draws after its controls update
        let steps = log.borrow();
        for frame in steps.chunks(4) {
            assert!(matches!(frame[2], Step::Controls { .. }));
            assert!(matches!(frame[3], Step::Draw { .. }));
        }
    }

    #[test]
    fn test_draw_error_is_returned() {
        let log = Log::default();
        let mut stage = stage();
        let mut render_loop = RenderLoop::default();
        let scheduler = MockScheduler(&log);
        let mut clock = MockClock(&log, 0.016);

        let result =
            render_loop.run_frame(&mut stage, &scheduler, &mut clock, None, &mut FailingRenderer);

        assert_eq!(result, Err("surface lost".to_string()));
        assert_eq!(render_loop.frame_count(), 1);
    }
}
