use bevy::{
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
    transform::TransformSystem,
    window::PrimaryWindow,
};
use bevy_egui::EguiContexts;
use std::f32::consts::{PI, TAU};

pub const CAMERA_START: Vec3 = Vec3::new(3.0, 3.0, 3.0);
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

/// Share of the pending motion applied each tick; the rest carries over.
const DAMPING_FACTOR: f32 = 0.05;
const MIN_POLAR: f32 = 0.001;
const MAX_POLAR: f32 = PI - 0.001;
const MIN_DISTANCE: f32 = 0.1;
const MAX_DISTANCE: f32 = CAMERA_FAR * 0.9;
const ZOOM_PER_LINE: f32 = 0.1;
const ZOOM_PER_PIXEL: f32 = 0.001;
const ZOOM_SMOOTHING: f32 = 0.2;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(
                PostUpdate,
                camera_control_system.before(TransformSystem::TransformPropagate),
            );
    }
}

fn spawn_camera(mut commands: Commands, mut clearcolor: ResMut<ClearColor>) {
    *clearcolor = ClearColor(Color::BLACK);
    let orbit = OrbitCamera::looking_at(CAMERA_START, Vec3::ZERO);
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        orbit.transform(),
        orbit,
    ));
}

/// Pointer input gathered for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrbitInput {
    /// Drag distance in logical pixels while rotating.
    pub rotate: Vec2,
    /// Drag distance in logical pixels while panning.
    pub pan: Vec2,
    /// Scroll amount, positive zooms in.
    pub scroll: f32,
    pub viewport_height: f32,
}

/// Damped orbit around `target`, in spherical coordinates (polar angle
/// measured from +Y).
#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    target: Vec3,
    azimuth: f32,
    polar: f32,
    distance: f32,
    azimuth_delta: f32,
    polar_delta: f32,
    pan_delta: Vec3,
    smooth_zoom_buffer: f32,
}

impl OrbitCamera {
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        Self {
            target,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / distance).clamp(-1.0, 1.0).acos(),
            distance,
            azimuth_delta: 0.0,
            polar_delta: 0.0,
            pan_delta: Vec3::ZERO,
            smooth_zoom_buffer: 0.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        self.target
            + self.distance
                * Vec3::new(
                    sin_polar * self.azimuth.sin(),
                    self.polar.cos(),
                    sin_polar * self.azimuth.cos(),
                )
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position()).looking_at(self.target, Vec3::Y)
    }

    /// Advances the orbit by one frame and returns the new camera pose.
    pub fn tick(&mut self, input: &OrbitInput) -> Transform {
        let height = input.viewport_height.max(1.0);

        // a drag across the full viewport height is one full turn
        self.azimuth_delta -= TAU * input.rotate.x / height;
        self.polar_delta -= TAU * input.rotate.y / height;

        if input.pan != Vec2::ZERO {
            let view = self.transform();
            let half_fov = CAMERA_FOV_DEGREES.to_radians() * 0.5;
            let world_per_pixel = 2.0 * self.distance * half_fov.tan() / height;
            self.pan_delta += (-view.right() * input.pan.x + view.up() * input.pan.y)
                * world_per_pixel;
        }

        self.smooth_zoom_buffer += input.scroll;

        self.azimuth += self.azimuth_delta * DAMPING_FACTOR;
        self.polar = (self.polar + self.polar_delta * DAMPING_FACTOR).clamp(MIN_POLAR, MAX_POLAR);
        self.target += self.pan_delta * DAMPING_FACTOR;

        self.azimuth_delta *= 1.0 - DAMPING_FACTOR;
        self.polar_delta *= 1.0 - DAMPING_FACTOR;
        self.pan_delta *= 1.0 - DAMPING_FACTOR;

        // scroll delta is cached to a buffer and drained over several frames
        let zoom_amount = self.smooth_zoom_buffer * ZOOM_SMOOTHING;
        self.smooth_zoom_buffer -= zoom_amount;
        self.distance = (self.distance * (1.0 - zoom_amount)).clamp(MIN_DISTANCE, MAX_DISTANCE);

        self.transform()
    }
}

pub fn camera_control_system(
    mut query: Query<(&mut Transform, &mut OrbitCamera)>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
) {
    let Ok((mut transform, mut orbit)) = query.single_mut() else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };

    let motion: Vec2 = motion_evr.read().map(|ev| ev.delta).sum();
    let scroll: f32 = scroll_evr
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y * ZOOM_PER_LINE,
            MouseScrollUnit::Pixel => ev.y * ZOOM_PER_PIXEL,
        })
        .sum();

    // the parameter panel keeps its own drags and scrolls
    let pointer_on_panel = contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area());

    let mut input = OrbitInput {
        viewport_height: window.height(),
        ..default()
    };
    if !pointer_on_panel {
        if mouse_buttons.pressed(MouseButton::Left) {
            input.rotate = motion;
        } else if mouse_buttons.any_pressed([MouseButton::Right, MouseButton::Middle]) {
            input.pan = motion;
        }
        input.scroll = scroll;
    }

    *transform = orbit.tick(&input);
}
