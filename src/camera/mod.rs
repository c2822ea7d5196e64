//! Perspective orbit camera with drag-to-orbit and scroll zoom.
//!
//! The camera also carries the scene's distance fog; its color is driven by
//! the day/night cycle and its density by the tunables.

use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    pbr::{DistanceFog, FogFalloff},
    prelude::*,
};

use crate::render::day_night::SkyState;
use crate::tunables::TunableParams;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitConfig>()
            .init_resource::<OrbitInputBlocked>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, (orbit_rotate, orbit_zoom, apply_orbit).chain());
    }
}

/// Camera placement and control sensitivity.
#[derive(Resource)]
pub struct OrbitConfig {
    pub start_position: Vec3,
    pub focus: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Radians per pixel of mouse drag.
    pub rotate_sensitivity: f32,
    /// Fraction of the radius per scroll line.
    pub zoom_sensitivity: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(70.0, 40.0, 70.0),
            focus: Vec3::ZERO,
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            rotate_sensitivity: 0.005,
            zoom_sensitivity: 0.1,
            min_radius: 5.0,
            max_radius: 500.0,
        }
    }
}

/// Set while another layer (the debug panel) owns the pointer.
#[derive(Resource, Default)]
pub struct OrbitInputBlocked(pub bool);

/// Spherical coordinates of the camera around its focus point.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    /// Angle around +Y, measured from +Z towards +X.
    pub yaw: f32,
    /// Elevation above the XZ plane.
    pub pitch: f32,
}

/// Keep the camera off the poles so `looking_at` stays well defined.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

impl OrbitCamera {
    pub fn from_position(position: Vec3, focus: Vec3) -> Self {
        let offset = position - focus;
        let radius = offset.length();
        Self {
            focus,
            radius,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / radius).asin(),
        }
    }

    pub fn position(&self) -> Vec3 {
        let horizontal = self.radius * self.pitch.cos();
        self.focus
            + Vec3::new(
                horizontal * self.yaw.sin(),
                self.radius * self.pitch.sin(),
                horizontal * self.yaw.cos(),
            )
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position()).looking_at(self.focus, Vec3::Y)
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn zoom(&mut self, scroll: f32, config: &OrbitConfig) {
        self.radius = (self.radius * (1.0 - scroll * config.zoom_sensitivity))
            .clamp(config.min_radius, config.max_radius);
    }
}

fn setup_camera(
    mut commands: Commands,
    config: Res<OrbitConfig>,
    params: Res<TunableParams>,
    sky: Res<SkyState>,
) {
    let orbit = OrbitCamera::from_position(config.start_position, config.focus);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
            ..default()
        }),
        orbit.transform(),
        DistanceFog {
            color: sky.sky_color,
            falloff: FogFalloff::ExponentialSquared {
                density: params.fog_density,
            },
            ..default()
        },
        orbit,
    ));

    info!(
        "Orbit camera at {:?} (r={:.1}) looking at {:?}",
        config.start_position, orbit.radius, config.focus
    );
}

fn orbit_rotate(
    mut query: Query<&mut OrbitCamera>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    blocked: Res<OrbitInputBlocked>,
    config: Res<OrbitConfig>,
) {
    if blocked.0 || !mouse_buttons.pressed(MouseButton::Left) {
        mouse_motion.clear();
        return;
    }

    let delta: Vec2 = mouse_motion.read().map(|e| e.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    // Drag right spins the scene right, drag down tilts the view up
    for mut orbit in &mut query {
        orbit.rotate(
            -delta.x * config.rotate_sensitivity,
            delta.y * config.rotate_sensitivity,
        );
    }
}

fn orbit_zoom(
    mut query: Query<&mut OrbitCamera>,
    mut scroll_events: EventReader<MouseWheel>,
    blocked: Res<OrbitInputBlocked>,
    config: Res<OrbitConfig>,
) {
    let scroll: f32 = scroll_events.read().map(|e| e.y).sum();
    if scroll == 0.0 || blocked.0 {
        return;
    }

    for mut orbit in &mut query {
        orbit.zoom(scroll, &config);
    }
}

fn apply_orbit(mut query: Query<(&OrbitCamera, &mut Transform), Changed<OrbitCamera>>) {
    for (orbit, mut transform) in &mut query {
        *transform = orbit.transform();
    }
}
