//! Street lamps along the campus roads.
//!
//! Each lamp is a dark pole, an unlit bulb mesh and a real PointLight. All
//! lights share one intensity taken from the tunables. The lamp meshes do not
//! cast shadows.

use bevy::{pbr::NotShadowCaster, prelude::*};

use crate::tunables::TunableParams;

pub struct StreetLampsPlugin;

impl Plugin for StreetLampsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LampConfig>()
            .add_systems(Startup, spawn_street_lamps)
            .add_systems(
                Update,
                apply_lamp_intensity.run_if(resource_changed::<TunableParams>),
            );
    }
}

/// Lamp bases on the ground plane (x, z), placed along the sides of the roads.
pub const LAMP_POSITIONS: [Vec2; 8] = [
    // Horizontal road
    Vec2::new(-15.0, -5.0),
    Vec2::new(2.0, -15.0),
    Vec2::new(15.0, -5.0),
    // Diagonal road
    Vec2::new(14.33, 10.0),
    Vec2::new(5.67, 15.0),
    // Vertical road
    Vec2::new(-15.0, 5.0),
    Vec2::new(-5.0, 5.0),
    Vec2::new(-15.0, 15.0),
];

#[derive(Component)]
pub struct StreetLamp;

/// The light source of a lamp.
#[derive(Component)]
pub struct LampLight;

#[derive(Resource)]
pub struct LampConfig {
    pub pole_height: f32,
    pub pole_radius_top: f32,
    pub pole_radius_bottom: f32,
    pub bulb_radius: f32,
    /// Height of the bulb and light above the lamp base.
    pub light_height: f32,
    pub light_color: Color,
    pub light_range: f32,
    /// Lumens per tunable intensity unit.
    pub lumens_per_unit: f32,
    pub shadows_enabled: bool,
}

impl Default for LampConfig {
    fn default() -> Self {
        Self {
            pole_height: 4.0,
            pole_radius_top: 0.05,
            pole_radius_bottom: 0.1,
            bulb_radius: 0.3,
            light_height: 4.2,
            light_color: Color::srgb_u8(0xff, 0xee, 0x88),
            light_range: 14.0,
            lumens_per_unit: 25_000.0,
            shadows_enabled: true,
        }
    }
}

impl LampConfig {
    /// Where the bulb and its light sit for a lamp base.
    pub fn light_position(&self, base: Vec2) -> Vec3 {
        Vec3::new(base.x, self.light_height, base.y)
    }

    pub fn intensity(&self, lamp_intensity: f32) -> f32 {
        lamp_intensity * self.lumens_per_unit
    }
}

fn spawn_street_lamps(
    mut commands: Commands,
    config: Res<LampConfig>,
    params: Res<TunableParams>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let pole_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x11, 0x11, 0x11),
        ..default()
    });
    let bulb_material = materials.add(StandardMaterial {
        base_color: config.light_color,
        unlit: true,
        ..default()
    });

    let pole_mesh = meshes.add(ConicalFrustum {
        radius_top: config.pole_radius_top,
        radius_bottom: config.pole_radius_bottom,
        height: config.pole_height,
    });
    let bulb_mesh = meshes.add(Sphere::new(config.bulb_radius));

    for base in LAMP_POSITIONS {
        let light_pos = config.light_position(base);

        commands.spawn((
            Mesh3d(pole_mesh.clone()),
            MeshMaterial3d(pole_material.clone()),
            Transform::from_xyz(base.x, config.pole_height / 2.0, base.y),
            NotShadowCaster,
            StreetLamp,
        ));

        commands.spawn((
            Mesh3d(bulb_mesh.clone()),
            MeshMaterial3d(bulb_material.clone()),
            Transform::from_translation(light_pos),
            NotShadowCaster,
            StreetLamp,
        ));

        commands.spawn((
            PointLight {
                color: config.light_color,
                intensity: config.intensity(params.lamp_intensity),
                range: config.light_range,
                shadows_enabled: config.shadows_enabled,
                ..default()
            },
            Transform::from_translation(light_pos),
            LampLight,
            StreetLamp,
        ));
    }

    info!("Spawned {} street lamps", LAMP_POSITIONS.len());
}

/// Every lamp gets the same intensity.
fn apply_lamp_intensity(
    params: Res<TunableParams>,
    config: Res<LampConfig>,
    mut lights: Query<&mut PointLight, With<LampLight>>,
) {
    let intensity = config.intensity(params.lamp_intensity);
    for mut light in &mut lights {
        light.intensity = intensity;
    }
}
