//! Sun orbit and day/dusk sky blend.
//!
//! Every frame the sun phase is derived from elapsed time, the sun is placed on
//! a clamped circular orbit, and its height picks a blend between the dusk and
//! day sky colors. The blend is written to both the clear color and the fog so
//! the horizon never shows a seam.

use bevy::{
    pbr::{CascadeShadowConfigBuilder, DirectionalLightShadowMap, DistanceFog, FogFalloff},
    prelude::*,
};

use crate::tunables::TunableParams;

pub struct DayNightPlugin;

impl Plugin for DayNightPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DayNightConfig>()
            .init_resource::<SkyState>()
            .insert_resource(DirectionalLightShadowMap { size: 2048 })
            .insert_resource(ClearColor(DayNightConfig::default().sky_day))
            .add_systems(Startup, setup_lighting)
            .add_systems(
                Update,
                (advance_sky, update_sun_position, update_sky_color).chain(),
            )
            .add_systems(
                Update,
                (apply_sun_intensity, apply_fog_density)
                    .run_if(resource_changed::<TunableParams>),
            );
    }
}

/// Fixed constants of the cycle.
#[derive(Resource, Clone, Debug)]
pub struct DayNightConfig {
    /// Radius of the sun's orbit around the origin.
    pub orbit_radius: f32,
    /// The sun's Y coordinate never drops below this.
    pub min_sun_height: f32,
    /// Radians of phase per second at `sun_speed == 1`.
    pub time_scale: f32,

    pub sky_day: Color,
    pub sky_dusk: Color,

    pub sun_color: Color,
    /// Illuminance in lux per tunable intensity unit.
    pub sun_lux_per_unit: f32,

    // Hemisphere-style fill light
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    pub ambient_brightness_per_unit: f32,
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 60.0,
            min_sun_height: 10.0,
            time_scale: 0.1,

            sky_day: Color::srgb_u8(0x87, 0xce, 0xeb),
            sky_dusk: Color::srgb_u8(0x2b, 0x2d, 0x42),

            sun_color: Color::srgb_u8(0xff, 0xf1, 0xc4),
            sun_lux_per_unit: 10_000.0,

            ambient_color: Color::srgb_u8(0xbf, 0xef, 0xff),
            ambient_intensity: 0.45,
            ambient_brightness_per_unit: 600.0,
        }
    }
}

/// Sun phase in radians. Grows without bound; it is never wrapped.
pub fn sun_phase(elapsed_secs: f32, time_scale: f32, sun_speed: f32) -> f32 {
    elapsed_secs * time_scale * sun_speed
}

impl DayNightConfig {
    /// Sun position for a phase. The orbit is circular in X/Z while Y follows
    /// `sin` but is floored at `min_sun_height`, so the sun arcs without setting.
    pub fn sun_position(&self, phase: f32) -> Vec3 {
        let r = self.orbit_radius;
        Vec3::new(
            phase.cos() * r,
            (phase.sin() * r).max(self.min_sun_height),
            phase.sin() * r,
        )
    }

    /// Map the sun height range `[min_sun_height, orbit_radius]` onto `[0, 1]`.
    pub fn day_fraction(&self, sun_height: f32) -> f32 {
        let span = self.orbit_radius - self.min_sun_height;
        if span <= 0.0 {
            return if sun_height >= self.min_sun_height { 1.0 } else { 0.0 };
        }
        ((sun_height - self.min_sun_height) / span).clamp(0.0, 1.0)
    }

    /// Blend dusk → day by `fraction` in linear space.
    pub fn sky_color(&self, fraction: f32) -> Color {
        lerp_color(self.sky_dusk, self.sky_day, fraction)
    }

    /// Everything the frame needs from the cycle at `elapsed_secs`.
    pub fn tick(&self, elapsed_secs: f32, sun_speed: f32) -> SkyState {
        let phase = sun_phase(elapsed_secs, self.time_scale, sun_speed);
        let sun_position = self.sun_position(phase);
        let day_fraction = self.day_fraction(sun_position.y);
        SkyState {
            phase,
            sun_position,
            day_fraction,
            sky_color: self.sky_color(day_fraction),
        }
    }
}

/// Per-frame result of the cycle. Overwritten every tick.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct SkyState {
    pub phase: f32,
    pub sun_position: Vec3,
    /// 0.0 = dusk sky, 1.0 = day sky.
    pub day_fraction: f32,
    pub sky_color: Color,
}

impl Default for SkyState {
    fn default() -> Self {
        DayNightConfig::default().tick(0.0, TunableParams::default().sun_speed)
    }
}

#[derive(Component)]
pub struct Sun;

fn setup_lighting(
    mut commands: Commands,
    config: Res<DayNightConfig>,
    params: Res<TunableParams>,
    sky: Res<SkyState>,
) {
    commands.insert_resource(AmbientLight {
        color: config.ambient_color,
        brightness: config.ambient_intensity * config.ambient_brightness_per_unit,
    });

    commands.spawn((
        DirectionalLight {
            color: config.sun_color,
            illuminance: params.sun_intensity * config.sun_lux_per_unit,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(sky.sun_position).looking_at(Vec3::ZERO, Vec3::Y),
        // The whole campus fits inside ~100 units
        CascadeShadowConfigBuilder {
            num_cascades: 2,
            minimum_distance: 0.1,
            maximum_distance: 200.0,
            first_cascade_far_bound: 60.0,
            overlap_proportion: 0.2,
        }
        .build(),
        Sun,
    ));

    info!(
        "Sun orbit r={} floor={} (sky {:?} -> {:?})",
        config.orbit_radius, config.min_sun_height, config.sky_dusk, config.sky_day
    );
}

/// Driven by wall-clock time, not the per-frame clamped virtual clock.
fn advance_sky(
    time: Res<Time<Real>>,
    params: Res<TunableParams>,
    config: Res<DayNightConfig>,
    mut sky: ResMut<SkyState>,
) {
    *sky = config.tick(time.elapsed_secs(), params.sun_speed);
}

fn update_sun_position(sky: Res<SkyState>, mut sun_query: Query<&mut Transform, With<Sun>>) {
    for mut transform in &mut sun_query {
        *transform =
            Transform::from_translation(sky.sun_position).looking_at(Vec3::ZERO, Vec3::Y);
    }
}

/// Background and fog always receive the same color.
fn update_sky_color(
    sky: Res<SkyState>,
    mut clear_color: ResMut<ClearColor>,
    mut fog_query: Query<&mut DistanceFog>,
) {
    clear_color.0 = sky.sky_color;
    for mut fog in &mut fog_query {
        fog.color = sky.sky_color;
    }
}

fn apply_sun_intensity(
    params: Res<TunableParams>,
    config: Res<DayNightConfig>,
    mut sun_query: Query<&mut DirectionalLight, With<Sun>>,
) {
    for mut light in &mut sun_query {
        light.illuminance = params.sun_intensity * config.sun_lux_per_unit;
    }
}

fn apply_fog_density(params: Res<TunableParams>, mut fog_query: Query<&mut DistanceFog>) {
    for mut fog in &mut fog_query {
        fog.falloff = FogFalloff::ExponentialSquared {
            density: params.fog_density,
        };
    }
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let a_linear = a.to_linear();
    let b_linear = b.to_linear();
    let s = 1.0 - t;

    Color::linear_rgb(
        a_linear.red * s + b_linear.red * t,
        a_linear.green * s + b_linear.green * t,
        a_linear.blue * s + b_linear.blue * t,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::{TimePlugin, TimeUpdateStrategy};
    use std::time::Duration;

    fn sky_test_app() -> App {
        let mut app = App::new();
        app.init_resource::<TunableParams>()
            .init_resource::<DayNightConfig>()
            .init_resource::<SkyState>()
            .insert_resource(ClearColor(Color::BLACK))
            .insert_resource(Time::<Real>::default())
            .add_systems(
                Update,
                (advance_sky, update_sun_position, update_sky_color).chain(),
            )
            .add_systems(
                Update,
                (apply_sun_intensity, apply_fog_density)
                    .run_if(resource_changed::<TunableParams>),
            );
        app
    }

    #[test]
    fn test_phase_strictly_increases_for_positive_speed() {
        for speed in [0.1, 1.0, 5.0] {
            let mut prev = sun_phase(0.0, 0.1, speed);
            for step in 1..1000 {
                let t = sun_phase(step as f32 * 0.25, 0.1, speed);
                assert!(t > prev, "phase did not increase at step {} (speed {})", step, speed);
                prev = t;
            }
        }
    }

    #[test]
    fn test_sun_never_drops_below_floor() {
        let config = DayNightConfig::default();
        for i in 0..2000 {
            let phase = i as f32 * 0.01 - 5.0;
            let pos = config.sun_position(phase);
            assert!(pos.y >= config.min_sun_height, "sun at {:?} for phase {}", pos, phase);
        }
    }

    #[test]
    fn test_day_fraction_bounds() {
        let config = DayNightConfig::default();
        assert_eq!(config.day_fraction(10.0), 0.0);
        assert_eq!(config.day_fraction(60.0), 1.0);
        assert_eq!(config.day_fraction(35.0), 0.5);
        assert_eq!(config.day_fraction(-40.0), 0.0);
        assert_eq!(config.day_fraction(1000.0), 1.0);

        for i in 0..=100 {
            let f = config.day_fraction(10.0 + i as f32 * 0.5);
            assert!((0.0..=1.0).contains(&f));
        }
    }

    #[test]
    fn test_sky_color_endpoints_are_exact() {
        let config = DayNightConfig::default();
        assert_eq!(config.sky_color(0.0).to_linear(), config.sky_dusk.to_linear());
        assert_eq!(config.sky_color(1.0).to_linear(), config.sky_day.to_linear());
    }

    #[test]
    fn test_sky_color_is_monotonic_per_channel() {
        let config = DayNightConfig::default();
        let dusk = config.sky_dusk.to_linear();
        let day = config.sky_day.to_linear();

        let mut prev = config.sky_color(0.0).to_linear();
        for i in 1..=20 {
            let c = config.sky_color(i as f32 / 20.0).to_linear();
            for (p, n, a, b) in [
                (prev.red, c.red, dusk.red, day.red),
                (prev.green, c.green, dusk.green, day.green),
                (prev.blue, c.blue, dusk.blue, day.blue),
            ] {
                if b >= a {
                    assert!(n >= p);
                } else {
                    assert!(n <= p);
                }
            }
            prev = c;
        }
    }

    #[test]
    fn test_cycle_start_is_dusk() {
        let config = DayNightConfig::default();
        let sky = config.tick(0.0, 1.0);

        assert_eq!(sky.phase, 0.0);
        assert_eq!(sky.sun_position, Vec3::new(60.0, 10.0, 0.0));
        assert_eq!(sky.day_fraction, 0.0);
        assert_eq!(sky.sky_color.to_linear(), config.sky_dusk.to_linear());
    }

    #[test]
    fn test_quarter_orbit_is_full_day() {
        let config = DayNightConfig::default();
        // phase = pi/2 puts the sun at the top of its orbit
        let elapsed = std::f32::consts::FRAC_PI_2 / config.time_scale;
        let sky = config.tick(elapsed, 1.0);

        assert!((sky.sun_position.y - 60.0).abs() < 1e-3);
        assert!(sky.day_fraction > 0.999);
    }

    #[test]
    fn test_fog_matches_background_after_update() {
        let mut app = sky_test_app();
        let fog = app.world_mut().spawn(DistanceFog::default()).id();

        for secs in [0.0, 3.0, 9.0, 14.0, 40.0] {
            app.world_mut()
                .resource_mut::<Time<Real>>()
                .advance_to(Duration::from_secs_f32(secs));
            app.update();

            let background = app.world().resource::<ClearColor>().0;
            let fog_color = app.world().get::<DistanceFog>(fog).map(|f| f.color);
            assert_eq!(fog_color, Some(background));
            assert_eq!(background, app.world().resource::<SkyState>().sky_color);
        }
    }

    #[test]
    fn test_phase_keeps_wall_clock_across_long_frames() {
        let mut app = App::new();
        app.add_plugins(TimePlugin)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs(5)))
            .init_resource::<TunableParams>()
            .init_resource::<DayNightConfig>()
            .init_resource::<SkyState>()
            .add_systems(Update, advance_sky);

        for _ in 0..4 {
            app.update();
        }

        let real = app.world().resource::<Time<Real>>().elapsed_secs();
        let virtual_elapsed = app.world().resource::<Time<Virtual>>().elapsed_secs();
        assert!(real >= 10.0);
        // Each 5 s frame is clamped on the virtual clock
        assert!(virtual_elapsed < real);

        let phase = app.world().resource::<SkyState>().phase;
        let expected = real * DayNightConfig::default().time_scale;
        assert!((phase - expected).abs() < 1e-4, "phase {} vs {}", phase, expected);
    }

    #[test]
    fn test_sun_follows_orbit() {
        let mut app = sky_test_app();
        let sun = app
            .world_mut()
            .spawn((DirectionalLight::default(), Transform::default(), Sun))
            .id();

        app.world_mut()
            .resource_mut::<Time<Real>>()
            .advance_to(Duration::from_secs(10));
        app.update();

        let expected = DayNightConfig::default().sun_position(1.0);
        let actual = app.world().get::<Transform>(sun).map(|t| t.translation);
        let actual = actual.unwrap_or(Vec3::NAN);
        assert!((actual - expected).length() < 1e-3);
    }

    #[test]
    fn test_tunables_reach_sun_and_fog() {
        let mut app = sky_test_app();
        let sun = app
            .world_mut()
            .spawn((DirectionalLight::default(), Transform::default(), Sun))
            .id();
        let fog = app.world_mut().spawn(DistanceFog::default()).id();

        app.world_mut().resource_mut::<TunableParams>().sun_intensity = 0.5;
        app.world_mut().resource_mut::<TunableParams>().fog_density = 0.004;
        app.update();

        let lux = app.world().get::<DirectionalLight>(sun).map(|l| l.illuminance);
        assert_eq!(lux, Some(0.5 * DayNightConfig::default().sun_lux_per_unit));

        match app.world().get::<DistanceFog>(fog).map(|f| f.falloff.clone()) {
            Some(FogFalloff::ExponentialSquared { density }) => assert_eq!(density, 0.004),
            other => panic!("unexpected fog falloff {:?}", other),
        }
    }
}
