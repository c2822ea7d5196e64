//! Campus Scene - a small animated 3D campus.
//!
//! Ground, roads, a parking lot and labelled buildings built from a static
//! layout table, procedural grass and parking textures, street lamps, and a
//! sun whose height blends the sky between dusk and day.

use bevy::prelude::*;

pub mod camera;
pub mod render;
pub mod tunables;
pub mod ui;

/// Everything the scene needs on top of `DefaultPlugins`.
pub struct CampusScenePlugin;

impl Plugin for CampusScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(tunables::TunablesPlugin)
            .add_plugins(render::RenderPlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(ui::UiPlugin);
    }
}
