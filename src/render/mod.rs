//! Scene content: procedural textures, static layout, lamps and the sky cycle.

use bevy::prelude::*;

pub mod campus_layout;
pub mod day_night;
pub mod procedural_textures;
pub mod street_lamps;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(procedural_textures::ProceduralTexturesPlugin)
            .add_plugins(day_night::DayNightPlugin)
            .add_plugins(campus_layout::CampusLayoutPlugin)
            .add_plugins(street_lamps::StreetLampsPlugin);
    }
}
