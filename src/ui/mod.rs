//! Screen-space overlays: building labels and the tunables panel.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod debug_panel;
pub mod labels;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_plugins(labels::LabelsPlugin)
            .add_plugins(debug_panel::DebugPanelPlugin);
    }
}
