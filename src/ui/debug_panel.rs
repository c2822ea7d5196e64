//! Tunable-parameter panel.
//!
//! An egui window with one slider per tunable. Edits are written back only
//! when a value actually changed, so systems gated on
//! `resource_changed::<TunableParams>` act as the sliders' on-change hooks.
//! F1 toggles the panel.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::camera::OrbitInputBlocked;
use crate::tunables::{
    SliderRange, TunableParams, FOG_DENSITY_RANGE, LAMP_INTENSITY_RANGE, SUN_INTENSITY_RANGE,
    SUN_SPEED_RANGE,
};

pub struct DebugPanelPlugin;

impl Plugin for DebugPanelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugPanelVisible>()
            .add_systems(Update, (toggle_debug_panel, debug_panel_ui).chain());
    }
}

/// Whether the tunables panel is shown.
#[derive(Resource)]
pub struct DebugPanelVisible(pub bool);

impl Default for DebugPanelVisible {
    fn default() -> Self {
        Self(true)
    }
}

fn toggle_debug_panel(keys: Res<ButtonInput<KeyCode>>, mut visible: ResMut<DebugPanelVisible>) {
    if keys.just_pressed(KeyCode::F1) {
        visible.0 = !visible.0;
        info!("Debug panel: {}", if visible.0 { "ON" } else { "OFF" });
    }
}

fn debug_panel_ui(
    mut contexts: EguiContexts,
    visible: Res<DebugPanelVisible>,
    mut params: ResMut<TunableParams>,
    mut orbit_blocked: ResMut<OrbitInputBlocked>,
) {
    if !visible.0 {
        orbit_blocked.0 = false;
        return;
    }

    let ctx = contexts.ctx_mut();
    let mut edited = *params;
    if show_panel(ctx, &mut edited) {
        params.set_if_neq(edited.clamped());
    }
    orbit_blocked.0 = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
}

/// Draw the controls window. Returns true if the user moved a slider.
pub fn show_panel(ctx: &egui::Context, params: &mut TunableParams) -> bool {
    let mut changed = false;
    egui::Window::new("Campus Controls")
        .resizable(false)
        .default_width(260.0)
        .show(ctx, |ui| {
            changed = draw_tunables(ui, params);
        });
    changed
}

/// One slider per tunable. Returns true if any value moved.
pub fn draw_tunables(ui: &mut egui::Ui, params: &mut TunableParams) -> bool {
    let mut changed = false;
    changed |= slider(ui, "sun speed", &mut params.sun_speed, &SUN_SPEED_RANGE);
    changed |= slider(ui, "sun intensity", &mut params.sun_intensity, &SUN_INTENSITY_RANGE);
    changed |= slider(ui, "fog density", &mut params.fog_density, &FOG_DENSITY_RANGE);
    changed |= slider(ui, "lamp intensity", &mut params.lamp_intensity, &LAMP_INTENSITY_RANGE);
    changed
}

// Snap on user edits only; drawing must not move off-grid defaults
fn slider(ui: &mut egui::Ui, label: &str, value: &mut f32, range: &SliderRange) -> bool {
    let changed = ui
        .add(egui::Slider::new(value, range.range()).text(label))
        .changed();
    if changed {
        *value = range.snap(*value);
    }
    changed
}
