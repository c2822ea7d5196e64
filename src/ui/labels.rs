//! Floating building name labels.
//!
//! Each labelled building gets a UI node whose position is re-projected from
//! a 3D anchor above the building every frame. Labels behind the camera or
//! past the camera's far distance are hidden.

use bevy::{picking::PickingBehavior, prelude::*};

use crate::camera::OrbitCamera;
use crate::render::campus_layout::CampusBuilding;

pub struct LabelsPlugin;

impl Plugin for LabelsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (spawn_building_labels, update_label_positions).chain());
    }
}

/// Height of the label anchor above the building's origin.
pub const LABEL_HEIGHT_OFFSET: f32 = 5.0;

/// Layout box around each label; the text sits bottom-centre inside it.
const LABEL_BOX: Vec2 = Vec2::new(240.0, 32.0);

/// A label node and the world point it follows.
#[derive(Component, Debug)]
pub struct BuildingLabel {
    pub anchor: Vec3,
}

/// Where a label lands on screen for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPlacement {
    /// Logical pixels from the top-left corner.
    pub screen: Vec2,
    pub visible: bool,
}

/// World point to normalized device coordinates.
pub fn project_to_ndc(clip_from_world: Mat4, world: Vec3) -> Option<Vec3> {
    let ndc = clip_from_world.project_point3(world);
    (!ndc.is_nan()).then_some(ndc)
}

/// Forward depth: 0 at the near plane, approaching 1 at infinity, above 1
/// behind the camera. The engine stores reversed depth with an infinite far
/// plane, hence the flip; distance culling is done by [`place_label`].
pub fn normalized_depth(ndc: Vec3) -> f32 {
    1.0 - ndc.z
}

/// NDC to logical pixels with the origin at the top-left corner.
pub fn ndc_to_screen(ndc: Vec3, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (ndc.x + 1.0) / 2.0 * viewport.x,
        (1.0 - ndc.y) / 2.0 * viewport.y,
    )
}

/// Distance of a world point in front of the camera along its view axis.
pub fn view_distance(view_from_world: Mat4, world: Vec3) -> f32 {
    -view_from_world.transform_point3(world).z
}

/// Screen placement for a projected anchor. `distance` is the anchor's view
/// distance; anything beyond `far` is hidden.
pub fn place_label(ndc: Option<Vec3>, distance: f32, far: f32, viewport: Vec2) -> LabelPlacement {
    match ndc {
        Some(ndc) => LabelPlacement {
            screen: ndc_to_screen(ndc, viewport),
            visible: normalized_depth(ndc) <= 1.0 && distance <= far,
        },
        None => LabelPlacement {
            screen: Vec2::ZERO,
            visible: false,
        },
    }
}

fn spawn_building_labels(
    mut commands: Commands,
    buildings: Query<(&CampusBuilding, &Transform), Added<CampusBuilding>>,
) {
    let mut count = 0;
    for (building, transform) in &buildings {
        commands
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    width: Val::Px(LABEL_BOX.x),
                    height: Val::Px(LABEL_BOX.y),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::FlexEnd,
                    ..default()
                },
                Visibility::Hidden,
                PickingBehavior::IGNORE,
                BuildingLabel {
                    anchor: transform.translation + Vec3::Y * LABEL_HEIGHT_OFFSET,
                },
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text::new(building.name),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    Node {
                        padding: UiRect::all(Val::Px(4.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                    BorderRadius::all(Val::Px(4.0)),
                    PickingBehavior::IGNORE,
                ));
            });
        count += 1;
    }

    if count > 0 {
        info!("Registered {} building labels", count);
    }
}

fn update_label_positions(
    camera_query: Query<(&Camera, &GlobalTransform, &Projection), With<OrbitCamera>>,
    mut labels: Query<(&BuildingLabel, &mut Node, &mut Visibility)>,
) {
    let Ok((camera, camera_transform, projection)) = camera_query.get_single() else {
        return;
    };
    let Some(viewport) = camera.logical_viewport_size() else {
        return;
    };
    let far = match projection {
        Projection::Perspective(perspective) => perspective.far,
        Projection::Orthographic(orthographic) => orthographic.far,
    };
    let view_from_world = camera_transform.compute_matrix().inverse();
    let clip_from_world = camera.clip_from_view() * view_from_world;

    for (label, mut node, mut visibility) in &mut labels {
        let placement = place_label(
            project_to_ndc(clip_from_world, label.anchor),
            view_distance(view_from_world, label.anchor),
            far,
            viewport,
        );

        // Anchor the box's bottom-centre on the projected point
        node.left = Val::Px(placement.screen.x - LABEL_BOX.x / 2.0);
        node.top = Val::Px(placement.screen.y - LABEL_BOX.y);
        *visibility = if placement.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

    const FAR: f32 = 1000.0;

    fn view() -> Mat4 {
        Mat4::look_at_rh(Vec3::new(70.0, 40.0, 70.0), Vec3::ZERO, Vec3::Y)
    }

    fn campus_view() -> Mat4 {
        let projection =
            Mat4::perspective_infinite_reverse_rh(60f32.to_radians(), VIEWPORT.x / VIEWPORT.y, 0.1);
        projection * view()
    }

    fn place(anchor: Vec3) -> LabelPlacement {
        place_label(
            project_to_ndc(campus_view(), anchor),
            view_distance(view(), anchor),
            FAR,
            VIEWPORT,
        )
    }

    #[test]
    fn test_ndc_to_screen_corners() {
        assert_eq!(ndc_to_screen(Vec3::ZERO, VIEWPORT), VIEWPORT / 2.0);
        assert_eq!(ndc_to_screen(Vec3::new(-1.0, 1.0, 0.5), VIEWPORT), Vec2::ZERO);
        assert_eq!(ndc_to_screen(Vec3::new(1.0, -1.0, 0.5), VIEWPORT), VIEWPORT);
    }

    #[test]
    fn test_depth_beyond_one_is_hidden() {
        // Reversed depth: ndc.z < 0 means normalized depth > 1
        let behind = place_label(Some(Vec3::new(0.0, 0.0, -0.25)), 10.0, FAR, VIEWPORT);
        assert!(!behind.visible);

        let at_infinity = place_label(Some(Vec3::new(0.0, 0.0, 0.0)), 10.0, FAR, VIEWPORT);
        assert!(at_infinity.visible);

        let near = place_label(Some(Vec3::new(0.3, -0.2, 0.9)), 10.0, FAR, VIEWPORT);
        assert!(near.visible);
        assert_eq!(near.screen, ndc_to_screen(Vec3::new(0.3, -0.2, 0.9), VIEWPORT));

        assert!(!place_label(None, 10.0, FAR, VIEWPORT).visible);
    }

    #[test]
    fn test_building_in_view_is_shown_on_screen() {
        let anchor = Vec3::new(-15.0, 2.0 + LABEL_HEIGHT_OFFSET, -23.0);
        let placement = place(anchor);

        assert!(placement.visible);
        assert!(placement.screen.x > 0.0 && placement.screen.x < VIEWPORT.x);
        assert!(placement.screen.y > 0.0 && placement.screen.y < VIEWPORT.y);
    }

    #[test]
    fn test_point_behind_camera_is_hidden() {
        let behind = Vec3::new(140.0, 80.0, 140.0);
        let placement = place(behind);
        assert!(!placement.visible);
    }

    #[test]
    fn test_label_past_far_distance_is_hidden() {
        // Along the view axis, well past the far distance
        let eye = Vec3::new(70.0, 40.0, 70.0);
        let forward = (Vec3::ZERO - eye).normalize();
        let distant = eye + forward * 1500.0;

        assert!((view_distance(view(), distant) - 1500.0).abs() < 0.1);
        let ndc = project_to_ndc(campus_view(), distant);
        assert!(ndc.map(normalized_depth).is_some_and(|d| d <= 1.0));
        assert!(!place(distant).visible);

        let inside = eye + forward * 900.0;
        assert!(place(inside).visible);
    }

    #[test]
    fn test_higher_anchor_projects_higher_on_screen() {
        let low = place(Vec3::ZERO);
        let high = place(Vec3::Y * 10.0);
        assert!(high.screen.y < low.screen.y);
    }

    #[test]
    fn test_labels_registered_for_new_buildings() {
        let mut app = App::new();
        app.add_plugins(LabelsPlugin);
        app.world_mut().spawn((
            CampusBuilding { name: "Tech Park" },
            Transform::from_xyz(24.0, 2.0, 20.0),
        ));
        app.update();

        let world = app.world_mut();
        let anchors: Vec<Vec3> = world
            .query::<&BuildingLabel>()
            .iter(world)
            .map(|l| l.anchor)
            .collect();
        assert_eq!(anchors, vec![Vec3::new(24.0, 7.0, 20.0)]);

        let texts: Vec<String> = world
            .query::<&Text>()
            .iter(world)
            .map(|t| t.0.clone())
            .collect();
        assert_eq!(texts, vec!["Tech Park".to_string()]);
    }
}
