//! Static campus layout: ground, roads, parking lot and buildings.
//!
//! The layout is a fixed table of [`PlacedObject`]s instantiated once the
//! procedural textures exist. Buildings carry their label text so the label
//! overlay can bind to them.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

use bevy::{pbr::NotShadowCaster, prelude::*};

use crate::render::procedural_textures::{CampusTextures, TiledTexture};

pub struct CampusLayoutPlugin;

impl Plugin for CampusLayoutPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CampusLayoutSpawned>()
            .add_systems(Update, spawn_campus_layout.run_if(should_spawn_layout));
    }
}

/// Marker that the layout has been spawned (prevents re-running).
#[derive(Resource, Default)]
pub struct CampusLayoutSpawned(pub bool);

fn should_spawn_layout(textures: Option<Res<CampusTextures>>, spawned: Res<CampusLayoutSpawned>) -> bool {
    textures.is_some() && !spawned.0
}

/// Surface look of a placed object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceMaterial {
    Grass,
    Road,
    Parking,
    Building,
}

/// Geometry of a placed object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Flat horizontal rectangle, width along X and depth along Z.
    Plane(Vec2),
    /// Axis-aligned box before rotation.
    Box(Vec3),
}

/// One entry of the layout table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedObject {
    pub position: Vec3,
    pub shape: Shape,
    /// Rotation around the vertical axis, radians.
    pub rotation: f32,
    pub material: SurfaceMaterial,
    pub label: Option<&'static str>,
}

impl PlacedObject {
    const fn plane(position: Vec3, size: Vec2, rotation: f32, material: SurfaceMaterial) -> Self {
        Self {
            position,
            shape: Shape::Plane(size),
            rotation,
            material,
            label: None,
        }
    }

    const fn building(position: Vec3, size: Vec3, rotation: f32, name: &'static str) -> Self {
        Self {
            position,
            shape: Shape::Box(size),
            rotation,
            material: SurfaceMaterial::Building,
            label: Some(name),
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(Quat::from_rotation_y(self.rotation))
    }

    pub fn mesh(&self) -> Mesh {
        match self.shape {
            Shape::Plane(size) => Plane3d::default().mesh().size(size.x, size.y).build(),
            Shape::Box(size) => Cuboid::new(size.x, size.y, size.z).into(),
        }
    }
}

// Surfaces are layered slightly apart to avoid z-fighting
pub static GROUND: PlacedObject = PlacedObject::plane(
    Vec3::ZERO,
    Vec2::new(75.0, 75.0),
    0.0,
    SurfaceMaterial::Grass,
);

pub static ROADS: [PlacedObject; 3] = [
    PlacedObject::plane(Vec3::new(0.0, 0.03, -10.0), Vec2::new(75.0, 8.0), 0.0, SurfaceMaterial::Road),
    PlacedObject::plane(Vec3::new(10.0, 0.03, 13.0), Vec2::new(55.0, 8.0), -FRAC_PI_3, SurfaceMaterial::Road),
    PlacedObject::plane(Vec3::new(-10.0, 0.03, 13.0), Vec2::new(50.0, 8.0), FRAC_PI_2, SurfaceMaterial::Road),
];

pub static PARKING_LOT: PlacedObject = PlacedObject::plane(
    Vec3::new(18.0, 0.04, -25.75),
    Vec2::new(25.0, 23.5),
    0.0,
    SurfaceMaterial::Parking,
);

pub static BUILDINGS: [PlacedObject; 4] = [
    PlacedObject::building(Vec3::new(-15.0, 2.0, -23.0), Vec3::new(25.0, 8.0, 14.0), 0.0, "Rectorate"),
    PlacedObject::building(Vec3::new(14.0, 2.0, 2.0), Vec3::new(8.0, 4.0, 6.0), -FRAC_PI_3, "Repair Building"),
    PlacedObject::building(Vec3::new(24.0, 2.0, 20.0), Vec3::new(8.0, 4.0, 6.0), -FRAC_PI_3, "Tech Park"),
    PlacedObject::building(Vec3::new(0.0, 2.0, 20.0), Vec3::new(22.0, 4.0, 6.0), -FRAC_PI_3, "Student Services"),
];

/// Every placed object in spawn order.
pub fn campus_layout() -> impl Iterator<Item = &'static PlacedObject> {
    std::iter::once(&GROUND)
        .chain(ROADS.iter())
        .chain(std::iter::once(&PARKING_LOT))
        .chain(BUILDINGS.iter())
}

/// A labelled building.
#[derive(Component, Clone, Debug)]
pub struct CampusBuilding {
    pub name: &'static str,
}

/// Material handles shared by every object of the same surface type.
struct CampusMaterials {
    grass: Handle<StandardMaterial>,
    road: Handle<StandardMaterial>,
    parking: Handle<StandardMaterial>,
    building: Handle<StandardMaterial>,
}

impl CampusMaterials {
    fn new(textures: &CampusTextures, materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            grass: materials.add(textured_material(Color::srgb_u8(0x2e, 0x8b, 0x57), &textures.grass)),
            road: materials.add(StandardMaterial {
                base_color: Color::srgb_u8(0x80, 0x80, 0x80),
                perceptual_roughness: 1.0,
                ..default()
            }),
            parking: materials.add(textured_material(Color::WHITE, &textures.parking)),
            building: materials.add(StandardMaterial {
                base_color: Color::srgb_u8(0xe6, 0xff, 0xff),
                perceptual_roughness: 0.35,
                metallic: 0.1,
                ..default()
            }),
        }
    }

    fn get(&self, material: SurfaceMaterial) -> Handle<StandardMaterial> {
        match material {
            SurfaceMaterial::Grass => self.grass.clone(),
            SurfaceMaterial::Road => self.road.clone(),
            SurfaceMaterial::Parking => self.parking.clone(),
            SurfaceMaterial::Building => self.building.clone(),
        }
    }
}

fn textured_material(tint: Color, texture: &TiledTexture) -> StandardMaterial {
    StandardMaterial {
        base_color: tint,
        base_color_texture: Some(texture.image.clone()),
        uv_transform: texture.uv_transform(),
        perceptual_roughness: 1.0,
        ..default()
    }
}

fn spawn_campus_layout(
    mut commands: Commands,
    textures: Res<CampusTextures>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut spawned: ResMut<CampusLayoutSpawned>,
) {
    let campus_materials = CampusMaterials::new(&textures, &mut materials);

    let mut surface_count = 0;
    let mut building_count = 0;

    for object in campus_layout() {
        let mut entity = commands.spawn((
            Mesh3d(meshes.add(object.mesh())),
            MeshMaterial3d(campus_materials.get(object.material)),
            object.transform(),
        ));

        match object.shape {
            // Flat surfaces only receive shadows
            Shape::Plane(_) => {
                entity.insert(NotShadowCaster);
                surface_count += 1;
            }
            Shape::Box(_) => building_count += 1,
        }

        if let Some(name) = object.label {
            entity.insert(CampusBuilding { name });
        }
    }

    spawned.0 = true;
    info!(
        "Campus layout spawned: {} surfaces, {} buildings",
        surface_count, building_count
    );
}
