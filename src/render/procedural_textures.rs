//! Procedural surface texture generation.
//!
//! Builds the grass and parking-lot textures at runtime without external
//! assets. Each texture is an RGBA8 pixel buffer drawn once from a
//! [`TextureSpec`] and uploaded as a repeat-wrapped image; the repeat factors
//! travel with the handle and end up in the material's UV transform.

use bevy::{
    image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor},
    prelude::*,
    render::{
        render_asset::RenderAssetUsages,
        render_resource::{Extent3d, TextureDimension, TextureFormat},
    },
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Edge length of every generated texture.
pub const TEXTURE_SIZE: u32 = 256;

pub struct ProceduralTexturesPlugin;

impl Plugin for ProceduralTexturesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TextureSeeds>()
            .add_systems(Startup, generate_campus_textures);
    }
}

/// Seeds for the randomized textures. Fixed seeds give a reproducible scene.
#[derive(Resource, Clone, Copy, Debug)]
pub struct TextureSeeds {
    pub grass: u64,
}

impl Default for TextureSeeds {
    fn default() -> Self {
        Self { grass: 20_080_040 }
    }
}

/// What gets drawn on top of the base fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PatternKind {
    /// Translucent line segments between random points.
    RandomStreaks {
        streak_count: u32,
        streak_color: [u8; 3],
        opacity: f32,
    },
    /// Evenly spaced full-width bands, each half a period tall.
    HorizontalStripes {
        stripe_count: u32,
        stripe_color: [u8; 3],
    },
}

/// Description of one procedural texture.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureSpec {
    pub width: u32,
    pub height: u32,
    pub base_color: [u8; 3],
    pub pattern: PatternKind,
    /// How many times the texture repeats across the surface in U and V.
    pub repeat: Vec2,
    /// Seed for the random source. Ignored by deterministic patterns.
    pub seed: u64,
}

impl TextureSpec {
    /// Dark green ground with faint darker streaks.
    pub fn grass(seed: u64) -> Self {
        Self {
            width: TEXTURE_SIZE,
            height: TEXTURE_SIZE,
            base_color: [0x2e, 0x8b, 0x57],
            pattern: PatternKind::RandomStreaks {
                streak_count: 100,
                streak_color: [20, 80, 40],
                opacity: 0.1,
            },
            repeat: Vec2::splat(4.0),
            seed,
        }
    }

    /// Grey asphalt with white parking bay stripes.
    pub fn parking() -> Self {
        Self {
            width: TEXTURE_SIZE,
            height: TEXTURE_SIZE,
            base_color: [0x66, 0x66, 0x66],
            pattern: PatternKind::HorizontalStripes {
                stripe_count: 10,
                stripe_color: [255, 255, 255],
            },
            repeat: Vec2::ONE,
            seed: 0,
        }
    }
}

/// Immutable RGBA8 pixels produced from a [`TextureSpec`].
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl PixelBuffer {
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self {
            width,
            height,
            pixels: vec![[color[0], color[1], color[2], 255]; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Source-over blend of `color` at `alpha` into one pixel. Coordinates wrap
    /// so drawing across an edge continues on the opposite side.
    fn blend(&mut self, x: i64, y: i64, color: [u8; 3], alpha: f32) {
        let x = x.rem_euclid(self.width as i64) as u32;
        let y = y.rem_euclid(self.height as i64) as u32;
        let idx = (y * self.width + x) as usize;
        let dst = &mut self.pixels[idx];
        for channel in 0..3 {
            let mixed = dst[channel] as f32 * (1.0 - alpha) + color[channel] as f32 * alpha;
            dst[channel] = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Draw a texture from its spec.
pub fn generate(spec: &TextureSpec) -> PixelBuffer {
    let mut buffer = PixelBuffer::filled(spec.width, spec.height, spec.base_color);

    match spec.pattern {
        PatternKind::RandomStreaks {
            streak_count,
            streak_color,
            opacity,
        } => {
            let mut rng = StdRng::seed_from_u64(spec.seed);
            random_streaks(&mut buffer, streak_count, streak_color, opacity, &mut rng);
        }
        PatternKind::HorizontalStripes {
            stripe_count,
            stripe_color,
        } => horizontal_stripes(&mut buffer, stripe_color, stripe_count),
    }

    buffer
}

/// Stroke `streak_count` one-pixel segments between random points.
pub fn random_streaks(
    buffer: &mut PixelBuffer,
    streak_count: u32,
    streak_color: [u8; 3],
    opacity: f32,
    rng: &mut impl Rng,
) {
    if buffer.pixels.is_empty() {
        return;
    }
    let w = buffer.width as f32;
    let h = buffer.height as f32;

    for _ in 0..streak_count {
        let start = Vec2::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));
        let end = Vec2::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));

        // One sample per pixel step along the major axis
        let delta = end - start;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let p = start + delta * (i as f32 / steps as f32);
            buffer.blend(p.x.floor() as i64, p.y.floor() as i64, streak_color, opacity);
        }
    }
}

/// Vertical extents `(top, bottom)` of each stripe. The band height is
/// `height / (stripe_count * 2)` and band `i` starts at `i * height / stripe_count`.
pub fn stripe_bands(height: u32, stripe_count: u32) -> Vec<(f32, f32)> {
    if stripe_count == 0 {
        return Vec::new();
    }
    let band = height as f32 / (stripe_count * 2) as f32;
    (0..stripe_count)
        .map(|i| {
            let top = (i * height) as f32 / stripe_count as f32;
            (top, top + band)
        })
        .collect()
}

/// Fill full-width stripes. Rows only partly covered by a band get the
/// stripe color blended by their coverage.
pub fn horizontal_stripes(buffer: &mut PixelBuffer, stripe_color: [u8; 3], stripe_count: u32) {
    let bands = stripe_bands(buffer.height, stripe_count);

    for y in 0..buffer.height {
        let row_top = y as f32;
        let row_bottom = row_top + 1.0;
        let coverage: f32 = bands
            .iter()
            .map(|&(top, bottom)| (bottom.min(row_bottom) - top.max(row_top)).max(0.0))
            .sum();
        if coverage <= 0.0 {
            continue;
        }
        let alpha = coverage.min(1.0);
        for x in 0..buffer.width {
            buffer.blend(x as i64, y as i64, stripe_color, alpha);
        }
    }
}

/// Upload a pixel buffer as a repeat-wrapped sRGB image.
pub fn to_image(buffer: &PixelBuffer) -> Image {
    let mut image = Image::new(
        Extent3d {
            width: buffer.width,
            height: buffer.height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        buffer.as_bytes().to_vec(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..default()
    });
    image
}

/// Image handle plus the repeat factors the material should apply.
#[derive(Clone, Debug)]
pub struct TiledTexture {
    pub image: Handle<Image>,
    pub repeat: Vec2,
}

impl TiledTexture {
    /// UV transform that tiles the texture `repeat` times across a surface.
    pub fn uv_transform(&self) -> bevy::math::Affine2 {
        bevy::math::Affine2::from_scale(self.repeat)
    }
}

/// Generated surface textures, inserted once at startup.
#[derive(Resource, Clone, Debug)]
pub struct CampusTextures {
    pub grass: TiledTexture,
    pub parking: TiledTexture,
}

fn generate_campus_textures(
    mut commands: Commands,
    seeds: Res<TextureSeeds>,
    mut images: ResMut<Assets<Image>>,
) {
    let grass_spec = TextureSpec::grass(seeds.grass);
    let parking_spec = TextureSpec::parking();

    let grass = TiledTexture {
        image: images.add(to_image(&generate(&grass_spec))),
        repeat: grass_spec.repeat,
    };
    let parking = TiledTexture {
        image: images.add(to_image(&generate(&parking_spec))),
        repeat: parking_spec.repeat,
    };

    commands.insert_resource(CampusTextures { grass, parking });

    info!(
        "Campus textures generated: {}x{} grass (seed {}), {}x{} parking",
        grass_spec.width, grass_spec.height, seeds.grass, parking_spec.width, parking_spec.height
    );
}
