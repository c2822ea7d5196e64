use criterion::{black_box, criterion_group, criterion_main, Criterion};

use campus_scene::render::procedural_textures::{generate, to_image, TextureSpec};

fn bench_textures(c: &mut Criterion) {
    let grass = TextureSpec::grass(42);
    let parking = TextureSpec::parking();

    c.bench_function("grass_streaks_256", |b| b.iter(|| generate(black_box(&grass))));
    c.bench_function("parking_stripes_256", |b| b.iter(|| generate(black_box(&parking))));

    let buffer = generate(&parking);
    c.bench_function("upload_image_256", |b| b.iter(|| to_image(black_box(&buffer))));
}

criterion_group!(benches, bench_textures);
criterion_main!(benches);
