use armature::{Mat4, Quat, SkinBatch, SkinPalette, SkinnedVertex, Vec3};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn test_palette() -> SkinPalette {
    SkinPalette::from_matrices(
        (0..64)
            .map(|i| {
                let t = i as f32 * 0.1;
                Mat4::from_rotation_translation(
                    Quat::from_rotation_y(t),
                    Vec3::new(t.sin(), t * 0.05, t.cos()),
                )
            })
            .collect(),
    )
}

fn test_vertices(count: u32) -> Vec<SkinnedVertex> {
    (0..count)
        .map(|i| {
            let t = i as f32 * 0.61;
            SkinnedVertex::new(
                [t.sin(), t * 1e-4, t.cos()],
                [0.0, 1.0, 0.0],
                [1.0, 0.0, 0.0, 1.0],
                [i % 64, (i + 7) % 64, (i + 19) % 64, (i + 31) % 64],
                [0.4, 0.3, 0.2, 0.1],
            )
        })
        .collect()
}

fn bench_sequential(c: &mut Criterion) {
    let palette = test_palette();
    for count in [1_000u32, 100_000] {
        let vertices = test_vertices(count);
        c.bench_function(&format!("skin_sequential_{count}"), |b| {
            b.iter(|| {
                SkinBatch::new(black_box(&vertices), black_box(&palette))
                    .run()
                    .unwrap()
            });
        });
    }
}

fn bench_parallel(c: &mut Criterion) {
    let palette = test_palette();
    for count in [1_000u32, 100_000] {
        let vertices = test_vertices(count);
        c.bench_function(&format!("skin_parallel_{count}"), |b| {
            b.iter(|| {
                SkinBatch::new(black_box(&vertices), black_box(&palette))
                    .run_parallel()
                    .unwrap()
            });
        });
    }
}

fn bench_run_into(c: &mut Criterion) {
    let palette = test_palette();
    let vertices = test_vertices(100_000);
    let mut output = vertices.clone();
    c.bench_function("skin_run_into_100000", |b| {
        b.iter(|| {
            SkinBatch::new(black_box(&vertices), black_box(&palette))
                .run_into(&mut output)
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_sequential, bench_parallel, bench_run_into);
criterion_main!(benches);
