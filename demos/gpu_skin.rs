//! Skin the same mesh on CPU and GPU and confirm the two paths agree.

use armature::{GpuContext, Mat4, Quat, SkinBatch, SkinPalette, SkinPass, SkinnedVertex, Vec3};

fn main() {
    let palette = SkinPalette::from_matrices(vec![
        Mat4::IDENTITY,
        Mat4::from_rotation_translation(Quat::from_rotation_y(0.8), Vec3::new(0.0, 1.5, 0.0)),
        Mat4::from_rotation_z(-0.4),
        Mat4::from_translation(Vec3::new(2.0, 0.0, -1.0)),
    ]);

    // A deterministic cloud of vertices with varied weight patterns,
    // including drifted sums and unskinned stragglers.
    let vertices: Vec<SkinnedVertex> = (0u32..10_000)
        .map(|i| {
            let t = i as f32 * 0.37;
            let w0 = (t.sin().abs() * 0.6) + 0.1;
            let w1 = t.cos().abs() * 0.5;
            let weights = if i % 97 == 0 {
                [0.0; 4]
            } else {
                [w0, w1, 1.0 - w0.min(1.0), 0.0]
            };
            SkinnedVertex::new(
                [t.sin() * 2.0, i as f32 * 1e-3, t.cos() * 2.0],
                [0.0, 1.0, 0.0],
                [1.0, 0.0, 0.0, -1.0],
                [i % 4, (i + 1) % 4, (i + 2) % 4, 0],
                weights,
            )
        })
        .collect();

    let cpu = SkinBatch::new(&vertices, &palette)
        .run_parallel()
        .expect("all joint indices are in range");

    let gpu = GpuContext::new();
    let pass = SkinPass::new(&gpu);
    let gpu_skinned = pass
        .skin(&gpu, &vertices, &palette, 0)
        .expect("same batch already validated on the CPU");

    let mut worst = 0.0f32;
    for (a, b) in cpu.iter().zip(&gpu_skinned) {
        for lane in 0..3 {
            worst = worst.max((a.position[lane] - b.position[lane]).abs());
            worst = worst.max((a.normal[lane] - b.normal[lane]).abs());
        }
    }

    println!(
        "skinned {} vertices on both paths, worst component delta {worst:e}",
        vertices.len()
    );
    assert!(worst < 1e-5, "CPU and GPU skinning diverged");
    println!("CPU and GPU agree");
}
