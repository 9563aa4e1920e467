//! Bend a two-joint limb on the CPU and print the deformation.

use armature::{Mat4, SkinBatch, SkinPalette, SkinnedVertex, Vec3, skin_vertex};

fn main() {
    // A strip of vertices up the Y axis, weighted from the root joint at the
    // base to the elbow joint at the top.
    let vertices: Vec<SkinnedVertex> = (0..=10)
        .map(|i| {
            let y = i as f32 * 0.2;
            let elbow_weight = (y / 2.0).clamp(0.0, 1.0);
            SkinnedVertex::new(
                [0.1, y, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 1.0],
                [0, 1, 0, 0],
                [1.0 - elbow_weight, elbow_weight, 0.0, 0.0],
            )
        })
        .collect();

    // The elbow is bound at y = 1 and bends 45 degrees forward.
    let elbow_bind = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0));
    let elbow_world = elbow_bind * Mat4::from_rotation_z(-std::f32::consts::FRAC_PI_4);
    let palette = SkinPalette::from_pose(
        &[Mat4::IDENTITY, elbow_world],
        &[Mat4::IDENTITY, elbow_bind.inverse()],
    )
    .unwrap();

    let skinned = SkinBatch::new(&vertices, &palette)
        .run()
        .expect("limb references only joints 0 and 1");

    println!("   rest position    ->   bent position");
    for (before, after) in vertices.iter().zip(&skinned) {
        let [x0, y0, z0] = before.position;
        let [x1, y1, z1] = after.position;
        println!(
            "({x0:5.2}, {y0:5.2}, {z0:5.2}) -> ({x1:5.2}, {y1:5.2}, {z1:5.2})  weights {:?}",
            before.weights
        );
    }

    // The base vertex is fully root-weighted and should not have moved.
    let base = skin_vertex(&vertices[0], &palette).unwrap();
    assert_eq!(base.position, vertices[0].position);
    println!("\nbase held still, tip swung {:.2} units forward", {
        let tip_rest = Vec3::from_array(vertices[10].position);
        let tip_bent = Vec3::from_array(skinned[10].position);
        (tip_bent - tip_rest).length()
    });
}
