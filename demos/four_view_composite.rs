//! Four-view composite of two synthetic hemispheres.
//!
//! Each hemisphere is a flattened sphere carrying a signed wave overlay and a
//! sulcal-style background map. Writes `four_view.png`.

use std::f32::consts::PI;

use brainsnap::*;

/// Builds an ellipsoid offset along x, standing in for one hemisphere.
fn hemisphere(offset_x: f32) -> Result<GeometryModel> {
    let (rings, segments) = (32u32, 48u32);
    let mut vertices = Vec::new();
    for i in 0..=rings {
        let theta = PI * i as f32 / rings as f32;
        for j in 0..segments {
            let phi = 2.0 * PI * j as f32 / segments as f32;
            vertices.push([
                offset_x + 0.6 * theta.sin() * phi.cos(),
                1.2 * theta.sin() * phi.sin(),
                0.9 * theta.cos(),
            ]);
        }
    }
    let mut faces = Vec::new();
    for i in 0..rings {
        for j in 0..segments {
            let a = i * segments + j;
            let b = i * segments + (j + 1) % segments;
            let c = a + segments;
            let d = b + segments;
            faces.push([a, c, b]);
            faces.push([b, c, d]);
        }
    }
    GeometryModel::from_arrays(&vertices, &faces)
}

fn scalars(mesh: &GeometryModel, phase: f32) -> Result<ScalarField> {
    let overlay = mesh
        .vertices()
        .iter()
        .map(|v| 4.0 * (3.0 * v.y + phase).sin() * v.z.cos())
        .collect();
    let background = mesh
        .vertices()
        .iter()
        .map(|v| (8.0 * v.y).sin() * (6.0 * v.z).cos())
        .collect();
    ScalarField::new(mesh)
        .with_overlay(overlay)?
        .with_background(background)
}

fn main() -> Result<()> {
    init_logging();

    let lh = hemisphere(-0.7)?;
    let rh = hemisphere(0.7)?;
    let lh_scalars = scalars(&lh, 0.0)?;
    let rh_scalars = scalars(&rh, 1.5)?;

    let options = SnapOptions::default()
        .with_size(500, 400)
        .with_thresholds(1.0, 3.5)
        .with_caption("synthetic wave");
    let mut compositor = headless_compositor(&options)?;

    let image = snap_four_view(
        &mut compositor,
        HemisphereInput::new(&lh, &lh_scalars),
        HemisphereInput::new(&rh, &rh_scalars),
        &options,
    )?;
    save_frame_png("four_view.png", &image)?;
    Ok(())
}
