//! Writes a 360 degree turn of a bumpy sphere as numbered PNG frames.
//!
//! Frames land in `rotation/frame_NNNN.png`; feed them to any video encoder
//! at the configured frame rate, e.g.
//! `ffmpeg -framerate 24 -i rotation/frame_%04d.png rotation.mp4`.

use std::f32::consts::PI;

use brainsnap::*;

fn bumpy_sphere() -> Result<GeometryModel> {
    let (rings, segments) = (40u32, 64u32);
    let mut vertices = Vec::new();
    for i in 0..=rings {
        let theta = PI * i as f32 / rings as f32;
        for j in 0..segments {
            let phi = 2.0 * PI * j as f32 / segments as f32;
            let r = 1.0 + 0.08 * (5.0 * phi).sin() * (4.0 * theta).sin();
            vertices.push([
                r * theta.sin() * phi.cos(),
                r * theta.sin() * phi.sin(),
                r * theta.cos(),
            ]);
        }
    }
    let mut faces = Vec::new();
    for i in 0..rings {
        for j in 0..segments {
            let a = i * segments + j;
            let b = i * segments + (j + 1) % segments;
            faces.push([a, a + segments, b]);
            faces.push([b, a + segments, b + segments]);
        }
    }
    GeometryModel::from_arrays(&vertices, &faces)
}

fn main() -> Result<()> {
    init_logging();

    let mesh = bumpy_sphere()?;
    let overlay = mesh.vertices().iter().map(|v| 3.0 * v.x * v.z).collect();
    let scalars = ScalarField::new(&mesh).with_overlay(overlay)?;

    let options = SnapOptions::default()
        .with_size(480, 360)
        .with_colormap(ColorMapKind::CoolWarm)
        .with_rotation(72, 24);
    let mut compositor = headless_compositor(&options)?;
    let mut sink = PngSink::new("rotation", "frame")?;

    let written = snap_rotation(&mut compositor, &mesh, &scalars, &options, &mut sink)?;
    log::info!(
        "wrote {written} frames for playback at {} fps",
        options.rotation.fps
    );
    Ok(())
}
