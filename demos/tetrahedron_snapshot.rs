//! Renders a single tetrahedron view with a thresholded overlay.
//!
//! Vertex 0 is below threshold and stays grey, vertex 2 saturates.
//! Writes `tetrahedron.png` to the current directory.

use brainsnap::*;

fn main() -> Result<()> {
    init_logging();

    let mesh = GeometryModel::from_arrays(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
        &[[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
    )?;
    let scalars = ScalarField::new(&mesh).with_overlay(vec![0.1, 0.5, 0.9, 0.3])?;

    let options = SnapOptions::default()
        .with_thresholds(0.2, 0.8)
        .with_view(ViewKind::Front);
    let mut compositor = headless_compositor(&options)?;
    let frame = snap_view(&mut compositor, &mesh, &scalars, &options)?;

    save_frame_png("tetrahedron.png", &frame)?;
    Ok(())
}
