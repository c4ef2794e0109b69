//! Compositor integration tests against a stub renderer.
//!
//! The stub paints each frame a flat color derived from the view and the
//! loaded colors, so layout and ordering can be checked without a GPU.

use std::ops::ControlFlow;

use brainsnap::*;
use proptest::prelude::*;

const W: u32 = 40;
const H: u32 = 30;

/// Paints frames with a color identifying (mesh, view, azimuth).
#[derive(Default)]
struct StubRenderer {
    mesh_id: u8,
    loads: usize,
    rendered: Vec<ViewState>,
    fail_at: Option<usize>,
}

impl StubRenderer {
    fn failing_at(frame: usize) -> Self {
        Self {
            fail_at: Some(frame),
            ..Self::default()
        }
    }
}

fn view_code(view: ViewKind) -> u8 {
    match view {
        ViewKind::Left => 1,
        ViewKind::Right => 2,
        ViewKind::Back => 3,
        ViewKind::Front => 4,
        ViewKind::Top => 5,
        ViewKind::Bottom => 6,
    }
}

impl FrameRenderer for StubRenderer {
    fn load_mesh(&mut self, geometry: &GeometryModel, _colors: &VertexColors) -> Result<()> {
        self.loads += 1;
        self.mesh_id = u8::try_from(geometry.vertex_count()).unwrap_or(u8::MAX);
        Ok(())
    }

    fn update_colors(&mut self, _colors: &VertexColors) -> Result<()> {
        Ok(())
    }

    fn set_lighting(&mut self, _lighting: &LightingOptions) {}

    fn render_frame(&mut self, state: &ViewState) -> Result<Frame> {
        if self.fail_at == Some(self.rendered.len()) {
            return Err(SnapError::RenderContext("context lost".to_owned()));
        }
        self.rendered.push(*state);
        let azimuth = (state.azimuth.rem_euclid(360.0) / 2.0) as u8;
        Ok(Frame::filled(
            W,
            H,
            [self.mesh_id, view_code(state.view), azimuth, 255],
        ))
    }

    fn dimensions(&self) -> (u32, u32) {
        (W, H)
    }
}

fn tetrahedron() -> GeometryModel {
    GeometryModel::from_arrays(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
        &[[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
    )
    .unwrap()
}

/// A five-vertex pyramid, distinguishable from the tetrahedron by vertex count.
fn pyramid() -> GeometryModel {
    GeometryModel::from_arrays(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.5, 0.5, 1.0],
        ],
        &[[0, 2, 1], [0, 3, 2], [0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]],
    )
    .unwrap()
}

fn options() -> SnapOptions {
    SnapOptions::default().with_size(W, H)
}

#[test]
fn four_view_tiles_hemispheres_in_reading_order() {
    let (lh, rh) = (tetrahedron(), pyramid());
    let lh_scalars = ScalarField::new(&lh);
    let rh_scalars = ScalarField::new(&rh);
    let mut compositor = Compositor::new(StubRenderer::default());

    let out = snap_four_view(
        &mut compositor,
        HemisphereInput::new(&lh, &lh_scalars),
        HemisphereInput::new(&rh, &rh_scalars),
        &options().with_colorbar(false),
    )
    .unwrap();

    let pad = compositor::tile_padding(W);
    let (cell_w, cell_h) = (W + 2 * pad, H + 2 * pad);
    assert_eq!((out.width(), out.height()), (2 * cell_w, 2 * cell_h));

    let center = |col: u32, row: u32| out.pixel(col * cell_w + pad + W / 2, row * cell_h + pad + H / 2);
    // left hemisphere: lateral (Left view), medial (Right view)
    assert_eq!(center(0, 0), Some([4, 1, 0, 255]));
    assert_eq!(center(1, 0), Some([4, 2, 0, 255]));
    // right hemisphere: lateral (Right view), medial (Left view)
    assert_eq!(center(0, 1), Some([5, 2, 0, 255]));
    assert_eq!(center(1, 1), Some([5, 1, 0, 255]));

    let stub = compositor.into_renderer();
    assert_eq!(stub.loads, 2);
    assert_eq!(stub.rendered.len(), 4);
}

#[test]
fn four_view_is_deterministic() {
    let lh = tetrahedron();
    let scalars = ScalarField::new(&lh)
        .with_overlay(vec![0.1, -0.5, 0.9, 0.3])
        .unwrap();
    let options = options().with_thresholds(0.2, 0.8).with_caption("thickness");

    let render = || {
        let mut compositor = Compositor::new(StubRenderer::default());
        let side = HemisphereInput::new(&lh, &scalars);
        snap_four_view(&mut compositor, side, side, &options).unwrap()
    };
    let first = render();
    let second = render();
    assert_eq!(first.pixels(), second.pixels());
    // the colorbar margin was reserved under the grid
    let pad = compositor::tile_padding(W);
    assert!(first.height() > 2 * (H + 2 * pad));
}

#[test]
fn rotation_delivers_frames_in_azimuth_order() {
    let mesh = tetrahedron();
    let scalars = ScalarField::new(&mesh);
    let options = options().with_rotation(36, 24);
    let mut compositor = Compositor::new(StubRenderer::default());
    let mut frames: Vec<Frame> = Vec::new();

    let delivered = snap_rotation(&mut compositor, &mesh, &scalars, &options, &mut frames).unwrap();
    assert_eq!(delivered, 36);
    assert_eq!(frames.len(), 36);

    let stub = compositor.into_renderer();
    let azimuths: Vec<f32> = stub.rendered.iter().map(|s| s.azimuth).collect();
    for (i, azimuth) in azimuths.iter().enumerate() {
        assert!((azimuth - 10.0 * i as f32).abs() < 1e-3, "frame {i} at {azimuth}");
    }
    assert!(stub.rendered.iter().all(|s| s.view == ViewKind::Left));
}

#[test]
fn rotation_stops_when_sink_breaks() {
    let mesh = tetrahedron();
    let scalars = ScalarField::new(&mesh);
    let mut compositor = Compositor::new(StubRenderer::default());
    let mut sink = FnSink(|index: usize, _frame: Frame| -> Result<ControlFlow<()>> {
        Ok(if index == 4 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        })
    });

    let delivered =
        snap_rotation(&mut compositor, &mesh, &scalars, &options(), &mut sink).unwrap();
    assert_eq!(delivered, 5);
    assert_eq!(compositor.renderer().rendered.len(), 5);
}

#[test]
fn rotation_aborts_on_render_failure() {
    let mesh = tetrahedron();
    let scalars = ScalarField::new(&mesh);
    let mut compositor = Compositor::new(StubRenderer::failing_at(3));
    let mut frames: Vec<Frame> = Vec::new();

    let err = snap_rotation(
        &mut compositor,
        &mesh,
        &scalars,
        &options().with_rotation(10, 24),
        &mut frames,
    )
    .unwrap_err();

    match err {
        SnapError::RotationAborted {
            frame,
            total,
            source,
        } => {
            assert_eq!((frame, total), (3, 10));
            assert!(matches!(*source, SnapError::RenderContext(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    // no frame after the failure reached the sink
    assert_eq!(frames.len(), 3);
}

#[test]
fn overlay_length_mismatch_fails_before_drawing() {
    let mesh = tetrahedron();
    let scalars = ScalarField::new(&mesh).with_overlay(vec![0.1, 0.2, 0.3]);
    assert!(matches!(
        scalars,
        Err(SnapError::ScalarLengthMismatch {
            expected: 4,
            actual: 3,
            ..
        })
    ));

    let wrong_mesh = ScalarField::new(&pyramid());
    let mut compositor = Compositor::new(StubRenderer::default());
    let err = snap_view(&mut compositor, &mesh, &wrong_mesh, &options()).unwrap_err();
    assert!(matches!(err, SnapError::ScalarLengthMismatch { .. }));
    assert!(compositor.renderer().rendered.is_empty());
}

proptest! {
    #[test]
    fn compose_places_every_tile_pixel(w in 1u32..24, h in 1u32..24) {
        let colors = [[1, 0, 0, 255], [2, 0, 0, 255], [3, 0, 0, 255], [4, 0, 0, 255]];
        let tiles = colors.map(|c| Frame::filled(w, h, c));
        let out = compose_four_view(&tiles, &Decorations::default());
        let pad = compositor::tile_padding(w);
        for (i, color) in colors.iter().enumerate() {
            let (col, row) = ((i % 2) as u32, (i / 2) as u32);
            let x0 = col * (w + 2 * pad) + pad;
            let y0 = row * (h + 2 * pad) + pad;
            prop_assert_eq!(out.pixel(x0, y0), Some(*color));
            prop_assert_eq!(out.pixel(x0 + w - 1, y0 + h - 1), Some(*color));
        }
    }
}
