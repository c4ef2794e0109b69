//! Batch entry points driven by [`SnapOptions`].

use brainsnap_core::scalar::abs_range;
use brainsnap_core::{
    ColorMapParams, ColorMapper, Colorbar, Frame, FrameRenderer, FrameSink,
    GeometryModel, OverlaySummary, Result, ScalarField, SnapError, SnapOptions,
};

use crate::compositor::{decorate_single, ColoredMesh, Compositor, Decorations};
use crate::session::check_field;

/// One hemisphere of a four-view composite.
#[derive(Debug, Clone, Copy)]
pub struct HemisphereInput<'a> {
    pub geometry: &'a GeometryModel,
    pub scalars: &'a ScalarField,
}

impl<'a> HemisphereInput<'a> {
    pub fn new(geometry: &'a GeometryModel, scalars: &'a ScalarField) -> Self {
        Self { geometry, scalars }
    }
}

/// Renders one view of `geometry` with its colorbar and caption.
pub fn snap_view<R: FrameRenderer>(
    compositor: &mut Compositor<R>,
    geometry: &GeometryModel,
    scalars: &ScalarField,
    options: &SnapOptions,
) -> Result<Frame> {
    prepare(compositor, options)?;
    check_field(geometry, scalars)?;

    let params = options.colormap.resolve(scalars.overlay())?;
    let (colors, summary) = ColorMapper::new(params).map_field(scalars);
    compositor.renderer_mut().load_mesh(geometry, &colors)?;

    let frame = compositor.single(&options.view_state())?;
    let has_values = scalars.overlay_abs_range().is_some();
    let colorbar = colorbar_for(options, &params, &summary, has_values)?;
    let decorations = compositor.decorations(
        colorbar.as_ref(),
        options.caption.as_deref(),
        options.colorbar.scale,
    );
    Ok(decorate_single(&frame, &decorations))
}

/// Renders lateral and medial views of both hemispheres into one image.
///
/// Missing color bounds are estimated over both overlays together so the
/// two hemispheres share one ramp.
pub fn snap_four_view<R: FrameRenderer>(
    compositor: &mut Compositor<R>,
    left: HemisphereInput<'_>,
    right: HemisphereInput<'_>,
    options: &SnapOptions,
) -> Result<Frame> {
    prepare(compositor, options)?;
    check_field(left.geometry, left.scalars)?;
    check_field(right.geometry, right.scalars)?;

    let combined: Vec<f32> = [left.scalars.overlay(), right.scalars.overlay()]
        .into_iter()
        .flatten()
        .flatten()
        .copied()
        .collect();
    let has_overlay = left.scalars.overlay().is_some() || right.scalars.overlay().is_some();
    let params = options
        .colormap
        .resolve(has_overlay.then_some(combined.as_slice()))?;

    let mapper = ColorMapper::new(params);
    let (left_colors, left_summary) = mapper.map_field(left.scalars);
    let (right_colors, right_summary) = mapper.map_field(right.scalars);
    let summary = OverlaySummary {
        has_positive: left_summary.has_positive || right_summary.has_positive,
        has_negative: left_summary.has_negative || right_summary.has_negative,
        colored_vertices: left_summary.colored_vertices + right_summary.colored_vertices,
    };

    let has_values = abs_range(&combined).is_some();
    let colorbar = colorbar_for(options, &params, &summary, has_values)?;
    let decorations: Decorations = compositor.decorations(
        colorbar.as_ref(),
        options.caption.as_deref(),
        options.colorbar.scale,
    );

    compositor.four_view(
        ColoredMesh {
            geometry: left.geometry,
            colors: &left_colors,
        },
        ColoredMesh {
            geometry: right.geometry,
            colors: &right_colors,
        },
        &options.view_state(),
        &decorations,
    )
}

/// Renders `options.rotation.total_frames` frames of a full turn into `sink`.
///
/// Returns the number of frames the sink accepted.
pub fn snap_rotation<R: FrameRenderer>(
    compositor: &mut Compositor<R>,
    geometry: &GeometryModel,
    scalars: &ScalarField,
    options: &SnapOptions,
    sink: &mut dyn FrameSink,
) -> Result<usize> {
    prepare(compositor, options)?;
    check_field(geometry, scalars)?;

    let params = options.colormap.resolve(scalars.overlay())?;
    let (colors, _) = ColorMapper::new(params).map_field(scalars);
    compositor.renderer_mut().load_mesh(geometry, &colors)?;

    let rotation = options.rotation;
    log::info!(
        "rendering {} rotation frames ({} fps)",
        rotation.total_frames,
        rotation.fps
    );
    let start = options.view_state_for(rotation.start_view);
    compositor.rotation(&start, rotation.total_frames, sink)
}

fn prepare<R: FrameRenderer>(compositor: &mut Compositor<R>, options: &SnapOptions) -> Result<()> {
    options.validate()?;
    let dims = compositor.renderer().dimensions();
    if dims != (options.width, options.height) {
        return Err(SnapError::InvalidConfig(format!(
            "renderer is {}x{} but options ask for {}x{}",
            dims.0, dims.1, options.width, options.height
        )));
    }
    compositor.renderer_mut().set_lighting(&options.lighting);
    Ok(())
}

fn colorbar_for(
    options: &SnapOptions,
    params: &ColorMapParams,
    summary: &OverlaySummary,
    has_values: bool,
) -> Result<Option<Colorbar>> {
    // No finite overlay values, no colorbar
    if !(options.colorbar.enabled && has_values) {
        return Ok(None);
    }
    Colorbar::render(
        params,
        summary,
        options.colorbar.orientation,
        options.colorbar.scale,
    )
    .map(Some)
}
