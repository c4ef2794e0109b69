//! Interactive re-rendering without reloading the mesh.

use brainsnap_core::{
    ColorMapParams, ColorMapper, Colorbar, ColorbarOrientation, Frame, FrameRenderer,
    GeometryModel, LightingOptions, OverlaySummary, Result, ScalarField, SnapError, ViewState,
};

/// A mesh and its data kept loaded in a renderer.
///
/// Changing color parameters re-maps the stored scalars and uploads only the
/// new colors; changing the view only re-draws.
pub struct SnapSession<R> {
    renderer: R,
    geometry: GeometryModel,
    scalars: ScalarField,
    mapper: ColorMapper,
    summary: OverlaySummary,
    view: ViewState,
}

impl<R: FrameRenderer> SnapSession<R> {
    pub fn new(
        mut renderer: R,
        geometry: GeometryModel,
        scalars: ScalarField,
        params: ColorMapParams,
    ) -> Result<Self> {
        check_field(&geometry, &scalars)?;
        let mapper = ColorMapper::new(params);
        let (colors, summary) = mapper.map_field(&scalars);
        renderer.load_mesh(&geometry, &colors)?;
        log::info!(
            "session opened with {} vertices, {} colored",
            geometry.vertex_count(),
            summary.colored_vertices
        );
        Ok(Self {
            renderer,
            geometry,
            scalars,
            mapper,
            summary,
            view: ViewState::default(),
        })
    }

    pub fn geometry(&self) -> &GeometryModel {
        &self.geometry
    }

    pub fn scalars(&self) -> &ScalarField {
        &self.scalars
    }

    pub fn params(&self) -> &ColorMapParams {
        self.mapper.params()
    }

    pub fn summary(&self) -> OverlaySummary {
        self.summary
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Re-maps colors with `params` and uploads them.
    pub fn set_color_params(&mut self, params: ColorMapParams) -> Result<()> {
        let mapper = ColorMapper::new(params);
        let (colors, summary) = mapper.map_field(&self.scalars);
        self.renderer.update_colors(&colors)?;
        self.mapper = mapper;
        self.summary = summary;
        log::debug!(
            "color params updated: fthresh={} fmax={}",
            params.fthresh(),
            params.fmax()
        );
        Ok(())
    }

    pub fn set_lighting(&mut self, lighting: &LightingOptions) {
        self.renderer.set_lighting(lighting);
    }

    /// Moves the camera and renders the new view.
    pub fn set_view(&mut self, view: ViewState) -> Result<Frame> {
        self.view = view;
        self.render()
    }

    /// Renders the current view.
    pub fn render(&mut self) -> Result<Frame> {
        self.renderer.render_frame(&self.view)
    }

    /// Colorbar for the current parameters, or `None` without an overlay.
    pub fn colorbar(
        &self,
        orientation: ColorbarOrientation,
        scale: f32,
    ) -> Result<Option<Colorbar>> {
        if self.scalars.overlay().is_none() {
            return Ok(None);
        }
        Colorbar::render(self.mapper.params(), &self.summary, orientation, scale).map(Some)
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

/// Rejects a scalar field built for a different mesh.
pub(crate) fn check_field(geometry: &GeometryModel, scalars: &ScalarField) -> Result<()> {
    if scalars.vertex_count() == geometry.vertex_count() {
        Ok(())
    } else {
        Err(SnapError::ScalarLengthMismatch {
            field: "scalar field",
            expected: geometry.vertex_count(),
            actual: scalars.vertex_count(),
        })
    }
}
