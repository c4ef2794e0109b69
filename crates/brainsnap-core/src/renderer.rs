//! The capability a rendering backend provides to the compositor.

use crate::color_mapper::VertexColors;
use crate::error::Result;
use crate::frame::Frame;
use crate::geometry::GeometryModel;
use crate::options::LightingOptions;
use crate::view::ViewState;

/// Draws a colored mesh and reads the result back as a [`Frame`].
///
/// Implementations own their rendering context. Calls are sequential: a
/// renderer is driven by one thread and never re-entered.
pub trait FrameRenderer {
    /// Uploads a mesh with its initial colors, replacing any previous one.
    fn load_mesh(&mut self, geometry: &GeometryModel, colors: &VertexColors) -> Result<()>;

    /// Replaces the colors of the loaded mesh, keeping its geometry buffers.
    fn update_colors(&mut self, colors: &VertexColors) -> Result<()>;

    /// Sets the lighting used by subsequent frames.
    fn set_lighting(&mut self, lighting: &LightingOptions);

    /// Draws the loaded mesh from `state` and returns the pixels.
    fn render_frame(&mut self, state: &ViewState) -> Result<Frame>;

    /// Width and height of every frame this renderer produces.
    fn dimensions(&self) -> (u32, u32);
}

impl<R: FrameRenderer + ?Sized> FrameRenderer for &mut R {
    fn load_mesh(&mut self, geometry: &GeometryModel, colors: &VertexColors) -> Result<()> {
        (**self).load_mesh(geometry, colors)
    }

    fn update_colors(&mut self, colors: &VertexColors) -> Result<()> {
        (**self).update_colors(colors)
    }

    fn set_lighting(&mut self, lighting: &LightingOptions) {
        (**self).set_lighting(lighting);
    }

    fn render_frame(&mut self, state: &ViewState) -> Result<Frame> {
        (**self).render_frame(state)
    }

    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }
}
