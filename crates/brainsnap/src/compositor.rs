//! Turning rendered frames into final images and sequences.

use std::ops::ControlFlow;

use brainsnap_core::{
    Colorbar, ColorbarOrientation, Frame, FrameRenderer, FrameSink, GeometryModel, Result,
    SnapError, VertexColors, ViewKind, ViewState,
};

/// Nominal caption height in pixels before scaling.
pub const CAPTION_HEIGHT: u32 = 20;
/// Space kept between decorations and the image border.
pub const EDGE_PAD: u32 = 20;
/// Space between colorbar and caption.
pub const GAP: u32 = 4;
/// Nominal tick label height in pixels before scaling.
pub const TICK_LABEL_HEIGHT: u32 = 12;
const LABEL_GAP: u32 = 2;

/// Rasterizes caption text.
///
/// Fonts are outside this crate; callers plug in whatever text engine they
/// have. Returned frames are blended over the image using their alpha.
pub trait CaptionRenderer {
    fn rasterize(&self, text: &str, pixel_height: u32) -> Option<Frame>;
}

/// A mesh together with the colors it should be drawn with.
#[derive(Debug, Clone, Copy)]
pub struct ColoredMesh<'a> {
    pub geometry: &'a GeometryModel,
    pub colors: &'a VertexColors,
}

/// Already rasterized extras placed next to the rendered views.
#[derive(Debug, Clone, Default)]
pub struct Decorations {
    /// Colorbar strip, with tick labels when a caption renderer was available.
    pub colorbar: Option<Frame>,
    pub orientation: ColorbarOrientation,
    pub caption: Option<Frame>,
}

impl Decorations {
    pub fn is_empty(&self) -> bool {
        self.colorbar.is_none() && self.caption.is_none()
    }
}

/// Drives a [`FrameRenderer`] to produce single, four-view and rotation output.
pub struct Compositor<R> {
    renderer: R,
    captions: Option<Box<dyn CaptionRenderer>>,
}

impl<R: FrameRenderer> Compositor<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            captions: None,
        }
    }

    #[must_use]
    pub fn with_caption_renderer(mut self, captions: impl CaptionRenderer + 'static) -> Self {
        self.captions = Some(Box::new(captions));
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Rasterizes `text` with the plugged-in caption renderer, if any.
    pub fn caption(&self, text: &str, scale: f32) -> Option<Frame> {
        let Some(captions) = &self.captions else {
            log::warn!("caption {text:?} requested but no caption renderer is set");
            return None;
        };
        captions.rasterize(text, scaled(CAPTION_HEIGHT, scale))
    }

    /// Rasterizes the optional colorbar and caption.
    pub fn decorations(
        &self,
        colorbar: Option<&Colorbar>,
        caption: Option<&str>,
        scale: f32,
    ) -> Decorations {
        Decorations {
            colorbar: colorbar.map(|bar| match &self.captions {
                Some(captions) => label_colorbar(bar, captions.as_ref(), scale),
                None => bar.frame.clone(),
            }),
            orientation: colorbar.map_or(ColorbarOrientation::Horizontal, |c| c.orientation),
            caption: caption.and_then(|text| self.caption(text, scale)),
        }
    }

    /// Renders the loaded mesh from `state`. The frame is returned as drawn.
    pub fn single(&mut self, state: &ViewState) -> Result<Frame> {
        self.renderer.render_frame(state)
    }

    /// Renders lateral and medial views of both hemispheres and tiles them.
    ///
    /// Row 0 holds the left hemisphere, row 1 the right; column 0 is lateral,
    /// column 1 medial. `base` supplies zoom, projection and extra angles.
    pub fn four_view(
        &mut self,
        left: ColoredMesh<'_>,
        right: ColoredMesh<'_>,
        base: &ViewState,
        decorations: &Decorations,
    ) -> Result<Frame> {
        let view = |kind| ViewState { view: kind, ..*base };

        self.renderer.load_mesh(left.geometry, left.colors)?;
        let left_lateral = self.renderer.render_frame(&view(ViewKind::Left))?;
        let left_medial = self.renderer.render_frame(&view(ViewKind::Right))?;

        self.renderer.load_mesh(right.geometry, right.colors)?;
        let right_lateral = self.renderer.render_frame(&view(ViewKind::Right))?;
        let right_medial = self.renderer.render_frame(&view(ViewKind::Left))?;

        Ok(compose_four_view(
            &[left_lateral, left_medial, right_lateral, right_medial],
            decorations,
        ))
    }

    /// Renders a full turn about the vertical axis starting at `start`,
    /// pushing frames to `sink` in order.
    ///
    /// Returns the number of frames delivered. The sink may stop early; a
    /// render failure aborts the remaining frames.
    pub fn rotation(
        &mut self,
        start: &ViewState,
        total_frames: usize,
        sink: &mut dyn FrameSink,
    ) -> Result<usize> {
        for (index, state) in start.rotation_sequence(total_frames).iter().enumerate() {
            let frame = self
                .renderer
                .render_frame(state)
                .map_err(|source| SnapError::RotationAborted {
                    frame: index,
                    total: total_frames,
                    source: Box::new(source),
                })?;
            log::debug!(
                "rotation frame {}/{total_frames} at azimuth {:.1}",
                index + 1,
                state.azimuth
            );
            if let ControlFlow::Break(()) = sink.accept(index, frame)? {
                log::info!("rotation stopped by sink after {} frames", index + 1);
                return Ok(index + 1);
            }
        }
        Ok(total_frames)
    }
}

/// Padding around each four-view tile for a tile of `width` pixels.
pub fn tile_padding(width: u32) -> u32 {
    (width * 3 / 100).max(4)
}

/// Tiles four equally sized frames into a 2x2 grid in reading order, with a
/// bottom margin holding the colorbar and caption.
pub fn compose_four_view(tiles: &[Frame; 4], decorations: &Decorations) -> Frame {
    let tile_w = tiles[0].width();
    let tile_h = tiles[0].height();
    let pad = tile_padding(tile_w);
    let cell_w = tile_w + 2 * pad;
    let cell_h = tile_h + 2 * pad;

    let bar = decorations.colorbar.as_ref();
    let caption = decorations.caption.as_ref();
    let stack_h = match (bar, caption) {
        (Some(b), Some(c)) => b.height() + GAP + c.height(),
        (Some(f), None) | (None, Some(f)) => f.height(),
        (None, None) => 0,
    };
    let margin = if stack_h > 0 { stack_h + EDGE_PAD } else { 0 };

    let width = 2 * cell_w;
    let mut out = Frame::new(width, 2 * cell_h + margin);
    for (i, tile) in tiles.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let (col, row) = ((i % 2) as u32, (i / 2) as u32);
        out.paste(tile, col * cell_w + pad, row * cell_h + pad);
    }

    let mut y = 2 * cell_h;
    if let Some(bar) = bar {
        out.paste(bar, centered(width, bar.width()), y);
        y += bar.height() + GAP;
    }
    if let Some(caption) = caption {
        out.blend_over(caption, centered(width, caption.width()), y);
    }
    out
}

/// Places decorations over a single rendered view.
///
/// A horizontal colorbar sits centred near the bottom with the caption under
/// it; a vertical one sits at the right edge with the caption turned to run
/// along it.
pub fn decorate_single(frame: &Frame, decorations: &Decorations) -> Frame {
    let mut out = frame.clone();
    if decorations.is_empty() {
        return out;
    }
    let (w, h) = (out.width(), out.height());

    match decorations.orientation {
        ColorbarOrientation::Horizontal => {
            let caption_h = decorations.caption.as_ref().map_or(0, Frame::height);
            if let Some(bar) = &decorations.colorbar {
                let below = if caption_h > 0 { GAP + caption_h } else { 0 };
                let y = h.saturating_sub(EDGE_PAD + below + bar.height());
                out.paste(bar, centered(w, bar.width()), y);
            }
            if let Some(caption) = &decorations.caption {
                let y = h.saturating_sub(EDGE_PAD + caption_h);
                out.blend_over(caption, centered(w, caption.width()), y);
            }
        }
        ColorbarOrientation::Vertical => {
            let rotated = decorations.caption.as_ref().map(Frame::rotate_ccw);
            let caption_w = rotated.as_ref().map_or(0, Frame::width);
            if let Some(bar) = &decorations.colorbar {
                let beside = if caption_w > 0 { GAP + caption_w } else { 0 };
                let x = w.saturating_sub(EDGE_PAD + beside + bar.width());
                out.paste(bar, x, centered(h, bar.height()));
            }
            if let Some(caption) = &rotated {
                let x = w.saturating_sub(EDGE_PAD + caption_w);
                out.blend_over(caption, x, centered(h, caption.height()));
            }
        }
    }
    out
}

/// Extends the colorbar strip with its tick labels: below a horizontal bar,
/// to the right of a vertical one.
pub fn label_colorbar(colorbar: &Colorbar, captions: &dyn CaptionRenderer, scale: f32) -> Frame {
    let bar = &colorbar.frame;
    let labels: Vec<(u32, Frame)> = colorbar
        .ticks
        .iter()
        .filter_map(|tick| {
            captions
                .rasterize(&tick.label, scaled(TICK_LABEL_HEIGHT, scale))
                .map(|f| (tick.offset, f))
        })
        .collect();
    if labels.is_empty() {
        return bar.clone();
    }

    match colorbar.orientation {
        ColorbarOrientation::Horizontal => {
            let label_h = labels.iter().map(|(_, f)| f.height()).max().unwrap_or(0);
            let mut out = Frame::new(bar.width(), bar.height() + LABEL_GAP + label_h);
            out.paste(bar, 0, 0);
            for (offset, label) in &labels {
                let x = offset
                    .saturating_sub(label.width() / 2)
                    .min(out.width().saturating_sub(label.width()));
                out.blend_over(label, x, bar.height() + LABEL_GAP);
            }
            out
        }
        ColorbarOrientation::Vertical => {
            let label_w = labels.iter().map(|(_, f)| f.width()).max().unwrap_or(0);
            let mut out = Frame::new(bar.width() + LABEL_GAP + label_w, bar.height());
            out.paste(bar, 0, 0);
            for (offset, label) in &labels {
                let y = offset
                    .saturating_sub(label.height() / 2)
                    .min(out.height().saturating_sub(label.height()));
                out.blend_over(label, bar.width() + LABEL_GAP, y);
            }
            out
        }
    }
}

fn scaled(base: u32, scale: f32) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let px = (base as f32 * scale).round().max(1.0) as u32;
    px
}

fn centered(outer: u32, inner: u32) -> u32 {
    outer.saturating_sub(inner) / 2
}
