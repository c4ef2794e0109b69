//! Scalar-to-color mapping.
//!
//! Each vertex gets exactly one RGBA color. Overlay values that are missing,
//! masked, deselected by sign or below threshold show the background shading
//! instead, which is a two-tone grey keyed on the sign of the background
//! (curvature) map.

use glam::{Vec3, Vec4};

use crate::color_map::{ColorMapParams, Pole};
use crate::scalar::ScalarField;

/// Grey for concave (sulcal) regions and for meshes without a background map.
pub const BACKGROUND_DARK: f32 = 0.5;
/// Grey for convex (gyral) regions and for colorbar gaps.
pub const BACKGROUND_LIGHT: f32 = 0.33;

/// One RGBA color per vertex, consumed directly as a vertex attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexColors(Vec<[f32; 4]>);

impl VertexColors {
    /// Uniform color for `count` vertices.
    pub fn uniform(count: usize, color: [f32; 4]) -> Self {
        Self(vec![color; count])
    }

    pub fn as_slice(&self) -> &[[f32; 4]] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<[f32; 4]> {
        self.0.get(i).copied()
    }
}

impl From<Vec<[f32; 4]>> for VertexColors {
    fn from(colors: Vec<[f32; 4]>) -> Self {
        Self(colors)
    }
}

/// What [`ColorMapper::map_field`] actually colored.
///
/// Signs refer to the raw overlay values, before inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlaySummary {
    pub has_positive: bool,
    pub has_negative: bool,
    /// Vertices that received overlay or label color.
    pub colored_vertices: usize,
}

/// Converts scalar fields to vertex colors under fixed parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMapper {
    params: ColorMapParams,
}

impl ColorMapper {
    pub fn new(params: ColorMapParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ColorMapParams {
        &self.params
    }

    /// Shading of a vertex that shows no overlay.
    pub fn background_color(background: Option<f32>) -> Vec3 {
        match background {
            Some(b) if b < 0.0 => Vec3::splat(BACKGROUND_DARK),
            Some(b) if b >= 0.0 => Vec3::splat(BACKGROUND_LIGHT),
            _ => Vec3::splat(BACKGROUND_DARK),
        }
    }

    /// Overlay color of `value`, or `None` if the vertex shows background.
    pub fn overlay_color(&self, value: f32) -> Option<Vec3> {
        if value.is_nan() || !self.params.selection.keeps(value) {
            return None;
        }
        let v = if self.params.invert { -value } else { value };
        let t = self.params.intensity(v.abs())?;
        Some(self.params.colormap.color(Pole::of(v), t))
    }

    /// Full RGBA color for one vertex's overlay and background values.
    pub fn map_value(&self, value: f32, background: Option<f32>) -> Vec4 {
        self.overlay_color(value)
            .unwrap_or_else(|| Self::background_color(background))
            .extend(1.0)
    }

    /// Colors every vertex of `field`.
    ///
    /// The overlay wins over labels when both are attached; the mask applies
    /// to either.
    pub fn map_field(&self, field: &ScalarField) -> (VertexColors, OverlaySummary) {
        let mut summary = OverlaySummary::default();
        let colors = (0..field.vertex_count())
            .map(|i| {
                let background = field.background_at(i);
                let color = if field.is_unmasked(i) {
                    self.source_color(field, i, &mut summary)
                } else {
                    None
                };
                color
                    .unwrap_or_else(|| Self::background_color(background))
                    .extend(1.0)
                    .to_array()
            })
            .collect::<Vec<_>>();

        if field.overlay().is_some() && summary.colored_vertices == 0 {
            log::warn!(
                "overlay colors none of the {} vertices; rendering background only",
                field.vertex_count()
            );
        }
        (VertexColors(colors), summary)
    }

    fn source_color(
        &self,
        field: &ScalarField,
        i: usize,
        summary: &mut OverlaySummary,
    ) -> Option<Vec3> {
        if let Some(overlay) = field.overlay() {
            let value = overlay[i];
            let color = self.overlay_color(value)?;
            summary.colored_vertices += 1;
            if value > 0.0 {
                summary.has_positive = true;
            } else if value < 0.0 {
                summary.has_negative = true;
            }
            return Some(color);
        }
        let labels = field.labels()?;
        let rgb = labels.table.get(labels.labels[i])?;
        summary.colored_vertices += 1;
        Some(Vec3::from_array(rgb))
    }
}
