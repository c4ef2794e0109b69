//! Per-vertex scalar data attached to a mesh.
//!
//! Missing values are represented as NaN and propagate to background shading
//! in the color mapper, never to a clamped color.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapError};
use crate::geometry::GeometryModel;

/// Which sign of overlay values receives color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorSelection {
    /// Color positive and negative values.
    #[default]
    Both,
    /// Only positive values; negatives shade as background.
    Positive,
    /// Only negative values; positives shade as background.
    Negative,
}

impl ColorSelection {
    /// Returns whether a value of this sign is kept.
    pub fn keeps(self, value: f32) -> bool {
        match self {
            ColorSelection::Both => true,
            ColorSelection::Positive => value >= 0.0,
            ColorSelection::Negative => value <= 0.0,
        }
    }
}

/// Explicit linear rescaling applied to an overlay before mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rescale {
    /// Map the finite range onto `[0, 1]`.
    MinMax,
    /// Subtract the mean and divide by the standard deviation.
    ZScore,
}

/// Lookup table from discrete label ID to RGB color (0..1 per channel).
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTable {
    colors: Vec<[f32; 3]>,
}

impl LabelTable {
    /// Creates a table from RGB rows; 0-255 tables are detected and rescaled.
    pub fn from_rgb(rows: Vec<[f32; 3]>) -> Self {
        let is_byte_range = rows.iter().flatten().any(|&c| c > 1.0);
        let colors = if is_byte_range {
            rows.into_iter()
                .map(|[r, g, b]| [r / 255.0, g / 255.0, b / 255.0])
                .collect()
        } else {
            rows
        };
        Self { colors }
    }

    /// Color of a label, or `None` for unknown IDs (negative or past the end).
    pub fn get(&self, label: i32) -> Option<[f32; 3]> {
        usize::try_from(label)
            .ok()
            .and_then(|i| self.colors.get(i))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Discrete per-vertex labels and their color table.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMap {
    pub labels: Vec<i32>,
    pub table: LabelTable,
}

/// Per-vertex scalar arrays for one mesh.
///
/// Every array present has exactly one entry per vertex of the mesh the
/// field was created for.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    vertex_count: usize,
    overlay: Option<Vec<f32>>,
    background: Option<Vec<f32>>,
    mask: Option<Vec<bool>>,
    labels: Option<LabelMap>,
}

impl ScalarField {
    /// Creates an empty field sized for `geometry`.
    pub fn new(geometry: &GeometryModel) -> Self {
        Self::with_vertex_count(geometry.vertex_count())
    }

    /// Creates an empty field for a mesh with `vertex_count` vertices.
    pub fn with_vertex_count(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            overlay: None,
            background: None,
            mask: None,
            labels: None,
        }
    }

    /// Attaches a continuous overlay (e.g. cortical thickness).
    pub fn with_overlay(mut self, values: Vec<f32>) -> Result<Self> {
        self.check_len("overlay", values.len())?;
        self.overlay = Some(values);
        Ok(self)
    }

    /// Attaches a background map (e.g. curvature) used for shape shading.
    pub fn with_background(mut self, values: Vec<f32>) -> Result<Self> {
        self.check_len("background", values.len())?;
        self.background = Some(values);
        Ok(self)
    }

    /// Attaches a region mask; `false` vertices never receive overlay color.
    pub fn with_mask(mut self, mask: Vec<bool>) -> Result<Self> {
        self.check_len("mask", mask.len())?;
        self.mask = Some(mask);
        Ok(self)
    }

    /// Attaches discrete labels with their lookup table.
    pub fn with_labels(mut self, labels: Vec<i32>, table: LabelTable) -> Result<Self> {
        self.check_len("labels", labels.len())?;
        self.labels = Some(LabelMap { labels, table });
        Ok(self)
    }

    fn check_len(&self, field: &'static str, actual: usize) -> Result<()> {
        if actual == self.vertex_count {
            Ok(())
        } else {
            Err(SnapError::ScalarLengthMismatch {
                field,
                expected: self.vertex_count,
                actual,
            })
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn overlay(&self) -> Option<&[f32]> {
        self.overlay.as_deref()
    }

    pub fn background(&self) -> Option<&[f32]> {
        self.background.as_deref()
    }

    pub fn mask(&self) -> Option<&[bool]> {
        self.mask.as_deref()
    }

    pub fn labels(&self) -> Option<&LabelMap> {
        self.labels.as_ref()
    }

    /// Whether vertex `i` may receive overlay or label color.
    pub fn is_unmasked(&self, i: usize) -> bool {
        self.mask.as_ref().map_or(true, |m| m[i])
    }

    /// Background value of vertex `i`, if a background map is attached.
    pub fn background_at(&self, i: usize) -> Option<f32> {
        self.background.as_ref().map(|b| b[i])
    }

    /// Minimum and maximum absolute finite overlay value.
    pub fn overlay_abs_range(&self) -> Option<(f32, f32)> {
        abs_range(self.overlay.as_deref()?)
    }

    /// Returns a copy whose overlay is linearly rescaled.
    ///
    /// NaN entries stay NaN. A constant overlay rescales to zeros.
    pub fn rescale_overlay(&self, method: Rescale) -> Self {
        let mut rescaled = self.clone();
        if let Some(values) = rescaled.overlay.as_mut() {
            rescale_in_place(values, method);
        }
        rescaled
    }
}

/// Minimum and maximum absolute value among the finite entries of `values`.
pub fn abs_range(values: &[f32]) -> Option<(f32, f32)> {
    values
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| v.abs())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[allow(clippy::cast_possible_truncation)]
fn rescale_in_place(values: &mut [f32], method: Rescale) {
    let finite: Vec<f64> = values
        .iter()
        .filter(|v| v.is_finite())
        .map(|&v| f64::from(v))
        .collect();
    if finite.is_empty() {
        return;
    }

    let (offset, divisor) = match method {
        Rescale::MinMax => {
            let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
            let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (min, max - min)
        }
        Rescale::ZScore => {
            #[allow(clippy::cast_precision_loss)]
            let n = finite.len() as f64;
            let mean = finite.iter().sum::<f64>() / n;
            let variance = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            (mean, variance.sqrt())
        }
    };

    for v in values.iter_mut().filter(|v| v.is_finite()) {
        *v = if divisor > f64::EPSILON {
            ((f64::from(*v) - offset) / divisor) as f32
        } else {
            0.0
        };
    }
}
