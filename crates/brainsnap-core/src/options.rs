//! Configuration options for brainsnap-rs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color_map::{ColorMapKind, ColorMapParams};
use crate::colorbar::ColorbarOrientation;
use crate::error::{Result, SnapError};
use crate::scalar::ColorSelection;
use crate::view::{ProjectionMode, ViewKind, ViewState};

/// Everything a batch snapshot needs besides the mesh and its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapOptions {
    /// Output width in pixels (per tile for four-view composites).
    pub width: u32,
    /// Output height in pixels (per tile for four-view composites).
    pub height: u32,

    pub colormap: ColorMapOptions,

    /// Named starting view.
    pub view: ViewKind,
    /// Extra rotation about the screen vertical, in degrees.
    pub azimuth: f32,
    /// Extra rotation about the screen horizontal, in degrees.
    pub elevation: f32,
    /// Magnification of the mesh in the frame; larger values zoom in.
    ///
    /// This is the inverse of [`ViewState::zoom`], the camera distance
    /// factor for which values above 1 zoom out.
    pub brain_scale: f32,
    pub projection: ProjectionMode,

    pub lighting: LightingOptions,
    pub colorbar: ColorbarOptions,

    /// Text placed under four-view composites.
    pub caption: Option<String>,

    pub rotation: RotationOptions,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            width: 700,
            height: 500,
            colormap: ColorMapOptions::default(),
            view: ViewKind::Left,
            azimuth: 0.0,
            elevation: 0.0,
            brain_scale: 1.5,
            projection: ProjectionMode::Perspective,
            lighting: LightingOptions::default(),
            colorbar: ColorbarOptions::default(),
            caption: None,
            rotation: RotationOptions::default(),
        }
    }
}

/// Overlay color mapping settings; missing bounds are estimated from data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ColorMapOptions {
    pub fthresh: Option<f32>,
    pub fmax: Option<f32>,
    pub invert: bool,
    pub colormap: ColorMapKind,
    pub selection: ColorSelection,
}

impl ColorMapOptions {
    /// Resolves bounds against `overlay` and builds validated parameters.
    ///
    /// Without an overlay both bounds must be given; otherwise `(0, 1)` is used.
    pub fn resolve(&self, overlay: Option<&[f32]>) -> Result<ColorMapParams> {
        let params = match (overlay, self.fthresh, self.fmax) {
            (Some(values), lo, hi) => ColorMapParams::estimate(values, lo, hi)?,
            (None, Some(lo), Some(hi)) => ColorMapParams::new(lo, hi)?,
            (None, _, _) => ColorMapParams::new(0.0, 1.0)?,
        };
        Ok(params
            .with_invert(self.invert)
            .with_colormap(self.colormap)
            .with_selection(self.selection))
    }
}

/// Fixed lighting rig settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingOptions {
    /// Add the headlight specular highlight.
    pub specular: bool,
    /// Ambient light strength.
    pub ambient: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            specular: true,
            ambient: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorbarOptions {
    pub enabled: bool,
    pub orientation: ColorbarOrientation,
    pub scale: f32,
}

impl Default for ColorbarOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            orientation: ColorbarOrientation::Horizontal,
            scale: 1.0,
        }
    }
}

/// Rotation animation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationOptions {
    pub total_frames: usize,
    /// Playback rate, passed through to the encoder.
    pub fps: u32,
    pub start_view: ViewKind,
}

impl Default for RotationOptions {
    fn default() -> Self {
        Self {
            total_frames: 72,
            fps: 24,
            start_view: ViewKind::Left,
        }
    }
}

impl SnapOptions {
    /// Parses options from JSON; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loading options from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects values no render could use.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SnapError::InvalidConfig(format!(
                "frame size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if !(self.brain_scale.is_finite() && self.brain_scale > 0.0) {
            return Err(SnapError::InvalidConfig(format!(
                "brain_scale must be positive, got {}",
                self.brain_scale
            )));
        }
        if !(self.azimuth.is_finite() && self.elevation.is_finite()) {
            return Err(SnapError::InvalidConfig(
                "azimuth and elevation must be finite".to_owned(),
            ));
        }
        if !(self.lighting.ambient.is_finite() && self.lighting.ambient >= 0.0) {
            return Err(SnapError::InvalidConfig(format!(
                "ambient must be non-negative, got {}",
                self.lighting.ambient
            )));
        }
        if self.colorbar.enabled && !(self.colorbar.scale.is_finite() && self.colorbar.scale > 0.0)
        {
            return Err(SnapError::InvalidConfig(format!(
                "colorbar scale must be positive, got {}",
                self.colorbar.scale
            )));
        }
        if self.rotation.total_frames == 0 || self.rotation.fps == 0 {
            return Err(SnapError::InvalidConfig(
                "rotation needs at least one frame and a non-zero fps".to_owned(),
            ));
        }
        // Explicit bounds are checked now so a bad pair never reaches a draw call.
        if let (Some(lo), Some(hi)) = (self.colormap.fthresh, self.colormap.fmax) {
            ColorMapParams::new(lo, hi)?;
        }
        Ok(())
    }

    /// Camera state for the named view with this framing.
    pub fn view_state(&self) -> ViewState {
        self.view_state_for(self.view)
    }

    pub fn view_state_for(&self, view: ViewKind) -> ViewState {
        ViewState::new(view)
            .with_azimuth(self.azimuth)
            .with_elevation(self.elevation)
            .with_zoom(1.0 / self.brain_scale)
            .with_projection(self.projection)
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, fthresh: f32, fmax: f32) -> Self {
        self.colormap.fthresh = Some(fthresh);
        self.colormap.fmax = Some(fmax);
        self
    }

    #[must_use]
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.colormap.invert = invert;
        self
    }

    #[must_use]
    pub fn with_colormap(mut self, colormap: ColorMapKind) -> Self {
        self.colormap.colormap = colormap;
        self
    }

    #[must_use]
    pub fn with_view(mut self, view: ViewKind) -> Self {
        self.view = view;
        self
    }

    #[must_use]
    pub fn with_brain_scale(mut self, brain_scale: f32) -> Self {
        self.brain_scale = brain_scale;
        self
    }

    #[must_use]
    pub fn with_specular(mut self, specular: bool) -> Self {
        self.lighting.specular = specular;
        self
    }

    #[must_use]
    pub fn with_colorbar(mut self, enabled: bool) -> Self {
        self.colorbar.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, total_frames: usize, fps: u32) -> Self {
        self.rotation.total_frames = total_frames;
        self.rotation.fps = fps;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = SnapOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.rotation.total_frames, 72);
        assert!(options.lighting.specular);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = SnapOptions::from_json_str(
            r#"{ "width": 320, "colormap": { "fthresh": 2.0, "fmax": 5.0, "colormap": "viridis" },
                 "view": "right", "rotation": { "total_frames": 36 } }"#,
        )
        .unwrap();
        assert_eq!(options.width, 320);
        assert_eq!(options.height, 500);
        assert_eq!(options.view, ViewKind::Right);
        assert_eq!(options.colormap.colormap, ColorMapKind::Viridis);
        assert_eq!(options.rotation.total_frames, 36);
        assert_eq!(options.rotation.fps, 24);
    }

    #[test]
    fn test_json_round_trip() {
        let options = SnapOptions::default()
            .with_thresholds(1.0, 3.0)
            .with_caption("thickness");
        let json = options.to_json_string().unwrap();
        assert_eq!(SnapOptions::from_json_str(&json).unwrap(), options);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SnapOptions::default().with_size(0, 10).validate().is_err());
        assert!(SnapOptions::default().with_brain_scale(0.0).validate().is_err());
        assert!(SnapOptions::default().with_rotation(0, 24).validate().is_err());
        assert!(matches!(
            SnapOptions::default().with_thresholds(2.0, 1.0).validate(),
            Err(SnapError::InvalidColorMapParams { .. })
        ));
        assert!(matches!(
            SnapOptions::from_json_str(r#"{ "width": "wide" }"#),
            Err(SnapError::JsonError(_))
        ));
    }

    #[test]
    fn test_resolve_estimates_missing_bounds() {
        let opts = ColorMapOptions {
            fthresh: Some(0.5),
            ..ColorMapOptions::default()
        };
        let params = opts.resolve(Some(&[1.0, -4.0, 0.25])).unwrap();
        assert_eq!(params.fthresh(), 0.5);
        assert_eq!(params.fmax(), 4.0);

        let params = ColorMapOptions::default().resolve(None).unwrap();
        assert_eq!((params.fthresh(), params.fmax()), (0.0, 1.0));
    }

    #[test]
    fn test_view_state_uses_inverse_brain_scale() {
        let state = SnapOptions::default().with_brain_scale(2.0).view_state();
        assert_eq!(state.zoom, 0.5);
        assert_eq!(state.view, ViewKind::Left);
    }
}
