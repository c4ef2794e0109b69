//! Color maps and the threshold/saturation parameters that drive them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapError};
use crate::scalar::{abs_range, ColorSelection};

/// Which signed half of a diverging map a value falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pole {
    Positive,
    Negative,
}

impl Pole {
    /// Pole of a (possibly inverted) overlay value; zero is positive.
    pub fn of(value: f32) -> Self {
        if value < 0.0 {
            Pole::Negative
        } else {
            Pole::Positive
        }
    }
}

/// Available hue ramps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMapKind {
    /// Diverging heat scale: dark red to yellow for positive values, dark
    /// blue to cyan for negative ones.
    #[default]
    Heat,
    /// Diverging cool-warm ramp.
    CoolWarm,
    Viridis,
    Blues,
    Reds,
    Rainbow,
}

impl ColorMapKind {
    pub const ALL: [ColorMapKind; 6] = [
        ColorMapKind::Heat,
        ColorMapKind::CoolWarm,
        ColorMapKind::Viridis,
        ColorMapKind::Blues,
        ColorMapKind::Reds,
        ColorMapKind::Rainbow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorMapKind::Heat => "heat",
            ColorMapKind::CoolWarm => "coolwarm",
            ColorMapKind::Viridis => "viridis",
            ColorMapKind::Blues => "blues",
            ColorMapKind::Reds => "reds",
            ColorMapKind::Rainbow => "rainbow",
        }
    }

    /// Looks up a map by its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Whether positive and negative values map to distinct hues.
    pub fn is_diverging(self) -> bool {
        matches!(self, ColorMapKind::Heat | ColorMapKind::CoolWarm)
    }

    /// Color at intensity `t` (clamped to `[0, 1]`) on the given pole.
    ///
    /// Sequential maps ignore the pole and ramp over magnitude only.
    pub fn color(self, pole: Pole, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        match self {
            ColorMapKind::Heat => match pole {
                Pole::Positive => heat_positive(t),
                Pole::Negative => heat_negative(t),
            },
            ColorMapKind::CoolWarm => match pole {
                Pole::Positive => sample(COOLWARM, 0.5 + 0.5 * t),
                Pole::Negative => sample(COOLWARM, 0.5 - 0.5 * t),
            },
            ColorMapKind::Viridis => sample(VIRIDIS, t),
            ColorMapKind::Blues => sample(BLUES, t),
            ColorMapKind::Reds => sample(REDS, t),
            ColorMapKind::Rainbow => sample(RAINBOW, t),
        }
    }
}

/// Positive heat pole: dark red through red to yellow.
pub fn heat_positive(t: f32) -> Vec3 {
    if t < 1.0 / 3.0 {
        Vec3::new(0.5625 + 1.3125 * t, 0.0, 0.0)
    } else if t < 1.0 {
        Vec3::new(1.0, 1.5 * (t - 1.0 / 3.0), 0.0)
    } else {
        Vec3::new(1.0, 1.0, 0.0)
    }
}

/// Negative heat pole: dark blue through blue to cyan.
pub fn heat_negative(t: f32) -> Vec3 {
    let p = heat_positive(t);
    Vec3::new(0.0, p.y, p.x)
}

/// Linear interpolation over evenly spaced samples.
fn sample(colors: &[Vec3], t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    match colors.len() {
        0 => Vec3::ZERO,
        1 => colors[0],
        len => {
            let n = len - 1;
            #[allow(clippy::cast_precision_loss)]
            let scaled = t * n as f32;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let idx = (scaled.floor() as usize).min(n - 1);
            #[allow(clippy::cast_precision_loss)]
            let frac = scaled - idx as f32;
            colors[idx].lerp(colors[idx + 1], frac)
        }
    }
}

const VIRIDIS: &[Vec3] = &[
    Vec3::new(0.267, 0.004, 0.329),
    Vec3::new(0.282, 0.140, 0.457),
    Vec3::new(0.253, 0.265, 0.529),
    Vec3::new(0.206, 0.371, 0.553),
    Vec3::new(0.163, 0.471, 0.558),
    Vec3::new(0.127, 0.566, 0.550),
    Vec3::new(0.134, 0.658, 0.517),
    Vec3::new(0.266, 0.749, 0.440),
    Vec3::new(0.477, 0.821, 0.318),
    Vec3::new(0.741, 0.873, 0.150),
    Vec3::new(0.993, 0.906, 0.144),
];

const BLUES: &[Vec3] = &[
    Vec3::new(0.969, 0.984, 1.000),
    Vec3::new(0.871, 0.922, 0.969),
    Vec3::new(0.776, 0.859, 0.937),
    Vec3::new(0.620, 0.792, 0.882),
    Vec3::new(0.419, 0.682, 0.839),
    Vec3::new(0.259, 0.573, 0.776),
    Vec3::new(0.129, 0.443, 0.710),
    Vec3::new(0.031, 0.318, 0.612),
    Vec3::new(0.031, 0.188, 0.420),
];

const REDS: &[Vec3] = &[
    Vec3::new(1.000, 0.961, 0.941),
    Vec3::new(0.996, 0.878, 0.824),
    Vec3::new(0.988, 0.733, 0.631),
    Vec3::new(0.988, 0.573, 0.447),
    Vec3::new(0.984, 0.416, 0.290),
    Vec3::new(0.937, 0.231, 0.173),
    Vec3::new(0.796, 0.094, 0.114),
    Vec3::new(0.647, 0.059, 0.082),
    Vec3::new(0.404, 0.000, 0.051),
];

const COOLWARM: &[Vec3] = &[
    Vec3::new(0.230, 0.299, 0.754),
    Vec3::new(0.552, 0.690, 0.996),
    Vec3::new(0.866, 0.866, 0.866),
    Vec3::new(0.956, 0.604, 0.486),
    Vec3::new(0.706, 0.016, 0.150),
];

const RAINBOW: &[Vec3] = &[
    Vec3::new(0.5, 0.0, 1.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
];

/// Threshold, saturation and hue settings for overlay coloring.
///
/// Construction enforces `fmax > fthresh >= 0`; both bounds are finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMapParams {
    fthresh: f32,
    fmax: f32,
    /// Swap which pole positive values land on.
    pub invert: bool,
    pub colormap: ColorMapKind,
    pub selection: ColorSelection,
}

impl ColorMapParams {
    pub fn new(fthresh: f32, fmax: f32) -> Result<Self> {
        validate_bounds(fthresh, fmax)?;
        Ok(Self {
            fthresh,
            fmax,
            invert: false,
            colormap: ColorMapKind::default(),
            selection: ColorSelection::default(),
        })
    }

    /// Fills missing bounds from the overlay's absolute finite range.
    ///
    /// `fthresh` defaults to the smallest magnitude and `fmax` to the largest.
    /// An overlay without finite values gets placeholder bounds, since it
    /// colors nothing anyway. A flat overlay puts every value at the bottom
    /// of the ramp. Bounds given by the caller are validated as-is.
    pub fn estimate(overlay: &[f32], fthresh: Option<f32>, fmax: Option<f32>) -> Result<Self> {
        let (fthresh, fmax) = match (fthresh, fmax, abs_range(overlay)) {
            (Some(lo), Some(hi), _) => (lo, hi),
            (lo, hi, None) => {
                log::warn!("overlay has no finite values; rendering background only");
                let lo = lo.unwrap_or(0.0);
                (lo, hi.unwrap_or(lo + 1.0))
            }
            (Some(lo), None, Some((_, max_abs))) => {
                (lo, if max_abs > lo { max_abs } else { lo + 1.0 })
            }
            (None, Some(hi), Some((min_abs, _))) => {
                (if min_abs < hi { min_abs } else { 0.0 }, hi)
            }
            (None, None, Some((min_abs, max_abs))) => {
                if max_abs > min_abs {
                    (min_abs, max_abs)
                } else {
                    log::debug!("overlay magnitude is constant at {min_abs}");
                    (min_abs, min_abs + 1.0)
                }
            }
        };
        log::debug!("color map bounds: fthresh={fthresh}, fmax={fmax}");
        Self::new(fthresh, fmax)
    }

    #[must_use]
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    #[must_use]
    pub fn with_colormap(mut self, colormap: ColorMapKind) -> Self {
        self.colormap = colormap;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: ColorSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Replaces both bounds, re-validating them.
    pub fn set_bounds(&mut self, fthresh: f32, fmax: f32) -> Result<()> {
        validate_bounds(fthresh, fmax)?;
        self.fthresh = fthresh;
        self.fmax = fmax;
        Ok(())
    }

    pub fn fthresh(&self) -> f32 {
        self.fthresh
    }

    pub fn fmax(&self) -> f32 {
        self.fmax
    }

    /// Ramp position of magnitude `m`, or `None` below the threshold.
    ///
    /// Both ends are inclusive: `m == fthresh` gives 0, `m >= fmax` gives 1.
    pub fn intensity(&self, m: f32) -> Option<f32> {
        if m.is_nan() || m < self.fthresh {
            return None;
        }
        Some(((m - self.fthresh) / (self.fmax - self.fthresh)).clamp(0.0, 1.0))
    }
}

fn validate_bounds(fthresh: f32, fmax: f32) -> Result<()> {
    let reason = if !fthresh.is_finite() || !fmax.is_finite() {
        Some("bounds must be finite")
    } else if fthresh < 0.0 {
        Some("fthresh must be non-negative")
    } else if fmax <= fthresh {
        Some("fmax must be greater than fthresh")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(SnapError::InvalidColorMapParams {
            fthresh,
            fmax,
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = ColorMapParams::new(2.0, 1.0).unwrap_err();
        match err {
            SnapError::InvalidColorMapParams { fthresh, fmax, .. } => {
                assert_eq!(fthresh, 2.0);
                assert_eq!(fmax, 1.0);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(ColorMapParams::new(1.0, 1.0).is_err());
        assert!(ColorMapParams::new(-0.1, 1.0).is_err());
        assert!(ColorMapParams::new(0.0, f32::INFINITY).is_err());
        assert!(ColorMapParams::new(0.0, 1.0).is_ok());
    }

    #[test]
    fn test_intensity_ramp() {
        let params = ColorMapParams::new(0.2, 0.8).unwrap();
        assert_eq!(params.intensity(0.1), None);
        assert_eq!(params.intensity(0.2), Some(0.0));
        assert!((params.intensity(0.5).unwrap() - 0.5).abs() < 1e-6);
        assert_eq!(params.intensity(0.8), Some(1.0));
        assert_eq!(params.intensity(12.0), Some(1.0));
        assert_eq!(params.intensity(f32::NAN), None);
    }

    #[test]
    fn test_heat_segments() {
        assert!(approx(heat_positive(0.0), Vec3::new(0.5625, 0.0, 0.0)));
        assert!(approx(heat_positive(0.5), Vec3::new(1.0, 0.25, 0.0)));
        assert!(approx(heat_positive(1.0), Vec3::new(1.0, 1.0, 0.0)));
        assert!(approx(heat_negative(0.0), Vec3::new(0.0, 0.0, 0.5625)));
        assert!(approx(heat_negative(1.0), Vec3::new(0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_sequential_maps_ignore_pole() {
        for kind in [ColorMapKind::Viridis, ColorMapKind::Blues, ColorMapKind::Reds] {
            assert!(!kind.is_diverging());
            assert_eq!(
                kind.color(Pole::Positive, 0.4),
                kind.color(Pole::Negative, 0.4)
            );
        }
        assert!(approx(
            ColorMapKind::Viridis.color(Pole::Positive, 1.0),
            Vec3::new(0.993, 0.906, 0.144)
        ));
    }

    #[test]
    fn test_coolwarm_poles_meet_at_center() {
        let pos = ColorMapKind::CoolWarm.color(Pole::Positive, 0.0);
        let neg = ColorMapKind::CoolWarm.color(Pole::Negative, 0.0);
        assert!(approx(pos, neg));
        assert!(approx(
            ColorMapKind::CoolWarm.color(Pole::Positive, 1.0),
            Vec3::new(0.706, 0.016, 0.150)
        ));
    }

    #[test]
    fn test_estimate_fills_missing_bounds() {
        let overlay = [0.5, -2.0, f32::NAN, 1.0];
        let params = ColorMapParams::estimate(&overlay, None, None).unwrap();
        assert_eq!(params.fthresh(), 0.5);
        assert_eq!(params.fmax(), 2.0);

        let params = ColorMapParams::estimate(&overlay, Some(0.0), None).unwrap();
        assert_eq!(params.fthresh(), 0.0);

        assert!(ColorMapParams::estimate(&[f32::NAN], Some(0.0), Some(1.0)).is_ok());
    }

    #[test]
    fn test_estimate_without_finite_values_uses_placeholders() {
        let params = ColorMapParams::estimate(&[f32::NAN; 3], None, None).unwrap();
        assert_eq!((params.fthresh(), params.fmax()), (0.0, 1.0));
        let params = ColorMapParams::estimate(&[f32::NAN], None, Some(4.0)).unwrap();
        assert_eq!((params.fthresh(), params.fmax()), (0.0, 4.0));
        let params = ColorMapParams::estimate(&[f32::INFINITY], Some(2.0), None).unwrap();
        assert_eq!((params.fthresh(), params.fmax()), (2.0, 3.0));
        // explicit bounds are still checked
        assert!(ColorMapParams::estimate(&[f32::NAN], Some(-1.0), None).is_err());
        assert!(ColorMapParams::estimate(&[f32::NAN], Some(2.0), Some(1.0)).is_err());
    }

    #[test]
    fn test_estimate_flat_overlay_sits_at_ramp_bottom() {
        let overlay = [2.5, -2.5, 2.5, f32::NAN];
        let params = ColorMapParams::estimate(&overlay, None, None).unwrap();
        assert_eq!(params.fthresh(), 2.5);
        assert_eq!(params.intensity(2.5), Some(0.0));

        let params = ColorMapParams::estimate(&overlay, Some(3.0), None).unwrap();
        assert_eq!((params.fthresh(), params.fmax()), (3.0, 4.0));
        assert_eq!(params.intensity(2.5), None);

        let params = ColorMapParams::estimate(&overlay, None, Some(2.0)).unwrap();
        assert_eq!((params.fthresh(), params.fmax()), (0.0, 2.0));

        let params = ColorMapParams::estimate(&[0.0; 4], None, None).unwrap();
        assert_eq!((params.fthresh(), params.fmax()), (0.0, 1.0));
    }

    #[test]
    fn test_names_round_trip() {
        for kind in ColorMapKind::ALL {
            assert_eq!(ColorMapKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ColorMapKind::from_name("jet"), None);
    }
}
