//! Colorbar strip for the overlay ramp.
//!
//! Only the ramp pixels and numeric tick positions live here; tick text is
//! drawn by whatever caption renderer the caller provides.

use serde::{Deserialize, Serialize};

use crate::color_map::{ColorMapParams, Pole};
use crate::color_mapper::{OverlaySummary, BACKGROUND_LIGHT};
use crate::error::{Result, SnapError};
use crate::frame::{to_byte, Frame, BLACK};

/// Black border along the bar, in pixels.
pub const PAD_ALONG: u32 = 10;
/// Black border across the bar, in pixels.
pub const PAD_ACROSS: u32 = 3;

const BASE_WIDTH: f64 = 200.0;
const BASE_HEIGHT: f64 = 30.0;
/// Ramps are skipped below this threshold and the gap disappears.
const GAP_THRESHOLD: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorbarOrientation {
    #[default]
    Horizontal,
    /// Rotated 90 degrees counter-clockwise; the upper bound is at the top.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Lower,
    MiddleNeg,
    Middle,
    MiddlePos,
    Upper,
}

/// A labelled position along the bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub kind: TickKind,
    /// Pixel coordinate along the bar axis in [`Colorbar::frame`]: x for
    /// horizontal bars, y for vertical ones.
    pub offset: u32,
    pub value: f32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    pub frame: Frame,
    pub ticks: Vec<Tick>,
    pub orientation: ColorbarOrientation,
}

impl Colorbar {
    /// Renders the ramp for `params`, showing the sides present in `summary`.
    ///
    /// A summary with neither sign shows both.
    pub fn render(
        params: &ColorMapParams,
        summary: &OverlaySummary,
        orientation: ColorbarOrientation,
        scale: f32,
    ) -> Result<Self> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (width, height) = (
            (BASE_WIDTH * f64::from(scale)).max(0.0) as u32,
            (BASE_HEIGHT * f64::from(scale)).max(0.0) as u32,
        );
        if width < 2 || height == 0 {
            return Err(SnapError::InvalidConfig(format!(
                "colorbar scale {scale} is too small"
            )));
        }

        let (pos, neg) = match (summary.has_positive, summary.has_negative) {
            (false, false) => (true, true),
            sides => sides,
        };
        let one_sided = !(pos && neg);
        let has_gap = params.fthresh() > GAP_THRESHOLD;

        let w = f64::from(width);
        let (mut ramp, mut gap) = if has_gap {
            (0.42 * w, 0.08 * w)
        } else {
            (0.5 * w, 0.0)
        };
        if one_sided {
            ramp *= 2.0;
            gap *= 2.0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (ramp, gap) = ((ramp as u32).min(width), gap as u32);

        let steps = linspace(0.01, 1.0, ramp as usize);
        let mut column_t: Vec<Option<(Pole, f32)>> = vec![None; width as usize];
        if neg {
            for (j, &t) in steps.iter().rev().enumerate() {
                column_t[j] = Some((Pole::Negative, t));
            }
        }
        if pos {
            let start = (width - ramp) as usize;
            for (j, &t) in steps.iter().enumerate() {
                column_t[start + j] = Some((Pole::Positive, t));
            }
        }

        let gap_byte = to_byte(BACKGROUND_LIGHT);
        let mut strip = Frame::new(width, height);
        for (x, entry) in (0u32..).zip(&column_t) {
            let px = match *entry {
                Some((pole, t)) => {
                    let pole = match (pole, params.invert) {
                        (p, false) => p,
                        (Pole::Positive, true) => Pole::Negative,
                        (Pole::Negative, true) => Pole::Positive,
                    };
                    let c = params.colormap.color(pole, t);
                    [to_byte(c.x), to_byte(c.y), to_byte(c.z), 255]
                }
                None => [gap_byte, gap_byte, gap_byte, 255],
            };
            for y in 0..height {
                strip.set_pixel(x, y, px);
            }
        }

        let padded = strip.padded(PAD_ALONG, PAD_ACROSS, BLACK);
        let ticks = horizontal_ticks(params, pos, neg, width, ramp, gap, has_gap);

        Ok(match orientation {
            ColorbarOrientation::Horizontal => Self {
                frame: padded,
                ticks,
                orientation,
            },
            ColorbarOrientation::Vertical => {
                let length = padded.width();
                Self {
                    frame: padded.rotate_ccw(),
                    ticks: ticks
                        .into_iter()
                        .map(|t| Tick {
                            offset: length - t.offset,
                            ..t
                        })
                        .collect(),
                    orientation,
                }
            }
        })
    }

    pub fn tick(&self, kind: TickKind) -> Option<&Tick> {
        self.ticks.iter().find(|t| t.kind == kind)
    }
}

fn horizontal_ticks(
    params: &ColorMapParams,
    pos: bool,
    neg: bool,
    width: u32,
    ramp: u32,
    gap: u32,
    has_gap: bool,
) -> Vec<Tick> {
    let (fthresh, fmax) = (params.fthresh(), params.fmax());
    let tick = |kind, offset, value: f32, label: String| Tick {
        kind,
        offset: PAD_ALONG + offset,
        value,
        label,
    };

    let mut ticks = Vec::with_capacity(4);
    ticks.push(if neg {
        tick(TickKind::Lower, 0, -fmax, format!("<{:.2}", -fmax))
    } else if has_gap {
        tick(TickKind::Lower, gap, fthresh, format!("{fthresh:.2}"))
    } else {
        tick(TickKind::Lower, 0, 0.0, "0".to_owned())
    });

    if pos && neg {
        if has_gap {
            ticks.push(tick(
                TickKind::MiddleNeg,
                ramp,
                -fthresh,
                format!("{:.2}", -fthresh),
            ));
            ticks.push(tick(
                TickKind::MiddlePos,
                width - ramp,
                fthresh,
                format!("{fthresh:.2}"),
            ));
        } else {
            ticks.push(tick(TickKind::Middle, width / 2, 0.0, "0".to_owned()));
        }
    }

    ticks.push(if pos {
        tick(TickKind::Upper, width, fmax, format!(">{fmax:.2}"))
    } else if has_gap {
        tick(
            TickKind::Upper,
            width - gap,
            -fthresh,
            format!("{:.2}", -fthresh),
        )
    } else {
        tick(TickKind::Upper, width, 0.0, "0".to_owned())
    });
    ticks
}

#[allow(clippy::cast_precision_loss)]
fn linspace(start: f32, end: f32, n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f32;
            (0..n).map(|i| start + step * i as f32).collect()
        }
    }
}
