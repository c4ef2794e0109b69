//! brainsnap-rs: snapshots of cortical surface meshes with overlays.
//!
//! Give it a triangle mesh and per-vertex data, and it renders lit images
//! with a thresholded color ramp: single views, left/right four-view
//! composites and rotation frame sequences.
//!
//! # Quick Start
//!
//! ```no_run
//! use brainsnap::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mesh = GeometryModel::from_arrays(
//!         &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
//!         &[[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
//!     )?;
//!     let scalars = ScalarField::new(&mesh).with_overlay(vec![0.1, 0.5, 0.9, 0.3])?;
//!
//!     let options = SnapOptions::default().with_thresholds(0.2, 0.8);
//!     let mut compositor = headless_compositor(&options)?;
//!     let frame = snap_view(&mut compositor, &mesh, &scalars, &options)?;
//!     save_frame_png("tetrahedron.png", &frame)?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`brainsnap_core`] holds the data model and every GPU-free algorithm
//! - [`brainsnap_render`] implements [`FrameRenderer`] with wgpu
//! - this crate composes frames and writes them out through [`FrameSink`]s

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod compositor;
pub mod headless;
pub mod session;
pub mod sink;
pub mod snapshot;

// Re-export core types
pub use brainsnap_core::{
    rotation_azimuths, CameraRig, ColorMapKind, ColorMapOptions, ColorMapParams, ColorMapper,
    ColorSelection, Colorbar, ColorbarOptions, ColorbarOrientation, FnSink, Frame, FrameRenderer,
    FrameSink, GeometryIssue, GeometryModel, LabelTable, LightingOptions, OverlaySummary,
    ProjectionMode, Rescale, Result, RotationOptions, ScalarField, SnapError, SnapOptions, Tick,
    TickKind, VertexColors, ViewKind, ViewState, Mat3, Mat4, Vec3, Vec4,
};

// Re-export render types
pub use brainsnap_render::{RenderEngine, RenderError};

pub use compositor::{
    compose_four_view, decorate_single, label_colorbar, CaptionRenderer, ColoredMesh,
    Compositor, Decorations,
};
pub use headless::{headless_compositor, headless_renderer};
pub use session::SnapSession;
pub use sink::{save_frame_png, PngSink};
pub use snapshot::{snap_four_view, snap_rotation, snap_view, HemisphereInput};

/// Initializes `env_logger` once; later calls are no-ops.
///
/// Verbosity follows `RUST_LOG`.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
