//! Core data model and algorithms for brainsnap-rs.
//!
//! This crate holds everything that does not need a GPU:
//! - [`GeometryModel`] and [`ScalarField`] for validated mesh input
//! - [`ColorMapper`] and [`Colorbar`] for the threshold/saturation color ramp
//! - [`ViewState`] and [`CameraRig`] for named views and rotation sequences
//! - the [`FrameRenderer`] and [`FrameSink`] seams that backends and outputs implement

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod color_map;
pub mod color_mapper;
pub mod colorbar;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod options;
pub mod renderer;
pub mod scalar;
pub mod sink;
pub mod view;

pub use color_map::{ColorMapKind, ColorMapParams, Pole};
pub use color_mapper::{ColorMapper, OverlaySummary, VertexColors};
pub use colorbar::{Colorbar, ColorbarOrientation, Tick, TickKind};
pub use error::{GeometryIssue, Result, SnapError};
pub use frame::Frame;
pub use geometry::{BoundingSphere, GeometryModel};
pub use options::{ColorMapOptions, ColorbarOptions, LightingOptions, RotationOptions, SnapOptions};
pub use renderer::FrameRenderer;
pub use scalar::{ColorSelection, LabelTable, Rescale, ScalarField};
pub use sink::{FnSink, FrameSink};
pub use view::{rotation_azimuths, CameraRig, ProjectionMode, ViewKind, ViewState, ViewTransforms};

// Re-export glam types for convenience
pub use glam::{Mat3, Mat4, Vec3, Vec4};
