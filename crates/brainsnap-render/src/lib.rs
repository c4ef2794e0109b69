//! Rendering backend for brainsnap-rs.
//!
//! This crate provides the wgpu-based rendering engine, including:
//! - GPU resource management (buffers, textures, pipeline)
//! - The surface shader with its fixed lighting rig (WGSL)
//! - Frame readback and image file output

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod engine;
pub mod error;
pub mod mesh_render;
pub mod screenshot;

pub use engine::RenderEngine;
pub use error::{RenderError, RenderResult};
pub use mesh_render::{FrameUniforms, MeshRenderData};
pub use screenshot::{encode_png, save_image, ScreenshotError};
