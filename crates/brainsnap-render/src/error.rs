//! Rendering error types.

use brainsnap_core::SnapError;
use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// The requested target size is zero or exceeds the device limit.
    #[error("invalid render target size {width}x{height} (device limit {limit})")]
    InvalidDimensions { width: u32, height: u32, limit: u32 },

    /// A draw or color update was requested before any mesh was loaded.
    #[error("no mesh loaded")]
    NoMesh,

    /// The color array does not cover the loaded mesh.
    #[error("{actual} colors supplied for a mesh with {expected} vertices")]
    ColorCountMismatch { expected: usize, actual: usize },

    /// Reading the rendered frame back from the GPU failed.
    #[error("GPU buffer mapping failed")]
    BufferMapFailed,

    /// Timeout waiting for GPU.
    #[error("timeout waiting for GPU: {0}")]
    Timeout(String),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for SnapError {
    fn from(err: RenderError) -> Self {
        SnapError::RenderContext(err.to_string())
    }
}
