//! Wgpu-backed renderer construction.

use brainsnap_core::{Result, SnapOptions};
use brainsnap_render::RenderEngine;

use crate::compositor::Compositor;

/// Creates an offscreen wgpu renderer of the given frame size.
///
/// Fails with [`brainsnap_core::SnapError::RenderContext`] when no adapter
/// or device is available.
pub fn headless_renderer(width: u32, height: u32) -> Result<RenderEngine> {
    let engine = RenderEngine::headless(width, height)?;
    log::info!("headless renderer ready ({width}x{height})");
    Ok(engine)
}

/// A compositor around a headless renderer sized for `options`.
pub fn headless_compositor(options: &SnapOptions) -> Result<Compositor<RenderEngine>> {
    options.validate()?;
    Ok(Compositor::new(headless_renderer(options.width, options.height)?))
}
