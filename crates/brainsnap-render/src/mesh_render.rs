//! Surface mesh GPU rendering resources.

use brainsnap_core::{BoundingSphere, GeometryModel, LightingOptions, VertexColors, ViewTransforms};

use crate::buffer::{
    create_index_buffer, create_storage_buffer, create_uniform_buffer, pad_vec3, update_buffer,
};

/// Per-frame uniforms for the surface shader.
/// Note: Layout must match WGSL FrameUniforms exactly (304 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// Camera position in world space (w unused)
    pub camera_pos: [f32; 4],
    /// Light color (RGB, a unused)
    pub light_color: [f32; 4],
    pub ambient_strength: f32,
    /// Specular highlight: 0 = off, 1 = on
    pub specular_enabled: u32,
    pub _pad0: f32,
    pub _pad1: f32,
}

impl Default for FrameUniforms {
    fn default() -> Self {
        let identity = glam::Mat4::IDENTITY.to_cols_array_2d();
        Self {
            model: identity,
            view: identity,
            proj: identity,
            normal_matrix: identity,
            camera_pos: [0.0, 0.0, 1.0, 1.0],
            light_color: [1.0, 1.0, 1.0, 1.0],
            ambient_strength: 0.0,
            specular_enabled: 1,
            _pad0: 0.0,
            _pad1: 0.0,
        }
    }
}

impl FrameUniforms {
    pub fn new(transforms: &ViewTransforms, lighting: &LightingOptions) -> Self {
        let eye = transforms.camera_position;
        Self {
            model: transforms.model.to_cols_array_2d(),
            view: transforms.view.to_cols_array_2d(),
            proj: transforms.projection.to_cols_array_2d(),
            normal_matrix: transforms.normal_matrix.to_cols_array_2d(),
            camera_pos: [eye.x, eye.y, eye.z, 1.0],
            specular_enabled: u32::from(lighting.specular),
            ambient_strength: lighting.ambient,
            ..Self::default()
        }
    }
}

/// GPU resources for one loaded surface mesh.
pub struct MeshRenderData {
    /// Position buffer (storage buffer, vec4 for alignment).
    pub position_buffer: wgpu::Buffer,
    /// Normal buffer (vertex normals, vec4 for alignment).
    pub normal_buffer: wgpu::Buffer,
    /// Color buffer (per-vertex RGBA).
    pub color_buffer: wgpu::Buffer,
    /// Index buffer (triangle indices).
    pub index_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub num_indices: u32,
    pub vertex_count: usize,
    /// Framing sphere of the source geometry.
    pub bounds: BoundingSphere,
}

impl MeshRenderData {
    /// Uploads geometry and initial colors.
    ///
    /// Bindings:
    /// 0: frame uniforms (uniform)
    /// 1: positions (storage)
    /// 2: normals (storage)
    /// 3: colors (storage)
    pub fn new(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        geometry: &GeometryModel,
        colors: &VertexColors,
    ) -> Self {
        let position_buffer = create_storage_buffer(
            device,
            &pad_vec3(geometry.vertices(), 1.0),
            Some("mesh positions"),
        );
        let normal_buffer = create_storage_buffer(
            device,
            &pad_vec3(geometry.normals(), 0.0),
            Some("mesh normals"),
        );
        let color_buffer = create_storage_buffer(device, colors.as_slice(), Some("mesh colors"));
        let index_data = geometry.index_buffer();
        let index_buffer = create_index_buffer(device, &index_data, Some("mesh indices"));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("surface mesh bind group"),
            layout: bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: position_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: normal_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: color_buffer.as_entire_binding(),
                },
            ],
        });

        #[allow(clippy::cast_possible_truncation)]
        let num_indices = index_data.len() as u32;

        Self {
            position_buffer,
            normal_buffer,
            color_buffer,
            index_buffer,
            bind_group,
            num_indices,
            vertex_count: geometry.vertex_count(),
            bounds: geometry.bounding_sphere(),
        }
    }

    /// Updates the per-vertex color buffer in place.
    pub fn update_colors(&self, queue: &wgpu::Queue, colors: &VertexColors) {
        update_buffer(queue, &self.color_buffer, colors.as_slice());
    }
}

/// Creates the uniform buffer shared by every mesh bind group.
pub fn create_frame_uniform_buffer(device: &wgpu::Device) -> wgpu::Buffer {
    create_uniform_buffer(device, &FrameUniforms::default(), Some("frame uniforms"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainsnap_core::{CameraRig, ViewState};

    #[test]
    fn test_frame_uniforms_size() {
        let size = std::mem::size_of::<FrameUniforms>();

        // Verify size is 16-byte aligned for GPU uniform buffers
        assert_eq!(
            size % 16,
            0,
            "FrameUniforms size ({size} bytes) must be 16-byte aligned"
        );

        // 4 matrices (256) + camera_pos (16) + light_color (16) + 4 scalars (16)
        assert_eq!(size, 304);
    }

    #[test]
    fn test_frame_uniforms_default() {
        let uniforms = FrameUniforms::default();
        assert_eq!(uniforms.light_color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(uniforms.ambient_strength, 0.0);
        assert_eq!(uniforms.specular_enabled, 1);
    }

    #[test]
    fn test_frame_uniforms_from_transforms() {
        let bounds = BoundingSphere {
            center: glam::Vec3::ZERO,
            radius: 1.0,
        };
        let transforms = CameraRig::new(700, 500).transforms(bounds, &ViewState::default());
        let lighting = LightingOptions {
            specular: false,
            ambient: 0.2,
        };
        let uniforms = FrameUniforms::new(&transforms, &lighting);
        assert_eq!(uniforms.specular_enabled, 0);
        assert_eq!(uniforms.ambient_strength, 0.2);
        assert_eq!(uniforms.camera_pos[2], transforms.camera_position.z);
        assert_eq!(uniforms.proj, transforms.projection.to_cols_array_2d());
    }
}
