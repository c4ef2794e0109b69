//! Normalized triangle mesh representation.
//!
//! A [`GeometryModel`] is built once from externally parsed vertex and face
//! arrays and is immutable afterwards. Vertex indices are the canonical IDs
//! used by every per-vertex array in [`crate::ScalarField`].

use glam::Vec3;

use crate::error::{GeometryIssue, Result, SnapError};

/// A validated triangle mesh with per-vertex unit normals.
#[derive(Debug, Clone)]
pub struct GeometryModel {
    vertices: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
    normals: Vec<Vec3>,
}

/// Sphere enclosing every vertex of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl GeometryModel {
    /// Creates a mesh and derives vertex normals from the faces.
    ///
    /// Fails if either array is empty, a face index is out of range, or a
    /// coordinate is not finite.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Result<Self> {
        validate(&vertices, &faces)?;
        let normals = compute_vertex_normals(&vertices, &faces);
        Ok(Self {
            vertices,
            faces,
            normals,
        })
    }

    /// Creates a mesh using normals supplied by the source format.
    ///
    /// The normals are re-normalized; zero-length entries become +Z.
    pub fn with_normals(
        vertices: Vec<Vec3>,
        faces: Vec<[u32; 3]>,
        normals: Vec<Vec3>,
    ) -> Result<Self> {
        validate(&vertices, &faces)?;
        if normals.len() != vertices.len() {
            return Err(SnapError::InvalidGeometry(
                GeometryIssue::NormalCountMismatch {
                    expected: vertices.len(),
                    actual: normals.len(),
                },
            ));
        }
        if let Some(vertex) = normals.iter().position(|n| !n.is_finite()) {
            return Err(SnapError::InvalidGeometry(GeometryIssue::NonFiniteNormal {
                vertex,
            }));
        }
        let normals = normals.into_iter().map(unit_or_z).collect();
        Ok(Self {
            vertices,
            faces,
            normals,
        })
    }

    /// Creates a mesh from flat `N x 3` coordinate and `M x 3` index arrays.
    pub fn from_arrays(vertices: &[[f32; 3]], faces: &[[u32; 3]]) -> Result<Self> {
        Self::new(
            vertices.iter().copied().map(Vec3::from_array).collect(),
            faces.to_vec(),
        )
    }

    /// Returns a copy recentred on its bounding-box center and scaled so the
    /// largest bounding-box extent equals `scale`.
    #[must_use]
    pub fn normalized(&self, scale: f32) -> Self {
        let (min, max) = self.bounding_box();
        let center = (min + max) * 0.5;
        let extent = (max - min).max_element();
        let factor = if extent > f32::EPSILON {
            scale / extent
        } else {
            1.0
        };
        let vertices = self
            .vertices
            .iter()
            .map(|&v| (v - center) * factor)
            .collect();
        Self {
            vertices,
            faces: self.faces.clone(),
            normals: self.normals.clone(),
        }
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Triangles as vertex index triples.
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Per-vertex unit normals.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Flattened triangle indices, ready for an index buffer.
    pub fn index_buffer(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), &v| (min.min(v), max.max(v)),
        )
    }

    /// Sphere centred on the bounding box that encloses every vertex.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        let (min, max) = self.bounding_box();
        let center = (min + max) * 0.5;
        let radius = self
            .vertices
            .iter()
            .map(|v| v.distance(center))
            .fold(0.0_f32, f32::max);
        BoundingSphere { center, radius }
    }
}

fn validate(vertices: &[Vec3], faces: &[[u32; 3]]) -> Result<()> {
    if vertices.is_empty() {
        return Err(SnapError::InvalidGeometry(GeometryIssue::NoVertices));
    }
    if faces.is_empty() {
        return Err(SnapError::InvalidGeometry(GeometryIssue::NoFaces));
    }
    if let Some(vertex) = vertices.iter().position(|v| !v.is_finite()) {
        return Err(SnapError::InvalidGeometry(GeometryIssue::NonFiniteVertex {
            vertex,
        }));
    }
    let vertex_count = vertices.len();
    for (face, tri) in faces.iter().enumerate() {
        if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(SnapError::InvalidGeometry(
                GeometryIssue::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                },
            ));
        }
    }
    Ok(())
}

/// Accumulates the unnormalized cross product of each face into its three
/// corners, so larger faces weigh more, then normalizes per vertex.
pub fn compute_vertex_normals(vertices: &[Vec3], faces: &[[u32; 3]]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];
    for &[a, b, c] in faces {
        let v0 = vertices[a as usize];
        let v1 = vertices[b as usize];
        let v2 = vertices[c as usize];
        let face_normal = (v1 - v0).cross(v2 - v0);
        normals[a as usize] += face_normal;
        normals[b as usize] += face_normal;
        normals[c as usize] += face_normal;
    }
    normals.into_iter().map(unit_or_z).collect()
}

// Isolated vertices and fully degenerate fans have no direction to offer.
fn unit_or_z(n: Vec3) -> Vec3 {
    n.try_normalize().unwrap_or(Vec3::Z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> GeometryModel {
        GeometryModel::from_arrays(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            &[[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_tetrahedron_normals_are_unit() {
        let mesh = tetrahedron();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 4);
        for n in mesh.normals() {
            assert!((n.length() - 1.0).abs() < 1e-5, "normal {n} is not unit");
        }
        // Outward orientation: the apex at the origin points into the negative octant.
        let n0 = mesh.normals()[0];
        assert!(n0.x < 0.0 && n0.y < 0.0 && n0.z < 0.0);
    }

    #[test]
    fn test_single_triangle_normal() {
        let mesh =
            GeometryModel::from_arrays(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]], &[[0, 1, 2]])
                .unwrap();
        for n in mesh.normals() {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_isolated_vertex_gets_fallback_normal() {
        let mesh = GeometryModel::from_arrays(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
                [5.0, 5.0, 5.0],
            ],
            &[[0, 1, 2]],
        )
        .unwrap();
        assert_eq!(mesh.normals()[3], Vec3::Z);
        assert!((mesh.normals()[0] - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_face_does_not_fail() {
        let mesh = GeometryModel::from_arrays(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
            &[[0, 1, 2]],
        )
        .unwrap();
        assert!(mesh.normals().iter().all(|&n| n == Vec3::Z));
    }

    #[test]
    fn test_rejects_empty_arrays() {
        let err = GeometryModel::new(vec![], vec![[0, 0, 0]]).unwrap_err();
        assert!(matches!(err, SnapError::InvalidGeometry(GeometryIssue::NoVertices)));

        let err = GeometryModel::new(vec![Vec3::ZERO], vec![]).unwrap_err();
        assert!(matches!(err, SnapError::InvalidGeometry(GeometryIssue::NoFaces)));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let err = GeometryModel::from_arrays(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            &[[0, 1, 2], [0, 1, 3]],
        )
        .unwrap_err();
        match err {
            SnapError::InvalidGeometry(GeometryIssue::FaceIndexOutOfRange {
                face,
                index,
                vertex_count,
            }) => {
                assert_eq!(face, 1);
                assert_eq!(index, 3);
                assert_eq!(vertex_count, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_non_finite_vertex() {
        let err = GeometryModel::from_arrays(
            &[[0.0, 0.0, 0.0], [f32::NAN, 0.0, 0.0], [0.0, f32::INFINITY, 0.0]],
            &[[0, 1, 2]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SnapError::InvalidGeometry(GeometryIssue::NonFiniteVertex { vertex: 1 })
        ));
    }

    #[test]
    fn test_supplied_normals_are_validated() {
        let verts = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let faces = vec![[0, 1, 2]];

        let err = GeometryModel::with_normals(verts.clone(), faces.clone(), vec![Vec3::Z])
            .unwrap_err();
        assert!(matches!(
            err,
            SnapError::InvalidGeometry(GeometryIssue::NormalCountMismatch {
                expected: 3,
                actual: 1
            })
        ));

        let mesh = GeometryModel::with_normals(
            verts,
            faces,
            vec![Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)],
        )
        .unwrap();
        assert_eq!(mesh.normals(), &[Vec3::Z, Vec3::Z, Vec3::Y]);
    }

    #[test]
    fn test_normalized_fits_scale() {
        let mesh = GeometryModel::from_arrays(
            &[[10.0, 20.0, 30.0], [14.0, 20.0, 30.0], [10.0, 22.0, 31.0]],
            &[[0, 1, 2]],
        )
        .unwrap();
        let normalized = mesh.normalized(2.0);
        let (min, max) = normalized.bounding_box();
        assert!(((max - min).max_element() - 2.0).abs() < 1e-5);
        assert!(((min + max) * 0.5).length() < 1e-5);
        assert_eq!(normalized.normals(), mesh.normals());
    }

    #[test]
    fn test_bounding_sphere_encloses_vertices() {
        let mesh = tetrahedron();
        let sphere = mesh.bounding_sphere();
        assert_eq!(sphere.center, Vec3::splat(0.5));
        for v in mesh.vertices() {
            assert!(v.distance(sphere.center) <= sphere.radius + 1e-6);
        }
    }

    #[test]
    fn test_index_buffer_is_flat() {
        let mesh = tetrahedron();
        let indices = mesh.index_buffer();
        assert_eq!(indices.len(), 12);
        assert_eq!(&indices[..3], &[0, 2, 1]);
    }
}
