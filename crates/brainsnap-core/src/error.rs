//! Error types for brainsnap-rs.

use thiserror::Error;

/// The main error type for brainsnap-rs operations.
///
/// Every variant is a deterministic function of the input, so none of them is
/// worth retrying with the same arguments.
#[derive(Error, Debug)]
pub enum SnapError {
    /// The mesh topology or coordinates are malformed.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(GeometryIssue),

    /// A per-vertex array does not match the vertex count of the mesh.
    #[error("{field} has {actual} values but the mesh has {expected} vertices")]
    ScalarLengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Threshold/saturation bounds are unusable.
    #[error("invalid color map parameters (fthresh={fthresh}, fmax={fmax}): {reason}")]
    InvalidColorMapParams {
        fthresh: f32,
        fmax: f32,
        reason: &'static str,
    },

    /// No usable rendering context, or the context was lost.
    #[error("render context error: {0}")]
    RenderContext(String),

    /// A rotation sequence stopped at `frame` because that frame failed.
    #[error("rotation aborted at frame {frame} of {total}: {source}")]
    RotationAborted {
        frame: usize,
        total: usize,
        #[source]
        source: Box<SnapError>,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An output sink refused a frame.
    #[error("frame sink error: {0}")]
    Sink(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// The specific defect found while validating a mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryIssue {
    /// The vertex array is empty.
    #[error("mesh has no vertices")]
    NoVertices,
    /// The face array is empty.
    #[error("mesh has no faces")]
    NoFaces,
    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, valid range is [0, {vertex_count})")]
    FaceIndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
    /// A vertex coordinate is NaN or infinite.
    #[error("vertex {vertex} has a non-finite coordinate")]
    NonFiniteVertex { vertex: usize },
    /// Supplied normals do not match the vertex count.
    #[error("{actual} normals supplied for {expected} vertices")]
    NormalCountMismatch { expected: usize, actual: usize },
    /// A supplied normal is NaN or infinite.
    #[error("normal of vertex {vertex} is not finite")]
    NonFiniteNormal { vertex: usize },
}

/// A specialized Result type for brainsnap-rs operations.
pub type Result<T> = std::result::Result<T, SnapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = SnapError::InvalidGeometry(GeometryIssue::FaceIndexOutOfRange {
            face: 2,
            index: 9,
            vertex_count: 4,
        });
        let msg = err.to_string();
        assert!(msg.contains("face 2"));
        assert!(msg.contains("vertex 9"));
        assert!(msg.contains("[0, 4)"));

        let err = SnapError::ScalarLengthMismatch {
            field: "overlay",
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "overlay has 3 values but the mesh has 4 vertices");
    }

    #[test]
    fn test_geometry_issue_messages() {
        assert_eq!(GeometryIssue::NoFaces.to_string(), "mesh has no faces");
        assert_eq!(
            GeometryIssue::NormalCountMismatch {
                expected: 4,
                actual: 2
            }
            .to_string(),
            "2 normals supplied for 4 vertices"
        );
        let err = SnapError::InvalidGeometry(GeometryIssue::NonFiniteVertex { vertex: 7 });
        assert_eq!(
            err.to_string(),
            "invalid geometry: vertex 7 has a non-finite coordinate"
        );
    }

    #[test]
    fn test_rotation_abort_keeps_source() {
        use std::error::Error as _;
        let err = SnapError::RotationAborted {
            frame: 3,
            total: 36,
            source: Box::new(SnapError::RenderContext("device lost".into())),
        };
        assert!(err.to_string().contains("frame 3 of 36"));
        assert!(err.source().is_some());
    }
}
