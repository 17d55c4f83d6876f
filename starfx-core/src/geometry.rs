/// Wireframe objects and their rotation
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::projection::{Camera, ScreenPoint, Viewport};
use crate::transform::RotationState;

/// Vertices in object space and the index pairs joining them
#[derive(Debug, Clone, PartialEq)]
pub struct Wireframe {
    pub vertices: Vec<Point3<f32>>,
    pub edges: Vec<(usize, usize)>,
}

impl Wireframe {
    pub fn new(vertices: Vec<Point3<f32>>, edges: Vec<(usize, usize)>) -> Self {
        debug_assert!(edges
            .iter()
            .all(|&(a, b)| a < vertices.len() && b < vertices.len()));
        Self { vertices, edges }
    }

    /// Regular tetrahedron inscribed in the cube of half-size 1
    pub fn tetrahedron() -> Self {
        Self::new(
            vec![
                Point3::new(1.0, 1.0, 1.0),
                Point3::new(-1.0, -1.0, 1.0),
                Point3::new(-1.0, 1.0, -1.0),
                Point3::new(1.0, -1.0, -1.0),
            ],
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
        )
    }

    pub fn footprint_bytes(&self) -> usize {
        self.vertices.len() * std::mem::size_of::<Point3<f32>>()
            + self.edges.len() * std::mem::size_of::<(usize, usize)>()
    }
}

/// Tunables for the wireframe effect
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WireframeParams {
    pub camera: Camera,
    /// Radians added to each axis angle per tick
    pub spin: RotationState,
    pub frame_period_ms: u64,
}

impl Default for WireframeParams {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            spin: RotationState::new(0.01, 0.015, 0.02),
            frame_period_ms: 33,
        }
    }
}

/// A wireframe tumbling at a constant rate per axis
pub struct WireframeSim {
    wireframe: Wireframe,
    rotation: RotationState,
    spin: RotationState,
    camera: Camera,
    viewport: Viewport,
}

impl WireframeSim {
    pub fn new(wireframe: Wireframe, params: &WireframeParams, viewport: Viewport) -> Self {
        Self {
            wireframe,
            rotation: RotationState::zero(),
            spin: params.spin,
            camera: params.camera,
            viewport,
        }
    }

    pub fn tick(&mut self) {
        self.rotation.rotate(self.spin.x, self.spin.y, self.spin.z);
    }

    /// Rotated and projected vertices for the current angles, in vertex
    /// order. `None` marks a vertex that cannot be projected this frame.
    pub fn snapshot(&self) -> Vec<Option<ScreenPoint>> {
        self.wireframe
            .vertices
            .iter()
            .map(|vertex| self.camera.project(&self.rotation.apply(vertex), &self.viewport))
            .collect()
    }

    pub fn wireframe(&self) -> &Wireframe {
        &self.wireframe
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}
