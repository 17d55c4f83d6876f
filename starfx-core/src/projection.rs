/// Screen-space projection for the starfield and the wireframe
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// Reference display of the embedded target
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;

/// An integer pixel coordinate. May lie outside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Fixed-size pixel grid the effects draw onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn half_width(&self) -> i32 {
        (self.width / 2) as i32
    }

    pub fn half_height(&self) -> i32 {
        (self.height / 2) as i32
    }

    /// Whether a projected point lands on the grid
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= 0 && point.y >= 0 && point.x < self.width as i32 && point.y < self.height as i32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

/// Perspective camera looking down +z from `viewer_distance` in front of the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub fov: f32,
    pub viewer_distance: f32,
}

impl Camera {
    pub fn new(fov: f32, viewer_distance: f32) -> Self {
        Self {
            fov,
            viewer_distance,
        }
    }

    /// Project a 3D point to 2D screen space
    pub fn project(&self, point: &Point3<f32>, viewport: &Viewport) -> Option<ScreenPoint> {
        project(point, self.fov, self.viewer_distance, viewport)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(128.0, 3.0)
    }
}

/// Divide by `viewer_distance + z`, truncate, then shift to the screen center.
///
/// Returns `None` when the divisor is zero or the result is not finite; the
/// caller skips the point for this frame.
pub fn project(
    point: &Point3<f32>,
    fov: f32,
    viewer_distance: f32,
    viewport: &Viewport,
) -> Option<ScreenPoint> {
    let divisor = viewer_distance + point.z;
    if divisor == 0.0 {
        return None;
    }

    let sx = point.x * fov / divisor;
    let sy = point.y * fov / divisor;
    if !sx.is_finite() || !sy.is_finite() {
        return None;
    }

    Some(ScreenPoint::new(
        sx as i32 + viewport.half_width(),
        sy as i32 + viewport.half_height(),
    ))
}

/// Star projection: divide the panned position by raw depth and scale by the
/// half extents. Truncation happens after re-centering.
///
/// As `depth` approaches zero the point rushes outward, which is the whole
/// point of the effect; this must stay distinct from [`project`].
pub fn project_star(position: &Point2<f32>, depth: f32, viewport: &Viewport) -> Option<ScreenPoint> {
    if depth == 0.0 {
        return None;
    }

    let half_w = viewport.half_width() as f32;
    let half_h = viewport.half_height() as f32;
    let sx = (position.x / depth) * half_w + half_w;
    let sy = (position.y / depth) * half_h + half_h;
    if !sx.is_finite() || !sy.is_finite() {
        return None;
    }

    Some(ScreenPoint::new(sx as i32, sy as i32))
}
