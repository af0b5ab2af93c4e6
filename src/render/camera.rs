//! 2D camera: pan offset plus zoom, folded into one orthographic matrix

use bevy::math::{Mat4, Vec2};

/// Pan and zoom state for the scene camera.
///
/// `zoom` scales the visible extent, so larger values show more of the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// Screen-space translation in pixels, applied before projection
    pub offset: Vec2,
    pub zoom: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl CameraView {
    pub fn new(offset: Vec2, zoom: f32) -> Self {
        Self { offset, zoom }
    }

    /// Projection × view for a viewport of `viewport` pixels.
    pub fn matrix(&self, viewport: Vec2) -> Mat4 {
        let half = viewport * 0.5 * self.zoom;
        let projection = Mat4::orthographic_rh_gl(-half.x, half.x, -half.y, half.y, -1.0, 1.0);
        let view = Mat4::from_translation(self.offset.extend(0.0));
        projection * view
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Adds `delta` to the zoom, never going below `min_zoom`.
    pub fn zoom_by(&mut self, delta: f32, min_zoom: f32) {
        self.set_zoom(self.zoom + delta, min_zoom);
    }

    pub fn set_zoom(&mut self, zoom: f32, min_zoom: f32) {
        self.zoom = if zoom.is_finite() {
            zoom.max(min_zoom)
        } else {
            min_zoom
        };
    }
}

/// Maps a screen-space point through `camera` into clip space.
#[inline]
pub fn to_clip(camera: &Mat4, point: Vec2) -> Vec2 {
    let clip = *camera * point.extend(0.0).extend(1.0);
    Vec2::new(clip.x, clip.y)
}
