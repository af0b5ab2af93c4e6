//! Numeric types shared by the physics and rendering code

/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 2D vector type for positions, velocities, and forces
pub type Vector = bevy::math::DVec2;

/// 2D vector type for screen-space geometry handed to the renderer
pub type ScreenVector = bevy::math::Vec2;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vector, b: Vector) -> Scalar {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    libm::sqrt(dx * dx + dy * dy)
}

/// Converts a world-space position in meters to screen-space pixels.
///
/// The result is not camera-relative; panning and zooming happen in the
/// camera matrix uploaded to the device.
#[inline]
pub fn world_to_screen(position: Vector, meters_to_pixels: Scalar) -> ScreenVector {
    ScreenVector::new(
        (position.x * meters_to_pixels) as f32,
        (position.y * meters_to_pixels) as f32,
    )
}
