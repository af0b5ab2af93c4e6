use crate::components::trail::TrailBuffer;
use crate::physics::math::{Scalar, Vector, distance};
use crate::simulation::scenario::BodyDescriptor;
use crate::utils::color::Rgb;

/// One gravitating point mass.
///
/// `distance_from_reference` is bookkeeping refreshed by the force pass; it is
/// stale while the simulation is paused or when no reference body exists.
#[derive(Clone, Debug)]
pub struct Body {
    pub name: String,
    pub mass: Scalar,
    pub distance_from_reference: Scalar,
    /// On-screen radius in pixels, independent of physical size
    pub visual_radius: f32,
    pub position: Vector,
    pub velocity: Vector,
    pub color: Rgb,
    pub is_reference: bool,
    pub trail: TrailBuffer,
}

impl Body {
    pub fn new(name: impl Into<String>, mass: Scalar, position: Vector, velocity: Vector) -> Self {
        Self {
            name: name.into(),
            mass,
            distance_from_reference: 0.0,
            visual_radius: 1.0,
            position,
            velocity,
            color: Rgb::new(1.0, 1.0, 1.0),
            is_reference: false,
            trail: TrailBuffer::default(),
        }
    }

    pub fn with_visual_radius(mut self, radius: f32) -> Self {
        self.visual_radius = radius;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_trail_capacity(mut self, capacity: usize) -> Self {
        self.trail = TrailBuffer::new(capacity);
        self
    }

    pub fn as_reference(mut self) -> Self {
        self.is_reference = true;
        self
    }

    /// Builds a body from a scenario entry.
    ///
    /// When the descriptor gives no explicit position the body starts on the
    /// positive x axis at `distance` meters from the origin.
    pub fn from_descriptor(descriptor: &BodyDescriptor, trail_capacity: usize) -> Self {
        let position = descriptor
            .position
            .map(Vector::from_array)
            .unwrap_or(Vector::new(descriptor.distance, 0.0));

        Self {
            name: descriptor.name.clone(),
            mass: descriptor.mass,
            distance_from_reference: descriptor.distance,
            visual_radius: descriptor.visual_radius,
            position,
            velocity: Vector::from_array(descriptor.velocity),
            color: descriptor.color,
            is_reference: descriptor.is_reference,
            trail: TrailBuffer::new(trail_capacity),
        }
    }

    pub fn distance_to(&self, other: &Body) -> Scalar {
        distance(self.position, other.position)
    }

    pub fn speed(&self) -> Scalar {
        self.velocity.length()
    }

    pub fn momentum(&self) -> Vector {
        self.velocity * self.mass
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::color::palette;

    #[test]
    fn test_builder_sets_fields() {
        let body = Body::new("comet", 10.0, Vector::new(1.0, 2.0), Vector::new(0.0, 3.0))
            .with_visual_radius(4.0)
            .with_color(palette::MARS)
            .with_trail_capacity(16)
            .as_reference();

        assert_eq!(body.name, "comet");
        assert_eq!(body.visual_radius, 4.0);
        assert_eq!(body.color, palette::MARS);
        assert_eq!(body.trail.capacity(), 16);
        assert!(body.is_reference);
        assert_eq!(body.momentum(), Vector::new(0.0, 30.0));
        assert_eq!(body.speed(), 3.0);
    }

    #[test]
    fn test_from_descriptor_places_body_on_x_axis() {
        let descriptor = BodyDescriptor {
            name: "Earth".into(),
            mass: 5.97e24,
            distance: 1.496e11,
            visual_radius: 11.0,
            position: None,
            velocity: [0.0, 29800.0],
            color: palette::EARTH,
            is_reference: false,
        };

        let body = Body::from_descriptor(&descriptor, 32);

        assert_eq!(body.position, Vector::new(1.496e11, 0.0));
        assert_eq!(body.velocity, Vector::new(0.0, 29800.0));
        assert_eq!(body.distance_from_reference, 1.496e11);
        assert_eq!(body.trail.capacity(), 32);
        assert!(!body.is_reference);
    }

    #[test]
    fn test_from_descriptor_prefers_explicit_position() {
        let descriptor = BodyDescriptor {
            position: Some([3.0, 4.0]),
            ..BodyDescriptor::default()
        };

        let body = Body::from_descriptor(&descriptor, 1);
        assert_eq!(body.position, Vector::new(3.0, 4.0));
    }

    #[test]
    fn test_non_finite_detection() {
        let mut body = Body::new("x", 1.0, Vector::ZERO, Vector::ZERO);
        assert!(body.is_finite());

        body.velocity.x = f64::NAN;
        assert!(!body.is_finite());
    }
}
