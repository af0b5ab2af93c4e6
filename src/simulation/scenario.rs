//! Initial conditions
//!
//! A [`Scenario`] is the serializable list of bodies a simulation starts from.
//! The default is the ten-body solar system: the Sun at the origin and each
//! planet on the positive x axis moving in +y at its mean orbital speed.

use crate::components::Body;
use crate::physics::math::Scalar;
use crate::utils::color::{Rgb, palette};
use serde::{Deserialize, Serialize};

/// One astronomical unit in meters.
pub const ASTRONOMICAL_UNIT: Scalar = 1.496e11;

/// Mass of the Sun in kilograms.
pub const SOLAR_MASS: Scalar = 1.9891e30;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BodyDescriptor {
    pub name: String,
    /// Kilograms
    pub mass: Scalar,
    /// Initial distance from the origin in meters, along +x unless `position` is set
    pub distance: Scalar,
    /// Pixels
    pub visual_radius: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<[Scalar; 2]>,
    /// Meters per second
    pub velocity: [Scalar; 2],
    pub color: Rgb,
    pub is_reference: bool,
}

impl Default for BodyDescriptor {
    fn default() -> Self {
        Self {
            name: String::from("body"),
            mass: 1.0,
            distance: 0.0,
            visual_radius: 4.0,
            position: None,
            velocity: [0.0, 0.0],
            color: palette::FOREGROUND,
            is_reference: false,
        }
    }
}

impl BodyDescriptor {
    fn orbiting(
        name: &str,
        mass: Scalar,
        distance: Scalar,
        visual_radius: f32,
        speed: Scalar,
        color: Rgb,
    ) -> Self {
        Self {
            name: name.to_string(),
            mass,
            distance,
            visual_radius,
            position: None,
            velocity: [0.0, speed],
            color,
            is_reference: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Scenario {
    pub bodies: Vec<BodyDescriptor>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::solar_system(ASTRONOMICAL_UNIT)
    }
}

impl Scenario {
    pub fn new(bodies: Vec<BodyDescriptor>) -> Self {
        Self { bodies }
    }

    pub fn empty() -> Self {
        Self { bodies: Vec::new() }
    }

    /// Sun, eight planets and Pluto with mean distances and orbital speeds.
    pub fn solar_system(au: Scalar) -> Self {
        let sun = BodyDescriptor {
            name: "Sun".to_string(),
            mass: SOLAR_MASS,
            distance: 0.0,
            visual_radius: 35.0,
            position: None,
            velocity: [0.0, 0.0],
            color: palette::SUN,
            is_reference: true,
        };

        Self::new(vec![
            sun,
            BodyDescriptor::orbiting("Mercury", 0.330e24, 0.387 * au, 4.0, 47400.0, palette::MERCURY),
            BodyDescriptor::orbiting("Venus", 4.98e24, 0.72 * au, 10.0, 35000.0, palette::VENUS),
            BodyDescriptor::orbiting("Earth", 5.97e24, au, 11.0, 29800.0, palette::EARTH),
            BodyDescriptor::orbiting("Mars", 0.642e24, 1.5 * au, 8.0, 24100.0, palette::MARS),
            BodyDescriptor::orbiting("Jupiter", 1868e24, 5.2 * au, 30.0, 13100.0, palette::JUPITER),
            BodyDescriptor::orbiting("Saturn", 568e24, 9.5 * au, 28.0, 9700.0, palette::SATURN),
            BodyDescriptor::orbiting("Uranus", 86.8e24, 19.0 * au, 18.0, 6800.0, palette::URANUS),
            BodyDescriptor::orbiting("Neptune", 102e24, 30.0 * au, 18.0, 5400.0, palette::NEPTUNE),
            BodyDescriptor::orbiting("Pluto", 0.0130e24, 39.0 * au, 3.0, 4700.0, palette::PLUTO),
        ])
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Instantiates every descriptor with an empty trail of `trail_capacity` points.
    pub fn build_bodies(&self, trail_capacity: usize) -> Vec<Body> {
        self.bodies
            .iter()
            .map(|descriptor| Body::from_descriptor(descriptor, trail_capacity))
            .collect()
    }
}
