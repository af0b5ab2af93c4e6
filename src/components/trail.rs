use crate::render::device::Vertex;
use crate::utils::color::Rgb;
use bevy::math::Vec2;

/// Bounded history of a body's recent screen-space positions.
///
/// Storage is a ring: once `capacity` points are held, each push overwrites
/// the oldest point. Iteration always runs oldest to newest.
#[derive(Clone, Debug)]
pub struct TrailBuffer {
    points: Vec<Vec2>,
    capacity: usize,
    head: usize,
}

impl TrailBuffer {
    pub const DEFAULT_CAPACITY: usize = 65535;

    pub fn new(capacity: usize) -> Self {
        Self {
            points: Vec::new(),
            capacity,
            head: 0,
        }
    }

    pub fn push(&mut self, point: Vec2) {
        if self.capacity == 0 {
            return;
        }

        if self.points.len() < self.capacity {
            self.points.push(point);
        } else {
            self.points[self.head] = point;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.head = 0;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed point.
    pub fn newest(&self) -> Option<Vec2> {
        if self.points.is_empty() {
            return None;
        }
        let index = (self.head + self.points.len() - 1) % self.points.len();
        Some(self.points[index])
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Vec2> + '_ {
        let (newer, older) = self.points.split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }

    /// Appends every point, oldest first, as a vertex of the given color.
    pub fn copy_into(&self, out: &mut Vec<Vertex>, color: Rgb) {
        let color = color.to_array();
        out.reserve(self.points.len());
        out.extend(self.iter().map(|point| Vertex::new(point.to_array(), color)));
    }
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
