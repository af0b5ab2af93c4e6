//! Immediate-style batching over a [`GraphicsDevice`]
//!
//! The renderer owns two sets of device buffers: an indexed set for shapes
//! (polygons and lines) and a non-indexed set for line strips. Every draw call
//! rebuilds its geometry in a scratch vector, uploads it at offset zero and
//! issues exactly one draw.

use super::device::{
    BufferMode, DeviceError, GraphicsDevice, INDEX_SIZE, IndexBuffer, PrimitiveTopology, Vertex,
    VertexArray, VertexBuffer,
};
use crate::components::TrailBuffer;
use crate::config::RenderingConfig;
use crate::utils::color::Rgb;
use bevy::log::warn;
use bevy::math::Vec2;
use std::f32::consts::TAU;

/// Capacity of the renderer's device buffers, in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub max_vertices: usize,
    pub max_indices: usize,
    pub max_strip_vertices: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_vertices: 1024,
            max_indices: 4096,
            max_strip_vertices: 65535,
        }
    }
}

impl From<&RenderingConfig> for BatchLimits {
    fn from(config: &RenderingConfig) -> Self {
        Self {
            max_vertices: config.max_shape_vertices,
            max_indices: config.max_shape_indices,
            max_strip_vertices: config.max_strip_vertices,
        }
    }
}

impl BatchLimits {
    /// Largest polygon that fits: one center vertex plus one per side, three
    /// indices per side.
    pub fn max_polygon_sides(&self) -> usize {
        self.max_vertices
            .saturating_sub(1)
            .min(self.max_indices / 3)
    }
}

/// Counters since the renderer was created or last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub draw_calls: usize,
    pub vertices_uploaded: usize,
    pub indices_uploaded: usize,
    pub truncations: usize,
}

#[derive(Debug)]
pub struct BatchRenderer {
    limits: BatchLimits,
    shape_vertices: VertexBuffer,
    shape_indices: IndexBuffer,
    shape_array: VertexArray,
    strip_vertices: VertexBuffer,
    strip_array: VertexArray,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    stats: BatchStats,
}

impl BatchRenderer {
    pub fn new<D: GraphicsDevice + ?Sized>(
        device: &mut D,
        limits: BatchLimits,
    ) -> Result<Self, DeviceError> {
        let shape_vertices = device.create_vertex_buffer(
            &[],
            limits.max_vertices * Vertex::SIZE,
            BufferMode::Dynamic,
        )?;
        let shape_indices = device.create_index_buffer(
            &[],
            limits.max_indices * INDEX_SIZE,
            BufferMode::Dynamic,
        )?;
        let shape_array =
            device.create_vertex_array(&shape_vertices, Some(&shape_indices), &Vertex::LAYOUT)?;

        let strip_vertices = device.create_vertex_buffer(
            &[],
            limits.max_strip_vertices * Vertex::SIZE,
            BufferMode::Dynamic,
        )?;
        let strip_array = device.create_vertex_array(&strip_vertices, None, &Vertex::LAYOUT)?;

        Ok(Self {
            limits,
            shape_vertices,
            shape_indices,
            shape_array,
            strip_vertices,
            strip_array,
            vertices: Vec::with_capacity(limits.max_vertices),
            indices: Vec::with_capacity(limits.max_indices),
            stats: BatchStats::default(),
        })
    }

    pub fn limits(&self) -> BatchLimits {
        self.limits
    }

    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = BatchStats::default();
    }

    /// Filled regular polygon as a triangle fan around `center`.
    ///
    /// Vertex 0 is the center and vertex `i + 1` sits at angle `i·2π/sides`.
    /// Fewer than three sides draws nothing.
    pub fn draw_polygon<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        center: Vec2,
        radius: f32,
        sides: u32,
        color: Rgb,
    ) -> Result<(), DeviceError> {
        let mut sides = sides as usize;
        let max_sides = self.limits.max_polygon_sides();
        if sides > max_sides {
            debug_assert!(
                sides <= max_sides,
                "polygon with {sides} sides exceeds batch limit of {max_sides}"
            );
            warn!("Polygon with {} sides truncated to {}", sides, max_sides);
            self.stats.truncations += 1;
            sides = max_sides;
        }
        if sides < 3 {
            return Ok(());
        }

        let color = color.to_array();
        self.vertices.clear();
        self.indices.clear();

        self.vertices.push(Vertex::new(center.to_array(), color));
        let step = TAU / sides as f32;
        for i in 0..sides {
            let angle = i as f32 * step;
            let point = center + radius * Vec2::new(angle.cos(), angle.sin());
            self.vertices.push(Vertex::new(point.to_array(), color));

            let i = i as u32;
            self.indices.extend_from_slice(&[0, i + 1, i + 2]);
        }

        // Close the fan on the first perimeter vertex
        if let Some(last) = self.indices.last_mut() {
            *last = 1;
        }

        self.flush_shapes(device, PrimitiveTopology::TriangleList)
    }

    /// Single segment from `a` to `b`.
    pub fn draw_line<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        a: Vec2,
        b: Vec2,
        color: Rgb,
    ) -> Result<(), DeviceError> {
        let color = color.to_array();
        self.vertices.clear();
        self.indices.clear();

        self.vertices.push(Vertex::new(a.to_array(), color));
        self.vertices.push(Vertex::new(b.to_array(), color));
        self.indices.extend_from_slice(&[0, 1]);

        self.flush_shapes(device, PrimitiveTopology::LineList)
    }

    /// Connected polyline through `points` in order.
    pub fn draw_strip<D, I>(&mut self, device: &mut D, points: I, color: Rgb) -> Result<(), DeviceError>
    where
        D: GraphicsDevice + ?Sized,
        I: IntoIterator<Item = Vec2>,
    {
        let color = color.to_array();
        self.vertices.clear();
        self.vertices
            .extend(points.into_iter().map(|point| Vertex::new(point.to_array(), color)));

        self.flush_strip(device)
    }

    /// Draws a body's trail oldest to newest.
    pub fn draw_trail<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        trail: &TrailBuffer,
        color: Rgb,
    ) -> Result<(), DeviceError> {
        self.vertices.clear();
        trail.copy_into(&mut self.vertices, color);

        self.flush_strip(device)
    }

    /// Releases every device resource the renderer owns.
    pub fn destroy<D: GraphicsDevice + ?Sized>(self, device: &mut D) {
        device.destroy_vertex_array(self.shape_array);
        device.destroy_vertex_array(self.strip_array);
        device.destroy_index_buffer(self.shape_indices);
        device.destroy_vertex_buffer(self.shape_vertices);
        device.destroy_vertex_buffer(self.strip_vertices);
    }

    fn flush_shapes<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        topology: PrimitiveTopology,
    ) -> Result<(), DeviceError> {
        device.update_vertex_buffer(&self.shape_vertices, 0, &self.vertices)?;
        device.update_index_buffer(&self.shape_indices, 0, &self.indices)?;

        device.bind_vertex_array(Some(&self.shape_array))?;
        device.draw_indexed(topology, self.indices.len())?;
        device.bind_vertex_array(None)?;

        self.stats.draw_calls += 1;
        self.stats.vertices_uploaded += self.vertices.len();
        self.stats.indices_uploaded += self.indices.len();
        Ok(())
    }

    fn flush_strip<D: GraphicsDevice + ?Sized>(&mut self, device: &mut D) -> Result<(), DeviceError> {
        let max = self.limits.max_strip_vertices;
        if self.vertices.len() > max {
            debug_assert!(
                self.vertices.len() <= max,
                "strip of {} points exceeds batch limit of {max}",
                self.vertices.len()
            );
            warn!(
                "Line strip of {} points truncated to the newest {}",
                self.vertices.len(),
                max
            );
            self.stats.truncations += 1;
            let excess = self.vertices.len() - max;
            self.vertices.drain(..excess);
        }
        if self.vertices.len() < 2 {
            return Ok(());
        }

        device.update_vertex_buffer(&self.strip_vertices, 0, &self.vertices)?;

        device.bind_vertex_array(Some(&self.strip_array))?;
        device.draw(PrimitiveTopology::LineStrip, 0, self.vertices.len())?;
        device.bind_vertex_array(None)?;

        self.stats.draw_calls += 1;
        self.stats.vertices_uploaded += self.vertices.len();
        Ok(())
    }
}
