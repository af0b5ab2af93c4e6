//! Graphics device contract
//!
//! The batch renderer talks to the GPU only through [`GraphicsDevice`]. The
//! trait mirrors a classic buffer/array/draw API: vertex buffers, index buffers
//! and vertex arrays are created once, refilled with range updates, bound, and
//! drawn. Handles are opaque and owned; destroying one consumes it.

use bevy::math::Mat4;
use std::fmt;
use std::mem::{offset_of, size_of};

/// Interleaved vertex: position (2 × f32) followed by color (3 × f32).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex {
    pub const SIZE: usize = size_of::<Vertex>();

    /// Attribute layout matching the field order, tightly packed.
    pub const LAYOUT: [VertexAttribute; 2] = [
        VertexAttribute {
            location: 0,
            components: 2,
            stride: Self::SIZE as u32,
            offset: offset_of!(Vertex, position) as u32,
        },
        VertexAttribute {
            location: 1,
            components: 3,
            stride: Self::SIZE as u32,
            offset: offset_of!(Vertex, color) as u32,
        },
    ];

    #[inline]
    pub fn new(position: [f32; 2], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// Size in bytes of one index.
pub const INDEX_SIZE: usize = size_of::<u32>();

/// One 32-bit float vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: u32,
    pub stride: u32,
    pub offset: u32,
}

/// Usage hint for buffer storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferMode {
    #[default]
    Static,
    Dynamic,
}

/// Primitive assembly for a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
    LineList,
    LineStrip,
}

macro_rules! device_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a raw device id. Only device implementations should call this.
            pub fn from_raw(id: u32) -> Self {
                Self(id)
            }

            pub fn raw(&self) -> u32 {
                self.0
            }
        }
    };
}

device_handle!(
    /// Owned handle to a device vertex buffer.
    VertexBuffer
);
device_handle!(
    /// Owned handle to a device index buffer.
    IndexBuffer
);
device_handle!(
    /// Owned handle to a vertex array binding a vertex buffer, an optional
    /// index buffer and an attribute layout.
    VertexArray
);

/// Errors reported by a [`GraphicsDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The handle does not name a live resource
    UnknownHandle { kind: &'static str, id: u32 },
    /// A write or draw reached past the end of a buffer
    OutOfRange {
        kind: &'static str,
        end_bytes: usize,
        capacity_bytes: usize,
    },
    /// A byte offset was not aligned to the element size
    Misaligned { offset_bytes: usize, element_size: usize },
    /// A draw was issued without a bound vertex array
    NothingBound,
    /// An indexed draw was issued on an array without an index buffer
    MissingIndexBuffer,
    /// A vertex array layout does not describe the stored vertex format
    LayoutMismatch { location: u32 },
    /// The device could not allocate the resource
    Allocation(String),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::UnknownHandle { kind, id } => write!(f, "unknown {kind} handle {id}"),
            DeviceError::OutOfRange {
                kind,
                end_bytes,
                capacity_bytes,
            } => write!(
                f,
                "{kind} access ends at byte {end_bytes}, capacity is {capacity_bytes}"
            ),
            DeviceError::Misaligned {
                offset_bytes,
                element_size,
            } => write!(
                f,
                "offset {offset_bytes} is not a multiple of the element size {element_size}"
            ),
            DeviceError::NothingBound => write!(f, "draw issued with no vertex array bound"),
            DeviceError::MissingIndexBuffer => {
                write!(f, "indexed draw on a vertex array without an index buffer")
            }
            DeviceError::LayoutMismatch { location } => {
                write!(f, "vertex attribute {location} does not match the vertex format")
            }
            DeviceError::Allocation(msg) => write!(f, "allocation failed: {msg}"),
        }
    }
}

impl std::error::Error for DeviceError {}

/// The buffer/array/draw surface the batch renderer needs from a GPU backend.
///
/// Sizes and offsets are in bytes. Every call happens on the render thread
/// during the render phase of a frame.
pub trait GraphicsDevice {
    fn create_vertex_buffer(
        &mut self,
        initial: &[Vertex],
        capacity_bytes: usize,
        mode: BufferMode,
    ) -> Result<VertexBuffer, DeviceError>;

    fn create_index_buffer(
        &mut self,
        initial: &[u32],
        capacity_bytes: usize,
        mode: BufferMode,
    ) -> Result<IndexBuffer, DeviceError>;

    fn create_vertex_array(
        &mut self,
        vertex_buffer: &VertexBuffer,
        index_buffer: Option<&IndexBuffer>,
        layout: &[VertexAttribute],
    ) -> Result<VertexArray, DeviceError>;

    fn update_vertex_buffer(
        &mut self,
        buffer: &VertexBuffer,
        offset_bytes: usize,
        data: &[Vertex],
    ) -> Result<(), DeviceError>;

    fn update_index_buffer(
        &mut self,
        buffer: &IndexBuffer,
        offset_bytes: usize,
        data: &[u32],
    ) -> Result<(), DeviceError>;

    /// Binds `array` for subsequent draws, or unbinds with `None`.
    fn bind_vertex_array(&mut self, array: Option<&VertexArray>) -> Result<(), DeviceError>;

    /// Uploads the camera uniform (projection × view) used by the shader.
    fn set_camera(&mut self, camera: Mat4);

    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        index_count: usize,
    ) -> Result<(), DeviceError>;

    fn draw(
        &mut self,
        topology: PrimitiveTopology,
        first_vertex: usize,
        vertex_count: usize,
    ) -> Result<(), DeviceError>;

    fn destroy_vertex_buffer(&mut self, buffer: VertexBuffer);

    fn destroy_index_buffer(&mut self, buffer: IndexBuffer);

    fn destroy_vertex_array(&mut self, array: VertexArray);
}
