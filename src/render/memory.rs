//! CPU-resident graphics device
//!
//! [`MemoryDevice`] keeps every buffer in system memory and records each draw
//! as a resolved [`DrawCall`]. Tests inspect the recorded calls directly, the
//! headless CLI mode counts them, and the visualization plugin turns them into
//! Bevy meshes once per frame.

use super::device::{
    BufferMode, DeviceError, GraphicsDevice, INDEX_SIZE, IndexBuffer, PrimitiveTopology, Vertex,
    VertexArray, VertexAttribute, VertexBuffer,
};
use bevy::math::Mat4;
use std::collections::HashMap;

/// A draw call with its geometry copied out of device memory.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub topology: PrimitiveTopology,
    /// Camera uniform in effect when the call was issued
    pub camera: Mat4,
    pub vertices: Vec<Vertex>,
    /// Present for indexed draws; indexes into `vertices`
    pub indices: Option<Vec<u32>>,
}

impl DrawCall {
    /// Number of vertices the call assembles into primitives.
    pub fn element_count(&self) -> usize {
        self.indices
            .as_ref()
            .map_or(self.vertices.len(), |indices| indices.len())
    }
}

/// Buffer contents. The usage hint has no meaning in system memory.
#[derive(Debug)]
struct Storage<T> {
    data: Vec<T>,
}

#[derive(Debug)]
struct ArrayBinding {
    vertex_buffer: u32,
    index_buffer: Option<u32>,
}

#[derive(Debug, Default)]
pub struct MemoryDevice {
    next_id: u32,
    vertex_buffers: HashMap<u32, Storage<Vertex>>,
    index_buffers: HashMap<u32, Storage<u32>>,
    vertex_arrays: HashMap<u32, ArrayBinding>,
    bound: Option<u32>,
    camera: Mat4,
    draws: Vec<DrawCall>,
    uploaded_bytes: usize,
}

impl MemoryDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls recorded since the last [`MemoryDevice::take_draws`].
    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    pub fn take_draws(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draws)
    }

    pub fn camera(&self) -> Mat4 {
        self.camera
    }

    /// Total bytes written through buffer updates.
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }

    /// Number of buffers and arrays not yet destroyed.
    pub fn live_resources(&self) -> usize {
        self.vertex_buffers.len() + self.index_buffers.len() + self.vertex_arrays.len()
    }

    pub fn vertex_buffer_contents(&self, buffer: &VertexBuffer) -> Option<&[Vertex]> {
        self.vertex_buffers
            .get(&buffer.raw())
            .map(|storage| storage.data.as_slice())
    }

    pub fn index_buffer_contents(&self, buffer: &IndexBuffer) -> Option<&[u32]> {
        self.index_buffers
            .get(&buffer.raw())
            .map(|storage| storage.data.as_slice())
    }

    fn allocate_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn bound_array(&self) -> Result<&ArrayBinding, DeviceError> {
        let id = self.bound.ok_or(DeviceError::NothingBound)?;
        self.vertex_arrays
            .get(&id)
            .ok_or(DeviceError::UnknownHandle {
                kind: "vertex array",
                id,
            })
    }

    fn vertex_storage(&self, id: u32) -> Result<&Storage<Vertex>, DeviceError> {
        self.vertex_buffers
            .get(&id)
            .ok_or(DeviceError::UnknownHandle {
                kind: "vertex buffer",
                id,
            })
    }

    fn index_storage(&self, id: u32) -> Result<&Storage<u32>, DeviceError> {
        self.index_buffers
            .get(&id)
            .ok_or(DeviceError::UnknownHandle {
                kind: "index buffer",
                id,
            })
    }
}

fn allocate<T: Copy + Default>(
    kind: &'static str,
    initial: &[T],
    capacity_bytes: usize,
) -> Result<Storage<T>, DeviceError> {
    let element_size = size_of::<T>();
    if capacity_bytes % element_size != 0 {
        return Err(DeviceError::Misaligned {
            offset_bytes: capacity_bytes,
            element_size,
        });
    }

    let capacity = capacity_bytes / element_size;
    if initial.len() > capacity {
        return Err(DeviceError::OutOfRange {
            kind,
            end_bytes: initial.len() * element_size,
            capacity_bytes,
        });
    }

    let mut data = vec![T::default(); capacity];
    data[..initial.len()].copy_from_slice(initial);
    Ok(Storage { data })
}

/// Every attribute must name a field of [`Vertex`] with its exact stride,
/// offset and width.
fn check_layout(layout: &[VertexAttribute]) -> Result<(), DeviceError> {
    for attribute in layout {
        if !Vertex::LAYOUT.contains(attribute) {
            return Err(DeviceError::LayoutMismatch {
                location: attribute.location,
            });
        }
    }
    Ok(())
}

fn write_range<T: Copy>(
    kind: &'static str,
    storage: &mut Storage<T>,
    offset_bytes: usize,
    data: &[T],
) -> Result<usize, DeviceError> {
    let element_size = size_of::<T>();
    if offset_bytes % element_size != 0 {
        return Err(DeviceError::Misaligned {
            offset_bytes,
            element_size,
        });
    }

    let start = offset_bytes / element_size;
    let end = start + data.len();
    if end > storage.data.len() {
        return Err(DeviceError::OutOfRange {
            kind,
            end_bytes: end * element_size,
            capacity_bytes: storage.data.len() * element_size,
        });
    }

    storage.data[start..end].copy_from_slice(data);
    Ok(data.len() * element_size)
}

impl GraphicsDevice for MemoryDevice {
    fn create_vertex_buffer(
        &mut self,
        initial: &[Vertex],
        capacity_bytes: usize,
        _mode: BufferMode,
    ) -> Result<VertexBuffer, DeviceError> {
        let storage = allocate("vertex buffer", initial, capacity_bytes)?;
        let id = self.allocate_id();
        self.vertex_buffers.insert(id, storage);
        Ok(VertexBuffer::from_raw(id))
    }

    fn create_index_buffer(
        &mut self,
        initial: &[u32],
        capacity_bytes: usize,
        _mode: BufferMode,
    ) -> Result<IndexBuffer, DeviceError> {
        let storage = allocate("index buffer", initial, capacity_bytes)?;
        let id = self.allocate_id();
        self.index_buffers.insert(id, storage);
        Ok(IndexBuffer::from_raw(id))
    }

    fn create_vertex_array(
        &mut self,
        vertex_buffer: &VertexBuffer,
        index_buffer: Option<&IndexBuffer>,
        layout: &[VertexAttribute],
    ) -> Result<VertexArray, DeviceError> {
        check_layout(layout)?;
        self.vertex_storage(vertex_buffer.raw())?;
        if let Some(index_buffer) = index_buffer {
            self.index_storage(index_buffer.raw())?;
        }

        let id = self.allocate_id();
        self.vertex_arrays.insert(
            id,
            ArrayBinding {
                vertex_buffer: vertex_buffer.raw(),
                index_buffer: index_buffer.map(IndexBuffer::raw),
            },
        );
        Ok(VertexArray::from_raw(id))
    }

    fn update_vertex_buffer(
        &mut self,
        buffer: &VertexBuffer,
        offset_bytes: usize,
        data: &[Vertex],
    ) -> Result<(), DeviceError> {
        let id = buffer.raw();
        let storage = self
            .vertex_buffers
            .get_mut(&id)
            .ok_or(DeviceError::UnknownHandle {
                kind: "vertex buffer",
                id,
            })?;
        self.uploaded_bytes += write_range("vertex buffer", storage, offset_bytes, data)?;
        Ok(())
    }

    fn update_index_buffer(
        &mut self,
        buffer: &IndexBuffer,
        offset_bytes: usize,
        data: &[u32],
    ) -> Result<(), DeviceError> {
        let id = buffer.raw();
        let storage = self
            .index_buffers
            .get_mut(&id)
            .ok_or(DeviceError::UnknownHandle {
                kind: "index buffer",
                id,
            })?;
        self.uploaded_bytes += write_range("index buffer", storage, offset_bytes, data)?;
        Ok(())
    }

    fn bind_vertex_array(&mut self, array: Option<&VertexArray>) -> Result<(), DeviceError> {
        match array {
            Some(array) => {
                let id = array.raw();
                if !self.vertex_arrays.contains_key(&id) {
                    return Err(DeviceError::UnknownHandle {
                        kind: "vertex array",
                        id,
                    });
                }
                self.bound = Some(id);
            }
            None => self.bound = None,
        }
        Ok(())
    }

    fn set_camera(&mut self, camera: Mat4) {
        self.camera = camera;
    }

    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        index_count: usize,
    ) -> Result<(), DeviceError> {
        let binding = self.bound_array()?;
        let index_id = binding
            .index_buffer
            .ok_or(DeviceError::MissingIndexBuffer)?;
        let vertices = &self.vertex_storage(binding.vertex_buffer)?.data;
        let indices = &self.index_storage(index_id)?.data;

        if index_count > indices.len() {
            return Err(DeviceError::OutOfRange {
                kind: "index buffer",
                end_bytes: index_count * INDEX_SIZE,
                capacity_bytes: indices.len() * INDEX_SIZE,
            });
        }
        if index_count == 0 {
            return Ok(());
        }

        let indices = indices[..index_count].to_vec();
        let referenced = indices.iter().copied().max().unwrap_or_default() as usize + 1;
        if referenced > vertices.len() {
            return Err(DeviceError::OutOfRange {
                kind: "vertex buffer",
                end_bytes: referenced * Vertex::SIZE,
                capacity_bytes: vertices.len() * Vertex::SIZE,
            });
        }

        let call = DrawCall {
            topology,
            camera: self.camera,
            vertices: vertices[..referenced].to_vec(),
            indices: Some(indices),
        };
        self.draws.push(call);
        Ok(())
    }

    fn draw(
        &mut self,
        topology: PrimitiveTopology,
        first_vertex: usize,
        vertex_count: usize,
    ) -> Result<(), DeviceError> {
        let binding = self.bound_array()?;
        let vertices = &self.vertex_storage(binding.vertex_buffer)?.data;

        let end = first_vertex + vertex_count;
        if end > vertices.len() {
            return Err(DeviceError::OutOfRange {
                kind: "vertex buffer",
                end_bytes: end * Vertex::SIZE,
                capacity_bytes: vertices.len() * Vertex::SIZE,
            });
        }
        if vertex_count == 0 {
            return Ok(());
        }

        let call = DrawCall {
            topology,
            camera: self.camera,
            vertices: vertices[first_vertex..end].to_vec(),
            indices: None,
        };
        self.draws.push(call);
        Ok(())
    }

    fn destroy_vertex_buffer(&mut self, buffer: VertexBuffer) {
        self.vertex_buffers.remove(&buffer.raw());
    }

    fn destroy_index_buffer(&mut self, buffer: IndexBuffer) {
        self.index_buffers.remove(&buffer.raw());
    }

    fn destroy_vertex_array(&mut self, array: VertexArray) {
        let id = array.raw();
        self.vertex_arrays.remove(&id);
        if self.bound == Some(id) {
            self.bound = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32) -> Vertex {
        Vertex::new([x, 0.0], [1.0, 1.0, 1.0])
    }

    #[test]
    fn test_create_and_update_vertex_buffer() {
        let mut device = MemoryDevice::new();
        let buffer = device
            .create_vertex_buffer(&[], 4 * Vertex::SIZE, BufferMode::Dynamic)
            .unwrap();

        device
            .update_vertex_buffer(&buffer, Vertex::SIZE, &[vertex(1.0), vertex(2.0)])
            .unwrap();

        let contents = device.vertex_buffer_contents(&buffer).unwrap();
        assert_eq!(contents.len(), 4);
        assert_eq!(contents[0], Vertex::default());
        assert_eq!(contents[1], vertex(1.0));
        assert_eq!(contents[2], vertex(2.0));
        assert_eq!(device.uploaded_bytes(), 2 * Vertex::SIZE);
    }

    #[test]
    fn test_update_past_capacity_is_rejected() {
        let mut device = MemoryDevice::new();
        let buffer = device
            .create_vertex_buffer(&[], 2 * Vertex::SIZE, BufferMode::Dynamic)
            .unwrap();

        let result = device.update_vertex_buffer(&buffer, Vertex::SIZE, &[vertex(1.0), vertex(2.0)]);
        assert_eq!(
            result,
            Err(DeviceError::OutOfRange {
                kind: "vertex buffer",
                end_bytes: 3 * Vertex::SIZE,
                capacity_bytes: 2 * Vertex::SIZE,
            })
        );
    }

    #[test]
    fn test_misaligned_offset_is_rejected() {
        let mut device = MemoryDevice::new();
        let buffer = device
            .create_index_buffer(&[], 8 * INDEX_SIZE, BufferMode::Dynamic)
            .unwrap();

        let result = device.update_index_buffer(&buffer, 3, &[1]);
        assert!(matches!(result, Err(DeviceError::Misaligned { .. })));
    }

    #[test]
    fn test_draw_without_binding_fails() {
        let mut device = MemoryDevice::new();
        assert_eq!(
            device.draw(PrimitiveTopology::LineStrip, 0, 1),
            Err(DeviceError::NothingBound)
        );
    }

    #[test]
    fn test_indexed_draw_records_geometry() {
        let mut device = MemoryDevice::new();
        let vertices = device
            .create_vertex_buffer(
                &[vertex(0.0), vertex(1.0), vertex(2.0)],
                8 * Vertex::SIZE,
                BufferMode::Dynamic,
            )
            .unwrap();
        let indices = device
            .create_index_buffer(&[0, 1, 2], 8 * INDEX_SIZE, BufferMode::Dynamic)
            .unwrap();
        let array = device
            .create_vertex_array(&vertices, Some(&indices), &Vertex::LAYOUT)
            .unwrap();

        device.set_camera(Mat4::from_scale(bevy::math::Vec3::splat(2.0)));
        device.bind_vertex_array(Some(&array)).unwrap();
        device
            .draw_indexed(PrimitiveTopology::TriangleList, 3)
            .unwrap();

        let draws = device.take_draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].topology, PrimitiveTopology::TriangleList);
        assert_eq!(draws[0].vertices.len(), 3);
        assert_eq!(draws[0].indices.as_deref(), Some(&[0, 1, 2][..]));
        assert_eq!(draws[0].element_count(), 3);
        assert_eq!(draws[0].camera.x_axis.x, 2.0);
        assert!(device.draws().is_empty());
    }

    #[test]
    fn test_indexed_draw_requires_index_buffer() {
        let mut device = MemoryDevice::new();
        let vertices = device
            .create_vertex_buffer(&[], 4 * Vertex::SIZE, BufferMode::Dynamic)
            .unwrap();
        let array = device
            .create_vertex_array(&vertices, None, &Vertex::LAYOUT)
            .unwrap();
        device.bind_vertex_array(Some(&array)).unwrap();

        assert_eq!(
            device.draw_indexed(PrimitiveTopology::TriangleList, 3),
            Err(DeviceError::MissingIndexBuffer)
        );
    }

    #[test]
    fn test_destroy_releases_resources() {
        let mut device = MemoryDevice::new();
        let vertices = device
            .create_vertex_buffer(&[], 4 * Vertex::SIZE, BufferMode::Static)
            .unwrap();
        let indices = device
            .create_index_buffer(&[], 4 * INDEX_SIZE, BufferMode::Static)
            .unwrap();
        let array = device
            .create_vertex_array(&vertices, Some(&indices), &Vertex::LAYOUT)
            .unwrap();
        device.bind_vertex_array(Some(&array)).unwrap();
        assert_eq!(device.live_resources(), 3);

        device.destroy_vertex_array(array);
        device.destroy_index_buffer(indices);
        device.destroy_vertex_buffer(vertices);

        assert_eq!(device.live_resources(), 0);
        assert_eq!(
            device.draw(PrimitiveTopology::LineList, 0, 0),
            Err(DeviceError::NothingBound)
        );
    }

    #[test]
    fn test_array_over_unknown_buffer_is_rejected() {
        let mut device = MemoryDevice::new();
        let stray = VertexBuffer::from_raw(42);

        let result = device.create_vertex_array(&stray, None, &Vertex::LAYOUT);
        assert_eq!(
            result,
            Err(DeviceError::UnknownHandle {
                kind: "vertex buffer",
                id: 42,
            })
        );
    }

    #[test]
    fn test_array_with_foreign_layout_is_rejected() {
        let mut device = MemoryDevice::new();
        let vertices = device
            .create_vertex_buffer(&[], 4 * Vertex::SIZE, BufferMode::Dynamic)
            .unwrap();

        let mut layout = Vertex::LAYOUT;
        layout[1].offset += 4;
        assert_eq!(
            device.create_vertex_array(&vertices, None, &layout),
            Err(DeviceError::LayoutMismatch { location: 1 })
        );

        let packed_wrong = [VertexAttribute {
            stride: 8,
            ..Vertex::LAYOUT[0]
        }];
        assert_eq!(
            device.create_vertex_array(&vertices, None, &packed_wrong),
            Err(DeviceError::LayoutMismatch { location: 0 })
        );
        assert_eq!(device.live_resources(), 1);
    }
}
