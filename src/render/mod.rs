//! Rendering core: device contract, CPU device, camera math and batching

pub mod batch;
pub mod camera;
pub mod device;
pub mod memory;

pub use batch::{BatchLimits, BatchRenderer, BatchStats};
pub use camera::CameraView;
pub use device::{DeviceError, GraphicsDevice, PrimitiveTopology, Vertex};
pub use memory::{DrawCall, MemoryDevice};
