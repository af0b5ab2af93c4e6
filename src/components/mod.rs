pub mod body;
pub mod trail;

pub use body::Body;
pub use trail::TrailBuffer;
