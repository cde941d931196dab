pub mod asset;
pub mod backend;
pub mod feedback;
pub mod format;
pub mod loudness;
pub mod stream;
pub mod tap;

pub use backend::{AudioBackend, RodioBackend};
pub use feedback::ClickFeedback;
pub use format::FrameFormat;
pub use stream::{AudioStreamHandle, FrameSource};
