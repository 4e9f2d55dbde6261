//! Per-frame narration playback: driver lifecycle and the headless scene.

mod driver;
mod scene;

// Re-export public types
pub use driver::{DriverState, FrameDriver, FrameOutcome, NarrationContext, SkipReason};
pub use scene::{FrameClock, FrameRecord, FrameTrack, NarrationScene};
