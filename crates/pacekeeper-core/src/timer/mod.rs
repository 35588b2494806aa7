mod clock;
mod engine;

pub use clock::{drive, FrameSource, IntervalFrames, ScriptedFrames};
pub use engine::{EngineState, TimerEngine, TimerState};
