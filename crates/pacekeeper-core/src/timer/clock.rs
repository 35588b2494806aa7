//! Frame sources that drive the engine.
//!
//! A [`FrameSource`] is the periodic callback the engine is scheduled by.
//! It only yields timestamps; rendering and input handling stay with the
//! caller.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::engine::TimerEngine;
use crate::events::Event;

/// Source of monotonically increasing frame timestamps in milliseconds.
pub trait FrameSource {
    /// Block until the next frame and return its timestamp, or `None` when
    /// the source is exhausted.
    fn next_frame(&mut self) -> Option<u64>;
}

/// Real-time frames at a fixed interval.
#[derive(Debug, Clone)]
pub struct IntervalFrames {
    origin: Instant,
    interval: Duration,
}

impl IntervalFrames {
    pub fn new(interval: Duration) -> Self {
        Self {
            origin: Instant::now(),
            interval,
        }
    }

    /// Milliseconds since this source was created.
    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl FrameSource for IntervalFrames {
    fn next_frame(&mut self) -> Option<u64> {
        std::thread::sleep(self.interval);
        Some(self.now_ms())
    }
}

/// Pre-recorded timestamps, for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFrames {
    frames: VecDeque<u64>,
}

impl ScriptedFrames {
    pub fn new(frames: impl IntoIterator<Item = u64>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Frames from `0` to `until_ms` inclusive, `step_ms` apart.
    pub fn every(step_ms: u64, until_ms: u64) -> Self {
        Self::new((0..=until_ms).step_by(step_ms.max(1) as usize))
    }
}

impl FrameSource for ScriptedFrames {
    fn next_frame(&mut self) -> Option<u64> {
        self.frames.pop_front()
    }
}

/// Feed every frame from `source` into `engine` until the source ends.
/// Events produced by the engine are handed to `on_event`.
pub fn drive<S, F>(engine: &mut TimerEngine, source: &mut S, mut on_event: F)
where
    S: FrameSource + ?Sized,
    F: FnMut(Event),
{
    while let Some(timestamp) = source.next_frame() {
        if let Some(event) = engine.on_frame(timestamp) {
            on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{IntensityLevel, Plan, Segment};

    fn plan() -> Plan {
        Plan::new(
            "p",
            "Test",
            vec![
                Segment::new("a", 1, IntensityLevel::Low),
                Segment::new("b", 1, IntensityLevel::High),
            ],
        )
    }

    #[test]
    fn scripted_frames_drive_engine() {
        let mut engine = TimerEngine::new(plan());
        engine.start();
        let mut events = Vec::new();
        drive(&mut engine, &mut ScriptedFrames::every(500, 90_000), |e| events.push(e));

        assert_eq!(engine.elapsed_secs(), 90.0);
        assert_eq!(engine.current_segment().unwrap().id, "b");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn idle_engine_ignores_frames() {
        let mut engine = TimerEngine::new(plan());
        drive(&mut engine, &mut ScriptedFrames::every(1_000, 10_000), |_| {});
        assert_eq!(engine.elapsed_secs(), 0.0);
    }

    #[test]
    fn interval_frames_are_monotonic() {
        let mut frames = IntervalFrames::new(Duration::from_millis(1));
        let a = frames.next_frame().unwrap();
        let b = frames.next_frame().unwrap();
        assert!(b >= a);
    }
}
