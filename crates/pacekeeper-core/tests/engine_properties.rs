//! Property tests for the timer engine and the log store cap.

use pacekeeper_core::plan::{resolve_segment, segment_bounds};
use pacekeeper_core::{IntensityLevel, LogStore, MemoryStore, Plan, Segment, SessionLog, TimerEngine, TimerState};
use proptest::prelude::*;

fn plan_from(minutes: &[u64]) -> Plan {
    Plan::new(
        "prop",
        "Property plan",
        minutes
            .iter()
            .enumerate()
            .map(|(i, m)| Segment::new(format!("s{i}"), *m, IntensityLevel::Moderate))
            .collect(),
    )
}

fn durations() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..60, 0..8)
}

proptest! {
    #[test]
    fn total_seconds_is_sum_of_minutes(minutes in durations()) {
        let engine = TimerEngine::new(plan_from(&minutes));
        prop_assert_eq!(engine.total_secs(), minutes.iter().sum::<u64>() * 60);
    }

    #[test]
    fn current_segment_contains_elapsed(minutes in durations(), fraction in 0.0f64..=1.0) {
        let plan = plan_from(&minutes);
        let total = plan.total_seconds();
        prop_assume!(total > 0);

        let mut engine = TimerEngine::new(plan.clone());
        engine.start();
        engine.tick(fraction * total as f64);
        let elapsed = engine.elapsed_secs();

        let index = engine.current_segment_index().unwrap();
        let bounds = segment_bounds(&plan.segments)[index];
        if elapsed >= total as f64 {
            prop_assert_eq!(index, plan.segments.len() - 1);
        } else {
            prop_assert!(bounds.contains(elapsed));
            prop_assert_eq!(Some(index), resolve_segment(&plan.segments, elapsed).map(|(i, _)| i));
        }
    }

    #[test]
    fn zero_tick_changes_nothing(minutes in durations(), first in 0.0f64..5000.0) {
        let mut engine = TimerEngine::new(plan_from(&minutes));
        engine.start();
        engine.tick(first);
        let before = engine.elapsed_secs();
        engine.tick(0.0);
        prop_assert_eq!(engine.elapsed_secs(), before);
    }

    #[test]
    fn elapsed_is_monotonic_and_clamped(
        minutes in durations(),
        deltas in prop::collection::vec(-100.0f64..1000.0, 0..40),
    ) {
        let mut engine = TimerEngine::new(plan_from(&minutes));
        let total = engine.total_secs() as f64;
        engine.start();
        let mut previous = engine.elapsed_secs();
        for delta in deltas {
            engine.tick(delta);
            let now = engine.elapsed_secs();
            prop_assert!(now >= previous);
            prop_assert!(now <= total);
            prop_assert!(engine.percent() <= 100);
            previous = now;
        }
    }

    #[test]
    fn frames_never_rewind(
        minutes in durations(),
        stamps in prop::collection::vec(0u64..10_000_000, 0..40),
    ) {
        let mut engine = TimerEngine::new(plan_from(&minutes));
        engine.start();
        let mut previous = 0.0;
        for stamp in stamps {
            engine.on_frame(stamp);
            prop_assert!(engine.elapsed_secs() >= previous);
            previous = engine.elapsed_secs();
        }
    }

    #[test]
    fn reset_always_idles_at_zero(
        minutes in durations(),
        delta in 0.0f64..5000.0,
        ops in prop::collection::vec(0u8..3, 0..10),
    ) {
        let mut engine = TimerEngine::new(plan_from(&minutes));
        for op in ops {
            match op {
                0 => { engine.start(); }
                1 => { engine.pause(); }
                _ => { engine.tick(delta); }
            }
        }
        engine.reset();
        prop_assert_eq!(engine.state(), TimerState::Idle);
        prop_assert_eq!(engine.elapsed_secs(), 0.0);
    }
}

#[test]
fn log_store_never_exceeds_capacity() {
    let mut store = MemoryStore::new();
    for i in 0..501 {
        let log = SessionLog {
            id: i.to_string(),
            user_id: None,
            plan_id: "p".into(),
            timestamp: chrono::Utc::now(),
            duration_min: 45,
            effort_rating: 5,
            notes: None,
            metric_entries: vec![],
        };
        let evicted = store.append_log(log).unwrap();
        assert_eq!(evicted, usize::from(i == 500));
    }
    let logs = store.load_logs().unwrap();
    assert_eq!(logs.len(), 500);
    assert_eq!(logs[0].id, "500");
    assert!(logs.iter().all(|l| l.id != "0"));
}
