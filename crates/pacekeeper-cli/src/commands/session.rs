//! Live session loop.
//!
//! Frames come from an [`IntervalFrames`] source; commands arrive from a
//! stdin reader thread over a channel and are applied between frames, so
//! the engine only ever has one mutator.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use pacekeeper_core::timer::IntervalFrames;
use pacekeeper_core::{
    save_session, Config, FrameSource, MetricInputs, SessionInput, SessionRecorder, SqliteStore,
    TimerEngine,
};
use tracing::debug;

use super::{find_plan, open_store, print_json, CliResult};

const HELP: &str = "commands: start | pause | reset | status | save | quit";

enum Flow {
    Continue,
    Quit,
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

pub fn run(plan_id: &str) -> CliResult {
    let config = Config::load()?;
    let mut store = open_store(&config)?;
    let plan = find_plan(&store, plan_id)?;
    let recorder = SessionRecorder::new(config.session.default_effort);

    let mut engine = TimerEngine::new(plan);
    let commands = spawn_stdin_reader();
    let mut frames = IntervalFrames::new(Duration::from_millis(config.session.tick_interval_ms.max(1)));

    eprintln!("{HELP}");
    print_json(&engine.snapshot())?;

    while let Some(timestamp) = frames.next_frame() {
        if let Some(event) = engine.on_frame(timestamp) {
            print_json(&event)?;
        }

        loop {
            match commands.try_recv() {
                Ok(line) => {
                    if let Flow::Quit =
                        handle_command(line.trim(), &mut engine, &mut store, &recorder, &commands)?
                    {
                        return Ok(());
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("stdin closed, ending session loop");
                    return Ok(());
                }
            }
        }
    }
    Ok(())
}

fn handle_command(
    command: &str,
    engine: &mut TimerEngine,
    store: &mut SqliteStore,
    recorder: &SessionRecorder,
    input: &Receiver<String>,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let event = match command {
        "" => None,
        "start" => engine.start(),
        "pause" => engine.pause(),
        "reset" => engine.reset(),
        "status" => Some(engine.snapshot()),
        "save" => {
            engine.pause();
            let session = prompt_session(engine, recorder, input);
            match save_session(engine, store, recorder, &session) {
                Ok((_, event)) => Some(event),
                Err(e) => {
                    eprintln!("error: {e}");
                    None
                }
            }
        }
        "quit" | "exit" => return Ok(Flow::Quit),
        other => {
            eprintln!("unknown command: {other}");
            eprintln!("{HELP}");
            None
        }
    };
    if let Some(event) = event {
        print_json(&event)?;
    }
    Ok(Flow::Continue)
}

/// Ask for every metric, the effort rating and notes.
/// A closed stdin answers every remaining prompt with an empty line.
fn prompt_session(
    engine: &TimerEngine,
    recorder: &SessionRecorder,
    input: &Receiver<String>,
) -> SessionInput {
    let ask = |prompt: &str| -> String {
        eprint!("{prompt}: ");
        let _ = std::io::stderr().flush();
        input.recv().unwrap_or_default()
    };

    let mut metrics = MetricInputs::for_plan(engine.plan());
    for segment in engine.plan().metric_segments() {
        let value = ask(segment.display_label());
        metrics.set(segment.id.clone(), value);
    }
    let effort = ask(&format!("effort 1-10 [{}]", recorder.default_effort()));
    let notes = ask("notes");

    SessionInput {
        metrics,
        effort,
        notes: Some(notes),
        user_id: None,
    }
}
