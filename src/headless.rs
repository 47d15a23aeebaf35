use crate::command_script::CommandScriptPlayer;
use crate::commands::{execute_command, parse_command};
use anyhow::{Context, Result};
use lettuce_park_core::{SeededRandom, SimTick};
use lettuce_park_testkit::{EventRecord, JsonlSink};
use lettuce_park_world::{MovementIntent, Session, SessionConfig, SessionEvent, SessionSnapshot};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Ticks simulated when neither a script nor `--max-ticks` bounds the run.
pub const DEFAULT_MAX_TICKS: u64 = 600;

pub struct HeadlessConfig {
    pub session: SessionConfig,
    pub command_script: Option<PathBuf>,
    pub seed: Option<u64>,
    pub event_log: Option<PathBuf>,
    pub max_ticks: Option<u64>,
    pub dt: f32,
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub ticks: u64,
    pub events: usize,
    pub snapshot: SessionSnapshot,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let rng = match cfg.seed {
        Some(seed) => SeededRandom::from_seed(seed),
        None => SeededRandom::from_entropy(),
    };
    let mut session = Session::new(cfg.session, rng);
    let park = session.populate_default();
    info!(
        collectibles = park.collectibles.len(),
        trees = park.trees.len(),
        "park ready"
    );

    let mut script = match cfg.command_script.as_deref() {
        Some(path) => Some(CommandScriptPlayer::from_path(path)?),
        None => None,
    };
    if let Some(player) = script.as_ref() {
        info!(last_step = ?player.last_tick(), "command script loaded");
    }
    let mut event_log = match cfg.event_log.as_deref() {
        Some(path) => Some(
            JsonlSink::create(path)
                .with_context(|| format!("failed to create event log {}", path.display()))?,
        ),
        None => None,
    };

    let max_ticks = match (cfg.max_ticks, script.is_some()) {
        (Some(limit), _) => Some(limit),
        (None, true) => None,
        (None, false) => Some(DEFAULT_MAX_TICKS),
    };

    let mut held = MovementIntent::NONE;
    let mut recorded = record_events(&mut session, SimTick::ZERO, event_log.as_mut())?;

    loop {
        let now = session.tick_count();
        if max_ticks.is_some_and(|limit| now.0 >= limit) {
            break;
        }
        if let Some(player) = script.as_mut() {
            for line in player.drain_ready_commands(now) {
                match parse_command(&line) {
                    Ok(cmd) => {
                        for out in execute_command(&mut session, &mut held, cmd).lines {
                            info!(tick = now.0, command = %line, "{out}");
                        }
                    }
                    Err(err) => warn!(tick = now.0, command = %line, %err, "invalid command"),
                }
            }
        }

        let tick = session.tick(cfg.dt, held);
        recorded += record_events(&mut session, tick, event_log.as_mut())?;

        // Scripted runs without an explicit limit stop once the script is done.
        if max_ticks.is_none() && script.as_ref().map_or(true, |s| s.is_finished()) {
            break;
        }
    }

    if let Some(sink) = event_log.as_mut() {
        sink.flush()?;
    }
    let ticks = session.tick_count().0;
    info!(ticks, events = recorded, "headless run finished");
    Ok(RunSummary {
        ticks,
        events: recorded,
        snapshot: session.snapshot(),
    })
}

fn record_events(
    session: &mut Session,
    tick: SimTick,
    mut sink: Option<&mut JsonlSink>,
) -> Result<usize> {
    let events: Vec<SessionEvent> = session.drain_events();
    for event in &events {
        debug!(tick = tick.0, kind = event.kind(), ?event, "session event");
        if let Some(sink) = sink.as_deref_mut() {
            sink.write(&EventRecord {
                tick,
                kind: event.kind(),
                payload: event,
            })?;
        }
    }
    Ok(events.len())
}
