use anyhow::{Context, Result};
use lettuce_park_core::SimTick;
use serde::Deserialize;
use std::{collections::VecDeque, fs, path::Path};

#[derive(Debug, Deserialize)]
struct CommandScriptFile {
    steps: Vec<CommandScriptStepDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct CommandScriptStepDef {
    tick: u64,
    command: String,
}

#[derive(Debug, Clone)]
struct CommandScriptStep {
    tick: SimTick,
    command: String,
}

/// Deterministic command script runner.
///
/// Scripts are a simple list of `{tick, command}` steps, executed in file order.
#[derive(Debug)]
pub struct CommandScriptPlayer {
    pending: VecDeque<CommandScriptStep>,
}

impl CommandScriptPlayer {
    /// Load a command script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read command script {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// Load a command script from an in-memory JSON string.
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: CommandScriptFile =
            serde_json::from_str(contents).context("failed to parse command script JSON")?;
        if file.steps.is_empty() {
            anyhow::bail!("command script contains no steps");
        }

        let mut pending = VecDeque::with_capacity(file.steps.len());
        let mut last_tick: Option<u64> = None;
        for step in file.steps {
            let command = step.command.trim().to_string();
            if command.is_empty() {
                anyhow::bail!("command script contains an empty command");
            }

            if let Some(prev) = last_tick {
                if step.tick < prev {
                    anyhow::bail!("command script steps must be sorted by tick");
                }
            }
            last_tick = Some(step.tick);

            pending.push_back(CommandScriptStep {
                tick: SimTick(step.tick),
                command,
            });
        }

        Ok(Self { pending })
    }

    /// Drain and return all commands scheduled for ticks `<= tick`.
    pub fn drain_ready_commands(&mut self, tick: SimTick) -> Vec<String> {
        let mut commands = Vec::new();
        while self.pending.front().is_some_and(|step| step.tick <= tick) {
            if let Some(step) = self.pending.pop_front() {
                commands.push(step.command);
            }
        }
        commands
    }

    /// Tick of the last scheduled step.
    pub fn last_tick(&self) -> Option<SimTick> {
        self.pending.back().map(|step| step.tick)
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_script_rejects_unsorted_ticks() {
        let json = r#"{
            "steps": [
                {"tick": 2, "command": "activate"},
                {"tick": 1, "command": "craft salad"}
            ]
        }"#;
        let err = CommandScriptPlayer::from_json(json).unwrap_err();
        assert!(
            err.to_string().contains("sorted by tick"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn command_script_rejects_empty_commands() {
        let json = r#"{ "steps": [ {"tick": 0, "command": "   "} ] }"#;
        assert!(CommandScriptPlayer::from_json(json).is_err());
        assert!(CommandScriptPlayer::from_json(r#"{ "steps": [] }"#).is_err());
    }

    #[test]
    fn command_script_drains_in_order_and_is_deterministic() {
        let json = r#"{
            "steps": [
                {"tick": 1, "command": "hold forward"},
                {"tick": 1, "command": "look 10 0"},
                {"tick": 3, "command": "activate"}
            ]
        }"#;
        let mut script = CommandScriptPlayer::from_json(json).expect("script should parse");
        assert_eq!(script.last_tick(), Some(SimTick(3)));

        assert_eq!(
            script.drain_ready_commands(SimTick(0)),
            Vec::<String>::new()
        );
        assert_eq!(
            script.drain_ready_commands(SimTick(1)),
            vec!["hold forward".to_string(), "look 10 0".to_string()]
        );
        assert_eq!(
            script.drain_ready_commands(SimTick(2)),
            Vec::<String>::new()
        );
        assert_eq!(
            script.drain_ready_commands(SimTick(3)),
            vec!["activate".to_string()]
        );
        assert!(script.is_finished());
    }
}
