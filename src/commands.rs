use std::fmt;

use glam::Vec3;
use lettuce_park_core::ItemKind;
use lettuce_park_world::{MovementIntent, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordArg {
    Absolute(f32),
    Relative(f32),
}

impl CoordArg {
    pub fn resolve(self, base: f32) -> f32 {
        match self {
            Self::Absolute(v) => v,
            Self::Relative(delta) => base + delta,
        }
    }
}

/// Movement key a script can hold down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveKey {
    fn set(self, intent: &mut MovementIntent, held: bool) {
        match self {
            Self::Forward => intent.forward = held,
            Self::Back => intent.back = held,
            Self::Left => intent.left = held,
            Self::Right => intent.right = held,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameCommand {
    Help,
    Activate,
    Craft { recipe: String },
    TogglePanel,
    CancelFishing,
    Deposit,
    Withdraw { item: ItemKind, count: u32 },
    Sort,
    Hold { key: MoveKey },
    Release { key: MoveKey },
    Look { dx: f32, dy: f32 },
    Tp { x: CoordArg, y: CoordArg, z: CoordArg },
    Give { item: ItemKind, count: u32 },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub lines: Vec<String>,
}

/// Run `cmd` against the session. `held` is the movement intent the runner
/// feeds into every tick.
pub fn execute_command(
    session: &mut Session,
    held: &mut MovementIntent,
    cmd: GameCommand,
) -> CommandOutput {
    let mut out = CommandOutput::default();
    let result = match cmd {
        GameCommand::Help => {
            out.lines.extend(help_lines());
            return out;
        }
        GameCommand::Activate => session.activate(),
        GameCommand::Craft { recipe } => session.craft(&recipe),
        GameCommand::TogglePanel => {
            session.toggle_crafting_panel();
            let state = if session.crafting_panel_open() {
                "open"
            } else {
                "closed"
            };
            out.lines.push(format!("Crafting panel {state}"));
            return out;
        }
        GameCommand::CancelFishing => session.cancel_fishing(),
        GameCommand::Deposit => session.deposit_all(),
        GameCommand::Withdraw { item, count } => session.withdraw(item, count),
        GameCommand::Sort => session.sort_storage(),
        GameCommand::Hold { key } => {
            key.set(held, true);
            return out;
        }
        GameCommand::Release { key } => {
            key.set(held, false);
            return out;
        }
        GameCommand::Look { dx, dy } => {
            session.look(dx, dy);
            return out;
        }
        GameCommand::Tp { x, y, z } => {
            let base = session.player().position;
            let target = Vec3::new(x.resolve(base.x), y.resolve(base.y), z.resolve(base.z));
            session.teleport(target);
            out.lines.push(format!(
                "Teleported to {:.2} {:.2} {:.2}",
                target.x, target.y, target.z
            ));
            return out;
        }
        GameCommand::Give { item, count } => session.give(item, count),
    };

    match result {
        Ok(()) => {
            if let Some(line) = session.log().latest() {
                out.lines.push(line.message.clone());
            }
        }
        Err(err) => out.lines.push(format!("Error: {err}")),
    }
    out
}

pub fn parse_command(input: &str) -> Result<GameCommand, CommandError> {
    let input = input.trim();
    let input = input.strip_prefix('/').unwrap_or(input).trim();
    if input.is_empty() {
        return Ok(GameCommand::Help);
    }

    let mut parts = input.split_whitespace();
    let cmd = parts
        .next()
        .ok_or_else(|| CommandError::new("Missing command"))?
        .to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    let no_args = |command: GameCommand| {
        if args.is_empty() {
            Ok(command)
        } else {
            Err(CommandError::new(format!("/{cmd} takes no arguments")))
        }
    };

    match cmd.as_str() {
        "help" | "?" => Ok(GameCommand::Help),
        "activate" | "e" => no_args(GameCommand::Activate),
        "panel" => no_args(GameCommand::TogglePanel),
        "cancel" | "q" => no_args(GameCommand::CancelFishing),
        "deposit" => no_args(GameCommand::Deposit),
        "sort" => no_args(GameCommand::Sort),
        "craft" => {
            if args.len() != 1 {
                return Err(CommandError::new("Usage: /craft <recipe>"));
            }
            Ok(GameCommand::Craft {
                recipe: args[0].to_ascii_lowercase(),
            })
        }
        "withdraw" => {
            let (item, count) = parse_item_and_count(&args, "Usage: /withdraw <item> [count]")?;
            Ok(GameCommand::Withdraw { item, count })
        }
        "give" => {
            let (item, count) = parse_item_and_count(&args, "Usage: /give <item> [count]")?;
            Ok(GameCommand::Give { item, count })
        }
        "hold" | "release" => {
            if args.len() != 1 {
                return Err(CommandError::new(format!(
                    "Usage: /{cmd} <forward|back|left|right>"
                )));
            }
            let key = parse_move_key(args[0])?;
            Ok(if cmd == "hold" {
                GameCommand::Hold { key }
            } else {
                GameCommand::Release { key }
            })
        }
        "look" => {
            if args.len() != 2 {
                return Err(CommandError::new("Usage: /look <dx> <dy>"));
            }
            let parse = |s: &str| {
                s.parse::<f32>()
                    .map_err(|_| CommandError::new(format!("Invalid look delta: {s}")))
            };
            Ok(GameCommand::Look {
                dx: parse(args[0])?,
                dy: parse(args[1])?,
            })
        }
        "tp" | "teleport" => {
            if args.len() != 3 {
                return Err(CommandError::new("Usage: /tp <x> <y> <z>"));
            }
            Ok(GameCommand::Tp {
                x: parse_coord(args[0])?,
                y: parse_coord(args[1])?,
                z: parse_coord(args[2])?,
            })
        }
        _ => Err(CommandError::new(format!(
            "Unknown command: {cmd}. Try /help"
        ))),
    }
}

fn parse_item_and_count(args: &[&str], usage: &str) -> Result<(ItemKind, u32), CommandError> {
    if !(1..=2).contains(&args.len()) {
        return Err(CommandError::new(usage));
    }
    let item = args[0]
        .parse::<ItemKind>()
        .map_err(|err| CommandError::new(err.to_string()))?;
    let count = if args.len() == 2 {
        parse_positive_u32(args[1]).map_err(|_| CommandError::new("Invalid count"))?
    } else {
        1
    };
    Ok((item, count))
}

fn parse_positive_u32(s: &str) -> Result<u32, ()> {
    let value = s.parse::<u32>().map_err(|_| ())?;
    if value == 0 {
        return Err(());
    }
    Ok(value)
}

fn parse_coord(s: &str) -> Result<CoordArg, CommandError> {
    let s = s.trim();
    if let Some(rest) = s.strip_prefix('~') {
        if rest.is_empty() {
            return Ok(CoordArg::Relative(0.0));
        }
        let delta = rest
            .parse::<f32>()
            .map_err(|_| CommandError::new(format!("Invalid relative coordinate: {s}")))?;
        return Ok(CoordArg::Relative(delta));
    }
    let value = s
        .parse::<f32>()
        .map_err(|_| CommandError::new(format!("Invalid coordinate: {s}")))?;
    Ok(CoordArg::Absolute(value))
}

fn parse_move_key(token: &str) -> Result<MoveKey, CommandError> {
    match token.to_ascii_lowercase().as_str() {
        "forward" | "w" => Ok(MoveKey::Forward),
        "back" | "s" => Ok(MoveKey::Back),
        "left" | "a" => Ok(MoveKey::Left),
        "right" | "d" => Ok(MoveKey::Right),
        _ => Err(CommandError::new(format!("Unknown direction: {token}"))),
    }
}

fn help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  /help".to_string(),
        "  /activate                   (E: interact with the focused object)".to_string(),
        "  /craft <salad|lure|shelter>".to_string(),
        "  /panel                      (toggle the crafting panel)".to_string(),
        "  /cancel                     (Q: reel in the fishing line)".to_string(),
        "  /deposit | /sort | /withdraw <item> [count]   (near the storage chest)"
            .to_string(),
        "  /hold <dir> | /release <dir>   dir = forward | back | left | right".to_string(),
        "  /look <dx> <dy>".to_string(),
        "  /tp <x> <y> <z>             (supports ~offset)".to_string(),
        "  /give <item> [count]".to_string(),
    ]
}
