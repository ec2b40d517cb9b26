//! Host-side types the plugin consumes.
//!
//! The game server owns these: it spawns players, moves them by mutating
//! [`Location`], grants [`Permissions`], writes [`CommandIssued`] for every
//! console or chat command and delivers [`ChatMessage`]s to their recipients.

use std::collections::{HashMap, HashSet};

use bevy::math::DVec3;
use bevy::prelude::*;
use respawn_store::RespawnPoint;
use tracing::debug;

/// Player entity marker with the player's display name.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Where a player is: world name, position and orientation.
///
/// Every change to this component is a movement update.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Location {
    pub world: String,
    pub position: DVec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Location {
    pub fn new(world: impl Into<String>, position: DVec3, yaw: f32, pitch: f32) -> Self {
        Self {
            world: world.into(),
            position,
            yaw,
            pitch,
        }
    }

    /// Location in `world` at the given respawn point.
    pub fn from_point(world: impl Into<String>, point: &RespawnPoint) -> Self {
        Self::new(
            world,
            DVec3::new(point.x, point.y, point.z),
            point.yaw,
            point.pitch,
        )
    }

    /// The five stored fields of this location.
    pub fn to_point(&self) -> RespawnPoint {
        RespawnPoint::new(
            self.position.x,
            self.position.y,
            self.position.z,
            self.yaw,
            self.pitch,
        )
    }
}

/// Capabilities granted to a player.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions(HashSet<String>);

impl Permissions {
    pub fn granted<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(nodes.into_iter().map(Into::into).collect())
    }

    pub fn has(&self, node: &str) -> bool {
        self.0.contains(node)
    }
}

/// Who issued a command or receives a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSender {
    Console,
    Player(Entity),
}

/// A command typed by a player or on the server console, without the leading `/`.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct CommandIssued {
    pub sender: CommandSender,
    pub name: String,
    pub args: Vec<String>,
}

impl CommandIssued {
    /// Splits a raw command line (`/void setspawn`) into name and arguments.
    pub fn parse(sender: CommandSender, line: &str) -> Option<Self> {
        let mut parts = line.trim().trim_start_matches('/').split_whitespace();
        let name = parts.next()?.to_string();
        Some(Self {
            sender,
            name,
            args: parts.map(str::to_string).collect(),
        })
    }
}

/// Result of a command: `handled` is false when it was rejected.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct CommandHandled {
    pub sender: CommandSender,
    pub name: String,
    pub handled: bool,
}

/// A line of text for a player or the console.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub recipient: CommandSender,
    pub text: String,
}

/// Request to move `player` to `point` in `world`.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct Teleport {
    pub player: Entity,
    pub world: String,
    pub point: RespawnPoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub usage: String,
    pub description: String,
    pub permission: Option<String>,
}

/// Commands registered by plugins, keyed by lower-case name.
#[derive(Resource, Debug, Default)]
pub struct RegisteredCommands {
    commands: HashMap<String, CommandInfo>,
}

impl RegisteredCommands {
    pub fn register(&mut self, name: &str, info: CommandInfo) {
        self.commands.insert(name.to_lowercase(), info);
    }

    pub fn get(&self, name: &str) -> Option<&CommandInfo> {
        self.commands.get(&name.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandInfo)> {
        self.commands.iter().map(|(name, info)| (name.as_str(), info))
    }
}

/// Moves players according to [`Teleport`] requests.
pub fn apply_teleports(
    mut teleports: MessageReader<Teleport>,
    mut players: Query<&mut Location, With<Player>>,
) {
    for teleport in teleports.read() {
        let Ok(mut location) = players.get_mut(teleport.player) else {
            debug!("Teleport target {:?} is gone", teleport.player);
            continue;
        };
        *location = Location::from_point(teleport.world.clone(), &teleport.point);
    }
}
