//! The `/void setspawn` command.

use bevy::prelude::*;
use respawn_store::{PointField, RespawnPoint};
use tracing::{error, info};

use crate::host::{
    ChatMessage, CommandHandled, CommandIssued, CommandSender, Location, Permissions, Player,
};
use crate::settings::VoidRespawnSettings;
use crate::void_check::is_in_void;
use crate::RespawnStore;

pub const SUBCOMMAND: &str = "setspawn";

pub const ONLY_PLAYERS: &str = "Only players can execute this command.";
pub const NO_PERMISSION: &str = "You don't have permission to set the void respawn location.";
pub const IN_VOID: &str = "You can't set the void respawn location inside the void.";
pub const SAVE_FAILED: &str = "Failed to save the void respawn location.";

/// Answers every command addressed to this plugin with one chat line and one [`CommandHandled`].
pub fn on_set_spawn_command(
    mut issued: MessageReader<CommandIssued>,
    players: Query<(&Player, &Location, Option<&Permissions>)>,
    store: Res<RespawnStore>,
    settings: Res<VoidRespawnSettings>,
    mut chat: MessageWriter<ChatMessage>,
    mut results: MessageWriter<CommandHandled>,
) {
    for command in issued.read() {
        if !command.name.eq_ignore_ascii_case(&settings.command) {
            continue;
        }

        let (handled, text) = set_spawn(command, &players, &store, &settings);
        chat.write(ChatMessage {
            recipient: command.sender,
            text,
        });
        results.write(CommandHandled {
            sender: command.sender,
            name: command.name.clone(),
            handled,
        });
    }
}

fn set_spawn(
    command: &CommandIssued,
    players: &Query<(&Player, &Location, Option<&Permissions>)>,
    store: &RespawnStore,
    settings: &VoidRespawnSettings,
) -> (bool, String) {
    let CommandSender::Player(entity) = command.sender else {
        return (false, ONLY_PLAYERS.to_string());
    };
    let Ok((player, location, permissions)) = players.get(entity) else {
        return (false, ONLY_PLAYERS.to_string());
    };

    if !permissions.is_some_and(|p| p.has(&settings.permission)) {
        return (false, NO_PERMISSION.to_string());
    }

    if command.args.len() != 1 || !command.args[0].eq_ignore_ascii_case(SUBCOMMAND) {
        return (false, format!("Usage: {}", settings.usage()));
    }

    // Points below the void level are never stored.
    if is_in_void(location, settings.void_level) {
        return (false, IN_VOID.to_string());
    }

    let point = location.to_point();
    match store.write_point(&location.world, &point) {
        Ok(()) => {
            info!(
                "{} set the void respawn point of '{}'",
                player.name, location.world
            );
            (true, confirmation(&location.world, &point))
        }
        Err(err) => {
            error!(
                "Could not save the void respawn point of '{}': {err}",
                location.world
            );
            (false, SAVE_FAILED.to_string())
        }
    }
}

/// Chat line confirming a new respawn point.
pub fn confirmation(world: &str, point: &RespawnPoint) -> String {
    format!(
        "Void respawn location set for world '{world}' at X: {} Y: {} Z: {} Pitch: {} Yaw: {}",
        point.value_of(PointField::X),
        point.value_of(PointField::Y),
        point.value_of(PointField::Z),
        point.value_of(PointField::Pitch),
        point.value_of(PointField::Yaw),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_lists_pitch_before_yaw() {
        let text = confirmation("world", &RespawnPoint::new(1.0, 64.0, -2.5, 90.0, 15.0));
        assert_eq!(
            text,
            "Void respawn location set for world 'world' at X: 1.0 Y: 64.0 Z: -2.5 Pitch: 15.0 Yaw: 90.0"
        );
    }
}
