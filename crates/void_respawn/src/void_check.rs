//! Detection of players falling into the void.

use bevy::prelude::*;
use tracing::{debug, warn};

use crate::host::{Location, Player, Teleport};
use crate::settings::VoidRespawnSettings;
use crate::RespawnStore;

pub fn is_in_void(location: &Location, void_level: f64) -> bool {
    location.position.y < void_level
}

/// Sends every moved player that is below the void level back to their world's respawn point.
///
/// Worlds without a complete respawn point are left alone.
pub fn on_position_update(
    moved: Query<(Entity, &Player, &Location), Changed<Location>>,
    store: Res<RespawnStore>,
    settings: Res<VoidRespawnSettings>,
    mut teleports: MessageWriter<Teleport>,
) {
    for (entity, player, location) in &moved {
        if !is_in_void(location, settings.void_level) {
            continue;
        }

        match store.get_point(&location.world) {
            Ok(Some(point)) => {
                debug!(
                    "{} fell into the void of '{}', teleporting to {point:?}",
                    player.name, location.world
                );
                teleports.write(Teleport {
                    player: entity,
                    world: location.world.clone(),
                    point,
                });
            }
            Ok(None) => {
                debug!(
                    "{} fell into the void of '{}', but no respawn point is configured",
                    player.name, location.world
                );
            }
            Err(err) => {
                warn!(
                    "Could not read the respawn point of '{}': {err}",
                    location.world
                );
            }
        }
    }
}
