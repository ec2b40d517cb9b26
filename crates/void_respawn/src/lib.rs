//! VoidRespawn: sends players that fall below a world's void level back to
//! that world's respawn point, and lets permitted players set the point with
//! `/void setspawn`.
//!
//! # Example
//! ```no_run
//! use bevy::prelude::*;
//! use void_respawn::VoidRespawnPlugin;
//!
//! App::new()
//!     .add_plugins(MinimalPlugins)
//!     .add_plugins(VoidRespawnPlugin::new("server/plugins/VoidRespawn"))
//!     .run();
//! ```

use std::ops::Deref;
use std::path::PathBuf;

use bevy::prelude::*;
use respawn_store::ConfigStore;
use tracing::{error, info, warn};

pub mod command;
pub mod host;
pub mod settings;
pub mod void_check;

pub use host::*;
pub use settings::{SettingsError, VoidRespawnSettings};

/// Respawn point store shared by the plugin's systems.
#[derive(Resource, Debug, Clone)]
pub struct RespawnStore(ConfigStore);

impl RespawnStore {
    pub fn new(store: ConfigStore) -> Self {
        Self(store)
    }
}

impl Deref for RespawnStore {
    type Target = ConfigStore;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Ordering of the plugin's systems within `Update`.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum VoidRespawnSet {
    /// Handle `/void` commands.
    Commands,
    /// Find players below the void level.
    Detect,
    /// Move them.
    Teleport,
}

pub struct VoidRespawnPlugin {
    /// Plugin data directory (holds `config.yml` and `settings.ron`).
    pub data_dir: PathBuf,
}

impl VoidRespawnPlugin {
    pub const NAME: &'static str = "VoidRespawn";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}

impl Plugin for VoidRespawnPlugin {
    fn build(&self, app: &mut App) {
        let settings = VoidRespawnSettings::load(&self.data_dir).unwrap_or_else(|err| {
            warn!(
                "Ignoring {}: {err}",
                self.data_dir.join(VoidRespawnSettings::FILE_NAME).display()
            );
            VoidRespawnSettings::default()
        });
        let store = ConfigStore::new(self.data_dir.join(&settings.store_file));

        app.init_resource::<RegisteredCommands>();
        app.world_mut().resource_mut::<RegisteredCommands>().register(
            &settings.command,
            CommandInfo {
                usage: settings.usage(),
                description: "Set the void respawn point of your world to your location".into(),
                permission: Some(settings.permission.clone()),
            },
        );

        app.add_message::<CommandIssued>()
            .add_message::<CommandHandled>()
            .add_message::<ChatMessage>()
            .add_message::<Teleport>()
            .insert_resource(settings)
            .insert_resource(RespawnStore::new(store))
            .configure_sets(
                Update,
                (
                    VoidRespawnSet::Commands,
                    VoidRespawnSet::Detect,
                    VoidRespawnSet::Teleport,
                )
                    .chain(),
            )
            .add_systems(Startup, enable)
            .add_systems(
                Update,
                (
                    command::on_set_spawn_command.in_set(VoidRespawnSet::Commands),
                    void_check::on_position_update.in_set(VoidRespawnSet::Detect),
                    host::apply_teleports.in_set(VoidRespawnSet::Teleport),
                ),
            )
            .add_systems(Last, disable);
    }
}

fn enable(store: Res<RespawnStore>) {
    info!("VoidRespawn is now enabled!");

    // A broken store file is logged but never stops the server.
    if store.ensure_exists().is_err() {
        return;
    }

    match store.configured_worlds() {
        Ok(worlds) if worlds.is_empty() => info!("No void respawn points configured yet"),
        Ok(worlds) => info!("Void respawn points configured for: {}", worlds.join(", ")),
        Err(err) => error!("Could not read {}: {err}", store.path().display()),
    }
}

fn disable(mut exits: MessageReader<AppExit>) {
    if exits.read().next().is_some() {
        info!("VoidRespawn is now disabled!");
    }
}
