mod cli;
mod console;

use std::time::Duration;

use app::{AppBuilder, Application};
use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use tracing::info;
use void_respawn::VoidRespawnPlugin;

use crate::cli::Cli;
use crate::console::ConsolePlugin;

struct VoidServer;

impl Application for VoidServer {
    const APP_ID: &'static str = "void_server";
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    let version = env!("CARGO_PKG_VERSION");

    let builder = match args.root {
        Some(root) => AppBuilder::<VoidServer>::with_base_path(version, root),
        None => AppBuilder::<VoidServer>::new(version),
    }
    .map_err(|err| eyre!("server initialization failed: {err}"))?;

    let tick = Duration::from_secs_f64(1.0 / args.tick_rate.max(1.0));
    let mut server = builder.build_with_bevy(|mut app, ctx| {
        app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(tick)))
            .add_plugins(VoidRespawnPlugin::new(
                ctx.plugin_data_dir(VoidRespawnPlugin::NAME),
            ))
            .add_plugins(ConsolePlugin);
        app
    });

    info!(
        "void_server {} started in {} (type 'help' for commands, 'stop' to quit)",
        server.context().version(),
        server.context().path_context().server_root().display()
    );

    match server.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(eyre!("server exited with code {code}")),
    }
}
