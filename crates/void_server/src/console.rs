//! Server console: stdin lines become console commands, chat for the console is logged.

use std::io::BufRead;

use bevy::prelude::*;
use crossbeam::channel::{Receiver, Sender, unbounded};
use tracing::{error, info, warn};
use void_respawn::{ChatMessage, CommandIssued, CommandSender, RegisteredCommands, VoidRespawnSet};

/// Lines typed on the console, fed by a reader thread.
#[derive(Resource)]
pub struct ConsoleInput(Receiver<String>);

impl ConsoleInput {
    pub fn new(receiver: Receiver<String>) -> Self {
        Self(receiver)
    }
}

pub struct ConsolePlugin;

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        let (tx, rx) = unbounded();
        spawn_stdin_reader(tx);

        app.insert_resource(ConsoleInput::new(rx))
            .add_systems(
                Update,
                read_console_commands.before(VoidRespawnSet::Commands),
            )
            .add_systems(PostUpdate, print_chat);
    }
}

fn spawn_stdin_reader(tx: Sender<String>) {
    let spawned = std::thread::Builder::new()
        .name("console".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

    if let Err(err) = spawned {
        error!("Could not start console reader: {err}");
    }
}

/// What the console asked for.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleLine {
    Stop,
    Help,
    Command(CommandIssued),
    Empty,
}

pub fn parse_console_line(line: &str) -> ConsoleLine {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("stop") {
        return ConsoleLine::Stop;
    }
    if trimmed.eq_ignore_ascii_case("help") {
        return ConsoleLine::Help;
    }
    match CommandIssued::parse(CommandSender::Console, trimmed) {
        Some(command) => ConsoleLine::Command(command),
        None => ConsoleLine::Empty,
    }
}

fn read_console_commands(
    input: Res<ConsoleInput>,
    registered: Res<RegisteredCommands>,
    mut commands: MessageWriter<CommandIssued>,
    mut exit: MessageWriter<AppExit>,
) {
    while let Ok(line) = input.0.try_recv() {
        match parse_console_line(&line) {
            ConsoleLine::Stop => {
                info!("Stopping the server");
                exit.write(AppExit::Success);
            }
            ConsoleLine::Help => {
                for (name, command) in registered.iter() {
                    match &command.permission {
                        Some(node) => info!(
                            "/{name}: {} ({}, needs {node})",
                            command.description, command.usage
                        ),
                        None => info!("/{name}: {} ({})", command.description, command.usage),
                    }
                }
            }
            ConsoleLine::Command(command) => {
                if registered.get(&command.name).is_none() {
                    warn!("Unknown command '{}'. Type 'help' for a list.", command.name);
                    continue;
                }
                commands.write(command);
            }
            ConsoleLine::Empty => {}
        }
    }
}

fn print_chat(mut chat: MessageReader<ChatMessage>, players: Query<&void_respawn::Player>) {
    for message in chat.read() {
        match message.recipient {
            CommandSender::Console => info!("{}", message.text),
            CommandSender::Player(entity) => {
                let name = players
                    .get(entity)
                    .map(|p| p.name.as_str())
                    .unwrap_or("<offline>");
                info!("[-> {name}] {}", message.text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_and_help_are_builtin() {
        assert_eq!(parse_console_line(" STOP "), ConsoleLine::Stop);
        assert_eq!(parse_console_line("help"), ConsoleLine::Help);
        assert_eq!(parse_console_line(""), ConsoleLine::Empty);
    }

    #[test]
    fn slash_is_optional() {
        let with = parse_console_line("/void setspawn");
        let without = parse_console_line("void setspawn");
        assert_eq!(with, without);
        assert!(matches!(with, ConsoleLine::Command(c) if c.sender == CommandSender::Console));
    }

    #[test]
    fn console_commands_reach_the_plugin() {
        let tmp = tempfile::tempdir().unwrap();
        let (tx, rx) = unbounded();
        let mut app = App::new();
        app.add_plugins(void_respawn::VoidRespawnPlugin::new(tmp.path()))
            .insert_resource(ConsoleInput::new(rx))
            .add_systems(
                Update,
                read_console_commands.before(VoidRespawnSet::Commands),
            );

        tx.send("void setspawn".to_string()).unwrap();
        tx.send("stop".to_string()).unwrap();
        app.update();

        let handled = app
            .world()
            .resource::<Messages<void_respawn::CommandHandled>>();
        assert_eq!(handled.len(), 1);
        let exits = app.world().resource::<Messages<AppExit>>();
        assert_eq!(exits.len(), 1);
    }
}
