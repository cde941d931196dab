use crate::links::InviteOption;
use crate::messages::UserEvent;
use anyhow::{Context, Result};
use std::io::BufRead;
use tokio::sync::mpsc;

/// Map one line of input to an event
pub fn parse_event(line: &str) -> Option<UserEvent> {
    let command = line.trim().to_ascii_lowercase();
    match command.as_str() {
        "m" | "music" => Some(UserEvent::ToggleAudio),
        "n" | "next" => Some(UserEvent::Advance),
        "q" | "quit" => Some(UserEvent::Quit),
        other => other
            .parse::<u8>()
            .ok()
            .and_then(InviteOption::from_number)
            .map(UserEvent::Select),
    }
}

/// Spawn a dedicated thread forwarding stdin commands as events
///
/// Blocking reads stay off the runtime so shutdown never waits on the terminal.
pub fn spawn_stdin_reader(tx: mpsc::Sender<UserEvent>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        if let Err(e) = forward_events(stdin.lock(), &tx) {
            tracing::error!("Input reader stopped: {:#}", e);
        }
        tracing::debug!("Input closed");
    });
}

/// Returns when the input ends or the receiver is dropped.
pub fn forward_events(input: impl BufRead, tx: &mpsc::Sender<UserEvent>) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        match parse_event(&line) {
            Some(event) => {
                tracing::debug!("Input event: {:?}", event);
                if tx.blocking_send(event).is_err() {
                    break;
                }
            }
            None if line.trim().is_empty() => {}
            None => tracing::debug!("Ignoring unknown command: {:?}", line.trim()),
        }
    }

    Ok(())
}
