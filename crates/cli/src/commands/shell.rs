//! Interactive shell.
//!
//! Reuses one login for every command. Status changes run in the
//! background so the prompt stays usable; their results are printed when
//! they settle and applied to the order board.

use std::io::Write;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, warn};

use senji_admin::ConsoleError;
use senji_admin::services::{StatusChangeRejected, StatusOutcome};
use senji_core::{Order, OrderId, OrderStatus};

use super::orders::{OrderAction, current_order, describe_outcome};
use super::{CliError, Command, Console};

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    #[command(flatten)]
    Console(Command),
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// Messages from background status changes.
#[derive(Debug)]
enum ShellEvent {
    OrderChanged(Order),
    Settled(Result<StatusOutcome, StatusChangeRejected>),
}

enum Flow {
    Continue(String),
    Exit,
}

const PROMPT: &str = "senji> ";

/// Run the shell until `exit`, end of input, or a lost session.
///
/// # Errors
///
/// Returns an error when stdin/stdout fail or the backend rejects the
/// session.
pub async fn run(console: &mut Console) -> Result<(), CliError> {
    let (events, mut inbox) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    prompt(&mut stdout)?;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle_line(console, &events, &line).await {
                    Ok(Flow::Continue(text)) => write!(stdout, "{text}")?,
                    Ok(Flow::Exit) => break,
                    Err(e) if e.requires_login() => return Err(e),
                    Err(e) => writeln!(stdout, "Error: {e}")?,
                }
                prompt(&mut stdout)?;
            }
            Some(event) = inbox.recv() => match event {
                ShellEvent::OrderChanged(order) => console.board.apply_status_change(&order),
                ShellEvent::Settled(result) => {
                    let settled = result
                        .map_err(|e| CliError::from(ConsoleError::from(e)))
                        .and_then(|outcome| describe_outcome(&outcome));
                    match settled {
                        Ok(text) => write!(stdout, "\n{text}")?,
                        Err(e) if e.requires_login() => return Err(e),
                        Err(e) => writeln!(stdout, "\nError: {e}")?,
                    }
                    prompt(&mut stdout)?;
                }
            },
        }
    }
    Ok(())
}

async fn handle_line(
    console: &mut Console,
    events: &UnboundedSender<ShellEvent>,
    line: &str,
) -> Result<Flow, CliError> {
    let words = split_words(line).map_err(CliError::InvalidArgument)?;
    if words.is_empty() {
        return Ok(Flow::Continue(String::new()));
    }

    let parsed = match ShellLine::try_parse_from(words) {
        Ok(parsed) => parsed,
        // Help and usage errors are rendered like any other output.
        Err(e) => return Ok(Flow::Continue(e.render().to_string())),
    };

    match parsed.command {
        ShellCommand::Exit => Ok(Flow::Exit),
        ShellCommand::Console(Command::Orders {
            action: OrderAction::SetStatus { id, status },
        }) => start_status_change(console, events, OrderId::new(id), status)
            .await
            .map(Flow::Continue),
        ShellCommand::Console(command) => console.execute(command).await.map(Flow::Continue),
    }
}

/// Start a status change in the background.
///
/// The order's control is shared with any change still in flight, so a
/// second change for the same order is rejected until the first settles.
async fn start_status_change(
    console: &mut Console,
    events: &UnboundedSender<ShellEvent>,
    id: OrderId,
    status: OrderStatus,
) -> Result<String, CliError> {
    let order = current_order(console, &id).await?;
    let control = console.control_for(order);
    let api = console.api().clone();
    let events = events.clone();

    debug!(order_id = %id, %status, "Starting background status change");
    tokio::spawn(async move {
        let changed = events.clone();
        let result = control
            .change(&api, status, move |order| {
                let _ = changed.send(ShellEvent::OrderChanged(order.clone()));
            })
            .await;
        if events.send(ShellEvent::Settled(result)).is_err() {
            warn!("Shell closed before status change settled");
        }
    });

    Ok(format!("Updating order #{} to {status}...\n", id.short()))
}

fn prompt(stdout: &mut std::io::Stdout) -> std::io::Result<()> {
    write!(stdout, "{PROMPT}")?;
    stdout.flush()
}

/// Split a command line on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quoted {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
