// Control Surface - line commands in, rendered panel out

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Write;

use queue_console_core::application::{PanelCommand, PanelHandle};
use queue_console_core::domain::{ConfigField, Controls};
use queue_console_core::AppError;

use crate::render::{self, FeedCursor};

/// One line typed at the console
#[derive(Parser, Debug)]
#[command(
    name = "queue-console",
    no_binary_name = true,
    disable_version_flag = true,
    about = "Simulated queue consumer controls"
)]
pub struct Line {
    #[command(subcommand)]
    pub command: ConsoleCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Edit a connection field (host, port, exchange, queue, user, password)
    Set {
        field: ConfigField,

        /// New value; omit or pass "" to clear the field, quote to keep spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },

    /// Start a simulated connection
    Connect,

    /// Drop the connection and stop consuming
    Disconnect,

    /// Start receiving simulated messages
    #[command(alias = "start")]
    Consume,

    /// Stop receiving messages
    Stop,

    /// Disconnect, restore default settings and clear both feeds
    Reset,

    /// Show settings, lifecycle state and available controls
    Status {
        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show received messages, newest first
    Messages {
        #[arg(short = 'n', long, default_value = "10")]
        lines: usize,
    },

    /// Show the activity log, newest first
    Log {
        #[arg(short = 'n', long, default_value = "20")]
        lines: usize,
    },

    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

/// Whether the console keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive surface bound to a running panel
pub struct Surface<W: Write> {
    handle: PanelHandle,
    cursor: FeedCursor,
    out: W,
}

impl<W: Write> Surface<W> {
    pub fn new(handle: PanelHandle, out: W) -> Self {
        let cursor = FeedCursor::at(&handle.snapshot());
        Self {
            handle,
            cursor,
            out,
        }
    }

    pub fn banner(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "{}",
            "Queue Console - simulated consumer (type `help`)".cyan().bold()
        )?;
        writeln!(self.out, "{}", render::status(&self.handle.snapshot()))?;
        Ok(())
    }

    /// Parse and run one input line
    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let Some(words) = shlex::split(line) else {
            writeln!(self.out, "{}", "Unbalanced quotes in input".yellow())?;
            return Ok(Flow::Continue);
        };
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        let parsed = match Line::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => {
                // Also covers `help`
                writeln!(self.out, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
        };

        match parsed.command {
            ConsoleCommand::Set { field, value } => {
                self.run(PanelCommand::EditField {
                    field,
                    value: value.join(" "),
                })
                .await?;
            }
            ConsoleCommand::Connect => self.run(PanelCommand::Connect).await?,
            ConsoleCommand::Disconnect => self.run(PanelCommand::Disconnect).await?,
            ConsoleCommand::Consume => self.run(PanelCommand::StartConsume).await?,
            ConsoleCommand::Stop => self.run(PanelCommand::StopConsume).await?,
            ConsoleCommand::Reset => self.run(PanelCommand::Reset).await?,
            ConsoleCommand::Status { json } => {
                let state = self.handle.snapshot();
                if json {
                    writeln!(self.out, "{}", serde_json::to_string_pretty(&state)?)?;
                } else {
                    writeln!(self.out, "{}", render::status(&state))?;
                }
            }
            ConsoleCommand::Messages { lines } => {
                writeln!(self.out, "{}", render::messages(&self.handle.snapshot(), lines))?;
            }
            ConsoleCommand::Log { lines } => {
                writeln!(self.out, "{}", render::log(&self.handle.snapshot(), lines))?;
            }
            ConsoleCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Print log entries and messages that arrived since the last print
    pub fn print_updates(&mut self) -> Result<()> {
        let state = self.handle.snapshot();
        for line in self.cursor.advance(&state) {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    async fn run(&mut self, command: PanelCommand) -> Result<()> {
        let snapshot = self.handle.snapshot();
        if !is_enabled(&snapshot.controls(), &command) {
            writeln!(
                self.out,
                "{}",
                format!(
                    "`{}` is unavailable while {}",
                    command.name(),
                    snapshot.connection
                )
                .yellow()
            )?;
            return Ok(());
        }

        match self.handle.execute(command).await {
            Ok(_) => {}
            Err(AppError::Domain(e)) => writeln!(self.out, "{}", e.to_string().yellow())?,
            Err(e) => return Err(e.into()),
        }
        self.print_updates()
    }
}

/// Mirror of the disabled-button rules
pub fn is_enabled(controls: &Controls, command: &PanelCommand) -> bool {
    match command {
        PanelCommand::Connect => controls.connect,
        PanelCommand::Disconnect => controls.disconnect,
        PanelCommand::StartConsume => controls.start_consume,
        PanelCommand::StopConsume => controls.stop_consume,
        PanelCommand::Reset => controls.reset,
        PanelCommand::EditField { .. } => controls.edit_config,
    }
}
