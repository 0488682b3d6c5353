// Rendering - pure projections of a panel snapshot to terminal text

use colored::{ColoredString, Colorize};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use queue_console_core::domain::{
    ConfigField, ConnectionState, ConsumptionState, LogEntry, PanelState, Severity,
};

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Config table, lifecycle line and enabled controls
pub fn status(state: &PanelState) -> String {
    let rows: Vec<FieldRow> = ConfigField::ALL
        .into_iter()
        .map(|field| FieldRow {
            field: field.as_str(),
            value: display_value(field, state.config.get(field)),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());

    let controls = state.controls();
    let enabled: Vec<&str> = [
        ("connect", controls.connect),
        ("disconnect", controls.disconnect),
        ("consume", controls.start_consume),
        ("stop", controls.stop_consume),
        ("reset", controls.reset),
        ("set", controls.edit_config),
    ]
    .into_iter()
    .filter_map(|(name, on)| on.then_some(name))
    .collect();

    format!(
        "{}\n  {} {}   {} {}\n  {} {}   {} {} shown / {} received\n  {} {}",
        table,
        "Connection:".bold(),
        connection_label(state.connection),
        "Consumer:".bold(),
        consumption_label(state.consumption),
        "Log:".bold(),
        state.log.len(),
        "Messages:".bold(),
        state.messages.len(),
        state.messages_received,
        "Controls:".bold(),
        enabled.join(", "),
    )
}

/// Up to `limit` messages, newest first
pub fn messages(state: &PanelState, limit: usize) -> String {
    if state.messages.is_empty() {
        return "No messages received".yellow().to_string();
    }
    state
        .messages
        .iter()
        .take(limit)
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Up to `limit` log entries, newest first, coloured by severity
pub fn log(state: &PanelState, limit: usize) -> String {
    if state.log.is_empty() {
        return "Log is empty".yellow().to_string();
    }
    state
        .log
        .iter()
        .take(limit)
        .map(log_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {}",
        entry.timestamp,
        severity_colored(entry.severity, &entry.message)
    )
}

fn severity_colored(severity: Severity, text: &str) -> ColoredString {
    match severity {
        Severity::Info => text.cyan(),
        Severity::Error => text.red().bold(),
        Severity::Success => text.green(),
        Severity::Warning => text.yellow(),
    }
}

fn connection_label(state: ConnectionState) -> ColoredString {
    let label = state.to_string();
    match state {
        ConnectionState::Disconnected => label.red(),
        ConnectionState::Connecting => label.yellow(),
        ConnectionState::Connected => label.green(),
    }
}

fn consumption_label(state: ConsumptionState) -> ColoredString {
    let label = state.to_string();
    match state {
        ConsumptionState::Idle => label.normal(),
        ConsumptionState::Consuming => label.green().bold(),
    }
}

fn display_value(field: ConfigField, value: &str) -> String {
    if value.is_empty() {
        "(empty)".to_string()
    } else if field == ConfigField::Password {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    }
}

/// Tracks what has already been printed so live updates show only news
#[derive(Debug, Default)]
pub struct FeedCursor {
    log_seen: u64,
    messages_seen: u64,
    resets_seen: u64,
}

impl FeedCursor {
    /// Start after everything already in `state`
    pub fn at(state: &PanelState) -> Self {
        Self {
            log_seen: state.log_written,
            messages_seen: state.messages_received,
            resets_seen: state.resets,
        }
    }

    /// Lines for log entries and messages not printed yet, oldest first
    pub fn advance(&mut self, state: &PanelState) -> Vec<String> {
        let new_log = state.log_written.saturating_sub(self.log_seen) as usize;
        // messages_received restarts at zero after a reset
        let new_messages = if state.resets != self.resets_seen {
            state.messages_received
        } else {
            state.messages_received.saturating_sub(self.messages_seen)
        } as usize;

        self.log_seen = state.log_written;
        self.messages_seen = state.messages_received;
        self.resets_seen = state.resets;

        let mut lines: Vec<String> = state
            .log
            .iter()
            .take(new_log)
            .rev()
            .map(log_entry)
            .collect();
        lines.extend(
            state
                .messages
                .iter()
                .take(new_messages)
                .rev()
                .map(|m| format!("  {} {}", "<-".dimmed(), m)),
        );
        lines
    }
}
