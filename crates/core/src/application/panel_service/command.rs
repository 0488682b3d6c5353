// Panel Commands - user-initiated actions

use crate::domain::ConfigField;
use serde::{Deserialize, Serialize};

/// Action requested from the control surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PanelCommand {
    Connect,
    Disconnect,
    StartConsume,
    StopConsume,
    Reset,
    EditField { field: ConfigField, value: String },
}

impl PanelCommand {
    pub fn name(&self) -> &'static str {
        match self {
            PanelCommand::Connect => "connect",
            PanelCommand::Disconnect => "disconnect",
            PanelCommand::StartConsume => "start_consume",
            PanelCommand::StopConsume => "stop_consume",
            PanelCommand::Reset => "reset",
            PanelCommand::EditField { .. } => "edit_field",
        }
    }
}
