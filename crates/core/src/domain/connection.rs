// Connection Settings Domain Model

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::error::DomainError;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: &str = "5672";
pub const DEFAULT_EXCHANGE: &str = "amq.direct";
pub const DEFAULT_QUEUE: &str = "my_queue";
pub const DEFAULT_USER: &str = "guest";
pub const DEFAULT_PASSWORD: &str = "guest";

/// Broker connection parameters as typed by the user.
///
/// All values are kept as raw strings; the only check ever applied is
/// non-emptiness, and only when a connection is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: String,
    pub exchange: String,
    pub queue: String,
    pub user: String,
    pub password: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT.to_string(),
            exchange: DEFAULT_EXCHANGE.to_string(),
            queue: DEFAULT_QUEUE.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl ConnectionConfig {
    pub fn get(&self, field: ConfigField) -> &str {
        match field {
            ConfigField::Host => &self.host,
            ConfigField::Port => &self.port,
            ConfigField::Exchange => &self.exchange,
            ConfigField::Queue => &self.queue,
            ConfigField::User => &self.user,
            ConfigField::Password => &self.password,
        }
    }

    /// Return a copy with one field replaced
    pub fn with_field(&self, field: ConfigField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let value = value.into();
        match field {
            ConfigField::Host => next.host = value,
            ConfigField::Port => next.port = value,
            ConfigField::Exchange => next.exchange = value,
            ConfigField::Queue => next.queue = value,
            ConfigField::User => next.user = value,
            ConfigField::Password => next.password = value,
        }
        next
    }

    /// Fields whose value is the empty string, in declaration order
    pub fn missing_fields(&self) -> Vec<ConfigField> {
        ConfigField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// `host:port` as shown in log lines
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// One of the six editable connection fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigField {
    Host,
    Port,
    Exchange,
    Queue,
    User,
    Password,
}

impl ConfigField {
    pub const ALL: [ConfigField; 6] = [
        ConfigField::Host,
        ConfigField::Port,
        ConfigField::Exchange,
        ConfigField::Queue,
        ConfigField::User,
        ConfigField::Password,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigField::Host => "host",
            ConfigField::Port => "port",
            ConfigField::Exchange => "exchange",
            ConfigField::Queue => "queue",
            ConfigField::User => "user",
            ConfigField::Password => "password",
        }
    }
}

impl std::fmt::Display for ConfigField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownField(s.to_string()))
    }
}
