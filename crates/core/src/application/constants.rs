// Panel constants (no magic values)
use std::time::Duration;

/// Simulated broker handshake time before a connect attempt resolves (2s)
pub const CONNECT_DELAY: Duration = Duration::from_secs(2);

/// Interval between two simulated deliveries while consuming (3s)
pub const CONSUME_INTERVAL: Duration = Duration::from_secs(3);

/// Length of the random token embedded in each simulated message
pub const MESSAGE_TOKEN_LENGTH: usize = 6;

/// Pending commands buffered between the control surface and the runtime
pub const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// How long the console waits for the runtime to tear down on exit (5s)
pub const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
