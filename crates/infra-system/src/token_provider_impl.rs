// Random token provider implementation
// reason: rand for the short alphanumeric tokens of simulated messages
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

use queue_console_core::application::constants::MESSAGE_TOKEN_LENGTH;
use queue_console_core::port::TokenProvider;

/// Lowercase alphanumeric tokens from the thread-local RNG
pub struct RandomTokenProvider {
    length: usize,
}

impl RandomTokenProvider {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }
}

impl Default for RandomTokenProvider {
    fn default() -> Self {
        Self::new(MESSAGE_TOKEN_LENGTH)
    }
}

impl TokenProvider for RandomTokenProvider {
    fn generate_token(&self) -> String {
        thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect()
    }
}
