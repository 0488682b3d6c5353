// Token Provider Port (for deterministic testing)

/// Source of the random tokens embedded in simulated messages
pub trait TokenProvider: Send + Sync {
    /// Generate a new short token
    fn generate_token(&self) -> String;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Deterministic tokens: `tok1`, `tok2`, ...
    #[derive(Default)]
    pub struct SequentialTokenProvider {
        counter: AtomicU64,
    }

    impl SequentialTokenProvider {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of tokens handed out so far
        pub fn issued(&self) -> u64 {
            self.counter.load(Ordering::SeqCst)
        }
    }

    impl TokenProvider for SequentialTokenProvider {
        fn generate_token(&self) -> String {
            let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            format!("tok{}", n)
        }
    }
}
