// Queue Console Infrastructure - System Adapters
// Implements: TimerScheduler, TokenProvider

pub mod timer_scheduler_impl;
pub mod token_provider_impl;

pub use timer_scheduler_impl::TokioTimerScheduler;
pub use token_provider_impl::RandomTokenProvider;
