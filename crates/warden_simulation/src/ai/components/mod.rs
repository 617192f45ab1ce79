//! Guard components

pub mod fsm;
pub mod guard;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod fsm_tests;

// Re-export all components
pub use fsm::*;
pub use guard::*;
