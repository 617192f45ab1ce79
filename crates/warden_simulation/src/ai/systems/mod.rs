//! AI systems (guard FSM поверх ECS)

pub mod fsm;

// Re-export all systems
pub use fsm::*;
