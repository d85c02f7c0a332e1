//! Command implementations.

pub mod analyze;
pub mod events;
pub mod export;
pub mod history;
pub mod roster;
